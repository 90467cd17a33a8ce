use std::io::{self, Write};
use std::process::ExitCode;

use tracing::{debug, info};

use bankgl::cli::{self, CliOptions, Command, HistoryCommand, UploadArgs};
use bankgl::{
    config, file_count_label, logging, App, AppConfig, BankGlError, DirectoryTarget,
    JsonFileStore, OutputFormatter, SelectedFile, StderrNotifier, UploadMethod,
};

type CliApp = App<JsonFileStore, StderrNotifier>;

fn main() -> ExitCode {
    logging::init_logging();

    let opts = cli::parse();
    match run(opts) {
        Ok(code) => code,
        Err(e) => {
            handle_error(e);
            ExitCode::FAILURE
        }
    }
}

fn run(opts: CliOptions) -> Result<ExitCode, BankGlError> {
    let config = resolve_config(&opts)?;
    debug!("using store at {}", config.store_path().display());

    let store = JsonFileStore::new(config.store_path());
    let mut app = App::new(store, config.exporter()?, StderrNotifier);
    let target = DirectoryTarget::new(config.output_dir.clone());

    match opts.command {
        Command::Upload(args) => upload(&mut app, args, &target),
        Command::Show { format } => {
            let formatter = OutputFormatter::from_format(format.into());
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "Source: {}", app.source_file_name())?;
            formatter.render(app.table(), &mut handle)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::History(command) => history(&mut app, command),
        Command::Download { id } => {
            let download = match id {
                Some(id) => app.download_history_item(&id, &target),
                None => app.download_current(&target),
            };
            Ok(report_download(download))
        }
        Command::Theme { toggle } => {
            let mode = if toggle {
                app.toggle_theme()?
            } else {
                app.theme()
            };
            println!("{}", mode.as_str());
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// 設定ファイル・環境変数・コマンドライン引数を順に適用する
fn resolve_config(opts: &CliOptions) -> Result<AppConfig, BankGlError> {
    let mut config = config::load_config(opts.config_path.as_deref())?;
    if let Some(dir) = &opts.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(dir) = &opts.output_dir {
        config.output_dir = dir.clone();
    }
    config.validate()?;
    Ok(config)
}

fn upload(
    app: &mut CliApp,
    args: UploadArgs,
    target: &DirectoryTarget,
) -> Result<ExitCode, BankGlError> {
    match (args.file, args.path) {
        (Some(file), _) => app.select_file(SelectedFile::from_path(&file)?),
        (None, Some(path)) => app.set_path(path),
        (None, None) => app.set_upload_method(UploadMethod::FileManager),
    }

    let navigation = app.confirm_upload()?;
    info!("upload confirmed via {:?}", navigation.upload_method);

    if let Some(record) = app.history().selected() {
        println!("Uploaded {} (id: {})", record.file_name, record.id);
    }

    if args.download {
        return Ok(report_download(app.download_current(target)));
    }
    Ok(ExitCode::SUCCESS)
}

fn history(app: &mut CliApp, command: HistoryCommand) -> Result<ExitCode, BankGlError> {
    match command {
        HistoryCommand::List => {
            println!("{}", file_count_label(app.history().len()));
            for record in app.history().records() {
                println!(
                    "{}  {}  {}  {}",
                    record.id,
                    record.display_date(),
                    record.file_size.as_deref().unwrap_or("-"),
                    record.file_name
                );
            }
        }
        HistoryCommand::Show { id } => {
            let record = app
                .history()
                .get(&id)
                .ok_or_else(|| BankGlError::NotFound { id: id.clone() })?;
            println!("File: {}", record.file_name);
            println!("Uploaded: {}", record.display_date());
            if let Some(size) = &record.file_size {
                println!("Size: {}", size);
            }
            println!("Export with: bankgl download --id {}", record.id);
        }
        HistoryCommand::Remove { id } => {
            if app.history().get(&id).is_none() {
                return Err(BankGlError::NotFound { id });
            }
            app.remove_history(&id)?;
            println!("Removed {}", id);
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn report_download(download: Option<bankgl::Download>) -> ExitCode {
    match download {
        Some(download) => {
            println!("Saved {} ({} bytes)", download.path.display(), download.size);
            ExitCode::SUCCESS
        }
        // 通知は`Notifier`が済ませている
        None => ExitCode::FAILURE,
    }
}

fn handle_error(error: BankGlError) {
    match error {
        BankGlError::Io(io_err) => {
            eprintln!("I/O Error: {}", io_err);
            eprintln!("Please check that the file exists and you have permission to access it.");
        }
        BankGlError::Json(json_err) => {
            eprintln!("Store Error: {}", json_err);
            eprintln!("The store file may be corrupted; remove it to start with an empty history.");
        }
        BankGlError::Xlsx(xlsx_err) => {
            eprintln!("Spreadsheet Error: {}", xlsx_err);
        }
        BankGlError::Config(msg) => {
            eprintln!("Configuration Error: {}", msg);
            eprintln!("Please check your configuration file and command-line options.");
        }
        BankGlError::Validation(msg) => {
            eprintln!("{}", msg);
        }
        BankGlError::NotFound { id } => {
            eprintln!("History record not found: {}", id);
            eprintln!("Run `bankgl history list` to see the available records.");
        }
    }
}
