use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::api::PreviewFormat;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatArg {
    Markdown,
    Json,
}

impl From<FormatArg> for PreviewFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Markdown => PreviewFormat::Markdown,
            FormatArg::Json => PreviewFormat::Json,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct CliOptions {
    /// Optional path to config file (JSON)
    #[arg(long, global = true)]
    pub config_path: Option<PathBuf>,

    /// Directory holding the history and theme store (overrides config and BANKGL_DATA_DIR)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Directory for downloaded spreadsheets (overrides config)
    #[arg(long, global = true)]
    pub output_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Upload a bank statement and record it in the history
    Upload(UploadArgs),

    /// Print the statement table
    Show {
        /// Preview format
        #[arg(long, value_enum, default_value_t = FormatArg::Markdown)]
        format: FormatArg,
    },

    /// Inspect or edit the upload history
    #[command(subcommand)]
    History(HistoryCommand),

    /// Download the statement table as a spreadsheet
    Download {
        /// Download the table for this history record
        #[arg(long)]
        id: Option<String>,
    },

    /// Show or toggle the display theme
    Theme {
        /// Switch between light and dark
        #[arg(long)]
        toggle: bool,
    },
}

#[derive(Args, Debug)]
pub struct UploadArgs {
    /// Statement file chosen from disk
    #[arg(conflicts_with = "path")]
    pub file: Option<PathBuf>,

    /// Enter the statement location as a path string instead
    #[arg(long)]
    pub path: Option<String>,

    /// Download the spreadsheet right after the upload
    #[arg(long)]
    pub download: bool,
}

#[derive(Subcommand, Debug)]
pub enum HistoryCommand {
    /// List history records, newest first
    List,

    /// Show a single history record (use `download --id ID` to export it)
    Show {
        id: String,
    },

    /// Delete a history record
    Remove {
        id: String,
    },
}

pub fn parse() -> CliOptions {
    CliOptions::parse()
}
