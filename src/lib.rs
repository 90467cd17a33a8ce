//! bankgl - Bank statement to General Ledger spreadsheet shell
//!
//! This crate provides the core of a small "bank statement to General Ledger" tool:
//! a persisted upload history, a display theme preference, an upload screen state
//! machine, and an export that turns the statement table into a single-sheet XLSX file.
//! Statement parsing itself is not performed; the table shown is a fixed sample.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use bankgl::{DirectoryTarget, ExporterBuilder, TableData};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Create an exporter with default settings
//!     let exporter = ExporterBuilder::new().build()?;
//!
//!     // Export the sample statement to ./downloads/report.xlsx
//!     let table = TableData::sample_statement();
//!     let download = exporter.export(&table, "report", &DirectoryTarget::new("downloads"))?;
//!     println!("saved {}", download.path.display());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Upload History
//!
//! ```rust,no_run
//! use bankgl::{HistoryStore, JsonFileStore};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut history = HistoryStore::open(JsonFileStore::new(".bankgl/store.json"));
//!
//!     // Newest record first; the new record becomes the selection
//!     let record = history.add("statement.pdf", Some("245 KB".to_string()))?;
//!     assert_eq!(history.selected_id(), Some(record.id.as_str()));
//!
//!     history.remove(&record.id)?;
//!     Ok(())
//! }
//! ```
//!
//! # Application State
//!
//! ```rust,no_run
//! use bankgl::{App, DirectoryTarget, ExporterBuilder, JsonFileStore, SelectedFile, StderrNotifier};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = JsonFileStore::new(".bankgl/store.json");
//!     let mut app = App::new(store, ExporterBuilder::new().build()?, StderrNotifier);
//!
//!     app.select_file(SelectedFile::new("statement.pdf"));
//!     app.confirm_upload()?;
//!
//!     // Failures are logged and reported through the notifier
//!     if let Some(download) = app.download_current(&DirectoryTarget::new(".")) {
//!         println!("saved {}", download.file_name);
//!     }
//!
//!     Ok(())
//! }
//! ```

mod api;
mod app;
mod builder;
pub mod cli;
pub mod config;
mod download;
mod error;
mod history;
pub mod logging;
mod output;
mod preferences;
mod security;
mod storage;
mod types;
mod upload;

// 公開API
pub use api::{NameNormalization, PreviewFormat, ThemeMode, UploadMethod};
pub use app::{App, Notifier, StderrNotifier, DOWNLOAD_FAILED_MESSAGE};
pub use builder::{
    normalize_file_name, Download, Exporter, ExporterBuilder, DEFAULT_SHEET_NAME, XLSX_MIME_TYPE,
};
pub use config::{load_config, AppConfig};
pub use download::{DirectoryTarget, DownloadTarget};
pub use error::{BankGlError, Result};
pub use history::{HistoryStore, HISTORY_KEY};
pub use output::OutputFormatter;
pub use preferences::{ThemePreference, THEME_KEY};
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore};
pub use types::{
    file_count_label, format_file_size, HistoryRecord, TableData, DEFAULT_SOURCE_FILE_NAME,
};
pub use upload::{
    source_file_name, NavigationState, SelectedFile, UploadFlow, UploadState, NO_FILE_MESSAGE,
    NO_PATH_MESSAGE,
};
