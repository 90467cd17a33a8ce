//! Application State Module
//!
//! 履歴・テーマ・アップロード画面・エクスポートをまとめたアプリケーション状態を提供するモジュール。
//! ダウンロードの失敗はログに記録し、`Notifier`経由で利用者に通知します。

use tracing::{error, info};

use crate::api::{NameNormalization, ThemeMode, UploadMethod};
use crate::builder::{Download, Exporter};
use crate::download::DownloadTarget;
use crate::error::{BankGlError, Result};
use crate::history::HistoryStore;
use crate::preferences::ThemePreference;
use crate::storage::KeyValueStore;
use crate::types::TableData;
use crate::upload::{source_file_name, NavigationState, SelectedFile, UploadFlow};

/// ダウンロード失敗時に表示するメッセージ
pub const DOWNLOAD_FAILED_MESSAGE: &str = "Download failed. Please try again.";

/// 利用者への通知（ブラウザの`alert`に相当）
pub trait Notifier {
    /// メッセージを通知する
    fn alert(&self, message: &str);
}

/// 標準エラー出力へ通知する`Notifier`
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn alert(&self, message: &str) {
        eprintln!("{}", message);
    }
}

/// アプリケーション状態
///
/// 履歴とテーマは同じストアを共有します。表示中のテーブルは常にサンプルの明細です。
///
/// # 使用例
///
/// ```rust
/// use bankgl::{App, ExporterBuilder, MemoryStore, SelectedFile, StderrNotifier};
///
/// # fn main() -> Result<(), bankgl::BankGlError> {
/// let exporter = ExporterBuilder::new().build()?;
/// let mut app = App::new(MemoryStore::new(), exporter, StderrNotifier);
///
/// app.select_file(SelectedFile::new("statement.pdf"));
/// app.confirm_upload()?;
/// assert_eq!(app.source_file_name(), "statement.pdf");
/// assert_eq!(app.history().len(), 1);
/// # Ok(())
/// # }
/// ```
pub struct App<S: KeyValueStore + Clone, N: Notifier> {
    history: HistoryStore<S>,
    theme: ThemePreference<S>,
    upload: UploadFlow,
    exporter: Exporter,
    table: TableData,
    navigation: Option<NavigationState>,
    notifier: N,
}

impl<S: KeyValueStore + Clone, N: Notifier> App<S, N> {
    /// ストアから履歴とテーマを読み込んでアプリケーション状態を生成する
    pub fn new(store: S, exporter: Exporter, notifier: N) -> Self {
        Self {
            history: HistoryStore::open(store.clone()),
            theme: ThemePreference::open(store),
            upload: UploadFlow::new(),
            exporter,
            table: TableData::sample_statement(),
            navigation: None,
            notifier,
        }
    }

    /// 履歴
    pub fn history(&self) -> &HistoryStore<S> {
        &self.history
    }

    /// 現在のテーマ
    pub fn theme(&self) -> ThemeMode {
        self.theme.mode()
    }

    /// テーマを切り替える
    pub fn toggle_theme(&mut self) -> Result<ThemeMode> {
        self.theme.toggle()
    }

    /// アップロード画面の状態
    pub fn upload(&self) -> &UploadFlow {
        &self.upload
    }

    /// 表示中のテーブル
    pub fn table(&self) -> &TableData {
        &self.table
    }

    /// 結果画面へのナビゲーション状態
    pub fn navigation(&self) -> Option<&NavigationState> {
        self.navigation.as_ref()
    }

    /// 表示中の元ファイル名
    pub fn source_file_name(&self) -> String {
        source_file_name(self.navigation.as_ref())
    }

    /// アップロード方式を切り替える
    pub fn set_upload_method(&mut self, method: UploadMethod) {
        self.upload.set_method(method);
    }

    /// ファイルを選択する
    pub fn select_file(&mut self, file: SelectedFile) {
        self.upload.select_file(file);
    }

    /// ファイルパスを入力する
    pub fn set_path(&mut self, path: impl Into<String>) {
        self.upload.set_path(path);
    }

    /// 検証エラーを閉じる
    pub fn dismiss_error(&mut self) {
        self.upload.dismiss_error();
    }

    /// アップロードを確定し、履歴に追加して結果画面へ遷移する
    pub fn confirm_upload(&mut self) -> Result<NavigationState> {
        let navigation = self.upload.confirm(&mut self.history)?;
        self.navigation = Some(navigation.clone());
        Ok(navigation)
    }

    /// 「別のファイルを処理する」
    pub fn process_another(&mut self) {
        self.upload.reset();
        self.navigation = None;
    }

    /// 履歴のレコードを選択する
    pub fn select_history(&mut self, id: &str) -> Result<()> {
        if self.history.get(id).is_none() {
            return Err(BankGlError::NotFound { id: id.to_string() });
        }
        self.history.select(id);
        Ok(())
    }

    /// 履歴のレコードを削除する
    pub fn remove_history(&mut self, id: &str) -> Result<()> {
        self.history.remove(id)
    }

    /// 表示中のテーブルをダウンロードする
    ///
    /// ファイル名は元ファイル名に`.xlsx`を付加したものです（既に付いている場合は付加しない）。
    /// 失敗した場合はログに記録して通知し、`None`を返します。
    pub fn download_current<T: DownloadTarget + ?Sized>(&self, target: &T) -> Option<Download> {
        let base = self.source_file_name();
        let result = self.exporter.export_with(
            &self.table,
            &base,
            NameNormalization::AppendExtension,
            target,
        );
        self.finish_download(result)
    }

    /// 履歴のレコードに対応するテーブルをダウンロードする
    ///
    /// ファイル名は`.pdf`を取り除いてから`.xlsx`を付加したものです。
    /// 履歴の内容は変更しません。
    pub fn download_history_item<T: DownloadTarget + ?Sized>(
        &self,
        id: &str,
        target: &T,
    ) -> Option<Download> {
        let result = match self.history.get(id) {
            Some(record) => self.exporter.export_with(
                &self.table,
                &record.file_name,
                NameNormalization::StripSourceExtension,
                target,
            ),
            None => Err(BankGlError::NotFound { id: id.to_string() }),
        };
        self.finish_download(result)
    }

    fn finish_download(&self, result: Result<Download>) -> Option<Download> {
        match result {
            Ok(download) => {
                info!("download ready: {}", download.file_name);
                Some(download)
            }
            Err(e) => {
                error!("failed to export spreadsheet: {}", e);
                self.notifier.alert(DOWNLOAD_FAILED_MESSAGE);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::ExporterBuilder;
    use crate::storage::MemoryStore;
    use std::cell::RefCell;
    use std::path::PathBuf;

    #[derive(Default)]
    struct RecordingNotifier {
        messages: RefCell<Vec<String>>,
    }

    impl Notifier for &RecordingNotifier {
        fn alert(&self, message: &str) {
            self.messages.borrow_mut().push(message.to_string());
        }
    }

    #[derive(Default)]
    struct MemoryTarget {
        saved: RefCell<Vec<(String, Vec<u8>)>>,
    }

    impl DownloadTarget for MemoryTarget {
        fn save(&self, file_name: &str, _mime_type: &str, bytes: &[u8]) -> Result<PathBuf> {
            self.saved
                .borrow_mut()
                .push((file_name.to_string(), bytes.to_vec()));
            Ok(PathBuf::from(file_name))
        }
    }

    struct FailingTarget;

    impl DownloadTarget for FailingTarget {
        fn save(&self, _file_name: &str, _mime_type: &str, _bytes: &[u8]) -> Result<PathBuf> {
            Err(BankGlError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "denied",
            )))
        }
    }

    fn new_app(
        store: MemoryStore,
        notifier: &RecordingNotifier,
    ) -> App<MemoryStore, &RecordingNotifier> {
        let exporter = ExporterBuilder::new().build().unwrap();
        App::new(store, exporter, notifier)
    }

    #[test]
    fn test_new_app_uses_sample_table() {
        let notifier = RecordingNotifier::default();
        let app = new_app(MemoryStore::new(), &notifier);
        assert_eq!(app.table().row_count(), 16);
        assert!(app.history().is_empty());
        assert_eq!(app.theme(), ThemeMode::Light);
    }

    #[test]
    fn test_confirm_upload_sets_navigation() {
        let notifier = RecordingNotifier::default();
        let mut app = new_app(MemoryStore::new(), &notifier);

        app.select_file(SelectedFile::new("statement.pdf"));
        app.confirm_upload().unwrap();

        assert_eq!(app.source_file_name(), "statement.pdf");
        assert_eq!(app.history().len(), 1);
        assert!(app.history().selected().is_some());
    }

    #[test]
    fn test_process_another_clears_navigation() {
        let notifier = RecordingNotifier::default();
        let mut app = new_app(MemoryStore::new(), &notifier);
        app.select_file(SelectedFile::new("statement.pdf"));
        app.confirm_upload().unwrap();

        app.process_another();
        assert!(app.navigation().is_none());
        assert_eq!(app.source_file_name(), crate::types::DEFAULT_SOURCE_FILE_NAME);
        assert_eq!(app.history().len(), 1);
    }

    #[test]
    fn test_download_current_appends_extension() {
        let notifier = RecordingNotifier::default();
        let mut app = new_app(MemoryStore::new(), &notifier);
        app.select_file(SelectedFile::new("statement.pdf"));
        app.confirm_upload().unwrap();

        let target = MemoryTarget::default();
        let download = app.download_current(&target).unwrap();
        assert_eq!(download.file_name, "statement.pdf.xlsx");
        assert_eq!(target.saved.borrow().len(), 1);
        assert!(notifier.messages.borrow().is_empty());
    }

    #[test]
    fn test_download_current_default_name() {
        let notifier = RecordingNotifier::default();
        let app = new_app(MemoryStore::new(), &notifier);

        let target = MemoryTarget::default();
        let download = app.download_current(&target).unwrap();
        assert_eq!(download.file_name, "DetailedStatement_april.xlsx");
    }

    #[test]
    fn test_download_history_item_strips_pdf() {
        let notifier = RecordingNotifier::default();
        let mut app = new_app(MemoryStore::new(), &notifier);
        app.select_file(SelectedFile::new("statement.pdf"));
        app.confirm_upload().unwrap();
        let id = app.history().records()[0].id.clone();

        let target = MemoryTarget::default();
        let download = app.download_history_item(&id, &target).unwrap();
        assert_eq!(download.file_name, "statement.xlsx");
        assert_eq!(app.history().len(), 1);
    }

    #[test]
    fn test_download_failure_alerts_and_keeps_history() {
        let notifier = RecordingNotifier::default();
        let mut app = new_app(MemoryStore::new(), &notifier);
        app.select_file(SelectedFile::new("statement.pdf"));
        app.confirm_upload().unwrap();
        let before = app.history().records().to_vec();

        assert!(app.download_current(&FailingTarget).is_none());
        assert_eq!(
            notifier.messages.borrow().as_slice(),
            [DOWNLOAD_FAILED_MESSAGE.to_string()]
        );
        assert_eq!(app.history().records(), before.as_slice());
    }

    #[test]
    fn test_download_unknown_history_item_alerts() {
        let notifier = RecordingNotifier::default();
        let app = new_app(MemoryStore::new(), &notifier);

        let target = MemoryTarget::default();
        assert!(app.download_history_item("missing", &target).is_none());
        assert!(target.saved.borrow().is_empty());
        assert_eq!(notifier.messages.borrow().len(), 1);
    }

    #[test]
    fn test_select_unknown_history_is_not_found() {
        let notifier = RecordingNotifier::default();
        let mut app = new_app(MemoryStore::new(), &notifier);
        assert!(matches!(
            app.select_history("missing"),
            Err(BankGlError::NotFound { .. })
        ));
    }

    #[test]
    fn test_history_and_theme_share_store() {
        let notifier = RecordingNotifier::default();
        let store = MemoryStore::new();
        let mut app = new_app(store.clone(), &notifier);
        app.select_file(SelectedFile::new("a.pdf"));
        app.confirm_upload().unwrap();
        app.toggle_theme().unwrap();

        let reopened = new_app(store, &notifier);
        assert_eq!(reopened.history().len(), 1);
        assert_eq!(reopened.theme(), ThemeMode::Dark);
    }
}
