//! Upload Flow Module
//!
//! アップロード画面の状態遷移（未選択 → 選択済み → アップロード済み → 未選択）を扱うモジュール。
//! ファイルの内容は一切検査せず、処理はログ出力のみのプレースホルダーです。

use std::path::Path;

use tracing::info;

use crate::api::UploadMethod;
use crate::error::{BankGlError, Result};
use crate::history::HistoryStore;
use crate::storage::KeyValueStore;
use crate::types::{format_file_size, DEFAULT_SOURCE_FILE_NAME};

/// ファイル未選択で確定したときのメッセージ
pub const NO_FILE_MESSAGE: &str = "Please select a file before proceeding";

/// パス未入力で確定したときのメッセージ
pub const NO_PATH_MESSAGE: &str = "Please enter a file path before proceeding";

/// アップロード済みの状態で再度確定したときのメッセージ
pub const ALREADY_UPLOADED_MESSAGE: &str =
    "This file has already been uploaded; process another file first";

/// アップロード画面の状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadState {
    /// ファイル未選択
    Idle,
    /// ファイル選択済み（未確定）
    FileSelected,
    /// 確定済み（履歴レコードが作成され選択されている）
    Uploaded,
}

/// ファイル選択ダイアログで選ばれたファイル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    /// ファイル名
    pub name: String,
    /// ファイルサイズ（バイト、不明な場合は`None`）
    pub size: Option<u64>,
}

impl SelectedFile {
    /// ファイル名のみで生成する
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size: None,
        }
    }

    /// ファイルサイズを指定する
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    /// ディスク上のファイルから生成する（内容は読まず、メタデータのみ参照する）
    pub fn from_path(path: &Path) -> Result<Self> {
        let metadata = std::fs::metadata(path)?;
        if !metadata.is_file() {
            return Err(BankGlError::Validation(format!(
                "Not a file: {}",
                path.display()
            )));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self::new(name).with_size(metadata.len()))
    }
}

/// 結果画面へ渡すナビゲーション状態
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    /// 選択されたファイル名（パス入力の場合は`None`）
    pub file_name: Option<String>,
    /// 入力されたパス（ファイル選択の場合は`None`）
    pub file_path: Option<String>,
    /// アップロード方式
    pub upload_method: UploadMethod,
}

/// 結果画面に表示する元ファイル名を決定する
///
/// ファイル名があればそれを、無ければパスの最後の要素（`/`と`\`の両方で分割）を使用します。
/// ナビゲーション状態が無い場合は既定のサンプル名を返します。
pub fn source_file_name(navigation: Option<&NavigationState>) -> String {
    let Some(nav) = navigation else {
        return DEFAULT_SOURCE_FILE_NAME.to_string();
    };

    if let Some(name) = nav.file_name.as_deref().filter(|n| !n.is_empty()) {
        return name.to_string();
    }

    if let Some(path) = nav.file_path.as_deref().filter(|p| !p.is_empty()) {
        return last_path_segment(path).to_string();
    }

    DEFAULT_SOURCE_FILE_NAME.to_string()
}

/// パスの最後の要素（空の場合はパス全体）
fn last_path_segment(path: &str) -> &str {
    match path.rsplit(['/', '\\']).next() {
        Some(segment) if !segment.is_empty() => segment,
        _ => path,
    }
}

/// アップロード画面の状態機械
///
/// # 使用例
///
/// ```rust
/// use bankgl::{HistoryStore, MemoryStore, SelectedFile, UploadFlow, UploadState};
///
/// # fn main() -> Result<(), bankgl::BankGlError> {
/// let mut history = HistoryStore::open(MemoryStore::new());
/// let mut flow = UploadFlow::new();
///
/// flow.select_file(SelectedFile::new("statement.pdf"));
/// assert_eq!(flow.state(), UploadState::FileSelected);
///
/// flow.confirm(&mut history)?;
/// assert_eq!(flow.state(), UploadState::Uploaded);
///
/// flow.reset();
/// assert_eq!(flow.state(), UploadState::Idle);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct UploadFlow {
    method: UploadMethod,
    selected_file: Option<SelectedFile>,
    file_path: String,
    uploaded: bool,
    display_name: Option<String>,
    error: Option<String>,
}

impl UploadFlow {
    /// 未選択状態で生成する
    pub fn new() -> Self {
        Self::default()
    }

    /// 現在の状態
    pub fn state(&self) -> UploadState {
        if self.uploaded {
            UploadState::Uploaded
        } else if self.has_input() {
            UploadState::FileSelected
        } else {
            UploadState::Idle
        }
    }

    /// 現在のアップロード方式
    pub fn method(&self) -> UploadMethod {
        self.method
    }

    /// アップロード方式を切り替える
    pub fn set_method(&mut self, method: UploadMethod) {
        self.method = method;
        self.error = None;
    }

    /// ファイルを選択する（内容の検証は行わない）
    ///
    /// アップロード済みの状態で選択した場合は、新しいアップロードとして扱います。
    pub fn select_file(&mut self, file: SelectedFile) {
        if self.uploaded {
            self.reset();
        }
        self.method = UploadMethod::FileManager;
        self.selected_file = Some(file);
        self.error = None;
    }

    /// ファイルパスを入力する
    pub fn set_path(&mut self, path: impl Into<String>) {
        if self.uploaded {
            self.reset();
        }
        self.method = UploadMethod::Path;
        self.file_path = path.into();
        self.error = None;
    }

    /// 選択中のファイルを解除する
    pub fn clear_file(&mut self) {
        self.selected_file = None;
    }

    /// 選択中のファイル
    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.selected_file.as_ref()
    }

    /// アップロード済みファイルの表示名
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// 画面内に表示する検証エラー
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// 検証エラーを閉じる
    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// 選択を確定し、履歴に追加する
    ///
    /// # 戻り値
    ///
    /// * `Ok(NavigationState)` - 結果画面へ渡す状態
    /// * `Err(BankGlError::Validation)` - ファイル（またはパス）が無い場合。
    ///   メッセージは`error()`からも参照でき、永続化された状態は変更されない
    /// * `Err(BankGlError)` - 履歴の永続化に失敗した場合
    pub fn confirm<S: KeyValueStore>(
        &mut self,
        history: &mut HistoryStore<S>,
    ) -> Result<NavigationState> {
        if self.uploaded {
            return Err(self.fail(ALREADY_UPLOADED_MESSAGE));
        }

        let (navigation, display_name, size) = match self.method {
            UploadMethod::FileManager => {
                let Some(file) = self.selected_file.as_ref() else {
                    return Err(self.fail(NO_FILE_MESSAGE));
                };
                info!("processing selected file: {}", file.name);
                (
                    NavigationState {
                        file_name: Some(file.name.clone()),
                        file_path: None,
                        upload_method: UploadMethod::FileManager,
                    },
                    file.name.clone(),
                    file.size,
                )
            }
            UploadMethod::Path => {
                let path = self.file_path.trim();
                if path.is_empty() {
                    return Err(self.fail(NO_PATH_MESSAGE));
                }
                info!("processing file from path: {}", path);
                (
                    NavigationState {
                        file_name: None,
                        file_path: Some(path.to_string()),
                        upload_method: UploadMethod::Path,
                    },
                    last_path_segment(path).to_string(),
                    None,
                )
            }
        };

        history.add(display_name.clone(), size.map(format_file_size))?;

        self.error = None;
        self.uploaded = true;
        self.display_name = Some(display_name);
        Ok(navigation)
    }

    /// 「別のファイルを処理する」: 選択・確定状態・表示名をすべて消去する
    pub fn reset(&mut self) {
        self.selected_file = None;
        self.file_path.clear();
        self.uploaded = false;
        self.display_name = None;
        self.error = None;
    }

    fn has_input(&self) -> bool {
        match self.method {
            UploadMethod::FileManager => self.selected_file.is_some(),
            UploadMethod::Path => !self.file_path.trim().is_empty(),
        }
    }

    fn fail(&mut self, message: &str) -> BankGlError {
        self.error = Some(message.to_string());
        BankGlError::Validation(message.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn empty_history() -> HistoryStore<MemoryStore> {
        HistoryStore::open(MemoryStore::new())
    }

    #[test]
    fn test_initial_state_is_idle() {
        let flow = UploadFlow::new();
        assert_eq!(flow.state(), UploadState::Idle);
        assert_eq!(flow.method(), UploadMethod::FileManager);
        assert!(flow.error().is_none());
    }

    #[test]
    fn test_select_file_moves_to_file_selected() {
        let mut flow = UploadFlow::new();
        flow.select_file(SelectedFile::new("statement.pdf"));
        assert_eq!(flow.state(), UploadState::FileSelected);
        assert_eq!(flow.selected_file().unwrap().name, "statement.pdf");
    }

    #[test]
    fn test_confirm_adds_history_and_selects() {
        let mut history = empty_history();
        let mut flow = UploadFlow::new();
        flow.select_file(SelectedFile::new("statement.pdf").with_size(42 * 1024));

        let nav = flow.confirm(&mut history).unwrap();
        assert_eq!(flow.state(), UploadState::Uploaded);
        assert_eq!(flow.display_name(), Some("statement.pdf"));
        assert_eq!(nav.file_name.as_deref(), Some("statement.pdf"));
        assert_eq!(nav.upload_method, UploadMethod::FileManager);

        assert_eq!(history.len(), 1);
        let record = history.selected().unwrap();
        assert_eq!(record.file_name, "statement.pdf");
        assert_eq!(record.file_size.as_deref(), Some("42 KB"));
    }

    #[test]
    fn test_confirm_without_file_is_validation_error() {
        let mut history = empty_history();
        let mut flow = UploadFlow::new();

        match flow.confirm(&mut history) {
            Err(BankGlError::Validation(msg)) => assert_eq!(msg, NO_FILE_MESSAGE),
            _ => panic!("Expected Validation error"),
        }
        assert_eq!(flow.error(), Some(NO_FILE_MESSAGE));
        assert!(history.is_empty());
    }

    // 選択が確定直前に解除された場合は選択済み状態に留まる
    #[test]
    fn test_confirm_after_selection_cleared() {
        let mut history = empty_history();
        let mut flow = UploadFlow::new();
        flow.select_file(SelectedFile::new("statement.pdf"));
        flow.clear_file();

        assert!(flow.confirm(&mut history).is_err());
        assert_ne!(flow.state(), UploadState::Uploaded);
        assert!(history.is_empty());
    }

    #[test]
    fn test_dismiss_error() {
        let mut history = empty_history();
        let mut flow = UploadFlow::new();
        let _ = flow.confirm(&mut history);

        flow.dismiss_error();
        assert!(flow.error().is_none());
    }

    #[test]
    fn test_selecting_file_clears_error() {
        let mut history = empty_history();
        let mut flow = UploadFlow::new();
        let _ = flow.confirm(&mut history);

        flow.select_file(SelectedFile::new("a.pdf"));
        assert!(flow.error().is_none());
    }

    #[test]
    fn test_confirm_twice_is_rejected() {
        let mut history = empty_history();
        let mut flow = UploadFlow::new();
        flow.select_file(SelectedFile::new("a.pdf"));
        flow.confirm(&mut history).unwrap();

        assert!(matches!(
            flow.confirm(&mut history),
            Err(BankGlError::Validation(_))
        ));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let mut history = empty_history();
        let mut flow = UploadFlow::new();
        flow.select_file(SelectedFile::new("a.pdf"));
        flow.confirm(&mut history).unwrap();

        flow.reset();
        assert_eq!(flow.state(), UploadState::Idle);
        assert!(flow.selected_file().is_none());
        assert!(flow.display_name().is_none());
        // 履歴は残る
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_select_after_upload_starts_over() {
        let mut history = empty_history();
        let mut flow = UploadFlow::new();
        flow.select_file(SelectedFile::new("a.pdf"));
        flow.confirm(&mut history).unwrap();

        flow.select_file(SelectedFile::new("b.pdf"));
        assert_eq!(flow.state(), UploadState::FileSelected);
        assert!(flow.display_name().is_none());
    }

    #[test]
    fn test_path_method() {
        let mut history = empty_history();
        let mut flow = UploadFlow::new();
        flow.set_path("C:\\statements\\april.pdf");
        assert_eq!(flow.state(), UploadState::FileSelected);

        let nav = flow.confirm(&mut history).unwrap();
        assert_eq!(nav.file_name, None);
        assert_eq!(nav.file_path.as_deref(), Some("C:\\statements\\april.pdf"));
        assert_eq!(nav.upload_method, UploadMethod::Path);
        assert_eq!(history.records()[0].file_name, "april.pdf");
        assert_eq!(history.records()[0].file_size, None);
    }

    #[test]
    fn test_blank_path_is_validation_error() {
        let mut history = empty_history();
        let mut flow = UploadFlow::new();
        flow.set_path("   ");

        match flow.confirm(&mut history) {
            Err(BankGlError::Validation(msg)) => assert_eq!(msg, NO_PATH_MESSAGE),
            _ => panic!("Expected Validation error"),
        }
    }

    #[test]
    fn test_selected_file_from_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("statement.pdf");
        std::fs::write(&path, vec![0u8; 2048]).unwrap();

        let file = SelectedFile::from_path(&path).unwrap();
        assert_eq!(file.name, "statement.pdf");
        assert_eq!(file.size, Some(2048));
    }

    #[test]
    fn test_selected_file_from_directory_is_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(matches!(
            SelectedFile::from_path(dir.path()),
            Err(BankGlError::Validation(_))
        ));
    }

    #[test]
    fn test_source_file_name_defaults() {
        assert_eq!(source_file_name(None), DEFAULT_SOURCE_FILE_NAME);

        let nav = NavigationState {
            file_name: None,
            file_path: None,
            upload_method: UploadMethod::FileManager,
        };
        assert_eq!(source_file_name(Some(&nav)), DEFAULT_SOURCE_FILE_NAME);
    }

    #[test]
    fn test_source_file_name_prefers_file_name() {
        let nav = NavigationState {
            file_name: Some("statement.pdf".to_string()),
            file_path: Some("/tmp/other.pdf".to_string()),
            upload_method: UploadMethod::FileManager,
        };
        assert_eq!(source_file_name(Some(&nav)), "statement.pdf");
    }

    #[test]
    fn test_source_file_name_from_path() {
        let nav = NavigationState {
            file_name: None,
            file_path: Some("/home/user/april.pdf".to_string()),
            upload_method: UploadMethod::Path,
        };
        assert_eq!(source_file_name(Some(&nav)), "april.pdf");

        let nav = NavigationState {
            file_path: Some("C:/docs\\may.pdf".to_string()),
            ..nav
        };
        assert_eq!(source_file_name(Some(&nav)), "may.pdf");
    }

    #[test]
    fn test_source_file_name_trailing_separator() {
        let nav = NavigationState {
            file_name: None,
            file_path: Some("/statements/".to_string()),
            upload_method: UploadMethod::Path,
        };
        assert_eq!(source_file_name(Some(&nav)), "/statements/");
    }
}
