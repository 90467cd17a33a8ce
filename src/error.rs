//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。

use thiserror::Error;

/// bankglクレート全体で使用するエラー型
///
/// 履歴ストアの永続化、スプレッドシートの生成・保存、アップロード操作の検証など、
/// すべての失敗をこの型に集約します。
///
/// # エラーの種類
///
/// - `Io`: I/O操作中に発生したエラー（ストアファイルの書き込み失敗など）
/// - `Json`: 永続化データのシリアライズ／デシリアライズに失敗したエラー
/// - `Xlsx`: ワークブックの構築・シリアライズ中に発生したエラー（rust_xlsxwriter由来）
/// - `Config`: 設定やテーブル形状の検証に失敗したエラー
/// - `Validation`: ユーザー入力の検証エラー（ファイル未選択のまま確定した場合など）
/// - `NotFound`: 指定されたIDの履歴レコードが存在しない
///
/// # 使用例
///
/// ```rust,no_run
/// use bankgl::{BankGlError, JsonFileStore, KeyValueStore};
///
/// fn read_history(path: &str) -> Result<Option<String>, BankGlError> {
///     let store = JsonFileStore::new(path);
///     store.get("bank-gl-history")  // Io / Jsonエラーがそのまま伝播する
/// }
/// ```
#[derive(Error, Debug)]
pub enum BankGlError {
    /// I/O操作中に発生したエラー
    ///
    /// `#[from]`属性により、`std::io::Error`から自動的に変換されます。
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSONのシリアライズ／デシリアライズエラー
    ///
    /// ストアファイルが壊れている場合などに発生します。
    /// 履歴の読み込み時には呼び出し元へ伝播せず、空の履歴として扱われます。
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// ワークブックの構築・シリアライズエラー
    ///
    /// rust_xlsxwriterがシート名の検証や書き込みに失敗した場合に発生します。
    #[error("Failed to build spreadsheet: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// 設定の検証に失敗したエラー
    ///
    /// `ExporterBuilder::build()`や`TableData::new()`で無効な値が検出された場合に発生します。
    ///
    /// # 例
    ///
    /// ```rust,no_run
    /// use bankgl::{BankGlError, ExporterBuilder};
    ///
    /// let result = ExporterBuilder::new()
    ///     .with_sheet_name("Bank:Statement")  // 使用できない文字を含む
    ///     .build();
    ///
    /// match result {
    ///     Err(BankGlError::Config(msg)) => {
    ///         println!("設定エラー: {}", msg);
    ///     }
    ///     _ => {}
    /// }
    /// ```
    #[error("Configuration error: {0}")]
    Config(String),

    /// ユーザー入力の検証エラー
    ///
    /// 画面内に表示して閉じられる、致命的でないエラーです。
    /// 永続化された状態は変更されません。
    #[error("{0}")]
    Validation(String),

    /// 履歴レコードが見つからないエラー
    #[error("History record not found: {id}")]
    NotFound {
        /// 検索したレコードID
        id: String,
    },
}

/// クレート内で使用する`Result`の別名
pub type Result<T> = std::result::Result<T, BankGlError>;
