//! Builder Module
//!
//! Fluent Builder APIを提供し、`Exporter`インスタンスを段階的に構築する。

use std::path::PathBuf;

use rust_xlsxwriter::Workbook;
use tracing::info;

use crate::api::NameNormalization;
use crate::download::DownloadTarget;
use crate::error::{BankGlError, Result};
use crate::types::TableData;

/// スプレッドシートの拡張子
pub const XLSX_EXTENSION: &str = ".xlsx";

/// 元の明細ファイルの拡張子（履歴からのダウンロード時に取り除く）
pub const SOURCE_EXTENSION: &str = ".pdf";

/// Office Open XMLスプレッドシートのMIMEタイプ
pub const XLSX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// 既定のシート名
pub const DEFAULT_SHEET_NAME: &str = "Bank Statement";

/// ファイル名が空の場合に使用する名前
const FALLBACK_BASE_NAME: &str = "export";

/// Excelのシート名の最大長（文字数）
const MAX_SHEET_NAME_LEN: usize = 31;

/// Excelの最大行数
const MAX_ROWS: usize = 1_048_576;

/// Excelの最大列数
const MAX_COLS: usize = 16_384;

/// エクスポート処理の設定を保持する内部構造体
#[derive(Debug, Clone)]
pub(crate) struct ExportConfig {
    /// シート名
    pub sheet_name: String,

    /// ファイル名の正規化方式
    pub normalization: NameNormalization,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            normalization: NameNormalization::AppendExtension,
        }
    }
}

/// Fluent Builder APIを提供する構造体
///
/// `Exporter`インスタンスを段階的に構築するためのビルダーです。
/// すべての設定項目にデフォルト値が設定されており、必要な設定のみをオーバーライドできます。
///
/// # 使用例
///
/// ```rust
/// use bankgl::{ExporterBuilder, NameNormalization};
///
/// # fn main() -> Result<(), bankgl::BankGlError> {
/// let exporter = ExporterBuilder::new()
///     .with_sheet_name("April 2023")
///     .with_normalization(NameNormalization::StripSourceExtension)
///     .build()?;
/// assert_eq!(exporter.file_name("statement.pdf"), "statement.xlsx");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ExporterBuilder {
    /// 内部設定（構築中）
    config: ExportConfig,
}

impl Default for ExporterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ExporterBuilder {
    /// デフォルト設定を持つビルダーインスタンスを生成する
    ///
    /// # デフォルト設定
    ///
    /// - シート名: `Bank Statement`
    /// - ファイル名の正規化: `.xlsx`の付与のみ
    pub fn new() -> Self {
        Self {
            config: ExportConfig::default(),
        }
    }

    /// シート名を指定する
    pub fn with_sheet_name(mut self, name: impl Into<String>) -> Self {
        self.config.sheet_name = name.into();
        self
    }

    /// ファイル名の正規化方式を指定する
    pub fn with_normalization(mut self, normalization: NameNormalization) -> Self {
        self.config.normalization = normalization;
        self
    }

    /// 設定を検証し、`Exporter`インスタンスを生成する
    ///
    /// # 発生し得るエラー
    ///
    /// * `BankGlError::Config(String)`: シート名がExcelの規則に違反している場合
    ///   * 空、または31文字を超える
    ///   * `[ ] : * ? / \`のいずれかを含む
    ///   * アポストロフィで始まる、または終わる
    pub fn build(self) -> Result<Exporter> {
        validate_sheet_name(&self.config.sheet_name)?;
        Ok(Exporter::new(self.config))
    }
}

/// シート名の検証
fn validate_sheet_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(BankGlError::Config("Sheet name must not be empty".to_string()));
    }

    let len = name.chars().count();
    if len > MAX_SHEET_NAME_LEN {
        return Err(BankGlError::Config(format!(
            "Sheet name is too long: {} characters (max: {})",
            len, MAX_SHEET_NAME_LEN
        )));
    }

    if let Some(c) = name
        .chars()
        .find(|c| matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
    {
        return Err(BankGlError::Config(format!(
            "Sheet name contains invalid character '{}': {}",
            c, name
        )));
    }

    if name.starts_with('\'') || name.ends_with('\'') {
        return Err(BankGlError::Config(format!(
            "Sheet name must not start or end with an apostrophe: {}",
            name
        )));
    }

    Ok(())
}

/// 出力ファイル名を正規化する
///
/// 前後の空白を取り除き、`.xlsx`拡張子（大文字小文字を区別しない）が無ければ付与します。
/// `NameNormalization::StripSourceExtension`の場合は、先に末尾の`.pdf`を取り除きます。
/// 結果が空になる場合は`export.xlsx`を返します。
///
/// # 使用例
///
/// ```rust
/// use bankgl::{normalize_file_name, NameNormalization};
///
/// assert_eq!(normalize_file_name("report", NameNormalization::AppendExtension), "report.xlsx");
/// assert_eq!(normalize_file_name("report.XLSX", NameNormalization::AppendExtension), "report.XLSX");
/// assert_eq!(
///     normalize_file_name("statement.pdf", NameNormalization::StripSourceExtension),
///     "statement.xlsx"
/// );
/// ```
pub fn normalize_file_name(base: &str, normalization: NameNormalization) -> String {
    let mut name = base.trim();

    if normalization == NameNormalization::StripSourceExtension {
        if let Some(stem) = strip_suffix_ignore_case(name, SOURCE_EXTENSION) {
            name = stem.trim_end();
        }
    }

    if name.is_empty() {
        name = FALLBACK_BASE_NAME;
    }

    if ends_with_ignore_case(name, XLSX_EXTENSION) {
        name.to_string()
    } else {
        format!("{}{}", name, XLSX_EXTENSION)
    }
}

fn ends_with_ignore_case(value: &str, suffix: &str) -> bool {
    strip_suffix_ignore_case(value, suffix).is_some()
}

fn strip_suffix_ignore_case<'a>(value: &'a str, suffix: &str) -> Option<&'a str> {
    let split = value.len().checked_sub(suffix.len())?;
    if !value.is_char_boundary(split) {
        return None;
    }
    let (stem, tail) = value.split_at(split);
    tail.eq_ignore_ascii_case(suffix).then_some(stem)
}

/// エクスポート結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    /// 正規化されたファイル名
    pub file_name: String,

    /// 保存先のパス
    pub path: PathBuf,

    /// ファイルサイズ（バイト）
    pub size: usize,
}

/// エクスポート処理のファサード
///
/// `TableData`を単一シートのスプレッドシートに変換します。1行目がヘッダー、
/// 2行目以降がデータ行です。ワークブックはメモリ上で完全に構築してから保存先へ
/// 渡すため、失敗時に不完全なファイルが残ることはありません。
///
/// # 使用例
///
/// ```rust,no_run
/// use bankgl::{DirectoryTarget, ExporterBuilder, TableData};
///
/// # fn main() -> Result<(), bankgl::BankGlError> {
/// let exporter = ExporterBuilder::new().build()?;
/// let table = TableData::new(["Date", "Amount"], [["2023-04-01", "$5,000.00"]])?;
/// let download = exporter.export(&table, "report", &DirectoryTarget::new("downloads"))?;
/// assert_eq!(download.file_name, "report.xlsx");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Exporter {
    /// エクスポート設定
    config: ExportConfig,
}

impl Exporter {
    pub(crate) fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    /// シート名
    pub fn sheet_name(&self) -> &str {
        &self.config.sheet_name
    }

    /// 設定された正規化方式でファイル名を正規化する
    pub fn file_name(&self, base: &str) -> String {
        normalize_file_name(base, self.config.normalization)
    }

    /// テーブルをスプレッドシートに変換し、保存先へ保存する
    ///
    /// # 引数
    ///
    /// * `table` - 出力するテーブル
    /// * `base_file_name` - 希望するファイル名（拡張子は正規化される）
    /// * `target` - 保存先
    ///
    /// # 戻り値
    ///
    /// * `Ok(Download)` - 保存に成功した場合
    /// * `Err(BankGlError)` - 構築・シリアライズ・保存のいずれかに失敗した場合
    pub fn export<T: DownloadTarget + ?Sized>(
        &self,
        table: &TableData,
        base_file_name: &str,
        target: &T,
    ) -> Result<Download> {
        self.export_with(table, base_file_name, self.config.normalization, target)
    }

    /// 正規化方式を指定してエクスポートする
    ///
    /// 履歴からのダウンロードのように、呼び出しごとに正規化方式が異なる場合に使用します。
    pub fn export_with<T: DownloadTarget + ?Sized>(
        &self,
        table: &TableData,
        base_file_name: &str,
        normalization: NameNormalization,
        target: &T,
    ) -> Result<Download> {
        let file_name = normalize_file_name(base_file_name, normalization);
        let buffer = self.to_buffer(table)?;
        let path = target.save(&file_name, XLSX_MIME_TYPE, &buffer)?;

        info!(
            "exported {} row(s) to {} ({} bytes)",
            table.row_count(),
            path.display(),
            buffer.len()
        );

        Ok(Download {
            file_name,
            path,
            size: buffer.len(),
        })
    }

    /// テーブルをスプレッドシートのバイト列に変換する
    pub fn to_buffer(&self, table: &TableData) -> Result<Vec<u8>> {
        let mut workbook = self.build_workbook(table)?;
        Ok(workbook.save_to_buffer()?)
    }

    /// ワークブックを構築する（内部ヘルパー）
    fn build_workbook(&self, table: &TableData) -> Result<Workbook> {
        // 1. 表の大きさの検証（ヘッダー行を含む）
        if table.row_count() + 1 > MAX_ROWS {
            return Err(BankGlError::Config(format!(
                "Too many rows: {} (max: {})",
                table.row_count() + 1,
                MAX_ROWS
            )));
        }
        if table.column_count() > MAX_COLS {
            return Err(BankGlError::Config(format!(
                "Too many columns: {} (max: {})",
                table.column_count(),
                MAX_COLS
            )));
        }

        // 2. シートの作成
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(self.config.sheet_name.as_str())?;

        // 3. ヘッダー行とデータ行の書き込み
        let lines = std::iter::once(table.headers()).chain(table.rows().iter().map(Vec::as_slice));
        for (row_idx, cells) in lines.enumerate() {
            for (col_idx, cell) in cells.iter().enumerate() {
                worksheet.write_string(row_idx as u32, col_idx as u16, cell.as_str())?;
            }
        }

        Ok(workbook)
    }
}
