//! Output Format Module
//!
//! Strategy Patternによるテーブルプレビュー出力の抽象化を提供するモジュール。

mod formatters;

use crate::api::PreviewFormat;
use crate::error::Result;
use crate::types::TableData;
use std::io::Write;

pub use formatters::*;

/// 出力フォーマッター（Strategy Pattern）
///
/// 各プレビュー形式（Markdown, JSON）をenumとして表現します。
#[derive(Debug, Clone, Copy)]
pub enum OutputFormatter {
    Markdown,
    Json,
}

impl OutputFormatter {
    /// プレビュー形式からフォーマッターを生成
    pub fn from_format(format: PreviewFormat) -> Self {
        match format {
            PreviewFormat::Markdown => OutputFormatter::Markdown,
            PreviewFormat::Json => OutputFormatter::Json,
        }
    }

    /// テーブルを指定されたフォーマットで出力する
    ///
    /// # 引数
    ///
    /// * `table` - 出力するテーブル
    /// * `writer` - 出力先のライター
    pub fn render<W: Write>(&self, table: &TableData, writer: &mut W) -> Result<()> {
        match self {
            OutputFormatter::Markdown => MarkdownFormatter.render(table, writer),
            OutputFormatter::Json => JsonFormatter.render(table, writer),
        }
    }

    /// テーブルを文字列として出力する
    pub fn render_to_string(&self, table: &TableData) -> Result<String> {
        let mut buffer = Vec::new();
        self.render(table, &mut buffer)?;

        let result = String::from_utf8(buffer).map_err(|e| {
            crate::error::BankGlError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })?;

        Ok(result)
    }
}
