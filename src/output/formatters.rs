//! Output Formatters Implementation
//!
//! 各プレビュー形式の実装を提供するモジュール。

use std::io::Write;

use unicode_width::UnicodeWidthStr;

use crate::error::Result;
use crate::types::TableData;

/// Markdown形式のフォーマッター
///
/// 列幅は表示幅（全角文字は2）に基づいて揃えます。
pub struct MarkdownFormatter;

impl MarkdownFormatter {
    pub fn render<W: Write>(&self, table: &TableData, writer: &mut W) -> Result<()> {
        if table.column_count() == 0 {
            return Ok(());
        }

        let headers: Vec<String> = table.headers().iter().map(|h| escape_cell(h)).collect();
        let rows: Vec<Vec<String>> = table
            .rows()
            .iter()
            .map(|row| row.iter().map(|c| escape_cell(c)).collect())
            .collect();

        // 1. 列幅の計算
        let col_widths = calculate_column_widths(&headers, &rows);

        // 2. ヘッダー行と区切り行
        write_row(writer, &headers, &col_widths)?;
        writeln!(writer, "{}", generate_separator(&col_widths))?;

        // 3. データ行
        for row in &rows {
            write_row(writer, row, &col_widths)?;
        }

        writer.flush()?;
        Ok(())
    }
}

/// JSON形式のフォーマッター
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn render<W: Write>(&self, table: &TableData, writer: &mut W) -> Result<()> {
        serde_json::to_writer_pretty(&mut *writer, table)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }
}

/// セル内容をMarkdownテーブル用に整形する
///
/// 前後の空白を除去し、`|`をエスケープし、改行を空白に置き換えます。
fn escape_cell(content: &str) -> String {
    content
        .trim()
        .replace('|', "\\|")
        .replace(['\r', '\n'], " ")
}

/// 列幅を計算（内部ヘルパー）
///
/// 最小幅は3文字（区切り行の最小幅）です。
fn calculate_column_widths(headers: &[String], rows: &[Vec<String>]) -> Vec<usize> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.width().max(3)).collect();

    for row in rows {
        // 列数を超えるセルは無視する
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.width());
        }
    }

    widths
}

/// 1行を出力（内部ヘルパー）
fn write_row<W: Write>(writer: &mut W, cells: &[String], col_widths: &[usize]) -> Result<()> {
    write!(writer, "|")?;
    for (cell, &width) in cells.iter().zip(col_widths) {
        let padding = width.saturating_sub(cell.width());
        write!(writer, " {}{} |", cell, " ".repeat(padding))?;
    }
    writeln!(writer)?;
    Ok(())
}

/// ヘッダー区切り行を生成（内部ヘルパー）
fn generate_separator(col_widths: &[usize]) -> String {
    let mut parts = vec!["|".to_string()];

    for &width in col_widths {
        // セルの前後のスペース（各1文字）+ セル幅分のハイフン
        parts.push("-".repeat(width + 2));
        parts.push("|".to_string());
    }

    parts.join("")
}
