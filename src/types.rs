//! Types Module
//!
//! クレート全体で使用する共通データ型を定義するモジュール。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{BankGlError, Result};

/// 結果画面で表示ファイル名が無い場合に使用する既定のファイル名
pub const DEFAULT_SOURCE_FILE_NAME: &str = "DetailedStatement_april.xlsx";

/// アップロード履歴の1レコード
///
/// 作成後に変更されることはなく、ユーザーの明示的な削除でのみ破棄されます。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    /// 一意なID（時刻ベース + ランダムサフィックス）
    pub id: String,
    /// アップロードされた元ファイルの表示名
    pub file_name: String,
    /// 追加時刻（RFC 3339文字列として保存）
    pub upload_date: DateTime<Utc>,
    /// 人間が読めるファイルサイズ（例: "42 KB", "1.20 MB"）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<String>,
}

impl HistoryRecord {
    /// 履歴パネル用の日付表示（例: `Oct 18, 2026, 9:30 AM`）
    pub fn display_date(&self) -> String {
        self.upload_date.format("%b %-d, %Y, %-I:%M %p").to_string()
    }
}

/// エクスポート対象のテーブル
///
/// すべての値は表示用に整形済みの文字列です。
/// 各行の長さは常に`headers`の長さと一致します。
/// デシリアライズ時も`TableData::new`と同じ検証を通します。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTableData")]
pub struct TableData {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// 検証前のテーブル（デシリアライズ用）
#[derive(Deserialize)]
struct RawTableData {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TryFrom<RawTableData> for TableData {
    type Error = BankGlError;

    fn try_from(raw: RawTableData) -> Result<Self> {
        TableData::new(raw.headers, raw.rows)
    }
}

impl TableData {
    /// 新しいテーブルを生成する
    ///
    /// # 戻り値
    ///
    /// * `Ok(TableData)` - すべての行の長さがヘッダーと一致する場合
    /// * `Err(BankGlError::Config)` - 長さが一致しない行がある場合
    pub fn new<H, R, C>(headers: H, rows: R) -> Result<Self>
    where
        H: IntoIterator,
        H::Item: Into<String>,
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let headers: Vec<String> = headers.into_iter().map(Into::into).collect();
        let rows: Vec<Vec<String>> = rows
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();

        if let Some((index, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != headers.len())
        {
            return Err(BankGlError::Config(format!(
                "Row {} has {} cells, expected {}",
                index,
                row.len(),
                headers.len()
            )));
        }

        Ok(Self { headers, rows })
    }

    /// 列名の一覧
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// データ行の一覧
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// 列数
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// データ行数（ヘッダー行を除く）
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// 2023年4月のサンプル取引明細
    ///
    /// 実際の明細解析は行わないため、結果画面とダウンロードは常にこのデータを使用します。
    pub fn sample_statement() -> Self {
        const HEADERS: [&str; 5] = ["Date", "Description", "Reference", "Amount", "Balance"];
        const ROWS: [[&str; 5]; 16] = [
            ["2023-04-01", "Opening Balance", "REF001", "", "$5,000.00"],
            ["2023-04-02", "Grocery Store - Walmart", "POS-1234", "-$120.50", "$4,879.50"],
            ["2023-04-03", "Gas Station - Shell", "POS-1235", "-$45.00", "$4,834.50"],
            ["2023-04-05", "Salary Deposit - ABC Corp", "DEP-5678", "+$3,500.00", "$8,334.50"],
            ["2023-04-07", "Restaurant - Olive Garden", "POS-1236", "-$85.75", "$8,248.75"],
            ["2023-04-10", "Utility Bill - Electric Company", "ACH-9012", "-$150.00", "$8,098.75"],
            ["2023-04-12", "Online Shopping - Amazon", "POS-1237", "-$200.00", "$7,898.75"],
            ["2023-04-15", "Insurance Payment - State Farm", "ACH-9013", "-$125.00", "$7,773.75"],
            ["2023-04-18", "Coffee Shop - Starbucks", "POS-1238", "-$15.50", "$7,758.25"],
            ["2023-04-20", "Phone Bill - Verizon", "ACH-9014", "-$85.00", "$7,673.25"],
            ["2023-04-22", "Movie Tickets - AMC", "POS-1239", "-$35.00", "$7,638.25"],
            ["2023-04-25", "Gym Membership - Planet Fitness", "ACH-9015", "-$50.00", "$7,588.25"],
            ["2023-04-28", "Pharmacy - CVS", "POS-1240", "-$65.25", "$7,523.00"],
            ["2023-04-30", "ATM Withdrawal", "ATM-5678", "-$200.00", "$7,323.00"],
            ["2023-04-30", "Transfer to Savings", "TRF-1234", "-$500.00", "$6,823.00"],
            ["2023-04-30", "End of Month Balance", "BAL-0430", "", "$6,823.00"],
        ];

        Self {
            headers: HEADERS.iter().map(|h| h.to_string()).collect(),
            rows: ROWS
                .iter()
                .map(|row| row.iter().map(|c| c.to_string()).collect())
                .collect(),
        }
    }
}

/// バイト数を人間が読めるサイズ文字列に変換する
///
/// * 1024バイト未満: `"512 B"`
/// * 1MB未満: KB単位の整数（例: `"42 KB"`）
/// * それ以上: MB単位で小数2桁（例: `"1.20 MB"`）
pub fn format_file_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = 1024.0 * 1024.0;

    let size = bytes as f64;
    if size < KB {
        format!("{} B", bytes)
    } else if size < MB {
        format!("{:.0} KB", size / KB)
    } else {
        format!("{:.2} MB", size / MB)
    }
}

/// 履歴パネルの件数ラベル（`"1 file"` / `"3 files"`）
pub fn file_count_label(count: usize) -> String {
    if count == 1 {
        "1 file".to_string()
    } else {
        format!("{} files", count)
    }
}
