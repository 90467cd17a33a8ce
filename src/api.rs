//! Public API Types
//!
//! 公開APIで使用する列挙型を定義するモジュール。

use serde::{Deserialize, Serialize};

/// 出力ファイル名の正規化方式
///
/// ダウンロードするスプレッドシートのファイル名をどのように決定するかを指定します。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum NameNormalization {
    /// `.xlsx`拡張子が無ければ付与する（デフォルト）
    ///
    /// 例: `report` → `report.xlsx`、`report.xlsx` → `report.xlsx`
    #[default]
    AppendExtension,

    /// 元ファイルの拡張子（`.pdf`）を取り除いてから`.xlsx`を付与する
    ///
    /// 履歴からのダウンロードで使用します。
    ///
    /// 例: `statement.pdf` → `statement.xlsx`
    StripSourceExtension,
}

/// 表示テーマ
///
/// ストアのキー`theme-mode`に`"light"`または`"dark"`として保存されます。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// ライトテーマ（デフォルト）
    #[default]
    Light,

    /// ダークテーマ
    Dark,
}

impl ThemeMode {
    /// 反対側のテーマを返す
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    /// ストアに保存する文字列表現
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    /// 保存された文字列を解釈する（未知の値は`None`）
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(ThemeMode::Light),
            "dark" => Some(ThemeMode::Dark),
            _ => None,
        }
    }
}

/// アップロード方式
///
/// ファイルマネージャーで選択するか、パスを直接入力するかを指定します。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UploadMethod {
    /// ファイル選択ダイアログで選択（デフォルト）
    #[default]
    FileManager,

    /// ファイルパスを直接入力
    Path,
}

/// テーブルのプレビュー形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum PreviewFormat {
    /// Markdownテーブル形式（デフォルト）
    ///
    /// # 出力例
    ///
    /// ```markdown
    /// | Date       | Amount    |
    /// |------------|-----------|
    /// | 2023-04-01 | $5,000.00 |
    /// ```
    #[default]
    Markdown,

    /// JSON形式
    ///
    /// # 出力例
    ///
    /// ```json
    /// {
    ///   "headers": ["Date", "Amount"],
    ///   "rows": [["2023-04-01", "$5,000.00"]]
    /// }
    /// ```
    Json,
}
