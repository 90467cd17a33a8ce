//! Configuration Module
//!
//! 設定ファイル（JSON）と環境変数からアプリケーション設定を読み込むモジュール。
//! 優先順位は「コマンドライン引数 > 環境変数 > 設定ファイル > 既定値」です。

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::builder::{Exporter, ExporterBuilder, DEFAULT_SHEET_NAME};
use crate::error::{BankGlError, Result};

/// データディレクトリを上書きする環境変数
pub const DATA_DIR_ENV: &str = "BANKGL_DATA_DIR";

/// ストアのファイル名
pub const STORE_FILE_NAME: &str = "store.json";

/// 既定のデータディレクトリ
pub const DEFAULT_DATA_DIR: &str = ".bankgl";

/// アプリケーション設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct AppConfig {
    /// 履歴とテーマを保存するディレクトリ
    pub data_dir: PathBuf,

    /// ダウンロードしたスプレッドシートの保存先
    pub output_dir: PathBuf,

    /// ワークシート名
    pub sheet_name: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            output_dir: PathBuf::from("."),
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
        }
    }
}

impl AppConfig {
    /// ストアファイルのパス
    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join(STORE_FILE_NAME)
    }

    /// 設定に基づいてエクスポーターを構築する
    pub fn exporter(&self) -> Result<Exporter> {
        ExporterBuilder::new()
            .with_sheet_name(self.sheet_name.clone())
            .build()
    }

    /// 環境変数による上書きを適用する
    ///
    /// `lookup`は環境変数名から値を引く関数です（テストでは差し替え可能）。
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(DATA_DIR_ENV).filter(|v| !v.trim().is_empty()) {
            debug!("data directory overridden by {}: {}", DATA_DIR_ENV, dir);
            self.data_dir = PathBuf::from(dir);
        }
    }

    /// 設定値を検証する
    pub fn validate(&self) -> Result<()> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(BankGlError::Config(
                "dataDir must not be empty".to_string(),
            ));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(BankGlError::Config(
                "outputDir must not be empty".to_string(),
            ));
        }
        // シート名の検証はビルダーに委ねる
        self.exporter().map(|_| ())
    }
}

/// 設定を読み込む
///
/// # 引数
///
/// * `path` - 設定ファイルのパス（`None`の場合は既定値を使用）
///
/// # 戻り値
///
/// * `Ok(AppConfig)` - 環境変数の上書きを適用し、検証済みの設定
/// * `Err(BankGlError)` - 読み込み・解析・検証のいずれかに失敗した場合
pub fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let mut config = match path {
        Some(p) => parse_config(&std::fs::read_to_string(p)?)?,
        None => AppConfig::default(),
    };

    config.apply_env_overrides(|key| std::env::var(key).ok());
    config.validate()?;
    Ok(config)
}

/// 設定ファイルの内容を解析する（内部ヘルパー）
fn parse_config(contents: &str) -> Result<AppConfig> {
    serde_json::from_str(contents)
        .map_err(|e| BankGlError::Config(format!("Invalid configuration file: {}", e)))
}
