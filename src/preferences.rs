//! Preferences Module
//!
//! 表示テーマの設定をストアに保存するモジュール。

use tracing::{debug, warn};

use crate::api::ThemeMode;
use crate::error::Result;
use crate::storage::KeyValueStore;

/// テーマを保存するストアのキー
pub const THEME_KEY: &str = "theme-mode";

/// 表示テーマの設定
#[derive(Debug)]
pub struct ThemePreference<S: KeyValueStore> {
    store: S,
    mode: ThemeMode,
}

impl<S: KeyValueStore> ThemePreference<S> {
    /// ストアから設定を読み込む
    ///
    /// 保存されていない場合や値が不正な場合はライトテーマになります。
    pub fn open(store: S) -> Self {
        let mode = match store.get(THEME_KEY) {
            Ok(Some(value)) => ThemeMode::parse(&value).unwrap_or_else(|| {
                warn!("unknown theme mode {:?}; using light", value);
                ThemeMode::Light
            }),
            Ok(None) => ThemeMode::default(),
            Err(e) => {
                warn!("failed to read theme mode: {}; using light", e);
                ThemeMode::default()
            }
        };

        Self { store, mode }
    }

    /// 現在のテーマ
    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    /// テーマを設定して保存する
    pub fn set(&mut self, mode: ThemeMode) -> Result<()> {
        self.store.set(THEME_KEY, mode.as_str())?;
        self.mode = mode;
        debug!("theme mode set to {}", mode.as_str());
        Ok(())
    }

    /// ライト／ダークを切り替えて保存する
    pub fn toggle(&mut self) -> Result<ThemeMode> {
        let next = self.mode.toggled();
        self.set(next)?;
        Ok(next)
    }
}
