//! Logging Module
//!
//! `tracing`の購読者を初期化するモジュール。ログは標準エラー出力へ書き込まれ、
//! `RUST_LOG`で出力レベルを変更できます（既定は`info`）。

use tracing_subscriber::EnvFilter;

/// 既定のログレベル
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// ログ出力を初期化する
///
/// 既に初期化されている場合は何もしません。
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
