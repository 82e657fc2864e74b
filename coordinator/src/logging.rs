//! ロギング初期化
//!
//! `WATCHCAT_LOG_LEVEL`（未設定なら `RUST_LOG`、どちらもなければ `info`）で
//! フィルタを決める。`WATCHCAT_LOG_DIR` が設定されていれば日次ローテーションの
//! ファイル出力も追加する。

use std::error::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// ログファイル名の接頭辞
pub const LOG_FILE_PREFIX: &str = "watchcat.log";

/// ロギングを初期化する
///
/// ファイル出力を有効にした場合は、プロセス終了まで保持すべきガードを返す。
pub fn init() -> Result<Option<WorkerGuard>, Box<dyn Error + Send + Sync>> {
    let env_filter = build_env_filter();

    let (file_layer, guard) = match std::env::var("WATCHCAT_LOG_DIR") {
        Ok(dir) if !dir.trim().is_empty() => {
            std::fs::create_dir_all(&dir)?;
            let appender = tracing_appender::rolling::daily(&dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        _ => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer())
        .with(file_layer)
        .try_init()?;

    Ok(guard)
}

/// ログフィルタを決める
///
/// `WATCHCAT_LOG_LEVEL` が解釈できればそれを、次に `RUST_LOG`、最後に `info`。
pub fn build_env_filter() -> EnvFilter {
    std::env::var("WATCHCAT_LOG_LEVEL")
        .ok()
        .and_then(|level| EnvFilter::try_new(level).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}
