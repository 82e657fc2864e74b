//! CLIインターフェース

use clap::Parser;
use std::path::PathBuf;

/// watchcat - Dead man's switch for your services
#[derive(Parser, Debug)]
#[command(name = "watchcat")]
#[command(version, about, long_about = None)]
#[command(after_help = r#"ENVIRONMENT VARIABLES:
    WATCHCAT_CONFIG               Path to the JSON config file
    WATCHCAT_HOST                 Bind address (default: 0.0.0.0)
    WATCHCAT_PORT                 Listen port (default: 80, PORT is also honored)
    WATCHCAT_LOG_LEVEL            Log level (default: info)
    WATCHCAT_LOG_DIR              Directory for daily rotated log files
    WATCHCAT_PROBE_TIMEOUT_SECS   Active check timeout (default: 10)
    WATCHCAT_NOTIFY_TIMEOUT_SECS  Notification timeout (default: 10)
"#)]
pub struct Cli {
    /// Path to the JSON config file
    #[arg(env = "WATCHCAT_CONFIG")]
    pub config: PathBuf,

    /// Bind address (overrides WATCHCAT_HOST)
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Listen port (overrides WATCHCAT_PORT)
    #[arg(short, long)]
    pub port: Option<u16>,
}
