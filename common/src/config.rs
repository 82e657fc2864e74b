//! 設定管理
//!
//! 監視対象サービス定義を含む設定ファイルの構造体と読み込み

use crate::error::{CommonError, CommonResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

/// リマインダー間隔のデフォルト（ミリ秒、1時間）
pub const DEFAULT_REMINDER_DURATION_MS: u64 = 60 * 60 * 1000;

/// サポートする設定ファイルのバージョン
pub const CONFIG_VERSION: u32 = 0;

/// watchcat設定ファイル
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchcatConfig {
    /// 設定ファイルのバージョン (デフォルト: 0)
    #[serde(default)]
    pub version: u32,

    /// 監視対象サービス
    #[serde(default)]
    pub services: Vec<ServiceConfig>,

    /// HTTP APIの共有Bearerトークン
    pub http_token: String,

    /// 通知先のDiscord Webhook URL（未設定ならログ出力のみ）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discord_webhook: Option<String>,
}

/// サービス定義
///
/// `type` フィールドで種類を判別する。未知の種類は読み込み時にエラーとなる。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServiceConfig {
    /// 外部からのハートビートを待つサービス
    Passive {
        /// サービス名
        name: String,
        /// 許容時間（ミリ秒）
        duration: u64,
        /// リマインダー間隔（ミリ秒）
        #[serde(
            rename = "reminderDuration",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        reminder_duration: Option<u64>,
    },
    /// 自らエンドポイントを定期確認するサービス
    Active {
        /// サービス名
        name: String,
        /// 許容時間（ミリ秒）
        duration: u64,
        /// リマインダー間隔（ミリ秒）
        #[serde(
            rename = "reminderDuration",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        reminder_duration: Option<u64>,
        /// ヘルスチェック先URL
        check_endpoint: String,
    },
}

impl ServiceConfig {
    /// サービス名
    pub fn name(&self) -> &str {
        match self {
            Self::Passive { name, .. } | Self::Active { name, .. } => name,
        }
    }

    /// 許容時間
    pub fn tolerance(&self) -> Duration {
        match self {
            Self::Passive { duration, .. } | Self::Active { duration, .. } => {
                Duration::from_millis(*duration)
            }
        }
    }

    /// リマインダー間隔（未指定なら1時間）
    pub fn reminder(&self) -> Duration {
        let ms = match self {
            Self::Passive {
                reminder_duration, ..
            }
            | Self::Active {
                reminder_duration, ..
            } => reminder_duration.unwrap_or(DEFAULT_REMINDER_DURATION_MS),
        };
        Duration::from_millis(ms)
    }

    /// アクティブ監視のチェック先（パッシブならNone）
    pub fn check_endpoint(&self) -> Option<&str> {
        match self {
            Self::Passive { .. } => None,
            Self::Active { check_endpoint, .. } => Some(check_endpoint),
        }
    }
}

impl WatchcatConfig {
    /// JSON文字列から読み込み、検証する
    pub fn from_json_str(json: &str) -> CommonResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| CommonError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// 設定ファイルを読み込み、検証する
    pub fn load(path: impl AsRef<Path>) -> CommonResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            CommonError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&raw)
    }

    /// 設定内容を検証
    pub fn validate(&self) -> CommonResult<()> {
        if self.version != CONFIG_VERSION {
            return Err(CommonError::Config(format!(
                "Unsupported config version: {}",
                self.version
            )));
        }
        if self.http_token.trim().is_empty() {
            return Err(CommonError::Config("http_token must not be empty".to_string()));
        }

        let mut seen = HashSet::new();
        for service in &self.services {
            let name = service.name();
            if name.trim().is_empty() {
                return Err(CommonError::Config("service name must not be empty".to_string()));
            }
            if !seen.insert(name) {
                return Err(CommonError::Config(format!(
                    "Duplicate service name: {}",
                    name
                )));
            }
            if service.tolerance().is_zero() {
                return Err(CommonError::Config(format!(
                    "duration of service '{}' must be greater than zero",
                    name
                )));
            }
            if let Some(endpoint) = service.check_endpoint() {
                if endpoint.trim().is_empty() {
                    return Err(CommonError::Config(format!(
                        "check_endpoint of service '{}' must not be empty",
                        name
                    )));
                }
            }
        }
        Ok(())
    }
}
