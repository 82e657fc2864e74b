//! 通知器
//!
//! 死亡判定時のアラートを外部チャネルへ1回だけ配送する。
//! 再送はしない（エスカレーションは猫側の責務）。

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};
use watchcat_common::types::NotificationMessage;

/// 通知配送エラー
#[derive(Debug, Error)]
pub enum NotifyError {
    /// HTTP送信エラー
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// 2xx以外の応答
    #[error("Webhook responded with HTTP {0}")]
    Status(u16),

    /// メッセージのエンコード失敗
    #[error("Failed to encode message: {0}")]
    Encode(#[from] serde_json::Error),

    /// タイムアウト
    #[error("Notification timed out after {0:?}")]
    Timeout(Duration),
}

/// 通知器
#[async_trait]
pub trait Notifier: Send + Sync {
    /// メッセージを1回だけ配送する
    async fn notify(&self, message: &NotificationMessage) -> Result<(), NotifyError>;
}

/// ログ出力のみの通知器
///
/// Webhook未設定時に使用する。常に成功する。
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, message: &NotificationMessage) -> Result<(), NotifyError> {
        info!(
            kind = ?message.kind,
            service = %message.service,
            date = %message.date.to_rfc3339(),
            "notification"
        );
        Ok(())
    }
}

/// Discord Webhook通知器
#[derive(Debug, Clone)]
pub struct DiscordWebhookNotifier {
    webhook_url: String,
    client: Client,
}

impl DiscordWebhookNotifier {
    /// タイムアウト付きクライアントで通知器を作成
    pub fn new(webhook_url: impl Into<String>, timeout: Duration) -> Result<Self, NotifyError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(webhook_url, client))
    }

    /// 既存のHTTPクライアントを使って通知器を作成
    pub fn with_client(webhook_url: impl Into<String>, client: Client) -> Self {
        Self {
            webhook_url: webhook_url.into(),
            client,
        }
    }

    /// 送信先URL
    pub fn webhook_url(&self) -> &str {
        &self.webhook_url
    }
}

/// メッセージをDiscordのコードブロック付き本文に整形
pub fn render_discord_content(message: &NotificationMessage) -> Result<String, NotifyError> {
    let pretty = serde_json::to_string_pretty(message)?;
    Ok(["```", pretty.as_str(), "```"].join("\n"))
}

#[async_trait]
impl Notifier for DiscordWebhookNotifier {
    async fn notify(&self, message: &NotificationMessage) -> Result<(), NotifyError> {
        debug!(
            kind = ?message.kind,
            service = %message.service,
            "Sending webhook notification"
        );

        let content = render_discord_content(message)?;
        let response = self
            .client
            .post(&self.webhook_url)
            .json(&json!({ "content": content }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Status(status.as_u16()));
        }
        Ok(())
    }
}
