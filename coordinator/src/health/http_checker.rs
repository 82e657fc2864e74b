//! HTTPステータスチェッカー
//!
//! GETリクエストを送り、2xxが返れば生存とみなす

use super::Checker;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// ヘルスチェックのタイムアウトのデフォルト（秒）
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 10;

/// HTTP GETで生存確認するチェッカー
#[derive(Debug, Clone)]
pub struct HttpStatusChecker {
    /// チェック先URL
    url: String,
    /// HTTPクライアント
    client: Client,
}

impl HttpStatusChecker {
    /// タイムアウト付きクライアントでチェッカーを作成
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(url, client))
    }

    /// 既存のHTTPクライアントを使ってチェッカーを作成
    pub fn with_client(url: impl Into<String>, client: Client) -> Self {
        Self {
            url: url.into(),
            client,
        }
    }

    /// チェック先URL
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Checker for HttpStatusChecker {
    async fn check(&self) -> bool {
        match self.client.get(&self.url).send().await {
            Ok(response) => {
                let ok = response.status().is_success();
                if !ok {
                    debug!(url = %self.url, status = %response.status(), "Probe returned non-success status");
                }
                ok
            }
            Err(e) => {
                debug!(url = %self.url, error = %e, "Probe request failed");
                false
            }
        }
    }
}
