//! テスト共通ユーティリティ

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use watchcat::health::Checker;
use watchcat::notifier::{Notifier, NotifyError};
use watchcat::registry::CatRegistry;
use watchcat::service_log::{RetentionPolicy, ServiceLogStore};
use watchcat::shutdown::ShutdownController;
use watchcat::AppState;
use watchcat_common::config::WatchcatConfig;
use watchcat_common::types::{MessageKind, NotificationMessage, ServiceLogEntry, ServiceLogKind};

/// テストの基準時刻（UNIX秒）
pub const T0: i64 = 1659074852;

/// テスト用トークン
pub const TEST_TOKEN: &str = "test-token";

/// 基準時刻からのオフセット
pub fn at(offset_secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(T0 + offset_secs, 0).unwrap()
}

/// 配送されたメッセージを記録する通知器
///
/// `fail_timeouts` が真なら TIMEOUT の配送は失敗させる（記録はする）。
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<NotificationMessage>>,
    fail_timeouts: bool,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing_timeouts() -> Arc<Self> {
        Arc::new(Self {
            sent: Mutex::new(Vec::new()),
            fail_timeouts: true,
        })
    }

    pub fn messages(&self) -> Vec<NotificationMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn count_kind(&self, kind: MessageKind) -> usize {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.kind == kind)
            .count()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, message: &NotificationMessage) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push(message.clone());
        if self.fail_timeouts && message.kind == MessageKind::Timeout {
            return Err(NotifyError::Status(500));
        }
        Ok(())
    }
}

/// 配送を受け付けたまま二度と返らない通知器
#[derive(Default)]
pub struct StalledNotifier {
    attempts: AtomicUsize,
}

impl StalledNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Notifier for StalledNotifier {
    async fn notify(&self, _message: &NotificationMessage) -> Result<(), NotifyError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        std::future::pending::<()>().await;
        Ok(())
    }
}

/// 常に同じ結果を返すチェッカー
pub struct ConstantChecker(pub bool);

#[async_trait]
impl Checker for ConstantChecker {
    async fn check(&self) -> bool {
        self.0
    }
}

/// 保持期間スイープなしのログストア
pub fn log_store() -> ServiceLogStore {
    ServiceLogStore::with_retention(RetentionPolicy::disabled())
}

/// 種類ごとのログ行数
pub fn count_kind(entries: &[ServiceLogEntry], kind: ServiceLogKind) -> usize {
    entries.iter().filter(|e| e.kind == kind).count()
}

/// パッシブ1件（"batch"）とアクティブ1件（"web"）の設定
pub fn test_config() -> WatchcatConfig {
    WatchcatConfig::from_json_str(&format!(
        r#"{{
            "services": [
                {{"type": "passive", "name": "batch", "duration": 60000}},
                {{"type": "active", "name": "web", "duration": 60000,
                  "check_endpoint": "http://127.0.0.1:1/health"}}
            ],
            "http_token": "{}"
        }}"#,
        TEST_TOKEN
    ))
    .unwrap()
}

/// APIテスト用のアプリケーション状態
///
/// 猫の開始時刻は現在時刻なので、作成直後は全サービスが生存扱い。
pub fn test_state() -> AppState {
    let config = test_config();
    let service_logs = log_store();
    let registry = CatRegistry::from_config(
        &config,
        Utc::now(),
        RecordingNotifier::new(),
        Arc::new(service_logs.clone()),
        &Default::default(),
    )
    .unwrap();
    AppState {
        registry,
        service_logs,
        http_token: Arc::from(config.http_token.as_str()),
        shutdown: ShutdownController::default(),
    }
}

/// Authorizationヘッダー値
pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}
