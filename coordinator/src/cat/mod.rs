//! 猫（監視エンティティ）
//!
//! サービスごとの生存状態を管理するステートマシン。
//!
//! - パッシブ: 外部からのフィード（ハートビート）で最終接触時刻が更新される
//! - アクティブ: `check` のたびに自らチェッカーで確認し、成功時に更新される
//!
//! どちらも死亡判定・リマインダー抑制・通知・エスカレーションは
//! 同じ `evaluate` を通る。

use crate::health::Checker;
use crate::notifier::{Notifier, NotifyError};
use crate::service_log::ServiceLogger;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, error, warn};
use watchcat_common::error::{WatchcatError, WatchcatResult};
use watchcat_common::types::NotificationMessage;

/// 外部呼び出し（プローブ・通知）のタイムアウトのデフォルト
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(10);

/// チェック間隔の下限
pub const MIN_CHECK_INTERVAL: Duration = Duration::from_millis(1);

/// 接触状態の取得方法
#[derive(Clone)]
pub enum ContactSource {
    /// 外部からのフィードを待つ
    Passive,
    /// チェッカーで自ら確認する
    Active(Arc<dyn Checker>),
}

/// 猫の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatKind {
    /// パッシブ監視
    Passive,
    /// アクティブ監視
    Active,
}

/// `check` の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    /// 許容時間内（ログも通知もなし）
    Alive,
    /// 死亡と判定（DEADを記録済み）
    Dead {
        /// 通知の扱い
        notification: NotificationOutcome,
    },
}

/// 死亡判定時の通知の扱い
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationOutcome {
    /// リマインダー間隔内のため抑制
    Suppressed,
    /// TIMEOUTを配送
    Delivered,
    /// TIMEOUTの配送に失敗し、NOTIFY_ERRORを配送
    Escalated,
    /// NOTIFY_ERRORの配送にも失敗（ログ出力のみで破棄）
    EscalationFailed,
}

#[derive(Debug)]
struct CatState {
    last_contact: DateTime<Utc>,
    last_notified: Option<DateTime<Utc>>,
}

/// 監視エンティティ
pub struct Cat {
    name: String,
    tolerance: Duration,
    reminder: Duration,
    source: ContactSource,
    notifier: Arc<dyn Notifier>,
    logger: Arc<dyn ServiceLogger>,
    probe_timeout: Duration,
    notify_timeout: Duration,
    state: Mutex<CatState>,
    // 同一猫の check を直列化する（フィードはこのロックを取らない）
    check_guard: Mutex<()>,
}

impl std::fmt::Debug for Cat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cat")
            .field("name", &self.name)
            .field("kind", &self.kind())
            .field("tolerance", &self.tolerance)
            .field("reminder", &self.reminder)
            .finish_non_exhaustive()
    }
}

/// `since` から `now` までの経過時間（逆行している場合は0）
fn elapsed(now: DateTime<Utc>, since: DateTime<Utc>) -> Duration {
    (now - since).to_std().unwrap_or(Duration::ZERO)
}

impl Cat {
    /// 猫を作成
    ///
    /// 最終接触時刻は `start` で初期化される。
    pub fn new(
        name: impl Into<String>,
        tolerance: Duration,
        reminder: Duration,
        start: DateTime<Utc>,
        source: ContactSource,
        notifier: Arc<dyn Notifier>,
        logger: Arc<dyn ServiceLogger>,
    ) -> Self {
        Self {
            name: name.into(),
            tolerance,
            reminder,
            source,
            notifier,
            logger,
            probe_timeout: DEFAULT_CALL_TIMEOUT,
            notify_timeout: DEFAULT_CALL_TIMEOUT,
            state: Mutex::new(CatState {
                last_contact: start,
                last_notified: None,
            }),
            check_guard: Mutex::new(()),
        }
    }

    /// パッシブ監視の猫を作成
    pub fn passive(
        name: impl Into<String>,
        tolerance: Duration,
        reminder: Duration,
        start: DateTime<Utc>,
        notifier: Arc<dyn Notifier>,
        logger: Arc<dyn ServiceLogger>,
    ) -> Self {
        Self::new(
            name,
            tolerance,
            reminder,
            start,
            ContactSource::Passive,
            notifier,
            logger,
        )
    }

    /// アクティブ監視の猫を作成
    pub fn active(
        name: impl Into<String>,
        tolerance: Duration,
        reminder: Duration,
        start: DateTime<Utc>,
        checker: Arc<dyn Checker>,
        notifier: Arc<dyn Notifier>,
        logger: Arc<dyn ServiceLogger>,
    ) -> Self {
        Self::new(
            name,
            tolerance,
            reminder,
            start,
            ContactSource::Active(checker),
            notifier,
            logger,
        )
    }

    /// プローブ・通知のタイムアウトを設定
    pub fn with_timeouts(mut self, probe_timeout: Duration, notify_timeout: Duration) -> Self {
        self.probe_timeout = probe_timeout;
        self.notify_timeout = notify_timeout;
        self
    }

    /// サービス名
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 種類
    pub fn kind(&self) -> CatKind {
        match self.source {
            ContactSource::Passive => CatKind::Passive,
            ContactSource::Active(_) => CatKind::Active,
        }
    }

    /// 許容時間
    pub fn tolerance(&self) -> Duration {
        self.tolerance
    }

    /// リマインダー間隔
    pub fn reminder(&self) -> Duration {
        self.reminder
    }

    /// 推奨チェック間隔（許容時間の半分）
    ///
    /// 許容時間を超えてから半間隔以内に検知できる。
    pub fn check_interval(&self) -> Duration {
        (self.tolerance / 2).max(MIN_CHECK_INTERVAL)
    }

    /// 最終接触時刻
    pub async fn last_contact(&self) -> DateTime<Utc> {
        self.state.lock().await.last_contact
    }

    /// 最終通知時刻
    pub async fn last_notified(&self) -> Option<DateTime<Utc>> {
        self.state.lock().await.last_notified
    }

    /// `now` 時点で生存しているか（状態もログも変更しない）
    pub async fn is_alive(&self, now: DateTime<Utc>) -> bool {
        let state = self.state.lock().await;
        elapsed(now, state.last_contact) < self.tolerance
    }

    /// 外部からの接触を記録
    ///
    /// LIVINGを1行追記する。通知判定は行わない。
    /// アクティブ監視の猫はフィードを受け付けない。
    pub async fn feed(&self, now: DateTime<Utc>) -> WatchcatResult<()> {
        if self.kind() != CatKind::Passive {
            return Err(WatchcatError::NotFeedable(self.name.clone()));
        }
        self.touch(now).await;
        self.logger.log_living(&self.name, now).await;
        Ok(())
    }

    /// 生存状態を再評価
    ///
    /// アクティブ監視ならまずプローブし、LIVINGまたはDYINGを記録する。
    /// その後、許容時間を超えていればDEADを記録し、
    /// リマインダー間隔を過ぎていればTIMEOUTを通知する。
    pub async fn check(&self, now: DateTime<Utc>) -> CheckOutcome {
        let _guard = self.check_guard.lock().await;

        if let ContactSource::Active(checker) = &self.source {
            if self.probe(checker.as_ref()).await {
                self.logger.log_living(&self.name, now).await;
                self.touch(now).await;
            } else {
                self.logger.log_dying(&self.name, now).await;
            }
        }

        self.evaluate(now).await
    }

    async fn probe(&self, checker: &dyn Checker) -> bool {
        match tokio::time::timeout(self.probe_timeout, checker.check()).await {
            Ok(alive) => alive,
            Err(_) => {
                debug!(
                    service = %self.name,
                    timeout_ms = self.probe_timeout.as_millis() as u64,
                    "Probe timed out"
                );
                false
            }
        }
    }

    /// 最終接触時刻を進める（過去方向には戻さない）
    async fn touch(&self, now: DateTime<Utc>) {
        let mut state = self.state.lock().await;
        if now > state.last_contact {
            state.last_contact = now;
        }
    }

    async fn evaluate(&self, now: DateTime<Utc>) -> CheckOutcome {
        let due = {
            let mut state = self.state.lock().await;
            if elapsed(now, state.last_contact) < self.tolerance {
                return CheckOutcome::Alive;
            }
            let due = state
                .last_notified
                .map_or(true, |last| elapsed(now, last) >= self.reminder);
            if due {
                state.last_notified = Some(now);
            }
            due
        };

        self.logger.log_dead(&self.name, now).await;

        let notification = if due {
            self.dispatch(now).await
        } else {
            NotificationOutcome::Suppressed
        };
        CheckOutcome::Dead { notification }
    }

    async fn dispatch(&self, now: DateTime<Utc>) -> NotificationOutcome {
        let timeout = NotificationMessage::timeout(&self.name, now);
        let Err(err) = self.send(&timeout).await else {
            return NotificationOutcome::Delivered;
        };

        warn!(
            service = %self.name,
            error = %err,
            "Failed to deliver timeout notification, escalating"
        );

        let escalation = NotificationMessage::notify_error(&self.name, now);
        match self.send(&escalation).await {
            Ok(()) => NotificationOutcome::Escalated,
            Err(err) => {
                error!(
                    service = %self.name,
                    error = %err,
                    "Escalation notification failed, dropping"
                );
                NotificationOutcome::EscalationFailed
            }
        }
    }

    async fn send(&self, message: &NotificationMessage) -> Result<(), NotifyError> {
        match tokio::time::timeout(self.notify_timeout, self.notifier.notify(message)).await {
            Ok(result) => result,
            Err(_) => Err(NotifyError::Timeout(self.notify_timeout)),
        }
    }
}
