//! サービスログストア
//!
//! サービスごとの追記専用ログをメモリ内で保持する。
//! 永続化はしないため、プロセス再起動でログは失われる。
//!
//! 追記のたびに一定確率で全サービスの保持期間スイープを行い、
//! 追記された行の時刻から保持期間より古い行を削除する。

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};
use watchcat_common::types::ServiceLogEntry;

/// 保持期間のデフォルト（秒、1時間）
pub const DEFAULT_RETENTION_WINDOW_SECS: i64 = 60 * 60;

/// 追記時に保持期間スイープを行う確率のデフォルト
pub const DEFAULT_SWEEP_PROBABILITY: f64 = 0.1;

/// ログ書き込み側の抽象
///
/// 猫（監視エンティティ）はこのtrait越しにログを書く。
#[async_trait]
pub trait ServiceLogger: Send + Sync {
    /// ログ行を追記
    async fn append(&self, service: &str, entry: ServiceLogEntry);

    /// LIVING行を追記
    async fn log_living(&self, service: &str, date: DateTime<Utc>) {
        self.append(service, ServiceLogEntry::living(date)).await;
    }

    /// DEAD行を追記
    async fn log_dead(&self, service: &str, date: DateTime<Utc>) {
        self.append(service, ServiceLogEntry::dead(date)).await;
    }

    /// DYING行を追記
    async fn log_dying(&self, service: &str, date: DateTime<Utc>) {
        self.append(service, ServiceLogEntry::dying(date)).await;
    }
}

/// 保持期間ポリシー
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetentionPolicy {
    /// この期間より古い行はスイープで削除される
    pub window: TimeDelta,
    /// 追記1回あたりのスイープ確率（0.0〜1.0）
    pub sweep_probability: f64,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            window: TimeDelta::seconds(DEFAULT_RETENTION_WINDOW_SECS),
            sweep_probability: DEFAULT_SWEEP_PROBABILITY,
        }
    }
}

impl RetentionPolicy {
    /// スイープを行わないポリシー
    pub fn disabled() -> Self {
        Self {
            sweep_probability: 0.0,
            ..Self::default()
        }
    }

    /// 追記のたびに必ずスイープするポリシー
    pub fn always() -> Self {
        Self {
            sweep_probability: 1.0,
            ..Self::default()
        }
    }

    fn should_sweep(&self) -> bool {
        let p = self.sweep_probability;
        if p.is_nan() || p <= 0.0 {
            return false;
        }
        if p >= 1.0 {
            return true;
        }
        rand::rng().random_bool(p)
    }
}

/// メモリ内サービスログストア
///
/// 内部で同期を取るため、呼び出し側でのロックは不要。
/// クローンは同じストアを共有する。
#[derive(Clone, Default)]
pub struct ServiceLogStore {
    logs: Arc<RwLock<HashMap<String, Vec<ServiceLogEntry>>>>,
    retention: RetentionPolicy,
}

impl ServiceLogStore {
    /// デフォルトの保持期間ポリシーでストアを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 保持期間ポリシーを指定してストアを作成
    pub fn with_retention(retention: RetentionPolicy) -> Self {
        Self {
            logs: Arc::default(),
            retention,
        }
    }

    /// 保持期間ポリシー
    pub fn retention(&self) -> RetentionPolicy {
        self.retention
    }

    /// 期間指定でログを取得
    ///
    /// `since < date` かつ（`until` 指定時）`date < until` の行を追記順で返す。
    /// 未知のサービスは空を返す。
    pub async fn query(
        &self,
        service: &str,
        since: DateTime<Utc>,
        until: Option<DateTime<Utc>>,
    ) -> Vec<ServiceLogEntry> {
        let logs = self.logs.read().await;
        let Some(log) = logs.get(service) else {
            return Vec::new();
        };
        log.iter()
            .filter(|entry| entry.date > since && until.map_or(true, |until| entry.date < until))
            .copied()
            .collect()
    }

    /// サービスの全ログを取得
    pub async fn entries(&self, service: &str) -> Vec<ServiceLogEntry> {
        let logs = self.logs.read().await;
        logs.get(service).cloned().unwrap_or_default()
    }

    /// ログを持つサービス名一覧
    pub async fn services(&self) -> Vec<String> {
        let logs = self.logs.read().await;
        let mut names: Vec<String> = logs.keys().cloned().collect();
        names.sort();
        names
    }

    /// `now` 基準で保持期間スイープを実行し、削除した行数を返す
    pub async fn sweep(&self, now: DateTime<Utc>) -> usize {
        let mut logs = self.logs.write().await;
        prune(&mut logs, now - self.retention.window)
    }
}

/// `cutoff` より古い行を全サービスから削除し、空になったサービスも取り除く
fn prune(logs: &mut HashMap<String, Vec<ServiceLogEntry>>, cutoff: DateTime<Utc>) -> usize {
    let mut removed = 0;
    for log in logs.values_mut() {
        let before = log.len();
        log.retain(|entry| entry.date >= cutoff);
        removed += before - log.len();
    }
    logs.retain(|_, log| !log.is_empty());
    removed
}

#[async_trait]
impl ServiceLogger for ServiceLogStore {
    async fn append(&self, service: &str, entry: ServiceLogEntry) {
        let sweep = self.retention.should_sweep();

        {
            let mut logs = self.logs.write().await;
            if sweep {
                let removed = prune(&mut logs, entry.date - self.retention.window);
                if removed > 0 {
                    debug!(removed, "Pruned expired service log entries");
                }
            }
            logs.entry(service.to_string()).or_default().push(entry);
        }

        info!(
            service = %service,
            kind = %entry.kind,
            date = %entry.date.to_rfc3339(),
            "service log"
        );
    }
}
