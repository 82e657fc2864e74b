//! 猫スケジューラー
//!
//! 猫ごとに独立したタスクを起動し、`check_interval()` ごとに `check` を呼ぶ。
//! 猫同士は互いを待たない。同じ猫の `check` は前回が終わるまで次を始めず、
//! 取りこぼしたティックはスキップする。

use crate::cat::{Cat, CheckOutcome, NotificationOutcome};
use crate::registry::CatRegistry;
use crate::shutdown::ShutdownController;
use chrono::Utc;
use futures::future::join_all;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

/// 起動中の猫タスク群
pub struct CatScheduler {
    handles: Vec<(String, JoinHandle<()>)>,
}

impl CatScheduler {
    /// レジストリの全ての猫についてタスクを起動
    pub fn start(registry: &CatRegistry, shutdown: ShutdownController) -> Self {
        let handles = registry
            .list()
            .iter()
            .map(|cat| {
                let name = cat.name().to_string();
                let handle = tokio::spawn(run_cat_loop(cat.clone(), shutdown.clone()));
                (name, handle)
            })
            .collect();
        Self { handles }
    }

    /// 起動したタスク数
    pub fn task_count(&self) -> usize {
        self.handles.len()
    }

    /// 全タスクの終了を待つ
    ///
    /// 事前に `ShutdownController::request_shutdown` を呼んでおくこと。
    pub async fn join(self) {
        let (names, handles): (Vec<_>, Vec<_>) = self.handles.into_iter().unzip();
        for (name, result) in names.into_iter().zip(join_all(handles).await) {
            if let Err(e) = result {
                error!(service = %name, error = %e, "Cat task terminated abnormally");
            }
        }
        info!("Cat scheduler stopped");
    }
}

async fn run_cat_loop(cat: Arc<Cat>, shutdown: ShutdownController) {
    let period = cat.check_interval();
    // 最初のチェックは1間隔後
    let mut timer = interval_at(Instant::now() + period, period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(
        service = %cat.name(),
        kind = ?cat.kind(),
        interval_ms = period.as_millis() as u64,
        "Cat scheduler started"
    );

    loop {
        tokio::select! {
            _ = shutdown.wait() => break,
            _ = timer.tick() => {}
        }

        tokio::select! {
            _ = shutdown.wait() => break,
            outcome = cat.check(Utc::now()) => report(&cat, outcome),
        }
    }

    debug!(service = %cat.name(), "Cat scheduler stopped");
}

fn report(cat: &Cat, outcome: CheckOutcome) {
    match outcome {
        CheckOutcome::Alive => {}
        CheckOutcome::Dead { notification } => match notification {
            NotificationOutcome::Suppressed => {
                debug!(service = %cat.name(), "Service is dead, reminder suppressed")
            }
            NotificationOutcome::Delivered => {
                warn!(service = %cat.name(), "Service is dead, timeout notified")
            }
            NotificationOutcome::Escalated => {
                warn!(service = %cat.name(), "Service is dead, timeout notification escalated")
            }
            NotificationOutcome::EscalationFailed => {
                error!(service = %cat.name(), "Service is dead and no notification could be delivered")
            }
        },
    }
}
