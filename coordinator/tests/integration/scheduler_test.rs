//! スケジューラーの実時間テスト

use crate::support::{count_kind, log_store, RecordingNotifier, StalledNotifier};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use watchcat::cat::Cat;
use watchcat::registry::CatRegistry;
use watchcat::scheduler::CatScheduler;
use watchcat::shutdown::ShutdownController;
use watchcat_common::types::{MessageKind, ServiceLogKind};

#[tokio::test]
async fn scheduler_notifies_dead_passive_cat_once_per_reminder() {
    let notifier = RecordingNotifier::new();
    let logs = log_store();
    let cat = Cat::passive(
        "batch",
        Duration::from_millis(100),
        Duration::from_secs(3600),
        Utc::now(),
        notifier.clone(),
        Arc::new(logs.clone()),
    );
    let registry = CatRegistry::new(vec![cat]).unwrap();

    let shutdown = ShutdownController::default();
    let scheduler = CatScheduler::start(&registry, shutdown.clone());
    assert_eq!(scheduler.task_count(), 1);

    tokio::time::sleep(Duration::from_millis(350)).await;

    shutdown.request_shutdown();
    tokio::time::timeout(Duration::from_secs(2), scheduler.join())
        .await
        .expect("scheduler did not stop");

    assert_eq!(notifier.count(), 1);
    assert_eq!(notifier.count_kind(MessageKind::Timeout), 1);

    let entries = logs.entries("batch").await;
    assert!(entries.iter().any(|e| e.kind == ServiceLogKind::Dead));
}

#[tokio::test]
async fn scheduler_stops_promptly_without_checks() {
    let notifier = RecordingNotifier::new();
    let cat = Cat::passive(
        "slow",
        Duration::from_secs(3600),
        Duration::from_secs(3600),
        Utc::now(),
        notifier.clone(),
        Arc::new(log_store()),
    );
    let registry = CatRegistry::new(vec![cat]).unwrap();

    let shutdown = ShutdownController::default();
    let scheduler = CatScheduler::start(&registry, shutdown.clone());

    shutdown.request_shutdown();
    tokio::time::timeout(Duration::from_secs(2), scheduler.join())
        .await
        .expect("scheduler did not stop");

    assert_eq!(notifier.count(), 0);
}

#[tokio::test]
async fn stalled_cat_does_not_hold_back_other_cats() {
    let stalled = StalledNotifier::new();
    let recording = RecordingNotifier::new();
    let logs = log_store();
    let start = Utc::now();

    let stuck = Cat::passive(
        "stuck",
        Duration::from_millis(100),
        Duration::from_secs(3600),
        start,
        stalled.clone(),
        Arc::new(logs.clone()),
    )
    .with_timeouts(Duration::from_secs(60), Duration::from_secs(60));
    let healthy = Cat::passive(
        "batch",
        Duration::from_millis(100),
        Duration::from_secs(3600),
        start,
        recording.clone(),
        Arc::new(logs.clone()),
    );
    let registry = CatRegistry::new(vec![stuck, healthy]).unwrap();

    let shutdown = ShutdownController::default();
    let scheduler = CatScheduler::start(&registry, shutdown.clone());

    tokio::time::sleep(Duration::from_millis(350)).await;

    // "stuck" は通知の途中で止まったまま
    assert_eq!(stalled.attempts(), 1);
    assert_eq!(recording.count(), 1);
    let entries = logs.entries("batch").await;
    assert!(count_kind(&entries, ServiceLogKind::Dead) >= 3);

    shutdown.request_shutdown();
    tokio::time::timeout(Duration::from_secs(2), scheduler.join())
        .await
        .expect("scheduler did not stop while a check was stalled");
}
