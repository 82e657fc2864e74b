//! 監視シナリオの統合テスト
//!
//! 時刻は全て明示的に渡すため、実時間には依存しない。

use crate::support::{at, count_kind, log_store, ConstantChecker, RecordingNotifier};
use std::sync::Arc;
use std::time::Duration;
use watchcat::cat::{Cat, CheckOutcome, NotificationOutcome};
use watchcat_common::types::{MessageKind, ServiceLogKind};

fn secs(n: u64) -> Duration {
    Duration::from_secs(n)
}

#[tokio::test]
async fn passive_cat_without_reminder_notifies_once_dead() {
    let notifier = RecordingNotifier::new();
    let logs = log_store();
    let cat = Cat::passive(
        "batch",
        secs(60),
        Duration::ZERO,
        at(0),
        notifier.clone(),
        Arc::new(logs.clone()),
    );

    assert_eq!(cat.check(at(30)).await, CheckOutcome::Alive);
    assert_eq!(notifier.count(), 0);

    let outcome = cat.check(at(120)).await;
    assert_eq!(
        outcome,
        CheckOutcome::Dead {
            notification: NotificationOutcome::Delivered
        }
    );
    assert_eq!(notifier.count(), 1);
    assert_eq!(notifier.count_kind(MessageKind::Timeout), 1);

    let entries = logs.entries("batch").await;
    assert_eq!(count_kind(&entries, ServiceLogKind::Dead), 1);
}

#[tokio::test]
async fn passive_cat_reminder_suppresses_repeated_notifications() {
    let notifier = RecordingNotifier::new();
    let logs = log_store();
    let cat = Cat::passive(
        "batch",
        secs(60),
        secs(120),
        at(0),
        notifier.clone(),
        Arc::new(logs.clone()),
    );

    cat.check(at(120)).await;
    assert_eq!(notifier.count(), 1);

    let outcome = cat.check(at(180)).await;
    assert_eq!(
        outcome,
        CheckOutcome::Dead {
            notification: NotificationOutcome::Suppressed
        }
    );
    assert_eq!(notifier.count(), 1);

    cat.check(at(360)).await;
    assert_eq!(notifier.count(), 2);

    // DEADは通知の有無に関わらず毎回記録される
    let entries = logs.entries("batch").await;
    assert_eq!(count_kind(&entries, ServiceLogKind::Dead), 3);
}

#[tokio::test]
async fn passive_cat_feed_keeps_it_alive() {
    let notifier = RecordingNotifier::new();
    let logs = log_store();
    let cat = Cat::passive(
        "batch",
        secs(60),
        Duration::ZERO,
        at(0),
        notifier.clone(),
        Arc::new(logs.clone()),
    );

    cat.feed(at(50)).await.unwrap();
    assert_eq!(cat.check(at(100)).await, CheckOutcome::Alive);
    assert!(cat.is_alive(at(100)).await);
    assert!(!cat.is_alive(at(110)).await);
    assert_eq!(notifier.count(), 0);

    let entries = logs.entries("batch").await;
    assert_eq!(count_kind(&entries, ServiceLogKind::Living), 1);
}

#[tokio::test]
async fn active_cat_with_failing_checker_logs_dying_then_dead() {
    let notifier = RecordingNotifier::new();
    let logs = log_store();
    let cat = Cat::active(
        "web",
        secs(60),
        Duration::ZERO,
        at(0),
        Arc::new(ConstantChecker(false)),
        notifier.clone(),
        Arc::new(logs.clone()),
    );

    assert_eq!(cat.check(at(30)).await, CheckOutcome::Alive);
    assert_eq!(notifier.count(), 0);
    let entries = logs.entries("web").await;
    assert_eq!(count_kind(&entries, ServiceLogKind::Dying), 1);

    cat.check(at(120)).await;
    assert_eq!(notifier.count(), 1);
    let entries = logs.entries("web").await;
    assert_eq!(count_kind(&entries, ServiceLogKind::Dead), 1);
    assert_eq!(count_kind(&entries, ServiceLogKind::Dying), 2);
}

#[tokio::test]
async fn active_cat_with_healthy_checker_stays_alive() {
    let notifier = RecordingNotifier::new();
    let logs = log_store();
    let cat = Cat::active(
        "web",
        secs(60),
        Duration::ZERO,
        at(0),
        Arc::new(ConstantChecker(true)),
        notifier.clone(),
        Arc::new(logs.clone()),
    );

    for offset in [30, 90, 150, 210] {
        assert_eq!(cat.check(at(offset)).await, CheckOutcome::Alive);
    }
    assert_eq!(notifier.count(), 0);
    assert_eq!(cat.last_contact().await, at(210));

    let entries = logs.entries("web").await;
    assert_eq!(count_kind(&entries, ServiceLogKind::Living), 4);
    assert_eq!(count_kind(&entries, ServiceLogKind::Dead), 0);
}

#[tokio::test]
async fn failed_timeout_notification_is_escalated_once() {
    let notifier = RecordingNotifier::failing_timeouts();
    let logs = log_store();
    let cat = Cat::passive(
        "batch",
        secs(60),
        Duration::ZERO,
        at(0),
        notifier.clone(),
        Arc::new(logs.clone()),
    );

    let outcome = cat.check(at(120)).await;
    assert_eq!(
        outcome,
        CheckOutcome::Dead {
            notification: NotificationOutcome::Escalated
        }
    );

    let messages = notifier.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].kind, MessageKind::Timeout);
    assert_eq!(messages[1].kind, MessageKind::NotifyError);
    assert_eq!(messages[1].service, "batch");
    assert_eq!(messages[1].date, at(120));
}
