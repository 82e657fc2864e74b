//! 共通型定義
//!
//! サービスログ、通知メッセージ、権限などのコアデータ型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// サービスログの種類
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum ServiceLogKind {
    /// 接触あり（フィード受信またはプローブ成功）
    Living,
    /// 許容時間を超過して死亡と判定
    Dead,
    /// プローブ失敗（通知は発生しない軽度の失敗）
    Dying,
}

impl ServiceLogKind {
    /// ワイヤ表現の文字列
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Living => "LIVING",
            Self::Dead => "DEAD",
            Self::Dying => "DYING",
        }
    }
}

impl fmt::Display for ServiceLogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// サービスログの1行
///
/// 追記後は不変。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceLogEntry {
    /// 種類
    #[serde(rename = "type")]
    pub kind: ServiceLogKind,
    /// 観測時刻
    pub date: DateTime<Utc>,
}

impl ServiceLogEntry {
    /// 新しいログ行を作成
    pub fn new(kind: ServiceLogKind, date: DateTime<Utc>) -> Self {
        Self { kind, date }
    }

    /// LIVING行
    pub fn living(date: DateTime<Utc>) -> Self {
        Self::new(ServiceLogKind::Living, date)
    }

    /// DEAD行
    pub fn dead(date: DateTime<Utc>) -> Self {
        Self::new(ServiceLogKind::Dead, date)
    }

    /// DYING行
    pub fn dying(date: DateTime<Utc>) -> Self {
        Self::new(ServiceLogKind::Dying, date)
    }
}

/// 通知メッセージの種類
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageKind {
    /// 許容時間内に接触がなかった
    Timeout,
    /// TIMEOUT通知の配送に失敗した
    NotifyError,
}

/// 通知メッセージ
///
/// 通知器に渡すだけの一時的な値で、保存はしない。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotificationMessage {
    /// 種類
    #[serde(rename = "type")]
    pub kind: MessageKind,
    /// 対象サービス名
    pub service: String,
    /// 判定時刻
    pub date: DateTime<Utc>,
}

impl NotificationMessage {
    /// TIMEOUTメッセージ
    pub fn timeout(service: impl Into<String>, date: DateTime<Utc>) -> Self {
        Self {
            kind: MessageKind::Timeout,
            service: service.into(),
            date,
        }
    }

    /// NOTIFY_ERRORメッセージ
    pub fn notify_error(service: impl Into<String>, date: DateTime<Utc>) -> Self {
        Self {
            kind: MessageKind::NotifyError,
            service: service.into(),
            date,
        }
    }
}

/// HTTP APIの権限
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Capability {
    /// サービスログの参照
    GetLog,
    /// ハートビート送信
    Heartbeat,
    /// サービス一覧の参照
    ListService,
}

impl Capability {
    /// 共有トークンが付与する全権限
    pub fn all() -> Vec<Capability> {
        vec![Self::GetLog, Self::Heartbeat, Self::ListService]
    }
}
