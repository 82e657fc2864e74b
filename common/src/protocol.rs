//! 通信プロトコル定義
//!
//! HTTP APIのリクエスト/レスポンス型

use crate::types::{Capability, ServiceLogEntry, ServiceLogKind};
use serde::{Deserialize, Serialize};

/// サービス状態（一覧の1行）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceStatus {
    /// サービス名
    pub name: String,
    /// 生存しているか
    pub status: bool,
}

/// GET /service レスポンス
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListServicesResponse {
    /// 成功フラグ
    pub ok: bool,
    /// サービス一覧（設定順）
    pub services: Vec<ServiceStatus>,
}

/// POST /service/:service/hb レスポンス
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HeartbeatResponse {
    /// 成功フラグ
    pub ok: bool,
}

/// ログ行（UNIX秒表現）
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogLine {
    /// 種類
    #[serde(rename = "type")]
    pub kind: ServiceLogKind,
    /// 観測時刻（UNIX秒）
    pub date: i64,
}

impl From<&ServiceLogEntry> for LogLine {
    fn from(entry: &ServiceLogEntry) -> Self {
        Self {
            kind: entry.kind,
            date: entry.date.timestamp(),
        }
    }
}

/// GET /service/:service/logs クエリ
///
/// 値は文字列のまま受け取り、ハンドラー側で解釈する（不正値は400）。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogQuery {
    /// 下限（UNIX秒、排他）
    pub since: Option<String>,
    /// 上限（UNIX秒、排他）
    pub until: Option<String>,
}

/// GET /service/:service/logs レスポンス
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogsResponse {
    /// 成功フラグ
    pub ok: bool,
    /// ログ行（追記順）
    pub logs: Vec<LogLine>,
}

/// GET /token/:token/capability レスポンス
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CapabilityResponse {
    /// 成功フラグ
    pub ok: bool,
    /// 付与されている権限
    pub capability: Vec<Capability>,
}
