//! サービスAPIハンドラー
//!
//! 一覧、ハートビート、ログ参照

use super::error::AppError;
use crate::auth::Capabilities;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{DateTime, TimeZone, Utc};
use watchcat_common::{
    error::WatchcatError,
    protocol::{HeartbeatResponse, ListServicesResponse, LogLine, LogQuery, LogsResponse},
    types::Capability,
};

/// GET /service - サービス一覧と生存状態
pub async fn list_services(
    State(state): State<AppState>,
    Extension(capabilities): Extension<Capabilities>,
) -> Result<Json<ListServicesResponse>, AppError> {
    capabilities.require(Capability::ListService)?;

    let services = state.registry.statuses(Utc::now()).await;
    Ok(Json(ListServicesResponse { ok: true, services }))
}

/// POST /service/:service/hb - ハートビート
///
/// パッシブ監視のサービスのみ受け付ける。
pub async fn heartbeat(
    State(state): State<AppState>,
    Extension(capabilities): Extension<Capabilities>,
    Path(service): Path<String>,
) -> Result<Json<HeartbeatResponse>, AppError> {
    capabilities.require(Capability::Heartbeat)?;

    state.registry.feed(&service, Utc::now()).await?;
    Ok(Json(HeartbeatResponse { ok: true }))
}

/// GET /service/:service/logs?since=&until= - 期間指定のログ取得
///
/// `since` と `until` はUNIX秒で、どちらも必須（境界は含まない）。
/// 未知のサービスは空のログを返す。
pub async fn get_logs(
    State(state): State<AppState>,
    Extension(capabilities): Extension<Capabilities>,
    Path(service): Path<String>,
    Query(query): Query<LogQuery>,
) -> Result<Json<LogsResponse>, AppError> {
    capabilities.require(Capability::GetLog)?;

    let since = parse_unix_time("since", query.since.as_deref())?;
    let until = parse_unix_time("until", query.until.as_deref())?;

    let logs = state
        .service_logs
        .query(&service, since, Some(until))
        .await
        .iter()
        .map(LogLine::from)
        .collect();

    Ok(Json(LogsResponse { ok: true, logs }))
}

fn parse_unix_time(name: &str, value: Option<&str>) -> Result<DateTime<Utc>, WatchcatError> {
    let value = value.ok_or_else(|| WatchcatError::MissingQuery(name.to_string()))?;
    let secs: i64 = value
        .trim()
        .parse()
        .map_err(|_| WatchcatError::BadRequest(format!("not a unix timestamp: {}", value)))?;
    Utc.timestamp_opt(secs, 0)
        .single()
        .ok_or_else(|| WatchcatError::BadRequest(format!("timestamp out of range: {}", secs)))
}
