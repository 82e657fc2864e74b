//! トークンAPIハンドラー

use super::error::AppError;
use crate::auth::{token_matches, Capabilities};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::{header, HeaderMap},
    Extension, Json,
};
use watchcat_common::{error::WatchcatError, protocol::CapabilityResponse};

/// GET /token/:token/capability - トークンの権限確認
///
/// 未知のトークンは404、ヘッダーのトークンがパスと異なる場合は403。
pub async fn get_capability(
    State(state): State<AppState>,
    Extension(capabilities): Extension<Capabilities>,
    Path(token): Path<String>,
    headers: HeaderMap,
) -> Result<Json<CapabilityResponse>, AppError> {
    if !token_matches(&token, &state.http_token) {
        return Err(WatchcatError::TokenNotFound.into());
    }

    let presented = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim);
    if presented != Some(token.as_str()) {
        return Err(WatchcatError::Forbidden(
            "token does not match Authorization header".to_string(),
        )
        .into());
    }

    Ok(Json(CapabilityResponse {
        ok: true,
        capability: capabilities.as_slice().to_vec(),
    }))
}
