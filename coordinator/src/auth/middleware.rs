//! 権限解決ミドルウェア
//!
//! 全リクエストで `Authorization` ヘッダーを検査し、
//! 解決した `Capabilities` をリクエスト拡張に格納する。

use super::resolve_capabilities;
use crate::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

/// 権限解決ミドルウェア
pub async fn capability_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let capabilities = resolve_capabilities(request.headers(), &state.http_token);
    request.extensions_mut().insert(capabilities);
    next.run(request).await
}
