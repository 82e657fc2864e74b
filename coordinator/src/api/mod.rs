//! REST APIハンドラー
//!
//! サービス一覧、ハートビート、ログ参照、トークン権限確認

pub mod error;
pub mod service;
pub mod token;

use crate::auth::middleware::capability_middleware;
use crate::AppState;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// APIルーターを作成
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/service", get(service::list_services))
        .route("/service/:service/hb", post(service::heartbeat))
        .route("/service/:service/logs", get(service::get_logs))
        .route("/token/:token/capability", get(token::get_capability))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            capability_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
