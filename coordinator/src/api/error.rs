//! APIエラーレスポンス型
//!
//! axum用の共通エラーハンドリング

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use tracing::debug;
use watchcat_common::error::WatchcatError;

/// Axum用のエラーレスポンス型
#[derive(Debug)]
pub struct AppError(pub WatchcatError);

impl From<WatchcatError> for AppError {
    fn from(err: WatchcatError) -> Self {
        AppError(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        // 詳細はログにのみ出し、クライアントには外部向けメッセージを返す
        debug!(error = %self.0, "API request failed");

        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let payload = json!({
            "ok": false,
            "error": self.0.external_message(),
        });

        (status, Json(payload)).into_response()
    }
}
