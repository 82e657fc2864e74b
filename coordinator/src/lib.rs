//! watchcat
//!
//! サービスの生存監視（デッドマンスイッチ）サーバー

#![warn(missing_docs)]

/// REST APIハンドラー
pub mod api;

/// Bearerトークンによる権限解決
pub mod auth;

/// 監視エンティティ（猫）
pub mod cat;

/// CLIインターフェース
pub mod cli;

/// 設定管理（環境変数ヘルパー）
pub mod config;

/// アクティブ監視用ヘルスチェッカー
pub mod health;

/// ロギング初期化ユーティリティ
pub mod logging;

/// 通知器（Discord Webhook等）
pub mod notifier;

/// 猫レジストリ
pub mod registry;

/// 猫ごとの定期チェック
pub mod scheduler;

/// axumサーバー起動・シャットダウンハンドリング
pub mod server;

/// サービスログストア
pub mod service_log;

/// Graceful shutdown coordination
pub mod shutdown;

use std::sync::Arc;

/// アプリケーション状態
#[derive(Clone)]
pub struct AppState {
    /// 猫レジストリ
    pub registry: registry::CatRegistry,
    /// サービスログストア
    pub service_logs: service_log::ServiceLogStore,
    /// 設定ファイルのHTTPトークン
    pub http_token: Arc<str>,
    /// シャットダウン制御
    pub shutdown: shutdown::ShutdownController,
}
