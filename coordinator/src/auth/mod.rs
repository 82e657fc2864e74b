//! 認証・認可
//!
//! 単一の共有Bearerトークンで全権限（GET_LOG / HEARTBEAT / LIST_SERVICE）を付与する。
//! トークンが無い・不正な場合は権限なしとして扱い、エラーにはしない。

pub mod middleware;

use axum::http::{header, HeaderMap};
use watchcat_common::error::{WatchcatError, WatchcatResult};
use watchcat_common::types::Capability;

/// リクエストに付与された権限
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Capabilities(Vec<Capability>);

impl Capabilities {
    /// 権限なし
    pub fn none() -> Self {
        Self::default()
    }

    /// 共有トークンが付与する全権限
    pub fn all() -> Self {
        Self(Capability::all())
    }

    /// 権限を持っているか
    pub fn contains(&self, capability: Capability) -> bool {
        self.0.contains(&capability)
    }

    /// 権限を要求し、無ければ Unauthorized
    pub fn require(&self, capability: Capability) -> WatchcatResult<()> {
        if self.contains(capability) {
            Ok(())
        } else {
            Err(WatchcatError::Unauthorized(format!("{:?} required", capability)))
        }
    }

    /// 権限一覧
    pub fn as_slice(&self) -> &[Capability] {
        &self.0
    }
}

/// `Authorization: Bearer <token>` からトークンを取り出す
///
/// スペース区切りで厳密に2要素、1要素目が `Bearer` の場合のみ。
pub fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) => Some(token),
        _ => None,
    }
}

/// ヘッダーから権限を解決
pub fn resolve_capabilities(headers: &HeaderMap, http_token: &str) -> Capabilities {
    match extract_bearer(headers) {
        Some(token) if token_matches(token, http_token) => Capabilities::all(),
        _ => Capabilities::none(),
    }
}

/// 長さ以外で早期に抜けないトークン比較
pub fn token_matches(presented: &str, expected: &str) -> bool {
    let (a, b) = (presented.as_bytes(), expected.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
