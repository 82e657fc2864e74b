//! ヘルスチェッカー
//!
//! アクティブ監視の猫が自ら行うPULL型の生存確認

pub mod http_checker;

pub use http_checker::HttpStatusChecker;

use async_trait::async_trait;

/// 1回きりの生存確認
///
/// 通信エラーはエラーとして返さず、`false` に丸める。
#[async_trait]
pub trait Checker: Send + Sync {
    /// 対象が生きていれば `true`
    async fn check(&self) -> bool;
}

/// 常に同じ結果を返すチェッカー
#[derive(Debug, Clone, Copy)]
pub struct FixedChecker(pub bool);

#[async_trait]
impl Checker for FixedChecker {
    async fn check(&self) -> bool {
        self.0
    }
}
