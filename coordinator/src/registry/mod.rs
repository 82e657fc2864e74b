//! 猫レジストリ
//!
//! 起動時に設定から生成した猫を設定順に保持する。
//! 生成後の追加・削除はない。

use crate::cat::{Cat, CatKind};
use crate::config::MonitorSettings;
use crate::health::HttpStatusChecker;
use crate::notifier::Notifier;
use crate::service_log::ServiceLogger;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use watchcat_common::{
    config::{ServiceConfig, WatchcatConfig},
    error::{CommonError, WatchcatError, WatchcatResult},
    protocol::ServiceStatus,
};

/// 猫レジストリ
#[derive(Clone, Default)]
pub struct CatRegistry {
    cats: Arc<Vec<Arc<Cat>>>,
}

impl CatRegistry {
    /// 猫の一覧からレジストリを作成
    ///
    /// 名前の重複はエラー。
    pub fn new(cats: Vec<Cat>) -> WatchcatResult<Self> {
        let mut seen = HashSet::new();
        for cat in &cats {
            if !seen.insert(cat.name().to_string()) {
                return Err(CommonError::Validation(format!(
                    "Duplicate service name: {}",
                    cat.name()
                ))
                .into());
            }
        }
        Ok(Self {
            cats: Arc::new(cats.into_iter().map(Arc::new).collect()),
        })
    }

    /// 設定から全ての猫を生成
    pub fn from_config(
        config: &WatchcatConfig,
        start: DateTime<Utc>,
        notifier: Arc<dyn Notifier>,
        logger: Arc<dyn ServiceLogger>,
        settings: &MonitorSettings,
    ) -> WatchcatResult<Self> {
        let cats = config
            .services
            .iter()
            .map(|service| {
                build_cat(service, start, notifier.clone(), logger.clone(), settings)
            })
            .collect::<WatchcatResult<Vec<_>>>()?;
        Self::new(cats)
    }

    /// 全ての猫（設定順）
    pub fn list(&self) -> &[Arc<Cat>] {
        &self.cats
    }

    /// 猫の数
    pub fn len(&self) -> usize {
        self.cats.len()
    }

    /// 猫がいないか
    pub fn is_empty(&self) -> bool {
        self.cats.is_empty()
    }

    /// 名前で猫を取得
    pub fn get(&self, name: &str) -> WatchcatResult<Arc<Cat>> {
        self.cats
            .iter()
            .find(|cat| cat.name() == name)
            .cloned()
            .ok_or_else(|| WatchcatError::ServiceNotFound(name.to_string()))
    }

    /// パッシブ監視の猫にフィード
    ///
    /// 未知の名前とアクティブ監視の猫はどちらも見つからない扱い。
    pub async fn feed(&self, name: &str, now: DateTime<Utc>) -> WatchcatResult<()> {
        let cat = self.get(name)?;
        if cat.kind() != CatKind::Passive {
            return Err(WatchcatError::NotFeedable(name.to_string()));
        }
        cat.feed(now).await
    }

    /// 全ての猫の生存状態
    pub async fn statuses(&self, now: DateTime<Utc>) -> Vec<ServiceStatus> {
        let mut statuses = Vec::with_capacity(self.cats.len());
        for cat in self.cats.iter() {
            statuses.push(ServiceStatus {
                name: cat.name().to_string(),
                status: cat.is_alive(now).await,
            });
        }
        statuses
    }
}

fn build_cat(
    service: &ServiceConfig,
    start: DateTime<Utc>,
    notifier: Arc<dyn Notifier>,
    logger: Arc<dyn ServiceLogger>,
    settings: &MonitorSettings,
) -> WatchcatResult<Cat> {
    let cat = match service {
        ServiceConfig::Passive { name, .. } => Cat::passive(
            name.clone(),
            service.tolerance(),
            service.reminder(),
            start,
            notifier,
            logger,
        ),
        ServiceConfig::Active {
            name,
            check_endpoint,
            ..
        } => {
            let checker = HttpStatusChecker::new(check_endpoint.clone(), settings.probe_timeout)
                .map_err(|e| WatchcatError::Http(e.to_string()))?;
            Cat::active(
                name.clone(),
                service.tolerance(),
                service.reminder(),
                start,
                Arc::new(checker),
                notifier,
                logger,
            )
        }
    };
    Ok(cat.with_timeouts(settings.probe_timeout, settings.notify_timeout))
}
