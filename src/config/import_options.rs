// ==========================================
// 企业名录系统 - 导入选项
// ==========================================
// 职责: 每次导入开始时读取一次配置，管道内只使用这份快照
// ==========================================

use crate::config::config_manager::DEFAULT_RESOLVER_CONCURRENCY;
use crate::config::import_config_trait::ImportConfigReader;
use std::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOptions {
    pub resolver_concurrency: usize,
    pub memoize_lookups: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            resolver_concurrency: DEFAULT_RESOLVER_CONCURRENCY,
            memoize_lookups: true,
        }
    }
}

impl ImportOptions {
    pub async fn load<C>(config: &C) -> Result<Self, Box<dyn Error + Send + Sync>>
    where
        C: ImportConfigReader + ?Sized,
    {
        Ok(Self {
            resolver_concurrency: config.get_resolver_concurrency().await?.max(1),
            memoize_lookups: config.get_memoize_lookups().await?,
        })
    }
}
