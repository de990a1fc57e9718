// ==========================================
// Mock 配置实现 - 用于集成测试
// ==========================================

use async_trait::async_trait;
use corp_directory_import::config::ImportConfigReader;
use std::error::Error;

/// Mock 配置结构
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub resolver_concurrency: usize,
    pub memoize_lookups: bool,
    pub fail: bool,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            resolver_concurrency: 8,
            memoize_lookups: true,
            fail: false,
        }
    }
}

impl MockConfig {
    pub fn with_concurrency(resolver_concurrency: usize) -> Self {
        Self {
            resolver_concurrency,
            ..Self::default()
        }
    }
}

#[async_trait]
impl ImportConfigReader for MockConfig {
    async fn get_resolver_concurrency(&self) -> Result<usize, Box<dyn Error + Send + Sync>> {
        if self.fail {
            return Err("config store offline".into());
        }
        Ok(self.resolver_concurrency)
    }

    async fn get_memoize_lookups(&self) -> Result<bool, Box<dyn Error + Send + Sync>> {
        if self.fail {
            return Err("config store offline".into());
        }
        Ok(self.memoize_lookups)
    }
}
