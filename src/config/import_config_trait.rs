// ==========================================
// 企业名录系统 - 导入配置读取 Trait
// ==========================================
// 职责: 定义导入管道所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use async_trait::async_trait;
use std::error::Error;

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 用途: 导入管道所需的配置读取接口
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait ImportConfigReader: Send + Sync {
    /// 获取雇主名称解析的并发查询上限
    ///
    /// # 默认值
    /// - 8（小于 1 时按 1 处理）
    async fn get_resolver_concurrency(&self) -> Result<usize, Box<dyn Error + Send + Sync>>;

    /// 是否在同一批次内缓存雇主名称查询结果
    ///
    /// # 默认值
    /// - true
    async fn get_memoize_lookups(&self) -> Result<bool, Box<dyn Error + Send + Sync>>;
}
