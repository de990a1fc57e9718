// ==========================================
// 企业名录系统 - 导入 Repository Trait
// ==========================================
// 职责: 定义导入相关数据访问接口（不包含业务逻辑）
// 红线: Repository 不含业务规则，只做查找与写入
// ==========================================

use crate::domain::{NewCompany, NewPerson};
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ==========================================
// 批量写入结果
// ==========================================

/// 单条记录写入失败（批内下标 + 存储给出的原因）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkWriteFailure {
    pub index: usize,
    pub message: String,
}

/// 无序、逐条容错的批量写入结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkInsertOutcome {
    pub inserted_ids: Vec<String>,
    pub failures: Vec<BulkWriteFailure>,
}

impl BulkInsertOutcome {
    pub fn inserted_count(&self) -> usize {
        self.inserted_ids.len()
    }
}

// ==========================================
// CompanyLookup Trait
// ==========================================
// 用途: 雇主名称解析（精确、大小写敏感）
// 实现者: DirectoryImportRepositoryImpl / 测试用内存实现
#[async_trait]
pub trait CompanyLookup: Send + Sync {
    /// 按名称精确查找公司
    ///
    /// # 返回
    /// - Ok(Some(id)): 找到（同名多条时返回最早创建的一条）
    /// - Ok(None): 不存在
    /// - Err: 存储错误
    async fn find_company_id_by_name(&self, name: &str) -> RepositoryResult<Option<String>>;
}

// ==========================================
// DirectoryImportRepository Trait
// ==========================================
#[async_trait]
pub trait DirectoryImportRepository: CompanyLookup {
    /// 批量写入公司（无序，单条失败不影响其他记录）
    ///
    /// # 返回
    /// - Ok(outcome): 成功写入的 ID + 被拒绝的记录
    /// - Err: 整批无法提交（连接失败/事务失败），不报告部分成功
    async fn insert_companies_unordered(
        &self,
        companies: Vec<NewCompany>,
    ) -> RepositoryResult<BulkInsertOutcome>;

    /// 批量写入人员（无序，单条失败不影响其他记录）
    async fn insert_people_unordered(
        &self,
        people: Vec<NewPerson>,
    ) -> RepositoryResult<BulkInsertOutcome>;
}

#[async_trait]
impl<T: CompanyLookup + ?Sized> CompanyLookup for Arc<T> {
    async fn find_company_id_by_name(&self, name: &str) -> RepositoryResult<Option<String>> {
        (**self).find_company_id_by_name(name).await
    }
}

#[async_trait]
impl<T: DirectoryImportRepository + ?Sized> DirectoryImportRepository for Arc<T> {
    async fn insert_companies_unordered(
        &self,
        companies: Vec<NewCompany>,
    ) -> RepositoryResult<BulkInsertOutcome> {
        (**self).insert_companies_unordered(companies).await
    }

    async fn insert_people_unordered(
        &self,
        people: Vec<NewPerson>,
    ) -> RepositoryResult<BulkInsertOutcome> {
        (**self).insert_people_unordered(people).await
    }
}
