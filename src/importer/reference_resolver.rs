// ==========================================
// 企业名录系统 - 雇主引用解析器
// ==========================================
// 阶段: Resolving（仅人员）
// 规则:
// - 已带 companyId 的记录直接通过
// - 其余按 companyName 精确、大小写敏感查找公司
// - 找不到 → 丢弃该记录并记录诊断，批次继续
// 并发: 不同名称的查询并发执行；输出顺序与输入一致，与完成顺序无关
// ==========================================

use crate::config::ImportOptions;
use crate::domain::{ImportStage, RawRecord, RecordRejection, ResolvedPersonRecord};
use crate::importer::error::PipelineResult;
use crate::importer::field_mapper::fields;
use crate::repository::CompanyLookup;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::collections::HashMap;
use tracing::debug;

/// 解析结果
#[derive(Debug, Clone, Default)]
pub struct ResolutionReport {
    pub resolved: Vec<ResolvedPersonRecord>,
    pub rejected: Vec<RecordRejection>,
    /// 实际发出的查询次数
    pub lookups: usize,
}

pub struct ReferenceResolver {
    concurrency: usize,
    memoize: bool,
}

impl ReferenceResolver {
    pub fn new(options: &ImportOptions) -> Self {
        Self {
            concurrency: options.resolver_concurrency.max(1),
            memoize: options.memoize_lookups,
        }
    }

    pub fn not_found_reason(person_name: &str, company_name: &str) -> String {
        format!("company not found for {}, {}", person_name, company_name)
    }

    /// 解析一批已通过校验的人员记录
    ///
    /// # 返回
    /// - Ok(report): 已解析记录 + 被丢弃记录（均保持输入顺序）
    /// - Err: 查询本身失败（存储错误，致命）
    pub async fn resolve<L>(
        &self,
        lookup: &L,
        records: Vec<RawRecord>,
    ) -> PipelineResult<ResolutionReport>
    where
        L: CompanyLookup + ?Sized,
    {
        // 步骤 1: 收集需要查询的名称
        let mut keys: Vec<String> = Vec::new();
        let mut key_of_record: Vec<Option<usize>> = Vec::with_capacity(records.len());
        let mut key_by_name: HashMap<String, usize> = HashMap::new();

        for record in &records {
            if record.text(fields::COMPANY_ID).is_some() {
                key_of_record.push(None);
                continue;
            }

            let name = record.text(fields::COMPANY_NAME).unwrap_or_default();
            let key = if self.memoize {
                *key_by_name.entry(name.clone()).or_insert_with(|| {
                    keys.push(name);
                    keys.len() - 1
                })
            } else {
                keys.push(name);
                keys.len() - 1
            };
            key_of_record.push(Some(key));
        }

        // 步骤 2: 并发查询
        // 查询 future 持有自己的名称，保证整体 future 为 Send
        let outcomes: Vec<(usize, Option<String>)> =
            stream::iter(keys.clone().into_iter().enumerate())
                .map(move |(idx, name)| async move {
                    lookup
                        .find_company_id_by_name(&name)
                        .await
                        .map(|found| (idx, found))
                })
                .buffer_unordered(self.concurrency)
                .try_collect()
                .await?;

        let mut found: Vec<Option<String>> = vec![None; keys.len()];
        for (idx, company_id) in outcomes {
            found[idx] = company_id;
        }

        debug!(
            records = records.len(),
            lookups = keys.len(),
            matched = found.iter().filter(|f| f.is_some()).count(),
            "雇主名称查询完成"
        );

        // 步骤 3: 按输入顺序组装结果
        let mut report = ResolutionReport {
            lookups: keys.len(),
            ..Default::default()
        };

        for (record, key) in records.into_iter().zip(key_of_record) {
            let company_id = match key {
                None => record.text(fields::COMPANY_ID),
                Some(k) => found[k].clone(),
            };

            match company_id {
                Some(company_id) => report.resolved.push(ResolvedPersonRecord { record, company_id }),
                None => {
                    let reason = Self::not_found_reason(
                        &record.text(fields::NAME).unwrap_or_default(),
                        &record.text(fields::COMPANY_NAME).unwrap_or_default(),
                    );
                    report.rejected.push(RecordRejection {
                        record_number: record.record_number,
                        stage: ImportStage::Resolving,
                        reason,
                    });
                }
            }
        }

        Ok(report)
    }
}
