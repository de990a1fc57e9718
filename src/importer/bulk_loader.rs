// ==========================================
// 企业名录系统 - 批量写入器
// ==========================================
// 阶段: Loading
// 流程: 字段映射 → 无序批量写入 → 单条拒绝回填为源记录序号
// 说明: 单条约束失败不影响其他记录；整批失败为致命错误
// ==========================================

use crate::domain::{ImportStage, RawRecord, RecordRejection, ResolvedPersonRecord};
use crate::importer::error::PipelineResult;
use crate::importer::field_mapper::FieldMapper;
use crate::repository::{BulkInsertOutcome, DirectoryImportRepository};
use tracing::{debug, info};

/// 写入结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadOutcome {
    pub inserted: usize,
    pub rejected: Vec<RecordRejection>,
}

pub struct BulkLoader {
    mapper: FieldMapper,
}

impl Default for BulkLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl BulkLoader {
    pub fn new() -> Self {
        Self {
            mapper: FieldMapper,
        }
    }

    pub fn rejected_reason(record_number: usize, reason: &str) -> String {
        format!("record {}: rejected: {}", record_number, reason)
    }

    fn rejection(record_number: usize, reason: &str) -> RecordRejection {
        RecordRejection {
            record_number,
            stage: ImportStage::Loading,
            reason: Self::rejected_reason(record_number, reason),
        }
    }

    /// 写入公司记录
    pub async fn load_companies<R>(
        &self,
        repo: &R,
        records: Vec<RawRecord>,
    ) -> PipelineResult<LoadOutcome>
    where
        R: DirectoryImportRepository + ?Sized,
    {
        let mut rejected = Vec::new();
        let mut record_numbers = Vec::with_capacity(records.len());
        let mut companies = Vec::with_capacity(records.len());

        for record in &records {
            match self.mapper.map_company(record) {
                Ok(company) => {
                    record_numbers.push(record.record_number);
                    companies.push(company);
                }
                Err(e) => rejected.push(Self::rejection(record.record_number, &e.to_string())),
            }
        }

        if companies.is_empty() {
            return Ok(LoadOutcome {
                inserted: 0,
                rejected,
            });
        }

        let outcome = repo.insert_companies_unordered(companies).await?;
        Ok(Self::finish(record_numbers, outcome, rejected))
    }

    /// 写入人员记录（雇主已解析）
    pub async fn load_people<R>(
        &self,
        repo: &R,
        records: Vec<ResolvedPersonRecord>,
    ) -> PipelineResult<LoadOutcome>
    where
        R: DirectoryImportRepository + ?Sized,
    {
        let mut rejected = Vec::new();
        let mut record_numbers = Vec::with_capacity(records.len());
        let mut people = Vec::with_capacity(records.len());

        for resolved in &records {
            match self.mapper.map_person(resolved) {
                Ok(person) => {
                    record_numbers.push(resolved.record.record_number);
                    people.push(person);
                }
                Err(e) => {
                    rejected.push(Self::rejection(resolved.record.record_number, &e.to_string()))
                }
            }
        }

        if people.is_empty() {
            return Ok(LoadOutcome {
                inserted: 0,
                rejected,
            });
        }

        let outcome = repo.insert_people_unordered(people).await?;
        Ok(Self::finish(record_numbers, outcome, rejected))
    }

    // 批内下标 → 源记录序号
    fn finish(
        record_numbers: Vec<usize>,
        outcome: BulkInsertOutcome,
        mut rejected: Vec<RecordRejection>,
    ) -> LoadOutcome {
        for failure in &outcome.failures {
            let record_number = record_numbers
                .get(failure.index)
                .copied()
                .unwrap_or(failure.index + 1);
            debug!(record_number, reason = %failure.message, "存储拒绝单条记录");
            rejected.push(Self::rejection(record_number, &failure.message));
        }

        rejected.sort_by_key(|r| r.record_number);

        info!(
            inserted = outcome.inserted_count(),
            rejected = rejected.len(),
            "批量写入完成"
        );

        LoadOutcome {
            inserted: outcome.inserted_count(),
            rejected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewCompany, NewPerson};
    use crate::importer::error::ImportError;
    use crate::repository::{BulkWriteFailure, CompanyLookup, RepositoryError, RepositoryResult};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// 拒绝名称以 "dup" 开头的公司
    #[derive(Default)]
    struct PickyRepo {
        submitted: Mutex<Vec<String>>,
        down: bool,
    }

    #[async_trait]
    impl CompanyLookup for PickyRepo {
        async fn find_company_id_by_name(&self, _name: &str) -> RepositoryResult<Option<String>> {
            Ok(None)
        }
    }

    #[async_trait]
    impl DirectoryImportRepository for PickyRepo {
        async fn insert_companies_unordered(
            &self,
            companies: Vec<NewCompany>,
        ) -> RepositoryResult<BulkInsertOutcome> {
            if self.down {
                return Err(RepositoryError::DatabaseTransactionError("rollback".into()));
            }
            let mut outcome = BulkInsertOutcome::default();
            for (index, company) in companies.into_iter().enumerate() {
                self.submitted.lock().unwrap().push(company.name.clone());
                if company.name.starts_with("dup") {
                    outcome.failures.push(BulkWriteFailure {
                        index,
                        message: "UNIQUE constraint failed: company.name".into(),
                    });
                } else {
                    outcome.inserted_ids.push(format!("id-{}", index));
                }
            }
            Ok(outcome)
        }

        async fn insert_people_unordered(
            &self,
            people: Vec<NewPerson>,
        ) -> RepositoryResult<BulkInsertOutcome> {
            Ok(BulkInsertOutcome {
                inserted_ids: people.iter().map(|p| p.name.clone()).collect(),
                failures: Vec::new(),
            })
        }
    }

    fn company(n: usize, name: &str) -> RawRecord {
        RawRecord::from_json(n, json!({"name": name, "industry": "Tech"}))
    }

    #[tokio::test]
    async fn test_store_rejection_maps_to_record_number() {
        let repo = PickyRepo::default();
        let records = vec![company(2, "Acme"), company(5, "dup-Acme"), company(7, "Globex")];

        let outcome = BulkLoader::new().load_companies(&repo, records).await.unwrap();

        assert_eq!(outcome.inserted, 2);
        assert_eq!(outcome.rejected.len(), 1);
        assert_eq!(outcome.rejected[0].record_number, 5);
        assert_eq!(
            outcome.rejected[0].reason,
            "record 5: rejected: UNIQUE constraint failed: company.name"
        );
    }

    #[tokio::test]
    async fn test_mapping_failure_is_skipped_not_submitted() {
        let repo = PickyRepo::default();
        let bad = RawRecord::from_json(
            1,
            json!({"name": "Bad", "industry": "Tech", "foundedYear": "nineteen"}),
        );

        let outcome = BulkLoader::new()
            .load_companies(&repo, vec![bad, company(2, "Acme")])
            .await
            .unwrap();

        assert_eq!(outcome.inserted, 1);
        assert_eq!(*repo.submitted.lock().unwrap(), vec!["Acme".to_string()]);
        assert_eq!(
            outcome.rejected[0].reason,
            "record 1: rejected: invalid foundedYear: not an integer: nineteen"
        );
    }

    #[tokio::test]
    async fn test_whole_batch_failure_is_fatal() {
        let repo = PickyRepo {
            down: true,
            ..Default::default()
        };

        let result = BulkLoader::new()
            .load_companies(&repo, vec![company(1, "Acme")])
            .await;

        assert!(matches!(result, Err(ImportError::StoreError(_))));
    }

    #[tokio::test]
    async fn test_load_people() {
        let repo = PickyRepo::default();
        let resolved = ResolvedPersonRecord {
            record: RawRecord::from_json(
                1,
                json!({"name": "Ann", "designation": "CEO", "companyName": "Acme"}),
            ),
            company_id: "c-1".into(),
        };

        let outcome = BulkLoader::new().load_people(&repo, vec![resolved]).await.unwrap();

        assert_eq!(outcome.inserted, 1);
        assert!(outcome.rejected.is_empty());
    }
}
