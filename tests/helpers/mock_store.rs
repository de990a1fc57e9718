// ==========================================
// Mock 存储实现 - 用于集成测试
// ==========================================
// 内存版 DirectoryImportRepository，支持故障注入:
// - 查找失败 / 写入整批失败
// - 查找永久挂起（模拟取消）
// - 按名称注入查找延迟（打乱完成顺序）
// - 公司名称唯一约束
// ==========================================

use async_trait::async_trait;
use corp_directory_import::domain::{NewCompany, NewPerson};
use corp_directory_import::repository::{
    BulkInsertOutcome, BulkWriteFailure, CompanyLookup, DirectoryImportRepository,
    RepositoryError, RepositoryResult,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use uuid::Uuid;

#[derive(Default)]
pub struct MockStore {
    pub companies: Mutex<Vec<(String, NewCompany)>>,
    pub people: Mutex<Vec<(String, NewPerson)>>,

    // 查找记录
    pub lookups_started: Mutex<Vec<String>>,
    pub lookups_finished: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,

    // 故障注入
    pub lookup_delays: HashMap<String, Duration>,
    pub fail_lookup: bool,
    pub block_lookups: bool,
    pub fail_insert: bool,
    pub unique_company_names: bool,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, name: &str, millis: u64) -> Self {
        self.lookup_delays
            .insert(name.to_string(), Duration::from_millis(millis));
        self
    }

    /// 直接写入一家公司，返回 ID
    pub fn seed_company(&self, name: &str) -> String {
        let id = Uuid::new_v4().to_string();
        self.companies
            .lock()
            .unwrap()
            .push((id.clone(), NewCompany::new(name, "Testing")));
        id
    }

    pub fn company_names(&self) -> Vec<String> {
        self.companies
            .lock()
            .unwrap()
            .iter()
            .map(|(_, c)| c.name.clone())
            .collect()
    }

    pub fn person_names(&self) -> Vec<String> {
        self.people
            .lock()
            .unwrap()
            .iter()
            .map(|(_, p)| p.name.clone())
            .collect()
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups_started.lock().unwrap().len()
    }
}

#[async_trait]
impl CompanyLookup for MockStore {
    async fn find_company_id_by_name(&self, name: &str) -> RepositoryResult<Option<String>> {
        self.lookups_started.lock().unwrap().push(name.to_string());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if self.block_lookups {
            futures::future::pending::<()>().await;
        }
        if let Some(delay) = self.lookup_delays.get(name) {
            tokio::time::sleep(*delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.lookups_finished.lock().unwrap().push(name.to_string());

        if self.fail_lookup {
            return Err(RepositoryError::DatabaseConnectionError(
                "connection refused".to_string(),
            ));
        }

        Ok(self
            .companies
            .lock()
            .unwrap()
            .iter()
            .find(|(_, c)| c.name == name)
            .map(|(id, _)| id.clone()))
    }
}

#[async_trait]
impl DirectoryImportRepository for MockStore {
    async fn insert_companies_unordered(
        &self,
        companies: Vec<NewCompany>,
    ) -> RepositoryResult<BulkInsertOutcome> {
        if self.fail_insert {
            return Err(RepositoryError::DatabaseTransactionError(
                "disk I/O error".to_string(),
            ));
        }

        let mut stored = self.companies.lock().unwrap();
        let mut outcome = BulkInsertOutcome::default();
        for (index, company) in companies.into_iter().enumerate() {
            if self.unique_company_names && stored.iter().any(|(_, c)| c.name == company.name) {
                outcome.failures.push(BulkWriteFailure {
                    index,
                    message: "UNIQUE constraint failed: company.name".to_string(),
                });
                continue;
            }
            let id = Uuid::new_v4().to_string();
            stored.push((id.clone(), company));
            outcome.inserted_ids.push(id);
        }
        Ok(outcome)
    }

    async fn insert_people_unordered(
        &self,
        people: Vec<NewPerson>,
    ) -> RepositoryResult<BulkInsertOutcome> {
        if self.fail_insert {
            return Err(RepositoryError::DatabaseTransactionError(
                "disk I/O error".to_string(),
            ));
        }

        let companies = self.companies.lock().unwrap();
        let mut stored = self.people.lock().unwrap();
        let mut outcome = BulkInsertOutcome::default();
        for (index, person) in people.into_iter().enumerate() {
            if !companies.iter().any(|(id, _)| *id == person.company_id) {
                outcome.failures.push(BulkWriteFailure {
                    index,
                    message: "FOREIGN KEY constraint failed".to_string(),
                });
                continue;
            }
            let id = Uuid::new_v4().to_string();
            stored.push((id.clone(), person));
            outcome.inserted_ids.push(id);
        }
        Ok(outcome)
    }
}
