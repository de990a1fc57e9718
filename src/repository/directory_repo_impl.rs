// ==========================================
// 企业名录系统 - 导入 Repository 实现
// ==========================================
// 职责: 实现导入相关数据访问（使用 rusqlite）
// 策略: 单事务内逐条 INSERT；约束失败记为单条拒绝，其他错误整批回滚
// ==========================================

use crate::db::{configure_sqlite_connection, open_sqlite_connection};
use crate::domain::{NewCompany, NewPerson};
use crate::repository::directory_repo::{
    BulkInsertOutcome, BulkWriteFailure, CompanyLookup, DirectoryImportRepository,
};
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Statement};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, warn};
use uuid::Uuid;

const INSERT_COMPANY_SQL: &str = r#"
    INSERT INTO company (
        id, name, industry, description,
        street, city, state, country, zip_code,
        email, phone, website,
        founded_year, employee_count, created_at
    ) VALUES (
        ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15
    )
"#;

const INSERT_PERSON_SQL: &str = r#"
    INSERT INTO person (
        id, name, designation, department, company_id, company_name,
        email, phone,
        street, city, state, country, zip_code,
        bio, created_at
    ) VALUES (
        ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15
    )
"#;

// ==========================================
// DirectoryImportRepositoryImpl
// ==========================================
pub struct DirectoryImportRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl DirectoryImportRepositoryImpl {
    /// 创建新的 Repository 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建（会再次应用统一 PRAGMA，幂等）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            configure_sqlite_connection(&guard)?;
        }

        Ok(Self { conn })
    }

    fn lock(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 在一个事务中逐条执行写入；约束失败只记录，不中断
    fn insert_each<T, F>(
        &self,
        sql: &str,
        items: &[T],
        mut execute: F,
    ) -> RepositoryResult<BulkInsertOutcome>
    where
        F: FnMut(&mut Statement<'_>, &str, &T) -> rusqlite::Result<usize>,
    {
        let conn = self.lock()?;
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let mut outcome = BulkInsertOutcome::default();
        {
            let mut stmt = tx.prepare(sql)?;
            for (index, item) in items.iter().enumerate() {
                let id = Uuid::new_v4().to_string();
                match execute(&mut stmt, &id, item) {
                    Ok(_) => outcome.inserted_ids.push(id),
                    Err(e) => {
                        let err = RepositoryError::from(e);
                        if !err.is_constraint_violation() {
                            // tx 在此处被 drop，整批回滚
                            warn!(index, error = %err, "批量写入中断，整批回滚");
                            return Err(err);
                        }
                        debug!(index, error = %err, "单条记录被存储拒绝");
                        outcome.failures.push(BulkWriteFailure {
                            index,
                            message: err.to_string(),
                        });
                    }
                }
            }
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        Ok(outcome)
    }
}

#[async_trait]
impl CompanyLookup for DirectoryImportRepositoryImpl {
    async fn find_company_id_by_name(&self, name: &str) -> RepositoryResult<Option<String>> {
        let conn = self.lock()?;
        let id = conn
            .query_row(
                "SELECT id FROM company WHERE name = ?1 ORDER BY created_at, rowid LIMIT 1",
                params![name],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(id)
    }
}

#[async_trait]
impl DirectoryImportRepository for DirectoryImportRepositoryImpl {
    async fn insert_companies_unordered(
        &self,
        companies: Vec<NewCompany>,
    ) -> RepositoryResult<BulkInsertOutcome> {
        self.insert_each(INSERT_COMPANY_SQL, &companies, |stmt, id, c| {
            stmt.execute(params![
                id,
                c.name,
                c.industry,
                c.description,
                c.address.street,
                c.address.city,
                c.address.state,
                c.address.country,
                c.address.zip_code,
                c.contact_info.email,
                c.contact_info.phone,
                c.contact_info.website,
                c.founded_year,
                c.employee_count,
                c.created_at.to_rfc3339(),
            ])
        })
    }

    async fn insert_people_unordered(
        &self,
        people: Vec<NewPerson>,
    ) -> RepositoryResult<BulkInsertOutcome> {
        self.insert_each(INSERT_PERSON_SQL, &people, |stmt, id, p| {
            stmt.execute(params![
                id,
                p.name,
                p.designation,
                p.department,
                p.company_id,
                p.company_name,
                p.contact_info.email,
                p.contact_info.phone,
                p.address.street,
                p.address.city,
                p.address.state,
                p.address.country,
                p.address.zip_code,
                p.bio,
                p.created_at.to_rfc3339(),
            ])
        })
    }
}
