// ==========================================
// 企业名录系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::import_config_trait::ImportConfigReader;
use crate::db::open_sqlite_connection;
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// 默认并发查询上限
pub const DEFAULT_RESOLVER_CONCURRENCY: usize = 8;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error + Send + Sync>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        Ok(value)
    }

    /// 从 config_kv 表读取配置值，带默认值
    fn get_config_or_default(
        &self,
        key: &str,
        default: &str,
    ) -> Result<String, Box<dyn Error + Send + Sync>> {
        Ok(self
            .get_config_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// 写入 global scope 配置（UPSERT）
    pub fn set_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;

        Ok(())
    }
}

// ==========================================
// ImportConfigReader Trait 实现
// ==========================================
#[async_trait]
impl ImportConfigReader for ConfigManager {
    async fn get_resolver_concurrency(&self) -> Result<usize, Box<dyn Error + Send + Sync>> {
        let default = DEFAULT_RESOLVER_CONCURRENCY.to_string();
        let value = self.get_config_or_default(config_keys::RESOLVER_CONCURRENCY, &default)?;
        let parsed = value.trim().parse::<usize>().unwrap_or_else(|_| {
            tracing::warn!(
                config_key = config_keys::RESOLVER_CONCURRENCY,
                raw_value = %value,
                "并发配置格式错误，使用默认值"
            );
            DEFAULT_RESOLVER_CONCURRENCY
        });
        Ok(parsed.max(1))
    }

    async fn get_memoize_lookups(&self) -> Result<bool, Box<dyn Error + Send + Sync>> {
        let value = self.get_config_or_default(config_keys::MEMOIZE_LOOKUPS, "true")?;
        Ok(!matches!(
            value.trim().to_lowercase().as_str(),
            "0" | "false" | "no" | "off"
        ))
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 雇主名称解析
    pub const RESOLVER_CONCURRENCY: &str = "import_resolver_concurrency";
    pub const MEMOIZE_LOOKUPS: &str = "import_memoize_lookups";
}

/// 获取默认数据库路径
///
/// # 返回
/// - 环境变量 CORP_DIRECTORY_DB_PATH（非空时）
/// - 否则: 用户数据目录/corp-directory/corp_directory.db
/// - 取不到数据目录时: ./corp_directory.db
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var("CORP_DIRECTORY_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./corp_directory.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("corp-directory");
        // 目录创建失败时退回当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("corp_directory.db");
        }
    }

    path.to_string_lossy().to_string()
}
