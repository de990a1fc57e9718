// ==========================================
// 企业名录系统 - 批量导入核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 公司 / 人员名录的批量导入管道
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 导入配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    EntityKind, ImportRequest, ImportResult, ImportStage, NewCompany, NewPerson, RawRecord,
};

// 导入
pub use importer::{DirectoryImporter, DirectoryImporterImpl, FailureKind, ImportError};

// 仓储
pub use repository::{DirectoryImportRepository, DirectoryImportRepositoryImpl};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "企业名录批量导入";
