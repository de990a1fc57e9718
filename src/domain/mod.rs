// ==========================================
// 企业名录系统 - 领域模型层
// ==========================================
// 职责: 定义导入涉及的实体与类型
// 红线: 不含数据访问逻辑,不含导入流程逻辑
// ==========================================

pub mod company;
pub mod import;
pub mod person;
pub mod types;

// 重导出核心类型
pub use company::{Address, CompanyContactInfo, NewCompany};
pub use import::{
    ImportRequest, ImportResult, RawRecord, RecordRejection, ResolvedPersonRecord,
    ValidatedRecord,
};
pub use person::{NewPerson, PersonContactInfo};
pub use types::{EntityKind, ImportStage};
