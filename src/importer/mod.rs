// ==========================================
// 企业名录系统 - 导入层
// ==========================================
// 职责: 上传文件 → 公司 / 人员记录
// 支持: CSV, JSON
// 流程: 解析 → 校验 → 雇主解析（仅人员）→ 批量写入 → 删除暂存文件
// ==========================================

// 模块声明
pub mod bulk_loader;
pub mod directory_importer_impl;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod importer_trait;
pub mod record_validator;
pub mod reference_resolver;
pub mod staged_file;

// 重导出核心类型
pub use bulk_loader::{BulkLoader, LoadOutcome};
pub use directory_importer_impl::DirectoryImporterImpl;
pub use error::{FailureKind, ImportError, PipelineResult};
pub use field_mapper::{FieldMapper, MappingError};
pub use file_parser::{CsvParser, DeclaredFormat, JsonParser, UniversalFileParser, MIME_CSV, MIME_JSON};
pub use record_validator::{RecordValidator, ValidationReport};
pub use reference_resolver::{ReferenceResolver, ResolutionReport};
pub use staged_file::{CleanupError, StagedFile};

// 重导出 Trait 接口
pub use importer_trait::{DirectoryImporter, FileParser, RawRecordStream};
