// ==========================================
// 企业名录系统 - 导入 Trait
// ==========================================
// 职责: 定义导入接口（不包含实现）
// ==========================================

use crate::domain::{EntityKind, ImportRequest, ImportResult, RawRecord};
use crate::importer::error::PipelineResult;
use async_trait::async_trait;
use std::io::Read;
use std::path::PathBuf;

/// 惰性、有限、不可重放的原始记录序列
pub type RawRecordStream = Box<dyn Iterator<Item = PipelineResult<RawRecord>> + Send>;

// ==========================================
// DirectoryImporter Trait
// ==========================================
// 用途: 导入主接口
// 实现者: DirectoryImporterImpl
#[async_trait]
pub trait DirectoryImporter: Send + Sync {
    /// 执行一次导入
    ///
    /// # 参数
    /// - request: 导入请求（消费；暂存文件在返回前被删除）
    ///
    /// # 返回
    /// - Ok(ImportResult): 写入数 / 跳过数 / 诊断信息
    /// - Err: 格式错误、无有效记录、存储错误
    ///
    /// # 导入流程
    /// 1. 解析（CSV 流式 / JSON 整体）
    /// 2. 必填字段校验
    /// 3. 雇主名称解析（仅人员）
    /// 4. 无序批量写入
    /// 5. 删除暂存文件（任何退出路径）
    async fn import(&self, request: ImportRequest) -> PipelineResult<ImportResult>;

    /// 从上传暂存信息直接导入（entity_kind 为调用方原始字符串）
    ///
    /// # 说明
    /// - 即使 entity_kind 非法，暂存文件同样会被删除
    async fn import_staged_upload(
        &self,
        staged_file_path: PathBuf,
        declared_mime_type: &str,
        entity_kind: &str,
    ) -> PipelineResult<ImportResult>;
}

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 单一格式的解析适配器（CSV / JSON）
// 实现者: CsvParser, JsonParser
pub trait FileParser: Send + Sync {
    /// 将原始字节解析为统一的 RawRecord 序列
    ///
    /// # 参数
    /// - source: 原始字节来源
    /// - kind: 实体类型（JSON 需要据此选择集合字段）
    ///
    /// # 返回
    /// - Ok(stream): 惰性记录序列（流中出现的错误同样是 ParseError）
    /// - Err: ParseError / FileReadError
    fn parse_records(
        &self,
        source: Box<dyn Read + Send>,
        kind: EntityKind,
    ) -> PipelineResult<RawRecordStream>;
}
