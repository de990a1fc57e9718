// ==========================================
// 企业名录系统 - 导入领域模型
// ==========================================
// 职责: 导入请求 / 原始记录 / 校验结果 / 导入结果
// 流程: ImportRequest → RawRecord → ValidatedRecord → ResolvedPersonRecord → ImportResult
// ==========================================

use crate::domain::types::{EntityKind, ImportStage};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;

// ==========================================
// ImportRequest - 导入请求
// ==========================================
// 由上传暂存方创建，管道只读不改；文件在管道退出时被删除
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRequest {
    pub staged_file_path: PathBuf,
    pub declared_mime_type: String,
    pub entity_kind: EntityKind,
}

impl ImportRequest {
    pub fn new(
        staged_file_path: impl Into<PathBuf>,
        declared_mime_type: impl Into<String>,
        entity_kind: EntityKind,
    ) -> Self {
        Self {
            staged_file_path: staged_file_path.into(),
            declared_mime_type: declared_mime_type.into(),
            entity_kind,
        }
    }
}

// ==========================================
// RawRecord - 原始记录（未校验）
// ==========================================
// CSV: 全部为字符串且扁平
// JSON: 保留原生类型，可能嵌套（address / contactInfo）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawRecord {
    pub record_number: usize, // 在源文件中的序号（从 1 开始）
    pub fields: Map<String, Value>,
}

impl RawRecord {
    pub fn new(record_number: usize, fields: Map<String, Value>) -> Self {
        Self {
            record_number,
            fields,
        }
    }

    /// JSON 数组元素 → RawRecord（非对象元素得到空记录，交给校验器拒绝）
    pub fn from_json(record_number: usize, value: Value) -> Self {
        let fields = match value {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self::new(record_number, fields)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// 读取标量字段的文本形式（TRIM 后非空才返回）
    pub fn text(&self, field: &str) -> Option<String> {
        self.fields.get(field).and_then(scalar_text)
    }

    /// 读取分组字段: 优先嵌套形式 `group.field`，其次扁平形式 `field`
    pub fn group_text(&self, group: &str, field: &str) -> Option<String> {
        self.fields
            .get(group)
            .and_then(Value::as_object)
            .and_then(|nested| nested.get(field))
            .and_then(scalar_text)
            .or_else(|| self.text(field))
    }

    pub fn is_blank(&self) -> bool {
        self.fields.values().all(|v| scalar_text(v).is_none())
    }
}

/// 标量 → 文本；null / 数组 / 对象视为缺失
pub fn scalar_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

// ==========================================
// ValidatedRecord - 校验后的记录
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub enum ValidatedRecord {
    Valid(RawRecord),
    Invalid { record: RawRecord, reason: String },
}

impl ValidatedRecord {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidatedRecord::Valid(_))
    }
}

// ==========================================
// RecordRejection - 被跳过的单条记录
// ==========================================
// 非致命: 计入 skipped_count，reason 原样进入诊断列表
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordRejection {
    pub record_number: usize,
    pub stage: ImportStage,
    pub reason: String,
}

// ==========================================
// ResolvedPersonRecord - 已解析雇主的人员记录
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPersonRecord {
    pub record: RawRecord,
    pub company_id: String,
}

// ==========================================
// ImportResult - 导入结果
// ==========================================
// inserted_count: 存储实际接受的记录数（不是读取行数）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    pub entity_kind: EntityKind,
    pub total_records: usize,
    pub inserted_count: usize,
    pub skipped_count: usize,
    pub diagnostics: Vec<String>,
}
