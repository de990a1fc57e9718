// ==========================================
// 企业名录系统 - 领域类型定义
// ==========================================
// 职责: 导入实体类型 + 导入管道阶段
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 实体类型 (Entity Kind)
// ==========================================
// 可导入的两类记录: 公司 / 人员
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Company,
    Person,
}

impl EntityKind {
    /// JSON 文档中承载该类记录的集合字段名
    pub fn collection_key(&self) -> &'static str {
        match self {
            EntityKind::Company => "companies",
            EntityKind::Person => "people",
        }
    }

    /// 用于诊断信息的单数名称
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Company => "company",
            EntityKind::Person => "person",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.collection_key())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    /// 调用方传入 "companies" / "people"（兼容单数形式，大小写不敏感）
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "companies" | "company" => Ok(EntityKind::Company),
            "people" | "person" => Ok(EntityKind::Person),
            other => Err(other.to_string()),
        }
    }
}

// ==========================================
// 导入阶段 (Import Stage)
// ==========================================
// 状态机: Received → Parsing → Validating → Resolving(仅人员) → Loading → Completed | Failed
// 只允许向前迁移；任一阶段致命失败直接进入 Failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImportStage {
    Received,
    Parsing,
    Validating,
    Resolving,
    Loading,
    Completed,
    Failed,
}

impl ImportStage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ImportStage::Completed | ImportStage::Failed)
    }

    /// 判断 self → next 是否为合法迁移
    pub fn can_advance_to(&self, next: ImportStage) -> bool {
        if self.is_terminal() {
            return false;
        }
        match next {
            ImportStage::Failed => true,
            ImportStage::Received => false,
            _ => next > *self,
        }
    }
}

impl fmt::Display for ImportStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportStage::Received => write!(f, "RECEIVED"),
            ImportStage::Parsing => write!(f, "PARSING"),
            ImportStage::Validating => write!(f, "VALIDATING"),
            ImportStage::Resolving => write!(f, "RESOLVING"),
            ImportStage::Loading => write!(f, "LOADING"),
            ImportStage::Completed => write!(f, "COMPLETED"),
            ImportStage::Failed => write!(f, "FAILED"),
        }
    }
}
