// ==========================================
// 企业名录系统 - 人员领域模型
// ==========================================
// 对齐: person 表（company_id 外键 → company.id）
// ==========================================

use crate::domain::company::Address;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonContactInfo {
    pub email: Option<String>,
    pub phone: Option<String>,
}

// ==========================================
// NewPerson - 待写入的人员记录
// ==========================================
// 红线: 只有解析出 company_id 的人员才能落库
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPerson {
    // ===== 必填 =====
    pub name: String,
    pub designation: String,
    pub company_id: String,

    // ===== 可选 =====
    pub company_name: Option<String>, // 上传时给出的雇主名称
    pub department: Option<String>,
    pub contact_info: PersonContactInfo,
    pub address: Address,
    pub bio: Option<String>,

    // ===== 审计字段 =====
    pub created_at: DateTime<Utc>,
}

impl NewPerson {
    pub fn new(
        name: impl Into<String>,
        designation: impl Into<String>,
        company_id: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            designation: designation.into(),
            company_id: company_id.into(),
            company_name: None,
            department: None,
            contact_info: PersonContactInfo::default(),
            address: Address::default(),
            bio: None,
            created_at: Utc::now(),
        }
    }
}
