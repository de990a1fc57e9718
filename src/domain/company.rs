// ==========================================
// 企业名录系统 - 公司领域模型
// ==========================================
// 对齐: company 表
// 用途: 导入层写入
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// Address - 地址（公司/人员共用）
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub zip_code: Option<String>, // 兼容 postalCode
}

// ==========================================
// CompanyContactInfo - 公司联系方式
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyContactInfo {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
}

// ==========================================
// NewCompany - 待写入的公司记录
// ==========================================
// 红线: name / industry 非空（TRIM 后）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCompany {
    // ===== 必填 =====
    pub name: String,
    pub industry: String,

    // ===== 可选 =====
    pub description: Option<String>,
    pub address: Address,
    pub contact_info: CompanyContactInfo,
    pub founded_year: Option<i32>,
    pub employee_count: Option<i64>,

    // ===== 审计字段 =====
    pub created_at: DateTime<Utc>,
}

impl NewCompany {
    pub fn new(name: impl Into<String>, industry: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            industry: industry.into(),
            description: None,
            address: Address::default(),
            contact_info: CompanyContactInfo::default(),
            founded_year: None,
            employee_count: None,
            created_at: Utc::now(),
        }
    }
}
