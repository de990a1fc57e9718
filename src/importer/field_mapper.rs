// ==========================================
// 企业名录系统 - 字段映射器实现
// ==========================================
// 职责: RawRecord → NewCompany / NewPerson 映射 + 类型转换
// 说明: 分组字段（address / contactInfo）同时接受嵌套与扁平两种形式
// ==========================================

use crate::domain::{
    Address, CompanyContactInfo, NewCompany, NewPerson, PersonContactInfo, RawRecord,
    ResolvedPersonRecord,
};
use chrono::Utc;
use serde_json::Value;
use thiserror::Error;

/// 源字段名
pub mod fields {
    pub const NAME: &str = "name";
    pub const INDUSTRY: &str = "industry";
    pub const DESCRIPTION: &str = "description";
    pub const FOUNDED_YEAR: &str = "foundedYear";
    pub const EMPLOYEE_COUNT: &str = "employeeCount";

    pub const DESIGNATION: &str = "designation";
    pub const DEPARTMENT: &str = "department";
    pub const COMPANY_NAME: &str = "companyName";
    pub const COMPANY_ID: &str = "companyId";
    pub const BIO: &str = "bio";

    pub const ADDRESS: &str = "address";
    pub const STREET: &str = "street";
    pub const CITY: &str = "city";
    pub const STATE: &str = "state";
    pub const COUNTRY: &str = "country";
    pub const ZIP_CODE: &str = "zipCode";
    pub const POSTAL_CODE: &str = "postalCode";

    pub const CONTACT_INFO: &str = "contactInfo";
    pub const EMAIL: &str = "email";
    pub const PHONE: &str = "phone";
    pub const WEBSITE: &str = "website";
}

/// 字段映射失败（单条记录级别，不中断批次）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {field}: {message}")]
pub struct MappingError {
    pub field: String,
    pub message: String,
}

pub struct FieldMapper;

impl FieldMapper {
    pub fn map_company(&self, record: &RawRecord) -> Result<NewCompany, MappingError> {
        Ok(NewCompany {
            name: self.required(record, fields::NAME)?,
            industry: self.required(record, fields::INDUSTRY)?,
            description: record.text(fields::DESCRIPTION),
            address: self.map_address(record),
            contact_info: CompanyContactInfo {
                email: record.group_text(fields::CONTACT_INFO, fields::EMAIL),
                phone: record.group_text(fields::CONTACT_INFO, fields::PHONE),
                website: record.group_text(fields::CONTACT_INFO, fields::WEBSITE),
            },
            founded_year: self
                .parse_integer(record, fields::FOUNDED_YEAR)?
                .map(|v| {
                    i32::try_from(v).map_err(|_| MappingError {
                        field: fields::FOUNDED_YEAR.to_string(),
                        message: format!("out of range: {}", v),
                    })
                })
                .transpose()?,
            employee_count: self.parse_integer(record, fields::EMPLOYEE_COUNT)?,
            created_at: Utc::now(),
        })
    }

    pub fn map_person(&self, resolved: &ResolvedPersonRecord) -> Result<NewPerson, MappingError> {
        let record = &resolved.record;
        Ok(NewPerson {
            name: self.required(record, fields::NAME)?,
            designation: self.required(record, fields::DESIGNATION)?,
            company_id: resolved.company_id.clone(),
            company_name: record.text(fields::COMPANY_NAME),
            department: record.text(fields::DEPARTMENT),
            contact_info: PersonContactInfo {
                email: record.group_text(fields::CONTACT_INFO, fields::EMAIL),
                phone: record.group_text(fields::CONTACT_INFO, fields::PHONE),
            },
            address: self.map_address(record),
            bio: record.text(fields::BIO),
            created_at: Utc::now(),
        })
    }

    fn required(&self, record: &RawRecord, field: &str) -> Result<String, MappingError> {
        record.text(field).ok_or_else(|| MappingError {
            field: field.to_string(),
            message: "missing".to_string(),
        })
    }

    fn map_address(&self, record: &RawRecord) -> Address {
        Address {
            street: record.group_text(fields::ADDRESS, fields::STREET),
            city: record.group_text(fields::ADDRESS, fields::CITY),
            state: record.group_text(fields::ADDRESS, fields::STATE),
            country: record.group_text(fields::ADDRESS, fields::COUNTRY),
            zip_code: record
                .group_text(fields::ADDRESS, fields::ZIP_CODE)
                .or_else(|| record.group_text(fields::ADDRESS, fields::POSTAL_CODE)),
        }
    }

    /// 解析整数: JSON 数字（须为整数值）或数字字符串；空值视为缺失
    fn parse_integer(&self, record: &RawRecord, field: &str) -> Result<Option<i64>, MappingError> {
        let invalid = |raw: String| MappingError {
            field: field.to_string(),
            message: format!("not an integer: {}", raw),
        };

        match record.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => match n.as_i64() {
                Some(v) => Ok(Some(v)),
                None => match n.as_f64() {
                    Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(Some(f as i64)),
                    _ => Err(invalid(n.to_string())),
                },
            },
            Some(Value::String(s)) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Ok(None);
                }
                trimmed
                    .parse::<i64>()
                    .map(Some)
                    .map_err(|_| invalid(trimmed.to_string()))
            }
            Some(other) => Err(invalid(other.to_string())),
        }
    }
}
