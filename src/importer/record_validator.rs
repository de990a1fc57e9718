// ==========================================
// 企业名录系统 - 记录校验器实现
// ==========================================
// 阶段: Validating
// 规则:
// - 公司: name / industry 非空（TRIM 后）
// - 人员: name / designation 非空 + 雇主引用（companyName 或 companyId）
// 职责: 划分有效/无效记录，单条失败不中断批次
// ==========================================

use crate::domain::{EntityKind, ImportStage, RawRecord, RecordRejection, ValidatedRecord};
use crate::importer::error::PipelineResult;
use crate::importer::field_mapper::fields;

/// 校验结果: 有效记录 + 被拒绝记录（按源顺序）
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub total: usize,
    pub valid: Vec<RawRecord>,
    pub rejected: Vec<RecordRejection>,
}

pub struct RecordValidator;

impl RecordValidator {
    /// 缺失的必填字段列表
    pub fn missing_fields(kind: EntityKind, record: &RawRecord) -> Vec<&'static str> {
        let mut missing = Vec::new();

        match kind {
            EntityKind::Company => {
                for field in [fields::NAME, fields::INDUSTRY] {
                    if record.text(field).is_none() {
                        missing.push(field);
                    }
                }
            }
            EntityKind::Person => {
                for field in [fields::NAME, fields::DESIGNATION] {
                    if record.text(field).is_none() {
                        missing.push(field);
                    }
                }
                if record.text(fields::COMPANY_NAME).is_none()
                    && record.text(fields::COMPANY_ID).is_none()
                {
                    missing.push(fields::COMPANY_NAME);
                }
            }
        }

        missing
    }

    /// 校验单条记录
    pub fn validate(kind: EntityKind, record: RawRecord) -> ValidatedRecord {
        let missing = Self::missing_fields(kind, &record);
        if missing.is_empty() {
            return ValidatedRecord::Valid(record);
        }

        let reason = format!(
            "record {}: invalid {}: missing {}",
            record.record_number,
            kind.label(),
            missing.join(", ")
        );
        ValidatedRecord::Invalid { record, reason }
    }

    /// 消费记录流并划分
    ///
    /// # 返回
    /// - Ok(report): 可能 valid 为空（由编排器判定 NoValidRecords）
    /// - Err: 流中出现的解析错误（致命）
    pub fn partition<I>(kind: EntityKind, records: I) -> PipelineResult<ValidationReport>
    where
        I: IntoIterator<Item = PipelineResult<RawRecord>>,
    {
        let mut report = ValidationReport::default();

        for record in records {
            let record = record?;
            report.total += 1;

            match Self::validate(kind, record) {
                ValidatedRecord::Valid(record) => report.valid.push(record),
                ValidatedRecord::Invalid { record, reason } => {
                    tracing::debug!(record_number = record.record_number, %reason, "记录校验未通过");
                    report.rejected.push(RecordRejection {
                        record_number: record.record_number,
                        stage: ImportStage::Validating,
                        reason,
                    });
                }
            }
        }

        Ok(report)
    }
}
