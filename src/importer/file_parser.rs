// ==========================================
// 企业名录系统 - 文件解析器实现
// ==========================================
// 阶段: Parsing
// 支持: CSV (text/csv) / JSON (application/json)
// 输出: 统一的 RawRecord 序列（CSV 全字符串扁平，JSON 保留原生类型）
// ==========================================

use crate::domain::{EntityKind, RawRecord};
use crate::importer::error::{ImportError, PipelineResult};
use crate::importer::importer_trait::{FileParser, RawRecordStream};
use csv::ReaderBuilder;
use serde_json::{Map, Value};
use std::io::Read;

pub const MIME_CSV: &str = "text/csv";
pub const MIME_JSON: &str = "application/json";

// ==========================================
// 声明格式
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclaredFormat {
    Csv,
    Json,
}

impl DeclaredFormat {
    /// 按 MIME 选择格式（忽略大小写与参数，如 `text/csv; charset=utf-8`）
    pub fn from_mime(mime: &str) -> PipelineResult<Self> {
        let essence = mime
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_lowercase();

        match essence.as_str() {
            MIME_CSV => Ok(DeclaredFormat::Csv),
            MIME_JSON => Ok(DeclaredFormat::Json),
            _ => Err(ImportError::UnsupportedFormat(mime.trim().to_string())),
        }
    }
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_records(
        &self,
        source: Box<dyn Read + Send>,
        _kind: EntityKind,
    ) -> PipelineResult<RawRecordStream> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(source);

        // 读取表头（去除首列 BOM）
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .enumerate()
            .map(|(idx, h)| {
                let h = if idx == 0 { h.trim_start_matches('\u{feff}') } else { h };
                h.trim().to_string()
            })
            .collect();

        // 逐行产出，不整体缓冲
        let records = reader
            .into_records()
            .enumerate()
            .filter_map(move |(row_idx, result)| {
                let row = match result {
                    Ok(row) => row,
                    Err(e) => return Some(Err(ImportError::from(e))),
                };

                let mut fields = Map::new();
                for (col_idx, value) in row.iter().enumerate() {
                    if let Some(header) = headers.get(col_idx) {
                        if header.is_empty() {
                            continue;
                        }
                        fields.insert(header.clone(), Value::String(value.to_string()));
                    }
                }

                let record = RawRecord::new(row_idx + 1, fields);

                // 跳过完全空白的行
                if record.is_blank() {
                    return None;
                }

                Some(Ok(record))
            });

        Ok(Box::new(records))
    }
}

// ==========================================
// JSON Parser 实现
// ==========================================
pub struct JsonParser;

impl JsonParser {
    /// 选择记录数组:
    /// 1. 对象且包含与实体类型同名的数组字段 → 该数组
    /// 2. 顶层即数组 → 直接使用
    /// 3. 其他 → 空
    pub fn select_collection(document: Value, kind: EntityKind) -> Vec<Value> {
        match document {
            Value::Object(mut map) => match map.remove(kind.collection_key()) {
                Some(Value::Array(items)) => items,
                _ => Vec::new(),
            },
            Value::Array(items) => items,
            _ => Vec::new(),
        }
    }
}

impl FileParser for JsonParser {
    fn parse_records(
        &self,
        mut source: Box<dyn Read + Send>,
        kind: EntityKind,
    ) -> PipelineResult<RawRecordStream> {
        // JSON 文档整体解析一次
        let mut bytes = Vec::new();
        source.read_to_end(&mut bytes)?;
        let document: Value = serde_json::from_slice(&bytes)?;

        let items = Self::select_collection(document, kind);
        let records = items
            .into_iter()
            .enumerate()
            .map(|(idx, item)| Ok(RawRecord::from_json(idx + 1, item)));

        Ok(Box::new(records))
    }
}

// ==========================================
// 通用文件解析器（根据声明的 MIME 自动选择）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    pub fn parser_for(format: DeclaredFormat) -> Box<dyn FileParser> {
        match format {
            DeclaredFormat::Csv => Box::new(CsvParser),
            DeclaredFormat::Json => Box::new(JsonParser),
        }
    }

    pub fn parse<R: Read + Send + 'static>(
        &self,
        source: R,
        declared_mime_type: &str,
        kind: EntityKind,
    ) -> PipelineResult<RawRecordStream> {
        let format = DeclaredFormat::from_mime(declared_mime_type)?;
        Self::parser_for(format).parse_records(Box::new(source), kind)
    }
}
