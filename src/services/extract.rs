//! # LLM 응답 추출/파싱
//!
//! LLM은 JSON만 출력한다는 보장이 없습니다. 설명 문장이나 코드 펜스로 배열을 감쌀 수 있으므로
//! 두 단계로 나누어 처리합니다.
//!
//! 1. **텍스트 단계**: `[ { ... } ]` 모양의 구간을 모두 찾아(비탐욕, 여러 줄 가능)
//!    각각을 JSON 배열로 파싱하고 등장 순서대로 이어 붙입니다.
//!    블록이 하나도 없거나 하나라도 파싱에 실패하면 전체가 `ExtractError`입니다.
//! 2. **구조 단계**: 배열 원소 하나하나를 `PlanRecord`로 검증합니다.
//!    필수 필드 누락, 날짜 형식 오류, 문자열이 아닌 dailyPlan 원소가 있는 레코드는
//!    경고 로그를 남기고 그 레코드만 버립니다.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

use crate::models::{PlanRecord, RawPlanRecord};

/// `[` + 공백 + `{` … `}` + 공백 + `]` (비탐욕, 줄바꿈 포함)
static JSON_ARRAY_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\s*\{[\s\S]*?\}\s*\]").expect("JSON block pattern is valid"));

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("no JSON array found in LLM response")]
    NoJsonArray,

    #[error("JSON block #{index} could not be parsed: {source}")]
    InvalidBlock {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// 텍스트에서 겹치지 않는 JSON 배열 후보 구간을 등장 순서대로 모두 찾습니다.
pub fn extract_json_blocks(text: &str) -> Vec<&str> {
    JSON_ARRAY_BLOCK
        .find_iter(text)
        .map(|m| m.as_str())
        .collect()
}

/// 텍스트 단계: 모든 후보 블록을 JSON 배열로 파싱해 하나의 목록으로 합칩니다.
pub fn parse_plan_values(text: &str) -> Result<Vec<Value>, ExtractError> {
    let blocks = extract_json_blocks(text);
    if blocks.is_empty() {
        return Err(ExtractError::NoJsonArray);
    }

    let mut values = Vec::new();
    for (index, block) in blocks.into_iter().enumerate() {
        let parsed: Vec<Value> = serde_json::from_str(block)
            .map_err(|source| ExtractError::InvalidBlock { index, source })?;
        values.extend(parsed);
    }
    Ok(values)
}

/// 구조 단계: JSON 값 하나를 `PlanRecord`로 검증합니다.
///
/// 실패 사유는 로그용 문자열로 돌려줍니다.
pub fn validate_record(value: Value) -> Result<PlanRecord, String> {
    let raw: RawPlanRecord =
        serde_json::from_value(value).map_err(|e| format!("malformed record: {}", e))?;

    let subject = raw
        .subject
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or("missing subject")?;
    let start_date = parse_date("startDate", raw.start_date.as_deref())?;
    let end_date = parse_date("endDate", raw.end_date.as_deref())?;
    let daily_plan = raw.daily_plan.ok_or("missing dailyPlan")?;

    Ok(PlanRecord {
        subject,
        start_date,
        end_date,
        daily_plan,
    })
}

fn parse_date(field: &str, value: Option<&str>) -> Result<NaiveDate, String> {
    let value = value.ok_or_else(|| format!("missing {}", field))?;
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| format!("{} is not YYYY-MM-DD: {:?}", field, value))
}

/// LLM 원문을 검증된 계획 레코드 목록으로 변환합니다.
///
/// 텍스트 단계의 실패는 에러로 전파하고, 구조 단계에서 걸러진 레코드는 건너뜁니다.
pub fn parse_plan_records(text: &str) -> Result<Vec<PlanRecord>, ExtractError> {
    let values = parse_plan_values(text)?;
    let total = values.len();

    let records: Vec<PlanRecord> = values
        .into_iter()
        .enumerate()
        .filter_map(|(i, value)| match validate_record(value) {
            Ok(record) => Some(record),
            Err(reason) => {
                tracing::warn!("Dropping plan record #{}: {}", i, reason);
                None
            }
        })
        .collect();

    tracing::debug!("Parsed {}/{} plan records", records.len(), total);
    Ok(records)
}
