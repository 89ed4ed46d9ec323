//! # dailyPlan 항목 해석
//!
//! `"M/D: 내용"` 문자열을 (날짜, 내용) 쌍으로 바꿉니다.
//! 연도는 토큰에 없으므로 계획의 시작일(startDate) 연도를 사용합니다.
//!
//! 콜론이 없거나 `M/D`가 실제 달력 날짜가 아니면 `PlanFormatError`이며,
//! 저장 계층은 이 에러가 나면 트랜잭션 전체를 되돌립니다.

use chrono::NaiveDate;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum PlanFormatError {
    #[error("Invalid dailyPlan format (missing ':'): {0}")]
    MissingColon(String),

    #[error("Invalid dailyPlan date '{token}' in entry: {entry}")]
    InvalidDate { token: String, entry: String },
}

/// 해석된 하루치 학습 항목
#[derive(Debug, Clone, PartialEq)]
pub struct DailyEntry {
    pub date: NaiveDate,
    pub content: String,
}

/// `"6/3: Chapter 2 (p.1-30)"` 하나를 해석합니다.
///
/// 내용은 첫 번째 콜론 뒤의 전부입니다. (`"6/3: 10:00 복습"` → `"10:00 복습"`)
pub fn parse_daily_entry(entry: &str, year: i32) -> Result<DailyEntry, PlanFormatError> {
    let (token, content) = entry
        .split_once(':')
        .ok_or_else(|| PlanFormatError::MissingColon(entry.to_string()))?;

    let invalid = || PlanFormatError::InvalidDate {
        token: token.trim().to_string(),
        entry: entry.to_string(),
    };

    let (month, day) = token.trim().split_once('/').ok_or_else(invalid)?;
    let month: u32 = month.trim().parse().map_err(|_| invalid())?;
    let day: u32 = day.trim().parse().map_err(|_| invalid())?;
    let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)?;

    Ok(DailyEntry {
        date,
        content: content.trim().to_string(),
    })
}

/// 한 과목의 dailyPlan 전체를 해석해 날짜순으로 돌려줍니다.
///
/// 한 계획 안에서 날짜는 유일해야 하므로, 같은 날짜가 여러 번 나오면
/// 등장 순서대로 내용을 `", "`로 합칩니다.
/// 항목 하나라도 형식이 틀리면 전체가 실패합니다.
pub fn parse_daily_plan(entries: &[String], year: i32) -> Result<Vec<DailyEntry>, PlanFormatError> {
    let mut by_date: BTreeMap<NaiveDate, Vec<String>> = BTreeMap::new();
    for entry in entries {
        let parsed = parse_daily_entry(entry, year)?;
        by_date.entry(parsed.date).or_default().push(parsed.content);
    }

    Ok(by_date
        .into_iter()
        .map(|(date, contents)| DailyEntry {
            date,
            content: contents.join(", "),
        })
        .collect())
}
