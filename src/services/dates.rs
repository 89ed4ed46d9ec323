//! # 학습 가능 날짜 계산
//!
//! 시험 기간 `[시작일, 종료일]` 안에서 사용자가 고른 요일에 해당하는 날짜만 골라
//! 돌려줍니다. 각 날짜는 `M/D` 토큰(연도 없음, 0 채우기 없음)으로 출력됩니다.
//!
//! 요일 라벨은 한국어 한 글자 고정 어휘를 씁니다:
//! `일`(일요일)=0, `월`=1, `화`=2, `수`=3, `목`=4, `금`=5, `토`=6
//!
//! 모든 함수는 순수 함수입니다. 여러 시험에서 같은 날짜가 나오는 것은 정상이며,
//! 중복 제거는 호출하는 쪽(프롬프트 빌더)이 합니다.

use std::fmt;

use chrono::{Datelike, NaiveDate, Weekday};
use thiserror::Error;

/// 일요일부터 시작하는 요일 라벨 (`Weekday::num_days_from_sunday()`와 같은 순서)
pub const WEEKDAY_LABELS: [&str; 7] = ["일", "월", "화", "수", "목", "금", "토"];

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

#[derive(Debug, Error, PartialEq)]
pub enum DateWindowError {
    #[error("invalid date '{value}' (expected YYYY-MM-DD)")]
    InvalidDate { value: String },

    #[error("date window is inverted: {start} is after {end}")]
    InvertedWindow { start: NaiveDate, end: NaiveDate },
}

/// 학습 가능한 날짜 하나
///
/// `Display`는 `6/2`, `12/25`처럼 월/일만 남긴 토큰을 출력하고,
/// 정렬은 연도를 포함한 실제 날짜 기준입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StudyDate(pub NaiveDate);

impl fmt::Display for StudyDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0.month(), self.0.day())
    }
}

/// 요일 라벨을 `chrono::Weekday`로 변환합니다. 어휘에 없는 라벨이면 `None`.
pub fn weekday_from_label(label: &str) -> Option<Weekday> {
    let label = label.trim();
    WEEKDAY_LABELS
        .iter()
        .position(|known| *known == label)
        .map(|index| WEEKDAYS[index])
}

/// 요일 라벨 목록을 `Weekday` 목록으로 바꿉니다. 모르는 라벨은 건너뜁니다.
pub fn weekdays_from_labels(labels: &[String]) -> Vec<Weekday> {
    labels
        .iter()
        .filter_map(|label| {
            let weekday = weekday_from_label(label);
            if weekday.is_none() {
                tracing::warn!("Ignoring unknown study day label: {:?}", label);
            }
            weekday
        })
        .collect()
}

/// `start..=end` 중 `days`에 포함된 요일의 날짜를 오름차순으로 반환합니다.
///
/// `start > end`이면 빈 목록입니다. (검증은 `valid_study_dates`가 담당)
pub fn study_dates_between(start: NaiveDate, end: NaiveDate, days: &[Weekday]) -> Vec<NaiveDate> {
    start
        .iter_days()
        .take_while(|date| *date <= end)
        .filter(|date| days.contains(&date.weekday()))
        .collect()
}

/// ISO 날짜 문자열로 받은 시험 기간에서 학습 가능한 날짜 목록을 계산합니다.
///
/// 결과는 오름차순이고, `to_string()`하면 `M/D` 토큰이 됩니다.
/// 날짜 파싱 실패나 뒤집힌 기간은 빈 목록으로 삼키지 않고 `DateWindowError`로 알립니다.
pub fn valid_study_dates(
    start: &str,
    end: &str,
    study_days: &[String],
) -> Result<Vec<StudyDate>, DateWindowError> {
    let start = parse_iso(start)?;
    let end = parse_iso(end)?;
    if start > end {
        return Err(DateWindowError::InvertedWindow { start, end });
    }

    let days = weekdays_from_labels(study_days);
    Ok(study_dates_between(start, end, &days)
        .into_iter()
        .map(StudyDate)
        .collect())
}

fn parse_iso(value: &str) -> Result<NaiveDate, DateWindowError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| DateWindowError::InvalidDate {
        value: value.to_string(),
    })
}
