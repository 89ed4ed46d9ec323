//! # 학습 선호도 모델 정의
//!
//! 사용자가 직접 입력하는 학습 선호도(스타일, 요일, 하루 세션 수)입니다.
//! 사용자당 정확히 하나만 존재하며, 프롬프트 빌더가 읽어서 LLM에 전달합니다.
//!
//! ## 구조체 역할
//! - `StudyStyle`: focus(하루 한 과목) / multi·parallel(하루 여러 과목)
//! - `Preference`: 검증을 마친 선호도 (도메인 타입)
//! - `PreferenceRow`: DB의 `preferences` 테이블 한 행 (문자열 그대로)
//! - `SavePreferenceRequest`: `POST /user-preference/{userId}` 요청 본문

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AppError;
use crate::services::dates::weekday_from_label;

/// 학습 스타일
///
/// `Multi`와 `Parallel`은 같은 의미(하루에 여러 과목 병행)이지만,
/// 클라이언트가 보낸 표기를 그대로 돌려주기 위해 별도 variant로 둡니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StudyStyle {
    Focus,
    Multi,
    Parallel,
}

impl StudyStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            StudyStyle::Focus => "focus",
            StudyStyle::Multi => "multi",
            StudyStyle::Parallel => "parallel",
        }
    }
}

impl fmt::Display for StudyStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StudyStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "focus" => Ok(StudyStyle::Focus),
            "multi" => Ok(StudyStyle::Multi),
            "parallel" => Ok(StudyStyle::Parallel),
            other => Err(format!("Unknown study style: {}", other)),
        }
    }
}

/// 검증된 학습 선호도: API 응답과 프롬프트 빌더 입력으로 사용합니다.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Preference {
    pub style: StudyStyle,
    /// 요일 라벨 목록 (예: ["월", "수"]): 입력 순서 유지
    pub study_days: Vec<String>,
    pub sessions_per_day: u32,
}

/// `preferences` 테이블 한 행
///
/// `study_days`는 JSON 배열 문자열로 저장됩니다. (예: `["월","수"]`)
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PreferenceRow {
    pub style: String,
    pub study_days: String,
    pub sessions_per_day: i64,
}

impl TryFrom<PreferenceRow> for Preference {
    type Error = AppError;

    fn try_from(row: PreferenceRow) -> Result<Self, Self::Error> {
        let style = row.style.parse().map_err(AppError::Internal)?;
        let study_days: Vec<String> = serde_json::from_str(&row.study_days)
            .map_err(|e| AppError::Internal(format!("Corrupt study_days column: {}", e)))?;
        let sessions_per_day = u32::try_from(row.sessions_per_day)
            .map_err(|_| AppError::Internal("Corrupt sessions_per_day column".to_string()))?;

        Ok(Self {
            style,
            study_days,
            sessions_per_day,
        })
    }
}

/// 선호도 저장 요청: `POST /user-preference/{userId}`의 요청 본문
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavePreferenceRequest {
    pub style: StudyStyle,
    pub study_days: Vec<String>,
    pub sessions_per_day: u32,
}

impl SavePreferenceRequest {
    /// 요청을 검증하고 정규화된 `Preference`로 변환합니다.
    ///
    /// - 요일 라벨은 `일 월 화 수 목 금 토` 중 하나여야 합니다.
    /// - 중복 요일은 첫 번째만 남깁니다.
    /// - 요일이 하나도 없거나 세션 수가 0이면 거부합니다.
    pub fn validate(self) -> Result<Preference, AppError> {
        let mut study_days: Vec<String> = Vec::with_capacity(self.study_days.len());
        for label in self.study_days {
            let label = label.trim().to_string();
            if weekday_from_label(&label).is_none() {
                return Err(AppError::BadRequest(format!(
                    "Unknown study day label: {}",
                    label
                )));
            }
            if !study_days.contains(&label) {
                study_days.push(label);
            }
        }

        if study_days.is_empty() {
            return Err(AppError::BadRequest(
                "studyDays must contain at least one day".to_string(),
            ));
        }
        if self.sessions_per_day == 0 {
            return Err(AppError::BadRequest(
                "sessionsPerDay must be a positive integer".to_string(),
            ));
        }

        Ok(Preference {
            style: self.style,
            study_days,
            sessions_per_day: self.sessions_per_day,
        })
    }
}
