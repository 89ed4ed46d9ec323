//! # 시험/챕터 모델 정의
//!
//! 사용자가 학습 계획 생성 전에 등록하는 시험(과목)과 챕터 목록입니다.
//!
//! ## 구조체 역할
//! - `Difficulty`: 챕터 난이도 (하루 학습 가능 페이지 수를 결정)
//! - `Exam`, `Chapter`: API 응답 및 프롬프트 빌더 입력
//! - `ExamRow`, `ChapterRow`: DB 테이블 한 행
//! - `CreateExamRequest`: `POST /exam` 요청 본문
//! - `NewExam`: 검증을 통과한 생성 요청
//!
//! 챕터 순서는 의미가 있습니다. 요청에 들어온 순서 그대로 `position`에 저장하고,
//! 조회와 프롬프트 작성 모두 이 순서를 따릅니다.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::AppError;

/// 챕터 난이도
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// 난이도별 하루 평균 학습 페이지 수 (쉬움 25p, 보통 17p, 어려움 12p)
    pub fn daily_pages(self) -> u32 {
        match self {
            Difficulty::Easy => 25,
            Difficulty::Medium => 17,
            Difficulty::Hard => 12,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// 프롬프트에 쓰는 한국어 라벨
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "쉬움",
            Difficulty::Medium => "보통",
            Difficulty::Hard => "어려움",
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("Unknown difficulty: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub id: i64,
    pub chapter_title: String,
    pub difficulty: Difficulty,
    pub content_volume: u32,
}

/// 시험: 종료일(end_date)은 시험 당일입니다.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Exam {
    pub id: i64,
    pub subject: String,
    /// ISO 날짜 (YYYY-MM-DD)
    pub start_date: String,
    /// ISO 날짜 (YYYY-MM-DD), 시험일
    pub end_date: String,
    pub importance: i64,
    /// 등록 순서대로 정렬된 챕터 목록
    pub chapters: Vec<Chapter>,
}

/// `exams` 테이블 한 행
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ExamRow {
    pub id: i64,
    pub subject: String,
    pub start_date: String,
    pub end_date: String,
    pub importance: i64,
}

/// `chapters` 테이블 한 행
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ChapterRow {
    pub id: i64,
    pub exam_id: i64,
    pub chapter_title: String,
    pub difficulty: String,
    pub content_volume: i64,
}

impl TryFrom<ChapterRow> for Chapter {
    type Error = AppError;

    fn try_from(row: ChapterRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            chapter_title: row.chapter_title,
            difficulty: row.difficulty.parse().map_err(AppError::Internal)?,
            content_volume: u32::try_from(row.content_volume)
                .map_err(|_| AppError::Internal("Corrupt content_volume column".to_string()))?,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateChapterRequest {
    pub chapter_title: String,
    pub difficulty: Difficulty,
    pub content_volume: u32,
}

/// 시험 등록 요청: `POST /exam`의 요청 본문
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExamRequest {
    pub user_id: String,
    pub subject: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub importance: i64,
    #[serde(default)]
    pub chapters: Vec<CreateChapterRequest>,
}

/// 검증을 통과한 시험 등록 데이터
#[derive(Debug)]
pub struct NewExam {
    pub subject: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub importance: i64,
    pub chapters: Vec<CreateChapterRequest>,
}

impl CreateExamRequest {
    /// 과목명, 날짜 형식과 순서, 챕터 분량을 검증합니다.
    pub fn validate(self) -> Result<NewExam, AppError> {
        let subject = self.subject.trim().to_string();
        if subject.is_empty() {
            return Err(AppError::BadRequest("subject is required".to_string()));
        }

        let start_date = parse_iso_date("startDate", &self.start_date)?;
        let end_date = parse_iso_date("endDate", &self.end_date)?;
        if start_date > end_date {
            return Err(AppError::BadRequest(
                "startDate must not be after endDate".to_string(),
            ));
        }

        for chapter in &self.chapters {
            if chapter.chapter_title.trim().is_empty() {
                return Err(AppError::BadRequest("chapterTitle is required".to_string()));
            }
            if chapter.content_volume == 0 {
                return Err(AppError::BadRequest(format!(
                    "contentVolume of '{}' must be at least 1",
                    chapter.chapter_title
                )));
            }
        }

        Ok(NewExam {
            subject,
            start_date,
            end_date,
            importance: self.importance,
            chapters: self.chapters,
        })
    }
}

fn parse_iso_date(field: &str, raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest(format!("{} must be YYYY-MM-DD, got '{}'", field, raw)))
}
