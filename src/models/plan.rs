//! # 학습 계획 모델 정의
//!
//! LLM이 만든 학습 계획이 거치는 단계별 타입들입니다.
//!
//! ```text
//! LLM 원문(String) ─ extract ─→ RawPlanRecord (느슨한 JSON)
//!                               ─ validate ─→ PlanRecord (필수 필드/날짜 검증 완료)
//!                               ─ reconcile ─→ StudyPlanRecord (userId, databaseId 부착)
//!                               ─ persist ─→ StudyPlan + DailyPlan (DB 행)
//! ```
//!
//! `StudyPlan`/`DailyPlan`은 마지막 LLM 응답의 캐시일 뿐이며,
//! 계획을 다시 생성하면 사용자의 기존 행은 전부 교체됩니다.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// `databaseId`가 없을 때 사용하는 기본값
pub const DEFAULT_DATABASE_ID: &str = "default";

/// LLM 응답에서 꺼낸 JSON 객체 하나 (아직 검증 전)
///
/// 모든 필드가 `Option`인 이유: LLM 출력은 신뢰할 수 없는 텍스트이므로
/// 필드 누락을 역직렬화 단계가 아니라 검증 단계에서 레코드 단위로 판정하기 위함입니다.
/// `userId`, `databaseId` 등 LLM이 함께 출력한 나머지 필드는 무시합니다.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPlanRecord {
    pub subject: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub daily_plan: Option<Vec<String>>,
}

/// 검증을 통과한 과목별 계획 레코드
#[derive(Debug, Clone, PartialEq)]
pub struct PlanRecord {
    pub subject: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// `"M/D: 내용"` 형식의 문자열 목록 (LLM이 준 순서 그대로)
    pub daily_plan: Vec<String>,
}

/// 사용자 정보가 부착된 최종 계획 레코드
///
/// 저장 입력이자 `POST /ai-plan/generate`의 응답 본문 원소입니다.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyPlanRecord {
    pub user_id: String,
    pub subject: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub daily_plan: Vec<String>,
    pub database_id: String,
}

/// `study_plans` 테이블 한 행
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StudyPlanRow {
    pub id: i64,
    pub subject: String,
    pub start_date: String,
    pub end_date: String,
    pub database_id: String,
}

/// `daily_plans` 테이블 한 행 (응답에도 그대로 사용)
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DailyPlan {
    pub id: i64,
    /// ISO 날짜 (YYYY-MM-DD)
    pub date: String,
    pub content: String,
    pub study_plan_id: i64,
}

/// 저장된 학습 계획: `GET /ai-plan/list` 응답 원소
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyPlan {
    pub id: i64,
    pub subject: String,
    pub start_date: String,
    pub end_date: String,
    pub database_id: String,
    /// 날짜 오름차순
    pub daily_plans: Vec<DailyPlan>,
}

impl StudyPlan {
    pub fn from_row(row: StudyPlanRow, daily_plans: Vec<DailyPlan>) -> Self {
        Self {
            id: row.id,
            subject: row.subject,
            start_date: row.start_date,
            end_date: row.end_date,
            database_id: row.database_id,
            daily_plans,
        }
    }
}

/// 계획 생성 요청: `POST /ai-plan/generate`의 요청 본문
///
/// `userId`가 빠진 요청도 역직렬화는 통과시키고, 핸들러에서 400으로 거부합니다.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratePlanRequest {
    #[serde(default)]
    pub user_id: String,
    pub database_id: Option<String>,
}

/// 계획 조회 쿼리: `GET /ai-plan/list?userId=...`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPlansQuery {
    pub user_id: Option<String>,
}
