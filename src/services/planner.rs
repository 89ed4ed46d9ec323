//! # 학습 계획 생성 파이프라인
//!
//! `POST /ai-plan/generate` 한 번이 거치는 전체 흐름입니다. 각 단계는 앞 단계가 끝나야 시작합니다.
//!
//! ```text
//! 사용자 확인 → 선호도/시험 로드 → 프롬프트 작성 → LLM 호출
//!   → JSON 추출·검증 → 등록 과목과 정합화 → 기존 계획 교체 저장 → 응답
//! ```
//!
//! 선행 조건(선호도, 시험)이 없으면 LLM을 부르기 전에 400으로 끝냅니다.
//! LLM/파싱 단계에서 실패하면 아무것도 저장하지 않습니다.

use sqlx::SqlitePool;

use crate::db;
use crate::error::AppError;
use crate::models::{StudyPlan, StudyPlanRecord};
use crate::services::extract::parse_plan_records;
use crate::services::llm::LlmClient;
use crate::services::prompt::{build_prompt, PromptInput};
use crate::services::reconcile::{reconcile, resolve_database_id};

/// 사용자의 학습 계획을 새로 생성하고 저장한 뒤, 저장한 레코드를 돌려줍니다.
pub async fn generate_plans(
    pool: &SqlitePool,
    llm: &LlmClient,
    user_id: &str,
    database_id: Option<&str>,
) -> Result<Vec<StudyPlanRecord>, AppError> {
    let user = db::users::require_by_user_id(pool, user_id).await?;
    let database_id = resolve_database_id(database_id);

    let preference = db::preferences::get_preference(pool, user.id)
        .await?
        .ok_or_else(|| AppError::BadRequest("No study preference registered".to_string()))?;
    let exams = db::exams::list_exams(pool, user.id).await?;
    if exams.is_empty() {
        return Err(AppError::BadRequest("No exams registered".to_string()));
    }

    let prompt = build_prompt(PromptInput {
        user_id,
        database_id: &database_id,
        preference: &preference,
        exams: &exams,
    })?;
    tracing::debug!("Prompt for {} ({} exam(s)):\n{}", user_id, exams.len(), prompt);

    let raw = llm.generate_summary(&prompt).await?;

    let parsed = parse_plan_records(&raw).map_err(|e| {
        tracing::error!("Failed to parse LLM response for {}: {}\n{}", user_id, e, raw);
        e
    })?;

    let registered = db::exams::list_subjects(pool, user.id).await?;
    let records = reconcile(parsed, &registered, user_id, &database_id);
    if records.is_empty() {
        tracing::warn!("LLM response for {} matched no registered subject", user_id);
    }

    db::plans::replace_and_save(pool, user.id, &records).await?;
    Ok(records)
}

/// 저장된 학습 계획 목록. 모르는 사용자면 400.
pub async fn list_plans(pool: &SqlitePool, user_id: &str) -> Result<Vec<StudyPlan>, AppError> {
    let user = db::users::require_by_user_id(pool, user_id).await?;
    db::plans::list_by_user(pool, user.id).await
}
