//! # 학습 계획 API 라우트 핸들러
//!
//! ## 엔드포인트 목록
//! | 메서드 | 경로 | 핸들러 | 설명 |
//! |--------|------|--------|------|
//! | POST | /ai-plan/generate | `generate_plan` | LLM으로 계획 생성 후 저장 |
//! | GET | /ai-plan/list?userId= | `list_plans` | 저장된 계획 조회 |
//!
//! 실제 파이프라인은 `services::planner`에 있고, 여기서는 입력 정규화만 합니다.

use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    error::AppError,
    models::{GeneratePlanRequest, ListPlansQuery, StudyPlan, StudyPlanRecord},
    routes::AppState,
    services::planner,
};

/// `POST /ai-plan/generate` + `{ "userId": "...", "databaseId"?: "..." }`
///
/// 성공하면 저장한 과목별 계획 배열을 그대로 돌려줍니다. (빈 배열도 성공)
pub async fn generate_plan(
    State(state): State<AppState>,
    Json(req): Json<GeneratePlanRequest>,
) -> Result<Json<Vec<StudyPlanRecord>>, AppError> {
    let user_id = req.user_id.trim();
    if user_id.is_empty() {
        return Err(AppError::BadRequest("userId is required".to_string()));
    }

    tracing::info!("Generating study plan for {}", user_id);
    let records =
        planner::generate_plans(&state.pool, &state.llm, user_id, req.database_id.as_deref())
            .await?;
    tracing::info!("Generated {} plan(s) for {}", records.len(), user_id);

    Ok(Json(records))
}

/// `GET /ai-plan/list?userId=...`
pub async fn list_plans(
    State(state): State<AppState>,
    Query(query): Query<ListPlansQuery>,
) -> Result<Json<Vec<StudyPlan>>, AppError> {
    let user_id = query
        .user_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::BadRequest("userId query parameter is required".to_string()))?;

    let plans = planner::list_plans(&state.pool, user_id).await?;
    Ok(Json(plans))
}
