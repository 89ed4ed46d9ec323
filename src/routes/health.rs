//! # 헬스체크(Health Check) 핸들러
//!
//! 서버가 정상적으로 동작하는지 확인하는 엔드포인트입니다.
//!
//! ## 엔드포인트
//! - `GET /ai-plan/health` → `{ "status": "healthy", "timestamp": "...", "llmConnection": true }`
//!
//! `llmConnection`은 LLM 엔드포인트가 설정되어 있는지만 나타냅니다.
//! 실제로 LLM을 호출하지는 않습니다.

use axum::{extract::State, Json};
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};

use crate::routes::AppState;

/// `GET /ai-plan/health`: 항상 200을 반환합니다.
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        "llmConnection": state.llm.is_configured()
    }))
}
