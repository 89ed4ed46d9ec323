//! # 에러 처리 모듈
//!
//! 애플리케이션에서 발생할 수 있는 모든 에러 타입을 정의합니다.
//! Rust에서는 예외(exception) 대신 `Result<T, E>` 타입으로 에러를 처리합니다.
//!
//! 이 모듈의 핵심:
//! - `AppError` 열거형(enum): 모든 에러 종류를 하나의 타입으로 통합
//! - `IntoResponse` 구현: 에러를 HTTP 응답으로 자동 변환
//! - 서비스 계층 에러(`LlmError`, `ExtractError` 등) → `AppError` 변환
//!
//! 학습 계획 생성 파이프라인의 에러 분류:
//! | 분류 | variant | 상태 코드 |
//! |------|---------|-----------|
//! | 선행 조건 미충족 (선호도/시험 없음) | `BadRequest` | 400 |
//! | LLM 서버 연결 실패 (재시도 소진) | `UpstreamUnavailable` | 502 |
//! | LLM 응답 JSON 파싱 실패 | `UnparseableResponse` | 500 |
//! | dailyPlan 형식 오류 (저장 트랜잭션 중단) | `InvalidPlanFormat` | 500 |
//! | 알 수 없는 사용자 | `BadRequest` | 400 |

use axum::{
    http::StatusCode,                   // HTTP 상태 코드 (200, 404, 500 등)
    response::{IntoResponse, Response}, // Axum의 응답 변환 트레이트
    Json,                               // JSON 응답 래퍼
};
use serde_json::json; // json! 매크로: JSON 객체를 간편하게 생성
use thiserror::Error; // thiserror: 커스텀 에러 타입을 쉽게 만들어주는 매크로 크레이트

use crate::services::{
    dates::DateWindowError, extract::ExtractError, llm::LlmError, plan_format::PlanFormatError,
};

/// 애플리케이션에서 발생할 수 있는 모든 에러 종류
///
/// 각 에러 variant는 적절한 HTTP 상태 코드와 메시지로 변환됩니다.
/// 핸들러에서 `Result<T, AppError>`를 반환하면,
/// Axum이 자동으로 `IntoResponse`를 호출하여 HTTP 응답으로 변환합니다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 요청한 리소스를 찾을 수 없음 (HTTP 404)
    #[error("Resource not found")]
    NotFound,

    /// 잘못된 요청 (HTTP 400)
    /// 선행 조건 미충족, 알 수 없는 사용자, 입력 검증 실패 등에 사용합니다.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// 인증 실패 (HTTP 401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// 권한 없음 (HTTP 403): 토큰 주인이 아닌 사용자의 데이터를 변경하려 할 때
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// 리소스 충돌 (HTTP 409): 중복 사용자 ID, 중복 과목명
    #[error("Conflict: {0}")]
    Conflict(String),

    /// LLM 서버에 끝내 연결하지 못함 (HTTP 502)
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// LLM 응답에서 JSON 배열을 추출/파싱하지 못함 (HTTP 500)
    #[error("Unparseable upstream response: {0}")]
    UnparseableResponse(String),

    /// dailyPlan 항목 형식 오류로 저장이 전부 취소됨 (HTTP 500)
    #[error("Invalid plan format: {0}")]
    InvalidPlanFormat(String),

    /// 서버 내부 오류 (HTTP 500)
    #[error("Internal error: {0}")]
    Internal(String),

    /// 데이터베이스 오류 (HTTP 500)
    /// #[from]: sqlx::Error를 AppError로 자동 변환하는 From 트레이트를 구현합니다.
    /// sqlx 함수에서 반환된 에러에 `?` 연산자를 사용하면
    /// 자동으로 AppError::Database로 변환됩니다.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

// ── 서비스 계층 에러 → AppError 변환 ──
// 서비스 모듈은 axum을 알지 못하도록 자체 에러 타입을 가지며,
// 라우트 경계에서 `?`로 AppError가 됩니다.

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        AppError::UpstreamUnavailable(err.to_string())
    }
}

impl From<ExtractError> for AppError {
    fn from(err: ExtractError) -> Self {
        AppError::UnparseableResponse(err.to_string())
    }
}

impl From<PlanFormatError> for AppError {
    fn from(err: PlanFormatError) -> Self {
        AppError::InvalidPlanFormat(err.to_string())
    }
}

impl From<DateWindowError> for AppError {
    fn from(err: DateWindowError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl AppError {
    /// 에러의 HTTP 상태 코드 (테스트와 로깅에서 사용)
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
            AppError::UnparseableResponse(_)
            | AppError::InvalidPlanFormat(_)
            | AppError::Internal(_)
            | AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    /// AppError를 HTTP 응답으로 변환합니다.
    ///
    /// 내부 에러(Database, Internal)는 실제 에러 내용을 로그에만 기록하고,
    /// 클라이언트에는 일반적인 메시지만 반환합니다.
    /// 파이프라인 에러(업스트림/파싱/형식)는 원인을 구분할 수 있도록 메시지를 그대로 전달합니다.
    fn into_response(self) -> Response {
        let status = self.status();
        // (code, message) 튜플: 응답 본문의 기계용 코드와 사람용 메시지
        let (code, message) = match self {
            AppError::NotFound => ("not_found", self.to_string()),
            AppError::BadRequest(ref msg) => ("bad_request", msg.clone()),
            AppError::Unauthorized(ref msg) => ("unauthorized", msg.clone()),
            AppError::Forbidden(ref msg) => ("forbidden", msg.clone()),
            AppError::Conflict(ref msg) => ("conflict", msg.clone()),
            AppError::UpstreamUnavailable(ref msg) => {
                tracing::error!("LLM upstream unavailable: {}", msg);
                ("upstream_unavailable", msg.clone())
            }
            AppError::UnparseableResponse(ref msg) => {
                tracing::error!("Unparseable LLM response: {}", msg);
                ("unparseable_response", msg.clone())
            }
            AppError::InvalidPlanFormat(ref msg) => {
                tracing::error!("Invalid daily plan format: {}", msg);
                ("invalid_plan_format", msg.clone())
            }
            AppError::Internal(ref msg) => {
                // 내부 에러는 로그에 기록 (서버 관리자용)
                tracing::error!("Internal error: {}", msg);
                ("internal_error", "An internal error occurred".to_string())
            }
            AppError::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                ("database_error", "A database error occurred".to_string())
            }
        };

        // 결과: { "error": { "code": "not_found", "message": "Resource not found" } }
        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_errors_map_to_distinct_statuses() {
        assert_eq!(
            AppError::from(LlmError::Unavailable {
                attempts: 3,
                last_error: "connection refused".into()
            })
            .status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::from(ExtractError::NoJsonArray).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::BadRequest("no preference".into()).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn database_details_are_not_leaked() {
        let response = AppError::Database(sqlx::Error::RowNotFound).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
