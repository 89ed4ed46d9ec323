//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 처리하는 핸들러 함수들을 모아둔 모듈입니다.
//! Axum에서 핸들러는 HTTP 요청을 받아 응답을 반환하는 async 함수입니다.
//!
//! 각 하위 모듈:
//! - `auth`: 회원가입, 로그인
//! - `users`: 사용자 조회
//! - `preferences`: 학습 선호도 조회/저장
//! - `exams`: 시험/챕터 등록, 조회, 삭제
//! - `ai_plan`: 학습 계획 생성, 저장된 계획 조회
//! - `health`: 서버 상태 확인 (헬스체크)

use sqlx::SqlitePool;

use crate::services::llm::LlmClient;

pub mod ai_plan;
pub mod auth;
pub mod exams;
pub mod health;
pub mod preferences;
pub mod users;

/// 모든 핸들러가 공유하는 애플리케이션 상태
///
/// `SqlitePool`과 `LlmClient`는 내부적으로 Arc를 쓰므로 clone 비용이 거의 없습니다.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub jwt_secret: String,
    pub llm: LlmClient,
}

/// 핸들러 테스트용 상태: 인메모리 DB + 연결되지 않는 LLM 주소
#[cfg(test)]
pub async fn test_state() -> AppState {
    use crate::config::LlmConfig;

    let llm = LlmClient::new(LlmConfig {
        api_url: "http://127.0.0.1:1/v1/completions".to_string(),
        max_attempts: 1,
        ..LlmConfig::default()
    })
    .expect("http client");

    AppState {
        pool: crate::db::test_pool().await,
        jwt_secret: "test-secret".to_string(),
        llm,
    }
}
