//! # 데이터베이스 접근 계층 (Data Access Layer)
//!
//! 데이터베이스와 직접 상호작용하는 함수들을 모아둔 모듈입니다.
//! 라우트 핸들러(routes/)와 계획 파이프라인(services::planner)이 이 모듈의 함수를 호출합니다.
//!
//! 각 하위 모듈:
//! - `users`: 사용자 생성/조회
//! - `preferences`: 사용자별 학습 선호도 (사용자당 1개, upsert)
//! - `exams`: 시험과 챕터 CRUD
//! - `plans`: 생성된 학습 계획 저장(전체 교체)과 조회
//!
//! 모든 함수는 외부 사용자 ID(`users.user_id`)가 아니라 내부 정수 키(`users.id`)를 받습니다.
//! 외부 ID → 내부 키 변환은 `users::find_by_user_id`로 호출하는 쪽이 먼저 합니다.

pub mod exams;
pub mod plans;
pub mod preferences;
pub mod users;

/// 테스트용 인메모리 SQLite 풀
///
/// `sqlite::memory:`는 연결마다 별도의 DB가 생기므로,
/// 연결을 하나로 고정하고 만료시키지 않아야 테스트 동안 같은 DB가 유지됩니다.
#[cfg(test)]
pub async fn test_pool() -> sqlx::SqlitePool {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations apply");

    pool
}
