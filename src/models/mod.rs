//! # 데이터 모델 모듈
//!
//! 애플리케이션에서 사용하는 데이터 구조체(struct)들을 정의합니다.
//! 각 하위 모듈은 특정 도메인의 데이터 타입을 담당합니다:
//! - `user`: 사용자(User)와 로그인/가입 요청
//! - `preference`: 학습 선호도 (스타일, 요일, 세션 수)
//! - `exam`: 시험과 챕터
//! - `plan`: LLM 응답 레코드부터 저장된 학습 계획까지
//!
//! `pub use X::*;`로 하위 모듈 항목을 재공개하여
//! `crate::models::Exam`처럼 짧게 접근할 수 있게 합니다.

pub mod exam;
pub mod plan;
pub mod preference;
pub mod user;

pub use exam::*;
pub use plan::*;
pub use preference::*;
pub use user::*;
