//! # 서비스 계층
//!
//! HTTP와 무관한 학습 계획 생성 로직을 모아둔 모듈입니다.
//!
//! 파이프라인 순서:
//! `dates` → `prompt` → `llm` → `extract` → `reconcile` → (`plan_format` + db 저장)
//!
//! 전체 흐름은 `planner`가 조립합니다.

pub mod dates;
pub mod extract;
pub mod llm;
pub mod plan_format;
pub mod planner;
pub mod prompt;
pub mod reconcile;
