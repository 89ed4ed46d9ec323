//! # 계획 정합화(Reconciliation)
//!
//! LLM이 제안한 과목별 계획을 사용자가 실제로 등록한 시험 과목과 맞춥니다.
//!
//! 순서:
//! 1. 등록되지 않은 과목의 레코드는 버립니다.
//! 2. 같은 과목이 여러 번 나오면 **처음 나온 것만** 남깁니다. (병합하지 않음)
//! 3. 남은 레코드마다 `userId`와 `databaseId`를 붙입니다.
//!
//! 결과가 비어 있어도 에러가 아닙니다. 빈 목록도 유효한 성공 응답입니다.

use std::collections::HashSet;

use crate::models::{PlanRecord, StudyPlanRecord, DEFAULT_DATABASE_ID};

/// 1~2단계: 등록 과목 필터링 + 과목 기준 중복 제거 (첫 번째 우선)
pub fn filter_registered_unique(
    records: Vec<PlanRecord>,
    registered_subjects: &HashSet<String>,
) -> Vec<PlanRecord> {
    let mut seen: HashSet<String> = HashSet::new();
    records
        .into_iter()
        .filter(|record| {
            if !registered_subjects.contains(&record.subject) {
                tracing::debug!("Dropping plan for unregistered subject: {}", record.subject);
                return false;
            }
            // insert()는 이미 있던 값이면 false를 반환합니다.
            if !seen.insert(record.subject.clone()) {
                tracing::debug!("Dropping duplicate plan for subject: {}", record.subject);
                return false;
            }
            true
        })
        .collect()
}

/// 요청의 databaseId를 정규화합니다. 비어 있거나 없으면 `"default"`.
pub fn resolve_database_id(database_id: Option<&str>) -> String {
    database_id
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .unwrap_or(DEFAULT_DATABASE_ID)
        .to_string()
}

/// 전체 정합화: 필터링, 중복 제거, 사용자 정보 부착
pub fn reconcile(
    records: Vec<PlanRecord>,
    registered_subjects: &HashSet<String>,
    user_id: &str,
    database_id: &str,
) -> Vec<StudyPlanRecord> {
    filter_registered_unique(records, registered_subjects)
        .into_iter()
        .map(|record| StudyPlanRecord {
            user_id: user_id.to_string(),
            subject: record.subject,
            start_date: record.start_date,
            end_date: record.end_date,
            daily_plan: record.daily_plan,
            database_id: database_id.to_string(),
        })
        .collect()
}
