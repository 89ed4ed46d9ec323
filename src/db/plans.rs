//! # 학습 계획 DB 쿼리
//!
//! 저장된 계획은 가장 최근 LLM 응답의 캐시입니다. 다시 생성하면 사용자의 계획 전체가 교체됩니다.
//!
//! ## 교체 저장 (`replace_and_save`)
//! 하나의 트랜잭션 안에서:
//! 1. 사용자 소유 `study_plans`에 딸린 `daily_plans` 삭제
//! 2. 사용자 소유 `study_plans` 삭제
//! 3. 레코드마다 `study_plans` 1행 + `daily_plans` N행 생성
//!
//! 중간에 dailyPlan 항목 형식 오류가 나면 트랜잭션이 커밋되지 않고 drop되어
//! 삭제까지 모두 되돌려집니다. 기존 계획은 그대로 남습니다.
//!
//! 같은 사용자에 대한 동시 요청은 잠그지 않습니다. 나중에 커밋한 쪽이 이기며,
//! 삭제 직후 다른 요청의 조회가 빈 목록을 볼 수 있습니다.

use std::collections::HashMap;

use chrono::Datelike;
use sqlx::SqlitePool;

use crate::error::AppError;
use crate::models::{DailyPlan, StudyPlan, StudyPlanRecord, StudyPlanRow};
use crate::services::plan_format::parse_daily_plan;

/// 사용자의 기존 계획을 모두 지우고 `records`로 교체합니다.
pub async fn replace_and_save(
    pool: &SqlitePool,
    user_pk: i64,
    records: &[StudyPlanRecord],
) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    let removed = sqlx::query(
        r#"
        DELETE FROM daily_plans
        WHERE study_plan_id IN (SELECT id FROM study_plans WHERE user_id = ?)
        "#,
    )
    .bind(user_pk)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    sqlx::query("DELETE FROM study_plans WHERE user_id = ?")
        .bind(user_pk)
        .execute(&mut *tx)
        .await?;

    for record in records {
        // 형식 오류면 여기서 `?`로 빠져나가고, tx는 커밋 없이 drop되어 롤백됩니다.
        let entries = parse_daily_plan(&record.daily_plan, record.start_date.year())?;

        let plan_id = sqlx::query(
            r#"
            INSERT INTO study_plans (user_id, subject, start_date, end_date, database_id)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(user_pk)
        .bind(&record.subject)
        .bind(record.start_date.to_string())
        .bind(record.end_date.to_string())
        .bind(&record.database_id)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        for entry in entries {
            sqlx::query(
                r#"
                INSERT INTO daily_plans (study_plan_id, date, content)
                VALUES (?, ?, ?)
                "#,
            )
            .bind(plan_id)
            .bind(entry.date.to_string())
            .bind(&entry.content)
            .execute(&mut *tx)
            .await?;
        }
    }

    tx.commit().await?;

    tracing::info!(
        "Replaced plans for user #{}: {} daily row(s) removed, {} plan(s) saved",
        user_pk,
        removed,
        records.len()
    );
    Ok(())
}

/// 사용자의 모든 계획을 조회합니다.
///
/// 계획은 시작일 오름차순, 각 계획의 일별 항목은 날짜 오름차순입니다.
/// (ISO 날짜 문자열은 문자열 정렬이 곧 날짜 정렬)
pub async fn list_by_user(pool: &SqlitePool, user_pk: i64) -> Result<Vec<StudyPlan>, AppError> {
    let rows = sqlx::query_as::<_, StudyPlanRow>(
        r#"
        SELECT id, subject, start_date, end_date, database_id
        FROM study_plans
        WHERE user_id = ?
        ORDER BY start_date ASC, id ASC
        "#,
    )
    .bind(user_pk)
    .fetch_all(pool)
    .await?;

    let daily_rows = sqlx::query_as::<_, DailyPlan>(
        r#"
        SELECT d.id, d.date, d.content, d.study_plan_id
        FROM daily_plans d
        INNER JOIN study_plans s ON s.id = d.study_plan_id
        WHERE s.user_id = ?
        ORDER BY d.date ASC, d.id ASC
        "#,
    )
    .bind(user_pk)
    .fetch_all(pool)
    .await?;

    let mut by_plan: HashMap<i64, Vec<DailyPlan>> = HashMap::new();
    for daily in daily_rows {
        by_plan.entry(daily.study_plan_id).or_default().push(daily);
    }

    Ok(rows
        .into_iter()
        .map(|row| {
            let daily_plans = by_plan.remove(&row.id).unwrap_or_default();
            StudyPlan::from_row(row, daily_plans)
        })
        .collect())
}
