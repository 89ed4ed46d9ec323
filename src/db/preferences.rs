//! # 학습 선호도 DB 쿼리
//!
//! 사용자당 선호도는 하나뿐이므로 저장은 항상 upsert입니다.
//! `study_days`는 JSON 배열 문자열로 직렬화해 한 컬럼에 넣습니다.

use sqlx::SqlitePool;

use crate::error::AppError;
use crate::models::{Preference, PreferenceRow};

/// 사용자의 선호도를 조회합니다. 아직 저장하지 않았다면 `None`.
pub async fn get_preference(pool: &SqlitePool, user_pk: i64) -> Result<Option<Preference>, AppError> {
    let row = sqlx::query_as::<_, PreferenceRow>(
        r#"
        SELECT style, study_days, sessions_per_day
        FROM preferences
        WHERE user_id = ?
        "#,
    )
    .bind(user_pk)
    .fetch_optional(pool)
    .await?;

    // Option<Row> → Option<Result<Preference>> → Result<Option<Preference>>
    row.map(Preference::try_from).transpose()
}

/// 선호도를 저장합니다. 이미 있으면 덮어씁니다.
pub async fn upsert_preference(
    pool: &SqlitePool,
    user_pk: i64,
    preference: &Preference,
) -> Result<(), AppError> {
    let study_days = serde_json::to_string(&preference.study_days)
        .map_err(|e| AppError::Internal(format!("Failed to encode study days: {}", e)))?;

    // ON CONFLICT ... DO UPDATE: SQLite의 upsert 구문
    // excluded.*는 INSERT하려던 새 값을 가리킵니다.
    sqlx::query(
        r#"
        INSERT INTO preferences (user_id, style, study_days, sessions_per_day)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(user_id) DO UPDATE SET
            style = excluded.style,
            study_days = excluded.study_days,
            sessions_per_day = excluded.sessions_per_day,
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        "#,
    )
    .bind(user_pk)
    .bind(preference.style.as_str())
    .bind(study_days)
    .bind(i64::from(preference.sessions_per_day))
    .execute(pool)
    .await?;

    Ok(())
}
