//! # 학습 선호도 API 라우트 핸들러
//!
//! ## 엔드포인트 목록
//! | 메서드 | 경로 | 핸들러 | 설명 |
//! |--------|------|--------|------|
//! | GET | /user-preference/{userId} | `get_preference` | 선호도 조회 (없으면 404) |
//! | POST | /user-preference/{userId} | `save_preference` | 선호도 저장 (덮어쓰기) |
//!
//! 알 수 없는 사용자는 두 엔드포인트 모두 400입니다.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    db,
    error::AppError,
    models::{Preference, SavePreferenceRequest},
    routes::AppState,
};

/// `GET /user-preference/{userId}` → `{ style, studyDays, sessionsPerDay }`
pub async fn get_preference(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Preference>, AppError> {
    let user = db::users::require_by_user_id(&state.pool, &user_id).await?;
    let preference = db::preferences::get_preference(&state.pool, user.id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(preference))
}

/// `POST /user-preference/{userId}` + `{ style, studyDays, sessionsPerDay }`
///
/// 검증 후 정규화된(요일 중복 제거) 선호도를 저장하고 그대로 돌려줍니다.
pub async fn save_preference(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(req): Json<SavePreferenceRequest>,
) -> Result<Json<Preference>, AppError> {
    let user = db::users::require_by_user_id(&state.pool, &user_id).await?;
    let preference = req.validate()?;

    db::preferences::upsert_preference(&state.pool, user.id, &preference).await?;
    tracing::info!(
        "Saved preference for {}: {} / {:?} / {} session(s)",
        user_id,
        preference.style,
        preference.study_days,
        preference.sessions_per_day
    );

    Ok(Json(preference))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StudyStyle;
    use crate::routes::test_state;

    fn request(days: &[&str]) -> Json<SavePreferenceRequest> {
        Json(SavePreferenceRequest {
            style: StudyStyle::Parallel,
            study_days: days.iter().map(|d| d.to_string()).collect(),
            sessions_per_day: 2,
        })
    }

    #[tokio::test]
    async fn save_then_get() {
        let state = test_state().await;
        db::users::create_user(&state.pool, "u1", None, "hash")
            .await
            .unwrap();

        let err = get_preference(State(state.clone()), Path("u1".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound));

        let Json(saved) = save_preference(
            State(state.clone()),
            Path("u1".to_string()),
            request(&["화", "목", "화"]),
        )
        .await
        .unwrap();
        assert_eq!(saved.study_days, vec!["화", "목"]);

        let Json(pref) = get_preference(State(state), Path("u1".to_string()))
            .await
            .unwrap();
        assert_eq!(pref.style, StudyStyle::Parallel);
        assert_eq!(pref.study_days, vec!["화", "목"]);
    }

    #[tokio::test]
    async fn unknown_user_and_bad_labels_are_bad_requests() {
        let state = test_state().await;
        let err = save_preference(State(state.clone()), Path("ghost".to_string()), request(&["월"]))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        db::users::create_user(&state.pool, "u1", None, "hash")
            .await
            .unwrap();
        let err = save_preference(State(state), Path("u1".to_string()), request(&["Monday"]))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
