//! # 시험 API 라우트 핸들러
//!
//! ## 엔드포인트 목록
//! | 메서드 | 경로 | 핸들러 | 인증 | 설명 |
//! |--------|------|--------|------|------|
//! | POST | /exam | `create_exam` | O | 시험+챕터 등록 |
//! | GET | /exam/{userId} | `list_exams` | X | 사용자의 시험 목록 |
//! | DELETE | /exam/{userId}/{subject} | `delete_exam` | O | 과목 하나 삭제 |
//! | DELETE | /exam/{userId} | `delete_all_exams` | O | 전체 삭제 |
//!
//! 인증이 필요한 핸들러는 `AuthUser` 추출자로 토큰을 검증하고,
//! 토큰 주인과 대상 userId가 다르면 403을 반환합니다.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::{
    db,
    error::AppError,
    middleware::auth::AuthUser,
    models::CreateExamRequest,
    routes::AppState,
};

/// `POST /exam` → `201 { "message": ..., "data": Exam }`
pub async fn create_exam(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(req): Json<CreateExamRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    auth_user.ensure_owner(req.user_id.trim())?;
    let user = db::users::require_by_user_id(&state.pool, &auth_user.user_id).await?;

    let new_exam = req.validate()?;
    let exam = db::exams::create_exam(&state.pool, user.id, &new_exam).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Exam created",
            "data": exam
        })),
    ))
}

/// `GET /exam/{userId}` → `{ "userId": ..., "exams": [...] }`
pub async fn list_exams(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let user = db::users::require_by_user_id(&state.pool, &user_id).await?;
    let exams = db::exams::list_exams(&state.pool, user.id).await?;
    Ok(Json(json!({ "userId": user.user_id, "exams": exams })))
}

/// `DELETE /exam/{userId}/{subject}`: 없으면 404
pub async fn delete_exam(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((user_id, subject)): Path<(String, String)>,
) -> Result<Json<Value>, AppError> {
    auth_user.ensure_owner(&user_id)?;
    let user = db::users::require_by_user_id(&state.pool, &user_id).await?;

    // 저장할 때와 같은 규칙으로 과목명을 다듬습니다.
    let subject = subject.trim();
    if !db::exams::delete_exam(&state.pool, user.id, subject).await? {
        return Err(AppError::NotFound);
    }
    Ok(Json(json!({ "message": format!("Exam '{}' deleted", subject) })))
}

/// `DELETE /exam/{userId}` → `{ "message": ..., "deleted": n }`
pub async fn delete_all_exams(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(user_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    auth_user.ensure_owner(&user_id)?;
    let user = db::users::require_by_user_id(&state.pool, &user_id).await?;

    let deleted = db::exams::delete_all_exams(&state.pool, user.id).await?;
    Ok(Json(json!({
        "message": format!("{} exam(s) deleted", deleted),
        "deleted": deleted
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CreateChapterRequest, Difficulty};
    use crate::routes::test_state;

    fn auth(user_id: &str) -> AuthUser {
        AuthUser {
            user_id: user_id.to_string(),
        }
    }

    fn exam_req(user_id: &str, subject: &str) -> Json<CreateExamRequest> {
        Json(CreateExamRequest {
            user_id: user_id.to_string(),
            subject: subject.to_string(),
            start_date: "2025-06-02".to_string(),
            end_date: "2025-06-06".to_string(),
            importance: 4,
            chapters: vec![
                CreateChapterRequest {
                    chapter_title: "Ch1".to_string(),
                    difficulty: Difficulty::Easy,
                    content_volume: 20,
                },
                CreateChapterRequest {
                    chapter_title: "Ch2".to_string(),
                    difficulty: Difficulty::Hard,
                    content_volume: 30,
                },
            ],
        })
    }

    #[tokio::test]
    async fn create_list_and_delete() {
        let state = test_state().await;
        db::users::create_user(&state.pool, "u1", None, "hash")
            .await
            .unwrap();

        let (status, Json(body)) = create_exam(State(state.clone()), auth("u1"), exam_req("u1", "Math"))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["subject"], "Math");
        assert_eq!(body["data"]["chapters"][1]["chapterTitle"], "Ch2");

        let Json(body) = list_exams(State(state.clone()), Path("u1".to_string()))
            .await
            .unwrap();
        assert_eq!(body["userId"], "u1");
        assert_eq!(body["exams"].as_array().unwrap().len(), 1);

        let Json(body) = delete_exam(
            State(state.clone()),
            auth("u1"),
            Path(("u1".to_string(), "Math".to_string())),
        )
        .await
        .unwrap();
        assert_eq!(body["message"], "Exam 'Math' deleted");
        let err = delete_exam(
            State(state),
            auth("u1"),
            Path(("u1".to_string(), "Math".to_string())),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }

    #[tokio::test]
    async fn other_users_token_is_forbidden() {
        let state = test_state().await;
        db::users::create_user(&state.pool, "u1", None, "hash")
            .await
            .unwrap();

        let err = create_exam(State(state.clone()), auth("u2"), exam_req("u1", "Math"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        let err = delete_all_exams(State(state), auth("u2"), Path("u1".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn duplicate_subject_conflicts_and_delete_all_counts() {
        let state = test_state().await;
        db::users::create_user(&state.pool, "u1", None, "hash")
            .await
            .unwrap();

        let _ = create_exam(State(state.clone()), auth("u1"), exam_req("u1", "Math"))
            .await
            .unwrap();
        let _ = create_exam(State(state.clone()), auth("u1"), exam_req("u1", "History"))
            .await
            .unwrap();
        let err = create_exam(State(state.clone()), auth("u1"), exam_req("u1", "Math"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let Json(body) = delete_all_exams(State(state), auth("u1"), Path("u1".to_string()))
            .await
            .unwrap();
        assert_eq!(body["deleted"], 2);
    }

    #[tokio::test]
    async fn padded_subject_can_be_deleted() {
        let state = test_state().await;
        db::users::create_user(&state.pool, "u1", None, "hash")
            .await
            .unwrap();

        let (_, Json(body)) = create_exam(State(state.clone()), auth("u1"), exam_req("u1", "  Math "))
            .await
            .unwrap();
        assert_eq!(body["data"]["subject"], "Math");

        let Json(body) = delete_exam(
            State(state.clone()),
            auth("u1"),
            Path(("u1".to_string(), " Math  ".to_string())),
        )
        .await
        .unwrap();
        assert_eq!(body["message"], "Exam 'Math' deleted");

        let Json(body) = list_exams(State(state), Path("u1".to_string()))
            .await
            .unwrap();
        assert!(body["exams"].as_array().unwrap().is_empty());
    }
}
