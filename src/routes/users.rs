use axum::{
    extract::{Path, State},
    Json,
};

use crate::{db, error::AppError, models::UserResponse, routes::AppState};

pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserResponse>>, AppError> {
    let users = db::users::list_users(&state.pool).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserResponse>, AppError> {
    let user = db::users::find_by_user_id(&state.pool, &user_id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(user.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_state;

    #[tokio::test]
    async fn lists_and_finds_users() {
        let state = test_state().await;
        db::users::create_user(&state.pool, "u1", Some("Kim"), "hash")
            .await
            .unwrap();

        let Json(users) = list_users(State(state.clone())).await.unwrap();
        assert_eq!(users.len(), 1);

        let Json(user) = get_user(State(state.clone()), Path("u1".to_string()))
            .await
            .unwrap();
        assert_eq!(user.name.as_deref(), Some("Kim"));

        let err = get_user(State(state), Path("ghost".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }
}
