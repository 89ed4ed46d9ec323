use crate::{
    db::users as db_users,
    error::AppError,
    middleware::auth::create_access_token,
    models::user::*,
    routes::AppState,
};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{extract::State, http::StatusCode, Json};

const MIN_PASSWORD_LEN: usize = 4;

pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    // Validate input
    let user_id = req.user_id.trim();
    if user_id.is_empty() {
        return Err(AppError::BadRequest("userId is required".to_string()));
    }
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }

    // Hash password with Argon2id
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(req.password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?
        .to_string();

    let name = req.name.as_deref().map(str::trim).filter(|n| !n.is_empty());
    let user = db_users::create_user(&state.pool, user_id, name, &password_hash).await?;
    tracing::info!("Registered user {}", user.user_id);

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// 로그인 성공 시 JWT 문자열을 본문 그대로(text/plain) 돌려줍니다.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<String, AppError> {
    let user = db_users::find_by_user_id(&state.pool, req.user_id.trim())
        .await?
        .ok_or(AppError::Unauthorized("Invalid userId or password".to_string()))?;

    // Verify password
    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|e| AppError::Internal(format!("Password hash parse error: {}", e)))?;

    Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .map_err(|_| AppError::Unauthorized("Invalid userId or password".to_string()))?;

    let token = create_access_token(&user.user_id, &state.jwt_secret)
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::auth::verify_access_token;
    use crate::routes::test_state;

    fn signup_req(user_id: &str, password: &str) -> Json<SignupRequest> {
        Json(SignupRequest {
            user_id: user_id.to_string(),
            password: password.to_string(),
            name: Some("Kim".to_string()),
        })
    }

    fn login_req(user_id: &str, password: &str) -> Json<LoginRequest> {
        Json(LoginRequest {
            user_id: user_id.to_string(),
            password: password.to_string(),
        })
    }

    #[tokio::test]
    async fn signup_then_login_issues_token_for_user() {
        let state = test_state().await;
        let (status, Json(user)) = signup(State(state.clone()), signup_req("u1", "pass1234"))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(user.user_id, "u1");

        let token = login(State(state.clone()), login_req("u1", "pass1234"))
            .await
            .unwrap();
        let claims = verify_access_token(&token, &state.jwt_secret).unwrap();
        assert_eq!(claims.sub, "u1");
    }

    #[tokio::test]
    async fn login_rejects_wrong_password_and_unknown_user() {
        let state = test_state().await;
        let _ = signup(State(state.clone()), signup_req("u1", "pass1234"))
            .await
            .unwrap();

        let err = login(State(state.clone()), login_req("u1", "nope"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));

        let err = login(State(state), login_req("ghost", "pass1234"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn signup_validates_and_detects_duplicates() {
        let state = test_state().await;
        let err = signup(State(state.clone()), signup_req("u1", "abc"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let err = signup(State(state.clone()), signup_req("  ", "pass1234"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let _ = signup(State(state.clone()), signup_req("u1", "pass1234"))
            .await
            .unwrap();
        let err = signup(State(state), signup_req("u1", "pass1234"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }
}
