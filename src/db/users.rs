use crate::error::AppError;
use crate::models::user::User;
use sqlx::SqlitePool;

pub async fn create_user(
    pool: &SqlitePool,
    user_id: &str,
    name: Option<&str>,
    password_hash: &str,
) -> Result<User, AppError> {
    let result = sqlx::query(
        r#"
        INSERT INTO users (user_id, name, password_hash)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(name)
    .bind(password_hash)
    .execute(pool)
    .await;

    if let Err(sqlx::Error::Database(ref e)) = result {
        if e.is_unique_violation() {
            return Err(AppError::Conflict(format!("User '{}' already exists", user_id)));
        }
    }
    result?;

    find_by_user_id(pool, user_id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created user".to_string()))
}

pub async fn find_by_user_id(pool: &SqlitePool, user_id: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, user_id, name, password_hash, created_at
        FROM users
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// `find_by_user_id`와 같지만 없는 사용자는 400으로 돌려줍니다.
pub async fn require_by_user_id(pool: &SqlitePool, user_id: &str) -> Result<User, AppError> {
    find_by_user_id(pool, user_id)
        .await?
        .ok_or_else(|| AppError::BadRequest(format!("Unknown user: {}", user_id)))
}

pub async fn list_users(pool: &SqlitePool) -> Result<Vec<User>, AppError> {
    let users = sqlx::query_as::<_, User>(
        r#"
        SELECT id, user_id, name, password_hash, created_at
        FROM users
        ORDER BY id ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(users)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[tokio::test]
    async fn create_and_find_user() {
        let pool = test_pool().await;
        let user = create_user(&pool, "u1", Some("Kim"), "hash").await.unwrap();
        assert_eq!(user.user_id, "u1");
        assert_eq!(user.name.as_deref(), Some("Kim"));

        let found = find_by_user_id(&pool, "u1").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert!(find_by_user_id(&pool, "nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn require_unknown_user_is_bad_request() {
        let pool = test_pool().await;
        create_user(&pool, "u1", None, "hash").await.unwrap();

        assert_eq!(require_by_user_id(&pool, "u1").await.unwrap().user_id, "u1");
        let err = require_by_user_id(&pool, "nobody").await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn duplicate_user_id_is_conflict() {
        let pool = test_pool().await;
        create_user(&pool, "u1", None, "hash").await.unwrap();
        let err = create_user(&pool, "u1", None, "hash").await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(list_users(&pool).await.unwrap().len(), 1);
    }
}
