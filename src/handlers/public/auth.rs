use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::{generate_jwt, hash_password, verify_password, Claims};
use crate::config;
use crate::database::manager::DatabaseManager;
use crate::database::models::user::User;
use crate::database::is_unique_violation;
use crate::error::ApiError;
use crate::middleware::response::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// POST /auth/register - create an account and return a bearer token
pub async fn register(Json(req): Json<RegisterRequest>) -> ApiResult<Value> {
    let username = req.username.trim().to_string();
    validate_username(&username)?;
    validate_password(&req.password)?;

    let pool = DatabaseManager::pool().await.map_err(ApiError::from)?;
    let password_hash = hash_password(&req.password);

    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (username, password_hash) VALUES ($1, $2) \
         RETURNING id, username, password_hash, created_at",
    )
    .bind(&username)
    .bind(&password_hash)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e, "users_username_key") {
            ApiError::field_error("username", "username is already taken")
        } else {
            tracing::error!("user insert failed: {}", e);
            ApiError::internal_server_error("An error occurred while processing your request")
        }
    })?;

    tracing::info!("registered user {}", user.username);
    Ok(ApiResponse::created(token_response(&user)?))
}

/// POST /auth/login - verify credentials and return a bearer token
pub async fn login(Json(req): Json<LoginRequest>) -> ApiResult<Value> {
    let pool = DatabaseManager::pool().await.map_err(ApiError::from)?;

    let user = sqlx::query_as::<_, User>(
        "SELECT id, username, password_hash, created_at FROM users WHERE username = $1",
    )
    .bind(req.username.trim())
    .fetch_optional(&pool)
    .await
    .map_err(|e| {
        tracing::error!("user lookup failed: {}", e);
        ApiError::internal_server_error("An error occurred while processing your request")
    })?;

    // Same response for unknown user and bad password
    let user = match user {
        Some(user) if verify_password(&req.password, &user.password_hash) => user,
        _ => return Err(ApiError::unauthorized("invalid username or password")),
    };

    Ok(ApiResponse::success(token_response(&user)?))
}

fn token_response(user: &User) -> Result<Value, ApiError> {
    let token = generate_jwt(Claims::new(user.id, user.username.clone()))?;
    let expires_in = config::config().security.jwt_expiry_hours * 3600;

    Ok(json!({
        "token": token,
        "user": {
            "id": user.id,
            "username": user.username,
        },
        "expires_in": expires_in,
    }))
}

fn validate_username(username: &str) -> Result<(), ApiError> {
    if username.len() < 2 || username.len() > 150 {
        return Err(ApiError::field_error(
            "username",
            "username must be between 2 and 150 characters",
        ));
    }
    if !username.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_') {
        return Err(ApiError::field_error(
            "username",
            "username can only contain letters, numbers, hyphens, and underscores",
        ));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), ApiError> {
    if password.len() < 8 {
        return Err(ApiError::field_error(
            "password",
            "password must be at least 8 characters",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_rules() {
        assert!(validate_username("grower_1").is_ok());
        assert!(validate_username("a").is_err());
        assert!(validate_username("has spaces").is_err());
        assert!(validate_username("semi;colon").is_err());
    }

    #[test]
    fn password_minimum_length() {
        assert!(validate_password("longenough").is_ok());
        assert!(validate_password("short").is_err());
    }
}
