use anyhow::anyhow;
use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::{Extension, Json, extract::State, response::IntoResponse};
use jsonwebtoken::{EncodingKey, Header, encode};

use ridereel_types::api::{AdminUserResponse, LoginRequest, LoginResponse};

use crate::error::{ApiError, ValidJson};
use crate::middleware::Claims;
use crate::state::{AppState, with_store};

pub async fn login(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let username = req.username.clone();
    let user = with_store(&state, move |s| s.get_user_by_username(&username))
        .await?
        .ok_or(ApiError::Auth)?;

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|e| ApiError::Storage(anyhow!("corrupt password hash: {}", e)))?;

    Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .map_err(|_| ApiError::Auth)?;

    let token = create_token(&state.jwt_secret, user.id, &user.username)?;

    Ok(Json(LoginResponse {
        id: user.id,
        username: user.username,
        token,
    }))
}

pub async fn current_user(Extension(claims): Extension<Claims>) -> impl IntoResponse {
    Json(AdminUserResponse {
        id: claims.sub,
        username: claims.username,
    })
}

fn create_token(secret: &str, user_id: i64, username: &str) -> anyhow::Result<String> {
    let claims = Claims {
        sub: user_id,
        username: username.to_string(),
        exp: (chrono::Utc::now() + chrono::Duration::days(30)).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}
