use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use password_hash::rand_core::OsRng;
use uuid::Uuid;

use crate::{
    dto::auth::{LoginRequest, LoginResponse},
    error::{AppError, AppResult},
    models::ADMIN_ROLE,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(hash)
}

/// A malformed stored hash counts as a mismatch.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    match PasswordHash::new(password_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => {
            tracing::warn!("stored admin password hash is malformed");
            false
        }
    }
}

/// Succeeds only when exactly one active record matches the email, the
/// admin role and the password. Any mismatch reads "Invalid credentials".
pub async fn login(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let LoginRequest { email, password } = payload;
    if email.trim().is_empty() || password.is_empty() {
        return Err(AppError::Validation("Email and password are required.".into()));
    }

    let records = state.credentials.find_active_by_email(&email).await?;
    let matches = records
        .iter()
        .filter(|record| record.role == ADMIN_ROLE)
        .filter(|record| verify_password(&password, &record.password_hash))
        .count();

    if matches != 1 {
        tracing::info!(matches, "admin login rejected");
        return Err(AppError::invalid_credentials());
    }

    let token = state.admin.open().await?;
    tracing::info!("admin logged in");

    Ok(ApiResponse::success(
        "Logged in",
        LoginResponse {
            token: format!("Bearer {token}"),
        },
        Some(Meta::empty()),
    ))
}

/// Clears the session flag. Succeeds whether or not a session existed.
pub async fn logout(
    state: &AppState,
    token: Option<Uuid>,
) -> AppResult<ApiResponse<serde_json::Value>> {
    if let Some(token) = token {
        state.admin.clear(token).await?;
        tracing::info!("admin logged out");
    }
    Ok(ApiResponse::success(
        "Logged out",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
