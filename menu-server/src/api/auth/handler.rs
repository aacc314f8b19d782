//! Authentication Handlers

use std::time::Duration;

use axum::{Json, extract::State};
use shared::client::{LoginRequest, LoginResponse};

use crate::core::ServerState;
use crate::security_log;
use crate::utils::validation::{MAX_PASSWORD_LEN, MAX_SHORT_TEXT_LEN, validate_required_text};
use crate::utils::{AppError, AppResult};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

/// POST /login - 编辑端登录，返回 JWT
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    validate_required_text(&req.username, "username", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&req.password, "password", MAX_PASSWORD_LEN)?;

    let verified = state
        .credentials
        .verify(&req.username, &req.password)
        .map_err(|e| {
            tracing::error!(error = %e, "Configured admin password hash is invalid");
            AppError::internal("Password verification failed")
        });

    // Fixed delay to prevent timing attacks (before checking result)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    if !verified? {
        security_log!("WARN", "login_failed", username = req.username.clone());
        return Err(AppError::invalid_credentials());
    }

    let token = state
        .jwt_service
        .generate_token(&req.username, &req.username)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;

    tracing::info!(username = %req.username, "Editor logged in");

    Ok(Json(LoginResponse {
        token,
        username: req.username,
        expires_in: state.jwt_service.expires_in_seconds(),
    }))
}
