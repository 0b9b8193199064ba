use axum::{extract::State, Json};
use service_core::error::AppError;

use crate::{
    dtos::{
        ApiResponse, ErrorResponse, LoginEnvelope, LoginRequest, LoginResponse, RefreshEnvelope,
        RefreshRequest, RefreshResponse,
    },
    utils::ValidatedJson,
    AppState,
};

/// Exchange email and password for a token pair
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginEnvelope),
        (status = 401, description = "Unknown user or wrong password", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, AppError> {
    let pair = state.auth_service.login(req).await?;
    Ok(Json(ApiResponse::success(
        "Login successful",
        LoginResponse::from(pair),
    )))
}

/// Issue a fresh token pair from a valid token
#[utoipa::path(
    post,
    path = "/refresh",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "Tokens refreshed", body = RefreshEnvelope),
        (status = 401, description = "Invalid or expired token", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
pub async fn refresh(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RefreshRequest>,
) -> Result<Json<ApiResponse<RefreshResponse>>, AppError> {
    let pair = state.auth_service.refresh(&req.refresh_token).await?;
    Ok(Json(ApiResponse::success(
        "Token refreshed successfully",
        RefreshResponse::from(pair),
    )))
}
