use axum::{Json, Router, extract::State, routing::post};

use crate::{
    dto::auth::{ConfirmEmailRequest, LoginRequest, LoginResponse, RegisterRequest},
    error::AppResult,
    models::User,
    response::ApiResponse,
    services::auth_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/register/confirm", post(confirm))
        .route("/login", post(login))
}

#[utoipa::path(
    post,
    path = "/api/user/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Buyer or shop account created", body = ApiResponse<User>),
        (status = 400, description = "Missing or invalid fields"),
    ),
    tag = "Auth"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<Json<ApiResponse<User>>> {
    let resp = auth_service::register_user(&state.pool, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/user/register/confirm",
    request_body = ConfirmEmailRequest,
    responses(
        (status = 200, description = "Email confirmed", body = ApiResponse<serde_json::Value>),
        (status = 400, description = "Invalid token or email"),
    ),
    tag = "Auth"
)]
pub async fn confirm(
    State(state): State<AppState>,
    Json(payload): Json<ConfirmEmailRequest>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = auth_service::confirm_email(&state.pool, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/user/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Bearer token issued", body = ApiResponse<LoginResponse>),
        (status = 400, description = "Invalid credentials"),
        (status = 403, description = "Email not confirmed"),
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<LoginResponse>>> {
    let resp = auth_service::login_user(&state.pool, payload).await?;
    Ok(Json(resp))
}
