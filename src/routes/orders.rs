use axum::{
    Json, Router,
    extract::State,
    routing::get,
};

use crate::{
    dto::orders::{CheckoutRequest, CheckoutResponse, OrderList},
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_orders).post(checkout))
}

#[utoipa::path(
    get,
    path = "/api/order",
    responses(
        (status = 200, description = "Caller's placed orders with totals", body = ApiResponse<OrderList>),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = order_service::list_orders_for_buyer(&state.pool, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/order",
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Basket placed as a new order", body = ApiResponse<CheckoutResponse>),
        (status = 400, description = "Empty basket, no basket, or invalid contact"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn checkout(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CheckoutRequest>,
) -> AppResult<Json<ApiResponse<CheckoutResponse>>> {
    let resp = order_service::checkout(&state, &user, payload).await?;
    Ok(Json(resp))
}
