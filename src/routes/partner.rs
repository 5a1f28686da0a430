use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};

use crate::{
    dto::{
        orders::OrderList,
        partner::{ImportReport, PriceList, StateRequest},
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::Shop,
    response::ApiResponse,
    services::{order_service, partner_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/update", post(update_price_list))
        .route("/state", get(get_state).post(set_state))
        .route("/orders", get(list_orders))
}

#[utoipa::path(
    post,
    path = "/api/partner/update",
    request_body = PriceList,
    responses(
        (status = 200, description = "Per-entry import report", body = ApiResponse<ImportReport>),
        (status = 400, description = "Shop name missing on first import"),
        (status = 403, description = "Shop role required"),
    ),
    security(("bearer_auth" = [])),
    tag = "Partner"
)]
pub async fn update_price_list(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<PriceList>,
) -> AppResult<Json<ApiResponse<ImportReport>>> {
    let resp = partner_service::import_price_list(&state.pool, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/partner/state",
    responses(
        (status = 200, description = "Caller's shop", body = ApiResponse<Shop>),
        (status = 403, description = "Shop role required"),
        (status = 404, description = "No shop yet"),
    ),
    security(("bearer_auth" = [])),
    tag = "Partner"
)]
pub async fn get_state(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<Shop>>> {
    let resp = partner_service::get_state(&state.pool, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/partner/state",
    request_body = StateRequest,
    responses(
        (status = 200, description = "Accepting-orders flag updated", body = ApiResponse<Shop>),
        (status = 400, description = "Unparseable flag"),
        (status = 403, description = "Shop role required"),
    ),
    security(("bearer_auth" = [])),
    tag = "Partner"
)]
pub async fn set_state(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<StateRequest>,
) -> AppResult<Json<ApiResponse<Shop>>> {
    let resp = partner_service::set_state(&state.pool, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/partner/orders",
    responses(
        (status = 200, description = "Orders containing the shop's listings, partial view", body = ApiResponse<OrderList>),
        (status = 403, description = "Shop role required"),
    ),
    security(("bearer_auth" = [])),
    tag = "Partner"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = order_service::list_orders_for_shop(&state.pool, &user).await?;
    Ok(Json(resp))
}
