use axum::{
    Json, Router,
    extract::State,
    routing::get,
};

use crate::{
    dto::basket::{
        AddItemsRequest, BasketView, BasketWriteReport, QuantityUpdateReport,
        RemoveItemsRequest, RemoveReport, UpdateQuantitiesRequest,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::basket_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(get_basket)
            .post(add_items)
            .put(update_quantities)
            .delete(remove_items),
    )
}

#[utoipa::path(
    get,
    path = "/api/basket",
    responses(
        (status = 200, description = "Caller's open basket, null if none", body = ApiResponse<BasketView>),
    ),
    security(("bearer_auth" = [])),
    tag = "Basket"
)]
pub async fn get_basket(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<Option<BasketView>>>> {
    let resp = basket_service::get_basket(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/basket",
    request_body = AddItemsRequest,
    responses(
        (status = 200, description = "Per-entry report; invalid entries are skipped", body = ApiResponse<BasketWriteReport>),
        (status = 400, description = "Empty item list"),
    ),
    security(("bearer_auth" = [])),
    tag = "Basket"
)]
pub async fn add_items(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<AddItemsRequest>,
) -> AppResult<Json<ApiResponse<BasketWriteReport>>> {
    let resp = basket_service::add_items(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/basket",
    request_body = UpdateQuantitiesRequest,
    responses(
        (status = 200, description = "Count of lines updated; unknown ids are skipped", body = ApiResponse<QuantityUpdateReport>),
    ),
    security(("bearer_auth" = [])),
    tag = "Basket"
)]
pub async fn update_quantities(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<UpdateQuantitiesRequest>,
) -> AppResult<Json<ApiResponse<QuantityUpdateReport>>> {
    let resp = basket_service::update_quantities(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/basket",
    request_body = RemoveItemsRequest,
    responses(
        (status = 200, description = "Count of lines removed", body = ApiResponse<RemoveReport>),
        (status = 400, description = "No valid ids given"),
    ),
    security(("bearer_auth" = [])),
    tag = "Basket"
)]
pub async fn remove_items(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<RemoveItemsRequest>,
) -> AppResult<Json<ApiResponse<RemoveReport>>> {
    let resp = basket_service::remove_items(&state, &user, payload).await?;
    Ok(Json(resp))
}
