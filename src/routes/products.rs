use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};

use crate::{
    dto::catalog::ListingList,
    error::AppResult,
    response::ApiResponse,
    routes::params::ListingQuery,
    services::catalog_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(search_listings))
}

#[utoipa::path(
    get,
    path = "/api/products",
    params(
        ("shop_id" = Option<uuid::Uuid>, Query, description = "Restrict to one shop"),
        ("category_id" = Option<uuid::Uuid>, Query, description = "Restrict to one category"),
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
    ),
    responses(
        (status = 200, description = "Listings of shops accepting orders", body = ApiResponse<ListingList>),
    ),
    tag = "Catalog"
)]
pub async fn search_listings(
    State(state): State<AppState>,
    Query(query): Query<ListingQuery>,
) -> AppResult<Json<ApiResponse<ListingList>>> {
    let resp = catalog_service::search_listings(&state.pool, query).await?;
    Ok(Json(resp))
}
