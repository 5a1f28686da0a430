use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::catalog::ShopList, error::AppResult, response::ApiResponse,
    services::catalog_service, state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_shops))
}

#[utoipa::path(
    get,
    path = "/api/shops",
    responses(
        (status = 200, description = "All shops", body = ApiResponse<ShopList>),
    ),
    tag = "Catalog"
)]
pub async fn list_shops(State(state): State<AppState>) -> AppResult<Json<ApiResponse<ShopList>>> {
    let resp = catalog_service::list_shops(&state.pool).await?;
    Ok(Json(resp))
}
