use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::catalog::CategoryList, error::AppResult, response::ApiResponse,
    services::catalog_service, state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_categories))
}

#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "All categories", body = ApiResponse<CategoryList>),
    ),
    tag = "Catalog"
)]
pub async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<CategoryList>>> {
    let resp = catalog_service::list_categories(&state.pool).await?;
    Ok(Json(resp))
}
