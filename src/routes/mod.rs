use axum::Router;

use crate::state::AppState;

pub mod account;
pub mod auth;
pub mod basket;
pub mod categories;
pub mod doc;
pub mod health;
pub mod orders;
pub mod params;
pub mod partner;
pub mod products;
pub mod shops;

// Build the API router without binding state; it is provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/user", auth::router().merge(account::router()))
        .nest("/products", products::router())
        .nest("/shops", shops::router())
        .nest("/categories", categories::router())
        .nest("/basket", basket::router())
        .nest("/order", orders::router())
        .nest("/partner", partner::router())
}
