use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::{
        auth::UpdateDetailsRequest,
        contacts::{
            ContactList, CreateContactRequest, DeleteContactsRequest, DeleteReport,
            UpdateContactRequest,
        },
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::{Contact, User},
    response::ApiResponse,
    services::{auth_service, contact_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/details", get(get_details).post(update_details))
        .route(
            "/contact",
            get(list_contacts)
                .post(create_contact)
                .put(update_contact)
                .delete(delete_contacts),
        )
}

#[utoipa::path(
    get,
    path = "/api/user/details",
    responses(
        (status = 200, description = "Current user profile", body = ApiResponse<User>),
    ),
    security(("bearer_auth" = [])),
    tag = "Account"
)]
pub async fn get_details(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<User>>> {
    let resp = auth_service::get_details(&state.pool, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/user/details",
    request_body = UpdateDetailsRequest,
    responses(
        (status = 200, description = "Profile updated", body = ApiResponse<User>),
        (status = 400, description = "Invalid fields"),
    ),
    security(("bearer_auth" = [])),
    tag = "Account"
)]
pub async fn update_details(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<UpdateDetailsRequest>,
) -> AppResult<Json<ApiResponse<User>>> {
    let resp = auth_service::update_details(&state.pool, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/user/contact",
    responses(
        (status = 200, description = "Caller's contacts", body = ApiResponse<ContactList>),
    ),
    security(("bearer_auth" = [])),
    tag = "Account"
)]
pub async fn list_contacts(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<ContactList>>> {
    let resp = contact_service::list_contacts(&state.pool, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/user/contact",
    request_body = CreateContactRequest,
    responses(
        (status = 200, description = "Contact created", body = ApiResponse<Contact>),
        (status = 400, description = "city and phone are required"),
    ),
    security(("bearer_auth" = [])),
    tag = "Account"
)]
pub async fn create_contact(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateContactRequest>,
) -> AppResult<Json<ApiResponse<Contact>>> {
    let resp = contact_service::create_contact(&state.pool, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/user/contact",
    request_body = UpdateContactRequest,
    responses(
        (status = 200, description = "Contact updated", body = ApiResponse<Contact>),
        (status = 404, description = "Contact not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Account"
)]
pub async fn update_contact(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<UpdateContactRequest>,
) -> AppResult<Json<ApiResponse<Contact>>> {
    let resp = contact_service::update_contact(&state.pool, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/user/contact",
    request_body = DeleteContactsRequest,
    responses(
        (status = 200, description = "Contacts removed", body = ApiResponse<DeleteReport>),
        (status = 400, description = "No valid ids given"),
    ),
    security(("bearer_auth" = [])),
    tag = "Account"
)]
pub async fn delete_contacts(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<DeleteContactsRequest>,
) -> AppResult<Json<ApiResponse<DeleteReport>>> {
    let resp = contact_service::delete_contacts(&state.pool, &user, payload).await?;
    Ok(Json(resp))
}
