use uuid::Uuid;

use crate::{
    db::DbPool,
    dto::contacts::{
        ContactList, CreateContactRequest, DeleteContactsRequest, DeleteReport,
        UpdateContactRequest,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Contact,
    response::{ApiResponse, Meta},
};

pub async fn list_contacts(pool: &DbPool, user: &AuthUser) -> AppResult<ApiResponse<ContactList>> {
    let items: Vec<Contact> =
        sqlx::query_as("SELECT * FROM contacts WHERE user_id = $1 ORDER BY city, phone")
            .bind(user.user_id)
            .fetch_all(pool)
            .await?;

    Ok(ApiResponse::success("OK", ContactList { items }, Some(Meta::empty())))
}

pub async fn create_contact(
    pool: &DbPool,
    user: &AuthUser,
    payload: CreateContactRequest,
) -> AppResult<ApiResponse<Contact>> {
    if payload.city.trim().is_empty() || payload.phone.trim().is_empty() {
        return Err(AppError::Validation("city and phone are required".into()));
    }

    let contact: Contact = sqlx::query_as(
        r#"
        INSERT INTO contacts (id, user_id, city, street, house, structure, building, apartment, phone, phone_2)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user.user_id)
    .bind(payload.city)
    .bind(payload.street)
    .bind(payload.house)
    .bind(payload.structure)
    .bind(payload.building)
    .bind(payload.apartment)
    .bind(payload.phone)
    .bind(payload.phone_2)
    .fetch_one(pool)
    .await?;

    Ok(ApiResponse::success("Contact created", contact, None))
}

pub async fn update_contact(
    pool: &DbPool,
    user: &AuthUser,
    payload: UpdateContactRequest,
) -> AppResult<ApiResponse<Contact>> {
    let updated: Option<Contact> = sqlx::query_as(
        r#"
        UPDATE contacts
        SET city = COALESCE($3, city),
            street = COALESCE($4, street),
            house = COALESCE($5, house),
            structure = COALESCE($6, structure),
            building = COALESCE($7, building),
            apartment = COALESCE($8, apartment),
            phone = COALESCE($9, phone),
            phone_2 = COALESCE($10, phone_2)
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(payload.id)
    .bind(user.user_id)
    .bind(payload.city)
    .bind(payload.street)
    .bind(payload.house)
    .bind(payload.structure)
    .bind(payload.building)
    .bind(payload.apartment)
    .bind(payload.phone)
    .bind(payload.phone_2)
    .fetch_optional(pool)
    .await?;

    // Not-owned reads identically to not-found.
    match updated {
        Some(contact) => Ok(ApiResponse::success("Contact updated", contact, None)),
        None => Err(AppError::NotFound),
    }
}

pub async fn delete_contacts(
    pool: &DbPool,
    user: &AuthUser,
    payload: DeleteContactsRequest,
) -> AppResult<ApiResponse<DeleteReport>> {
    let ids: Vec<Uuid> = payload
        .items
        .split(',')
        .filter_map(|raw| Uuid::parse_str(raw.trim()).ok())
        .collect();

    if ids.is_empty() {
        return Err(AppError::Validation("no valid contact ids given".into()));
    }

    let result = sqlx::query("DELETE FROM contacts WHERE user_id = $1 AND id = ANY($2)")
        .bind(user.user_id)
        .bind(&ids)
        .execute(pool)
        .await?;

    Ok(ApiResponse::success(
        "Contacts removed",
        DeleteReport {
            removed: result.rows_affected(),
        },
        Some(Meta::empty()),
    ))
}
