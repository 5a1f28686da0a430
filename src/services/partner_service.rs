use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::{
    db::DbPool,
    dto::partner::{ImportEntryError, ImportReport, PriceList, PriceListGood, StateRequest},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_shop},
    models::Shop,
    response::{ApiResponse, Meta},
};

/// Lenient boolean parser for the accepting-orders flag.
pub fn parse_flag(raw: &str) -> AppResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" | "t" | "true" | "on" | "1" => Ok(true),
        "n" | "no" | "f" | "false" | "off" | "0" => Ok(false),
        other => Err(AppError::Validation(format!(
            "invalid state value '{other}'"
        ))),
    }
}

pub async fn get_state(pool: &DbPool, user: &AuthUser) -> AppResult<ApiResponse<Shop>> {
    ensure_shop(user)?;
    let shop: Option<Shop> = sqlx::query_as("SELECT * FROM shops WHERE user_id = $1")
        .bind(user.user_id)
        .fetch_optional(pool)
        .await?;
    match shop {
        Some(shop) => Ok(ApiResponse::success("OK", shop, Some(Meta::empty()))),
        None => Err(AppError::NotFound),
    }
}

pub async fn set_state(
    pool: &DbPool,
    user: &AuthUser,
    payload: StateRequest,
) -> AppResult<ApiResponse<Shop>> {
    ensure_shop(user)?;
    let accepting = parse_flag(&payload.state)?;

    let shop: Option<Shop> = sqlx::query_as(
        "UPDATE shops SET accepting_orders = $2 WHERE user_id = $1 RETURNING *",
    )
    .bind(user.user_id)
    .bind(accepting)
    .fetch_optional(pool)
    .await?;

    match shop {
        Some(shop) => Ok(ApiResponse::success("State updated", shop, Some(Meta::empty()))),
        None => Err(AppError::NotFound),
    }
}

/// Partner price-list import. The shop row and the category links are
/// written first; every goods entry then commits or rolls back on its own,
/// so a malformed entry never undoes its siblings.
pub async fn import_price_list(
    pool: &DbPool,
    user: &AuthUser,
    payload: PriceList,
) -> AppResult<ApiResponse<ImportReport>> {
    ensure_shop(user)?;

    let shop_id = upsert_shop(pool, user.user_id, payload.shop.as_deref()).await?;

    for category in &payload.categories {
        let category_id = upsert_category_pool(pool, &category.name).await?;
        link_shop_category_pool(pool, shop_id, category_id).await?;
    }

    let mut imported = 0;
    let mut errors = Vec::new();
    for (index, good) in payload.goods.iter().enumerate() {
        match import_good(pool, shop_id, good).await {
            Ok(()) => imported += 1,
            Err(err) => errors.push(ImportEntryError {
                index,
                name: good.name.clone(),
                error: err.to_string(),
            }),
        }
    }

    Ok(ApiResponse::success(
        "Price list imported",
        ImportReport { imported, errors },
        Some(Meta::empty()),
    ))
}

async fn upsert_shop(pool: &DbPool, user_id: Uuid, name: Option<&str>) -> AppResult<Uuid> {
    let existing: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM shops WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    if let Some((shop_id,)) = existing {
        if let Some(name) = name.filter(|n| !n.trim().is_empty()) {
            sqlx::query("UPDATE shops SET name = $2 WHERE id = $1")
                .bind(shop_id)
                .bind(name)
                .execute(pool)
                .await?;
        }
        return Ok(shop_id);
    }

    let name = name
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| AppError::Validation("shop name is required on first import".into()))?;
    let row: (Uuid,) =
        sqlx::query_as("INSERT INTO shops (id, name, user_id) VALUES ($1, $2, $3) RETURNING id")
            .bind(Uuid::new_v4())
            .bind(name)
            .bind(user_id)
            .fetch_one(pool)
            .await?;
    Ok(row.0)
}

async fn upsert_category_pool(pool: &DbPool, name: &str) -> AppResult<Uuid> {
    let row: (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO categories (id, name) VALUES ($1, $2)
        ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .fetch_one(pool)
    .await?;
    Ok(row.0)
}

async fn link_shop_category_pool(pool: &DbPool, shop_id: Uuid, category_id: Uuid) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO shop_categories (shop_id, category_id) VALUES ($1, $2)
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(shop_id)
    .bind(category_id)
    .execute(pool)
    .await?;
    Ok(())
}

/// One goods entry, applied in its own transaction.
async fn import_good(pool: &DbPool, shop_id: Uuid, good: &PriceListGood) -> AppResult<()> {
    for (field, value) in [
        ("name", &good.name),
        ("category", &good.category),
        ("model", &good.model),
    ] {
        if value.trim().is_empty() {
            return Err(AppError::Validation(format!("{field} is required")));
        }
    }
    if good.quantity < 0 {
        return Err(AppError::Validation("quantity must not be negative".into()));
    }
    if good.price < 0 || good.price_rrc < 0 {
        return Err(AppError::Validation("prices must not be negative".into()));
    }

    let mut txn: Transaction<'_, Postgres> = pool.begin().await?;

    let category_id: (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO categories (id, name) VALUES ($1, $2)
        ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(good.category.as_str())
    .fetch_one(&mut *txn)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO shop_categories (shop_id, category_id) VALUES ($1, $2)
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(shop_id)
    .bind(category_id.0)
    .execute(&mut *txn)
    .await?;

    let product_id: (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO products (id, name, category_id) VALUES ($1, $2, $3)
        ON CONFLICT (name, category_id) DO UPDATE SET name = EXCLUDED.name
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(good.name.as_str())
    .bind(category_id.0)
    .fetch_one(&mut *txn)
    .await?;

    // (product, shop) uniqueness: re-import updates the listing in place.
    let listing_id: (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO listings (id, model, quantity, price, suggested_retail_price, product_id, shop_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (product_id, shop_id) DO UPDATE
        SET model = EXCLUDED.model,
            quantity = EXCLUDED.quantity,
            price = EXCLUDED.price,
            suggested_retail_price = EXCLUDED.suggested_retail_price
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(good.model.as_str())
    .bind(good.quantity)
    .bind(good.price)
    .bind(good.price_rrc)
    .bind(product_id.0)
    .bind(shop_id)
    .fetch_one(&mut *txn)
    .await?;

    // Replace the parameter links wholesale; stale keys must not survive.
    sqlx::query("DELETE FROM listing_parameters WHERE listing_id = $1")
        .bind(listing_id.0)
        .execute(&mut *txn)
        .await?;

    for (name, value) in &good.parameters {
        let parameter_id: (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO parameters (id, name) VALUES ($1, $2)
            ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name.as_str())
        .fetch_one(&mut *txn)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO listing_parameters (id, listing_id, parameter_id, value)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(listing_id.0)
        .bind(parameter_id.0)
        .bind(value.as_str())
        .execute(&mut *txn)
        .await?;
    }

    txn.commit().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::parse_flag;

    #[test]
    fn parse_flag_accepts_usual_spellings() {
        for raw in ["true", "True", "1", "on", "YES", " y "] {
            assert!(parse_flag(raw).unwrap(), "{raw}");
        }
        for raw in ["false", "0", "off", "no", "N"] {
            assert!(!parse_flag(raw).unwrap(), "{raw}");
        }
    }

    #[test]
    fn parse_flag_rejects_garbage() {
        assert!(parse_flag("maybe").is_err());
        assert!(parse_flag("").is_err());
    }
}
