use std::collections::HashMap;

use sqlx::FromRow;
use uuid::Uuid;

use crate::{
    db::DbPool,
    dto::catalog::{
        CategoryList, CategoryRef, ListingDetail, ListingList, ParameterValue, ProductRef,
        ShopList, ShopRef,
    },
    error::AppResult,
    models::{Category, Shop},
    response::{ApiResponse, Meta},
    routes::params::ListingQuery,
};

#[derive(FromRow)]
struct ListingRow {
    id: Uuid,
    model: String,
    quantity: i32,
    price: i64,
    suggested_retail_price: i64,
    shop_id: Uuid,
    shop_name: String,
    product_id: Uuid,
    product_name: String,
    category_id: Uuid,
    category_name: String,
}

#[derive(FromRow)]
struct ParameterRow {
    listing_id: Uuid,
    name: String,
    value: String,
}

/// Catalog search. Only listings of shops currently accepting orders are
/// visible; shop and category filters are AND-composed.
pub async fn search_listings(
    pool: &DbPool,
    query: ListingQuery,
) -> AppResult<ApiResponse<ListingList>> {
    let (page, limit, offset) = query.pagination.normalize();

    let rows = sqlx::query_as::<_, ListingRow>(
        r#"
        SELECT li.id, li.model, li.quantity, li.price, li.suggested_retail_price,
               s.id AS shop_id, s.name AS shop_name,
               p.id AS product_id, p.name AS product_name,
               c.id AS category_id, c.name AS category_name
        FROM listings li
        JOIN shops s ON s.id = li.shop_id
        JOIN products p ON p.id = li.product_id
        JOIN categories c ON c.id = p.category_id
        WHERE s.accepting_orders = TRUE
          AND ($1::uuid IS NULL OR li.shop_id = $1)
          AND ($2::uuid IS NULL OR p.category_id = $2)
        ORDER BY p.name, s.name
        LIMIT $3 OFFSET $4
        "#,
    )
    .bind(query.shop_id)
    .bind(query.category_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let total: (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*)
        FROM listings li
        JOIN shops s ON s.id = li.shop_id
        JOIN products p ON p.id = li.product_id
        WHERE s.accepting_orders = TRUE
          AND ($1::uuid IS NULL OR li.shop_id = $1)
          AND ($2::uuid IS NULL OR p.category_id = $2)
        "#,
    )
    .bind(query.shop_id)
    .bind(query.category_id)
    .fetch_one(pool)
    .await?;

    let listing_ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
    let mut parameters: HashMap<Uuid, Vec<ParameterValue>> = HashMap::new();
    if !listing_ids.is_empty() {
        let param_rows = sqlx::query_as::<_, ParameterRow>(
            r#"
            SELECT lp.listing_id, pa.name, lp.value
            FROM listing_parameters lp
            JOIN parameters pa ON pa.id = lp.parameter_id
            WHERE lp.listing_id = ANY($1)
            ORDER BY pa.name
            "#,
        )
        .bind(&listing_ids)
        .fetch_all(pool)
        .await?;

        for row in param_rows {
            parameters.entry(row.listing_id).or_default().push(ParameterValue {
                name: row.name,
                value: row.value,
            });
        }
    }

    let items = rows
        .into_iter()
        .map(|row| ListingDetail {
            id: row.id,
            model: row.model,
            quantity: row.quantity,
            price: row.price,
            suggested_retail_price: row.suggested_retail_price,
            shop: ShopRef {
                id: row.shop_id,
                name: row.shop_name,
            },
            product: ProductRef {
                id: row.product_id,
                name: row.product_name,
                category: CategoryRef {
                    id: row.category_id,
                    name: row.category_name,
                },
            },
            parameters: parameters.remove(&row.id).unwrap_or_default(),
        })
        .collect();

    let meta = Meta::new(page, limit, total.0);
    Ok(ApiResponse::success("OK", ListingList { items }, Some(meta)))
}

pub async fn list_shops(pool: &DbPool) -> AppResult<ApiResponse<ShopList>> {
    let items: Vec<Shop> = sqlx::query_as("SELECT * FROM shops ORDER BY name")
        .fetch_all(pool)
        .await?;
    Ok(ApiResponse::success("OK", ShopList { items }, Some(Meta::empty())))
}

pub async fn list_categories(pool: &DbPool) -> AppResult<ApiResponse<CategoryList>> {
    let items: Vec<Category> = sqlx::query_as("SELECT * FROM categories ORDER BY name")
        .fetch_all(pool)
        .await?;
    Ok(ApiResponse::success("OK", CategoryList { items }, Some(Meta::empty())))
}
