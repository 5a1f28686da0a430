use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect, Set,
    TransactionTrait,
};
use sqlx::FromRow;
use uuid::Uuid;

use crate::{
    db::DbPool,
    dto::orders::{CheckoutRequest, CheckoutResponse, OrderLineDetail, OrderList, OrderSummary},
    entity::{
        contacts::{Column as ContactCol, Entity as Contacts},
        order_lines::{Column as LineCol, Entity as OrderLines},
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_shop},
    models::{Contact, order_status},
    notify,
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Turn the caller's basket into a placed order. Requires a non-empty basket
/// and a contact owned by the caller; the confirmation email is best-effort
/// and sent only after the transaction commits.
pub async fn checkout(
    state: &AppState,
    user: &AuthUser,
    payload: CheckoutRequest,
) -> AppResult<ApiResponse<CheckoutResponse>> {
    let txn = state.orm.begin().await?;

    let basket = Orders::find()
        .filter(OrderCol::UserId.eq(user.user_id))
        .filter(OrderCol::Status.eq(order_status::BASKET))
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let basket = match basket {
        Some(order) => order,
        None => return Err(AppError::Validation("no open basket".into())),
    };

    let line_count = OrderLines::find()
        .filter(LineCol::OrderId.eq(basket.id))
        .count(&txn)
        .await?;
    if line_count == 0 {
        return Err(AppError::Validation("basket is empty".into()));
    }

    let contact = Contacts::find_by_id(payload.contact_id)
        .filter(ContactCol::UserId.eq(user.user_id))
        .one(&txn)
        .await?;
    if contact.is_none() {
        return Err(AppError::Validation("invalid contact".into()));
    }

    let mut active: OrderActive = basket.into();
    active.status = Set(order_status::NEW.to_string());
    active.contact_id = Set(Some(payload.contact_id));
    let order = active.update(&txn).await?;

    txn.commit().await?;

    notify_order_placed(&state.pool, user.user_id).await;

    Ok(ApiResponse::success(
        "Order placed",
        CheckoutResponse {
            order_id: order.id,
            status: order.status,
        },
        Some(Meta::empty()),
    ))
}

async fn notify_order_placed(pool: &DbPool, user_id: Uuid) {
    let email: Result<Option<(String,)>, _> =
        sqlx::query_as("SELECT email FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await;
    let recipient = match email {
        Ok(Some((email,))) => email,
        _ => {
            tracing::warn!(user_id = %user_id, "could not resolve recipient for order email");
            return;
        }
    };
    if let Err(err) = notify::send_email(
        pool,
        Some(user_id),
        &recipient,
        "Order status update",
        "Your order has been placed",
    )
    .await
    {
        tracing::warn!(error = %err, "order email failed");
    }
}

#[derive(FromRow)]
struct OrderAggRow {
    id: Uuid,
    contact_id: Option<Uuid>,
    status: String,
    created_at: DateTime<Utc>,
    total_quantity: i64,
    total_sum: i64,
}

#[derive(FromRow)]
struct LineRow {
    id: Uuid,
    order_id: Uuid,
    listing_id: Uuid,
    shop_id: Uuid,
    product_name: String,
    model: String,
    quantity: i32,
    price: i64,
    total_cost: i64,
}

/// Placed orders of a buyer, newest first, with per-order totals, the
/// shipping contact and all lines. Baskets are excluded.
pub async fn list_orders_for_buyer(
    pool: &DbPool,
    user: &AuthUser,
) -> AppResult<ApiResponse<OrderList>> {
    let orders = sqlx::query_as::<_, OrderAggRow>(
        r#"
        SELECT o.id, o.contact_id, o.status, o.created_at,
               COALESCE(SUM(ol.quantity), 0)::BIGINT AS total_quantity,
               COALESCE(SUM(ol.total_cost), 0)::BIGINT AS total_sum
        FROM orders o
        LEFT JOIN order_lines ol ON ol.order_id = o.id
        WHERE o.user_id = $1 AND o.status <> 'basket'
        GROUP BY o.id
        ORDER BY o.created_at DESC
        "#,
    )
    .bind(user.user_id)
    .fetch_all(pool)
    .await?;

    let order_ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
    let lines = sqlx::query_as::<_, LineRow>(
        r#"
        SELECT ol.id, ol.order_id, ol.listing_id, li.shop_id,
               p.name AS product_name, li.model, ol.quantity, ol.price, ol.total_cost
        FROM order_lines ol
        JOIN listings li ON li.id = ol.listing_id
        JOIN products p ON p.id = li.product_id
        WHERE ol.order_id = ANY($1)
        "#,
    )
    .bind(&order_ids)
    .fetch_all(pool)
    .await?;

    let items = assemble_summaries(pool, orders, lines).await?;
    Ok(ApiResponse::success("OK", OrderList { items }, Some(Meta::empty())))
}

/// Placed orders containing at least one of the calling shop's listings.
/// Lines and totals cover only that shop's share; a multi-shop order is
/// never fully exposed to a single shop.
pub async fn list_orders_for_shop(
    pool: &DbPool,
    user: &AuthUser,
) -> AppResult<ApiResponse<OrderList>> {
    ensure_shop(user)?;

    let orders = sqlx::query_as::<_, OrderAggRow>(
        r#"
        SELECT o.id, o.contact_id, o.status, o.created_at,
               COALESCE(SUM(ol.quantity), 0)::BIGINT AS total_quantity,
               COALESCE(SUM(ol.total_cost), 0)::BIGINT AS total_sum
        FROM orders o
        JOIN order_lines ol ON ol.order_id = o.id
        JOIN listings li ON li.id = ol.listing_id
        JOIN shops s ON s.id = li.shop_id
        WHERE s.user_id = $1 AND o.status <> 'basket'
        GROUP BY o.id
        ORDER BY o.created_at DESC
        "#,
    )
    .bind(user.user_id)
    .fetch_all(pool)
    .await?;

    let order_ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
    let lines = sqlx::query_as::<_, LineRow>(
        r#"
        SELECT ol.id, ol.order_id, ol.listing_id, li.shop_id,
               p.name AS product_name, li.model, ol.quantity, ol.price, ol.total_cost
        FROM order_lines ol
        JOIN listings li ON li.id = ol.listing_id
        JOIN shops s ON s.id = li.shop_id
        JOIN products p ON p.id = li.product_id
        WHERE ol.order_id = ANY($1) AND s.user_id = $2
        "#,
    )
    .bind(&order_ids)
    .bind(user.user_id)
    .fetch_all(pool)
    .await?;

    let items = assemble_summaries(pool, orders, lines).await?;
    Ok(ApiResponse::success("OK", OrderList { items }, Some(Meta::empty())))
}

async fn assemble_summaries(
    pool: &DbPool,
    orders: Vec<OrderAggRow>,
    lines: Vec<LineRow>,
) -> AppResult<Vec<OrderSummary>> {
    let contact_ids: Vec<Uuid> = orders.iter().filter_map(|o| o.contact_id).collect();
    let mut contacts: HashMap<Uuid, Contact> = HashMap::new();
    if !contact_ids.is_empty() {
        let rows: Vec<Contact> = sqlx::query_as("SELECT * FROM contacts WHERE id = ANY($1)")
            .bind(&contact_ids)
            .fetch_all(pool)
            .await?;
        contacts = rows.into_iter().map(|c| (c.id, c)).collect();
    }

    let mut lines_by_order: HashMap<Uuid, Vec<OrderLineDetail>> = HashMap::new();
    for row in lines {
        lines_by_order.entry(row.order_id).or_default().push(OrderLineDetail {
            id: row.id,
            listing_id: row.listing_id,
            shop_id: row.shop_id,
            product_name: row.product_name,
            model: row.model,
            quantity: row.quantity,
            price: row.price,
            total_cost: row.total_cost,
        });
    }

    let summaries = orders
        .into_iter()
        .map(|order| OrderSummary {
            id: order.id,
            status: order.status,
            created_at: order.created_at,
            contact: order.contact_id.and_then(|id| contacts.get(&id).cloned()),
            total_quantity: order.total_quantity,
            total_sum: order.total_sum,
            lines: lines_by_order.remove(&order.id).unwrap_or_default(),
        })
        .collect();
    Ok(summaries)
}
