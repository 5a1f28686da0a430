use std::collections::HashMap;

use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use crate::{
    dto::basket::{
        AddItemsRequest, BasketLine, BasketView, BasketWriteReport, EntryError,
        QuantityUpdateReport, RemoveItemsRequest, RemoveReport, UpdateQuantitiesRequest,
    },
    entity::{
        listings::{Column as ListingCol, Entity as Listings},
        order_lines::{
            ActiveModel as OrderLineActive, Column as LineCol, Entity as OrderLines,
        },
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
        products::{Column as ProductCol, Entity as Products},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::order_status,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub fn line_total(price: i64, quantity: i32) -> i64 {
    price * quantity as i64
}

/// Find the caller's open basket, creating it lazily. The partial unique
/// index on (user_id) WHERE status = 'basket' resolves concurrent creation:
/// the loser's insert conflicts and we re-read the winner's row.
pub async fn get_or_create_basket<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
) -> AppResult<OrderModel> {
    if let Some(order) = find_basket(conn, user_id).await? {
        return Ok(order);
    }

    let insert = OrderActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        contact_id: Set(None),
        status: Set(order_status::BASKET.to_string()),
        created_at: NotSet,
    }
    .insert(conn)
    .await;

    match insert {
        Ok(order) => Ok(order),
        Err(err) => match AppError::from(err) {
            AppError::Conflict(_) => find_basket(conn, user_id)
                .await?
                .ok_or(AppError::NotFound),
            other => Err(other),
        },
    }
}

pub async fn find_basket<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
) -> AppResult<Option<OrderModel>> {
    let order = Orders::find()
        .filter(OrderCol::UserId.eq(user_id))
        .filter(OrderCol::Status.eq(order_status::BASKET))
        .one(conn)
        .await?;
    Ok(order)
}

pub async fn get_basket(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<Option<BasketView>>> {
    let basket = match find_basket(&state.orm, user.user_id).await? {
        Some(order) => order,
        None => return Ok(ApiResponse::success("Basket is empty", None, Some(Meta::empty()))),
    };

    let lines = OrderLines::find()
        .filter(LineCol::OrderId.eq(basket.id))
        .all(&state.orm)
        .await?;

    let listing_ids: Vec<Uuid> = lines.iter().map(|l| l.listing_id).collect();
    let listings = Listings::find()
        .filter(ListingCol::Id.is_in(listing_ids))
        .all(&state.orm)
        .await?;
    let product_ids: Vec<Uuid> = listings.iter().map(|l| l.product_id).collect();
    let products = Products::find()
        .filter(ProductCol::Id.is_in(product_ids))
        .all(&state.orm)
        .await?;

    let product_names: HashMap<Uuid, String> =
        products.into_iter().map(|p| (p.id, p.name)).collect();
    let listing_map: HashMap<Uuid, _> = listings.into_iter().map(|l| (l.id, l)).collect();

    let mut total_sum = 0;
    let mut view_lines = Vec::with_capacity(lines.len());
    for line in lines {
        total_sum += line.total_cost;
        let listing = listing_map.get(&line.listing_id);
        view_lines.push(BasketLine {
            id: line.id,
            listing_id: line.listing_id,
            shop_id: listing.map(|l| l.shop_id).unwrap_or_default(),
            product_name: listing
                .and_then(|l| product_names.get(&l.product_id).cloned())
                .unwrap_or_default(),
            model: listing.map(|l| l.model.clone()).unwrap_or_default(),
            quantity: line.quantity,
            price: line.price,
            total_cost: line.total_cost,
        });
    }

    let view = BasketView {
        order_id: basket.id,
        lines: view_lines,
        total_sum,
    };
    Ok(ApiResponse::success("OK", Some(view), Some(Meta::empty())))
}

/// Add or replace basket positions. The unit price is captured from the
/// listing at write time; an invalid entry is reported and skipped without
/// aborting its siblings.
pub async fn add_items(
    state: &AppState,
    user: &AuthUser,
    payload: AddItemsRequest,
) -> AppResult<ApiResponse<BasketWriteReport>> {
    if payload.items.is_empty() {
        return Err(AppError::Validation("items must not be empty".into()));
    }

    let basket = get_or_create_basket(&state.orm, user.user_id).await?;

    let mut applied = 0;
    let mut errors = Vec::new();
    for (index, entry) in payload.items.iter().enumerate() {
        if entry.quantity < 1 {
            errors.push(EntryError {
                index,
                error: "quantity must be at least 1".into(),
            });
            continue;
        }

        let listing = Listings::find_by_id(entry.listing_id).one(&state.orm).await?;
        let listing = match listing {
            Some(l) => l,
            None => {
                errors.push(EntryError {
                    index,
                    error: format!("unknown listing {}", entry.listing_id),
                });
                continue;
            }
        };

        let line = OrderLineActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(basket.id),
            listing_id: Set(listing.id),
            quantity: Set(entry.quantity),
            price: Set(listing.price),
            total_cost: Set(line_total(listing.price, entry.quantity)),
        };

        // (order, listing) uniqueness turns a duplicate add into a replace.
        OrderLines::insert(line)
            .on_conflict(
                OnConflict::columns([LineCol::OrderId, LineCol::ListingId])
                    .update_columns([LineCol::Quantity, LineCol::Price, LineCol::TotalCost])
                    .to_owned(),
            )
            .exec(&state.orm)
            .await?;
        applied += 1;
    }

    Ok(ApiResponse::success(
        "Basket updated",
        BasketWriteReport { applied, errors },
        Some(Meta::empty()),
    ))
}

/// Change quantities of lines in the caller's basket. Ids that do not parse
/// or do not belong to the basket are skipped; the report carries only the
/// number of lines actually updated.
pub async fn update_quantities(
    state: &AppState,
    user: &AuthUser,
    payload: UpdateQuantitiesRequest,
) -> AppResult<ApiResponse<QuantityUpdateReport>> {
    if payload.items.is_empty() {
        return Err(AppError::Validation("items must not be empty".into()));
    }

    let basket = match find_basket(&state.orm, user.user_id).await? {
        Some(order) => order,
        None => {
            return Ok(ApiResponse::success(
                "Basket is empty",
                QuantityUpdateReport { updated: 0 },
                Some(Meta::empty()),
            ));
        }
    };

    let mut updated = 0;
    for entry in &payload.items {
        let line_id = match Uuid::parse_str(entry.id.trim()) {
            Ok(id) => id,
            Err(_) => continue,
        };
        if entry.quantity < 1 {
            continue;
        }

        let result = OrderLines::update_many()
            .col_expr(LineCol::Quantity, Expr::value(entry.quantity))
            .col_expr(
                LineCol::TotalCost,
                Expr::col(LineCol::Price).mul(entry.quantity as i64),
            )
            .filter(LineCol::OrderId.eq(basket.id))
            .filter(LineCol::Id.eq(line_id))
            .exec(&state.orm)
            .await?;
        updated += result.rows_affected;
    }

    Ok(ApiResponse::success(
        "Quantities updated",
        QuantityUpdateReport { updated },
        Some(Meta::empty()),
    ))
}

/// Delete basket lines by comma-separated id list.
pub async fn remove_items(
    state: &AppState,
    user: &AuthUser,
    payload: RemoveItemsRequest,
) -> AppResult<ApiResponse<RemoveReport>> {
    let ids: Vec<Uuid> = payload
        .items
        .split(',')
        .filter_map(|raw| Uuid::parse_str(raw.trim()).ok())
        .collect();

    if ids.is_empty() {
        return Err(AppError::Validation("no valid order line ids given".into()));
    }

    let basket = match find_basket(&state.orm, user.user_id).await? {
        Some(order) => order,
        None => {
            return Ok(ApiResponse::success(
                "Basket is empty",
                RemoveReport { removed: 0 },
                Some(Meta::empty()),
            ));
        }
    };

    let result = OrderLines::delete_many()
        .filter(LineCol::OrderId.eq(basket.id))
        .filter(LineCol::Id.is_in(ids))
        .exec(&state.orm)
        .await?;

    Ok(ApiResponse::success(
        "Lines removed",
        RemoveReport {
            removed: result.rows_affected,
        },
        Some(Meta::empty()),
    ))
}

#[cfg(test)]
mod tests {
    use super::line_total;

    #[test]
    fn line_total_is_price_times_quantity() {
        assert_eq!(line_total(100, 3), 300);
        assert_eq!(line_total(100, 5), 500);
        assert_eq!(line_total(0, 7), 0);
    }
}
