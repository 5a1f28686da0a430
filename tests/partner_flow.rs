use std::collections::BTreeMap;

use axum_shop_api::{
    db::{create_orm_conn, create_pool},
    dto::{
        basket::{AddItemsRequest, BasketItemEntry},
        contacts::CreateContactRequest,
        orders::CheckoutRequest,
        partner::{PriceList, PriceListCategory, PriceListGood, StateRequest},
    },
    error::AppError,
    middleware::auth::AuthUser,
    routes::params::{ListingQuery, Pagination},
    services::{basket_service, catalog_service, contact_service, order_service, partner_service},
    state::AppState,
};
use uuid::Uuid;

// Partner flow: price import (idempotent), accepting toggle, per-shop order view.
#[tokio::test]
async fn import_state_and_partner_orders() -> anyhow::Result<()> {
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!("Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run flow tests.");
            return Ok(());
        }
    };

    let state = setup_state(&database_url).await?;

    let shop_a = shop_user(&state, "a@shops.example").await?;
    let shop_b = shop_user(&state, "b@shops.example").await?;

    // First import creates shop, product, listing and parameters.
    let report = partner_service::import_price_list(&state.pool, &shop_a, price_list("Alpha", 50))
        .await?
        .data
        .unwrap();
    assert_eq!(report.imported, 2);
    assert_eq!(report.errors.len(), 1, "negative-price entry rejected");

    // Re-importing the identical payload is idempotent.
    let report = partner_service::import_price_list(&state.pool, &shop_a, price_list("Alpha", 50))
        .await?
        .data
        .unwrap();
    assert_eq!(report.imported, 2);

    let listings: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM listings")
        .fetch_one(&state.pool)
        .await?;
    assert_eq!(listings.0, 2);
    let params: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM listing_parameters")
        .fetch_one(&state.pool)
        .await?;
    assert_eq!(params.0, 1, "parameter links replaced, not duplicated");

    partner_service::import_price_list(&state.pool, &shop_b, price_list("Beta", 80)).await?;

    // Search sees both accepting shops, AND-composes filters.
    let all = search(&state, None).await?;
    assert_eq!(all.len(), 4);

    let shop_a_row: (Uuid,) = sqlx::query_as("SELECT id FROM shops WHERE user_id = $1")
        .bind(shop_a.user_id)
        .fetch_one(&state.pool)
        .await?;
    let only_a = search(&state, Some(shop_a_row.0)).await?;
    assert_eq!(only_a.len(), 2);
    assert!(only_a.iter().all(|l| l.shop.id == shop_a_row.0));
    assert!(only_a.iter().any(|l| !l.parameters.is_empty()));

    // A shop that stops accepting orders disappears from search.
    partner_service::set_state(
        &state.pool,
        &shop_a,
        StateRequest {
            state: "off".into(),
        },
    )
    .await?;
    let visible = search(&state, None).await?;
    assert_eq!(visible.len(), 2);
    assert!(visible.iter().all(|l| l.shop.id != shop_a_row.0));

    let err = partner_service::set_state(
        &state.pool,
        &shop_a,
        StateRequest {
            state: "definitely".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    // Buyers cannot touch partner endpoints.
    let buyer = AuthUser {
        user_id: Uuid::new_v4(),
        role: "buyer".into(),
    };
    let err = partner_service::get_state(&state.pool, &buyer).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden));

    partner_service::set_state(&state.pool, &shop_a, StateRequest { state: "on".into() }).await?;

    // One order spanning both shops: each partner sees only its own lines.
    let buyer_id = create_buyer(&state, "multi@example.com").await?;
    let buyer = AuthUser {
        user_id: buyer_id,
        role: "buyer".into(),
    };
    let all = search(&state, None).await?;
    assert_eq!(all.len(), 4);
    let a_listing = all.iter().find(|l| l.shop.id == shop_a_row.0).unwrap();
    let b_listing = all.iter().find(|l| l.shop.id != shop_a_row.0).unwrap();

    basket_service::add_items(
        &state,
        &buyer,
        AddItemsRequest {
            items: vec![
                BasketItemEntry {
                    listing_id: a_listing.id,
                    quantity: 1,
                },
                BasketItemEntry {
                    listing_id: b_listing.id,
                    quantity: 2,
                },
            ],
        },
    )
    .await?;

    let contact = contact_service::create_contact(
        &state.pool,
        &buyer,
        CreateContactRequest {
            city: "Kazan".into(),
            street: String::new(),
            house: String::new(),
            structure: String::new(),
            building: String::new(),
            apartment: String::new(),
            phone: "+71111111111".into(),
            phone_2: String::new(),
        },
    )
    .await?
    .data
    .unwrap();
    order_service::checkout(
        &state,
        &buyer,
        CheckoutRequest {
            contact_id: contact.id,
        },
    )
    .await?;

    let a_orders = order_service::list_orders_for_shop(&state.pool, &shop_a)
        .await?
        .data
        .unwrap();
    assert_eq!(a_orders.items.len(), 1);
    let order = &a_orders.items[0];
    assert_eq!(order.lines.len(), 1, "only shop A's share is visible");
    assert!(order.lines.iter().all(|l| l.shop_id == shop_a_row.0));
    assert_eq!(order.total_quantity, 1);
    assert_eq!(order.total_sum, a_listing.price);

    let b_orders = order_service::list_orders_for_shop(&state.pool, &shop_b)
        .await?
        .data
        .unwrap();
    assert_eq!(b_orders.items.len(), 1);
    assert!(b_orders.items[0].lines.iter().all(|l| l.shop_id != shop_a_row.0));

    Ok(())
}

async fn search(
    state: &AppState,
    shop_id: Option<Uuid>,
) -> anyhow::Result<Vec<axum_shop_api::dto::catalog::ListingDetail>> {
    let resp = catalog_service::search_listings(
        &state.pool,
        ListingQuery {
            pagination: Pagination {
                page: None,
                per_page: None,
            },
            shop_id,
            category_id: None,
        },
    )
    .await?;
    Ok(resp.data.unwrap().items)
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url).await?;
    let orm = create_orm_conn(database_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    sqlx::query(
        "TRUNCATE TABLE order_lines, orders, listing_parameters, parameters, listings, products, \
         shop_categories, categories, shops, contacts, confirm_email_tokens, email_outbox, users CASCADE",
    )
    .execute(&pool)
    .await?;

    Ok(AppState { pool, orm })
}

async fn shop_user(state: &AppState, email: &str) -> anyhow::Result<AuthUser> {
    let row: (Uuid,) = sqlx::query_as(
        "INSERT INTO users (id, email, password_hash, role, is_active) \
         VALUES ($1, $2, 'x', 'shop', TRUE) RETURNING id",
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .fetch_one(&state.pool)
    .await?;
    Ok(AuthUser {
        user_id: row.0,
        role: "shop".into(),
    })
}

async fn create_buyer(state: &AppState, email: &str) -> anyhow::Result<Uuid> {
    let row: (Uuid,) = sqlx::query_as(
        "INSERT INTO users (id, email, password_hash, role, is_active) \
         VALUES ($1, $2, 'x', 'buyer', TRUE) RETURNING id",
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .fetch_one(&state.pool)
    .await?;
    Ok(row.0)
}

fn price_list(prefix: &str, base_price: i64) -> PriceList {
    let mut parameters = BTreeMap::new();
    parameters.insert("color".to_string(), "black".to_string());

    PriceList {
        shop: Some(format!("{prefix} Shop")),
        categories: vec![PriceListCategory {
            name: "Phones".into(),
        }],
        goods: vec![
            PriceListGood {
                name: format!("{prefix} Phone"),
                category: "Phones".into(),
                model: format!("{prefix}-1"),
                quantity: 10,
                price: base_price,
                price_rrc: base_price + 10,
                parameters,
            },
            PriceListGood {
                name: format!("{prefix} Tablet"),
                category: "Phones".into(),
                model: format!("{prefix}-2"),
                quantity: 4,
                price: base_price * 2,
                price_rrc: base_price * 2 + 10,
                parameters: BTreeMap::new(),
            },
            PriceListGood {
                name: format!("{prefix} Broken"),
                category: "Phones".into(),
                model: format!("{prefix}-3"),
                quantity: 1,
                price: -5,
                price_rrc: 0,
                parameters: BTreeMap::new(),
            },
        ],
    }
}
