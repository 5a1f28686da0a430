use std::collections::BTreeMap;

use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use password_hash::rand_core::OsRng;
use uuid::Uuid;

use axum_shop_api::{
    db::{create_orm_conn, create_pool},
    dto::partner::{PriceList, PriceListCategory, PriceListGood},
    middleware::auth::AuthUser,
    services::partner_service,
    state::AppState,
};

/// Seed a demo shop with a small price list plus one confirmed buyer.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL")?;
    let pool = create_pool(&database_url).await?;
    let orm = create_orm_conn(&database_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    let state = AppState { pool, orm };

    let shop_user_id = upsert_user(&state, "partner@example.com", "shop", "password123").await?;
    let buyer_id = upsert_user(&state, "buyer@example.com", "buyer", "password123").await?;

    let shop_user = AuthUser {
        user_id: shop_user_id,
        role: "shop".into(),
    };

    let mut parameters = BTreeMap::new();
    parameters.insert("color".to_string(), "black".to_string());
    parameters.insert("capacity_gb".to_string(), "128".to_string());

    let price_list = PriceList {
        shop: Some("Demo Electronics".into()),
        categories: vec![PriceListCategory {
            name: "Phones".into(),
        }],
        goods: vec![
            PriceListGood {
                name: "Phone SE".into(),
                category: "Phones".into(),
                model: "A2783".into(),
                quantity: 10,
                price: 40_000,
                price_rrc: 45_000,
                parameters,
            },
            PriceListGood {
                name: "Phone Mini".into(),
                category: "Phones".into(),
                model: "A2628".into(),
                quantity: 5,
                price: 60_000,
                price_rrc: 65_000,
                parameters: BTreeMap::new(),
            },
        ],
    };

    let report = partner_service::import_price_list(&state.pool, &shop_user, price_list).await?;
    let report = report.data.expect("import report");
    println!(
        "seeded shop user {shop_user_id}, buyer {buyer_id}, listings imported: {}",
        report.imported
    );
    for err in report.errors {
        eprintln!("entry {} ({}) failed: {}", err.index, err.name, err.error);
    }
    Ok(())
}

async fn upsert_user(
    state: &AppState,
    email: &str,
    role: &str,
    password: &str,
) -> anyhow::Result<Uuid> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    let row: (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, password_hash, first_name, last_name, role, is_active)
        VALUES ($1, $2, $3, 'Demo', 'User', $4, TRUE)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role, is_active = TRUE
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(hash)
    .bind(role)
    .fetch_one(&state.pool)
    .await?;
    Ok(row.0)
}
