use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub position: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, FromRow)]
pub struct Contact {
    pub id: Uuid,
    pub user_id: Uuid,
    pub city: String,
    pub street: String,
    pub house: String,
    pub structure: String,
    pub building: String,
    pub apartment: String,
    pub phone: String,
    pub phone_2: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, FromRow)]
pub struct Shop {
    pub id: Uuid,
    pub name: String,
    pub url: Option<String>,
    pub user_id: Option<Uuid>,
    pub accepting_orders: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, FromRow)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, FromRow)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub category_id: Uuid,
}

/// A shop's priced offering of one product.
#[derive(Debug, Serialize, Deserialize, ToSchema, FromRow)]
pub struct Listing {
    pub id: Uuid,
    pub model: String,
    pub quantity: i32,
    pub price: i64,
    pub suggested_retail_price: i64,
    pub product_id: Uuid,
    pub shop_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, FromRow)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub contact_id: Option<Uuid>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, FromRow)]
pub struct OrderLine {
    pub id: Uuid,
    pub order_id: Uuid,
    pub listing_id: Uuid,
    pub quantity: i32,
    pub price: i64,
    pub total_cost: i64,
}

/// Order status values, stored as plain text.
pub mod order_status {
    pub const BASKET: &str = "basket";
    pub const NEW: &str = "new";
    pub const CONFIRMED: &str = "confirmed";
    pub const ASSEMBLED: &str = "assembled";
    pub const SENT: &str = "sent";
    pub const DELIVERED: &str = "delivered";
    pub const CANCELED: &str = "canceled";

    pub const ALL: &[&str] = &[BASKET, NEW, CONFIRMED, ASSEMBLED, SENT, DELIVERED, CANCELED];

    pub fn is_valid(status: &str) -> bool {
        ALL.contains(&status)
    }

    pub fn is_terminal(status: &str) -> bool {
        status == DELIVERED || status == CANCELED
    }
}

#[cfg(test)]
mod tests {
    use super::order_status;

    #[test]
    fn status_domain() {
        assert!(order_status::is_valid("basket"));
        assert!(order_status::is_valid("sent"));
        assert!(!order_status::is_valid("paid"));
        assert!(order_status::is_terminal("canceled"));
        assert!(!order_status::is_terminal("new"));
    }
}
