use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Contact;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    pub contact_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderLineDetail {
    pub id: Uuid,
    pub listing_id: Uuid,
    pub shop_id: Uuid,
    pub product_name: String,
    pub model: String,
    pub quantity: i32,
    pub price: i64,
    pub total_cost: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderSummary {
    pub id: Uuid,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub contact: Option<Contact>,
    pub total_quantity: i64,
    pub total_sum: i64,
    pub lines: Vec<OrderLineDetail>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct OrderList {
    #[schema(value_type = Vec<OrderSummary>)]
    pub items: Vec<OrderSummary>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutResponse {
    pub order_id: Uuid,
    pub status: String,
}
