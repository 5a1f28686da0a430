use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct BasketItemEntry {
    pub listing_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddItemsRequest {
    pub items: Vec<BasketItemEntry>,
}

/// One quantity change. The line id stays a string so that garbage ids can
/// be skipped instead of failing the whole batch.
#[derive(Debug, Deserialize, ToSchema)]
pub struct QuantityUpdate {
    pub id: String,
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateQuantitiesRequest {
    pub items: Vec<QuantityUpdate>,
}

/// Comma-separated order-line ids.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RemoveItemsRequest {
    pub items: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EntryError {
    pub index: usize,
    pub error: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BasketWriteReport {
    pub applied: usize,
    pub errors: Vec<EntryError>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct QuantityUpdateReport {
    pub updated: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RemoveReport {
    pub removed: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BasketLine {
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
pub struct BasketView {
    pub order_id: Uuid,
    pub lines: Vec<BasketLine>,
    pub total_sum: i64,
}
