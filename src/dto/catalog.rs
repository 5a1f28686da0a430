use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Category, Shop};

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryRef {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductRef {
    pub id: Uuid,
    pub name: String,
    pub category: CategoryRef,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ShopRef {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ParameterValue {
    pub name: String,
    pub value: String,
}

/// One search hit: a listing enriched with its product, the product's
/// category and the attached parameters.
#[derive(Debug, Serialize, ToSchema)]
pub struct ListingDetail {
    pub id: Uuid,
    pub model: String,
    pub quantity: i32,
    pub price: i64,
    pub suggested_retail_price: i64,
    pub shop: ShopRef,
    pub product: ProductRef,
    pub parameters: Vec<ParameterValue>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct ListingList {
    #[schema(value_type = Vec<ListingDetail>)]
    pub items: Vec<ListingDetail>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct ShopList {
    #[schema(value_type = Vec<Shop>)]
    pub items: Vec<Shop>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct CategoryList {
    #[schema(value_type = Vec<Category>)]
    pub items: Vec<Category>,
}
