use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Partner price-list document. `shop` names the caller's shop (required on
/// first import), `goods` enumerates the offered products.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PriceList {
    pub shop: Option<String>,
    #[serde(default)]
    pub categories: Vec<PriceListCategory>,
    #[serde(default)]
    pub goods: Vec<PriceListGood>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PriceListCategory {
    pub name: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PriceListGood {
    pub name: String,
    pub category: String,
    pub model: String,
    pub quantity: i32,
    pub price: i64,
    pub price_rrc: i64,
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ImportEntryError {
    pub index: usize,
    pub name: String,
    pub error: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ImportReport {
    pub imported: usize,
    pub errors: Vec<ImportEntryError>,
}

/// Accepting-orders toggle. The flag is parsed leniently, matching the
/// historical form-encoded clients ("1"/"0", "on"/"off", "yes"/"no").
#[derive(Debug, Deserialize, ToSchema)]
pub struct StateRequest {
    pub state: String,
}

#[cfg(test)]
mod tests {
    use super::PriceList;

    #[test]
    fn price_list_parses_minimal_document() {
        let doc = serde_json::json!({
            "shop": "Svyaznoy",
            "categories": [{ "name": "Phones" }],
            "goods": [{
                "name": "iPhone SE",
                "category": "Phones",
                "model": "A2783",
                "quantity": 3,
                "price": 40000,
                "price_rrc": 45000,
                "parameters": { "color": "black" }
            }]
        });
        let parsed: PriceList = serde_json::from_value(doc).unwrap();
        assert_eq!(parsed.goods.len(), 1);
        assert_eq!(parsed.goods[0].parameters["color"], "black");
    }

    #[test]
    fn goods_default_to_empty() {
        let parsed: PriceList = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(parsed.shop.is_none());
        assert!(parsed.goods.is_empty());
    }
}
