use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct Pagination {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl Pagination {
    pub fn normalize(&self) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1) * per_page;
        (page, per_page, offset)
    }
}

/// Catalog search filters. Both are optional and AND-composed.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ListingQuery {
    #[serde(flatten)]
    pub pagination: Pagination,
    pub shop_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::Pagination;

    #[test]
    fn pagination_normalizes_out_of_range_input() {
        let p = Pagination {
            page: Some(0),
            per_page: Some(1000),
        };
        assert_eq!(p.normalize(), (1, 100, 0));

        let p = Pagination {
            page: None,
            per_page: None,
        };
        assert_eq!(p.normalize(), (1, 20, 0));
    }
}
