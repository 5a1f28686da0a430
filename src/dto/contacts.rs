use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Contact;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateContactRequest {
    pub city: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub house: String,
    #[serde(default)]
    pub structure: String,
    #[serde(default)]
    pub building: String,
    #[serde(default)]
    pub apartment: String,
    pub phone: String,
    #[serde(default)]
    pub phone_2: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateContactRequest {
    pub id: Uuid,
    pub city: Option<String>,
    pub street: Option<String>,
    pub house: Option<String>,
    pub structure: Option<String>,
    pub building: Option<String>,
    pub apartment: Option<String>,
    pub phone: Option<String>,
    pub phone_2: Option<String>,
}

/// Comma-separated contact ids, e.g. `"id1,id2"`. Ids that do not parse
/// are ignored.
#[derive(Debug, Deserialize, ToSchema)]
pub struct DeleteContactsRequest {
    pub items: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteReport {
    pub removed: u64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct ContactList {
    #[schema(value_type = Vec<Contact>)]
    pub items: Vec<Contact>,
}
