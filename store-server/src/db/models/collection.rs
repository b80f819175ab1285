//! Collection Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Collection entity - curated product grouping for a merchandising page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collection {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub image: String,
    /// Category key the storefront page filters products by
    pub category: String,
    pub sort_order: i32,
    #[serde(default = "serde_helpers::default_true")]
    pub is_active: bool,
    pub created_at: Option<String>,
}

/// Create collection payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionCreate {
    pub title: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub category: String,
    pub sort_order: Option<i32>,
}

/// Update collection payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}
