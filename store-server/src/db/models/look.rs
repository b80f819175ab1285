//! Total Look Model
//!
//! 整套搭配：后台策划的商品组合，在店面作为一个整体展示

use super::serde_helpers;
use crate::db::models::Product;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Total look entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Look {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    pub name: String,
    pub image: String,
    /// Product references (String IDs on the wire)
    #[serde(default, with = "serde_helpers::vec_record_id")]
    pub products: Vec<RecordId>,
    #[serde(default = "serde_helpers::default_true")]
    pub is_active: bool,
    pub created_at: Option<String>,
}

/// Create look payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookCreate {
    pub name: String,
    pub image: Option<String>,
    pub products: Vec<String>,
}

/// Update look payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookUpdate {
    pub name: Option<String>,
    pub image: Option<String>,
    pub products: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

/// Look with product references resolved (dangling refs are skipped)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookFull {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    pub name: String,
    pub image: String,
    pub products: Vec<Product>,
    pub is_active: bool,
    pub created_at: Option<String>,
}
