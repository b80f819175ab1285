//! Slider Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Homepage carousel entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slider {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    pub title: String,
    pub subtitle: Option<String>,
    pub image: String,
    /// Target the slide links to (storefront route or external URL)
    pub link: Option<String>,
    pub sort_order: i32,
    #[serde(default = "serde_helpers::default_true")]
    pub is_active: bool,
}

/// Create slider payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SliderCreate {
    pub title: String,
    pub subtitle: Option<String>,
    pub image: String,
    pub link: Option<String>,
    pub sort_order: Option<i32>,
}

/// Update slider payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SliderUpdate {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub image: Option<String>,
    pub link: Option<String>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}
