//! Review Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Review {
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    pub user_name: String,
    pub review: String,
    pub image: String,
    /// Stored as text, the storefront renders it as-is
    pub rating: String,
    pub user_id: String,
    pub product_id: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// `POST /api/review/addReview`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReviewInput {
    pub user_name: String,
    pub review: String,
    pub image: String,
    #[serde(deserialize_with = "serde_helpers::string_or_number")]
    pub rating: String,
    pub product_id: String,
}
