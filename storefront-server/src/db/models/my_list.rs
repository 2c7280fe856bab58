//! Wishlist ("my list") model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MyListItem {
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    pub product_id: String,
    pub product_title: String,
    pub image: String,
    pub rating: f64,
    pub price: f64,
    pub old_price: f64,
    pub brand: String,
    pub discount: f64,
    pub user_id: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// `POST /api/myList/add`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MyListAddRequest {
    pub product_id: String,
    pub product_title: String,
    pub image: String,
    pub rating: f64,
    pub price: f64,
    pub old_price: f64,
    pub brand: String,
    pub discount: f64,
}
