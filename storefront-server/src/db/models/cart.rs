//! Cart item model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// One product line in a user's cart; title and price are copied at add time
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CartItem {
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    pub product_title: String,
    pub image: String,
    pub rating: f64,
    pub price: f64,
    pub old_price: f64,
    pub discount: f64,
    pub quantity: i64,
    pub sub_total: f64,
    pub product_id: String,
    pub count_in_stock: i64,
    pub user_id: String,
    pub brand: String,
    pub size: String,
    pub weight: String,
    pub ram: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// `POST /api/cart/add`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CartAddRequest {
    pub product_title: String,
    pub image: String,
    pub rating: f64,
    pub price: f64,
    pub old_price: f64,
    pub discount: f64,
    pub quantity: Option<i64>,
    pub sub_total: Option<f64>,
    pub product_id: Option<String>,
    pub count_in_stock: i64,
    pub brand: String,
    pub size: String,
    pub weight: String,
    pub ram: String,
}

/// `PUT /api/cart/update-cart-item`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartUpdateRequest {
    #[serde(default, alias = "_id")]
    pub id: String,
    pub qty: Option<i64>,
    pub sub_total: Option<f64>,
    pub size: Option<String>,
    pub weight: Option<String>,
    pub ram: Option<String>,
}

/// Columns written by a cart update
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_total: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ram: Option<String>,
    pub updated_at: i64,
}

impl From<CartUpdateRequest> for CartItemUpdate {
    fn from(req: CartUpdateRequest) -> Self {
        Self {
            quantity: req.qty,
            sub_total: req.sub_total,
            size: req.size,
            weight: req.weight,
            ram: req.ram,
            updated_at: shared::util::now_millis(),
        }
    }
}
