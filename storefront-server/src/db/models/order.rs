//! Order Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use surrealdb::RecordId;

/// Snapshot of one ordered product
///
/// Fields the server reads are typed; everything else the client sent
/// (size, ram, weight, brand ...) is kept as-is in `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: String,
    pub product_title: String,
    pub quantity: i64,
    pub price: f64,
    pub image: String,
    pub sub_total: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Order {
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    #[serde(rename = "userId")]
    pub user_id: String,
    pub products: Vec<OrderLine>,
    #[serde(rename = "paymentId")]
    pub payment_id: String,
    pub payment_status: String,
    pub order_status: String,
    /// Address record id ("address:xxx")
    pub delivery_address: String,
    #[serde(rename = "totalAmt")]
    pub total_amt: f64,
    pub date: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: i64,
    #[serde(rename = "updatedAt")]
    pub updated_at: i64,
}

/// `POST /api/order/create`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OrderCreateRequest {
    pub products: Vec<OrderLine>,
    #[serde(rename = "paymentId")]
    pub payment_id: String,
    pub payment_status: String,
    pub delivery_address: String,
    #[serde(rename = "totalAmt")]
    pub total_amt: f64,
    pub date: Option<String>,
}

/// Order with its delivery address resolved for the order list
#[derive(Debug, Clone, Serialize)]
pub struct OrderView {
    #[serde(flatten)]
    pub order: Order,
    #[serde(rename = "deliveryAddressDetails")]
    pub delivery_address_details: Option<super::Address>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderStatusRequest {
    #[serde(default)]
    pub order_status: String,
}

pub const ORDER_STATUS_PENDING: &str = "pending";
