//! Banner Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Home page promo banner linked to a category path
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Banner {
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    pub banner_title: String,
    #[serde(deserialize_with = "serde_helpers::vec_or_empty")]
    pub images: Vec<String>,
    pub cat_name: String,
    #[serde(rename = "CatId")]
    pub cat_id: String,
    pub sub_cat_id: String,
    pub sub_cat: String,
    #[serde(rename = "thirdsubCat")]
    pub third_sub_cat: String,
    #[serde(rename = "thirdsubCatId")]
    pub third_sub_cat_id: String,
    pub price: f64,
    pub align_info: String,
    pub user_id: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Banner {
    pub fn id_string(&self) -> String {
        self.id.as_ref().map(|id| id.to_string()).unwrap_or_default()
    }
}

/// Columns written by a banner update
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BannerUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner_title: Option<String>,
    pub images: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cat_name: Option<String>,
    #[serde(rename = "CatId", skip_serializing_if = "Option::is_none")]
    pub cat_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_cat_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_cat: Option<String>,
    #[serde(rename = "thirdsubCat", skip_serializing_if = "Option::is_none")]
    pub third_sub_cat: Option<String>,
    #[serde(rename = "thirdsubCatId", skip_serializing_if = "Option::is_none")]
    pub third_sub_cat_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align_info: Option<String>,
    pub updated_at: i64,
}
