//! Home slider model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HomeSlide {
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    #[serde(deserialize_with = "serde_helpers::vec_or_empty")]
    pub images: Vec<String>,
    pub user_id: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl HomeSlide {
    pub fn id_string(&self) -> String {
        self.id.as_ref().map(|id| id.to_string()).unwrap_or_default()
    }
}

/// `POST /add` and `PUT /{id}` body
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SlideInput {
    pub images: Vec<String>,
}
