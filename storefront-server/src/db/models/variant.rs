//! Product variant lookups (RAM / size / weight)

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// The three variant lookup tables share one shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantKind {
    Ram,
    Size,
    Weight,
}

impl VariantKind {
    pub fn table(&self) -> &'static str {
        match self {
            VariantKind::Ram => "product_ram",
            VariantKind::Size => "product_size",
            VariantKind::Weight => "product_weight",
        }
    }

    /// Human label used in response messages
    pub fn label(&self) -> &'static str {
        match self {
            VariantKind::Ram => "Product RAM",
            VariantKind::Size => "Product size",
            VariantKind::Weight => "Product weight",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    pub name: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VariantInput {
    #[serde(default)]
    pub name: String,
}
