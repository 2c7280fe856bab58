//! Category Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Category document; `parentId` is null for roots
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Category {
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    pub name: String,
    #[serde(deserialize_with = "serde_helpers::vec_or_empty")]
    pub images: Vec<String>,
    pub user_id: String,
    pub parent_cat_name: Option<String>,
    pub parent_id: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Category {
    pub fn id_string(&self) -> String {
        self.id.as_ref().map(|id| id.to_string()).unwrap_or_default()
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.as_deref().is_none_or(str::is_empty)
    }
}

/// Tree node returned by `GET /api/category`
#[derive(Debug, Clone, Serialize)]
pub struct CategoryNode {
    #[serde(flatten)]
    pub category: Category,
    pub children: Vec<CategoryNode>,
}

/// A sub-category with its parent's name and images attached
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubCategoryView {
    #[serde(flatten)]
    pub category: Category,
    pub parent_category: Option<ParentSummary>,
    pub parent_images: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParentSummary {
    pub id: String,
    pub name: String,
}

/// Columns written by a category update
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_cat_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub updated_at: i64,
}
