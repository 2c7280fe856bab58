//! Category Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Category, CategoryUpdate};
use shared::util::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "category";

#[derive(Clone)]
pub struct CategoryRepository {
    base: BaseRepository,
}

impl CategoryRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Flat list in creation order
    pub async fn find_all(&self) -> RepoResult<Vec<Category>> {
        self.base
            .list(TABLE, "", Vec::new(), "ORDER BY createdAt ASC", None)
            .await
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Category>> {
        self.base.get(TABLE, id).await
    }

    /// Direct children of `parent_id`
    pub async fn find_children(&self, parent_id: &str) -> RepoResult<Vec<Category>> {
        self.base
            .list(
                TABLE,
                "WHERE parentId = $parent",
                vec![("parent", serde_json::json!(parent_id))],
                "ORDER BY createdAt ASC",
                None,
            )
            .await
    }

    pub async fn create(&self, mut category: Category) -> RepoResult<Category> {
        let now = now_millis();
        category.id = None;
        category.created_at = now;
        category.updated_at = now;
        self.base.insert(TABLE, category).await
    }

    pub async fn update(&self, id: &str, mut data: CategoryUpdate) -> RepoResult<Category> {
        data.updated_at = now_millis();
        self.base
            .merge(TABLE, id, data)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Category {} not found", id)))
    }

    pub async fn delete(&self, id: &str) -> RepoResult<Option<Category>> {
        self.base.remove(TABLE, id).await
    }

    pub async fn delete_many(&self, ids: &[String]) -> RepoResult<Vec<Category>> {
        self.base.remove_many(TABLE, ids).await
    }
}
