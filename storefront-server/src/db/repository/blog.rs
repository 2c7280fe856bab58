//! Blog Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Blog, BlogUpdate};
use shared::util::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "blog";

#[derive(Clone)]
pub struct BlogRepository {
    base: BaseRepository,
}

impl BlogRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn create(&self, mut blog: Blog) -> RepoResult<Blog> {
        let now = now_millis();
        blog.id = None;
        blog.created_at = now;
        blog.updated_at = now;
        self.base.insert(TABLE, blog).await
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Blog>> {
        self.base.get(TABLE, id).await
    }

    pub async fn find_page(&self, limit: u64, start: u64) -> RepoResult<(Vec<Blog>, u64)> {
        self.base
            .page(TABLE, "", Vec::new(), "ORDER BY createdAt DESC", limit, start)
            .await
    }

    pub async fn count(&self) -> RepoResult<u64> {
        self.base.count(TABLE, "", Vec::new()).await
    }

    pub async fn update(&self, id: &str, mut data: BlogUpdate) -> RepoResult<Blog> {
        data.updated_at = now_millis();
        self.base
            .merge(TABLE, id, data)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Blog {} not found", id)))
    }

    pub async fn delete(&self, id: &str) -> RepoResult<Option<Blog>> {
        self.base.remove(TABLE, id).await
    }

    pub async fn delete_many(&self, ids: &[String]) -> RepoResult<Vec<Blog>> {
        self.base.remove_many(TABLE, ids).await
    }
}
