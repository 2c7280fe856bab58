//! Banner Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Banner, BannerUpdate};
use shared::util::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "banner";

#[derive(Clone)]
pub struct BannerRepository {
    base: BaseRepository,
}

impl BannerRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn create(&self, mut banner: Banner) -> RepoResult<Banner> {
        let now = now_millis();
        banner.id = None;
        banner.created_at = now;
        banner.updated_at = now;
        self.base.insert(TABLE, banner).await
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Banner>> {
        self.base.get(TABLE, id).await
    }

    /// Newest first, with the total banner count
    pub async fn find_page(&self, limit: u64, start: u64) -> RepoResult<(Vec<Banner>, u64)> {
        self.base
            .page(TABLE, "", Vec::new(), "ORDER BY createdAt DESC", limit, start)
            .await
    }

    pub async fn count(&self) -> RepoResult<u64> {
        self.base.count(TABLE, "", Vec::new()).await
    }

    pub async fn find_by_cat_id(&self, cat_id: &str) -> RepoResult<Vec<Banner>> {
        self.base
            .list(
                TABLE,
                "WHERE CatId = $cat",
                vec![("cat", serde_json::json!(cat_id))],
                "ORDER BY createdAt DESC",
                None,
            )
            .await
    }

    pub async fn find_by_sub_cat_id(&self, sub_cat_id: &str) -> RepoResult<Vec<Banner>> {
        self.base
            .list(
                TABLE,
                "WHERE subCatId = $cat",
                vec![("cat", serde_json::json!(sub_cat_id))],
                "ORDER BY createdAt DESC",
                None,
            )
            .await
    }

    pub async fn update(&self, id: &str, mut data: BannerUpdate) -> RepoResult<Banner> {
        data.updated_at = now_millis();
        self.base
            .merge(TABLE, id, data)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Banner {} not found", id)))
    }

    pub async fn delete(&self, id: &str) -> RepoResult<Option<Banner>> {
        self.base.remove(TABLE, id).await
    }

    pub async fn delete_many(&self, ids: &[String]) -> RepoResult<Vec<Banner>> {
        self.base.remove_many(TABLE, ids).await
    }
}
