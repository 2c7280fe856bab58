//! Home slide Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::HomeSlide;
use shared::util::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "home_slide";

#[derive(Clone)]
pub struct HomeSlideRepository {
    base: BaseRepository,
}

impl HomeSlideRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn create(&self, images: Vec<String>, user_id: String) -> RepoResult<HomeSlide> {
        let now = now_millis();
        self.base
            .insert(
                TABLE,
                HomeSlide {
                    id: None,
                    images,
                    user_id,
                    created_at: now,
                    updated_at: now,
                },
            )
            .await
    }

    pub async fn find_all(&self) -> RepoResult<Vec<HomeSlide>> {
        self.base
            .list(TABLE, "", Vec::new(), "ORDER BY createdAt DESC", None)
            .await
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<HomeSlide>> {
        self.base.get(TABLE, id).await
    }

    /// Every slide in `ids` that exists
    pub async fn find_many(&self, ids: &[String]) -> RepoResult<Vec<HomeSlide>> {
        let mut found = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(slide) = self.find_by_id(id).await? {
                found.push(slide);
            }
        }
        Ok(found)
    }

    pub async fn set_images(&self, id: &str, images: Vec<String>) -> RepoResult<HomeSlide> {
        self.base
            .merge(
                TABLE,
                id,
                serde_json::json!({ "images": images, "updatedAt": now_millis() }),
            )
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Slide {} not found", id)))
    }

    pub async fn delete(&self, id: &str) -> RepoResult<Option<HomeSlide>> {
        self.base.remove(TABLE, id).await
    }

    pub async fn delete_many(&self, ids: &[String]) -> RepoResult<Vec<HomeSlide>> {
        self.base.remove_many(TABLE, ids).await
    }
}
