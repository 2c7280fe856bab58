//! Product variant repository (RAM / size / weight)

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{ProductVariant, VariantKind};
use shared::util::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

/// One repository per variant table
#[derive(Clone)]
pub struct VariantRepository {
    base: BaseRepository,
    kind: VariantKind,
}

impl VariantRepository {
    pub fn new(db: Surreal<Db>, kind: VariantKind) -> Self {
        Self {
            base: BaseRepository::new(db),
            kind,
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<ProductVariant>> {
        self.base
            .list(self.kind.table(), "", Vec::new(), "ORDER BY createdAt ASC", None)
            .await
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<ProductVariant>> {
        self.base.get(self.kind.table(), id).await
    }

    pub async fn create(&self, name: String, user_id: String) -> RepoResult<ProductVariant> {
        let now = now_millis();
        self.base
            .insert(
                self.kind.table(),
                ProductVariant {
                    id: None,
                    name,
                    user_id,
                    created_at: now,
                    updated_at: now,
                },
            )
            .await
    }

    pub async fn rename(&self, id: &str, name: String) -> RepoResult<ProductVariant> {
        self.base
            .merge(
                self.kind.table(),
                id,
                serde_json::json!({ "name": name, "updatedAt": now_millis() }),
            )
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("{} {} not found", self.kind.label(), id)))
    }

    pub async fn delete(&self, id: &str) -> RepoResult<Option<ProductVariant>> {
        self.base.remove(self.kind.table(), id).await
    }

    pub async fn delete_many(&self, ids: &[String]) -> RepoResult<Vec<ProductVariant>> {
        self.base.remove_many(self.kind.table(), ids).await
    }
}
