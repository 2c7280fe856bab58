//! Review Repository

use super::{BaseRepository, Binds, RepoResult};
use crate::db::models::Review;
use shared::util::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "review";

#[derive(Clone)]
pub struct ReviewRepository {
    base: BaseRepository,
}

fn product_scope(product_id: Option<&str>) -> (&'static str, Binds) {
    match product_id {
        Some(id) => (
            "WHERE productId = $product",
            vec![("product", serde_json::json!(id))],
        ),
        None => ("", Vec::new()),
    }
}

impl ReviewRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn create(&self, mut review: Review) -> RepoResult<Review> {
        let now = now_millis();
        review.id = None;
        review.created_at = now;
        review.updated_at = now;
        self.base.insert(TABLE, review).await
    }

    /// Reviews, newest first; all products when `product_id` is `None`
    pub async fn find_by_product(&self, product_id: Option<&str>) -> RepoResult<Vec<Review>> {
        let (where_clause, binds) = product_scope(product_id);
        self.base
            .list(TABLE, where_clause, binds, "ORDER BY createdAt DESC", None)
            .await
    }

    pub async fn count(&self, product_id: Option<&str>) -> RepoResult<u64> {
        let (where_clause, binds) = product_scope(product_id);
        self.base.count(TABLE, where_clause, binds).await
    }
}
