//! Cart Repository

use super::{BaseRepository, RepoResult};
use crate::db::models::{CartItem, CartItemUpdate};
use shared::util::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "cart_item";

#[derive(Clone)]
pub struct CartRepository {
    base: BaseRepository,
}

impl CartRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// A user's cart, oldest line first
    pub async fn find_by_user(&self, user_id: &str) -> RepoResult<Vec<CartItem>> {
        self.base
            .list(
                TABLE,
                "WHERE userId = $user",
                vec![("user", serde_json::json!(user_id))],
                "ORDER BY createdAt ASC",
                None,
            )
            .await
    }

    /// The line for `product_id` in this user's cart, if any
    pub async fn find_by_user_and_product(
        &self,
        user_id: &str,
        product_id: &str,
    ) -> RepoResult<Option<CartItem>> {
        let rows: Vec<CartItem> = self
            .base
            .list(
                TABLE,
                "WHERE userId = $user AND productId = $product",
                vec![
                    ("user", serde_json::json!(user_id)),
                    ("product", serde_json::json!(product_id)),
                ],
                "",
                Some((1, 0)),
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    /// A line by id, only if it belongs to `user_id`
    pub async fn find_owned(&self, id: &str, user_id: &str) -> RepoResult<Option<CartItem>> {
        let item: Option<CartItem> = self.base.get(TABLE, id).await?;
        Ok(item.filter(|i| i.user_id == user_id))
    }

    pub async fn create(&self, mut item: CartItem) -> RepoResult<CartItem> {
        let now = now_millis();
        item.id = None;
        item.created_at = now;
        item.updated_at = now;
        self.base.insert(TABLE, item).await
    }

    /// Partial update of the user's own line; `None` if it is not theirs
    pub async fn update_owned(
        &self,
        id: &str,
        user_id: &str,
        data: CartItemUpdate,
    ) -> RepoResult<Option<CartItem>> {
        if self.find_owned(id, user_id).await?.is_none() {
            return Ok(None);
        }
        self.base.merge(TABLE, id, data).await
    }

    /// Delete the user's own line; `None` if it is not theirs
    pub async fn delete_owned(&self, id: &str, user_id: &str) -> RepoResult<Option<CartItem>> {
        if self.find_owned(id, user_id).await?.is_none() {
            return Ok(None);
        }
        self.base.remove(TABLE, id).await
    }

    /// Empty a user's cart, returning the number of removed lines
    pub async fn clear_user(&self, user_id: &str) -> RepoResult<usize> {
        let mut result = self
            .base
            .db()
            .query("DELETE FROM cart_item WHERE userId = $user RETURN BEFORE")
            .bind(("user", user_id.to_string()))
            .await?;
        let removed: Vec<CartItem> = result.take(0)?;
        Ok(removed.len())
    }
}
