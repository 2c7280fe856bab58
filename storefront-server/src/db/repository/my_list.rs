//! My list (wishlist) Repository

use super::{BaseRepository, RepoResult};
use crate::db::models::MyListItem;
use shared::util::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "my_list";

#[derive(Clone)]
pub struct MyListRepository {
    base: BaseRepository,
}

impl MyListRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_user(&self, user_id: &str) -> RepoResult<Vec<MyListItem>> {
        self.base
            .list(
                TABLE,
                "WHERE userId = $user",
                vec![("user", serde_json::json!(user_id))],
                "ORDER BY createdAt DESC",
                None,
            )
            .await
    }

    pub async fn exists(&self, user_id: &str, product_id: &str) -> RepoResult<bool> {
        let count = self
            .base
            .count(
                TABLE,
                "WHERE userId = $user AND productId = $product",
                vec![
                    ("user", serde_json::json!(user_id)),
                    ("product", serde_json::json!(product_id)),
                ],
            )
            .await?;
        Ok(count > 0)
    }

    pub async fn create(&self, mut item: MyListItem) -> RepoResult<MyListItem> {
        let now = now_millis();
        item.id = None;
        item.created_at = now;
        item.updated_at = now;
        self.base.insert(TABLE, item).await
    }

    /// Delete the user's own entry; `None` if it is not theirs
    pub async fn delete_owned(&self, id: &str, user_id: &str) -> RepoResult<Option<MyListItem>> {
        let item: Option<MyListItem> = self.base.get(TABLE, id).await?;
        if !item.is_some_and(|i| i.user_id == user_id) {
            return Ok(None);
        }
        self.base.remove(TABLE, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_db;

    #[tokio::test]
    async fn test_exists_and_delete_owned() {
        let repo = MyListRepository::new(test_db::memory().await);
        let item = repo
            .create(MyListItem {
                product_id: "product:1".into(),
                user_id: "user:a".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        let id = item.id.as_ref().unwrap().to_string();

        assert!(repo.exists("user:a", "product:1").await.unwrap());
        assert!(!repo.exists("user:b", "product:1").await.unwrap());
        assert!(repo.delete_owned(&id, "user:b").await.unwrap().is_none());
        assert!(repo.delete_owned(&id, "user:a").await.unwrap().is_some());
        assert!(repo.find_by_user("user:a").await.unwrap().is_empty());
    }
}
