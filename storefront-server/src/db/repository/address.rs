//! Address Repository

use super::{BaseRepository, RepoResult};
use crate::db::models::{Address, AddressUpdate};
use shared::util::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "address";

#[derive(Clone)]
pub struct AddressRepository {
    base: BaseRepository,
}

impl AddressRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_user(&self, user_id: &str) -> RepoResult<Vec<Address>> {
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

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Address>> {
        self.base.get(TABLE, id).await
    }

    pub async fn create(&self, mut address: Address) -> RepoResult<Address> {
        let now = now_millis();
        address.id = None;
        address.created_at = now;
        address.updated_at = now;
        self.base.insert(TABLE, address).await
    }

    /// Partial update of the user's own address; `None` if it is not theirs
    pub async fn update_owned(
        &self,
        id: &str,
        user_id: &str,
        mut data: AddressUpdate,
    ) -> RepoResult<Option<Address>> {
        if !self.is_owner(id, user_id).await? {
            return Ok(None);
        }
        data.updated_at = now_millis();
        self.base.merge(TABLE, id, data).await
    }

    /// Delete the user's own address; `None` if it is not theirs
    pub async fn delete_owned(&self, id: &str, user_id: &str) -> RepoResult<Option<Address>> {
        if !self.is_owner(id, user_id).await? {
            return Ok(None);
        }
        self.base.remove(TABLE, id).await
    }

    async fn is_owner(&self, id: &str, user_id: &str) -> RepoResult<bool> {
        Ok(self
            .find_by_id(id)
            .await?
            .is_some_and(|a| a.user_id == user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_db;

    #[tokio::test]
    async fn test_owned_update() {
        let repo = AddressRepository::new(test_db::memory().await);
        let created = repo
            .create(Address {
                city: "Pune".into(),
                user_id: "user:a".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        let id = created.id_string();

        let update = AddressUpdate {
            city: Some("Mumbai".into()),
            ..Default::default()
        };
        assert!(repo.update_owned(&id, "user:b", update.clone()).await.unwrap().is_none());
        let updated = repo.update_owned(&id, "user:a", update).await.unwrap().unwrap();
        assert_eq!(updated.city, "Mumbai");
        assert_eq!(repo.find_by_user("user:a").await.unwrap().len(), 1);
        assert!(repo.delete_owned(&id, "user:a").await.unwrap().is_some());
    }
}
