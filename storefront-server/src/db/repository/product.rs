//! Product Repository

use super::{BaseRepository, RepoError, RepoResult, record_id};
use crate::db::models::{Product, ProductFilter, ProductSort, ProductUpdate};
use shared::util::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "product";

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Product>> {
        self.base.get(TABLE, id).await
    }

    pub async fn create(&self, mut product: Product) -> RepoResult<Product> {
        let now = now_millis();
        product.id = None;
        product.created_at = now;
        product.updated_at = now;
        self.base.insert(TABLE, product).await
    }

    /// Merge the provided fields, `NotFound` if the product is gone
    pub async fn update(&self, id: &str, mut data: ProductUpdate) -> RepoResult<Product> {
        data.updated_at = Some(now_millis());
        self.base
            .merge(TABLE, id, data)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))
    }

    /// Every product matching `filter`, in `sort` order
    pub async fn find_all(&self, filter: &ProductFilter, sort: ProductSort) -> RepoResult<Vec<Product>> {
        let (where_clause, binds) = filter.to_where();
        self.base
            .list(TABLE, &where_clause, binds, sort.order_clause(), None)
            .await
    }

    /// One page of matching products plus the total match count
    pub async fn find_page(
        &self,
        filter: &ProductFilter,
        sort: ProductSort,
        limit: u64,
        start: u64,
    ) -> RepoResult<(Vec<Product>, u64)> {
        let (where_clause, binds) = filter.to_where();
        self.base
            .page(TABLE, &where_clause, binds, sort.order_clause(), limit, start)
            .await
    }

    pub async fn count(&self, filter: &ProductFilter) -> RepoResult<u64> {
        let (where_clause, binds) = filter.to_where();
        self.base.count(TABLE, &where_clause, binds).await
    }

    /// Lower stock by `quantity`, never below zero
    ///
    /// Returns the new stock, or `None` when the product does not exist.
    pub async fn decrement_stock(&self, id: &str, quantity: i64) -> RepoResult<Option<i64>> {
        let thing = record_id(TABLE, id)?;
        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $thing SET
                    countInStock = math::max([(countInStock OR 0) - $qty, 0]),
                    updatedAt = $now
                RETURN AFTER"#,
            )
            .bind(("thing", thing))
            .bind(("qty", quantity.max(0)))
            .bind(("now", now_millis()))
            .await?;
        let updated: Vec<Product> = result.take(0)?;
        Ok(updated.into_iter().next().map(|p| p.count_in_stock))
    }

    pub async fn delete(&self, id: &str) -> RepoResult<Option<Product>> {
        self.base.remove(TABLE, id).await
    }

    pub async fn delete_many(&self, ids: &[String]) -> RepoResult<Vec<Product>> {
        self.base.remove_many(TABLE, ids).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_db;

    fn product(name: &str, cat: &str, price: f64, rating: f64) -> Product {
        Product {
            name: name.into(),
            cat_id: cat.into(),
            price,
            rating,
            count_in_stock: 5,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_update_delete() {
        let repo = ProductRepository::new(test_db::memory().await);
        let created = repo.create(product("Phone", "category:a", 100.0, 4.0)).await.unwrap();
        let id = created.id_string();

        let updated = repo
            .update(
                &id,
                ProductUpdate {
                    price: Some(80.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.price, 80.0);
        assert_eq!(updated.name, "Phone");

        assert!(matches!(
            repo.update("product:missing", ProductUpdate::default()).await,
            Err(RepoError::NotFound(_))
        ));

        assert!(repo.delete(&id).await.unwrap().is_some());
        assert!(repo.find_by_id(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_filter_and_page() {
        let repo = ProductRepository::new(test_db::memory().await);
        repo.create(product("A", "category:a", 10.0, 5.0)).await.unwrap();
        repo.create(product("B", "category:a", 50.0, 3.0)).await.unwrap();
        repo.create(product("C", "category:b", 30.0, 4.0)).await.unwrap();

        let filter = ProductFilter {
            cat_ids: vec!["category:a".into()],
            ..Default::default()
        };
        assert_eq!(repo.count(&filter).await.unwrap(), 2);

        let filter = ProductFilter {
            min_price: Some(20.0),
            ..Default::default()
        };
        let (page, total) = repo
            .find_page(&filter, ProductSort::RatingDesc, 1, 0)
            .await
            .unwrap();
        assert_eq!(total, 2);
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].name, "C");
    }

    #[tokio::test]
    async fn test_decrement_stock_floors_at_zero() {
        let repo = ProductRepository::new(test_db::memory().await);
        let id = repo
            .create(product("A", "category:a", 10.0, 5.0))
            .await
            .unwrap()
            .id_string();

        assert_eq!(repo.decrement_stock(&id, 2).await.unwrap(), Some(3));
        assert_eq!(repo.decrement_stock(&id, 10).await.unwrap(), Some(0));
        assert_eq!(repo.decrement_stock("product:missing", 1).await.unwrap(), None);
    }
}
