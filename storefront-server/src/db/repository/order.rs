//! Order Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::Order;
use serde::Deserialize;
use shared::util::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "orders";

/// `(createdAt, totalAmt)` pair for the sales report
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SaleRow {
    #[serde(rename = "createdAt", default)]
    pub created_at: i64,
    #[serde(rename = "totalAmt", default)]
    pub total_amt: f64,
}

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn create(&self, mut order: Order) -> RepoResult<Order> {
        let now = now_millis();
        order.id = None;
        order.created_at = now;
        order.updated_at = now;
        self.base.insert(TABLE, order).await
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        self.base.get(TABLE, id).await
    }

    /// A user's orders, newest first, with the user's total order count
    pub async fn find_page_by_user(
        &self,
        user_id: &str,
        limit: u64,
        start: u64,
    ) -> RepoResult<(Vec<Order>, u64)> {
        self.base
            .page(
                TABLE,
                "WHERE userId = $user",
                vec![("user", serde_json::json!(user_id))],
                "ORDER BY createdAt DESC",
                limit,
                start,
            )
            .await
    }

    pub async fn update_status(&self, id: &str, status: String) -> RepoResult<Order> {
        self.base
            .merge(
                TABLE,
                id,
                serde_json::json!({ "order_status": status, "updatedAt": now_millis() }),
            )
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }

    /// Every order's timestamp and amount
    pub async fn sales_rows(&self) -> RepoResult<Vec<SaleRow>> {
        let mut result = self
            .base
            .db()
            .query("SELECT createdAt, totalAmt FROM orders")
            .await?;
        let rows: Vec<SaleRow> = result.take(0)?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::ORDER_STATUS_PENDING;
    use crate::db::repository::test_db;

    #[tokio::test]
    async fn test_page_and_status() {
        let repo = OrderRepository::new(test_db::memory().await);
        for amt in [10.0, 20.0, 30.0] {
            repo.create(Order {
                user_id: "user:a".into(),
                total_amt: amt,
                order_status: ORDER_STATUS_PENDING.into(),
                ..Default::default()
            })
            .await
            .unwrap();
        }
        repo.create(Order {
            user_id: "user:b".into(),
            total_amt: 5.0,
            ..Default::default()
        })
        .await
        .unwrap();

        let (page, total) = repo.find_page_by_user("user:a", 2, 0).await.unwrap();
        assert_eq!(total, 3);
        assert_eq!(page.len(), 2);

        let id = page[0].id.as_ref().unwrap().to_string();
        let updated = repo.update_status(&id, "delivered".into()).await.unwrap();
        assert_eq!(updated.order_status, "delivered");

        let rows = repo.sales_rows().await.unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows.iter().map(|r| r.total_amt).sum::<f64>(), 65.0);
    }
}
