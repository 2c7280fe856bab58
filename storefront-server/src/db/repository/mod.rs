//! Repository Module
//!
//! Provides CRUD operations for the storefront's SurrealDB tables.

// Accounts
pub mod address;
pub mod user;

// Catalog
pub mod category;
pub mod product;
pub mod variant;

// Shopping
pub mod cart;
pub mod my_list;
pub mod order;
pub mod review;

// Content
pub mod banner;
pub mod blog;
pub mod home_slide;

// Re-exports
pub use address::AddressRepository;
pub use banner::BannerRepository;
pub use blog::BlogRepository;
pub use cart::CartRepository;
pub use category::CategoryRepository;
pub use home_slide::HomeSlideRepository;
pub use my_list::MyListRepository;
pub use order::OrderRepository;
pub use product::ProductRepository;
pub use review::ReviewRepository;
pub use user::UserRepository;
pub use variant::VariantRepository;

use serde::Serialize;
use serde::de::DeserializeOwned;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Bind values for a dynamically built WHERE clause
pub type Binds = Vec<(&'static str, serde_json::Value)>;

// =============================================================================
// ID Convention: 全栈统一使用 "table:id" 格式
// =============================================================================
//
// 客户端可以传 "product:abc" 或裸 "abc"，统一经 record_id() 解析：
//   - "product:abc" 解析后校验表名
//   - "abc" 补全为 product:abc
// 跨表引用 (userId, productId ...) 以 "table:id" 字符串存储。

/// Parse a client-supplied id for `table`
pub fn record_id(table: &str, id: &str) -> RepoResult<RecordId> {
    let id = id.trim();
    if id.is_empty() {
        return Err(RepoError::Validation("Invalid ID: empty".to_string()));
    }
    if id.contains(':') {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        if thing.table() != table {
            return Err(RepoError::Validation(format!(
                "Invalid ID: {} is not a {} id",
                id, table
            )));
        }
        return Ok(thing);
    }
    Ok(RecordId::from_table_key(table, id.to_owned()))
}

/// Base repository with database reference and the shared CRUD statements
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }

    /// Select one record by id
    pub async fn get<T: DeserializeOwned>(&self, table: &'static str, id: &str) -> RepoResult<Option<T>> {
        let thing = record_id(table, id)?;
        let found: Option<T> = self.db.select(thing).await?;
        Ok(found)
    }

    /// Create a record with a generated id
    pub async fn insert<T>(&self, table: &'static str, doc: T) -> RepoResult<T>
    where
        T: Serialize + DeserializeOwned + 'static,
    {
        let created: Option<T> = self.db.create(table).content(doc).await?;
        created.ok_or_else(|| RepoError::Database(format!("Failed to create {}", table)))
    }

    /// `UPDATE $thing MERGE $data`, `None` when the record does not exist
    pub async fn merge<T, D>(&self, table: &'static str, id: &str, data: D) -> RepoResult<Option<T>>
    where
        T: DeserializeOwned,
        D: Serialize + 'static,
    {
        let thing = record_id(table, id)?;
        let mut result = self
            .db
            .query("UPDATE $thing MERGE $data RETURN AFTER")
            .bind(("thing", thing))
            .bind(("data", data))
            .await?;
        let updated: Vec<T> = result.take(0)?;
        Ok(updated.into_iter().next())
    }

    /// Delete one record, returning what was removed
    pub async fn remove<T: DeserializeOwned>(&self, table: &'static str, id: &str) -> RepoResult<Option<T>> {
        let thing = record_id(table, id)?;
        let deleted: Option<T> = self.db.delete(thing).await?;
        Ok(deleted)
    }

    /// Delete many records, returning the removed documents
    pub async fn remove_many<T: DeserializeOwned>(
        &self,
        table: &'static str,
        ids: &[String],
    ) -> RepoResult<Vec<T>> {
        let things = ids
            .iter()
            .map(|id| record_id(table, id))
            .collect::<RepoResult<Vec<_>>>()?;
        let mut result = self
            .db
            .query(format!("DELETE FROM {table} WHERE id IN $things RETURN BEFORE"))
            .bind(("things", things))
            .await?;
        let deleted: Vec<T> = result.take(0)?;
        Ok(deleted)
    }

    /// `SELECT *` with an optional WHERE/ORDER and page window
    pub async fn list<T: DeserializeOwned>(
        &self,
        table: &'static str,
        where_clause: &str,
        binds: Binds,
        order_clause: &str,
        window: Option<(u64, u64)>,
    ) -> RepoResult<Vec<T>> {
        let mut sql = format!("SELECT * FROM {table} {where_clause} {order_clause}");
        if window.is_some() {
            sql.push_str(" LIMIT $limit START $start");
        }
        let mut query = self.db.query(sql);
        for bind in binds {
            query = query.bind(bind);
        }
        if let Some((limit, start)) = window {
            query = query.bind(("limit", limit)).bind(("start", start));
        }
        let rows: Vec<T> = query.await?.take(0)?;
        Ok(rows)
    }

    /// `SELECT count() ... GROUP ALL`
    pub async fn count(&self, table: &'static str, where_clause: &str, binds: Binds) -> RepoResult<u64> {
        let mut query = self
            .db
            .query(format!("SELECT count() FROM {table} {where_clause} GROUP ALL"));
        for bind in binds {
            query = query.bind(bind);
        }
        let count: Option<i64> = query.await?.take((0, "count"))?;
        Ok(count.unwrap_or(0).max(0) as u64)
    }

    /// One page of rows plus the total row count for the same filter
    pub async fn page<T: DeserializeOwned>(
        &self,
        table: &'static str,
        where_clause: &str,
        binds: Binds,
        order_clause: &str,
        limit: u64,
        start: u64,
    ) -> RepoResult<(Vec<T>, u64)> {
        let rows = self
            .list(table, where_clause, binds.clone(), order_clause, Some((limit, start)))
            .await?;
        let total = self.count(table, where_clause, binds).await?;
        Ok((rows, total))
    }
}
