//! Database Module
//!
//! Embedded SurrealDB (RocksDB) holding every storefront collection.

pub mod models;
pub mod repository;

use std::path::Path;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

use crate::core::ServerError;

const NAMESPACE: &str = "storefront";
const DATABASE: &str = "main";

/// Indexes the repositories rely on
const SCHEMA: &str = r#"
DEFINE INDEX IF NOT EXISTS user_email ON TABLE user COLUMNS email UNIQUE;
DEFINE INDEX IF NOT EXISTS product_cat ON TABLE product COLUMNS CatId;
DEFINE INDEX IF NOT EXISTS product_sub_cat ON TABLE product COLUMNS subCatId;
DEFINE INDEX IF NOT EXISTS product_third_cat ON TABLE product COLUMNS thirdsubCatId;
DEFINE INDEX IF NOT EXISTS category_parent ON TABLE category COLUMNS parentId;
DEFINE INDEX IF NOT EXISTS cart_user ON TABLE cart_item COLUMNS userId;
DEFINE INDEX IF NOT EXISTS my_list_user ON TABLE my_list COLUMNS userId;
DEFINE INDEX IF NOT EXISTS address_user ON TABLE address COLUMNS userId;
DEFINE INDEX IF NOT EXISTS order_user ON TABLE orders COLUMNS userId;
DEFINE INDEX IF NOT EXISTS review_product ON TABLE review COLUMNS productId;
"#;

/// Database service - owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the database under `path` and apply the indexes
    pub async fn new(path: &Path) -> Result<Self, ServerError> {
        let db = Surreal::new::<RocksDb>(path).await?;
        db.use_ns(NAMESPACE).use_db(DATABASE).await?;
        define_schema(&db).await?;

        tracing::info!(path = %path.display(), "Database connection established (SurrealDB RocksDB)");
        Ok(Self { db })
    }
}

/// Apply the index definitions; safe to run on every start
pub async fn define_schema(db: &Surreal<Db>) -> Result<(), surrealdb::Error> {
    db.query(SCHEMA).await?.check()?;
    Ok(())
}
