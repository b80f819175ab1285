//! Database Module
//!
//! Embedded SurrealDB storage (RocksDB engine)

pub mod models;
pub mod repository;

use crate::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

/// Database service, owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the database at the given path and prepare the schema
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        db.use_ns("vitrina")
            .use_db("store")
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        Self::define_schema(&db).await?;

        tracing::info!("Database connection established (SurrealDB, RocksDB engine)");

        Ok(Self { db })
    }

    /// Index definitions, applied on every startup (idempotent)
    async fn define_schema(db: &Surreal<Db>) -> Result<(), AppError> {
        db.query(
            "DEFINE INDEX IF NOT EXISTS collection_title ON TABLE collection COLUMNS title UNIQUE;
             DEFINE INDEX IF NOT EXISTS order_number ON TABLE order COLUMNS order_number UNIQUE;
             DEFINE INDEX IF NOT EXISTS product_category ON TABLE product COLUMNS category;
             DEFINE INDEX IF NOT EXISTS product_brand ON TABLE product COLUMNS brand;",
        )
        .await
        .map_err(|e| AppError::database(format!("Failed to define indexes: {e}")))?;
        Ok(())
    }
}
