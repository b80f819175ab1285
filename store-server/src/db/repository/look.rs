//! Total Look Repository

use super::{BaseRepository, RepoError, RepoResult, now_rfc3339, record_id};
use crate::db::models::{Look, LookCreate, LookUpdate};
use serde::Serialize;
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "look";

#[derive(Clone)]
pub struct LookRepository {
    base: BaseRepository,
}

impl LookRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all active looks, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<Look>> {
        let looks: Vec<Look> = self
            .base
            .db()
            .query("SELECT * FROM look WHERE is_active = true ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(looks)
    }

    /// Find look by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Look>> {
        let rid = record_id(TABLE, id);
        let look: Option<Look> = self.base.db().select(rid).await?;
        Ok(look)
    }

    /// Create a new look
    pub async fn create(&self, data: LookCreate) -> RepoResult<Look> {
        if data.products.is_empty() {
            return Err(RepoError::Validation("products cannot be empty".into()));
        }

        let products: Vec<RecordId> = data
            .products
            .iter()
            .map(|id| record_id("product", id))
            .collect();

        let look = Look {
            id: None,
            name: data.name,
            image: data.image.unwrap_or_default(),
            products,
            is_active: true,
            created_at: Some(now_rfc3339()),
        };

        let created: Option<Look> = self.base.db().create(TABLE).content(look).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create look".to_string()))
    }

    /// Update a look
    pub async fn update(&self, id: &str, data: LookUpdate) -> RepoResult<Look> {
        #[derive(Serialize)]
        struct LookUpdateDb {
            #[serde(skip_serializing_if = "Option::is_none")]
            name: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            image: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            products: Option<Vec<RecordId>>,
            #[serde(skip_serializing_if = "Option::is_none")]
            is_active: Option<bool>,
        }

        let update_data = LookUpdateDb {
            name: data.name,
            image: data.image,
            products: data
                .products
                .map(|ids| ids.iter().map(|id| record_id("product", id)).collect()),
            is_active: data.is_active,
        };

        let rid = record_id(TABLE, id);
        self.base
            .db()
            .query("UPDATE $thing MERGE $data")
            .bind(("thing", rid))
            .bind(("data", update_data))
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Look {} not found", id)))
    }

    /// Hard delete a look
    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let rid = record_id(TABLE, id);
        let result: Option<Look> = self.base.db().delete(rid).await?;
        if result.is_none() {
            return Err(RepoError::NotFound(format!("Look {} not found", id)));
        }
        Ok(())
    }
}
