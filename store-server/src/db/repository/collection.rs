//! Collection Repository

use super::{BaseRepository, RepoError, RepoResult, now_rfc3339, record_id};
use crate::db::models::{Collection, CollectionCreate, CollectionUpdate};
use serde::Serialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "collection";

#[derive(Clone)]
pub struct CollectionRepository {
    base: BaseRepository,
}

impl CollectionRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all active collections ordered by sort_order
    pub async fn find_all(&self) -> RepoResult<Vec<Collection>> {
        let collections: Vec<Collection> = self
            .base
            .db()
            .query("SELECT * FROM collection WHERE is_active = true ORDER BY sort_order")
            .await?
            .take(0)?;
        Ok(collections)
    }

    /// Find collection by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Collection>> {
        let rid = record_id(TABLE, id);
        let collection: Option<Collection> = self.base.db().select(rid).await?;
        Ok(collection)
    }

    /// Find collection by title
    pub async fn find_by_title(&self, title: &str) -> RepoResult<Option<Collection>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM collection WHERE title = $title LIMIT 1")
            .bind(("title", title.to_string()))
            .await?;
        let collections: Vec<Collection> = result.take(0)?;
        Ok(collections.into_iter().next())
    }

    /// Create a new collection
    pub async fn create(&self, data: CollectionCreate) -> RepoResult<Collection> {
        // Check duplicate title
        if self.find_by_title(&data.title).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Collection '{}' already exists",
                data.title
            )));
        }

        let collection = Collection {
            id: None,
            title: data.title,
            description: data.description.unwrap_or_default(),
            image: data.image.unwrap_or_default(),
            category: data.category,
            sort_order: data.sort_order.unwrap_or(0),
            is_active: true,
            created_at: Some(now_rfc3339()),
        };

        let created: Option<Collection> =
            self.base.db().create(TABLE).content(collection).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create collection".to_string()))
    }

    /// Update a collection
    pub async fn update(&self, id: &str, data: CollectionUpdate) -> RepoResult<Collection> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Collection {} not found", id)))?;

        // Check duplicate title if changing
        if let Some(ref new_title) = data.title
            && new_title != &existing.title
            && self.find_by_title(new_title).await?.is_some()
        {
            return Err(RepoError::Duplicate(format!(
                "Collection '{}' already exists",
                new_title
            )));
        }

        #[derive(Serialize)]
        struct CollectionUpdateDb {
            #[serde(skip_serializing_if = "Option::is_none")]
            title: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            description: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            image: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            category: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            sort_order: Option<i32>,
            #[serde(skip_serializing_if = "Option::is_none")]
            is_active: Option<bool>,
        }

        let update_data = CollectionUpdateDb {
            title: data.title,
            description: data.description,
            image: data.image,
            category: data.category,
            sort_order: data.sort_order,
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
            .ok_or_else(|| RepoError::NotFound(format!("Collection {} not found", id)))
    }

    /// Hard delete a collection
    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let rid = record_id(TABLE, id);
        let result: Option<Collection> = self.base.db().delete(rid).await?;
        if result.is_none() {
            return Err(RepoError::NotFound(format!("Collection {} not found", id)));
        }
        Ok(())
    }
}
