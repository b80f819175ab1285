//! Slider Repository

use super::{BaseRepository, RepoError, RepoResult, record_id};
use crate::db::models::{Slider, SliderCreate, SliderUpdate};
use serde::Serialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "slider";

#[derive(Clone)]
pub struct SliderRepository {
    base: BaseRepository,
}

impl SliderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all active slides ordered by sort_order
    pub async fn find_all(&self) -> RepoResult<Vec<Slider>> {
        let sliders: Vec<Slider> = self
            .base
            .db()
            .query("SELECT * FROM slider WHERE is_active = true ORDER BY sort_order")
            .await?
            .take(0)?;
        Ok(sliders)
    }

    /// Find slide by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Slider>> {
        let rid = record_id(TABLE, id);
        let slider: Option<Slider> = self.base.db().select(rid).await?;
        Ok(slider)
    }

    /// Create a new slide
    pub async fn create(&self, data: SliderCreate) -> RepoResult<Slider> {
        let slider = Slider {
            id: None,
            title: data.title,
            subtitle: data.subtitle,
            image: data.image,
            link: data.link,
            sort_order: data.sort_order.unwrap_or(0),
            is_active: true,
        };

        let created: Option<Slider> = self.base.db().create(TABLE).content(slider).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create slider".to_string()))
    }

    /// Update a slide
    pub async fn update(&self, id: &str, data: SliderUpdate) -> RepoResult<Slider> {
        #[derive(Serialize)]
        struct SliderUpdateDb {
            #[serde(skip_serializing_if = "Option::is_none")]
            title: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            subtitle: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            image: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            link: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            sort_order: Option<i32>,
            #[serde(skip_serializing_if = "Option::is_none")]
            is_active: Option<bool>,
        }

        let update_data = SliderUpdateDb {
            title: data.title,
            subtitle: data.subtitle,
            image: data.image,
            link: data.link,
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
            .ok_or_else(|| RepoError::NotFound(format!("Slider {} not found", id)))
    }

    /// Hard delete a slide
    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let rid = record_id(TABLE, id);
        let result: Option<Slider> = self.base.db().delete(rid).await?;
        if result.is_none() {
            return Err(RepoError::NotFound(format!("Slider {} not found", id)));
        }
        Ok(())
    }
}
