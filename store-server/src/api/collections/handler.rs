//! Collection API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::models::{Collection, CollectionCreate, CollectionUpdate};
use crate::db::repository::CollectionRepository;
use crate::utils::{AppError, AppResult};

/// GET /api/collections - 获取系列列表
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Collection>>> {
    let repo = CollectionRepository::new(state.db.clone());
    let collections = repo.find_all().await?;
    Ok(Json(collections))
}

/// GET /api/collections/:id - 获取单个系列
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Collection>> {
    let repo = CollectionRepository::new(state.db.clone());
    let collection = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Collection {}", id)))?;
    Ok(Json(collection))
}

/// POST /api/collections - 创建系列
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CollectionCreate>,
) -> AppResult<Json<Collection>> {
    let repo = CollectionRepository::new(state.db.clone());
    let collection = repo.create(payload).await?;
    Ok(Json(collection))
}

/// PUT /api/collections/:id - 更新系列
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<CollectionUpdate>,
) -> AppResult<Json<Collection>> {
    let repo = CollectionRepository::new(state.db.clone());
    let collection = repo.update(&id, payload).await?;
    Ok(Json(collection))
}

/// DELETE /api/collections/:id - 删除系列
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = CollectionRepository::new(state.db.clone());
    repo.delete(&id).await?;
    Ok(Json(true))
}
