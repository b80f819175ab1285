//! Total Look API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::models::{Look, LookCreate, LookFull, LookUpdate};
use crate::db::repository::{LookRepository, ProductRepository};
use crate::utils::{AppError, AppResult, ErrorCode};

/// GET /api/looks - 获取整套搭配列表
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Look>>> {
    let repo = LookRepository::new(state.db.clone());
    let looks = repo.find_all().await?;
    Ok(Json(looks))
}

/// GET /api/looks/:id - 获取单个搭配
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Look>> {
    let repo = LookRepository::new(state.db.clone());
    let look = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::LookNotFound))?;
    Ok(Json(look))
}

/// GET /api/looks/:id/full - 获取搭配及其完整商品信息
pub async fn get_full(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<LookFull>> {
    let look_repo = LookRepository::new(state.db.clone());
    let product_repo = ProductRepository::new(state.db.clone());

    let look = look_repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::LookNotFound))?;

    // Dangling references resolve to nothing and are simply dropped
    let products = product_repo.find_by_record_ids(&look.products).await?;

    let look_full = LookFull {
        id: look.id,
        name: look.name,
        image: look.image,
        products,
        is_active: look.is_active,
        created_at: look.created_at,
    };

    Ok(Json(look_full))
}

/// POST /api/looks - 创建搭配
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<LookCreate>,
) -> AppResult<Json<Look>> {
    let repo = LookRepository::new(state.db.clone());
    let look = repo.create(payload).await?;
    Ok(Json(look))
}

/// PUT /api/looks/:id - 更新搭配
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<LookUpdate>,
) -> AppResult<Json<Look>> {
    let repo = LookRepository::new(state.db.clone());
    let look = repo.update(&id, payload).await?;
    Ok(Json(look))
}

/// DELETE /api/looks/:id - 删除搭配
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = LookRepository::new(state.db.clone());
    repo.delete(&id).await?;
    Ok(Json(true))
}
