//! Slider API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::models::{Slider, SliderCreate, SliderUpdate};
use crate::db::repository::SliderRepository;
use crate::utils::{AppError, AppResult};

/// GET /api/sliders - 获取轮播图列表
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Slider>>> {
    let repo = SliderRepository::new(state.db.clone());
    let sliders = repo.find_all().await?;
    Ok(Json(sliders))
}

/// GET /api/sliders/:id - 获取单个轮播图
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Slider>> {
    let repo = SliderRepository::new(state.db.clone());
    let slider = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Slider {}", id)))?;
    Ok(Json(slider))
}

/// POST /api/sliders - 创建轮播图
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<SliderCreate>,
) -> AppResult<Json<Slider>> {
    let repo = SliderRepository::new(state.db.clone());
    let slider = repo.create(payload).await?;
    Ok(Json(slider))
}

/// PUT /api/sliders/:id - 更新轮播图
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<SliderUpdate>,
) -> AppResult<Json<Slider>> {
    let repo = SliderRepository::new(state.db.clone());
    let slider = repo.update(&id, payload).await?;
    Ok(Json(slider))
}

/// DELETE /api/sliders/:id - 删除轮播图
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = SliderRepository::new(state.db.clone());
    repo.delete(&id).await?;
    Ok(Json(true))
}
