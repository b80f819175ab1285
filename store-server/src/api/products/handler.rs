//! Product API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::models::{Product, ProductCreate, ProductUpdate};
use crate::db::repository::{ProductFilter, ProductRepository};
use crate::utils::{AppError, AppResult};

/// Query params for listing products
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
    pub brand: Option<String>,
    pub search: Option<String>,
    #[serde(default)]
    pub on_sale: bool,
    #[serde(default)]
    pub featured: bool,
    #[serde(default = "default_limit")]
    pub limit: i32,
    #[serde(default)]
    pub offset: i32,
}

fn default_limit() -> i32 {
    50
}

/// GET /api/products - 获取商品列表 (支持分类/品牌/搜索/折扣过滤)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Product>>> {
    let repo = ProductRepository::new(state.db.clone());
    let filter = ProductFilter {
        category: query.category,
        brand: query.brand,
        search: query.search,
        on_sale: query.on_sale,
        featured: query.featured,
        limit: query.limit,
        offset: query.offset,
    };
    let products = repo.find_all(&filter).await?;
    Ok(Json(products))
}

/// GET /api/products/:id - 获取单个商品
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Product>> {
    let repo = ProductRepository::new(state.db.clone());
    let product = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {}", id)))?;
    Ok(Json(product))
}

/// POST /api/products - 创建商品
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ProductCreate>,
) -> AppResult<Json<Product>> {
    let repo = ProductRepository::new(state.db.clone());
    let product = repo.create(payload).await?;
    Ok(Json(product))
}

/// PUT /api/products/:id - 更新商品
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<Product>> {
    let repo = ProductRepository::new(state.db.clone());
    let product = repo.update(&id, payload).await?;
    Ok(Json(product))
}

/// DELETE /api/products/:id - 删除商品
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = ProductRepository::new(state.db.clone());
    repo.delete(&id).await?;
    Ok(Json(true))
}

// =============================================================================
// Bulk Discount
// =============================================================================

/// Payload for the bulk discount operation
#[derive(Debug, Deserialize)]
pub struct BulkDiscountRequest {
    pub product_ids: Vec<String>,
    /// 0 clears the discount
    pub discount_percentage: f64,
    /// Optional narrowing to one brand
    pub brand: Option<String>,
    /// Optional narrowing to one category
    pub category: Option<String>,
}

/// Response for batch update operation
#[derive(Debug, Serialize)]
pub struct BulkDiscountResponse {
    pub updated: usize,
}

/// POST /api/products/bulk-discount - 批量应用/清除折扣
pub async fn bulk_discount(
    State(state): State<ServerState>,
    Json(payload): Json<BulkDiscountRequest>,
) -> AppResult<Json<BulkDiscountResponse>> {
    tracing::info!(
        count = payload.product_ids.len(),
        percentage = payload.discount_percentage,
        "Bulk discount request received"
    );

    let repo = ProductRepository::new(state.db.clone());
    let updated = repo
        .apply_bulk_discount(
            &payload.product_ids,
            payload.discount_percentage,
            payload.brand.as_deref(),
            payload.category.as_deref(),
        )
        .await?;

    tracing::info!(
        updated,
        total = payload.product_ids.len(),
        "Bulk discount completed"
    );

    Ok(Json(BulkDiscountResponse { updated }))
}
