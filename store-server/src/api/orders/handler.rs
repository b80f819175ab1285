//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::checkout::{CheckoutRequest, CheckoutService};
use crate::core::ServerState;
use crate::db::models::{Order, OrderStatus, OrderStatusUpdate};
use crate::db::repository::OrderRepository;
use crate::utils::{AppError, AppResult};

/// Query params for listing orders
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<OrderStatus>,
    #[serde(default = "default_limit")]
    pub limit: i32,
    #[serde(default)]
    pub offset: i32,
}

fn default_limit() -> i32 {
    50
}

/// GET /api/orders - 获取订单列表 (最新优先，可按状态过滤)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let repo = OrderRepository::new(state.db.clone());
    let orders = repo
        .find_all(query.limit, query.offset, query.status)
        .await?;
    Ok(Json(orders))
}

/// GET /api/orders/:id - 获取单个订单
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let repo = OrderRepository::new(state.db.clone());
    let order = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {}", id)))?;
    Ok(Json(order))
}

/// POST /api/orders - 下单 (结账提交)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CheckoutRequest>,
) -> AppResult<Json<Order>> {
    let service = CheckoutService::from_state(&state);
    let order = service.place_order(payload).await?;
    Ok(Json(order))
}

/// PUT /api/orders/:id/status - 更新订单状态
///
/// 任意状态都可以切换到任意状态；实际发生变更时给客户发邮件 (尽力而为)
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<OrderStatusUpdate>,
) -> AppResult<Json<Order>> {
    let repo = OrderRepository::new(state.db.clone());
    let (order, changed) = repo.update_status(&id, payload.status).await?;

    if changed {
        tracing::info!(
            order_number = %order.order_number,
            status = %order.status,
            "Order status updated"
        );
        state.email.send_status_update(&order).await;
    }

    Ok(Json(order))
}

/// DELETE /api/orders/:id - 删除订单
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = OrderRepository::new(state.db.clone());
    repo.delete(&id).await?;
    Ok(Json(true))
}
