//! Order Repository
//!
//! 下单写入走单条事务：逐项条件扣减库存，任何一项不足则整体回滚

use super::{BaseRepository, RepoError, RepoResult, record_id};
use crate::db::models::{Order, OrderStatus};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const ORDER_TABLE: &str = "order";

/// Marker thrown inside the checkout transaction when a conditional
/// stock decrement matches no row
const OUT_OF_STOCK_MARKER: &str = "insufficient_stock";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// List orders, newest first, optionally filtered by status
    pub async fn find_all(
        &self,
        limit: i32,
        offset: i32,
        status: Option<OrderStatus>,
    ) -> RepoResult<Vec<Order>> {
        let mut query = String::from("SELECT * FROM order");
        if status.is_some() {
            query.push_str(" WHERE status = $status");
        }
        query.push_str(&format!(
            " ORDER BY created_at DESC LIMIT {} START {}",
            limit.max(1),
            offset.max(0)
        ));

        let mut q = self.base.db().query(query);
        if let Some(status) = status {
            q = q.bind(("status", status));
        }

        let orders: Vec<Order> = q.await?.take(0)?;
        Ok(orders)
    }

    /// Find order by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let rid = record_id(ORDER_TABLE, id);
        let order: Option<Order> = self.base.db().select(rid).await?;
        Ok(order)
    }

    /// Find order by its public order number
    pub async fn find_by_number(&self, order_number: &str) -> RepoResult<Option<Order>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM order WHERE order_number = $number LIMIT 1")
            .bind(("number", order_number.to_string()))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders.into_iter().next())
    }

    /// Persist an order and decrement stock for every line item in one
    /// transaction.
    ///
    /// Each item runs `UPDATE <product> SET stock -= q WHERE stock >= q`;
    /// a decrement that matches nothing aborts the whole transaction, so
    /// concurrent checkouts cannot drive stock negative and no order is
    /// written unless every item was covered.
    pub async fn create_checked(&self, order: Order) -> RepoResult<Order> {
        if order.items.is_empty() {
            return Err(RepoError::Validation("order has no items".into()));
        }

        let mut statements = String::from("BEGIN TRANSACTION;\n");
        for i in 0..order.items.len() {
            statements.push_str(&format!(
                "LET $u{i} = (UPDATE $p{i} SET stock -= $q{i} WHERE stock >= $q{i} RETURN AFTER);\n"
            ));
            statements.push_str(&format!(
                "IF array::len($u{i}) == 0 {{ THROW \"{OUT_OF_STOCK_MARKER}\" }};\n"
            ));
        }
        statements.push_str("CREATE order CONTENT $order;\nCOMMIT TRANSACTION;");

        let order_number = order.order_number.clone();

        let mut q = self.base.db().query(statements);
        for (i, item) in order.items.iter().enumerate() {
            q = q.bind((format!("p{i}"), item.product.clone()));
            q = q.bind((format!("q{i}"), item.quantity as i64));
        }
        q = q.bind(("order", order));

        let response = q.await?;
        response.check().map_err(|e| {
            let msg = e.to_string();
            if msg.contains(OUT_OF_STOCK_MARKER) {
                RepoError::Validation("Insufficient stock".into())
            } else {
                RepoError::Database(msg)
            }
        })?;

        // Transaction committed; read the persisted record back
        self.find_by_number(&order_number)
            .await?
            .ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// Set the order status unconditionally (no transition table).
    ///
    /// Returns the updated order and whether the status actually changed.
    pub async fn update_status(
        &self,
        id: &str,
        status: OrderStatus,
    ) -> RepoResult<(Order, bool)> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))?;

        let changed = existing.status != status;

        let rid = record_id(ORDER_TABLE, id);
        self.base
            .db()
            .query("UPDATE $thing MERGE { status: $status }")
            .bind(("thing", rid))
            .bind(("status", status))
            .await?;

        let updated = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))?;

        Ok((updated, changed))
    }

    /// Hard delete an order (stock is not restored)
    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let rid = record_id(ORDER_TABLE, id);
        let result: Option<Order> = self.base.db().delete(rid).await?;
        if result.is_none() {
            return Err(RepoError::NotFound(format!("Order {} not found", id)));
        }
        Ok(())
    }
}
