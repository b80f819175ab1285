//! Checkout - 下单业务逻辑
//!
//! 校验购物车、计算运费与总价、原子扣减库存并写入订单，
//! 最后尽力发送通知邮件（失败只记录日志）。

use serde::{Deserialize, Serialize};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use validator::{Validate, ValidationErrors};

use crate::core::ServerState;
use crate::db::models::{Order, OrderItem, OrderStatus};
use crate::db::repository::{
    OrderRepository, ProductRepository, RepoError, now_rfc3339, record_id,
};
use crate::services::EmailService;
use crate::utils::{AppError, AppResult, ErrorCode};

/// Flat shipping surcharge for countries on the fee list
pub const SHIPPING_FEE: f64 = 10.0;

/// Countries the flat shipping surcharge applies to
pub const SHIPPING_FEE_COUNTRIES: [&str; 3] = ["Shqipëri", "Maqedoni e Veriut", "Mali i Zi"];

/// Shipping fee for a destination country
pub fn shipping_fee(country: &str) -> f64 {
    if SHIPPING_FEE_COUNTRIES.contains(&country) {
        SHIPPING_FEE
    } else {
        0.0
    }
}

/// Order total: item prices times quantities, plus the shipping fee
pub fn order_total(items: &[CheckoutItem], fee: f64) -> f64 {
    items
        .iter()
        .map(|item| item.price * item.quantity as f64)
        .sum::<f64>()
        + fee
}

/// Checkout submission: contact/shipping fields plus the cart snapshot.
///
/// 除 city 与 notes 外所有字段必填
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CheckoutRequest {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Phone number is required"))]
    pub phone: String,
    #[validate(length(min = 1, message = "Country is required"))]
    pub country: String,
    pub city: Option<String>,
    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,
    pub notes: Option<String>,
    #[validate(length(min = 1, message = "Cart is empty"), nested)]
    pub items: Vec<CheckoutItem>,
}

/// Cart line item as submitted by the client (price included - the order
/// freezes whatever the cart displayed)
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct CheckoutItem {
    #[validate(length(min = 1, message = "Product id is required"))]
    pub id: String,
    pub name: Option<String>,
    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: f64,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
    pub brand: Option<String>,
    pub size: Option<String>,
    pub image: Option<String>,
}

/// Flatten validator output into a single field-named message
fn validation_error(errors: ValidationErrors) -> AppError {
    let mut err = AppError::new(ErrorCode::ValidationFailed);
    for (field, field_errors) in errors.field_errors() {
        if let Some(first) = field_errors.first() {
            let message = first
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("{} is invalid", field));
            err.message = message.clone();
            err = err.with_detail(field.to_string(), message);
        }
    }
    err
}

fn generate_order_number() -> String {
    let key = uuid::Uuid::new_v4().simple().to_string();
    format!("ORD-{}", key[..8].to_uppercase())
}

/// Checkout orchestration over the product/order repositories and the
/// email service
#[derive(Clone)]
pub struct CheckoutService {
    products: ProductRepository,
    orders: OrderRepository,
    email: EmailService,
}

impl CheckoutService {
    pub fn new(db: Surreal<Db>, email: EmailService) -> Self {
        Self {
            products: ProductRepository::new(db.clone()),
            orders: OrderRepository::new(db),
            email,
        }
    }

    pub fn from_state(state: &ServerState) -> Self {
        Self::new(state.db.clone(), state.email.clone())
    }

    /// Place an order from a cart submission.
    ///
    /// Every referenced product must exist with enough stock, checked
    /// item-by-item before any write; the stock decrement and the order
    /// write then run in one transaction, so a concurrent checkout losing
    /// the race is rejected without a partial write.
    pub async fn place_order(&self, payload: CheckoutRequest) -> AppResult<Order> {
        payload.validate().map_err(validation_error)?;

        // Pre-check stock so the caller gets a product-specific message
        for item in &payload.items {
            let product = self
                .products
                .find_by_id(&item.id)
                .await
                .map_err(AppError::from)?
                .ok_or_else(|| {
                    AppError::with_message(
                        ErrorCode::ProductNotFound,
                        format!("Product {} not found", item.id),
                    )
                })?;

            if product.stock < item.quantity as i64 {
                tracing::warn!(
                    product = %product.name,
                    requested = item.quantity,
                    available = product.stock,
                    "Checkout rejected, insufficient stock"
                );
                return Err(AppError::insufficient_stock(&product.name)
                    .with_detail("requested", item.quantity)
                    .with_detail("available", product.stock));
            }
        }

        let fee = shipping_fee(&payload.country);
        let total = order_total(&payload.items, fee);

        let items: Vec<OrderItem> = payload
            .items
            .iter()
            .map(|item| OrderItem {
                product: record_id("product", &item.id),
                name: item.name.clone().unwrap_or_default(),
                price: item.price,
                quantity: item.quantity,
                brand: item.brand.clone(),
                size: item.size.clone(),
                image: item.image.clone(),
            })
            .collect();

        let order = Order {
            id: None,
            order_number: generate_order_number(),
            first_name: payload.first_name,
            last_name: payload.last_name,
            email: payload.email,
            phone: payload.phone,
            country: payload.country,
            city: payload.city,
            address: payload.address,
            notes: payload.notes,
            items,
            shipping_fee: fee,
            total,
            status: OrderStatus::Pending,
            created_at: Some(now_rfc3339()),
        };

        let order = self.orders.create_checked(order).await.map_err(|e| match e {
            // A lost stock race surfaces here even after the pre-check passed
            RepoError::Validation(msg) => {
                AppError::with_message(ErrorCode::InsufficientStock, msg)
            }
            other => AppError::from(other),
        })?;

        tracing::info!(
            order_number = %order.order_number,
            total = order.total,
            items = order.items.len(),
            "Order placed"
        );

        // Best-effort notifications; never fail the order
        self.email.send_order_notifications(&order).await;

        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(price: f64, quantity: i32) -> CheckoutItem {
        CheckoutItem {
            id: "product:test".into(),
            name: Some("Test".into()),
            price,
            quantity,
            brand: None,
            size: None,
            image: None,
        }
    }

    #[test]
    fn test_shipping_fee_for_listed_countries() {
        assert_eq!(shipping_fee("Shqipëri"), 10.0);
        assert_eq!(shipping_fee("Maqedoni e Veriut"), 10.0);
        assert_eq!(shipping_fee("Mali i Zi"), 10.0);
    }

    #[test]
    fn test_shipping_fee_zero_elsewhere() {
        assert_eq!(shipping_fee("Kosovë"), 0.0);
        assert_eq!(shipping_fee("Italia"), 0.0);
        assert_eq!(shipping_fee(""), 0.0);
    }

    #[test]
    fn test_order_total_sums_items_plus_fee() {
        let items = vec![item(25.0, 2), item(9.5, 1)];
        assert_eq!(order_total(&items, 10.0), 69.5);
        assert_eq!(order_total(&items, 0.0), 59.5);
    }

    #[test]
    fn test_order_number_format() {
        let number = generate_order_number();
        assert!(number.starts_with("ORD-"));
        assert_eq!(number.len(), 12);
        assert!(number[4..].chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_validation_rejects_missing_fields() {
        let payload = CheckoutRequest {
            first_name: "".into(),
            last_name: "Doe".into(),
            email: "jane@example.com".into(),
            phone: "067000000".into(),
            country: "Shqipëri".into(),
            city: None,
            address: "Rruga e Dibrës 1".into(),
            notes: None,
            items: vec![item(10.0, 1)],
        };
        let err = payload.validate().unwrap_err();
        assert!(err.field_errors().contains_key("first_name"));
    }

    #[test]
    fn test_validation_rejects_empty_cart() {
        let payload = CheckoutRequest {
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            email: "jane@example.com".into(),
            phone: "067000000".into(),
            country: "Shqipëri".into(),
            city: None,
            address: "Rruga e Dibrës 1".into(),
            notes: None,
            items: vec![],
        };
        let err = payload.validate().unwrap_err();
        assert!(err.field_errors().contains_key("items"));
    }
}
