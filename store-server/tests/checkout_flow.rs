//! 下单流程集成测试
//!
//! 使用 ServerState::initialize 完整初始化 (tempdir 数据库，邮件禁用)

use store_server::checkout::{CheckoutItem, CheckoutRequest, CheckoutService};
use store_server::db::models::{OrderStatus, ProductCreate};
use store_server::db::repository::{OrderRepository, ProductRepository};
use store_server::utils::ErrorCode;
use store_server::{Config, ServerState};

async fn test_state() -> (tempfile::TempDir, ServerState) {
    let tmp = tempfile::tempdir().expect("tempdir");
    let config = Config::with_overrides(tmp.path().to_string_lossy().to_string(), 0);
    let state = ServerState::initialize(&config).await;
    (tmp, state)
}

fn product(name: &str, price: f64, stock: i64) -> ProductCreate {
    ProductCreate {
        name: name.to_string(),
        description: None,
        price,
        stock,
        category: "dresses".to_string(),
        brand: "Vitrina".to_string(),
        sizes: Some(vec!["S".into(), "M".into()]),
        images: Some(vec!["/uploads/test.jpg".into()]),
        is_featured: None,
    }
}

fn checkout(country: &str, items: Vec<CheckoutItem>) -> CheckoutRequest {
    CheckoutRequest {
        first_name: "Jane".into(),
        last_name: "Doe".into(),
        email: "jane@example.com".into(),
        phone: "067000000".into(),
        country: country.into(),
        city: Some("Tiranë".into()),
        address: "Rruga e Dibrës 1".into(),
        notes: None,
        items,
    }
}

fn cart_item(id: &str, name: &str, price: f64, quantity: i32) -> CheckoutItem {
    CheckoutItem {
        id: id.to_string(),
        name: Some(name.to_string()),
        price,
        quantity,
        brand: Some("Vitrina".into()),
        size: Some("M".into()),
        image: Some("/uploads/test.jpg".into()),
    }
}

#[tokio::test]
async fn order_total_includes_shipping_fee() {
    let (_tmp, state) = test_state().await;
    let products = ProductRepository::new(state.db.clone());
    let service = CheckoutService::from_state(&state);

    let created = products.create(product("Linen blazer", 25.0, 10)).await.unwrap();
    let id = created.id.as_ref().unwrap().to_string();

    let order = service
        .place_order(checkout(
            "Shqipëri",
            vec![cart_item(&id, "Linen blazer", 25.0, 2)],
        ))
        .await
        .unwrap();

    assert_eq!(order.shipping_fee, 10.0);
    assert_eq!(order.total, 60.0);
    assert_eq!(order.status, OrderStatus::Pending);
    assert!(order.order_number.starts_with("ORD-"));

    // Stock decremented by the ordered quantity
    let after = products.find_by_id(&id).await.unwrap().unwrap();
    assert_eq!(after.stock, 8);
}

#[tokio::test]
async fn no_shipping_fee_outside_fee_countries() {
    let (_tmp, state) = test_state().await;
    let products = ProductRepository::new(state.db.clone());
    let service = CheckoutService::from_state(&state);

    let created = products.create(product("Silk scarf", 19.5, 4)).await.unwrap();
    let id = created.id.as_ref().unwrap().to_string();

    let order = service
        .place_order(checkout("Kosovë", vec![cart_item(&id, "Silk scarf", 19.5, 1)]))
        .await
        .unwrap();

    assert_eq!(order.shipping_fee, 0.0);
    assert_eq!(order.total, 19.5);
}

#[tokio::test]
async fn over_stock_order_is_rejected_without_writes() {
    let (_tmp, state) = test_state().await;
    let products = ProductRepository::new(state.db.clone());
    let orders = OrderRepository::new(state.db.clone());
    let service = CheckoutService::from_state(&state);

    let created = products.create(product("Wool coat", 120.0, 1)).await.unwrap();
    let id = created.id.as_ref().unwrap().to_string();

    let err = service
        .place_order(checkout("Shqipëri", vec![cart_item(&id, "Wool coat", 120.0, 2)]))
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::InsufficientStock);

    // No order persisted, stock untouched
    assert!(orders.find_all(10, 0, None).await.unwrap().is_empty());
    let after = products.find_by_id(&id).await.unwrap().unwrap();
    assert_eq!(after.stock, 1);
}

#[tokio::test]
async fn mixed_cart_rejection_leaves_in_stock_items_untouched() {
    let (_tmp, state) = test_state().await;
    let products = ProductRepository::new(state.db.clone());
    let orders = OrderRepository::new(state.db.clone());
    let service = CheckoutService::from_state(&state);

    let in_stock = products.create(product("Belt", 15.0, 5)).await.unwrap();
    let sold_out = products.create(product("Hat", 20.0, 0)).await.unwrap();
    let in_stock_id = in_stock.id.as_ref().unwrap().to_string();
    let sold_out_id = sold_out.id.as_ref().unwrap().to_string();

    let err = service
        .place_order(checkout(
            "Shqipëri",
            vec![
                cart_item(&in_stock_id, "Belt", 15.0, 1),
                cart_item(&sold_out_id, "Hat", 20.0, 1),
            ],
        ))
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::InsufficientStock);
    assert!(orders.find_all(10, 0, None).await.unwrap().is_empty());

    let belt = products.find_by_id(&in_stock_id).await.unwrap().unwrap();
    assert_eq!(belt.stock, 5);
}

#[tokio::test]
async fn unknown_product_is_rejected_before_any_write() {
    let (_tmp, state) = test_state().await;
    let orders = OrderRepository::new(state.db.clone());
    let service = CheckoutService::from_state(&state);

    let err = service
        .place_order(checkout(
            "Shqipëri",
            vec![cart_item("product:missing", "Ghost", 10.0, 1)],
        ))
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::ProductNotFound);
    assert!(orders.find_all(10, 0, None).await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_required_field_names_the_field() {
    let (_tmp, state) = test_state().await;
    let products = ProductRepository::new(state.db.clone());
    let service = CheckoutService::from_state(&state);

    let created = products.create(product("Blouse", 30.0, 3)).await.unwrap();
    let id = created.id.as_ref().unwrap().to_string();

    let mut payload = checkout("Shqipëri", vec![cart_item(&id, "Blouse", 30.0, 1)]);
    payload.first_name = String::new();

    let err = service.place_order(payload).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationFailed);
    assert!(err.details.unwrap().contains_key("first_name"));
}

#[tokio::test]
async fn concurrent_orders_for_last_unit_allow_exactly_one_winner() {
    let (_tmp, state) = test_state().await;
    let products = ProductRepository::new(state.db.clone());
    let orders = OrderRepository::new(state.db.clone());

    let created = products.create(product("Last dress", 75.0, 1)).await.unwrap();
    let id = created.id.as_ref().unwrap().to_string();

    let service_a = CheckoutService::from_state(&state);
    let service_b = CheckoutService::from_state(&state);
    let payload_a = checkout("Shqipëri", vec![cart_item(&id, "Last dress", 75.0, 1)]);
    let payload_b = checkout("Mali i Zi", vec![cart_item(&id, "Last dress", 75.0, 1)]);

    let (a, b) = tokio::join!(
        service_a.place_order(payload_a),
        service_b.place_order(payload_b)
    );

    // The conditional decrement makes overselling impossible: one order
    // wins, the other is rejected (out of stock, or a commit conflict
    // depending on how the two transactions interleave)
    assert_eq!(a.is_ok() as u8 + b.is_ok() as u8, 1, "exactly one order must win");

    let after = products.find_by_id(&id).await.unwrap().unwrap();
    assert_eq!(after.stock, 0);
    assert_eq!(orders.find_all(10, 0, None).await.unwrap().len(), 1);
}

#[tokio::test]
async fn any_status_is_reachable_from_any_other() {
    let (_tmp, state) = test_state().await;
    let products = ProductRepository::new(state.db.clone());
    let orders = OrderRepository::new(state.db.clone());
    let service = CheckoutService::from_state(&state);

    let created = products.create(product("Cardigan", 40.0, 10)).await.unwrap();
    let id = created.id.as_ref().unwrap().to_string();

    let order = service
        .place_order(checkout("Shqipëri", vec![cart_item(&id, "Cardigan", 40.0, 1)]))
        .await
        .unwrap();
    let order_id = order.id.as_ref().unwrap().to_string();

    // No transition table: walk forwards, backwards and sideways
    let sequence = [
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Pending,
        OrderStatus::Cancelled,
        OrderStatus::Delivered,
    ];
    for status in sequence {
        let (updated, changed) = orders.update_status(&order_id, status).await.unwrap();
        assert_eq!(updated.status, status);
        assert!(changed);
    }

    // Same status again: persisted but reported unchanged
    let (updated, changed) = orders
        .update_status(&order_id, OrderStatus::Delivered)
        .await
        .unwrap();
    assert_eq!(updated.status, OrderStatus::Delivered);
    assert!(!changed);
}

#[tokio::test]
async fn order_snapshot_survives_product_changes() {
    let (_tmp, state) = test_state().await;
    let products = ProductRepository::new(state.db.clone());
    let orders = OrderRepository::new(state.db.clone());
    let service = CheckoutService::from_state(&state);

    let created = products.create(product("Maxi dress", 55.0, 5)).await.unwrap();
    let id = created.id.as_ref().unwrap().to_string();

    let order = service
        .place_order(checkout("Shqipëri", vec![cart_item(&id, "Maxi dress", 55.0, 1)]))
        .await
        .unwrap();
    let order_id = order.id.as_ref().unwrap().to_string();

    // Deleting the product must not disturb the frozen line item
    products.delete(&id).await.unwrap();

    let persisted = orders.find_by_id(&order_id).await.unwrap().unwrap();
    assert_eq!(persisted.items.len(), 1);
    assert_eq!(persisted.items[0].name, "Maxi dress");
    assert_eq!(persisted.items[0].price, 55.0);
}
