mod common;

use std::sync::Arc;

use common::{MemoryCatalog, MemoryCredentials, MemoryOrders, backend, build, product};
use rust_decimal::Decimal;
use tea_storefront::{
    cart::Cart,
    dto::{cart::AddToCartRequest, orders::CheckoutRequest},
    error::AppError,
    models::OrderStatus,
    services::{
        cart_service,
        checkout_service::{self, CONFIRMATION_MESSAGE},
    },
};

fn customer() -> CheckoutRequest {
    CheckoutRequest {
        name: "Noura".into(),
        email: Some("noura@example.com".into()),
        phone: "+965 5555 1234".into(),
        address: "Block 3, Salmiya".into(),
    }
}

fn two_line_cart() -> Cart {
    let mut cart = Cart::new();
    let first = product(1, "Chamomile", 10, None);
    cart.add(first.clone());
    cart.add(first);
    cart.add(product(2, "Peppermint", 5, None));
    cart
}

#[tokio::test]
async fn delivery_fee_goes_on_the_first_order_only() {
    let catalog = Arc::new(MemoryCatalog::default());
    let orders = MemoryOrders::new(catalog);
    let cart = two_line_cart();

    let receipt = checkout_service::place_orders(&orders, &cart, customer())
        .await
        .expect("checkout");

    assert_eq!(receipt.total, Decimal::from(27));
    assert_eq!(receipt.subtotal, Decimal::from(25));
    assert_eq!(receipt.delivery_fee, Decimal::from(2));
    assert_eq!(receipt.message, CONFIRMATION_MESSAGE);

    let submitted = orders.submitted();
    assert_eq!(submitted.len(), 2);
    assert_eq!(submitted[0].product_id, 1);
    assert_eq!(submitted[0].quantity, 2);
    assert_eq!(submitted[0].total_price, Decimal::from(22));
    assert_eq!(submitted[1].product_id, 2);
    assert_eq!(submitted[1].total_price, Decimal::from(5));
    assert!(submitted.iter().all(|o| o.status == OrderStatus::New));
    assert!(submitted.iter().all(|o| o.customer_name == "Noura"));
}

#[tokio::test]
async fn failure_on_second_item_keeps_first_order_and_cart() {
    let catalog = Arc::new(MemoryCatalog::with_products(vec![
        product(1, "Chamomile", 10, None),
        product(2, "Peppermint", 5, None),
    ]));
    let orders = Arc::new(MemoryOrders::failing_on(catalog.clone(), 2));
    let backend = build(catalog, orders.clone(), MemoryCredentials::default());
    let state = &backend.state;

    let cart_id = cart_service::open_cart(state).await.data.unwrap().cart_id;
    for product_id in [1, 1, 2] {
        cart_service::add_to_cart(state, cart_id, AddToCartRequest { product_id })
            .await
            .unwrap();
    }

    let err = checkout_service::checkout(state, cart_id, customer())
        .await
        .unwrap_err();

    match &err {
        AppError::Checkout {
            position,
            product_id,
            submitted,
            message,
            ..
        } => {
            assert_eq!(*position, 2);
            assert_eq!(*product_id, 2);
            assert_eq!(*submitted, 1);
            assert_eq!(message, "insert rejected");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.to_string(), "Order for Peppermint failed: insert rejected");

    let persisted = orders.submitted();
    assert_eq!(persisted.len(), 1);
    assert_eq!(persisted[0].product_id, 1);
    assert_eq!(persisted[0].total_price, Decimal::from(22));

    let summary = cart_service::get_cart(state, cart_id).await.unwrap().data.unwrap();
    assert_eq!(summary.items.len(), 2);
    assert_eq!(summary.count, 3);
}

#[tokio::test]
async fn successful_checkout_clears_the_cart() {
    let backend = backend(vec![product(1, "Chamomile", 12, Some(30))]);
    let state = &backend.state;

    let cart_id = cart_service::open_cart(state).await.data.unwrap().cart_id;
    cart_service::add_to_cart(state, cart_id, AddToCartRequest { product_id: 1 })
        .await
        .unwrap();

    let resp = checkout_service::checkout(state, cart_id, customer())
        .await
        .expect("checkout");
    assert_eq!(resp.message, "Order placed");
    assert_eq!(resp.data.unwrap().total, Decimal::from(14));

    let summary = cart_service::get_cart(state, cart_id).await.unwrap().data.unwrap();
    assert!(summary.items.is_empty());
    assert_eq!(summary.delivery_fee, Decimal::ZERO);
}

#[tokio::test]
async fn empty_cart_never_reaches_the_gateway() {
    let catalog = Arc::new(MemoryCatalog::default());
    let orders = MemoryOrders::new(catalog);

    let err = checkout_service::place_orders(&orders, &Cart::new(), customer())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(orders.submit_calls(), 0);
}

#[tokio::test]
async fn missing_required_fields_never_reach_the_gateway() {
    let catalog = Arc::new(MemoryCatalog::default());
    let orders = MemoryOrders::new(catalog);
    let cart = two_line_cart();

    for payload in [
        CheckoutRequest { name: "  ".into(), ..customer() },
        CheckoutRequest { phone: String::new(), ..customer() },
        CheckoutRequest { address: String::new(), ..customer() },
    ] {
        let err = checkout_service::place_orders(&orders, &cart, payload)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Name, phone, and address are required.");
    }
    assert_eq!(orders.submit_calls(), 0);
}

#[tokio::test]
async fn email_is_optional_and_blank_means_absent() {
    let catalog = Arc::new(MemoryCatalog::default());
    let orders = MemoryOrders::new(catalog);
    let cart = two_line_cart();

    let payload = CheckoutRequest {
        email: Some("   ".into()),
        ..customer()
    };
    checkout_service::place_orders(&orders, &cart, payload)
        .await
        .expect("checkout");

    assert!(orders.submitted().iter().all(|o| o.customer_email.is_none()));
}

#[tokio::test]
async fn sold_out_and_unknown_products_cannot_be_added() {
    let backend = backend(vec![product(1, "Hibiscus", 14, Some(0))]);
    let state = &backend.state;
    let cart_id = cart_service::open_cart(state).await.data.unwrap().cart_id;

    let sold_out = cart_service::add_to_cart(state, cart_id, AddToCartRequest { product_id: 1 })
        .await
        .unwrap_err();
    assert!(matches!(sold_out, AppError::Validation(_)));

    let missing = cart_service::add_to_cart(state, cart_id, AddToCartRequest { product_id: 7 })
        .await
        .unwrap_err();
    assert!(matches!(missing, AppError::NotFound));
}

#[tokio::test]
async fn carts_are_isolated_per_session() {
    let backend = backend(vec![product(1, "Chamomile", 12, None)]);
    let state = &backend.state;

    let first = cart_service::open_cart(state).await.data.unwrap().cart_id;
    let second = cart_service::open_cart(state).await.data.unwrap().cart_id;
    cart_service::add_to_cart(state, first, AddToCartRequest { product_id: 1 })
        .await
        .unwrap();

    let other = cart_service::get_cart(state, second).await.unwrap().data.unwrap();
    assert!(other.items.is_empty());

    let unknown = cart_service::get_cart(state, uuid::Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(unknown, AppError::NotFound));
}
