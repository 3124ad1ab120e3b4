use apparel_storefront::{
    dto::orders::{CheckoutCustomer, CheckoutItem, OrderPricing, PlaceOrderRequest},
    error::AppError,
    services::order_service,
    state::AppState,
    storage::PersistedStorage,
    stores::{CartStore, NewCartItem},
};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

// Requests rejected here never reach the database.
fn offline_state() -> AppState {
    AppState {
        orm: DatabaseConnection::Disconnected,
    }
}

fn buyer() -> CheckoutCustomer {
    CheckoutCustomer {
        name: "Asha Verma".into(),
        email: "asha@example.com".into(),
        address: "12 MG Road, Indiranagar, Bengaluru, Karnataka - 560038".into(),
    }
}

fn cart_item(product_id: Uuid, price: i64, quantity: u32, size: &str) -> NewCartItem {
    NewCartItem {
        product_id,
        name: "Chikankari Kurta".into(),
        price: Decimal::from(price),
        image: "/img/kurta.jpg".into(),
        quantity,
        sku: None,
        size: Some(size.into()),
        color: Some("white".into()),
    }
}

fn request(items: Vec<CheckoutItem>) -> PlaceOrderRequest {
    PlaceOrderRequest {
        customer: buyer(),
        items,
        pricing: None,
        payment_method: "upi".into(),
    }
}

fn item(product_id: Option<Uuid>, quantity: u32) -> CheckoutItem {
    CheckoutItem {
        product_id,
        quantity,
        price: Decimal::from(100),
        ..CheckoutItem::default()
    }
}

#[test]
fn cart_becomes_an_order_request() {
    let mut cart = CartStore::new(PersistedStorage::in_memory());
    let kurta = Uuid::new_v4();
    cart.add_item(cart_item(kurta, 1800, 2, "M"));
    cart.add_item(cart_item(kurta, 1800, 1, "L"));

    let req = PlaceOrderRequest::from_cart(&cart, buyer(), "card");
    assert_eq!(req.items.len(), 2);
    assert_eq!(req.items[0].product_id, Some(kurta));
    assert_eq!(req.items[0].size.as_deref(), Some("M"));
    assert_eq!(req.items[1].color.as_deref(), Some("white"));
    assert_eq!(req.payment_method, "card");
    assert!(req.pricing.is_none());

    let pricing = OrderPricing::from_items(&req.items);
    assert_eq!(pricing.subtotal, cart.total_price());
    assert_eq!(pricing.total, Decimal::from(1800 * 3));
    assert_eq!(pricing.tax, Decimal::ZERO);
}

#[tokio::test]
async fn missing_customer_fields_are_rejected() {
    let state = offline_state();
    for customer in [
        CheckoutCustomer {
            email: String::new(),
            ..buyer()
        },
        CheckoutCustomer {
            name: "   ".into(),
            ..buyer()
        },
        CheckoutCustomer {
            address: String::new(),
            ..buyer()
        },
    ] {
        let req = PlaceOrderRequest {
            customer,
            ..request(vec![item(Some(Uuid::new_v4()), 1)])
        };
        let result = order_service::place_order(&state, req).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}

#[tokio::test]
async fn empty_order_is_rejected() {
    let result = order_service::place_order(&offline_state(), request(Vec::new())).await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));
}

#[tokio::test]
async fn item_without_product_id_is_rejected() {
    let req = request(vec![item(Some(Uuid::new_v4()), 1), item(None, 1)]);
    match order_service::place_order(&offline_state(), req).await {
        Err(AppError::BadRequest(message)) => assert!(message.contains("productId")),
        other => panic!("expected a bad request, got {other:?}"),
    }
}

#[tokio::test]
async fn zero_quantity_and_negative_amounts_are_rejected() {
    let state = offline_state();

    let zero = request(vec![item(Some(Uuid::new_v4()), 0)]);
    assert!(matches!(
        order_service::place_order(&state, zero).await,
        Err(AppError::BadRequest(_))
    ));

    let pricing = OrderPricing {
        subtotal: Decimal::from(100),
        shipping: Decimal::ZERO,
        tax: Decimal::ZERO,
        total: Decimal::from(-100),
    };
    let refund_as_order = request(vec![item(Some(Uuid::new_v4()), 1)]).with_pricing(pricing);
    assert!(matches!(
        order_service::place_order(&state, refund_as_order).await,
        Err(AppError::BadRequest(_))
    ));
}
