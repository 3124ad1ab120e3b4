use std::collections::{HashMap, HashSet};

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use uuid::Uuid;

use crate::{
    dto::orders::{CheckoutItem, OrderPricing, PlaceOrderRequest},
    entity::customers::{self, Entity as Customers},
    entity::order_items::{self, Entity as OrderItems},
    entity::orders::{self, Entity as Orders},
    entity::products::{self, Entity as Products},
    error::{AppError, AppResult},
    models::{Customer, Order, OrderItem, OrderStatus, PaymentStatus},
    state::AppState,
};

struct CheckoutLine {
    product_id: Uuid,
    quantity: i32,
    price: Decimal,
    size: Option<String>,
    color: Option<String>,
}

fn checkout_line(item: CheckoutItem) -> AppResult<CheckoutLine> {
    let Some(product_id) = item.product_id else {
        return Err(AppError::BadRequest(
            "Some items are missing productId".to_string(),
        ));
    };
    let quantity = i32::try_from(item.quantity)
        .ok()
        .filter(|quantity| *quantity > 0)
        .ok_or_else(|| AppError::BadRequest(format!("invalid quantity for product {product_id}")))?;
    if item.price.is_sign_negative() {
        return Err(AppError::BadRequest(format!(
            "invalid price for product {product_id}"
        )));
    }
    Ok(CheckoutLine {
        product_id,
        quantity,
        price: item.price,
        size: item.size.filter(|s| !s.is_empty()),
        color: item.color.filter(|c| !c.is_empty()),
    })
}

/// Places an order for the customer with the given email, creating the customer on first
/// purchase. Everything is written in one transaction; a failure leaves nothing behind.
pub async fn place_order(state: &AppState, payload: PlaceOrderRequest) -> AppResult<Order> {
    let name = payload.customer.name.trim().to_string();
    let email = payload.customer.email.trim().to_lowercase();
    let address = payload.customer.address.trim().to_string();
    if name.is_empty() || email.is_empty() || address.is_empty() || payload.items.is_empty() {
        return Err(AppError::BadRequest(
            "Missing required fields: email, name, address, or items".to_string(),
        ));
    }

    let pricing = payload
        .pricing
        .unwrap_or_else(|| OrderPricing::from_items(&payload.items));
    if pricing.is_negative() {
        return Err(AppError::BadRequest("order amounts must not be negative".to_string()));
    }
    let lines = payload
        .items
        .into_iter()
        .map(checkout_line)
        .collect::<AppResult<Vec<_>>>()?;

    let txn = state.orm.begin().await?;

    let product_ids: HashSet<Uuid> = lines.iter().map(|line| line.product_id).collect();
    let known = Products::find()
        .filter(products::Column::Id.is_in(product_ids.iter().copied()))
        .count(&txn)
        .await?;
    if known != product_ids.len() as u64 {
        return Err(AppError::BadRequest(
            "Some items reference products that do not exist".to_string(),
        ));
    }

    let now = Utc::now().fixed_offset();
    let customer = match Customers::find()
        .filter(customers::Column::Email.eq(email.as_str()))
        .one(&txn)
        .await?
    {
        Some(customer) => customer,
        None => {
            let customer = customers::ActiveModel {
                id: Set(Uuid::new_v4()),
                full_name: Set(Some(name)),
                email: Set(Some(email)),
                created_at: Set(now),
            }
            .insert(&txn)
            .await?;
            tracing::info!(customer_id = %customer.id, "customer created at checkout");
            customer
        }
    };

    let order = orders::ActiveModel {
        id: Set(Uuid::new_v4()),
        customer_id: Set(Some(customer.id)),
        subtotal: Set(pricing.subtotal),
        tax: Set(pricing.tax),
        shipping_cost: Set(pricing.shipping),
        total: Set(pricing.total),
        status: Set(OrderStatus::Pending.as_str().to_string()),
        payment_method: Set(payload.payment_method),
        payment_status: Set(PaymentStatus::Pending.as_str().to_string()),
        tracking_number: Set(None),
        shipping_address: Set(Some(address)),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&txn)
    .await?;

    let mut items = Vec::with_capacity(lines.len());
    for line in lines {
        let item = order_items::ActiveModel {
            id: Set(Uuid::new_v4()),
            order_id: Set(order.id),
            product_id: Set(line.product_id),
            quantity: Set(line.quantity),
            price: Set(line.price),
            size: Set(line.size),
            color: Set(line.color),
        }
        .insert(&txn)
        .await?;
        items.push(order_item_from_entity(item));
    }

    txn.commit().await?;
    tracing::info!(
        order_id = %order.id,
        customer_id = %customer.id,
        items = items.len(),
        total = %order.total,
        "order placed"
    );

    Ok(order_from_entity(order, Some(customer), items))
}

/// All orders, newest first, each with its customer (if any) and line items.
pub async fn list_orders(state: &AppState) -> AppResult<Vec<Order>> {
    let rows = Orders::find()
        .find_also_related(Customers)
        .order_by_desc(orders::Column::CreatedAt)
        .all(&state.orm)
        .await?;

    let ids: Vec<Uuid> = rows.iter().map(|(order, _)| order.id).collect();
    let mut items_by_order: HashMap<Uuid, Vec<OrderItem>> = HashMap::new();
    if !ids.is_empty() {
        let items = OrderItems::find()
            .filter(order_items::Column::OrderId.is_in(ids))
            .all(&state.orm)
            .await?;
        for item in items {
            items_by_order
                .entry(item.order_id)
                .or_default()
                .push(order_item_from_entity(item));
        }
    }

    Ok(rows
        .into_iter()
        .map(|(order, customer)| {
            let items = items_by_order.remove(&order.id).unwrap_or_default();
            order_from_entity(order, customer, items)
        })
        .collect())
}

fn order_from_entity(
    model: orders::Model,
    customer: Option<customers::Model>,
    items: Vec<OrderItem>,
) -> Order {
    Order {
        id: model.id,
        customer_id: model.customer_id,
        customer: customer.map(|c| Customer {
            id: c.id,
            full_name: c.full_name,
            email: c.email,
        }),
        items,
        subtotal: model.subtotal,
        tax: model.tax,
        shipping: model.shipping_cost,
        total: model.total,
        status: OrderStatus::from_db(&model.status),
        payment_method: model.payment_method,
        payment_status: PaymentStatus::from_db(&model.payment_status),
        tracking_number: model.tracking_number,
        shipping_address: model.shipping_address,
        created_at: model.created_at.to_utc(),
        updated_at: model.updated_at.to_utc(),
    }
}

fn order_item_from_entity(model: order_items::Model) -> OrderItem {
    OrderItem {
        id: model.id,
        product_id: model.product_id,
        quantity: u32::try_from(model.quantity).unwrap_or(0),
        price: model.price,
        size: model.size,
        color: model.color,
    }
}
