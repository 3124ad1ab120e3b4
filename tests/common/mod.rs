#![allow(dead_code)]

use apparel_storefront::models::{
    Customer, Order, OrderItem, OrderStatus, PaymentStatus, Product, ProductCategory,
    ProductStatus,
};
use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

pub fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0)
        .single()
        .expect("valid fixture date")
}

pub fn product(name: &str, category: ProductCategory, price: i64, stock: u32) -> Product {
    let created_at = at(2024, 1, 1);
    Product {
        id: Uuid::new_v4(),
        name: name.to_string(),
        description: String::new(),
        price: Decimal::from(price),
        compare_price: None,
        images: Vec::new(),
        category,
        subcategory: None,
        tags: Vec::new(),
        stock,
        sku: None,
        featured: false,
        status: ProductStatus::Active,
        created_at,
        updated_at: created_at,
    }
}

pub fn customer(full_name: Option<&str>, email: Option<&str>) -> Customer {
    Customer {
        id: Uuid::new_v4(),
        full_name: full_name.map(str::to_string),
        email: email.map(str::to_string),
    }
}

pub fn line(product: &Product, quantity: u32) -> OrderItem {
    OrderItem {
        id: Uuid::new_v4(),
        product_id: product.id,
        quantity,
        price: product.price,
        size: None,
        color: None,
    }
}

pub fn order(
    customer: Option<Customer>,
    items: Vec<OrderItem>,
    total: i64,
    created_at: DateTime<Utc>,
) -> Order {
    Order {
        id: Uuid::new_v4(),
        customer_id: customer.as_ref().map(|c| c.id),
        customer,
        items,
        subtotal: Decimal::from(total),
        tax: Decimal::ZERO,
        shipping: Decimal::ZERO,
        total: Decimal::from(total),
        status: OrderStatus::Pending,
        payment_method: "card".to_string(),
        payment_status: PaymentStatus::Pending,
        tracking_number: None,
        shipping_address: None,
        created_at,
        updated_at: created_at,
    }
}
