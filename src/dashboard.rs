//! Admin dashboard aggregates derived from the raw order and product collections.
//!
//! The `compute_*` functions are pure and take the reference instant explicitly. [`Dashboard`]
//! fetches through a [`DashboardSource`] and never fails: fetch errors are logged and replaced by
//! zeroed or empty results.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Utc};
use indexmap::IndexMap;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Order, OrderStatus, Product, ProductCategory};

pub const RECENT_ORDER_LIMIT: usize = 5;
pub const TOP_PRODUCT_LIMIT: usize = 5;
pub const SALES_MONTHS: u32 = 6;

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
const CHART_COLORS: [&str; 7] = [
    "#3B82F6", "#10B981", "#F59E0B", "#EF4444", "#8B5CF6", "#06B6D4", "#F97316",
];
const GUEST_CUSTOMER: &str = "Guest Customer";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_revenue: Decimal,
    pub total_orders: usize,
    pub total_customers: usize,
    pub conversion_rate: f64,
    pub revenue_growth: f64,
    pub orders_growth: f64,
    pub customers_growth: f64,
    pub conversion_growth: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MonthlySales {
    pub month: String,
    pub sales: Decimal,
    pub orders: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CategoryShare {
    pub name: String,
    /// Percentage of all sold units, rounded to the nearest integer.
    pub value: u32,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TopProduct {
    pub id: Uuid,
    pub name: String,
    pub sales: u64,
    pub revenue: Decimal,
    pub stock: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RecentOrder {
    pub id: Uuid,
    pub customer: String,
    pub amount: Decimal,
    pub status: OrderStatus,
    pub date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOverview {
    pub stats: DashboardStats,
    pub sales: Vec<MonthlySales>,
    pub categories: Vec<CategoryShare>,
    pub top_products: Vec<TopProduct>,
    pub recent_orders: Vec<RecentOrder>,
}

/// Month-over-month growth in percent. A zero baseline reports 0 rather than infinity.
pub fn growth(current: f64, previous: f64) -> f64 {
    if previous > 0.0 {
        (current - previous) / previous * 100.0
    } else {
        0.0
    }
}

type MonthKey = (i32, u32);

fn month_of(date: DateTime<Utc>) -> MonthKey {
    (date.year(), date.month())
}

fn months_back((year, month): MonthKey, back: u32) -> MonthKey {
    let index = year * 12 + month as i32 - 1 - back as i32;
    (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}

fn revenue<'a>(orders: impl IntoIterator<Item = &'a Order>) -> Decimal {
    orders.into_iter().map(|order| order.total).sum()
}

fn unique_customers<'a>(orders: impl IntoIterator<Item = &'a Order>) -> usize {
    orders
        .into_iter()
        .map(Order::customer_key)
        .collect::<HashSet<_>>()
        .len()
}

fn conversion(orders: usize, customers: usize) -> f64 {
    if customers > 0 {
        orders as f64 / customers as f64 * 100.0
    } else {
        0.0
    }
}

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

/// Headline stats for the calendar month containing `now` against the month before it.
pub fn compute_stats(orders: &[Order], now: DateTime<Utc>) -> DashboardStats {
    let current_key = month_of(now);
    let previous_key = months_back(current_key, 1);

    let current: Vec<&Order> = orders
        .iter()
        .filter(|order| month_of(order.created_at) == current_key)
        .collect();
    let previous: Vec<&Order> = orders
        .iter()
        .filter(|order| month_of(order.created_at) == previous_key)
        .collect();

    let total_customers = unique_customers(orders);
    let current_customers = unique_customers(current.iter().copied());
    let previous_customers = unique_customers(previous.iter().copied());

    let current_conversion = conversion(current.len(), current_customers);
    let previous_conversion = conversion(previous.len(), previous_customers);

    DashboardStats {
        total_revenue: revenue(orders),
        total_orders: orders.len(),
        total_customers,
        conversion_rate: conversion(orders.len(), total_customers),
        revenue_growth: growth(
            to_f64(revenue(current.iter().copied())),
            to_f64(revenue(previous.iter().copied())),
        ),
        orders_growth: growth(current.len() as f64, previous.len() as f64),
        customers_growth: growth(current_customers as f64, previous_customers as f64),
        conversion_growth: growth(current_conversion, previous_conversion),
    }
}

/// Revenue and order count for the last `months` calendar months, oldest first.
pub fn compute_sales_by_month(
    orders: &[Order],
    now: DateTime<Utc>,
    months: u32,
) -> Vec<MonthlySales> {
    let current_key = month_of(now);
    (0..months)
        .rev()
        .map(|back| {
            let key = months_back(current_key, back);
            let in_month: Vec<&Order> = orders
                .iter()
                .filter(|order| month_of(order.created_at) == key)
                .collect();
            MonthlySales {
                month: MONTH_NAMES[(key.1 - 1) as usize].to_string(),
                sales: revenue(in_month.iter().copied()),
                orders: in_month.len(),
            }
        })
        .collect()
}

/// Share of sold units per product category, largest first. Items whose product is unknown are
/// skipped.
pub fn compute_category_distribution(orders: &[Order], products: &[Product]) -> Vec<CategoryShare> {
    let by_id: HashMap<Uuid, &Product> = products.iter().map(|p| (p.id, p)).collect();

    let mut tally: IndexMap<ProductCategory, u64> = IndexMap::new();
    for item in orders.iter().flat_map(|order| order.items.iter()) {
        if let Some(product) = by_id.get(&item.product_id) {
            *tally.entry(product.category).or_default() += u64::from(item.quantity);
        }
    }

    let total: u64 = tally.values().sum();
    let mut shares: Vec<CategoryShare> = tally
        .into_iter()
        .enumerate()
        .map(|(index, (category, count))| CategoryShare {
            name: category.as_str().to_string(),
            value: if total > 0 {
                (count as f64 / total as f64 * 100.0).round() as u32
            } else {
                0
            },
            color: CHART_COLORS[index % CHART_COLORS.len()].to_string(),
        })
        .collect();
    shares.sort_by(|a, b| b.value.cmp(&a.value));
    shares
}

/// Best sellers by units across all orders, annotated with current stock.
pub fn compute_top_products(
    orders: &[Order],
    products: &[Product],
    limit: usize,
) -> Vec<TopProduct> {
    let mut tally: HashMap<Uuid, (u64, Decimal)> = HashMap::new();
    for item in orders.iter().flat_map(|order| order.items.iter()) {
        let entry = tally.entry(item.product_id).or_default();
        entry.0 += u64::from(item.quantity);
        entry.1 += item.price * Decimal::from(item.quantity);
    }

    let mut ranked: Vec<TopProduct> = products
        .iter()
        .map(|product| {
            let (sales, revenue) = tally.get(&product.id).copied().unwrap_or_default();
            TopProduct {
                id: product.id,
                name: product.name.clone(),
                sales,
                revenue,
                stock: product.stock,
            }
        })
        .collect();
    ranked.sort_by(|a, b| b.sales.cmp(&a.sales));
    ranked.truncate(limit);
    ranked
}

pub fn compute_recent_orders(orders: &[Order], limit: usize) -> Vec<RecentOrder> {
    let mut newest: Vec<&Order> = orders.iter().collect();
    newest.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    newest
        .into_iter()
        .take(limit)
        .map(|order| RecentOrder {
            id: order.id,
            customer: customer_label(order),
            amount: order.total,
            status: order.status,
            date: order.created_at.format("%d/%m/%Y").to_string(),
        })
        .collect()
}

fn customer_label(order: &Order) -> String {
    let customer = order.customer.as_ref();
    customer
        .and_then(|c| c.full_name.as_deref())
        .filter(|name| !name.is_empty())
        .or_else(|| {
            customer
                .and_then(|c| c.email.as_deref())
                .filter(|email| !email.is_empty())
        })
        .unwrap_or(GUEST_CUSTOMER)
        .to_string()
}

pub fn compute_overview(
    orders: &[Order],
    products: &[Product],
    now: DateTime<Utc>,
) -> DashboardOverview {
    DashboardOverview {
        stats: compute_stats(orders, now),
        sales: compute_sales_by_month(orders, now, SALES_MONTHS),
        categories: compute_category_distribution(orders, products),
        top_products: compute_top_products(orders, products, TOP_PRODUCT_LIMIT),
        recent_orders: compute_recent_orders(orders, RECENT_ORDER_LIMIT),
    }
}

/// Where the dashboard reads its raw collections from.
#[async_trait]
pub trait DashboardSource: Send + Sync {
    async fn fetch_orders(&self) -> anyhow::Result<Vec<Order>>;
    async fn fetch_products(&self) -> anyhow::Result<Vec<Product>>;
}

#[derive(Debug, Clone)]
pub struct Dashboard<S> {
    source: S,
}

impl<S: DashboardSource> Dashboard<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    async fn fetch_orders(&self) -> Option<Vec<Order>> {
        match self.source.fetch_orders().await {
            Ok(orders) => Some(orders),
            Err(err) => {
                tracing::error!(error = %err, "dashboard failed to fetch orders");
                None
            }
        }
    }

    async fn fetch_all(&self) -> Option<(Vec<Order>, Vec<Product>)> {
        match tokio::try_join!(self.source.fetch_orders(), self.source.fetch_products()) {
            Ok(pair) => Some(pair),
            Err(err) => {
                tracing::error!(error = %err, "dashboard failed to fetch orders and products");
                None
            }
        }
    }

    pub async fn stats(&self) -> DashboardStats {
        self.fetch_orders()
            .await
            .map(|orders| compute_stats(&orders, Utc::now()))
            .unwrap_or_default()
    }

    pub async fn sales_data(&self) -> Vec<MonthlySales> {
        self.fetch_orders()
            .await
            .map(|orders| compute_sales_by_month(&orders, Utc::now(), SALES_MONTHS))
            .unwrap_or_default()
    }

    pub async fn category_data(&self) -> Vec<CategoryShare> {
        self.fetch_all()
            .await
            .map(|(orders, products)| compute_category_distribution(&orders, &products))
            .unwrap_or_default()
    }

    pub async fn recent_orders(&self) -> Vec<RecentOrder> {
        self.fetch_orders()
            .await
            .map(|orders| compute_recent_orders(&orders, RECENT_ORDER_LIMIT))
            .unwrap_or_default()
    }

    pub async fn top_products(&self) -> Vec<TopProduct> {
        self.fetch_all()
            .await
            .map(|(orders, products)| compute_top_products(&orders, &products, TOP_PRODUCT_LIMIT))
            .unwrap_or_default()
    }

    /// Everything at once, from a single pair of concurrent fetches.
    pub async fn overview(&self) -> DashboardOverview {
        self.fetch_all()
            .await
            .map(|(orders, products)| compute_overview(&orders, &products, Utc::now()))
            .unwrap_or_default()
    }
}
