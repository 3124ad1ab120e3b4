use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::stores::{CartLineItem, CartStore};

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct CheckoutCustomer {
    pub name: String,
    pub email: String,
    /// Free-form shipping address, stored on the order as given.
    pub address: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct CheckoutItem {
    pub product_id: Option<Uuid>,
    pub quantity: u32,
    /// Unit price captured when the item went into the cart.
    pub price: Decimal,
    pub size: Option<String>,
    pub color: Option<String>,
}

impl From<&CartLineItem> for CheckoutItem {
    fn from(line: &CartLineItem) -> Self {
        Self {
            product_id: Some(line.product_id),
            quantity: line.quantity,
            price: line.price,
            size: line.size.clone(),
            color: line.color.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct OrderPricing {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl OrderPricing {
    /// Subtotal from the item snapshots, with no shipping or tax.
    pub fn from_items(items: &[CheckoutItem]) -> Self {
        let subtotal = items
            .iter()
            .map(|item| item.price.saturating_mul(Decimal::from(item.quantity)))
            .fold(Decimal::ZERO, Decimal::saturating_add);
        Self {
            subtotal,
            total: subtotal,
            ..Self::default()
        }
    }

    pub fn is_negative(&self) -> bool {
        [self.subtotal, self.shipping, self.tax, self.total]
            .iter()
            .any(Decimal::is_sign_negative)
    }
}

/// Checkout payload. Without `pricing` the server prices the order from the item snapshots.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub customer: CheckoutCustomer,
    pub items: Vec<CheckoutItem>,
    pub pricing: Option<OrderPricing>,
    pub payment_method: String,
}

impl PlaceOrderRequest {
    pub fn from_cart(
        cart: &CartStore,
        customer: CheckoutCustomer,
        payment_method: impl Into<String>,
    ) -> Self {
        Self {
            customer,
            items: cart.items().iter().map(CheckoutItem::from).collect(),
            pricing: None,
            payment_method: payment_method.into(),
        }
    }

    pub fn with_pricing(mut self, pricing: OrderPricing) -> Self {
        self.pricing = Some(pricing);
        self
    }
}
