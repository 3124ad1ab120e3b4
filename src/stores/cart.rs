use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::storage::PersistedStorage;

use super::{CART_STORAGE_KEY, hydrate, new_id, persist};

/// Item to add. The price is a snapshot taken at add time and never re-read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCartItem {
    pub product_id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub image: String,
    pub quantity: u32,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    pub id: String,
    pub product_id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub image: String,
    pub quantity: u32,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

impl CartLineItem {
    fn from_new(item: NewCartItem) -> Self {
        Self {
            id: new_id(),
            product_id: item.product_id,
            name: item.name,
            price: item.price,
            image: item.image,
            quantity: item.quantity,
            sku: item.sku,
            size: item.size,
            color: item.color,
        }
    }

    fn matches(&self, product_id: Uuid, size: Option<&str>, color: Option<&str>) -> bool {
        self.product_id == product_id
            && self.size.as_deref() == size
            && self.color.as_deref() == color
    }

    /// Saturates at `Decimal::MAX` instead of overflowing.
    pub fn line_total(&self) -> Decimal {
        self.price.saturating_mul(Decimal::from(self.quantity))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartState {
    #[serde(default)]
    pub items: Vec<CartLineItem>,
    #[serde(default)]
    pub is_open: bool,
}

#[derive(Debug)]
pub struct CartStore {
    storage: PersistedStorage,
    state: CartState,
}

impl CartStore {
    pub fn new(storage: PersistedStorage) -> Self {
        let state = hydrate(&storage, CART_STORAGE_KEY);
        Self { storage, state }
    }

    pub fn state(&self) -> &CartState {
        &self.state
    }

    pub fn items(&self) -> &[CartLineItem] {
        &self.state.items
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open
    }

    pub fn find_item(
        &self,
        product_id: Uuid,
        size: Option<&str>,
        color: Option<&str>,
    ) -> Option<&CartLineItem> {
        self.state
            .items
            .iter()
            .find(|line| line.matches(product_id, size, color))
    }

    /// Adds `item`, or bumps the quantity of the line with the same product, size and colour.
    pub fn add_item(&mut self, item: NewCartItem) {
        if item.quantity == 0 {
            tracing::debug!(product_id = %item.product_id, "ignoring zero-quantity cart add");
            return;
        }

        let existing = self.state.items.iter_mut().find(|line| {
            line.matches(item.product_id, item.size.as_deref(), item.color.as_deref())
        });
        match existing {
            Some(line) => line.quantity = line.quantity.saturating_add(item.quantity),
            None => self.state.items.push(CartLineItem::from_new(item)),
        }
        self.save();
    }

    pub fn remove_item(&mut self, id: &str) {
        self.state.items.retain(|line| line.id != id);
        self.save();
    }

    /// Replaces a line's quantity. Zero or negative removes the line.
    pub fn update_quantity(&mut self, id: &str, quantity: i64) {
        if quantity <= 0 {
            self.remove_item(id);
            return;
        }
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        if let Some(line) = self.state.items.iter_mut().find(|line| line.id == id) {
            line.quantity = quantity;
        }
        self.save();
    }

    pub fn clear_cart(&mut self) {
        self.state.items.clear();
        self.save();
    }

    pub fn toggle_cart(&mut self) {
        self.state.is_open = !self.state.is_open;
        self.save();
    }

    /// Badge count: the sum of line quantities.
    pub fn total_items(&self) -> u64 {
        self.state
            .items
            .iter()
            .map(|line| u64::from(line.quantity))
            .sum()
    }

    pub fn total_price(&self) -> Decimal {
        self.state
            .items
            .iter()
            .map(CartLineItem::line_total)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    fn save(&self) {
        persist(&self.storage, CART_STORAGE_KEY, &self.state);
    }
}
