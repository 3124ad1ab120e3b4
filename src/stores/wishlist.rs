use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::storage::PersistedStorage;

use super::{WISHLIST_STORAGE_KEY, hydrate, new_id, persist};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWishlistItem {
    pub product_id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub image: String,
    #[serde(default)]
    pub sku: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistEntry {
    pub id: String,
    pub product_id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub image: String,
    #[serde(default)]
    pub sku: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WishlistState {
    #[serde(default)]
    pub items: Vec<WishlistEntry>,
}

#[derive(Debug)]
pub struct WishlistStore {
    storage: PersistedStorage,
    state: WishlistState,
}

impl WishlistStore {
    pub fn new(storage: PersistedStorage) -> Self {
        let state = hydrate(&storage, WISHLIST_STORAGE_KEY);
        Self { storage, state }
    }

    pub fn items(&self) -> &[WishlistEntry] {
        &self.state.items
    }

    pub fn len(&self) -> usize {
        self.state.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.items.is_empty()
    }

    /// Adds an entry unless the product is already saved.
    pub fn add_item(&mut self, item: NewWishlistItem) {
        if self.is_in_wishlist(item.product_id) {
            return;
        }
        self.state.items.push(WishlistEntry {
            id: new_id(),
            product_id: item.product_id,
            name: item.name,
            price: item.price,
            image: item.image,
            sku: item.sku,
            created_at: Utc::now(),
        });
        self.save();
    }

    pub fn remove_item(&mut self, product_id: Uuid) {
        self.state
            .items
            .retain(|entry| entry.product_id != product_id);
        self.save();
    }

    pub fn is_in_wishlist(&self, product_id: Uuid) -> bool {
        self.state
            .items
            .iter()
            .any(|entry| entry.product_id == product_id)
    }

    /// Heart-button behaviour. Returns whether the product is saved afterwards.
    pub fn toggle(&mut self, item: NewWishlistItem) -> bool {
        if self.is_in_wishlist(item.product_id) {
            self.remove_item(item.product_id);
            false
        } else {
            self.add_item(item);
            true
        }
    }

    pub fn clear_wishlist(&mut self) {
        self.state.items.clear();
        self.save();
    }

    fn save(&self) {
        persist(&self.storage, WISHLIST_STORAGE_KEY, &self.state);
    }
}
