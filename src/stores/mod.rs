//! Client state containers: cart, wishlist and the client-held session.
//!
//! Each store owns its state and a [`PersistedStorage`] handle. It hydrates from storage on
//! construction and writes its full state back after every mutation. Separate instances never
//! share state, apart from the storage backend they are given. Two instances writing the same
//! key race with last-write-wins.

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::storage::PersistedStorage;

pub mod auth;
pub mod cart;
pub mod wishlist;

pub use auth::{AuthState, AuthStore, SessionPatch};
pub use cart::{CartLineItem, CartState, CartStore, NewCartItem};
pub use wishlist::{NewWishlistItem, WishlistEntry, WishlistState, WishlistStore};

pub const CART_STORAGE_KEY: &str = "cart-storage";
pub const WISHLIST_STORAGE_KEY: &str = "wishlist-storage";
pub const AUTH_STORAGE_KEY: &str = "auth-storage";

const STATE_VERSION: u32 = 0;

/// On-disk envelope around a store's state.
#[derive(Debug, Serialize, Deserialize)]
pub struct Persisted<S> {
    pub state: S,
    #[serde(default)]
    pub version: u32,
}

pub(crate) fn hydrate<S>(storage: &PersistedStorage, key: &str) -> S
where
    S: DeserializeOwned + Default,
{
    match storage.load::<Persisted<S>>(key) {
        Some(envelope) => {
            tracing::debug!(key, version = envelope.version, "hydrated store");
            envelope.state
        }
        None => S::default(),
    }
}

pub(crate) fn persist<S: Serialize>(storage: &PersistedStorage, key: &str, state: &S) {
    storage.set(
        key,
        &Persisted {
            state,
            version: STATE_VERSION,
        },
    );
}

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
