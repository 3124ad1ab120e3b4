use apparel_storefront::{
    storage::PersistedStorage,
    stores::{NewWishlistItem, WishlistStore},
};
use rust_decimal::Decimal;
use uuid::Uuid;

fn item(product_id: Uuid) -> NewWishlistItem {
    NewWishlistItem {
        product_id,
        name: "Phulkari Dupatta".into(),
        price: Decimal::from(1299),
        image: "/img/dupatta.jpg".into(),
        sku: Some("DUP-001".into()),
    }
}

#[test]
fn adding_twice_keeps_one_entry() {
    let mut wishlist = WishlistStore::new(PersistedStorage::in_memory());
    let product_id = Uuid::new_v4();

    wishlist.add_item(item(product_id));
    wishlist.add_item(item(product_id));

    assert_eq!(wishlist.len(), 1);
    assert!(wishlist.is_in_wishlist(product_id));

    wishlist.remove_item(product_id);
    assert!(!wishlist.is_in_wishlist(product_id));
    assert!(wishlist.is_empty());
}

#[test]
fn toggle_reports_membership() {
    let mut wishlist = WishlistStore::new(PersistedStorage::in_memory());
    let product_id = Uuid::new_v4();

    assert!(wishlist.toggle(item(product_id)));
    assert!(wishlist.is_in_wishlist(product_id));
    assert!(!wishlist.toggle(item(product_id)));
    assert!(!wishlist.is_in_wishlist(product_id));
}

#[test]
fn clear_and_rehydrate() {
    let storage = PersistedStorage::in_memory();
    let kept = Uuid::new_v4();
    {
        let mut wishlist = WishlistStore::new(storage.clone());
        wishlist.add_item(item(kept));
        wishlist.add_item(item(Uuid::new_v4()));
    }

    let mut wishlist = WishlistStore::new(storage.clone());
    assert_eq!(wishlist.len(), 2);
    assert_eq!(wishlist.items()[0].product_id, kept);

    wishlist.clear_wishlist();
    assert!(WishlistStore::new(storage).is_empty());
}

#[test]
fn entry_timestamp_survives_reload() {
    let storage = PersistedStorage::in_memory();
    let product_id = Uuid::new_v4();
    let mut wishlist = WishlistStore::new(storage.clone());
    wishlist.add_item(item(product_id));
    let saved_at = wishlist.items()[0].created_at;

    let reloaded = WishlistStore::new(storage);
    assert_eq!(reloaded.items()[0].created_at, saved_at);
}

#[test]
fn removal_is_visible_after_reload() {
    let storage = PersistedStorage::in_memory();
    let removed = Uuid::new_v4();
    let kept = Uuid::new_v4();
    let mut wishlist = WishlistStore::new(storage.clone());
    wishlist.add_item(item(removed));
    wishlist.add_item(item(kept));

    wishlist.remove_item(removed);

    let reloaded = WishlistStore::new(storage.clone());
    assert!(!reloaded.is_in_wishlist(removed));
    assert!(reloaded.is_in_wishlist(kept));

    wishlist.toggle(item(kept));
    assert!(WishlistStore::new(storage).is_empty());
}
