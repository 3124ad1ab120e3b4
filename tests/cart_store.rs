use apparel_storefront::{
    storage::PersistedStorage,
    stores::{CART_STORAGE_KEY, CartStore, NewCartItem},
};
use rust_decimal::Decimal;
use uuid::Uuid;

fn item(product_id: Uuid, price: i64, quantity: u32) -> NewCartItem {
    NewCartItem {
        product_id,
        name: "Banarasi Silk Saree".into(),
        price: Decimal::from(price),
        image: "/img/saree.jpg".into(),
        quantity,
        sku: None,
        size: None,
        color: None,
    }
}

fn sized(product_id: Uuid, size: &str, color: &str, quantity: u32) -> NewCartItem {
    NewCartItem {
        size: Some(size.into()),
        color: Some(color.into()),
        ..item(product_id, 1000, quantity)
    }
}

#[test]
fn identical_variants_merge_into_one_line() {
    let mut cart = CartStore::new(PersistedStorage::in_memory());
    let product_id = Uuid::new_v4();

    cart.add_item(sized(product_id, "M", "red", 2));
    cart.add_item(sized(product_id, "M", "red", 3));

    assert_eq!(cart.items().len(), 1);
    assert_eq!(cart.items()[0].quantity, 5);
    assert_eq!(cart.total_items(), 5);
}

#[test]
fn different_size_or_colour_stays_separate() {
    let mut cart = CartStore::new(PersistedStorage::in_memory());
    let product_id = Uuid::new_v4();

    cart.add_item(sized(product_id, "M", "red", 1));
    cart.add_item(sized(product_id, "L", "red", 1));
    cart.add_item(sized(product_id, "M", "blue", 1));

    assert_eq!(cart.items().len(), 3);
    assert!(cart.find_item(product_id, Some("L"), Some("red")).is_some());
    assert!(cart.find_item(product_id, Some("S"), Some("red")).is_none());
}

#[test]
fn total_uses_the_price_captured_at_add_time() {
    let mut cart = CartStore::new(PersistedStorage::in_memory());
    let saree = Uuid::new_v4();
    let dupatta = Uuid::new_v4();

    cart.add_item(item(saree, 1200, 2));
    // Same product re-added at a newer live price; the line keeps its snapshot.
    cart.add_item(item(saree, 1500, 1));
    cart.add_item(item(dupatta, 300, 1));

    assert_eq!(cart.items()[0].price, Decimal::from(1200));
    assert_eq!(cart.total_price(), Decimal::from(1200 * 3 + 300));

    let id = cart.items()[1].id.clone();
    cart.update_quantity(&id, 4);
    assert_eq!(cart.total_price(), Decimal::from(1200 * 3 + 300 * 4));
}

#[test]
fn non_positive_quantity_removes_the_line() {
    let mut cart = CartStore::new(PersistedStorage::in_memory());
    cart.add_item(item(Uuid::new_v4(), 100, 1));
    cart.add_item(item(Uuid::new_v4(), 200, 1));

    let first = cart.items()[0].id.clone();
    let second = cart.items()[1].id.clone();
    cart.update_quantity(&first, 0);
    cart.update_quantity(&second, -5);

    assert!(cart.items().is_empty());
    assert_eq!(cart.total_price(), Decimal::ZERO);
}

#[test]
fn zero_quantity_add_is_ignored() {
    let mut cart = CartStore::new(PersistedStorage::in_memory());
    cart.add_item(item(Uuid::new_v4(), 100, 0));
    assert!(cart.items().is_empty());
}

#[test]
fn unknown_ids_are_ignored() {
    let mut cart = CartStore::new(PersistedStorage::in_memory());
    cart.add_item(item(Uuid::new_v4(), 100, 2));

    cart.remove_item("no-such-line");
    cart.update_quantity("no-such-line", 7);

    assert_eq!(cart.total_items(), 2);
}

#[test]
fn toggle_and_clear() {
    let mut cart = CartStore::new(PersistedStorage::in_memory());
    assert!(!cart.is_open());
    cart.toggle_cart();
    assert!(cart.is_open());

    cart.add_item(item(Uuid::new_v4(), 100, 1));
    cart.clear_cart();
    assert!(cart.items().is_empty());
    assert!(cart.is_open());
}

#[test]
fn state_survives_a_new_store_on_the_same_storage() {
    let storage = PersistedStorage::in_memory();
    let product_id = Uuid::new_v4();
    {
        let mut cart = CartStore::new(storage.clone());
        cart.add_item(sized(product_id, "M", "red", 2));
        cart.toggle_cart();
    }

    let rehydrated = CartStore::new(storage.clone());
    assert_eq!(rehydrated.total_items(), 2);
    assert!(rehydrated.is_open());

    let envelope = storage.get(CART_STORAGE_KEY).expect("persisted envelope");
    assert!(envelope.get("state").is_some());
    assert!(envelope.get("version").is_some());
}

#[test]
fn works_without_persistence() {
    let mut cart = CartStore::new(PersistedStorage::unavailable());
    cart.add_item(item(Uuid::new_v4(), 100, 3));
    assert_eq!(cart.total_items(), 3);
}

#[test]
fn every_mutation_is_visible_after_reload() {
    let storage = PersistedStorage::in_memory();
    let mut cart = CartStore::new(storage.clone());
    cart.add_item(item(Uuid::new_v4(), 100, 1));
    cart.add_item(item(Uuid::new_v4(), 200, 1));
    cart.add_item(item(Uuid::new_v4(), 300, 1));
    let first = cart.items()[0].id.clone();
    let second = cart.items()[1].id.clone();

    cart.remove_item(&first);
    let reloaded = CartStore::new(storage.clone());
    assert_eq!(reloaded.items().len(), 2);
    assert!(reloaded.items().iter().all(|line| line.id != first));

    cart.update_quantity(&second, 7);
    let reloaded = CartStore::new(storage.clone());
    assert_eq!(reloaded.items()[0].quantity, 7);
    assert_eq!(reloaded.total_price(), Decimal::from(200 * 7 + 300));

    cart.update_quantity(&second, 0);
    assert_eq!(CartStore::new(storage.clone()).items().len(), 1);

    cart.clear_cart();
    assert!(CartStore::new(storage).items().is_empty());
}

#[test]
fn totals_saturate_instead_of_overflowing() {
    let mut cart = CartStore::new(PersistedStorage::in_memory());
    cart.add_item(NewCartItem {
        price: Decimal::MAX,
        ..item(Uuid::new_v4(), 0, 2)
    });
    cart.add_item(item(Uuid::new_v4(), 100, 1));

    assert_eq!(cart.items()[0].line_total(), Decimal::MAX);
    assert_eq!(cart.total_price(), Decimal::MAX);
}
