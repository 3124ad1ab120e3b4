mod common;

use apparel_storefront::{
    catalog::{
        CatalogQuery, SortMode, all_tags, distinct_categories, distinct_subcategories,
        filter_products, group_by_category, query_catalog, sort_products,
    },
    models::{Category, Product, ProductCategory, ProductStatus},
};
use common::{at, product};
use rust_decimal::Decimal;
use uuid::Uuid;

fn names(products: &[Product]) -> Vec<&str> {
    products.iter().map(|p| p.name.as_str()).collect()
}

fn category(name: &str, slug: &str) -> Category {
    Category {
        id: Uuid::new_v4(),
        name: name.into(),
        slug: slug.into(),
        description: None,
        image: None,
        featured: false,
        order: 0,
        subcategories: Vec::new(),
    }
}

fn two_products() -> Vec<Product> {
    vec![
        product("Red Saree", ProductCategory::Sarees, 500, 0),
        product("Blue Suit", ProductCategory::SuitSets, 1500, 5),
    ]
}

#[test]
fn filters_compose_by_conjunction() {
    let products = two_products();
    let query = CatalogQuery::default()
        .with_search("saree")
        .with_category("")
        .with_price_range(Decimal::ZERO, Decimal::from(10_000));
    assert_eq!(names(&filter_products(&products, &query)), ["Red Saree"]);

    let query = query.in_stock_only(true);
    assert!(filter_products(&products, &query).is_empty());
}

#[test]
fn search_is_case_insensitive_and_respects_min_length() {
    let products = two_products();
    let query = CatalogQuery::default().with_search("BLUE");
    assert_eq!(names(&filter_products(&products, &query)), ["Blue Suit"]);

    let short = CatalogQuery {
        min_search_len: 2,
        ..CatalogQuery::default()
    }
    .with_search("r");
    assert_eq!(filter_products(&products, &short).len(), 2);
}

#[test]
fn all_sentinel_disables_category_filter() {
    let products = two_products();
    let query = CatalogQuery::default().with_category("all");
    assert_eq!(filter_products(&products, &query).len(), 2);

    let query = CatalogQuery::default().with_category("suit-sets");
    assert_eq!(names(&filter_products(&products, &query)), ["Blue Suit"]);
}

#[test]
fn subcategory_filter() {
    let mut silk = product("Silk Saree", ProductCategory::Sarees, 900, 3);
    silk.subcategory = Some("silk".into());
    let mut cotton = product("Cotton Saree", ProductCategory::Sarees, 400, 3);
    cotton.subcategory = Some("cotton".into());
    let products = vec![silk, cotton];

    let query = CatalogQuery::default()
        .with_category("sarees")
        .with_subcategory("silk");
    assert_eq!(names(&filter_products(&products, &query)), ["Silk Saree"]);
    assert_eq!(
        distinct_subcategories(&products, ProductCategory::Sarees),
        ["silk", "cotton"]
    );
}

#[test]
fn price_range_uses_compare_price_when_present() {
    let mut discounted = product("Anarkali", ProductCategory::SuitSets, 800, 2);
    discounted.compare_price = Some(Decimal::from(1200));
    let products = vec![discounted, product("Kurta", ProductCategory::MensCollection, 1000, 2)];

    let query = CatalogQuery::default().with_price_range(Decimal::from(900), Decimal::from(1100));
    assert_eq!(names(&filter_products(&products, &query)), ["Kurta"]);

    let inclusive =
        CatalogQuery::default().with_price_range(Decimal::from(1200), Decimal::from(1200));
    assert_eq!(names(&filter_products(&products, &inclusive)), ["Anarkali"]);
}

#[test]
fn tags_match_any_selected_tag() {
    let mut wedding = product("Zari Potli", ProductCategory::Bags, 900, 1);
    wedding.tags = vec!["wedding".into(), "zari".into()];
    let mut everyday = product("Cotton Tote", ProductCategory::Bags, 500, 1);
    everyday.tags = vec!["everyday".into()];
    let untagged = product("Plain Tote", ProductCategory::Bags, 400, 1);
    let products = vec![wedding, everyday, untagged];

    let query = CatalogQuery::default().with_tags(["wedding", "everyday"]);
    assert_eq!(
        names(&filter_products(&products, &query)),
        ["Zari Potli", "Cotton Tote"]
    );
    assert_eq!(all_tags(&products), ["wedding", "zari", "everyday"]);
}

#[test]
fn availability_toggles() {
    let products = two_products();
    let out = CatalogQuery::default().out_of_stock_only(true);
    assert_eq!(names(&filter_products(&products, &out)), ["Red Saree"]);

    let both = CatalogQuery::default()
        .in_stock_only(true)
        .out_of_stock_only(true);
    assert!(filter_products(&products, &both).is_empty());
}

#[test]
fn status_filter() {
    let mut draft = product("Draft Saree", ProductCategory::Sarees, 500, 1);
    draft.status = ProductStatus::Draft;
    let products = vec![draft, product("Live Saree", ProductCategory::Sarees, 500, 1)];

    let query = CatalogQuery {
        status: Some(ProductStatus::Active),
        ..CatalogQuery::default()
    };
    assert_eq!(names(&filter_products(&products, &query)), ["Live Saree"]);
}

#[test]
fn featured_sort_is_stable() {
    let mut products: Vec<Product> = ["A", "B", "C", "D"]
        .into_iter()
        .map(|name| product(name, ProductCategory::Home, 100, 1))
        .collect();
    products[1].featured = true;
    products[3].featured = true;

    sort_products(&mut products, SortMode::Featured);
    assert_eq!(names(&products), ["B", "D", "A", "C"]);
}

#[test]
fn price_name_and_newest_sorts() {
    let mut cheap = product("banarasi", ProductCategory::Sarees, 100, 1);
    cheap.created_at = at(2024, 1, 1);
    let mut mid = product("Chanderi", ProductCategory::Sarees, 500, 1);
    mid.created_at = at(2024, 3, 1);
    let mut dear = product("Kanjivaram", ProductCategory::Sarees, 900, 1);
    dear.created_at = at(2024, 2, 1);
    let mut products = vec![mid, dear, cheap];

    sort_products(&mut products, SortMode::PriceLow);
    assert_eq!(names(&products), ["banarasi", "Chanderi", "Kanjivaram"]);

    sort_products(&mut products, SortMode::PriceHigh);
    assert_eq!(names(&products), ["Kanjivaram", "Chanderi", "banarasi"]);

    sort_products(&mut products, SortMode::Name);
    assert_eq!(names(&products), ["banarasi", "Chanderi", "Kanjivaram"]);

    sort_products(&mut products, SortMode::Newest);
    assert_eq!(names(&products), ["Chanderi", "Kanjivaram", "banarasi"]);
}

#[test]
fn grouping_keeps_first_seen_order_and_display_names() {
    let products = vec![
        product("Linen Kurta", ProductCategory::MensCollection, 100, 1),
        product("Silk Saree", ProductCategory::Sarees, 100, 1),
        product("Cotton Kurta", ProductCategory::MensCollection, 100, 1),
        product("Mystery", ProductCategory::Uncategorized, 100, 1),
    ];
    let categories = vec![
        category("Sarees", "sarees"),
        category("Men's Collection", "men's-collection"),
    ];

    let groups = group_by_category(&products, &categories);
    let keys: Vec<&str> = groups.keys().map(String::as_str).collect();
    assert_eq!(keys, ["Men's Collection", "Sarees", "uncategorized"]);
    assert_eq!(
        names(&groups["Men's Collection"]),
        ["Linen Kurta", "Cotton Kurta"]
    );
    assert_eq!(
        distinct_categories(&products),
        [
            ProductCategory::MensCollection,
            ProductCategory::Sarees,
            ProductCategory::Uncategorized
        ]
    );
}

#[test]
fn full_pipeline() {
    let mut featured = product("Bandhani Dupatta", ProductCategory::Dupattas, 700, 4);
    featured.featured = true;
    let products = vec![
        product("Phulkari Dupatta", ProductCategory::Dupattas, 1300, 2),
        featured,
        product("Silk Saree", ProductCategory::Sarees, 5000, 1),
    ];
    let categories = vec![category("Dupattas", "dupattas")];

    let query = CatalogQuery::default()
        .with_search("dupatta")
        .sorted_by(SortMode::Featured);
    let page = query_catalog(&products, &categories, &query);

    assert_eq!(page.total, 2);
    assert_eq!(
        names(&page.products),
        ["Bandhani Dupatta", "Phulkari Dupatta"]
    );
    assert_eq!(page.groups["Dupattas"].len(), 2);
}

#[test]
fn query_deserializes_from_camel_case_json() -> anyhow::Result<()> {
    let query: CatalogQuery = serde_json::from_str(
        r#"{"search":"silk","inStockOnly":true,"sort":"price-high","tags":["festive"]}"#,
    )?;
    assert_eq!(query.search.as_deref(), Some("silk"));
    assert!(query.in_stock_only);
    assert_eq!(query.sort, SortMode::PriceHigh);
    assert_eq!(query.min_search_len, 1);
    Ok(())
}

#[test]
fn unknown_category_slug_coerces_to_uncategorized() -> anyhow::Result<()> {
    let parsed: ProductCategory = serde_json::from_str(r#""suits""#)?;
    assert_eq!(parsed, ProductCategory::Uncategorized);
    let parsed: ProductCategory = serde_json::from_str(r#""Sarees""#)?;
    assert_eq!(parsed, ProductCategory::Sarees);
    Ok(())
}
