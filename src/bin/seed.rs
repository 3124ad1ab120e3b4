use apparel_storefront::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    services::product_service::slugify,
};
use chrono::{Duration, Months, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

const CATEGORIES: [(&str, &str, &[&str]); 8] = [
    ("Sarees", "sarees", &["Silk", "Cotton", "Georgette"]),
    ("Suit Sets", "suit-sets", &["Anarkali", "Straight Cut"]),
    ("Dress Material", "dress-material", &["Unstitched"]),
    ("Dupattas", "dupattas", &["Phulkari", "Bandhani"]),
    ("Bedsheets", "bedsheets", &["Double", "King"]),
    ("Bags", "bags", &["Potli", "Tote"]),
    ("Men's Collection", "men's-collection", &["Kurtas"]),
    ("Home", "home", &["Cushion Covers"]),
];

// (name, category, subcategory, price in paise, compare price, stock, featured, tags)
type ProductSeed = (&'static str, &'static str, &'static str, i64, Option<i64>, i32, bool, &'static [&'static str]);

const PRODUCTS: [ProductSeed; 8] = [
    ("Banarasi Silk Saree", "sarees", "Silk", 1249900, Some(1499900), 12, true, &["silk", "wedding"]),
    ("Handloom Cotton Saree", "sarees", "Cotton", 349900, None, 30, false, &["cotton", "everyday"]),
    ("Chikankari Anarkali Set", "suit-sets", "Anarkali", 589900, Some(699900), 8, true, &["festive"]),
    ("Block Print Dress Material", "dress-material", "Unstitched", 189900, None, 0, false, &["cotton"]),
    ("Phulkari Dupatta", "dupattas", "Phulkari", 129900, None, 25, true, &["festive", "embroidered"]),
    ("Jaipuri King Bedsheet", "bedsheets", "King", 219900, Some(259900), 15, false, &["cotton", "home"]),
    ("Zari Potli Bag", "bags", "Potli", 89900, None, 40, false, &["wedding"]),
    ("Linen Kurta", "men's-collection", "Kurtas", 249900, None, 18, true, &["linen", "everyday"]),
];

const CUSTOMERS: [(&str, &str); 3] = [
    ("Asha Verma", "asha@example.com"),
    ("Rohan Iyer", "rohan@example.com"),
    ("Meera Nair", "meera@example.com"),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = AppConfig::from_env()?;
    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;
    let pool = orm.get_postgres_connection_pool();

    seed_categories(pool).await?;
    let product_ids = seed_products(pool).await?;
    let customer_ids = seed_customers(pool).await?;
    seed_orders(pool, &product_ids, &customer_ids).await?;

    tracing::info!("seed completed");
    Ok(())
}

async fn seed_categories(pool: &PgPool) -> anyhow::Result<()> {
    for (order, (name, slug, subcategories)) in CATEGORIES.iter().enumerate() {
        let row: Option<(Uuid,)> = sqlx::query_as(
            r#"
            INSERT INTO categories (id, name, slug, featured, sort_order)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (slug) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(slug)
        .bind(order < 4)
        .bind(order as i32)
        .fetch_optional(pool)
        .await?;

        // Already seeded; leave its subcategories alone.
        let Some((category_id,)) = row else {
            continue;
        };

        for (sub_order, sub) in subcategories.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO subcategories (id, category_id, name, slug, sort_order)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(category_id)
            .bind(sub)
            .bind(slugify(sub))
            .bind(sub_order as i32)
            .execute(pool)
            .await?;
        }
    }

    tracing::info!(count = CATEGORIES.len(), "seeded categories");
    Ok(())
}

async fn seed_products(pool: &PgPool) -> anyhow::Result<Vec<(Uuid, Decimal)>> {
    let mut ids = Vec::with_capacity(PRODUCTS.len());
    for (name, category, subcategory, price, compare, stock, featured, tags) in PRODUCTS {
        let handle = slugify(name);
        let price = Decimal::new(price, 2);
        let tags: Vec<String> = tags.iter().map(|t| t.to_string()).collect();
        let images = vec![format!("https://images.example.com/products/{handle}.jpg")];

        let row: Option<(Uuid,)> = sqlx::query_as(
            r#"
            INSERT INTO products
                (id, name, handle, description, price, compare_price, images, category,
                 subcategory, tags, stock, featured, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, 'active')
            ON CONFLICT (handle) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(&handle)
        .bind(format!("{name}, handpicked for the season."))
        .bind(price)
        .bind(compare.map(|c| Decimal::new(c, 2)))
        .bind(&images)
        .bind(category)
        .bind(subcategory)
        .bind(&tags)
        .bind(stock)
        .bind(featured)
        .fetch_optional(pool)
        .await?;

        let id = match row {
            Some((id,)) => id,
            None => {
                let existing: (Uuid,) = sqlx::query_as("SELECT id FROM products WHERE handle = $1")
                    .bind(&handle)
                    .fetch_one(pool)
                    .await?;
                existing.0
            }
        };
        ids.push((id, price));
    }

    tracing::info!(count = ids.len(), "seeded products");
    Ok(ids)
}

async fn seed_customers(pool: &PgPool) -> anyhow::Result<Vec<Uuid>> {
    let mut ids = Vec::with_capacity(CUSTOMERS.len());
    for (full_name, email) in CUSTOMERS {
        let (id,): (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO customers (id, full_name, email)
            VALUES ($1, $2, $3)
            ON CONFLICT (email) DO UPDATE SET full_name = EXCLUDED.full_name
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(full_name)
        .bind(email)
        .fetch_one(pool)
        .await?;
        ids.push(id);
    }

    tracing::info!(count = ids.len(), "seeded customers");
    Ok(ids)
}

/// Spreads a handful of orders over the current and previous months so the dashboard has
/// growth figures to show. Skipped when orders already exist.
async fn seed_orders(
    pool: &PgPool,
    products: &[(Uuid, Decimal)],
    customers: &[Uuid],
) -> anyhow::Result<()> {
    let (existing,): (i64,) = sqlx::query_as("SELECT count(*) FROM orders")
        .fetch_one(pool)
        .await?;
    if existing > 0 {
        tracing::info!(existing, "orders already present, skipping");
        return Ok(());
    }

    let now = Utc::now();
    let last_month = now.checked_sub_months(Months::new(1)).unwrap_or(now);
    let placed_at = [
        now - Duration::hours(2),
        now - Duration::days(1),
        last_month,
        last_month - Duration::days(3),
        now - Duration::hours(6),
    ];
    let tax_rate = Decimal::new(18, 2);
    let shipping = Decimal::new(9900, 2);

    for (index, created_at) in placed_at.into_iter().enumerate() {
        let customer_id = customers.get(index % (customers.len() + 1)).copied();
        let lines: Vec<(Uuid, Decimal, i32)> = products
            .iter()
            .skip(index)
            .step_by(3)
            .take(2)
            .enumerate()
            .map(|(n, (id, price))| (*id, *price, n as i32 + 1))
            .collect();

        let subtotal: Decimal = lines
            .iter()
            .map(|(_, price, qty)| *price * Decimal::from(*qty))
            .sum();
        let tax = (subtotal * tax_rate).round_dp(2);
        let total = subtotal + tax + shipping;
        let order_id = Uuid::new_v4();

        let mut tx = pool.begin().await?;
        sqlx::query(
            r#"
            INSERT INTO orders
                (id, customer_id, subtotal, tax, shipping_cost, total, status, payment_method,
                 payment_status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'card', $8, $9, $9)
            "#,
        )
        .bind(order_id)
        .bind(customer_id)
        .bind(subtotal)
        .bind(tax)
        .bind(shipping)
        .bind(total)
        .bind(if index % 2 == 0 { "delivered" } else { "processing" })
        .bind(if index % 2 == 0 { "paid" } else { "pending" })
        .bind(created_at)
        .execute(&mut *tx)
        .await?;

        for (product_id, price, quantity) in lines {
            sqlx::query(
                r#"
                INSERT INTO order_items (id, order_id, product_id, quantity, price)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(order_id)
            .bind(product_id)
            .bind(quantity)
            .bind(price)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
    }

    tracing::info!(count = placed_at.len(), "seeded orders");
    Ok(())
}
