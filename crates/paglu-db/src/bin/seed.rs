//! # Catalog Seeder
//!
//! Populates a development database with categories, subcategories and
//! approved products.
//!
//! ## Usage
//! ```bash
//! # 200 products (default) into ./paglu_dev.db
//! cargo run -p paglu-db --bin seed
//!
//! # Custom amount and path
//! cargo run -p paglu-db --bin seed -- --count 1000 --db ./data/paglu.db
//! ```
//!
//! ## Generated Products
//! Each category gets its subcategories; products cycle through the
//! subcategory's item names with:
//! - Price: 299 - 2,798 (whole rupees)
//! - Discount: 0%, 10%, 25% or 40%
//! - GST: 5% or 12%
//! - Stock: 0 - 60
//! - Sizes S-XL, two colors, two images

use std::env;

use chrono::Utc;
use paglu_core::{Category, Money, Percent, Product, Subcategory};
use paglu_db::{Database, DbConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// Category -> (subcategory, item names).
const CATALOG: &[(&str, &[(&str, &[&str])])] = &[
    (
        "Women",
        &[
            ("Sarees", &["Banarasi Silk Saree", "Chiffon Saree", "Cotton Handloom Saree"]),
            ("Kurtas", &["Anarkali Kurta", "Straight Kurta", "A-Line Kurta"]),
            ("Dupattas", &["Phulkari Dupatta", "Bandhani Dupatta"]),
        ],
    ),
    (
        "Men",
        &[
            ("Shirts", &["Linen Shirt", "Oxford Shirt", "Mandarin Collar Shirt"]),
            ("Kurtas", &["Pathani Kurta", "Short Kurta"]),
            ("Jackets", &["Nehru Jacket", "Denim Jacket"]),
        ],
    ),
    (
        "Kids",
        &[
            ("Ethnic", &["Kids Lehenga", "Kids Sherwani"]),
            ("Casual", &["Graphic Tee", "Jogger Set", "Cotton Frock"]),
        ],
    ),
];

const SIZES: &[&str] = &["S", "M", "L", "XL"];
const COLORS: &[&str] = &["maroon", "mustard", "indigo", "ivory", "teal", "black"];
const DISCOUNTS: &[u32] = &[0, 10, 25, 40];
const GST_RATES: &[u32] = &[5, 12];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args: Vec<String> = env::args().collect();

    let mut count: usize = 200;
    let mut db_path = String::from("./paglu_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(200);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Paglu catalog seeder");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: 200)");
                println!("  -d, --db <PATH>    Database file path (default: ./paglu_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            other => warn!(arg = %other, "Ignoring unknown argument"),
        }
        i += 1;
    }

    info!(db = %db_path, count, "Seeding catalog");

    let db = Database::new(DbConfig::new(&db_path)).await?;

    let existing = db.categories().count().await?;
    if existing > 0 {
        warn!(
            categories = existing,
            "Database already has a catalog; delete the file to regenerate"
        );
        return Ok(());
    }

    let start = std::time::Instant::now();
    let mut generated = 0usize;
    let mut seed = 0usize;

    'outer: while generated < count {
        let before = generated;

        for (category_name, subcategories) in CATALOG {
            let category_id = ensure_category(&db, category_name).await?;

            for (sub_name, items) in subcategories.iter() {
                let sub_id = ensure_subcategory(&db, &category_id, sub_name).await?;

                for item in items.iter() {
                    if generated >= count {
                        break 'outer;
                    }

                    let product = generate_product(&category_id, &sub_id, item, seed);
                    if let Err(e) = db.products().insert(&product).await {
                        warn!(title = %product.title, error = %e, "Failed to insert product");
                    } else {
                        generated += 1;
                    }
                    seed += 1;
                }
            }
        }

        if generated == before {
            warn!("No products inserted in a full pass; stopping");
            break;
        }
    }

    info!(
        products = generated,
        categories = db.categories().count().await?,
        elapsed = ?start.elapsed(),
        "Seed complete"
    );

    db.close().await;
    Ok(())
}

/// Returns the id of the named category, inserting it if missing.
async fn ensure_category(db: &Database, name: &str) -> Result<String, Box<dyn std::error::Error>> {
    if let Some(existing) = db.categories().list().await?.into_iter().find(|c| c.name == name) {
        return Ok(existing.id);
    }

    let category = Category {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        image: Some(format!("https://img.paglu.dev/categories/{}.jpg", name.to_lowercase())),
        created_at: Utc::now(),
    };
    db.categories().insert(&category).await?;
    Ok(category.id)
}

/// Returns the id of the named subcategory, inserting it if missing.
async fn ensure_subcategory(
    db: &Database,
    category_id: &str,
    name: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    if let Some(existing) = db
        .categories()
        .list_subcategories(category_id)
        .await?
        .into_iter()
        .find(|s| s.name == name)
    {
        return Ok(existing.id);
    }

    let subcategory = Subcategory {
        id: Uuid::new_v4().to_string(),
        category_id: category_id.to_string(),
        name: name.to_string(),
        created_at: Utc::now(),
    };
    db.categories().insert_subcategory(&subcategory).await?;
    Ok(subcategory.id)
}

/// Generates a single approved product with deterministic pseudo-random data.
fn generate_product(category_id: &str, subcategory_id: &str, name: &str, seed: usize) -> Product {
    let now = Utc::now();
    let slug = name.to_lowercase().replace(' ', "-");

    let price = Money::from_major(299 + ((seed * 37) % 2500) as i64);
    let discount = Percent::from_whole(DISCOUNTS[seed % DISCOUNTS.len()]).unwrap_or_default();
    let gst = Percent::from_whole(GST_RATES[seed % GST_RATES.len()]).unwrap_or_default();

    let colors = vec![
        COLORS[seed % COLORS.len()].to_string(),
        COLORS[(seed + 1) % COLORS.len()].to_string(),
    ];

    Product {
        id: Uuid::new_v4().to_string(),
        category_id: category_id.to_string(),
        subcategory_id: Some(subcategory_id.to_string()),
        owner_id: None,
        title: format!("{} #{}", name, seed + 1),
        description: format!("{} in breathable fabric.", name),
        features: vec!["Handpicked fabric".to_string(), "Gentle wash".to_string()],
        stock: (seed % 61) as i64,
        sizes: SIZES.iter().map(|s| s.to_string()).collect(),
        colors,
        price,
        discount,
        on_sale: !discount.is_zero(),
        gst,
        images: vec![
            format!("https://img.paglu.dev/products/{}-{}-front.jpg", slug, seed),
            format!("https://img.paglu.dev/products/{}-{}-back.jpg", slug, seed),
        ],
        is_approved: true,
        created_at: now,
        updated_at: now,
    }
}
