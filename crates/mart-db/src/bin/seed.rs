//! # Catalog Seeder
//!
//! Loads the development catalog into the database.
//!
//! ## Usage
//! ```bash
//! # Load the default catalog into ./mart_dev.db
//! cargo run -p mart-db --bin seed
//!
//! # Specify database path
//! cargo run -p mart-db --bin seed -- --db ./data/mart.db
//! ```
//!
//! Item ids are assigned here, at catalog load time, and stay stable: the
//! seed list is ordered and ids are its 1-based positions.

use std::env;

use mart_core::Item;
use mart_db::{Database, DbConfig};

/// (title, slogan, description suffix, price) per category.
const CATALOG: &[(&str, &[(&str, &str, f64)])] = &[
    (
        "Apparel",
        &[
            ("Gray Hooded Sweatshirt", "Made of 100% cotton", 29.99),
            ("Green T-Shirt", "Soft jersey knit", 14.99),
            ("Track Jacket", "Zip up and go", 39.99),
            ("Baseball Cap", "One size fits all", 11.99),
            ("Wool Socks", "Warm through winter", 7.99),
        ],
    ),
    (
        "Kitchen",
        &[
            ("Travel Mug", "Keeps drinks hot for hours", 12.99),
            ("Coffee Press", "Brew like a barista", 24.99),
            ("Cutting Board", "Bamboo, knife-friendly", 18.49),
            ("Apron", "Flour stays on the outside", 15.99),
        ],
    ),
    (
        "Office",
        &[
            ("Spiral Notebook", "200 pages, college ruled", 4.99),
            ("Ballpoint Pen Set", "Writes the first time", 6.49),
            ("Laptop Sleeve", "Snug 13-inch fit", 21.99),
            ("Desk Organizer", "A place for everything", 13.99),
        ],
    ),
    (
        "Stickers",
        &[
            ("Logo Sticker Pack", "Ten die-cut designs", 3.99),
            ("Holographic Sticker", "Shifts in the light", 2.49),
        ],
    ),
    (
        "Umbrellas",
        &[
            ("Compact Umbrella", "Fits in a coat pocket", 16.99),
            ("Golf Umbrella", "Covers two, easily", 27.99),
        ],
    ),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let mut db_path = String::from("./mart_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Mart Catalog Seeder");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./mart_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Mart Catalog Seeder");
    println!("===================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Check existing catalog
    let existing = db.items().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} items", existing);
        println!("  Skipping seed to keep ids stable.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Loading catalog...");

    let items = db.items();
    let mut id: i64 = 0;
    for (category, products) in CATALOG {
        for (title, slogan, price) in *products {
            id += 1;
            let item = Item {
                id,
                title: (*title).to_string(),
                slogan: (*slogan).to_string(),
                description: format!("{title} - {slogan}."),
                category: (*category).to_string(),
                price: *price,
                img_url: format!("/img/products/{id}.jpg"),
                reviews: vec![],
            };
            items.insert(&item).await?;
        }
        println!("  {} loaded", category);
    }

    println!();
    println!("✓ Loaded {} items", id);

    // Verify FTS
    println!();
    println!("Verifying FTS index...");
    let hits = items.search_items("umbrella", 0, 10).await?;
    println!("  Search 'umbrella': {} results", hits.len());
    let hits = items.search_items("cotton", 0, 10).await?;
    println!("  Search 'cotton': {} results", hits.len());

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
