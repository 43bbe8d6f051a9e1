//! # Seed Data Generator
//!
//! Populates the database with development data: a pharmacy catalog with
//! lot-tracked products, staggered lot expiries, pool stock, a cash fund
//! and a sample combo.
//!
//! ## Usage
//! ```bash
//! cargo run -p apotek-db --bin seed
//! cargo run -p apotek-db --bin seed -- --db ./data/apotek.db
//! ```

use chrono::{Duration, Utc};
use std::env;
use uuid::Uuid;

use apotek_core::{Combo, ComboItem, Fund, Product, ProductLot, StockLevel};
use apotek_db::{Database, DbConfig};

/// Default warehouse for seeded stock.
const WAREHOUSE: &str = "gudang-utama";

/// (sku, name, price_minor, lot_tracked) catalog rows.
const CATALOG: &[(&str, &str, i64, bool)] = &[
    ("PCM-500", "Paracetamol 500mg strip", 12_000, true),
    ("PCM-SYR", "Paracetamol sirup 60ml", 28_000, true),
    ("AMX-500", "Amoxicillin 500mg strip", 35_000, true),
    ("CTM-4", "Chlorpheniramine 4mg strip", 8_000, true),
    ("OBH-150", "OBH sirup 150ml", 32_000, true),
    ("VIT-C500", "Vitamin C 500mg tube", 25_000, true),
    ("VIT-D1000", "Vitamin D3 1000IU botol", 85_000, true),
    ("ORS-200", "Oralit 200ml sachet", 3_500, true),
    ("BTD-10", "Betadine 10ml", 18_000, true),
    ("MSK-50", "Masker medis isi 50", 45_000, false),
    ("HSC-100", "Handscoon isi 100", 60_000, false),
    ("ALK-70", "Alkohol swab isi 100", 22_000, false),
    ("THM-DGT", "Termometer digital", 55_000, false),
    ("PLS-STD", "Plester standar isi 20", 9_500, false),
];

/// Days-until-expiry ladder used to stagger seeded lots.
const EXPIRY_LADDER: &[i64] = &[-3, 5, 20, 45, 120, 300];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    let mut db_path = String::from("./apotek_dev.db");

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
                println!("Apotek POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./apotek_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Apotek POS Seed Data Generator");
    println!("=================================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected, migrations applied");

    if db.products().count().await? > 0 {
        println!("⚠ Database already has products; skipping seed.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let now = Utc::now();
    let today = now.date_naive();
    let mut product_ids = Vec::new();

    for (index, (sku, name, price, lot_tracked)) in CATALOG.iter().enumerate() {
        let product = Product {
            id: Uuid::new_v4().to_string(),
            sku: sku.to_string(),
            barcode: Some(format!("899{:010}", index)),
            name: name.to_string(),
            description: None,
            price_minor: *price,
            lot_tracked: *lot_tracked,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        db.products().insert(&product).await?;

        // Two lots per lot-tracked product, expiries staggered down the
        // ladder so pickers show the whole badge range.
        if *lot_tracked {
            for lot_index in 0..2 {
                let expires_in = EXPIRY_LADDER[(index + lot_index * 2) % EXPIRY_LADDER.len()];
                let lot = ProductLot {
                    id: Uuid::new_v4().to_string(),
                    product_id: product.id.clone(),
                    warehouse_id: WAREHOUSE.to_string(),
                    lot_number: format!("{}-{:02}", sku, lot_index + 1),
                    batch_code: Some(format!("B{}{:03}", sku.chars().next().unwrap_or('X'), index * 2 + lot_index)),
                    expiry_date: Some(today + Duration::days(expires_in)),
                    quantity: 10 + (index as i64 * 7 + lot_index as i64 * 13) % 40,
                    created_at: now,
                    updated_at: now,
                };
                db.lots().insert(&lot).await?;
            }
        }

        db.stock()
            .upsert_batch(&[StockLevel {
                product_id: product.id.clone(),
                warehouse_id: WAREHOUSE.to_string(),
                quantity: 20 + (index as i64 * 11) % 60,
                min_stock: Some(5),
                max_stock: Some(100),
            }])
            .await?;

        product_ids.push(product.id);
    }
    println!("✓ Seeded {} products with lots and stock", product_ids.len());

    let fund = Fund {
        id: Uuid::new_v4().to_string(),
        name: "Kas kasir".to_string(),
        created_at: now,
    };
    db.funds().insert(&fund).await?;
    println!("✓ Seeded cash fund '{}'", fund.name);

    // Sample combo: flu pack from the first three lot-tracked products.
    let combo = Combo {
        id: Uuid::new_v4().to_string(),
        name: "Paket flu".to_string(),
        is_active: true,
        items: vec![
            ComboItem {
                product_id: product_ids[0].clone(),
                product_name: CATALOG[0].1.to_string(),
                quantity_per_set: 2,
                lot_tracked: CATALOG[0].3,
            },
            ComboItem {
                product_id: product_ids[3].clone(),
                product_name: CATALOG[3].1.to_string(),
                quantity_per_set: 1,
                lot_tracked: CATALOG[3].3,
            },
            ComboItem {
                product_id: product_ids[9].clone(),
                product_name: CATALOG[9].1.to_string(),
                quantity_per_set: 1,
                lot_tracked: CATALOG[9].3,
            },
        ],
        created_at: now,
        updated_at: now,
    };
    db.combos().insert(&combo).await?;
    println!("✓ Seeded combo '{}'", combo.name);

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
