//! # Seed Data Generator
//!
//! Populates the database with sample inventory and an admin account for
//! development.
//!
//! ## Usage
//! ```bash
//! # Seed 40 handsets (default)
//! cargo run -p teddy-db --bin seed
//!
//! # Custom amount / database path
//! cargo run -p teddy-db --bin seed -- --count 100 --db ./data/teddy.db
//! ```
//!
//! Each handset gets a sequential `TDY-####` code, a plausible IMEI, and
//! cost/wholesale/retail prices with realistic margins. The admin login is
//! `admin@teddy.lk` / `admin123` (change it before real use).

use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHasher};
use chrono::{Duration, Utc};
use std::env;
use uuid::Uuid;

use teddy_core::{Role, ShopCode, StockItem, StockState, UserAccount};
use teddy_db::{Database, DbConfig};

/// Model catalogue: (model, storage options, base retail in rupees)
const MODELS: &[(&str, &[&str], i64)] = &[
    ("iPhone 14", &["128GB", "256GB"], 215_000),
    ("iPhone 13", &["128GB", "256GB"], 175_000),
    ("iPhone 12", &["64GB", "128GB"], 135_000),
    ("iPhone 11", &["64GB", "128GB"], 105_000),
    ("Galaxy S23", &["128GB", "256GB"], 195_000),
    ("Galaxy A54", &["128GB"], 95_000),
    ("Galaxy A34", &["128GB"], 75_000),
    ("Redmi Note 12", &["128GB"], 58_000),
    ("Pixel 7", &["128GB"], 145_000),
    ("Pixel 6a", &["128GB"], 88_000),
];

const COLOURS: &[&str] = &["Black", "White", "Blue", "Green", "Purple", "Red"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 40;
    let mut db_path = String::from("./teddy_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(40);
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
                println!("Teddy Mobile Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of handsets to generate (default: 40)");
                println!("  -d, --db <PATH>    Database file path (default: ./teddy_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Teddy Mobile Seed Data Generator");
    println!("===================================");
    println!("Database: {}", db_path);
    println!("Handsets: {}", count);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Admin account (only on a fresh database)
    if db.users().count().await? == 0 {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(b"admin123", &salt)
            .map_err(|e| format!("password hashing failed: {e}"))?
            .to_string();

        db.users()
            .insert(&UserAccount {
                id: Uuid::new_v4().to_string(),
                email: "admin@teddy.lk".to_string(),
                password_hash: hash,
                display_name: "Shop Admin".to_string(),
                role: Role::Admin,
                created_at: Utc::now(),
            })
            .await?;
        println!("✓ Admin account created (admin@teddy.lk / admin123)");
    } else {
        println!("⚠ Users already exist, skipping admin account");
    }

    // Inventory
    let existing = db.stocks().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} stock items", existing);
        println!("  Skipping seed to avoid duplicates.");
        return Ok(());
    }

    println!();
    println!("Generating handsets...");

    let start = std::time::Instant::now();
    let mut generated = 0usize;

    for seq in 0..count {
        let item = generate_item(seq);
        if let Err(e) = db.stocks().insert(&item).await {
            eprintln!("Failed to insert {}: {}", item.code, e);
            continue;
        }
        generated += 1;
    }

    let elapsed = start.elapsed();
    println!("✓ Generated {} handsets in {:?}", generated, elapsed);

    let codes = db.stocks().in_stock_codes().await?;
    println!("  In-stock codes: {} ({} .. {})",
        codes.len(),
        codes.first().map(ShopCode::as_str).unwrap_or("-"),
        codes.last().map(ShopCode::as_str).unwrap_or("-"),
    );

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Generates one handset with deterministic pseudo-random variation.
fn generate_item(seq: usize) -> StockItem {
    let now = Utc::now();

    let (model, storages, base_retail) = MODELS[seq % MODELS.len()];
    let storage = storages[seq % storages.len()];
    let colour = COLOURS[(seq * 7) % COLOURS.len()];

    // Retail wobbles a little per unit; cost ~82%, wholesale ~91% of retail
    let retail = (base_retail + ((seq * 131) % 7) as i64 * 1_000) * 100;
    let cost = retail * 82 / 100;
    let wholesale = retail * 91 / 100;

    // Spread acquisitions over the last ~90 days
    let buy_date = (now - Duration::days(((seq * 13) % 90) as i64)).date_naive();

    StockItem {
        id: Uuid::new_v4().to_string(),
        code: ShopCode::parse(&format!("{:04}", seq + 1)).expect("sequential codes are valid"),
        phone: model.to_string(),
        imei: format!("35{:013}", 4_000_000_000_000u64 + seq as u64 * 9_901),
        storage: storage.to_string(),
        colour: colour.to_string(),
        description: None,
        buy_date,
        cost_cents: cost,
        wholesale_cents: wholesale,
        retail_cents: retail,
        state: StockState::InStock,
        return_date: None,
        last_checked_at: None,
        created_at: now,
        updated_at: now,
    }
}
