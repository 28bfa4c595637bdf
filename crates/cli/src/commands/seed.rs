//! Catalog seeding command.
//!
//! Populates an empty store with a starter catalog of plants and a few
//! promo codes. Running it against a non-empty catalog is a no-op.

use plantsco_api::config::Config;
use plantsco_api::db::{self, ProductRepository, PromoCodeRepository};
use plantsco_core::Price;

/// Starter catalog: (name, price in cents, quantity on hand, image, tags).
const PLANTS: &[(&str, i64, i64, &str, &[&str])] = &[
    (
        "Monstera Deliciosa",
        3499,
        12,
        "monstera.jpg",
        &["easy care", "statement"],
    ),
    (
        "Snake Plant",
        1899,
        30,
        "snake-plant.jpg",
        &["low light", "pet friendly"],
    ),
    (
        "Fiddle Leaf Fig",
        5999,
        8,
        "fiddle-leaf-fig.jpg",
        &["bright light", "statement"],
    ),
    (
        "Golden Pothos",
        1499,
        45,
        "golden-pothos.jpg",
        &["low light", "trailing", "easy care"],
    ),
    ("Peace Lily", 2499, 20, "peace-lily.jpg", &["flowering"]),
    (
        "ZZ Plant",
        2799,
        16,
        "zz-plant.jpg",
        &["low light", "easy care"],
    ),
    (
        "Bird of Paradise",
        6999,
        5,
        "bird-of-paradise.jpg",
        &["bright light", "statement"],
    ),
    (
        "String of Pearls",
        1299,
        25,
        "string-of-pearls.jpg",
        &["trailing", "succulent"],
    ),
];

/// Promo codes for the admin dashboard: (code, percent off).
const PROMO_CODES: &[(&str, i64)] = &[("WELCOME10", 10), ("SPRING20", 20), ("PLANTPARENT15", 15)];

/// Seed the catalog and promo codes.
///
/// # Errors
///
/// Returns an error if the database cannot be reached or an insert fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    let pool = db::create_pool(&config.database_url).await?;

    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
        .fetch_one(&pool)
        .await?;
    if existing > 0 {
        tracing::info!("Catalog already has {existing} products, nothing to do");
        return Ok(());
    }

    let products = ProductRepository::new(&pool);
    for (name, cents, quantity, image, tags) in PLANTS {
        let tags: Vec<String> = tags.iter().map(ToString::to_string).collect();
        let product = products
            .create(name, Price::from_cents(*cents), *quantity, image, &tags)
            .await?;
        tracing::info!("Seeded product {} ({})", product.name, product.price);
    }

    let promo_codes = PromoCodeRepository::new(&pool);
    for (code, percent_off) in PROMO_CODES {
        promo_codes.create(code, *percent_off).await?;
        tracing::info!("Seeded promo code {code}");
    }

    tracing::info!("Seeding complete!");
    Ok(())
}
