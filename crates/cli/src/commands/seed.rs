//! Seed and reset the catalog collection.

use tracing::info;

use marigold_shop::{Shop, ShopConfig, ShopError};

/// Seed the catalog from the built-in dataset.
///
/// # Errors
///
/// Returns an error if configuration loading fails, no store is configured,
/// or a seed batch fails.
pub async fn seed() -> Result<(), ShopError> {
    let config = ShopConfig::from_env()?;
    let shop = Shop::from_config(&config);

    let seeded = shop.catalog().seed_catalog().await?;
    info!(seeded, "catalog seeding complete");
    Ok(())
}

/// Wipe the catalog collection and reseed it.
///
/// # Errors
///
/// Returns an error if configuration loading fails, no store is configured,
/// or a delete/seed batch fails.
pub async fn reset() -> Result<(), ShopError> {
    let config = ShopConfig::from_env()?;
    let shop = Shop::from_config(&config);

    let seeded = shop.catalog().reset_catalog().await?;
    info!(seeded, "catalog reset complete");
    Ok(())
}
