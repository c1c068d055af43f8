//! Catalog ingestion and variant expansion.
//!
//! The JSON shape matches the upstream store export: a flat list with a
//! nested `rating { rate, count }` object. Expansion fans each base product
//! out into priced variants the way the upstream snapshot tool does, so a
//! small export can stand in for a full market catalog. Prices are assumed
//! to be already denominated in the target currency.

use std::fs;
use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use tracing::info;

use marketlens_core::{Catalog, Product, ProductId};

use crate::error::DataError;

#[derive(Debug, Deserialize)]
struct StoreRecord {
    id: serde_json::Value,
    title: String,
    #[serde(default)]
    price: f64,
    #[serde(default)]
    category: String,
    #[serde(default)]
    rating: StoreRating,
}

#[derive(Debug, Default, Deserialize)]
struct StoreRating {
    #[serde(default)]
    rate: f64,
    #[serde(default)]
    count: u32,
}

impl From<StoreRecord> for Product {
    fn from(record: StoreRecord) -> Self {
        // Upstream ids are numbers for base products and strings for
        // variants; normalize both to strings.
        let id = match &record.id {
            serde_json::Value::String(id) => id.clone(),
            other => other.to_string(),
        };
        Product {
            id: ProductId(id),
            title: record.title,
            price: record.price,
            category: record.category,
            rating: record.rating.rate,
            rating_count: record.rating.count,
        }
    }
}

/// Load and validate a catalog JSON export.
pub fn load_catalog_json(path: &Path) -> Result<Catalog, DataError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| DataError::Io { path: path.to_path_buf(), source })?;
    let records: Vec<StoreRecord> = serde_json::from_str(&raw)
        .map_err(|source| DataError::Json { path: path.to_path_buf(), source })?;

    let catalog = Catalog::new(records.into_iter().map(Product::from).collect())?;
    info!(rows = catalog.len(), path = %path.display(), "loaded catalog");
    Ok(catalog)
}

/// Fan each base product out into `variants_per_product` priced variants:
/// price jittered by uniform(0.7, 1.5), rating re-rolled in [3.5, 5.0],
/// rating count in [50, 1000]. Deterministic for a fixed seed.
pub fn expand_catalog(
    base: &Catalog,
    variants_per_product: usize,
    seed: u64,
) -> Result<Catalog, DataError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut products = Vec::with_capacity(base.len() * (variants_per_product + 1));

    for product in base.iter() {
        products.push(product.clone());
        for variant_index in 1..=variants_per_product {
            let price_jitter: f64 = rng.gen_range(0.7..=1.5);
            products.push(Product {
                id: ProductId(format!("{}_V{variant_index}", product.id)),
                title: format!("{} - Variant {variant_index}", product.title),
                price: (product.price * price_jitter * 100.0).round() / 100.0,
                category: product.category.clone(),
                rating: (rng.gen_range(3.5..=5.0_f64) * 10.0).round() / 10.0,
                rating_count: rng.gen_range(50..=1_000),
            });
        }
    }

    let catalog = Catalog::new(products)?;
    info!(
        base_rows = base.len(),
        expanded_rows = catalog.len(),
        seed,
        "expanded catalog variants"
    );
    Ok(catalog)
}
