//! Survey ingestion and synthetic survey generation.
//!
//! The CSV shape matches the upstream survey export: engine columns plus
//! optional demographic columns (`name`, `age`, `city`) which are ignored
//! here. Generation reproduces the upstream sampler so fixture datasets look
//! like real exports; a fixed seed makes the output reproducible.

use std::path::Path;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::info;

use marketlens_core::{Customer, CustomerId, Survey};

use crate::error::DataError;

#[derive(Debug, Serialize, Deserialize)]
struct SurveyRecord {
    user_id: String,
    preferred_category: String,
    expected_price_low: f64,
    expected_price_high: f64,
    favorite_keyword: String,
}

impl From<SurveyRecord> for Customer {
    fn from(record: SurveyRecord) -> Self {
        Customer {
            id: CustomerId(record.user_id),
            preferred_category: record.preferred_category,
            expected_price_low: record.expected_price_low,
            expected_price_high: record.expected_price_high,
            favorite_keyword: record.favorite_keyword,
        }
    }
}

/// Load and validate a survey CSV. Schema violations surface as engine
/// validation errors carrying the offending row id.
pub fn load_survey_csv(path: &Path) -> Result<Survey, DataError> {
    let mut reader = csv::Reader::from_path(path)
        .map_err(|source| DataError::Csv { path: path.to_path_buf(), source })?;

    let mut customers = Vec::new();
    for record in reader.deserialize::<SurveyRecord>() {
        let record =
            record.map_err(|source| DataError::Csv { path: path.to_path_buf(), source })?;
        customers.push(Customer::from(record));
    }

    let survey = Survey::new(customers)?;
    info!(rows = survey.len(), path = %path.display(), "loaded survey");
    Ok(survey)
}

/// Write a survey out in the upstream CSV shape.
pub fn write_survey_csv(path: &Path, survey: &Survey) -> Result<(), DataError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|source| DataError::Csv { path: path.to_path_buf(), source })?;
    for customer in survey.iter() {
        let record = SurveyRecord {
            user_id: customer.id.0.clone(),
            preferred_category: customer.preferred_category.clone(),
            expected_price_low: customer.expected_price_low,
            expected_price_high: customer.expected_price_high,
            favorite_keyword: customer.favorite_keyword.clone(),
        };
        writer
            .serialize(record)
            .map_err(|source| DataError::Csv { path: path.to_path_buf(), source })?;
    }
    writer
        .flush()
        .map_err(|source| DataError::Write { path: path.to_path_buf(), source })?;
    Ok(())
}

const KEYWORD_POOL: &[&str] = &[
    "phone",
    "smartphone",
    "charger",
    "earbuds",
    "headphones",
    "laptop",
    "tablet",
    "smartwatch",
    "speaker",
    "powerbank",
];

const PRICE_LOW_POOL: &[f64] = &[1_000.0, 2_000.0, 5_000.0, 10_000.0, 15_000.0];

/// Deterministic synthetic survey: `USER_nnnn` ids over the fixed keyword
/// pool, single `electronics` category, budget spread of 2k-10k above a
/// sampled floor.
pub fn generate_survey(count: usize, seed: u64) -> Result<Survey, DataError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut customers = Vec::with_capacity(count);

    for index in 0..count {
        let price_low = *PRICE_LOW_POOL.choose(&mut rng).unwrap_or(&1_000.0);
        let spread = rng.gen_range(2_000.0..=10_000.0_f64).round();
        let keyword = *KEYWORD_POOL.choose(&mut rng).unwrap_or(&"phone");

        customers.push(Customer {
            id: CustomerId(format!("USER_{:04}", index + 1)),
            preferred_category: "electronics".to_owned(),
            expected_price_low: price_low,
            expected_price_high: price_low + spread,
            favorite_keyword: keyword.to_owned(),
        });
    }

    let survey = Survey::new(customers)?;
    info!(rows = survey.len(), seed, "generated synthetic survey");
    Ok(survey)
}
