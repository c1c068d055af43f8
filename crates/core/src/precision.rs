//! Precision of the ranked recommendations.
//!
//! A ranked product is a relevance hit for its customer iff the title
//! contains the customer's favorite keyword (case-insensitive) AND the price
//! sits inside the inclusive budget range. Both conditions are required;
//! this is deliberately stricter than the "has match" boolean behind price
//! accuracy. Precision@K is the fraction of customers with a hit anywhere in
//! their top K, computed over the full population: customers with an empty
//! ranked list count as misses, never leave the denominator.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::customer::{Customer, CustomerId};
use crate::domain::product::Product;
use crate::domain::tables::{Catalog, Survey};
use crate::errors::EngineError;
use crate::metrics::Percent;
use crate::recommend::{RecommendationEntry, RecommendationScorer, DEFAULT_TOP_K};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PrecisionReport {
    pub at_1: Percent,
    pub at_3: Percent,
}

/// The relevance criterion shared by both precision depths.
pub fn relevance_hit(customer: &Customer, product: &Product) -> bool {
    product.title_contains(&customer.favorite_keyword)
        && customer.price_in_budget(product.price)
}

/// Precision@K over caller-supplied ranked lists. Entries whose product id
/// no longer resolves against the catalog count as misses, the same as an
/// absent or empty list.
pub fn precision_at(
    survey: &Survey,
    catalog: &Catalog,
    ranked: &HashMap<CustomerId, Vec<RecommendationEntry>>,
    k: usize,
) -> Percent {
    let hits = survey
        .iter()
        .filter(|customer| {
            ranked
                .get(&customer.id)
                .map(|entries| {
                    entries.iter().take(k).any(|entry| {
                        catalog
                            .find(&entry.product_id)
                            .is_some_and(|product| relevance_hit(customer, product))
                    })
                })
                .unwrap_or(false)
        })
        .count();
    Percent::from_counts(hits, survey.len())
}

/// Scores every customer at the default depth and reports both precision
/// levels. P@3 is always >= P@1: a rank-1 hit is also a top-3 hit.
pub fn evaluate_precision<S: RecommendationScorer>(
    survey: &Survey,
    catalog: &Catalog,
    scorer: &S,
) -> Result<PrecisionReport, EngineError> {
    let mut ranked = HashMap::with_capacity(survey.len());
    for customer in survey.iter() {
        let entries = scorer.score_and_rank(customer, catalog, DEFAULT_TOP_K)?;
        let _ = ranked.insert(customer.id.clone(), entries);
    }

    Ok(PrecisionReport {
        at_1: precision_at(survey, catalog, &ranked, 1),
        at_3: precision_at(survey, catalog, &ranked, DEFAULT_TOP_K),
    })
}
