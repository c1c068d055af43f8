//! Aggregate fit metrics over the two input tables.
//!
//! Category Coverage asks "does the market stock what this customer wants at
//! all"; Price Accuracy asks "is there an in-category product inside their
//! budget". Both are percentages over the full customer population, or the
//! explicit undefined marker when the population is empty.

use serde::{Deserialize, Serialize};

use crate::domain::customer::Customer;
use crate::domain::tables::{Catalog, Survey};
use crate::errors::EngineError;

/// A percentage that is either a finite value in [0, 100] or explicitly
/// undefined. Undefined is never coerced to 0 or NaN: 0% coverage means
/// "nobody is covered", which is a different statement from "there is nobody
/// to cover".
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "value")]
pub enum Percent {
    Defined(f64),
    Undefined,
}

impl Percent {
    /// Percentage of `hits` over `population`; undefined for an empty
    /// population.
    pub fn from_counts(hits: usize, population: usize) -> Self {
        if population == 0 {
            Self::Undefined
        } else {
            Self::Defined(hits as f64 / population as f64 * 100.0)
        }
    }

    pub fn is_defined(&self) -> bool {
        matches!(self, Self::Defined(_))
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Defined(value) => Some(*value),
            Self::Undefined => None,
        }
    }

    /// The defined value, or a `ComputationUndefined`-class error naming the
    /// metric for callers that require a number.
    pub fn require(&self, metric: &'static str) -> Result<f64, EngineError> {
        self.value().ok_or(EngineError::Undefined { metric })
    }
}

/// The four headline percentages, computed from the full tables as of the
/// moment of the call. Any change to either table invalidates a snapshot;
/// there is no incremental update path.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub category_coverage: Percent,
    pub price_accuracy: Percent,
    pub precision_at_1: Percent,
    pub precision_at_3: Percent,
}

/// Fraction of customers whose preferred category has at least one product
/// anywhere in the catalog.
pub fn category_coverage(survey: &Survey, catalog: &Catalog) -> Percent {
    let covered = survey
        .iter()
        .filter(|customer| catalog.in_category(&customer.preferred_category).next().is_some())
        .count();
    Percent::from_counts(covered, survey.len())
}

/// True iff some in-category product falls inside the customer's inclusive
/// budget range. Category is filtered first so an out-of-category bargain
/// never counts as an accuracy hit.
pub fn has_price_match(customer: &Customer, catalog: &Catalog) -> bool {
    catalog
        .in_category(&customer.preferred_category)
        .any(|product| customer.price_in_budget(product.price))
}

/// Fraction of customers with at least one in-budget, in-category product.
/// An empty catalog yields a defined 0% for a non-empty survey: the absence
/// of any candidate product is a meaningful zero, not an undefined ratio.
pub fn price_accuracy(survey: &Survey, catalog: &Catalog) -> Percent {
    let matched =
        survey.iter().filter(|customer| has_price_match(customer, catalog)).count();
    Percent::from_counts(matched, survey.len())
}
