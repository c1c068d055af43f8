//! Per-customer product ranking.
//!
//! Scores every in-category candidate against one customer and returns the
//! top-K entries in a deterministic total order.

mod engine;
mod scoring;
mod types;

pub use engine::{DeterministicScorer, RecommendationScorer};
pub use scoring::{price_penalty, score_product};
pub use types::RecommendationEntry;

/// Fixed design constant controlling how strongly price mismatch is punished
/// relative to the quality signal.
pub const PRICE_PENALTY_WEIGHT: f64 = 2.0;

/// Default ranked-list depth; precision metrics are defined over this depth.
pub const DEFAULT_TOP_K: usize = 3;

/// Relative slack applied to a customer's budget when selecting candidate
/// products: the window is `[low * (1 - buffer), high * (1 + buffer)]`.
pub const CANDIDATE_PRICE_BUFFER: f64 = 0.2;
