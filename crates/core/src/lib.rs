pub mod analysis;
pub mod config;
pub mod domain;
pub mod errors;
pub mod insights;
pub mod metrics;
pub mod precision;
pub mod recommend;

pub use analysis::{
    AnalysisInput, AnalysisReport, AnalysisRuntime, DeterministicAnalysisRuntime,
};
pub use domain::customer::{Customer, CustomerId};
pub use domain::product::{Product, ProductId};
pub use domain::tables::{Catalog, Survey};
pub use errors::EngineError;
pub use insights::{InsightConfig, InsightEngine, InsightKey, InsightTrigger};
pub use metrics::{category_coverage, price_accuracy, MetricsSnapshot, Percent};
pub use precision::{evaluate_precision, precision_at, relevance_hit, PrecisionReport};
pub use recommend::{
    price_penalty, score_product, DeterministicScorer, RecommendationEntry, RecommendationScorer,
    CANDIDATE_PRICE_BUFFER, DEFAULT_TOP_K, PRICE_PENALTY_WEIGHT,
};
