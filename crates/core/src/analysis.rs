//! Whole-pipeline evaluation.
//!
//! Composes the metrics calculator, recommendation scorer, precision
//! evaluator and business rule trigger into one pass over the two tables.
//! Everything is recomputed from the inputs on every call; callers that want
//! caching memoize on the table fingerprints carried in the report.

use serde::{Deserialize, Serialize};

use crate::domain::customer::CustomerId;
use crate::domain::tables::{Catalog, Survey};
use crate::errors::EngineError;
use crate::insights::{InsightEngine, InsightKey, InsightTrigger};
use crate::metrics::{category_coverage, price_accuracy, MetricsSnapshot};
use crate::precision::evaluate_precision;
use crate::recommend::{DeterministicScorer, RecommendationEntry, RecommendationScorer};

#[derive(Clone, Copy, Debug)]
pub struct AnalysisInput<'a> {
    pub survey: &'a Survey,
    pub catalog: &'a Catalog,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub snapshot: MetricsSnapshot,
    pub insights: Vec<InsightKey>,
    pub survey_fingerprint: String,
    pub catalog_fingerprint: String,
}

pub trait AnalysisRuntime: Send + Sync {
    fn evaluate(&self, input: AnalysisInput<'_>) -> Result<AnalysisReport, EngineError>;
}

pub struct DeterministicAnalysisRuntime<S, T> {
    scorer: S,
    trigger: T,
}

impl<S, T> DeterministicAnalysisRuntime<S, T> {
    pub fn new(scorer: S, trigger: T) -> Self {
        Self { scorer, trigger }
    }
}

impl Default for DeterministicAnalysisRuntime<DeterministicScorer, InsightEngine> {
    fn default() -> Self {
        Self::new(DeterministicScorer, InsightEngine::default())
    }
}

impl<S, T> DeterministicAnalysisRuntime<S, T>
where
    S: RecommendationScorer,
{
    /// Ranked entries for one customer, looked up by id.
    pub fn recommendations(
        &self,
        survey: &Survey,
        catalog: &Catalog,
        customer_id: &CustomerId,
        top_k: usize,
    ) -> Result<Vec<RecommendationEntry>, EngineError> {
        let customer = survey
            .find(customer_id)
            .ok_or_else(|| EngineError::validation(&customer_id.0, "unknown user_id"))?;
        self.scorer.score_and_rank(customer, catalog, top_k)
    }
}

impl<S, T> AnalysisRuntime for DeterministicAnalysisRuntime<S, T>
where
    S: RecommendationScorer,
    T: InsightTrigger,
{
    fn evaluate(&self, input: AnalysisInput<'_>) -> Result<AnalysisReport, EngineError> {
        let precision = evaluate_precision(input.survey, input.catalog, &self.scorer)?;
        let snapshot = MetricsSnapshot {
            category_coverage: category_coverage(input.survey, input.catalog),
            price_accuracy: price_accuracy(input.survey, input.catalog),
            precision_at_1: precision.at_1,
            precision_at_3: precision.at_3,
        };
        let insights = self.trigger.evaluate(input.survey, input.catalog, &snapshot);

        Ok(AnalysisReport {
            snapshot,
            insights,
            survey_fingerprint: input.survey.fingerprint(),
            catalog_fingerprint: input.catalog.fingerprint(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{AnalysisInput, AnalysisRuntime, DeterministicAnalysisRuntime};
    use crate::domain::customer::{Customer, CustomerId};
    use crate::domain::product::{Product, ProductId};
    use crate::domain::tables::{Catalog, Survey};
    use crate::errors::EngineError;
    use crate::metrics::Percent;

    fn survey() -> Survey {
        Survey::new(vec![Customer {
            id: CustomerId("USER_0001".to_owned()),
            preferred_category: "electronics".to_owned(),
            expected_price_low: 5_000.0,
            expected_price_high: 15_000.0,
            favorite_keyword: "phone".to_owned(),
        }])
        .unwrap()
    }

    fn catalog() -> Catalog {
        Catalog::new(vec![Product {
            id: ProductId("1".to_owned()),
            title: "Smartphone X".to_owned(),
            price: 10_000.0,
            category: "electronics".to_owned(),
            rating: 4.5,
            rating_count: 200,
        }])
        .unwrap()
    }

    #[test]
    fn report_carries_snapshot_insights_and_fingerprints() {
        let runtime = DeterministicAnalysisRuntime::default();
        let (survey, catalog) = (survey(), catalog());

        let report =
            runtime.evaluate(AnalysisInput { survey: &survey, catalog: &catalog }).unwrap();

        assert_eq!(report.snapshot.category_coverage, Percent::Defined(100.0));
        assert_eq!(report.snapshot.price_accuracy, Percent::Defined(100.0));
        assert_eq!(report.snapshot.precision_at_1, Percent::Defined(100.0));
        assert_eq!(report.survey_fingerprint, survey.fingerprint());
        assert_eq!(report.catalog_fingerprint, catalog.fingerprint());
    }

    #[test]
    fn evaluation_is_reproducible() {
        let runtime = DeterministicAnalysisRuntime::default();
        let (survey, catalog) = (survey(), catalog());

        let first =
            runtime.evaluate(AnalysisInput { survey: &survey, catalog: &catalog }).unwrap();
        let second =
            runtime.evaluate(AnalysisInput { survey: &survey, catalog: &catalog }).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn recommendations_for_unknown_customer_fail_with_the_id() {
        let runtime = DeterministicAnalysisRuntime::default();
        let (survey, catalog) = (survey(), catalog());

        let error = runtime
            .recommendations(&survey, &catalog, &CustomerId("USER_9999".to_owned()), 3)
            .unwrap_err();
        assert_eq!(error, EngineError::validation("USER_9999", "unknown user_id"));
    }
}
