use std::cmp::Ordering;

use crate::domain::customer::Customer;
use crate::domain::product::Product;
use crate::domain::tables::Catalog;
use crate::errors::EngineError;

use super::scoring::score_product;
use super::types::RecommendationEntry;
use super::CANDIDATE_PRICE_BUFFER;

/// Per-customer ranking over the catalog.
pub trait RecommendationScorer: Send + Sync {
    /// Up to `top_k` entries for one customer, ordered by descending score.
    /// Ties break by descending `rating_count`, then ascending `product_id`,
    /// giving a deterministic total order regardless of catalog row order.
    fn score_and_rank(
        &self,
        customer: &Customer,
        catalog: &Catalog,
        top_k: usize,
    ) -> Result<Vec<RecommendationEntry>, EngineError>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct DeterministicScorer;

impl DeterministicScorer {
    /// Candidate set for one customer: in-category products whose price sits
    /// inside the buffered budget window. When the window excludes every
    /// in-category product, the whole category becomes the candidate set so
    /// the customer still gets a ranked list.
    fn candidates<'a>(&self, customer: &'a Customer, catalog: &'a Catalog) -> Vec<&'a Product> {
        let window_low = customer.expected_price_low * (1.0 - CANDIDATE_PRICE_BUFFER);
        let window_high = customer.expected_price_high * (1.0 + CANDIDATE_PRICE_BUFFER);

        let windowed: Vec<&Product> = catalog
            .in_category(&customer.preferred_category)
            .filter(|product| product.price >= window_low && product.price <= window_high)
            .collect();
        if windowed.is_empty() {
            catalog.in_category(&customer.preferred_category).collect()
        } else {
            windowed
        }
    }
}

impl RecommendationScorer for DeterministicScorer {
    fn score_and_rank(
        &self,
        customer: &Customer,
        catalog: &Catalog,
        top_k: usize,
    ) -> Result<Vec<RecommendationEntry>, EngineError> {
        if top_k == 0 {
            return Err(EngineError::Configuration("top_k must be greater than zero".to_owned()));
        }
        if customer.mid_price() <= 0.0 {
            return Err(EngineError::validation(
                &customer.id.0,
                "mid_price must be positive for scoring",
            ));
        }

        let mut scored: Vec<(&Product, f64)> = self
            .candidates(customer, catalog)
            .into_iter()
            .map(|product| (product, score_product(product, customer)))
            .collect();

        scored.sort_by(|(left, left_score), (right, right_score)| {
            right_score
                .partial_cmp(left_score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| right.rating_count.cmp(&left.rating_count))
                .then_with(|| left.id.cmp(&right.id))
        });

        Ok(scored
            .into_iter()
            .take(top_k)
            .enumerate()
            .map(|(index, (product, score))| RecommendationEntry {
                customer_id: customer.id.clone(),
                product_id: product.id.clone(),
                score,
                rank: index + 1,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::{DeterministicScorer, RecommendationScorer};
    use crate::domain::customer::{Customer, CustomerId};
    use crate::domain::product::{Product, ProductId};
    use crate::domain::tables::Catalog;
    use crate::errors::EngineError;

    fn customer() -> Customer {
        Customer {
            id: CustomerId("USER_0001".to_owned()),
            preferred_category: "electronics".to_owned(),
            expected_price_low: 5_000.0,
            expected_price_high: 15_000.0,
            favorite_keyword: "phone".to_owned(),
        }
    }

    fn product(id: &str, price: f64, rating: f64, rating_count: u32) -> Product {
        Product {
            id: ProductId(id.to_owned()),
            title: format!("Item {id}"),
            price,
            category: "electronics".to_owned(),
            rating,
            rating_count,
        }
    }

    #[test]
    fn returns_at_most_top_k_entries_ranked_from_one() {
        let catalog = Catalog::new(vec![
            product("1", 10_000.0, 4.5, 200),
            product("2", 9_000.0, 4.0, 150),
            product("3", 12_000.0, 3.5, 80),
        ])
        .unwrap();
        let scorer = DeterministicScorer;

        let entries = scorer.score_and_rank(&customer(), &catalog, 2).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].rank, 1);
        assert_eq!(entries[1].rank, 2);
        assert!(entries[0].score >= entries[1].score);

        let all = scorer.score_and_rank(&customer(), &catalog, 10).unwrap();
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn ranking_is_invariant_to_catalog_row_order() {
        let rows = vec![
            product("1", 10_000.0, 4.5, 200),
            product("2", 9_000.0, 4.0, 150),
            product("3", 12_000.0, 4.8, 900),
            product("4", 7_500.0, 3.9, 40),
        ];
        let mut reversed = rows.clone();
        reversed.reverse();

        let scorer = DeterministicScorer;
        let forward = scorer
            .score_and_rank(&customer(), &Catalog::new(rows).unwrap(), 4)
            .unwrap();
        let backward = scorer
            .score_and_rank(&customer(), &Catalog::new(reversed).unwrap(), 4)
            .unwrap();

        assert_eq!(forward, backward);
    }

    #[test]
    fn exact_score_ties_break_by_rating_count_then_product_id() {
        // Identical price/rating/rating_count for "b" and "a": id decides.
        let catalog = Catalog::new(vec![
            product("b", 10_000.0, 4.0, 100),
            product("a", 10_000.0, 4.0, 100),
            product("c", 10_000.0, 4.0, 500),
        ])
        .unwrap();

        let entries = DeterministicScorer.score_and_rank(&customer(), &catalog, 3).unwrap();
        // "c" wins on rating_count-driven score; the equal pair orders by id.
        assert_eq!(entries[0].product_id, ProductId("c".to_owned()));
        assert_eq!(entries[1].product_id, ProductId("a".to_owned()));
        assert_eq!(entries[2].product_id, ProductId("b".to_owned()));
    }

    #[test]
    fn budget_window_excludes_far_out_of_budget_products() {
        // Window for [5000, 15000] is [4000, 18000]: the cheap, heavily
        // reviewed charger never becomes a candidate, so the in-budget
        // smartphone takes rank 1 even though the charger's raw quality term
        // is larger.
        let catalog = Catalog::new(vec![
            product("1", 10_000.0, 4.5, 200),
            product("2", 500.0, 4.0, 1_000),
        ])
        .unwrap();

        let entries = DeterministicScorer.score_and_rank(&customer(), &catalog, 3).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].product_id, ProductId("1".to_owned()));
    }

    #[test]
    fn empty_window_falls_back_to_the_whole_category() {
        // Nothing inside [4000, 18000]: rank the full category instead of
        // returning nothing.
        let catalog = Catalog::new(vec![
            product("1", 500.0, 4.0, 1_000),
            product("2", 40_000.0, 4.5, 200),
        ])
        .unwrap();

        let entries = DeterministicScorer.score_and_rank(&customer(), &catalog, 3).unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn empty_catalog_yields_an_empty_list_not_an_error() {
        let catalog = Catalog::new(Vec::new()).unwrap();
        let entries = DeterministicScorer.score_and_rank(&customer(), &catalog, 3).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn out_of_category_products_are_not_candidates() {
        let mut furniture = product("1", 10_000.0, 5.0, 10_000);
        furniture.category = "furniture".to_owned();
        let catalog = Catalog::new(vec![furniture]).unwrap();

        let entries = DeterministicScorer.score_and_rank(&customer(), &catalog, 3).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn zero_top_k_is_a_configuration_error() {
        let catalog = Catalog::new(Vec::new()).unwrap();
        let error = DeterministicScorer.score_and_rank(&customer(), &catalog, 0).unwrap_err();
        assert!(matches!(error, EngineError::Configuration(_)));
    }

    #[test]
    fn non_positive_mid_price_is_a_validation_error() {
        let mut degenerate = customer();
        degenerate.expected_price_low = 0.0;
        degenerate.expected_price_high = 0.0;
        let catalog = Catalog::new(vec![product("1", 100.0, 4.0, 10)]).unwrap();

        let error = DeterministicScorer.score_and_rank(&degenerate, &catalog, 3).unwrap_err();
        assert!(matches!(error, EngineError::Validation { .. }));
    }
}
