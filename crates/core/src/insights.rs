//! Business rule trigger.
//!
//! A fixed, ordered set of named rules evaluated against the two tables and
//! the metrics snapshot. Each rule is an independent pure predicate emitting
//! zero or one insight key; given the same inputs the same keys fire in the
//! same priority order, every time. Presentation of the insight text is the
//! caller's concern.

use serde::{Deserialize, Serialize};

use crate::domain::tables::{Catalog, Survey};
use crate::errors::EngineError;
use crate::metrics::MetricsSnapshot;

/// The fixed rule set, in priority order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKey {
    ComboOpportunity,
    BudgetGap,
    CrossSellAttach,
    StockReplenishment,
    FlashSale,
    PremiumUpsell,
    RelevanceAlert,
}

impl InsightKey {
    pub const ALL: [Self; 7] = [
        Self::ComboOpportunity,
        Self::BudgetGap,
        Self::CrossSellAttach,
        Self::StockReplenishment,
        Self::FlashSale,
        Self::PremiumUpsell,
        Self::RelevanceAlert,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::ComboOpportunity => "combo_opportunity",
            Self::BudgetGap => "budget_gap",
            Self::CrossSellAttach => "cross_sell_attach",
            Self::StockReplenishment => "stock_replenishment",
            Self::FlashSale => "flash_sale",
            Self::PremiumUpsell => "premium_upsell",
            Self::RelevanceAlert => "relevance_alert",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::ComboOpportunity => "Bundle the accessory customers already search for",
            Self::BudgetGap => "Cheapest matching product sits above customer budgets",
            Self::CrossSellAttach => "Attach a companion product to high-intent purchases",
            Self::StockReplenishment => "Demand outpaces catalog supply for a tracked segment",
            Self::FlashSale => "Market prices run above customer budgets across the board",
            Self::PremiumUpsell => "A premium-budget segment exists for up-sell variants",
            Self::RelevanceAlert => "Top-ranked recommendations rarely match customer intent",
        }
    }
}

impl std::str::FromStr for InsightKey {
    type Err = EngineError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|insight| insight.key() == value.trim().to_ascii_lowercase())
            .ok_or_else(|| EngineError::Configuration(format!("unknown insight rule key `{value}`")))
    }
}

/// Thresholds and keyword segments the rules evaluate against. Defaults
/// mirror the tracked segments of the upstream survey datasets.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InsightConfig {
    pub combo_keyword: String,
    pub combo_min_customers: usize,
    pub budget_gap_keywords: Vec<String>,
    /// Minimum excess of the cheapest matching price over a customer's
    /// budget ceiling before the gap counts.
    pub budget_gap_threshold: f64,
    pub cross_sell_keywords: Vec<String>,
    pub cross_sell_min_customers: usize,
    pub stock_alert_keywords: Vec<String>,
    /// Fires when demand exceeds supply times this ratio.
    pub stock_demand_supply_ratio: f64,
    pub premium_budget_threshold: f64,
    pub premium_min_customers: usize,
    /// Precision@1 floor (percent) below which relevance is flagged.
    pub relevance_alert_floor: f64,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            combo_keyword: "mouse".to_owned(),
            combo_min_customers: 1,
            budget_gap_keywords: vec!["earbuds".to_owned(), "headphones".to_owned()],
            budget_gap_threshold: 1_000.0,
            cross_sell_keywords: vec!["gaming".to_owned(), "laptop".to_owned()],
            cross_sell_min_customers: 1,
            stock_alert_keywords: vec![
                "phone".to_owned(),
                "smartphone".to_owned(),
                "mobile".to_owned(),
            ],
            stock_demand_supply_ratio: 0.5,
            premium_budget_threshold: 20_000.0,
            premium_min_customers: 1,
            relevance_alert_floor: 30.0,
        }
    }
}

/// Seam for the analysis runtime; the deterministic rule set below is the
/// only production implementation.
pub trait InsightTrigger: Send + Sync {
    fn evaluate(
        &self,
        survey: &Survey,
        catalog: &Catalog,
        snapshot: &MetricsSnapshot,
    ) -> Vec<InsightKey>;
}

#[derive(Clone, Debug, Default)]
pub struct InsightEngine {
    config: InsightConfig,
}

impl InsightEngine {
    pub fn new(config: InsightConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &InsightConfig {
        &self.config
    }

    fn rule_fires(
        &self,
        rule: InsightKey,
        survey: &Survey,
        catalog: &Catalog,
        snapshot: &MetricsSnapshot,
    ) -> bool {
        match rule {
            InsightKey::ComboOpportunity => self.combo_opportunity(survey),
            InsightKey::BudgetGap => self.budget_gap(survey, catalog),
            InsightKey::CrossSellAttach => self.cross_sell_attach(survey),
            InsightKey::StockReplenishment => self.stock_replenishment(survey, catalog),
            InsightKey::FlashSale => self.flash_sale(survey, catalog),
            InsightKey::PremiumUpsell => self.premium_upsell(survey),
            InsightKey::RelevanceAlert => self.relevance_alert(snapshot),
        }
    }

    fn combo_opportunity(&self, survey: &Survey) -> bool {
        let interested = survey
            .iter()
            .filter(|customer| keyword_matches(&customer.favorite_keyword, &self.config.combo_keyword))
            .count();
        interested >= self.config.combo_min_customers
    }

    fn budget_gap(&self, survey: &Survey, catalog: &Catalog) -> bool {
        let cheapest_matching = catalog
            .iter()
            .filter(|product| {
                self.config
                    .budget_gap_keywords
                    .iter()
                    .any(|keyword| product.title_contains(keyword))
            })
            .map(|product| product.price)
            .fold(None::<f64>, |cheapest, price| {
                Some(cheapest.map_or(price, |current| current.min(price)))
            });
        let Some(cheapest) = cheapest_matching else {
            return false;
        };

        survey
            .iter()
            .filter(|customer| {
                self.config
                    .budget_gap_keywords
                    .iter()
                    .any(|keyword| keyword_matches(&customer.favorite_keyword, keyword))
            })
            .any(|customer| cheapest - customer.expected_price_high > self.config.budget_gap_threshold)
    }

    fn cross_sell_attach(&self, survey: &Survey) -> bool {
        let interested = survey
            .iter()
            .filter(|customer| {
                self.config
                    .cross_sell_keywords
                    .iter()
                    .any(|keyword| keyword_matches(&customer.favorite_keyword, keyword))
            })
            .count();
        interested >= self.config.cross_sell_min_customers
    }

    fn stock_replenishment(&self, survey: &Survey, catalog: &Catalog) -> bool {
        let demand = survey
            .iter()
            .filter(|customer| {
                self.config
                    .stock_alert_keywords
                    .iter()
                    .any(|keyword| keyword_matches(&customer.favorite_keyword, keyword))
            })
            .count();
        if demand == 0 {
            return false;
        }

        let supply = catalog
            .iter()
            .filter(|product| {
                self.config
                    .stock_alert_keywords
                    .iter()
                    .any(|keyword| product.title_contains(keyword))
            })
            .count();
        demand as f64 > supply as f64 * self.config.stock_demand_supply_ratio
    }

    fn flash_sale(&self, survey: &Survey, catalog: &Catalog) -> bool {
        if survey.is_empty() || catalog.is_empty() {
            return false;
        }
        let average_budget_high =
            survey.iter().map(|customer| customer.expected_price_high).sum::<f64>()
                / survey.len() as f64;
        let average_market_price =
            catalog.iter().map(|product| product.price).sum::<f64>() / catalog.len() as f64;
        average_market_price > average_budget_high
    }

    fn premium_upsell(&self, survey: &Survey) -> bool {
        let premium = survey
            .iter()
            .filter(|customer| customer.expected_price_high > self.config.premium_budget_threshold)
            .count();
        premium >= self.config.premium_min_customers
    }

    fn relevance_alert(&self, snapshot: &MetricsSnapshot) -> bool {
        snapshot
            .precision_at_1
            .value()
            .is_some_and(|precision| precision < self.config.relevance_alert_floor)
    }

    /// Evaluate a subset of the rule set, still in priority order.
    pub fn evaluate_rules(
        &self,
        rules: &[InsightKey],
        survey: &Survey,
        catalog: &Catalog,
        snapshot: &MetricsSnapshot,
    ) -> Vec<InsightKey> {
        InsightKey::ALL
            .into_iter()
            .filter(|rule| rules.contains(rule))
            .filter(|rule| self.rule_fires(*rule, survey, catalog, snapshot))
            .collect()
    }
}

impl InsightTrigger for InsightEngine {
    fn evaluate(
        &self,
        survey: &Survey,
        catalog: &Catalog,
        snapshot: &MetricsSnapshot,
    ) -> Vec<InsightKey> {
        self.evaluate_rules(&InsightKey::ALL, survey, catalog, snapshot)
    }
}

fn keyword_matches(favorite_keyword: &str, segment_keyword: &str) -> bool {
    favorite_keyword.to_lowercase().contains(&segment_keyword.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::{InsightConfig, InsightEngine, InsightKey, InsightTrigger};
    use crate::domain::customer::{Customer, CustomerId};
    use crate::domain::product::{Product, ProductId};
    use crate::domain::tables::{Catalog, Survey};
    use crate::errors::EngineError;
    use crate::metrics::{MetricsSnapshot, Percent};

    fn customer(id: &str, keyword: &str, high: f64) -> Customer {
        Customer {
            id: CustomerId(id.to_owned()),
            preferred_category: "electronics".to_owned(),
            expected_price_low: high / 2.0,
            expected_price_high: high,
            favorite_keyword: keyword.to_owned(),
        }
    }

    fn product(id: &str, title: &str, price: f64) -> Product {
        Product {
            id: ProductId(id.to_owned()),
            title: title.to_owned(),
            price,
            category: "electronics".to_owned(),
            rating: 4.0,
            rating_count: 100,
        }
    }

    fn snapshot(precision_at_1: Percent) -> MetricsSnapshot {
        MetricsSnapshot {
            category_coverage: Percent::Defined(100.0),
            price_accuracy: Percent::Defined(80.0),
            precision_at_1,
            precision_at_3: Percent::Defined(60.0),
        }
    }

    #[test]
    fn fired_keys_come_back_in_fixed_priority_order() {
        let survey = Survey::new(vec![
            customer("a", "mouse", 2_000.0),
            customer("b", "gaming laptop", 60_000.0),
            customer("c", "smartphone", 12_000.0),
        ])
        .unwrap();
        let catalog = Catalog::new(vec![product("1", "Ergonomic Mouse", 1_500.0)]).unwrap();
        let engine = InsightEngine::default();

        let first = engine.evaluate(&survey, &catalog, &snapshot(Percent::Defined(50.0)));
        let second = engine.evaluate(&survey, &catalog, &snapshot(Percent::Defined(50.0)));
        assert_eq!(first, second, "trigger must be deterministic");

        let positions: Vec<usize> = first
            .iter()
            .map(|fired| InsightKey::ALL.iter().position(|key| key == fired).unwrap())
            .collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(first.contains(&InsightKey::ComboOpportunity));
        assert!(first.contains(&InsightKey::CrossSellAttach));
        assert!(first.contains(&InsightKey::StockReplenishment));
    }

    #[test]
    fn budget_gap_needs_the_cheapest_match_above_the_ceiling() {
        let survey = Survey::new(vec![customer("a", "earbuds", 2_000.0)]).unwrap();
        let engine = InsightEngine::default();
        let metrics = snapshot(Percent::Defined(50.0));

        let gap = Catalog::new(vec![product("1", "Pro Earbuds", 3_500.0)]).unwrap();
        assert!(engine
            .evaluate(&survey, &gap, &metrics)
            .contains(&InsightKey::BudgetGap));

        // 2_900 is above the ceiling but within the 1_000 threshold.
        let near = Catalog::new(vec![product("1", "Pro Earbuds", 2_900.0)]).unwrap();
        assert!(!engine
            .evaluate(&survey, &near, &metrics)
            .contains(&InsightKey::BudgetGap));

        // No matching product at all: nothing to gap against.
        let unrelated = Catalog::new(vec![product("1", "Desk Lamp", 99_000.0)]).unwrap();
        assert!(!engine
            .evaluate(&survey, &unrelated, &metrics)
            .contains(&InsightKey::BudgetGap));
    }

    #[test]
    fn stock_alert_fires_when_demand_outruns_supply() {
        let survey = Survey::new(vec![
            customer("a", "smartphone", 12_000.0),
            customer("b", "phone", 9_000.0),
        ])
        .unwrap();
        let engine = InsightEngine::default();
        let metrics = snapshot(Percent::Defined(50.0));

        // Two customers, one matching product: 2 > 1 * 0.5.
        let thin = Catalog::new(vec![product("1", "Smartphone X", 10_000.0)]).unwrap();
        assert!(engine
            .evaluate(&survey, &thin, &metrics)
            .contains(&InsightKey::StockReplenishment));

        // Two customers against five matching products: 2 > 2.5 is false.
        let stocked = Catalog::new(vec![
            product("1", "Smartphone X", 10_000.0),
            product("2", "Smartphone Y", 11_000.0),
            product("3", "Phone Z", 8_000.0),
            product("4", "Smartphone Q", 9_500.0),
            product("5", "Phone R", 7_000.0),
        ])
        .unwrap();
        assert!(!engine
            .evaluate(&survey, &stocked, &metrics)
            .contains(&InsightKey::StockReplenishment));
    }

    #[test]
    fn premium_upsell_counts_budget_ceilings_above_the_threshold() {
        let engine = InsightEngine::default();
        let catalog = Catalog::new(Vec::new()).unwrap();
        let metrics = snapshot(Percent::Defined(50.0));

        let premium = Survey::new(vec![customer("a", "tablet", 25_000.0)]).unwrap();
        assert!(engine
            .evaluate(&premium, &catalog, &metrics)
            .contains(&InsightKey::PremiumUpsell));

        let modest = Survey::new(vec![customer("a", "tablet", 15_000.0)]).unwrap();
        assert!(!engine
            .evaluate(&modest, &catalog, &metrics)
            .contains(&InsightKey::PremiumUpsell));
    }

    #[test]
    fn relevance_alert_ignores_undefined_precision() {
        let engine = InsightEngine::default();
        let survey = Survey::new(Vec::new()).unwrap();
        let catalog = Catalog::new(Vec::new()).unwrap();

        assert!(engine
            .evaluate(&survey, &catalog, &snapshot(Percent::Defined(10.0)))
            .contains(&InsightKey::RelevanceAlert));
        assert!(!engine
            .evaluate(&survey, &catalog, &snapshot(Percent::Undefined))
            .contains(&InsightKey::RelevanceAlert));
    }

    #[test]
    fn rule_keys_round_trip_and_unknown_keys_are_configuration_errors() {
        for key in InsightKey::ALL {
            assert_eq!(key.key().parse::<InsightKey>().unwrap(), key);
        }
        let error = "combo_opportunities".parse::<InsightKey>().unwrap_err();
        assert!(matches!(error, EngineError::Configuration(_)));
    }

    #[test]
    fn thresholds_are_configurable() {
        let engine = InsightEngine::new(InsightConfig {
            premium_budget_threshold: 10_000.0,
            ..InsightConfig::default()
        });
        let survey = Survey::new(vec![customer("a", "tablet", 15_000.0)]).unwrap();
        let catalog = Catalog::new(Vec::new()).unwrap();

        assert!(engine
            .evaluate(&survey, &catalog, &snapshot(Percent::Defined(50.0)))
            .contains(&InsightKey::PremiumUpsell));
    }
}
