use serde::{Deserialize, Serialize};

use crate::errors::EngineError;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CustomerId(pub String);

impl std::fmt::Display for CustomerId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// One survey respondent: what they want and what they expect to pay.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub preferred_category: String,
    pub expected_price_low: f64,
    pub expected_price_high: f64,
    pub favorite_keyword: String,
}

impl Customer {
    /// Midpoint of the declared budget range, the scorer's price anchor.
    /// Recomputed on every call so it can never go stale against the bounds.
    pub fn mid_price(&self) -> f64 {
        (self.expected_price_low + self.expected_price_high) / 2.0
    }

    /// Inclusive budget check on both ends.
    pub fn price_in_budget(&self, price: f64) -> bool {
        price >= self.expected_price_low && price <= self.expected_price_high
    }

    pub(crate) fn validate(&self) -> Result<(), EngineError> {
        let row = self.id.0.as_str();
        if row.trim().is_empty() {
            return Err(EngineError::validation("<unknown>", "user_id must be non-empty"));
        }
        if self.preferred_category.trim().is_empty() {
            return Err(EngineError::validation(row, "preferred_category must be non-empty"));
        }
        if self.favorite_keyword.trim().is_empty() {
            return Err(EngineError::validation(row, "favorite_keyword must be non-empty"));
        }
        if !self.expected_price_low.is_finite() || !self.expected_price_high.is_finite() {
            return Err(EngineError::validation(row, "price bounds must be finite"));
        }
        if self.expected_price_low < 0.0 || self.expected_price_high < 0.0 {
            return Err(EngineError::validation(row, "price bounds must be non-negative"));
        }
        if self.expected_price_low > self.expected_price_high {
            return Err(EngineError::validation(
                row,
                "expected_price_low > expected_price_high",
            ));
        }
        if self.mid_price() <= 0.0 {
            return Err(EngineError::validation(row, "mid_price must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Customer, CustomerId};
    use crate::errors::EngineError;

    fn customer(low: f64, high: f64) -> Customer {
        Customer {
            id: CustomerId("USER_0001".to_owned()),
            preferred_category: "electronics".to_owned(),
            expected_price_low: low,
            expected_price_high: high,
            favorite_keyword: "phone".to_owned(),
        }
    }

    #[test]
    fn mid_price_is_the_arithmetic_midpoint() {
        assert_eq!(customer(5_000.0, 15_000.0).mid_price(), 10_000.0);
        assert_eq!(customer(10_000.0, 10_000.0).mid_price(), 10_000.0);
    }

    #[test]
    fn budget_check_is_inclusive_on_both_ends() {
        let respondent = customer(5_000.0, 15_000.0);
        assert!(respondent.price_in_budget(5_000.0));
        assert!(respondent.price_in_budget(15_000.0));
        assert!(!respondent.price_in_budget(15_000.01));
    }

    #[test]
    fn inverted_bounds_are_rejected_with_the_row_id() {
        let error = customer(15_000.0, 5_000.0).validate().unwrap_err();
        assert_eq!(
            error,
            EngineError::validation("USER_0001", "expected_price_low > expected_price_high")
        );
    }

    #[test]
    fn zero_mid_price_is_rejected() {
        assert!(customer(0.0, 0.0).validate().is_err());
    }

    #[test]
    fn blank_keyword_is_rejected() {
        let mut respondent = customer(1_000.0, 2_000.0);
        respondent.favorite_keyword = " ".to_owned();
        assert!(respondent.validate().is_err());
    }
}
