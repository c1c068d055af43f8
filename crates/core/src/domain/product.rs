use serde::{Deserialize, Serialize};

use crate::errors::EngineError;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProductId(pub String);

impl std::fmt::Display for ProductId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// One catalog item. Prices arrive already denominated in the target
/// currency; conversion is an upstream concern.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: f64,
    pub category: String,
    pub rating: f64,
    pub rating_count: u32,
}

impl Product {
    /// Case-insensitive substring containment of `keyword` in the title.
    pub fn title_contains(&self, keyword: &str) -> bool {
        self.title.to_lowercase().contains(&keyword.to_lowercase())
    }

    pub(crate) fn validate(&self) -> Result<(), EngineError> {
        let row = self.id.0.as_str();
        if row.trim().is_empty() {
            return Err(EngineError::validation("<unknown>", "product_id must be non-empty"));
        }
        if self.title.trim().is_empty() {
            return Err(EngineError::validation(row, "title must be non-empty"));
        }
        if self.category.trim().is_empty() {
            return Err(EngineError::validation(row, "category must be non-empty"));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(EngineError::validation(row, "price must be finite and non-negative"));
        }
        if !self.rating.is_finite() || !(0.0..=5.0).contains(&self.rating) {
            return Err(EngineError::validation(row, "rating must be within [0, 5]"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Product, ProductId};

    fn product(rating: f64, price: f64) -> Product {
        Product {
            id: ProductId("1".to_owned()),
            title: "Smartphone X".to_owned(),
            price,
            category: "electronics".to_owned(),
            rating,
            rating_count: 200,
        }
    }

    #[test]
    fn keyword_containment_is_case_insensitive() {
        let item = product(4.5, 10_000.0);
        assert!(item.title_contains("PHONE"));
        assert!(item.title_contains("smartphone x"));
        assert!(!item.title_contains("charger"));
    }

    #[test]
    fn out_of_range_rating_is_rejected() {
        assert!(product(5.1, 100.0).validate().is_err());
        assert!(product(-0.1, 100.0).validate().is_err());
        assert!(product(5.0, 100.0).validate().is_ok());
    }

    #[test]
    fn negative_price_is_rejected() {
        assert!(product(4.0, -1.0).validate().is_err());
    }

    #[test]
    fn zero_rating_count_is_valid() {
        let mut item = product(4.0, 100.0);
        item.rating_count = 0;
        assert!(item.validate().is_ok());
    }
}
