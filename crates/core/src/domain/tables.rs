//! Validated input tables.
//!
//! The engine treats its two inputs as fixed, schema-checked tables: every
//! row is validated exactly once at this ingestion boundary and never
//! re-validated inside formula evaluation. Both tables are immutable after
//! construction, which keeps every downstream computation a pure function of
//! their contents.

use std::collections::HashSet;

use serde_json::json;

use crate::domain::customer::{Customer, CustomerId};
use crate::domain::product::{Product, ProductId};
use crate::errors::EngineError;

/// The customer demand table.
#[derive(Clone, Debug, PartialEq)]
pub struct Survey {
    customers: Vec<Customer>,
}

impl Survey {
    pub fn new(customers: Vec<Customer>) -> Result<Self, EngineError> {
        let mut seen: HashSet<&str> = HashSet::new();
        for customer in &customers {
            customer.validate()?;
            if !seen.insert(customer.id.0.as_str()) {
                return Err(EngineError::validation(&customer.id.0, "duplicate user_id"));
            }
        }
        Ok(Self { customers })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Customer> {
        self.customers.iter()
    }

    pub fn len(&self) -> usize {
        self.customers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }

    pub fn find(&self, customer_id: &CustomerId) -> Option<&Customer> {
        self.customers.iter().find(|customer| &customer.id == customer_id)
    }

    /// Content hash of the table, stable across row order. Callers that want
    /// to memoize snapshots or rankings key them on this value.
    pub fn fingerprint(&self) -> String {
        let mut rows: Vec<String> = self
            .customers
            .iter()
            .map(|customer| {
                json!({
                    "user_id": customer.id.0,
                    "preferred_category": customer.preferred_category,
                    "expected_price_low": customer.expected_price_low,
                    "expected_price_high": customer.expected_price_high,
                    "favorite_keyword": customer.favorite_keyword,
                })
                .to_string()
            })
            .collect();
        rows.sort();
        hash_rows(&rows)
    }
}

/// The market supply table.
#[derive(Clone, Debug, PartialEq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Result<Self, EngineError> {
        let mut seen: HashSet<&str> = HashSet::new();
        for product in &products {
            product.validate()?;
            if !seen.insert(product.id.0.as_str()) {
                return Err(EngineError::validation(&product.id.0, "duplicate product_id"));
            }
        }
        Ok(Self { products })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn find(&self, product_id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|product| &product.id == product_id)
    }

    /// Products in the given category.
    pub fn in_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Product> {
        self.products.iter().filter(move |product| product.category == category)
    }

    pub fn fingerprint(&self) -> String {
        let mut rows: Vec<String> = self
            .products
            .iter()
            .map(|product| {
                json!({
                    "product_id": product.id.0,
                    "title": product.title,
                    "price": product.price,
                    "category": product.category,
                    "rating": product.rating,
                    "rating_count": product.rating_count,
                })
                .to_string()
            })
            .collect();
        rows.sort();
        hash_rows(&rows)
    }
}

fn hash_rows(rows: &[String]) -> String {
    let mut hasher = blake3::Hasher::new();
    for row in rows {
        hasher.update(row.as_bytes());
        hasher.update(b"\n");
    }
    hasher.finalize().to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::{Catalog, Survey};
    use crate::domain::customer::{Customer, CustomerId};
    use crate::domain::product::{Product, ProductId};
    use crate::errors::EngineError;

    fn customer(id: &str) -> Customer {
        Customer {
            id: CustomerId(id.to_owned()),
            preferred_category: "electronics".to_owned(),
            expected_price_low: 5_000.0,
            expected_price_high: 15_000.0,
            favorite_keyword: "phone".to_owned(),
        }
    }

    fn product(id: &str, price: f64) -> Product {
        Product {
            id: ProductId(id.to_owned()),
            title: format!("Item {id}"),
            price,
            category: "electronics".to_owned(),
            rating: 4.2,
            rating_count: 120,
        }
    }

    #[test]
    fn duplicate_ids_are_rejected_at_the_boundary() {
        let error =
            Survey::new(vec![customer("USER_0001"), customer("USER_0001")]).unwrap_err();
        assert_eq!(error, EngineError::validation("USER_0001", "duplicate user_id"));

        let error = Catalog::new(vec![product("1", 10.0), product("1", 20.0)]).unwrap_err();
        assert_eq!(error, EngineError::validation("1", "duplicate product_id"));
    }

    #[test]
    fn fingerprint_is_stable_across_row_order() {
        let forward = Catalog::new(vec![product("1", 10.0), product("2", 20.0)]).unwrap();
        let reversed = Catalog::new(vec![product("2", 20.0), product("1", 10.0)]).unwrap();
        assert_eq!(forward.fingerprint(), reversed.fingerprint());
    }

    #[test]
    fn fingerprint_changes_with_content() {
        let base = Catalog::new(vec![product("1", 10.0)]).unwrap();
        let changed = Catalog::new(vec![product("1", 10.5)]).unwrap();
        assert_ne!(base.fingerprint(), changed.fingerprint());
    }

    #[test]
    fn category_filter_only_returns_matching_products() {
        let mut other = product("3", 30.0);
        other.category = "furniture".to_owned();
        let catalog = Catalog::new(vec![product("1", 10.0), other]).unwrap();
        assert_eq!(catalog.in_category("electronics").count(), 1);
        assert_eq!(catalog.in_category("furniture").count(), 1);
        assert_eq!(catalog.in_category("toys").count(), 0);
    }

    #[test]
    fn empty_tables_are_valid() {
        assert!(Survey::new(Vec::new()).unwrap().is_empty());
        assert!(Catalog::new(Vec::new()).unwrap().is_empty());
    }
}
