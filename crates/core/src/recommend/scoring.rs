//! The recommendation scoring formula.
//!
//! `rating * ln(1 + rating_count)` rewards both quality and statistical
//! confidence: a 5-star product with one review should not dominate a
//! 4.5-star product with ten thousand. The price penalty is the relative
//! distance from the customer's mid price, so rankings stay comparable
//! across customers with very different budgets.

use crate::domain::customer::Customer;
use crate::domain::product::Product;

use super::PRICE_PENALTY_WEIGHT;

/// Scale-invariant price mismatch penalty. Requires `mid_price > 0`, which
/// table validation guarantees; the scorer re-checks before calling.
pub fn price_penalty(price: f64, mid_price: f64) -> f64 {
    (price - mid_price).abs() / mid_price * PRICE_PENALTY_WEIGHT
}

/// Quality signal minus price penalty. `ln(1 + rating_count)` is defined for
/// every valid `rating_count`, including zero.
pub fn score_product(product: &Product, customer: &Customer) -> f64 {
    let quality = product.rating * (1.0 + f64::from(product.rating_count)).ln();
    quality - price_penalty(product.price, customer.mid_price())
}
