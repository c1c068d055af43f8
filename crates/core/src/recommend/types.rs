use serde::{Deserialize, Serialize};

use crate::domain::customer::CustomerId;
use crate::domain::product::ProductId;

/// One ranked recommendation for one customer. Produced fresh per query and
/// owned by the caller; entries are never cached or shared across customers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecommendationEntry {
    pub customer_id: CustomerId,
    pub product_id: ProductId,
    pub score: f64,
    /// 1-based position in the ranked list.
    pub rank: usize,
}
