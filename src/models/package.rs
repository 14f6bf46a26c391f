//! Service package discount models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A discount tier for service bundles.
///
/// A bundle qualifies for a tier when it contains at least `min_services`
/// services; the qualifying tier with the largest `min_services` applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDiscountTier {
    /// Minimum number of services in the bundle.
    pub min_services: u32,
    /// Discount in percent, `0..=100`.
    pub discount_percent: Decimal,
}
