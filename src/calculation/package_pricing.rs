//! Service package pricing.
//!
//! Bundles of services earn a percentage discount chosen from a tier ladder
//! keyed on the number of services in the bundle.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::PackageDiscountTier;

/// Result of pricing a service bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagePrice {
    /// Sum of the list prices.
    pub subtotal: Decimal,
    /// The applied discount percentage (zero when no tier qualifies).
    pub discount_percent: Decimal,
    /// Discount amount, rounded to two decimal places.
    pub discount_amount: Decimal,
    /// Price after discount, never negative.
    pub total: Decimal,
}

/// Prices a bundle of services against a discount tier ladder.
///
/// The tier with the largest `min_services` not exceeding the bundle size is
/// applied. Percentages are clamped to `[0, 100]`.
///
/// # Examples
///
/// ```
/// use barbershop_engine::calculation::calculate_package_price;
/// use barbershop_engine::models::PackageDiscountTier;
/// use rust_decimal::Decimal;
///
/// let tiers = vec![
///     PackageDiscountTier { min_services: 2, discount_percent: Decimal::from(10) },
///     PackageDiscountTier { min_services: 3, discount_percent: Decimal::from(15) },
/// ];
/// let prices = [Decimal::from(60), Decimal::from(40)];
/// let price = calculate_package_price(&prices, &tiers);
/// assert_eq!(price.discount_amount, Decimal::from(10));
/// assert_eq!(price.total, Decimal::from(90));
/// ```
pub fn calculate_package_price(prices: &[Decimal], tiers: &[PackageDiscountTier]) -> PackagePrice {
    let subtotal = prices
        .iter()
        .fold(Decimal::ZERO, |sum, price| sum.saturating_add(*price));
    let count = prices.len();

    let discount_percent = tiers
        .iter()
        .filter(|tier| tier.min_services as usize <= count)
        .max_by_key(|tier| tier.min_services)
        .map(|tier| tier.discount_percent.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::ZERO);

    let discount_amount = (subtotal.saturating_mul(discount_percent) / Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let total = subtotal.saturating_sub(discount_amount).max(Decimal::ZERO);

    PackagePrice {
        subtotal,
        discount_percent,
        discount_amount,
        total,
    }
}
