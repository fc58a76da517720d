//! Shipping Modifier
//!
//! Free shipping zeroes the cost and taxes of every rate offered for a package.
//! Rates are never added, removed or reordered.

use std::fmt;

use jiff::civil::Date;
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;

use crate::{cart::CartSnapshot, decision::is_promo_eligible, settings::PromoSettings};

/// Shipping package index within the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct PackageId(pub usize);

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Tax class a shipping tax line is charged under (e.g. `"VAT"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaxClass(String);

impl TaxClass {
    /// Create a tax class.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Tax class name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A shipping option offered for one package.
#[derive(Debug, Clone, PartialEq)]
pub struct ShippingRate {
    id: String,
    label: String,
    cost: Decimal,
    taxes: FxHashMap<TaxClass, Decimal>,
}

impl ShippingRate {
    /// Create an untaxed rate.
    pub fn new(id: impl Into<String>, label: impl Into<String>, cost: Decimal) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            cost,
            taxes: FxHashMap::default(),
        }
    }

    /// Add a tax line to the rate.
    #[must_use]
    pub fn with_tax(mut self, class: TaxClass, amount: Decimal) -> Self {
        self.taxes.insert(class, amount);
        self
    }

    /// Rate identifier (e.g. `"flat_rate:1"`).
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Customer-facing label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Cost before tax.
    pub fn cost(&self) -> Decimal {
        self.cost
    }

    /// Tax lines by class.
    pub fn taxes(&self) -> &FxHashMap<TaxClass, Decimal> {
        &self.taxes
    }

    /// Sum of all tax lines.
    pub fn tax_total(&self) -> Decimal {
        self.taxes.values().copied().sum()
    }

    /// Returns true if the rate costs nothing and carries no tax.
    pub fn is_free(&self) -> bool {
        self.cost.is_zero() && self.taxes.is_empty()
    }

    /// Zero the cost and drop all tax lines.
    pub fn make_free(&mut self) {
        self.cost = Decimal::ZERO;
        self.taxes.clear();
    }
}

/// Make every rate free. Applying it again changes nothing.
pub fn zero_rates(rates: &mut [ShippingRate]) {
    rates.iter_mut().for_each(ShippingRate::make_free);
}

/// Rates for one package after the promotion has been considered.
///
/// Returns `rates` untouched unless free shipping is enabled and the promotion is
/// eligible. Each package is handled on its own.
pub fn apply_free_shipping(
    settings: &PromoSettings,
    cart: Option<&CartSnapshot<'_>>,
    today: Date,
    mut rates: Vec<ShippingRate>,
) -> Vec<ShippingRate> {
    if settings.free_shipping && is_promo_eligible(settings, cart, today) {
        zero_rates(&mut rates);
    }

    rates
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use rusty_money::{Money, iso::GBP};

    use super::*;

    fn flat() -> ShippingRate {
        ShippingRate::new("flat", "Flat rate", Decimal::new(5, 0))
            .with_tax(TaxClass::new("VAT"), Decimal::ONE)
    }

    fn free_shipping() -> PromoSettings {
        PromoSettings {
            activate: true,
            free_shipping: true,
            ..PromoSettings::default()
        }
    }

    fn cart<'a>() -> CartSnapshot<'a> {
        CartSnapshot::new([], Money::from_minor(10_00, GBP))
    }

    #[test]
    fn eligible_free_shipping_zeroes_cost_and_taxes() {
        let rates = apply_free_shipping(
            &free_shipping(),
            Some(&cart()),
            date(2024, 1, 15),
            vec![flat()],
        );

        assert_eq!(rates.len(), 1);

        let rate = rates.first();

        assert_eq!(rate.map(ShippingRate::id), Some("flat"));
        assert_eq!(rate.map(ShippingRate::cost), Some(Decimal::ZERO));
        assert!(rate.is_some_and(|rate| rate.taxes().is_empty()));
    }

    #[test]
    fn disabled_flag_is_identity() {
        let settings = PromoSettings {
            free_shipping: false,
            ..free_shipping()
        };

        let rates = apply_free_shipping(&settings, Some(&cart()), date(2024, 1, 15), vec![flat()]);

        assert_eq!(rates, vec![flat()]);
    }

    #[test]
    fn ineligible_cart_is_identity() {
        let settings = PromoSettings {
            activate: false,
            ..free_shipping()
        };

        let rates = apply_free_shipping(&settings, Some(&cart()), date(2024, 1, 15), vec![flat()]);

        assert_eq!(rates, vec![flat()]);
    }

    #[test]
    fn keeps_order_and_count() {
        let input = vec![
            flat(),
            ShippingRate::new("express", "Express", Decimal::new(12, 0)),
            ShippingRate::new("pickup", "Local pickup", Decimal::ZERO),
        ];

        let rates = apply_free_shipping(&free_shipping(), Some(&cart()), date(2024, 1, 15), input);

        let ids: Vec<_> = rates.iter().map(ShippingRate::id).collect();

        assert_eq!(ids, vec!["flat", "express", "pickup"]);
        assert!(rates.iter().all(ShippingRate::is_free));
    }

    #[test]
    fn zeroing_is_idempotent() {
        let mut once = vec![flat(), flat()];
        zero_rates(&mut once);

        let mut twice = once.clone();
        zero_rates(&mut twice);

        assert_eq!(once, twice);
    }

    #[test]
    fn tax_total_sums_lines() {
        let rate = flat().with_tax(TaxClass::new("Levy"), Decimal::new(25, 2));

        assert_eq!(rate.tax_total(), Decimal::new(125, 2));
    }
}
