//! Promo Decision
//!
//! Combines the individual conditions into one verdict.

use std::fmt;

use jiff::civil::Date;

use crate::{
    cart::CartSnapshot,
    conditions::{has_required_category, is_activated, is_within_date_range, meets_minimum_cart},
    settings::PromoSettings,
};

/// One of the eligibility conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Condition {
    /// Master switch
    Activation,

    /// Campaign date range
    DateRange,

    /// Required product categories
    Category,

    /// Minimum cart subtotal
    MinimumCart,
}

impl Condition {
    /// Stable name, for structured logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Condition::Activation => "activation",
            Condition::DateRange => "date_range",
            Condition::Category => "category",
            Condition::MinimumCart => "minimum_cart",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one eligibility evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Every condition holds
    Eligible,

    /// The named condition was the first to fail
    Ineligible(Condition),
}

impl Verdict {
    /// Returns true for [`Verdict::Eligible`].
    pub const fn is_eligible(self) -> bool {
        matches!(self, Verdict::Eligible)
    }

    /// The condition that failed, if any.
    pub const fn failed_condition(self) -> Option<Condition> {
        match self {
            Verdict::Eligible => None,
            Verdict::Ineligible(condition) => Some(condition),
        }
    }
}

/// Evaluate every condition, stopping at the first failure.
///
/// The cheap settings-only checks run before the ones that walk the cart.
pub fn evaluate(settings: &PromoSettings, cart: Option<&CartSnapshot<'_>>, today: Date) -> Verdict {
    if !is_activated(settings) {
        return Verdict::Ineligible(Condition::Activation);
    }

    if !is_within_date_range(settings, today) {
        return Verdict::Ineligible(Condition::DateRange);
    }

    if !has_required_category(settings, cart) {
        return Verdict::Ineligible(Condition::Category);
    }

    if !meets_minimum_cart(settings, cart) {
        return Verdict::Ineligible(Condition::MinimumCart);
    }

    Verdict::Eligible
}

/// Returns true if the promotion applies to `cart` on `today`.
pub fn is_promo_eligible(
    settings: &PromoSettings,
    cart: Option<&CartSnapshot<'_>>,
    today: Date,
) -> bool {
    evaluate(settings, cart, today).is_eligible()
}
