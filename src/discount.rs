//! Discount Applier
//!
//! Turns the configured percentage into a single negative fee line on the cart.

use jiff::civil::Date;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::{
    cart::{CartSnapshot, Fee, FeeLedger},
    decision::{Verdict, evaluate},
    settings::PromoSettings,
};

/// Discount amount for `subtotal` at `percentage` percent points.
///
/// The result is exact; rounding to the currency's minor unit is left to the
/// host's totals. Returns `None` if the multiplication overflows.
pub fn discount_amount(subtotal: Decimal, percentage: Decimal) -> Option<Decimal> {
    subtotal
        .checked_mul(percentage)?
        .checked_div(Decimal::ONE_HUNDRED)
}

/// Fee label, e.g. `"Sale (20.00%)"`.
pub fn fee_label(promo_name: &str, percentage: Decimal) -> String {
    let percentage = percentage.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

    format!("{promo_name} ({percentage:.2}%)")
}

/// Build the discount fee for `subtotal`, if there is anything to discount.
///
/// No fee is produced for a zero percentage or a non-positive amount.
pub fn discount_fee(settings: &PromoSettings, subtotal: Decimal) -> Option<Fee> {
    if settings.discount_percentage <= Decimal::ZERO {
        return None;
    }

    let amount = discount_amount(subtotal, settings.discount_percentage)?;

    if amount <= Decimal::ZERO {
        return None;
    }

    Some(Fee::new(
        fee_label(&settings.promo_name, settings.discount_percentage),
        -amount,
    ))
}

/// Attach the discount fee to the cart if the promotion is eligible.
///
/// Adds at most one fee per call and returns it. The host resets its fee list
/// before every totals pass, so repeated passes do not stack.
pub fn apply_cart_discount(
    settings: &PromoSettings,
    cart: Option<&CartSnapshot<'_>>,
    today: Date,
    ledger: &mut dyn FeeLedger,
) -> Option<Fee> {
    apply_discount_for(evaluate(settings, cart, today), settings, cart, ledger)
}

/// Attach the discount fee for an already evaluated `verdict`.
pub fn apply_discount_for(
    verdict: Verdict,
    settings: &PromoSettings,
    cart: Option<&CartSnapshot<'_>>,
    ledger: &mut dyn FeeLedger,
) -> Option<Fee> {
    if !verdict.is_eligible() {
        return None;
    }

    let fee = discount_fee(settings, cart?.subtotal_amount())?;

    ledger.add_fee(fee.clone());

    Some(fee)
}
