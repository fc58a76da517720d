//! Conditions
//!
//! The four independent eligibility predicates. Each is pure given the settings,
//! the cart snapshot and today's date.
//!
//! A `None` cart means the host cart is not available yet. Checks that need the
//! cart fail closed in that case; checks with nothing configured still pass.

use jiff::civil::Date;

use crate::{cart::CartSnapshot, settings::PromoSettings};

/// The master switch is on.
pub fn is_activated(settings: &PromoSettings) -> bool {
    settings.activate
}

/// `today` lies within the inclusive campaign range.
///
/// With either bound unset there is no date restriction.
pub fn is_within_date_range(settings: &PromoSettings, today: Date) -> bool {
    match (settings.promo_start, settings.promo_end) {
        (Some(start), Some(end)) => start <= today && today <= end,
        _ => true,
    }
}

/// At least one cart item belongs to a required category.
///
/// An empty requirement is vacuously met, even without a cart.
pub fn has_required_category(settings: &PromoSettings, cart: Option<&CartSnapshot<'_>>) -> bool {
    let required = &settings.required_categories;

    if required.is_empty() {
        return true;
    }

    let Some(cart) = cart else {
        return false;
    };

    cart.items()
        .iter()
        .any(|item| item.categories().intersects(required))
}

/// The pre-discount subtotal reaches the configured minimum.
///
/// A minimum of zero (or less) is no minimum.
pub fn meets_minimum_cart(settings: &PromoSettings, cart: Option<&CartSnapshot<'_>>) -> bool {
    if settings.minimum_cart <= rust_decimal::Decimal::ZERO {
        return true;
    }

    cart.is_some_and(|cart| cart.subtotal_amount() >= settings.minimum_cart)
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use rust_decimal::Decimal;
    use rusty_money::{
        Money,
        iso::{GBP, JPY},
    };

    use crate::{
        cart::{CartItem, ProductId},
        categories::CategorySet,
    };

    use super::*;

    fn cart_with<'a>(categories: &[&[u64]], subtotal_minor: i64) -> CartSnapshot<'a> {
        CartSnapshot::new(
            categories.iter().enumerate().map(|(i, ids)| {
                CartItem::new(
                    ProductId(u64::try_from(i).unwrap_or_default()),
                    CategorySet::from_ids(ids),
                )
            }),
            Money::from_minor(subtotal_minor, GBP),
        )
    }

    fn january() -> PromoSettings {
        PromoSettings {
            promo_start: Some(date(2024, 1, 1)),
            promo_end: Some(date(2024, 1, 31)),
            ..PromoSettings::default()
        }
    }

    #[test]
    fn activation_follows_switch() {
        let on = PromoSettings {
            activate: true,
            ..PromoSettings::default()
        };

        assert!(is_activated(&on));
        assert!(!is_activated(&PromoSettings::default()));
    }

    #[test]
    fn date_range_is_inclusive() {
        let settings = january();

        assert!(is_within_date_range(&settings, date(2024, 1, 1)));
        assert!(is_within_date_range(&settings, date(2024, 1, 15)));
        assert!(is_within_date_range(&settings, date(2024, 1, 31)));
        assert!(!is_within_date_range(&settings, date(2023, 12, 31)));
        assert!(!is_within_date_range(&settings, date(2024, 2, 1)));
    }

    #[test]
    fn date_range_needs_both_bounds() {
        let start_only = PromoSettings {
            promo_start: Some(date(2024, 1, 1)),
            ..PromoSettings::default()
        };
        let end_only = PromoSettings {
            promo_end: Some(date(2024, 1, 31)),
            ..PromoSettings::default()
        };

        assert!(is_within_date_range(&start_only, date(2020, 6, 1)));
        assert!(is_within_date_range(&end_only, date(2030, 6, 1)));
    }

    #[test]
    fn empty_category_requirement_always_passes() {
        let settings = PromoSettings::default();

        assert!(has_required_category(&settings, None));
        assert!(has_required_category(&settings, Some(&cart_with(&[], 0))));
    }

    #[test]
    fn category_requirement_matches_any_item() {
        let settings = PromoSettings {
            required_categories: CategorySet::from_ids(&[7]),
            ..PromoSettings::default()
        };

        assert!(has_required_category(
            &settings,
            Some(&cart_with(&[&[3, 9], &[7, 2]], 0))
        ));
        assert!(!has_required_category(
            &settings,
            Some(&cart_with(&[&[3, 9], &[1]], 0))
        ));
    }

    #[test]
    fn category_requirement_fails_closed_without_cart() {
        let settings = PromoSettings {
            required_categories: CategorySet::from_ids(&[7]),
            ..PromoSettings::default()
        };

        assert!(!has_required_category(&settings, None));
    }

    #[test]
    fn zero_minimum_always_passes() {
        let settings = PromoSettings::default();

        assert!(meets_minimum_cart(&settings, Some(&cart_with(&[], 0))));
        assert!(meets_minimum_cart(&settings, None));
    }

    #[test]
    fn minimum_compares_pre_discount_subtotal() {
        let settings = PromoSettings {
            minimum_cart: Decimal::new(50, 0),
            ..PromoSettings::default()
        };

        assert!(meets_minimum_cart(&settings, Some(&cart_with(&[], 60_00))));
        assert!(meets_minimum_cart(&settings, Some(&cart_with(&[], 50_00))));
        assert!(!meets_minimum_cart(&settings, Some(&cart_with(&[], 49_99))));
    }

    #[test]
    fn minimum_is_in_major_units_of_the_cart_currency() {
        let settings = PromoSettings {
            minimum_cart: Decimal::new(100, 0),
            ..PromoSettings::default()
        };

        let yen = CartSnapshot::new([], Money::from_minor(6_000, JPY));
        let too_little = CartSnapshot::new([], Money::from_minor(99, JPY));

        assert!(meets_minimum_cart(&settings, Some(&yen)));
        assert!(!meets_minimum_cart(&settings, Some(&too_little)));
    }

    #[test]
    fn minimum_fails_closed_without_cart() {
        let settings = PromoSettings {
            minimum_cart: Decimal::ONE,
            ..PromoSettings::default()
        };

        assert!(!meets_minimum_cart(&settings, None));
    }
}
