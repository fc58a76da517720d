//! Cache Invalidation
//!
//! The host caches shipping rates per package. A rate computed before a cart
//! change may have been made free (or not) against a cart that no longer exists,
//! so every cart change drops the cached rates and recomputes shipping, then
//! totals.

use std::fmt;

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::shipping::{PackageId, ShippingRate};

/// Cart mutations that can change eligibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CartEvent {
    /// A line was added to the cart
    ItemAdded,

    /// A line was removed from the cart
    ItemRemoved,

    /// The quantity of a line changed
    QuantityChanged,

    /// The checkout review was refreshed (address, shipping method, etc.)
    CheckoutReviewUpdated,
}

impl CartEvent {
    /// Stable name, for structured logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            CartEvent::ItemAdded => "item_added",
            CartEvent::ItemRemoved => "item_removed",
            CartEvent::QuantityChanged => "quantity_changed",
            CartEvent::CheckoutReviewUpdated => "checkout_review_updated",
        }
    }
}

impl fmt::Display for CartEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Computed shipping rates, keyed by package.
#[derive(Debug, Clone, Default)]
pub struct RateCache {
    packages: FxHashMap<PackageId, Vec<ShippingRate>>,
}

impl RateCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached rates for `package`, if computed since the last invalidation.
    pub fn get(&self, package: PackageId) -> Option<&[ShippingRate]> {
        self.packages.get(&package).map(Vec::as_slice)
    }

    /// Store the computed rates for `package`.
    pub fn insert(&mut self, package: PackageId, rates: Vec<ShippingRate>) {
        self.packages.insert(package, rates);
    }

    /// Drop every cached package.
    pub fn invalidate_all(&mut self) {
        self.packages.clear();
    }

    /// Number of cached packages.
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// Check if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

/// Host operations needed to bring shipping and totals up to date.
pub trait Recalculate {
    /// Returns true if there is a cart to recalculate.
    fn cart_available(&self) -> bool;

    /// Drop every package's cached rates.
    fn invalidate_shipping(&mut self);

    /// Recompute the rates of every package.
    fn calculate_shipping(&mut self);

    /// Recompute fees and totals.
    fn calculate_totals(&mut self);
}

/// Invalidate and recalculate after `event`.
///
/// Does nothing and returns false when the cart is unavailable. Otherwise the
/// order is fixed: invalidate, recompute shipping, recompute totals.
pub fn refresh_on_cart_change(event: CartEvent, host: &mut impl Recalculate) -> bool {
    if !host.cart_available() {
        debug!(event = event.as_str(), "cart unavailable, skipping refresh");

        return false;
    }

    debug!(event = event.as_str(), "refreshing shipping and totals");

    host.invalidate_shipping();
    host.calculate_shipping();
    host.calculate_totals();

    true
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    #[derive(Debug, Default)]
    struct Host {
        available: bool,
        calls: Vec<&'static str>,
    }

    impl Recalculate for Host {
        fn cart_available(&self) -> bool {
            self.available
        }

        fn invalidate_shipping(&mut self) {
            self.calls.push("invalidate");
        }

        fn calculate_shipping(&mut self) {
            self.calls.push("shipping");
        }

        fn calculate_totals(&mut self) {
            self.calls.push("totals");
        }
    }

    #[test]
    fn refresh_runs_in_order() {
        let mut host = Host {
            available: true,
            ..Host::default()
        };

        assert!(refresh_on_cart_change(CartEvent::ItemAdded, &mut host));
        assert_eq!(host.calls, vec!["invalidate", "shipping", "totals"]);
    }

    #[test]
    fn unavailable_cart_is_a_noop() {
        let mut host = Host::default();

        assert!(!refresh_on_cart_change(CartEvent::QuantityChanged, &mut host));
        assert!(host.calls.is_empty());
    }

    #[test]
    fn every_event_refreshes() {
        let events = [
            CartEvent::ItemAdded,
            CartEvent::ItemRemoved,
            CartEvent::QuantityChanged,
            CartEvent::CheckoutReviewUpdated,
        ];

        for event in events {
            let mut host = Host {
                available: true,
                ..Host::default()
            };

            assert!(refresh_on_cart_change(event, &mut host), "{event} should refresh");
        }
    }

    #[test]
    fn cache_invalidation() {
        let mut cache = RateCache::new();
        let rate = ShippingRate::new("flat", "Flat rate", Decimal::new(5, 0));

        cache.insert(PackageId(0), vec![rate.clone()]);
        cache.insert(PackageId(1), vec![rate]);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(PackageId(1)).map(<[_]>::len), Some(1));

        cache.invalidate_all();

        assert!(cache.is_empty());
        assert!(cache.get(PackageId(0)).is_none());
    }
}
