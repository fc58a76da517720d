//! Checkout Session
//!
//! An in-memory storefront host: cart lines, shipping packages with a rate cache,
//! a fee list, the two pipelines and the current request. It is what the
//! promotion plugs into in tests and in the checkout demo.

use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use rusty_money::{Money, iso::Currency};
use tracing::debug;

use crate::{
    cart::{CartItem, CartSnapshot, Fee, ProductId},
    categories::CategorySet,
    context::{RequestContext, RequestKind},
    invalidation::{CartEvent, RateCache, Recalculate, refresh_on_cart_change},
    pipeline::{FeePipeline, RatePipeline},
    settings::SettingsProvider,
    shipping::{PackageId, ShippingRate},
};

/// A priced cart line.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    /// Product in the line
    pub product_id: ProductId,

    /// Categories the product belongs to
    pub categories: CategorySet,

    /// Unit price in minor units
    pub unit_price_minor: i64,

    /// Number of units
    pub quantity: u32,
}

impl CartLine {
    /// Create a new cart line.
    pub fn new(
        product_id: ProductId,
        categories: CategorySet,
        unit_price_minor: i64,
        quantity: u32,
    ) -> Self {
        Self {
            product_id,
            categories,
            unit_price_minor,
            quantity,
        }
    }

    /// Line total in minor units.
    pub fn total_minor(&self) -> i64 {
        self.unit_price_minor
            .saturating_mul(i64::from(self.quantity))
    }
}

/// Computed checkout totals, in major units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Totals {
    /// Pre-discount item subtotal
    pub subtotal: Decimal,

    /// Sum of all fees; discounts are negative
    pub fees: Decimal,

    /// Cost of the selected rate of every package
    pub shipping: Decimal,

    /// Tax on the selected rates
    pub shipping_tax: Decimal,

    /// Amount due, rounded to the currency's minor unit
    pub total: Decimal,
}

/// In-memory host for one customer's checkout.
pub struct CheckoutSession<'h> {
    currency: &'static Currency,
    lines: Vec<CartLine>,
    available: bool,
    packages: Vec<Vec<ShippingRate>>,
    rate_cache: RateCache,
    fees: Vec<Fee>,
    fee_pipeline: FeePipeline<'h>,
    rate_pipeline: RatePipeline<'h>,
    settings: &'h dyn SettingsProvider,
    request: RequestContext<'h>,
}

impl<'h> CheckoutSession<'h> {
    /// Start an empty session priced in `currency`.
    pub fn new(currency: &'static Currency, settings: &'h dyn SettingsProvider) -> Self {
        Self {
            currency,
            lines: Vec::new(),
            available: true,
            packages: Vec::new(),
            rate_cache: RateCache::new(),
            fees: Vec::new(),
            fee_pipeline: FeePipeline::new(),
            rate_pipeline: RatePipeline::new(),
            settings,
            request: RequestContext::new(settings, RequestKind::Storefront),
        }
    }

    /// End the current request and start a new one.
    ///
    /// Settings are read again on first use in the new request.
    pub fn begin_request(&mut self, kind: RequestKind) {
        debug!(request_kind = kind.as_str(), "beginning request");

        self.request = RequestContext::new(self.settings, kind);
    }

    /// The current request.
    pub fn request(&self) -> &RequestContext<'h> {
        &self.request
    }

    /// Both pipelines, for registering contributors and modifiers.
    pub fn pipelines_mut(&mut self) -> (&mut FeePipeline<'h>, &mut RatePipeline<'h>) {
        (&mut self.fee_pipeline, &mut self.rate_pipeline)
    }

    /// Mark the cart as available or not (e.g. no customer session yet).
    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    /// Add a shipping package with the rates the carrier quoted for it.
    ///
    /// The package has no computed rates until the next refresh.
    pub fn add_package(&mut self, rates: Vec<ShippingRate>) -> PackageId {
        self.packages.push(rates);

        PackageId(self.packages.len().saturating_sub(1))
    }

    /// Add a line to the cart.
    pub fn add_item(&mut self, line: CartLine) {
        self.lines.push(line);

        refresh_on_cart_change(CartEvent::ItemAdded, self);
    }

    /// Remove every line for `product_id`. Returns true if anything was removed.
    pub fn remove_item(&mut self, product_id: ProductId) -> bool {
        let before = self.lines.len();

        self.lines.retain(|line| line.product_id != product_id);

        if self.lines.len() == before {
            return false;
        }

        refresh_on_cart_change(CartEvent::ItemRemoved, self);

        true
    }

    /// Change the quantity of every line for `product_id`. Returns true if any line matched.
    ///
    /// A quantity of zero removes the lines.
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: u32) -> bool {
        if quantity == 0 {
            return self.remove_item(product_id);
        }

        let mut matched = false;

        for line in self
            .lines
            .iter_mut()
            .filter(|line| line.product_id == product_id)
        {
            line.quantity = quantity;
            matched = true;
        }

        if matched {
            refresh_on_cart_change(CartEvent::QuantityChanged, self);
        }

        matched
    }

    /// Refresh the checkout review (address or shipping method changed).
    pub fn update_order_review(&mut self) {
        refresh_on_cart_change(CartEvent::CheckoutReviewUpdated, self);
    }

    /// Cart lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Currency the cart is priced in.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Read-only view of the cart, or `None` if the cart is unavailable.
    pub fn snapshot(&self) -> Option<CartSnapshot<'static>> {
        if !self.available {
            return None;
        }

        let subtotal_minor = self
            .lines
            .iter()
            .map(CartLine::total_minor)
            .fold(0_i64, i64::saturating_add);

        let items = self
            .lines
            .iter()
            .map(|line| CartItem::new(line.product_id, line.categories.clone()));

        Some(CartSnapshot::new(
            items,
            Money::from_minor(subtotal_minor, self.currency),
        ))
    }

    /// Fees attached during the last totals pass.
    pub fn fees(&self) -> &[Fee] {
        &self.fees
    }

    /// Computed rates of `package`, if shipping has been calculated since the last change.
    pub fn package_rates(&self, package: PackageId) -> Option<&[ShippingRate]> {
        self.rate_cache.get(package)
    }

    /// Number of shipping packages.
    pub fn package_count(&self) -> usize {
        self.packages.len()
    }

    /// Totals for the current state. The first rate of each package is the selected one.
    pub fn totals(&self) -> Totals {
        let subtotal = self
            .snapshot()
            .map_or(Decimal::ZERO, |cart| cart.subtotal_amount());

        let fees = self.fees.iter().map(|fee| fee.amount).sum::<Decimal>();

        let selected = (0..self.packages.len())
            .filter_map(|idx| self.package_rates(PackageId(idx)))
            .filter_map(<[ShippingRate]>::first);

        let (shipping, shipping_tax) = selected.fold(
            (Decimal::ZERO, Decimal::ZERO),
            |(cost, tax), rate| (cost + rate.cost(), tax + rate.tax_total()),
        );

        let total = (subtotal + fees + shipping + shipping_tax)
            .max(Decimal::ZERO)
            .round_dp_with_strategy(self.currency.exponent, RoundingStrategy::MidpointAwayFromZero);

        Totals {
            subtotal,
            fees,
            shipping,
            shipping_tax,
            total,
        }
    }
}

impl Recalculate for CheckoutSession<'_> {
    fn cart_available(&self) -> bool {
        self.available
    }

    fn invalidate_shipping(&mut self) {
        self.rate_cache.invalidate_all();
    }

    fn calculate_shipping(&mut self) {
        let cart = self.snapshot();

        for (idx, quoted) in self.packages.iter().enumerate() {
            let package = PackageId(idx);
            let mut rates = quoted.clone();

            self.rate_pipeline
                .run(&self.request, cart.as_ref(), package, &mut rates);

            self.rate_cache.insert(package, rates);
        }

        debug!(packages = self.packages.len(), "calculated shipping");
    }

    fn calculate_totals(&mut self) {
        let cart = self.snapshot();

        self.fees.clear();
        self.fee_pipeline
            .run(&self.request, cart.as_ref(), &mut self.fees);

        debug!(fees = self.fees.len(), "calculated totals");
    }
}

impl fmt::Debug for CheckoutSession<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckoutSession")
            .field("currency", &self.currency.iso_alpha_code)
            .field("lines", &self.lines)
            .field("available", &self.available)
            .field("fees", &self.fees)
            .field("rate_cache", &self.rate_cache)
            .field("fee_pipeline", &self.fee_pipeline)
            .field("rate_pipeline", &self.rate_pipeline)
            .field("request", &self.request)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::GBP;

    use crate::settings::StaticSettings;

    use super::*;

    fn line(product: u64, price_minor: i64, quantity: u32) -> CartLine {
        CartLine::new(ProductId(product), CategorySet::empty(), price_minor, quantity)
    }

    #[test]
    fn subtotal_sums_line_totals() {
        let provider = StaticSettings::default();
        let mut session = CheckoutSession::new(GBP, &provider);

        session.add_item(line(1, 2_50, 2));
        session.add_item(line(2, 10_00, 1));

        assert_eq!(
            session.snapshot().map(|cart| cart.subtotal_amount()),
            Some(Decimal::new(15, 0))
        );
    }

    #[test]
    fn unavailable_cart_has_no_snapshot() {
        let provider = StaticSettings::default();
        let mut session = CheckoutSession::new(GBP, &provider);

        session.set_available(false);

        assert!(session.snapshot().is_none());
        assert_eq!(session.totals(), Totals::default());
    }

    #[test]
    fn quantity_zero_removes_the_line() {
        let provider = StaticSettings::default();
        let mut session = CheckoutSession::new(GBP, &provider);

        session.add_item(line(1, 1_00, 1));

        assert!(session.set_quantity(ProductId(1), 0));
        assert!(session.lines().is_empty());
        assert!(!session.remove_item(ProductId(1)));
    }

    #[test]
    fn refresh_computes_every_package() {
        let provider = StaticSettings::default();
        let mut session = CheckoutSession::new(GBP, &provider);

        let first = session.add_package(vec![ShippingRate::new("flat", "Flat", Decimal::new(5, 0))]);
        let second = session.add_package(vec![]);

        assert!(session.package_rates(first).is_none());

        session.update_order_review();

        assert_eq!(session.package_rates(first).map(<[_]>::len), Some(1));
        assert_eq!(session.package_rates(second).map(<[_]>::len), Some(0));
        assert_eq!(session.totals().shipping, Decimal::new(5, 0));
    }
}
