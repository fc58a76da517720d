//! Promotion Engine
//!
//! Wires the eligibility decision, the discount applier and the shipping modifier
//! into the host's fee and rate pipelines.

use jiff::civil::Date;

use crate::{
    cart::{CartSnapshot, FeeLedger},
    clock::{Clock, SystemClock},
    context::RequestContext,
    decision::{Verdict, evaluate},
    discount::apply_discount_for,
    observer::{NoopObserver, PromoObserver},
    pipeline::{FeeContributor, FeePipeline, Priority, RateModifier, RatePipeline},
    shipping::{PackageId, ShippingRate, zero_rates},
};

/// The promotion, as seen by the host.
///
/// Holds no cart or settings state of its own: settings come from the request
/// context and the cart is passed to every hook.
#[derive(Debug, Clone, Default)]
pub struct PromoEngine<C = SystemClock, O = NoopObserver> {
    clock: C,
    observer: O,
}

impl PromoEngine {
    /// Engine on the wall clock, without an observer.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: Clock, O: PromoObserver> PromoEngine<C, O> {
    /// Engine with an explicit clock and observer.
    pub fn with_clock_and_observer(clock: C, observer: O) -> Self {
        Self { clock, observer }
    }

    /// Today's date in the store time zone configured for this request.
    pub fn today(&self, ctx: &RequestContext<'_>) -> Date {
        self.clock.today(&ctx.settings().time_zone)
    }

    /// Evaluate eligibility for `cart` in this request.
    pub fn verdict(&self, ctx: &RequestContext<'_>, cart: Option<&CartSnapshot<'_>>) -> Verdict {
        let verdict = evaluate(ctx.settings(), cart, self.today(ctx));

        self.observer.on_verdict(verdict);

        verdict
    }

    /// Returns true if the promotion applies to `cart` in this request.
    pub fn is_eligible(&self, ctx: &RequestContext<'_>, cart: Option<&CartSnapshot<'_>>) -> bool {
        self.verdict(ctx, cart).is_eligible()
    }

    /// Register the discount and free shipping hooks.
    ///
    /// Both run after every other entry, so the discount sees the final
    /// subtotal and no later modifier can re-price a free rate.
    pub fn register<'h>(&'h self, fees: &mut FeePipeline<'h>, rates: &mut RatePipeline<'h>) {
        fees.register(Priority::LAST, self);
        rates.register(Priority::LAST, self);
    }
}

impl<C: Clock, O: PromoObserver> FeeContributor for PromoEngine<C, O> {
    #[tracing::instrument(skip_all, fields(request_kind = ctx.kind().as_str()))]
    fn contribute_fees(
        &self,
        ctx: &RequestContext<'_>,
        cart: Option<&CartSnapshot<'_>>,
        ledger: &mut dyn FeeLedger,
    ) {
        if !ctx.kind().applies_fees() {
            return;
        }

        let verdict = self.verdict(ctx, cart);

        if let Some(fee) = apply_discount_for(verdict, ctx.settings(), cart, ledger) {
            self.observer.on_fee_applied(&fee);
        }
    }
}

impl<C: Clock, O: PromoObserver> RateModifier for PromoEngine<C, O> {
    #[tracing::instrument(skip_all, fields(package = package.0))]
    fn modify_rates(
        &self,
        ctx: &RequestContext<'_>,
        cart: Option<&CartSnapshot<'_>>,
        package: PackageId,
        rates: &mut Vec<ShippingRate>,
    ) {
        if !ctx.settings().free_shipping || !self.is_eligible(ctx, cart) {
            return;
        }

        zero_rates(rates);

        self.observer.on_free_shipping(package, rates.len());
    }
}
