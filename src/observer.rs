//! Promotion Observer
//!
//! Hook for watching the engine's decisions without putting logging inside them.
//!
//! The conditions and appliers are plain functions with no side effects beyond
//! the ledger and rate slice they are given. The engine calls an observer around
//! them; [`NoopObserver`] is the default and compiles away, [`TracingObserver`]
//! emits structured `tracing` events.

use tracing::{debug, info};

use crate::{cart::Fee, decision::Verdict, shipping::PackageId};

/// Callbacks invoked by the engine around each decision.
///
/// Every method defaults to doing nothing.
pub trait PromoObserver {
    /// Called after eligibility has been evaluated.
    fn on_verdict(&self, _verdict: Verdict) {}

    /// Called after the discount fee has been added to the cart.
    fn on_fee_applied(&self, _fee: &Fee) {}

    /// Called after the rates of a package have been made free.
    fn on_free_shipping(&self, _package: PackageId, _rates: usize) {}
}

impl<O: PromoObserver + ?Sized> PromoObserver for &O {
    fn on_verdict(&self, verdict: Verdict) {
        (**self).on_verdict(verdict);
    }

    fn on_fee_applied(&self, fee: &Fee) {
        (**self).on_fee_applied(fee);
    }

    fn on_free_shipping(&self, package: PackageId, rates: usize) {
        (**self).on_free_shipping(package, rates);
    }
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PromoObserver for NoopObserver {}

/// Observer that reports decisions as `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl PromoObserver for TracingObserver {
    fn on_verdict(&self, verdict: Verdict) {
        match verdict.failed_condition() {
            None => debug!(eligible = true, "promotion conditions met"),
            Some(condition) => debug!(
                eligible = false,
                failed_condition = condition.as_str(),
                "promotion conditions not met"
            ),
        }
    }

    fn on_fee_applied(&self, fee: &Fee) {
        info!(label = %fee.label, amount = %fee.amount, "applied promotion discount");
    }

    fn on_free_shipping(&self, package: PackageId, rates: usize) {
        info!(package = package.0, rates, "applied free shipping");
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use rust_decimal::Decimal;

    use crate::decision::Condition;

    use super::*;

    #[derive(Debug, Default)]
    struct Recording {
        verdicts: RefCell<Vec<Verdict>>,
    }

    impl PromoObserver for Recording {
        fn on_verdict(&self, verdict: Verdict) {
            self.verdicts.borrow_mut().push(verdict);
        }
    }

    fn notify(observer: impl PromoObserver) {
        observer.on_verdict(Verdict::Ineligible(Condition::Category));
        observer.on_fee_applied(&Fee::new("ignored", Decimal::ONE));
    }

    #[test]
    fn references_forward_to_the_observer() {
        let recording = Recording::default();

        notify(&recording);

        assert_eq!(
            *recording.verdicts.borrow(),
            vec![Verdict::Ineligible(Condition::Category)]
        );
    }

    #[test]
    fn tracing_observer_without_subscriber_is_silent() {
        let observer = TracingObserver;

        observer.on_verdict(Verdict::Eligible);
        observer.on_verdict(Verdict::Ineligible(Condition::DateRange));
        observer.on_fee_applied(&Fee::new("Sale (20.00%)", Decimal::new(-20, 0)));
        observer.on_free_shipping(PackageId(0), 2);

        NoopObserver.on_verdict(Verdict::Eligible);
    }
}
