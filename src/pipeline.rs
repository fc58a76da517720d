//! Pipelines
//!
//! Named extension points in the host's totals calculation.
//!
//! The host owns two ordered lists: fee contributors, run while cart totals are
//! calculated, and rate modifiers, run on the rates computed for each shipping
//! package. Entries run in ascending [`Priority`]; entries with equal priority run
//! in registration order.

use std::fmt;

use crate::{
    cart::{CartSnapshot, FeeLedger},
    context::RequestContext,
    shipping::{PackageId, ShippingRate},
};

/// Position of an entry in a pipeline. Lower runs first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Priority(pub i32);

impl Priority {
    /// Runs before everything else.
    pub const FIRST: Priority = Priority(i32::MIN);

    /// Priority used by host contributors that do not care.
    pub const DEFAULT: Priority = Priority(10);

    /// Runs after every other entry.
    pub const LAST: Priority = Priority(i32::MAX);
}

impl Default for Priority {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Adds fees to the cart during a totals pass.
pub trait FeeContributor {
    /// Contribute fees for the current cart.
    fn contribute_fees(
        &self,
        ctx: &RequestContext<'_>,
        cart: Option<&CartSnapshot<'_>>,
        ledger: &mut dyn FeeLedger,
    );
}

/// Adjusts the rates computed for one shipping package.
pub trait RateModifier {
    /// Modify the rates of `package` in place.
    fn modify_rates(
        &self,
        ctx: &RequestContext<'_>,
        cart: Option<&CartSnapshot<'_>>,
        package: PackageId,
        rates: &mut Vec<ShippingRate>,
    );
}

impl<T: FeeContributor + ?Sized> FeeContributor for &T {
    fn contribute_fees(
        &self,
        ctx: &RequestContext<'_>,
        cart: Option<&CartSnapshot<'_>>,
        ledger: &mut dyn FeeLedger,
    ) {
        (**self).contribute_fees(ctx, cart, ledger);
    }
}

impl<T: RateModifier + ?Sized> RateModifier for &T {
    fn modify_rates(
        &self,
        ctx: &RequestContext<'_>,
        cart: Option<&CartSnapshot<'_>>,
        package: PackageId,
        rates: &mut Vec<ShippingRate>,
    ) {
        (**self).modify_rates(ctx, cart, package, rates);
    }
}

/// Insert `entry` after every existing entry with a priority at or below `priority`.
fn insert_ordered<E>(entries: &mut Vec<(Priority, E)>, priority: Priority, entry: E) {
    let position = entries.partition_point(|(existing, _)| *existing <= priority);

    entries.insert(position, (priority, entry));
}

/// Ordered fee contributors.
#[derive(Default)]
pub struct FeePipeline<'h> {
    contributors: Vec<(Priority, Box<dyn FeeContributor + 'h>)>,
}

impl<'h> FeePipeline<'h> {
    /// Create an empty pipeline.
    pub fn new() -> Self {
        Self {
            contributors: Vec::new(),
        }
    }

    /// Register a contributor at `priority`.
    pub fn register(&mut self, priority: Priority, contributor: impl FeeContributor + 'h) {
        insert_ordered(&mut self.contributors, priority, Box::new(contributor));
    }

    /// Run every contributor in order.
    pub fn run(
        &self,
        ctx: &RequestContext<'_>,
        cart: Option<&CartSnapshot<'_>>,
        ledger: &mut dyn FeeLedger,
    ) {
        for (_, contributor) in &self.contributors {
            contributor.contribute_fees(ctx, cart, ledger);
        }
    }

    /// Priorities of the registered contributors, in run order.
    pub fn priorities(&self) -> impl Iterator<Item = Priority> + '_ {
        self.contributors.iter().map(|(priority, _)| *priority)
    }

    /// Number of registered contributors.
    pub fn len(&self) -> usize {
        self.contributors.len()
    }

    /// Check if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.contributors.is_empty()
    }
}

impl fmt::Debug for FeePipeline<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeePipeline")
            .field("priorities", &self.priorities().collect::<Vec<_>>())
            .finish()
    }
}

/// Ordered shipping rate modifiers.
#[derive(Default)]
pub struct RatePipeline<'h> {
    modifiers: Vec<(Priority, Box<dyn RateModifier + 'h>)>,
}

impl<'h> RatePipeline<'h> {
    /// Create an empty pipeline.
    pub fn new() -> Self {
        Self {
            modifiers: Vec::new(),
        }
    }

    /// Register a modifier at `priority`.
    pub fn register(&mut self, priority: Priority, modifier: impl RateModifier + 'h) {
        insert_ordered(&mut self.modifiers, priority, Box::new(modifier));
    }

    /// Run every modifier in order on the rates of one package.
    pub fn run(
        &self,
        ctx: &RequestContext<'_>,
        cart: Option<&CartSnapshot<'_>>,
        package: PackageId,
        rates: &mut Vec<ShippingRate>,
    ) {
        for (_, modifier) in &self.modifiers {
            modifier.modify_rates(ctx, cart, package, rates);
        }
    }

    /// Priorities of the registered modifiers, in run order.
    pub fn priorities(&self) -> impl Iterator<Item = Priority> + '_ {
        self.modifiers.iter().map(|(priority, _)| *priority)
    }

    /// Number of registered modifiers.
    pub fn len(&self) -> usize {
        self.modifiers.len()
    }

    /// Check if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.modifiers.is_empty()
    }
}

impl fmt::Debug for RatePipeline<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RatePipeline")
            .field("priorities", &self.priorities().collect::<Vec<_>>())
            .finish()
    }
}
