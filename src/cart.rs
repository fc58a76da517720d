//! Cart
//!
//! The read-only cart view the conditions evaluate against, and the fee ledger
//! the host exposes for mutation.

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;

use crate::categories::CategorySet;

/// Host product identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProductId(pub u64);

/// A cart line, reduced to what the promotion conditions look at.
#[derive(Debug, Clone, PartialEq)]
pub struct CartItem {
    product_id: ProductId,
    categories: CategorySet,
}

impl CartItem {
    /// Create a new cart item.
    pub fn new(product_id: ProductId, categories: CategorySet) -> Self {
        Self {
            product_id,
            categories,
        }
    }

    /// Product the line refers to.
    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    /// Categories the product belongs to.
    pub fn categories(&self) -> &CategorySet {
        &self.categories
    }
}

/// Snapshot of the host cart at evaluation time.
///
/// The subtotal is pre-discount and pre-tax. The snapshot is never mutated by the
/// promotion; the host rebuilds it after every cart change.
#[derive(Debug, Clone)]
pub struct CartSnapshot<'a> {
    items: SmallVec<[CartItem; 8]>,
    subtotal: Money<'a, Currency>,
}

impl<'a> CartSnapshot<'a> {
    /// Create a snapshot from ordered cart items and the host-computed subtotal.
    pub fn new(items: impl IntoIterator<Item = CartItem>, subtotal: Money<'a, Currency>) -> Self {
        Self {
            items: items.into_iter().collect(),
            subtotal,
        }
    }

    /// Cart items in cart order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Pre-discount subtotal.
    pub fn subtotal(&self) -> &Money<'a, Currency> {
        &self.subtotal
    }

    /// Pre-discount subtotal in major units (e.g. pounds, dollars, yen).
    pub fn subtotal_amount(&self) -> Decimal {
        *self.subtotal.amount()
    }

    /// Currency of the cart.
    pub fn currency(&self) -> &'a Currency {
        self.subtotal.currency()
    }

    /// Check if the cart has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Convert minor units (pence, cents) of `currency` into a major unit decimal.
pub fn minor_to_major(minor: i64, currency: &Currency) -> Decimal {
    Decimal::new(minor, currency.exponent)
}

/// A labelled fee line attached to the cart. Discounts are negative fees.
#[derive(Debug, Clone, PartialEq)]
pub struct Fee {
    /// Label shown to the customer
    pub label: String,

    /// Fee amount in major units
    pub amount: Decimal,
}

impl Fee {
    /// Create a new fee line.
    pub fn new(label: impl Into<String>, amount: Decimal) -> Self {
        Self {
            label: label.into(),
            amount,
        }
    }
}

/// Host mutation API for attaching fees during a totals pass.
///
/// The host clears its fee list before every pass.
pub trait FeeLedger {
    /// Attach a fee to the cart.
    fn add_fee(&mut self, fee: Fee);
}

impl FeeLedger for Vec<Fee> {
    fn add_fee(&mut self, fee: Fee) {
        self.push(fee);
    }
}
