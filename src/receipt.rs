//! Receipt
//!
//! Printable checkout summary: cart lines, fees, selected shipping and totals.

use std::io;

use rust_decimal::{Decimal, RoundingStrategy};
use rusty_money::{Money, iso::Currency};
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::{Fee, minor_to_major},
    session::{CheckoutSession, Totals},
    shipping::{PackageId, ShippingRate},
};

/// Errors that can occur when writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Writing to the output failed
    #[error("Failed to write receipt: {0}")]
    Io(#[from] io::Error),

    /// An amount does not fit in the currency's minor units
    #[error("Amount out of range: {0}")]
    AmountOutOfRange(Decimal),
}

/// A receipt line: description and amount in major units.
#[derive(Debug, Clone, PartialEq)]
struct Line {
    kind: &'static str,
    description: String,
    amount: Decimal,
}

/// Checkout receipt, captured from a session.
#[derive(Debug, Clone)]
pub struct Receipt {
    lines: Vec<Line>,
    totals: Totals,
    currency: &'static Currency,
}

impl Receipt {
    /// Capture the current state of `session`.
    pub fn from_session(session: &CheckoutSession<'_>) -> Self {
        let mut lines = Vec::new();

        for line in session.lines() {
            lines.push(Line {
                kind: "Item",
                description: format!("Product {} x{}", line.product_id.0, line.quantity),
                amount: minor_to_major(line.total_minor(), session.currency()),
            });
        }

        lines.extend(session.fees().iter().map(|Fee { label, amount }| Line {
            kind: "Fee",
            description: label.clone(),
            amount: *amount,
        }));

        for idx in 0..session.package_count() {
            let package = PackageId(idx);

            if let Some(rate) = session
                .package_rates(package)
                .and_then(<[ShippingRate]>::first)
            {
                lines.push(Line {
                    kind: "Shipping",
                    description: format!("Package {package}: {}", rate.label()),
                    amount: rate.cost() + rate.tax_total(),
                });
            }
        }

        Self {
            lines,
            totals: session.totals(),
            currency: session.currency(),
        }
    }

    /// Totals captured with the receipt.
    pub fn totals(&self) -> &Totals {
        &self.totals
    }

    /// Currency the receipt is priced in.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Savings from promotion fees, as a positive amount.
    pub fn savings(&self) -> Decimal {
        (-self.totals.fees).max(Decimal::ZERO)
    }

    /// Write the receipt as a table followed by a summary.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError`] if an amount cannot be formatted or the output
    /// cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record(["", "Description", "Amount"]);

        for line in &self.lines {
            builder.push_record([
                line.kind.to_string(),
                line.description.clone(),
                format_money(line.amount, self.currency)?,
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Rows::first(), Color::BOLD);
        table.modify(Columns::new(2..3), Alignment::right());

        writeln!(out, "\n{table}")?;

        let summary = [
            (" Subtotal:", self.totals.subtotal),
            (" Fees:", self.totals.fees),
            (" Shipping:", self.totals.shipping + self.totals.shipping_tax),
            (" Total:", self.totals.total),
            (" Savings:", self.savings()),
        ];

        for (label, amount) in summary {
            writeln!(out, "{label:<11}{:>12}", format_money(amount, self.currency)?)?;
        }

        writeln!(out)?;

        Ok(())
    }
}

/// Format a major unit amount in `currency`, rounded to its minor unit.
fn format_money(amount: Decimal, currency: &'static Currency) -> Result<String, ReceiptError> {
    let mut rounded =
        amount.round_dp_with_strategy(currency.exponent, RoundingStrategy::MidpointAwayFromZero);

    rounded.rescale(currency.exponent);

    let minor = i64::try_from(rounded.mantissa())
        .map_err(|_err| ReceiptError::AmountOutOfRange(amount))?;

    Ok(Money::from_minor(minor, currency).to_string())
}
