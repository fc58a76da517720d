//! Fixtures
//!
//! YAML checkout scenarios: promotion settings, a cart, shipping packages and the
//! date to evaluate on.

use std::{
    fs,
    path::{Path, PathBuf},
};

use jiff::civil::Date;
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use rusty_money::iso::{Currency, EUR, GBP, JPY, USD};
use serde::Deserialize;
use thiserror::Error;

use crate::{
    cart::ProductId,
    categories::CategorySet,
    session::{CartLine, CheckoutSession},
    settings::{RawSettings, StaticSettings},
    shipping::{ShippingRate, TaxClass},
};

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Price in a different currency from the scenario
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),
}

/// A cart line in a scenario.
#[derive(Debug, Clone, Deserialize)]
pub struct LineFixture {
    /// Product identifier
    pub product: u64,

    /// Product categories
    #[serde(default)]
    pub categories: Vec<u64>,

    /// Unit price, e.g. `"12.50 GBP"`
    pub price: String,

    /// Number of units
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

/// A quoted shipping rate in a scenario.
#[derive(Debug, Clone, Deserialize)]
pub struct RateFixture {
    /// Rate identifier
    pub id: String,

    /// Customer-facing label
    pub label: String,

    /// Cost before tax, e.g. `"5.00 GBP"`
    pub cost: String,

    /// Tax lines by class name
    #[serde(default)]
    pub taxes: FxHashMap<String, String>,
}

/// A shipping package and the rates quoted for it.
#[derive(Debug, Clone, Deserialize)]
pub struct PackageFixture {
    /// Quoted rates, in display order
    #[serde(default)]
    pub rates: Vec<RateFixture>,
}

/// A complete checkout scenario.
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    /// Currency code the scenario is priced in
    pub currency: String,

    /// Date to evaluate on; the wall clock when absent
    #[serde(default)]
    pub today: Option<Date>,

    /// Promotion settings, as stored by the admin screen
    #[serde(default)]
    pub settings: RawSettings,

    /// Cart lines
    #[serde(default)]
    pub items: Vec<LineFixture>,

    /// Shipping packages
    #[serde(default)]
    pub packages: Vec<PackageFixture>,
}

impl Scenario {
    /// Load a scenario from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let contents = fs::read_to_string(path)?;

        Ok(serde_norway::from_str(&contents)?)
    }

    /// Load a named scenario from `./fixtures/scenarios`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        Self::from_set_in("./fixtures", name)
    }

    /// Load a named scenario from `<base_path>/scenarios`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_set_in(base_path: impl Into<PathBuf>, name: &str) -> Result<Self, FixtureError> {
        let path = base_path
            .into()
            .join("scenarios")
            .join(format!("{name}.yml"));

        Self::from_file(path)
    }

    /// Settings store holding the scenario's settings.
    pub fn settings_provider(&self) -> StaticSettings {
        StaticSettings::new(self.settings.clone())
    }

    /// Currency the scenario is priced in.
    ///
    /// # Errors
    ///
    /// Returns an error if the code is not a supported currency.
    pub fn currency(&self) -> Result<&'static Currency, FixtureError> {
        parse_currency(&self.currency)
    }

    /// Add the scenario's packages, then its cart lines, to `session`.
    ///
    /// Register pipelines before populating so every cart event is seen.
    ///
    /// # Errors
    ///
    /// Returns an error if a price is malformed or in another currency.
    pub fn populate(&self, session: &mut CheckoutSession<'_>) -> Result<(), FixtureError> {
        let currency = self.currency()?;

        for package in &self.packages {
            let rates = package
                .rates
                .iter()
                .map(|rate| rate_from_fixture(rate, currency))
                .collect::<Result<Vec<_>, _>>()?;

            session.add_package(rates);
        }

        for item in &self.items {
            let unit_price_minor = parse_price_in(&item.price, currency)?;

            session.add_item(CartLine::new(
                ProductId(item.product),
                CategorySet::from_ids(&item.categories),
                unit_price_minor,
                item.quantity,
            ));
        }

        Ok(())
    }
}

fn rate_from_fixture(
    fixture: &RateFixture,
    currency: &'static Currency,
) -> Result<ShippingRate, FixtureError> {
    let cost = parse_major_in(&fixture.cost, currency)?;
    let mut rate = ShippingRate::new(fixture.id.clone(), fixture.label.clone(), cost);

    for (class, amount) in &fixture.taxes {
        rate = rate.with_tax(TaxClass::new(class.clone()), parse_major_in(amount, currency)?);
    }

    Ok(rate)
}

/// Parse a currency code.
///
/// # Errors
///
/// Returns an error for codes other than GBP, USD, EUR and JPY.
pub fn parse_currency(code: &str) -> Result<&'static Currency, FixtureError> {
    match code {
        "GBP" => Ok(GBP),
        "USD" => Ok(USD),
        "EUR" => Ok(EUR),
        "JPY" => Ok(JPY),
        other => Err(FixtureError::UnknownCurrency(other.to_string())),
    }
}

/// Parse price string (e.g., `"2.99 GBP"`) into minor units and currency.
///
/// # Errors
///
/// Returns an error if the format is not `AMOUNT CURRENCY` or the currency is
/// unsupported.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let (amount, currency) = parse_amount(s)?;

    let mut scaled = amount.round_dp(currency.exponent);

    scaled.rescale(currency.exponent);

    let minor_units = i64::try_from(scaled.mantissa())
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    Ok((minor_units, currency))
}

fn parse_amount(s: &str) -> Result<(Decimal, &'static Currency), FixtureError> {
    let mut parts = s.split_whitespace();

    let (Some(amount), Some(code), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    Ok((amount, parse_currency(code)?))
}

fn ensure_currency(found: &'static Currency, expected: &'static Currency) -> Result<(), FixtureError> {
    if found == expected {
        return Ok(());
    }

    Err(FixtureError::CurrencyMismatch(
        expected.iso_alpha_code.to_string(),
        found.iso_alpha_code.to_string(),
    ))
}

fn parse_price_in(s: &str, expected: &'static Currency) -> Result<i64, FixtureError> {
    let (minor, currency) = parse_price(s)?;

    ensure_currency(currency, expected)?;

    Ok(minor)
}

fn parse_major_in(s: &str, expected: &'static Currency) -> Result<Decimal, FixtureError> {
    let (amount, currency) = parse_amount(s)?;

    ensure_currency(currency, expected)?;

    Ok(amount)
}
