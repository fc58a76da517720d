//! Settings
//!
//! Campaign configuration as stored by the host, and its normalised form.
//!
//! The host keeps a flat key-value blob. [`RawSettings`] mirrors that blob with
//! every key optional; [`RawSettings::normalize`] turns it into [`PromoSettings`],
//! which is what the conditions and appliers read.

use std::{fs, io, path::PathBuf};

use jiff::{civil::Date, tz::TimeZone};
use rust_decimal::{Decimal, prelude::FromPrimitive};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::categories::CategorySet;

/// Name used for the discount fee when the merchant leaves it blank.
pub const DEFAULT_PROMO_NAME: &str = "Promo Discount";

/// Errors raised while reading settings from a store.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// IO error reading the settings file
    #[error("Failed to read settings file: {0}")]
    Io(#[from] io::Error),

    /// YAML parsing error
    #[error("Failed to parse settings YAML: {0}")]
    Yaml(#[from] serde_norway::Error),
}

/// Settings blob as persisted by the host. Absent keys take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawSettings {
    /// Master switch
    pub activate: bool,

    /// First day of the campaign (`YYYY-MM-DD`), empty for none
    pub promo_start: String,

    /// Last day of the campaign (`YYYY-MM-DD`), empty for none
    pub promo_end: String,

    /// Category ids, at least one of which must be in the cart
    pub product_categories: Vec<u64>,

    /// Discount in percent points
    pub discount_percentage: f64,

    /// Zero all shipping rates while eligible
    pub free_shipping: bool,

    /// Minimum pre-discount subtotal, 0 for none
    pub minimum_cart: f64,

    /// Discount fee label prefix
    pub promo_name: String,

    /// Storefront banner message
    pub promo_message: String,

    /// Banner call-to-action text
    pub cta_text: String,

    /// Banner call-to-action link
    pub cta_link: String,

    /// IANA time zone of the store, empty for UTC
    pub time_zone: String,
}

/// Storefront banner content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BannerSettings {
    /// Message shown in the banner
    pub message: String,

    /// Call-to-action text
    pub cta_text: String,

    /// Call-to-action link
    pub cta_link: String,
}

/// Normalised campaign settings.
///
/// Percentages are clamped to `[0, 100]` and the minimum is floored at zero
/// before a value of this type exists.
#[derive(Debug, Clone)]
pub struct PromoSettings {
    /// Master switch
    pub activate: bool,

    /// Inclusive start date
    pub promo_start: Option<Date>,

    /// Inclusive end date
    pub promo_end: Option<Date>,

    /// Categories the cart must touch; empty means no restriction
    pub required_categories: CategorySet,

    /// Discount in percent points, `0..=100`
    pub discount_percentage: Decimal,

    /// Zero shipping while eligible
    pub free_shipping: bool,

    /// Minimum pre-discount subtotal; zero means no minimum
    pub minimum_cart: Decimal,

    /// Discount fee label prefix
    pub promo_name: String,

    /// Storefront banner content
    pub banner: BannerSettings,

    /// Time zone the campaign dates are interpreted in
    pub time_zone: TimeZone,
}

impl Default for PromoSettings {
    fn default() -> Self {
        RawSettings::default().normalize()
    }
}

impl RawSettings {
    /// Normalise the raw blob into [`PromoSettings`].
    ///
    /// Out-of-range numbers are clamped, unparseable dates and unknown time zones
    /// are treated as unset.
    pub fn normalize(&self) -> PromoSettings {
        let discount_percentage =
            finite_decimal(self.discount_percentage).clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);

        let minimum_cart = finite_decimal(self.minimum_cart).max(Decimal::ZERO);

        let promo_name = match self.promo_name.trim() {
            "" => DEFAULT_PROMO_NAME.to_string(),
            name => name.to_string(),
        };

        PromoSettings {
            activate: self.activate,
            promo_start: parse_date(&self.promo_start),
            promo_end: parse_date(&self.promo_end),
            required_categories: CategorySet::from_ids(&self.product_categories),
            discount_percentage,
            free_shipping: self.free_shipping,
            minimum_cart,
            promo_name,
            banner: BannerSettings {
                message: self.promo_message.trim().to_string(),
                cta_text: self.cta_text.trim().to_string(),
                cta_link: self.cta_link.trim().to_string(),
            },
            time_zone: parse_time_zone(&self.time_zone),
        }
    }
}

/// Convert a float setting into a decimal, mapping NaN and infinities to zero.
fn finite_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or(Decimal::ZERO)
}

/// Parse a `YYYY-MM-DD` date; blank or malformed input is no bound.
fn parse_date(value: &str) -> Option<Date> {
    match value.trim() {
        "" => None,
        value => value.parse::<Date>().ok(),
    }
}

fn parse_time_zone(name: &str) -> TimeZone {
    match name.trim() {
        "" => TimeZone::UTC,
        name => TimeZone::get(name).unwrap_or(TimeZone::UTC),
    }
}

/// Host settings store.
pub trait SettingsProvider {
    /// Read the current settings blob.
    ///
    /// # Errors
    ///
    /// Returns a [`SettingsError`] if the store could not be read or parsed.
    fn load(&self) -> Result<RawSettings, SettingsError>;
}

impl<P: SettingsProvider + ?Sized> SettingsProvider for &P {
    fn load(&self) -> Result<RawSettings, SettingsError> {
        (**self).load()
    }
}

/// In-memory settings, as handed over by a host that already holds the blob.
#[derive(Debug, Clone, Default)]
pub struct StaticSettings {
    raw: RawSettings,
}

impl StaticSettings {
    /// Wrap a settings blob.
    pub fn new(raw: RawSettings) -> Self {
        Self { raw }
    }

    /// The wrapped blob.
    pub fn raw(&self) -> &RawSettings {
        &self.raw
    }
}

impl SettingsProvider for StaticSettings {
    fn load(&self) -> Result<RawSettings, SettingsError> {
        Ok(self.raw.clone())
    }
}

/// Settings stored as a YAML file.
///
/// A missing file means the merchant never saved settings, which loads as the
/// default (inactive) blob.
#[derive(Debug, Clone)]
pub struct YamlSettingsProvider {
    path: PathBuf,
}

impl YamlSettingsProvider {
    /// Read settings from the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SettingsProvider for YamlSettingsProvider {
    fn load(&self) -> Result<RawSettings, SettingsError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(RawSettings::default()),
            Err(err) => return Err(err.into()),
        };

        if contents.trim().is_empty() {
            return Ok(RawSettings::default());
        }

        Ok(serde_norway::from_str(&contents)?)
    }
}
