//! Banner Visibility
//!
//! Whether the storefront promo banner is shown. Rendering and the dismissal cookie
//! belong to the host.

use jiff::civil::Date;

use crate::{
    conditions::{is_activated, is_within_date_range},
    context::RequestKind,
    settings::PromoSettings,
};

/// Returns true if the banner should be rendered for this request.
///
/// The banner ignores the cart: it advertises the campaign, so only the
/// activation switch and the date range matter.
pub fn should_display(
    settings: &PromoSettings,
    today: Date,
    dismissed: bool,
    kind: RequestKind,
) -> bool {
    kind != RequestKind::Admin
        && !dismissed
        && is_activated(settings)
        && is_within_date_range(settings, today)
        && !settings.banner.message.trim().is_empty()
}
