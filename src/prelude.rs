//! Promogate prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    banner::should_display,
    cart::{CartItem, CartSnapshot, Fee, FeeLedger, ProductId},
    categories::{CategoryId, CategorySet},
    clock::{Clock, FixedClock, SystemClock},
    context::{RequestContext, RequestKind},
    decision::{Condition, Verdict, evaluate, is_promo_eligible},
    discount::{apply_cart_discount, apply_discount_for, discount_fee},
    engine::PromoEngine,
    fixtures::{FixtureError, Scenario},
    invalidation::{CartEvent, RateCache, Recalculate, refresh_on_cart_change},
    observer::{NoopObserver, PromoObserver, TracingObserver},
    pipeline::{FeeContributor, FeePipeline, Priority, RateModifier, RatePipeline},
    receipt::{Receipt, ReceiptError},
    session::{CartLine, CheckoutSession, Totals},
    settings::{
        PromoSettings, RawSettings, SettingsError, SettingsProvider, StaticSettings,
        YamlSettingsProvider,
    },
    shipping::{PackageId, ShippingRate, TaxClass, apply_free_shipping},
};
