//! Promogate
//!
//! Promogate is a conditional promotion engine for storefront checkouts. It decides
//! whether a single limited-time campaign applies to a cart, then adds a cart-wide
//! percentage discount fee and/or makes shipping free.

pub mod banner;
pub mod cart;
pub mod categories;
pub mod clock;
pub mod conditions;
pub mod context;
pub mod decision;
pub mod discount;
pub mod engine;
pub mod fixtures;
pub mod invalidation;
pub mod observer;
pub mod pipeline;
pub mod prelude;
pub mod receipt;
pub mod session;
pub mod settings;
pub mod shipping;
pub mod utils;
