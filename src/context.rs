//! Request Context
//!
//! Per-request state threaded through the fee and shipping hooks.
//!
//! The settings store is read at most once per context and the normalised
//! settings are reused by every check in that request. Dropping the context ends
//! the request; the next request reads the store again, so admin edits are picked
//! up without any invalidation.

use std::cell::OnceCell;

use tracing::{debug, warn};

use crate::settings::{PromoSettings, SettingsProvider};

/// What kind of host request is being served.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestKind {
    /// Regular storefront page render
    #[default]
    Storefront,

    /// Asynchronous cart or checkout update
    Ajax,

    /// Back-office page render
    Admin,
}

impl RequestKind {
    /// Back-office page renders never get promotion fees.
    pub const fn applies_fees(self) -> bool {
        !matches!(self, RequestKind::Admin)
    }

    /// Stable name, for structured logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            RequestKind::Storefront => "storefront",
            RequestKind::Ajax => "ajax",
            RequestKind::Admin => "admin",
        }
    }
}

/// Request-scoped context with a lazily loaded settings snapshot.
pub struct RequestContext<'p> {
    provider: &'p dyn SettingsProvider,
    kind: RequestKind,
    settings: OnceCell<PromoSettings>,
}

impl<'p> RequestContext<'p> {
    /// Start a request against the given settings store.
    pub fn new(provider: &'p dyn SettingsProvider, kind: RequestKind) -> Self {
        Self {
            provider,
            kind,
            settings: OnceCell::new(),
        }
    }

    /// Kind of request being served.
    pub fn kind(&self) -> RequestKind {
        self.kind
    }

    /// Settings for this request, loaded from the store on first use.
    ///
    /// A store that cannot be read is treated as having no configuration, which
    /// leaves the promotion inactive.
    pub fn settings(&self) -> &PromoSettings {
        self.settings.get_or_init(|| match self.provider.load() {
            Ok(raw) => {
                debug!(request_kind = self.kind.as_str(), "loaded promotion settings");
                raw.normalize()
            }
            Err(err) => {
                warn!(error = %err, "promotion settings unavailable, treating as inactive");
                PromoSettings::default()
            }
        })
    }
}

impl std::fmt::Debug for RequestContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestContext")
            .field("kind", &self.kind)
            .field("settings", &self.settings.get())
            .finish_non_exhaustive()
    }
}
