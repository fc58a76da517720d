//! Checkout Example
//!
//! Loads a checkout scenario, runs the promotion against it and prints the receipt.
//!
//! Use `-s` to load a scenario by name
//! Use `-d` to evaluate on a different date
//! Use `--admin` to render as a back-office request
//! Set `RUST_LOG=promogate=debug` to see each decision

use std::io;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use promogate::{
    clock::{Clock, FixedClock, SystemClock},
    context::RequestKind,
    engine::PromoEngine,
    fixtures::Scenario,
    observer::TracingObserver,
    receipt::Receipt,
    session::CheckoutSession,
    settings::StaticSettings,
    utils::DemoCheckoutArgs,
};

/// Checkout Example
pub fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = DemoCheckoutArgs::parse();

    let scenario = Scenario::from_set_in(&args.fixtures, &args.scenario)?;
    let provider = scenario.settings_provider();

    match args.date.or(scenario.today) {
        Some(today) => checkout(&scenario, &provider, FixedClock(today), args.admin),
        None => checkout(&scenario, &provider, SystemClock, args.admin),
    }
}

fn checkout(
    scenario: &Scenario,
    provider: &StaticSettings,
    clock: impl Clock,
    admin: bool,
) -> Result<()> {
    let engine = PromoEngine::with_clock_and_observer(clock, TracingObserver);
    let mut session = CheckoutSession::new(scenario.currency()?, provider);

    let (fees, rates) = session.pipelines_mut();
    engine.register(fees, rates);

    scenario.populate(&mut session)?;

    if admin {
        session.begin_request(RequestKind::Admin);
        session.update_order_review();
    }

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    Receipt::from_session(&session).write_to(&mut handle)?;

    Ok(())
}
