//! Utils

use std::path::PathBuf;

use clap::Parser;
use jiff::civil::Date;

/// Arguments for the checkout demo
#[derive(Debug, Parser)]
pub struct DemoCheckoutArgs {
    /// Scenario to load from the fixtures directory
    #[clap(short, long, default_value = "spring-sale")]
    pub scenario: String,

    /// Evaluate on this date instead of the scenario's (`YYYY-MM-DD`)
    #[clap(short, long)]
    pub date: Option<Date>,

    /// Fixtures directory
    #[clap(short, long, default_value = "./fixtures")]
    pub fixtures: PathBuf,

    /// Render the receipt as an admin (back-office) request
    #[clap(long)]
    pub admin: bool,
}
