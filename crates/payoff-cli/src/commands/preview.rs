use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use payoff_core::payoff::preview::{self, PreviewInput};

use super::RequestBuilder;

/// Arguments for the approximate chart preview
#[derive(Args)]
pub struct PreviewArgs {
    /// Path to JSON or YAML input file
    #[arg(long)]
    pub input: Option<String>,

    /// Debt as name:principal:rate[:min_payment]; repeatable, replaces input debts
    #[arg(long = "debt")]
    pub debts: Vec<String>,

    /// Extra monthly payment for the strategy line
    #[arg(long)]
    pub extra: Option<Decimal>,

    /// Months to chart (default 48)
    #[arg(long)]
    pub horizon: Option<u32>,
}

pub fn run_preview(args: PreviewArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut b = RequestBuilder::load(args.input.as_deref(), &args.debts, "preview")?;
    b.set_decimal("extra_payment", args.extra)
        .set_u32("horizon_months", args.horizon);
    let input: PreviewInput = b.build()?;
    let result = preview::linear_preview(&input)?;
    Ok(serde_json::to_value(result)?)
}
