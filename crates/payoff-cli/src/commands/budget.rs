use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use payoff_core::payoff::budget::{self, SuggestionInput};

use super::RequestBuilder;

/// Arguments for the safe extra-payment suggestion
#[derive(Args)]
pub struct SuggestExtraArgs {
    /// Path to JSON or YAML input file
    #[arg(long)]
    pub input: Option<String>,

    /// Debt as name:principal:rate[:min_payment]; repeatable, replaces input debts
    #[arg(long = "debt")]
    pub debts: Vec<String>,

    /// Monthly income
    #[arg(long)]
    pub income: Option<Decimal>,
}

pub fn run_suggest_extra(args: SuggestExtraArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut b = RequestBuilder::load(args.input.as_deref(), &args.debts, "extra payment suggestion")?;
    b.set_decimal("monthly_income", args.income);
    let input: SuggestionInput = b.build()?;
    let result = budget::suggest_safe_extra(&input)?;
    Ok(serde_json::to_value(result)?)
}
