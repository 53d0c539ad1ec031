use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use payoff_core::payoff::plan::{self, PayoffPlanInput, SimulationInput, SweepInput};
use payoff_core::Strategy;

use super::RequestBuilder;

/// Flags shared by every engine-backed command
#[derive(Args)]
pub struct EngineArgs {
    /// Path to JSON or YAML input file
    #[arg(long)]
    pub input: Option<String>,

    /// Debt as name:principal:rate[:min_payment]; repeatable, replaces input debts
    #[arg(long = "debt")]
    pub debts: Vec<String>,

    /// Month the projection starts from (YYYY-MM-DD, default today)
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// Maximum months to simulate before reporting non-convergence
    #[arg(long)]
    pub month_cap: Option<u32>,
}

/// Arguments for a single engine run
#[derive(Args)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub engine: EngineArgs,

    /// Extra monthly payment on top of minimums
    #[arg(long)]
    pub extra: Option<Decimal>,

    /// Repayment order
    #[arg(long)]
    pub strategy: Option<Strategy>,
}

/// Arguments for a baseline-vs-strategy plan
#[derive(Args)]
pub struct PlanArgs {
    #[command(flatten)]
    pub engine: EngineArgs,

    /// Extra monthly payment on top of minimums
    #[arg(long)]
    pub extra: Option<Decimal>,

    /// Repayment order
    #[arg(long)]
    pub strategy: Option<Strategy>,

    /// Monthly income; caps the extra payment at income left after minimums
    #[arg(long)]
    pub income: Option<Decimal>,
}

/// Arguments for an avalanche / snowball comparison
#[derive(Args)]
pub struct CompareArgs {
    #[command(flatten)]
    pub engine: EngineArgs,

    /// Extra monthly payment on top of minimums
    #[arg(long)]
    pub extra: Option<Decimal>,

    /// Monthly income; caps the extra payment at income left after minimums
    #[arg(long)]
    pub income: Option<Decimal>,
}

/// Arguments for an extra-payment sweep
#[derive(Args)]
pub struct SweepArgs {
    #[command(flatten)]
    pub engine: EngineArgs,

    /// Repayment order
    #[arg(long)]
    pub strategy: Option<Strategy>,

    /// Smallest extra payment
    #[arg(long)]
    pub from: Option<Decimal>,

    /// Largest extra payment
    #[arg(long)]
    pub to: Option<Decimal>,

    /// Increment between runs
    #[arg(long)]
    pub step: Option<Decimal>,
}

fn builder(engine: &EngineArgs, what: &str) -> Result<RequestBuilder, Box<dyn std::error::Error>> {
    let mut b = RequestBuilder::load(engine.input.as_deref(), &engine.debts, what)?;
    b.set_config_u32("month_cap", engine.month_cap)
        .start_date(engine.start_date);
    Ok(b)
}

pub fn run_simulate(args: SimulateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut b = builder(&args.engine, "simulation")?;
    b.set_decimal("extra_payment", args.extra)
        .set_serialized("strategy", args.strategy)?;
    let input: SimulationInput = b.build()?;
    let result = plan::run_simulation(&input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_plan(args: PlanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut b = builder(&args.engine, "payoff planning")?;
    b.set_decimal("extra_payment", args.extra)
        .set_decimal("monthly_income", args.income)
        .set_serialized("strategy", args.strategy)?;
    let input: PayoffPlanInput = b.build()?;
    let result = plan::plan_payoff(&input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_compare(args: CompareArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut b = builder(&args.engine, "strategy comparison")?;
    b.set_decimal("extra_payment", args.extra)
        .set_decimal("monthly_income", args.income);
    let input: PayoffPlanInput = b.build()?;
    let result = plan::compare_strategies(&input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_sweep(args: SweepArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut b = builder(&args.engine, "extra payment sweep")?;
    b.set_decimal("from", args.from)
        .set_decimal("to", args.to)
        .set_decimal("step", args.step)
        .set_serialized("strategy", args.strategy)?;
    let input: SweepInput = b.build()?;
    let result = plan::extra_payment_sweep(&input)?;
    Ok(serde_json::to_value(result)?)
}
