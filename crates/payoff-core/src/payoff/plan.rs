use std::collections::HashSet;
use std::time::Instant;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::budget::{cap_extra_to_disposable, validate_amount, SimulationBudget, MAX_AMOUNT};
use super::engine::{simulate, PayoffResult, SimulationConfig};
use super::strategy::priority_order;
use crate::error::PayoffError;
use crate::time_value::{amortization_months, monthly_interest};
use crate::types::{with_metadata, AprPercent, ComputationOutput, Debt, DebtEntry, Money, Strategy};
use crate::PayoffEngineResult;

/// 100 years. Caps beyond this are rejected as input errors.
pub const MAX_MONTH_CAP: u32 = 1200;

/// Upper bound on rows produced by a single sweep.
pub const MAX_SWEEP_ROWS: usize = 1000;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input for a single payoff plan (or a strategy comparison).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoffPlanInput {
    pub debts: Vec<DebtEntry>,
    #[serde(default)]
    pub extra_payment: Money,
    #[serde(default)]
    pub strategy: Strategy,
    /// When present, the extra payment is capped at income left after minimums.
    #[serde(default)]
    pub monthly_income: Option<Money>,
    /// Anchor for payoff dates. Supplied by the caller; never read from a clock.
    pub start_date: NaiveDate,
    #[serde(default)]
    pub config: SimulationConfig,
}

/// Input for one validated engine run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationInput {
    pub debts: Vec<DebtEntry>,
    #[serde(default)]
    pub extra_payment: Money,
    #[serde(default)]
    pub strategy: Strategy,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub config: SimulationConfig,
}

/// Where the extra money goes this month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FocusDebt {
    pub debt_id: String,
    pub debt_name: String,
    pub min_payment: Money,
    pub recommended_payment: Money,
}

/// One row of the "next in line" list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoffOrderEntry {
    pub position: usize,
    pub debt_id: String,
    pub debt_name: String,
    pub balance: Money,
    pub rate: AprPercent,
    pub min_payment: Money,
    /// Month the plan clears this debt, if it does within the cap.
    pub payoff_month: Option<u32>,
    /// Months to clear this debt alone at its minimum; `None` if never.
    pub months_at_minimum: Option<u32>,
}

/// Output of `plan_payoff`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoffPlan {
    pub strategy: Strategy,
    pub budget: SimulationBudget,
    pub requested_extra: Money,
    pub extra_capped: bool,
    pub baseline: PayoffResult,
    pub accelerated: PayoffResult,
    pub interest_saved: Money,
    pub months_saved: i64,
    pub focus: Option<FocusDebt>,
    pub payoff_order: Vec<PayoffOrderEntry>,
}

/// Output of `compare_strategies`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyComparison {
    pub budget: SimulationBudget,
    pub baseline: PayoffResult,
    pub avalanche: PayoffResult,
    pub snowball: PayoffResult,
    pub recommended: Strategy,
    /// Snowball interest minus avalanche interest.
    pub interest_difference: Money,
    /// Snowball months minus avalanche months.
    pub months_difference: i64,
}

/// Input for an extra-payment sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepInput {
    pub debts: Vec<DebtEntry>,
    #[serde(default)]
    pub strategy: Strategy,
    pub from: Money,
    pub to: Money,
    pub step: Money,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub config: SimulationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepRow {
    pub extra_payment: Money,
    pub months: u32,
    pub total_interest: Money,
    pub interest_saved: Money,
    pub payoff_date: NaiveDate,
    pub converged: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepOutput {
    pub strategy: Strategy,
    pub baseline_months: u32,
    pub baseline_interest: Money,
    pub rows: Vec<SweepRow>,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Reject debts the engine cannot meaningfully simulate.
///
/// Negative balances, rates, or minimums are input errors; nothing is clamped.
pub fn validate_debts(debts: &[Debt]) -> PayoffEngineResult<()> {
    let mut seen: HashSet<&str> = HashSet::new();
    for (i, debt) in debts.iter().enumerate() {
        if debt.name.trim().is_empty() {
            return Err(PayoffError::invalid(
                format!("debts[{i}].name"),
                "name must not be empty",
            ));
        }
        if debt.principal < Decimal::ZERO {
            return Err(PayoffError::invalid(
                format!("debts[{i}].principal"),
                format!("{}: principal must be >= 0", debt.name),
            ));
        }
        if debt.rate < Decimal::ZERO {
            return Err(PayoffError::invalid(
                format!("debts[{i}].rate"),
                format!("{}: rate must be >= 0", debt.name),
            ));
        }
        if debt.min_payment < Decimal::ZERO {
            return Err(PayoffError::invalid(
                format!("debts[{i}].min_payment"),
                format!("{}: min_payment must be >= 0", debt.name),
            ));
        }
        if debt.principal > MAX_AMOUNT || debt.min_payment > MAX_AMOUNT {
            return Err(PayoffError::invalid(
                format!("debts[{i}]"),
                format!("{}: principal and min_payment must be <= {MAX_AMOUNT}", debt.name),
            ));
        }
        if !seen.insert(debt.id.as_str()) {
            return Err(PayoffError::invalid(
                format!("debts[{i}].id"),
                format!("duplicate debt id '{}'", debt.id),
            ));
        }
    }
    Ok(())
}

pub fn validate_config(config: &SimulationConfig) -> PayoffEngineResult<()> {
    if config.month_cap == 0 || config.month_cap > MAX_MONTH_CAP {
        return Err(PayoffError::invalid(
            "config.month_cap",
            format!("month_cap must be between 1 and {MAX_MONTH_CAP}"),
        ));
    }
    if config.epsilon <= Decimal::ZERO {
        return Err(PayoffError::invalid(
            "config.epsilon",
            "epsilon must be > 0",
        ));
    }
    Ok(())
}

fn validate_extra(field: &str, extra: Money) -> PayoffEngineResult<()> {
    validate_amount(field, extra)
}

fn resolve_debts(entries: &[DebtEntry]) -> PayoffEngineResult<Vec<Debt>> {
    let debts = DebtEntry::resolve_all(entries);
    validate_debts(&debts)?;
    Ok(debts)
}

/// Validated debts plus the extra payment after any income cap.
struct Prepared {
    debts: Vec<Debt>,
    extra: Money,
    capped: bool,
}

fn prepare(input: &PayoffPlanInput, warnings: &mut Vec<String>) -> PayoffEngineResult<Prepared> {
    validate_config(&input.config)?;
    validate_extra("extra_payment", input.extra_payment)?;
    let debts = resolve_debts(&input.debts)?;

    if let Some(income) = input.monthly_income {
        validate_amount("monthly_income", income)?;
    }
    let (extra, capped) = match input.monthly_income {
        Some(income) => cap_extra_to_disposable(input.extra_payment, income, &debts),
        None => (input.extra_payment, false),
    };
    if capped {
        warnings.push(format!(
            "Extra payment reduced from {} to {} (income left after minimum payments)",
            input.extra_payment.round_dp(2),
            extra.round_dp(2)
        ));
    }
    if debts.is_empty() {
        warnings.push("No debts supplied; nothing to pay off".into());
    }
    for debt in &debts {
        let interest = monthly_interest(debt.principal, debt.rate);
        if debt.principal > Decimal::ZERO && debt.min_payment <= interest {
            warnings.push(format!(
                "{}: minimum payment {} does not cover monthly interest {}",
                debt.name,
                debt.min_payment.round_dp(2),
                interest.round_dp(2)
            ));
        }
    }

    Ok(Prepared {
        debts,
        extra,
        capped,
    })
}

fn horizon_label(month_cap: u32) -> String {
    if month_cap % 12 == 0 {
        format!("{} years", month_cap / 12)
    } else {
        format!("{month_cap} months")
    }
}

fn non_convergence_warning(label: &str, result: &PayoffResult, month_cap: u32) -> Option<String> {
    if result.converged {
        return None;
    }
    Some(format!(
        "{label} cannot pay off your debt within {} ({} still owed)",
        horizon_label(month_cap),
        result.remaining_balance.round_dp(2)
    ))
}

// ---------------------------------------------------------------------------
// Core functions
// ---------------------------------------------------------------------------

/// Validate the input, then run the engine once.
pub fn run_simulation(input: &SimulationInput) -> PayoffEngineResult<ComputationOutput<PayoffResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_config(&input.config)?;
    validate_extra("extra_payment", input.extra_payment)?;
    let debts = resolve_debts(&input.debts)?;

    let result = simulate(
        &debts,
        input.extra_payment,
        input.strategy,
        &input.config,
        input.start_date,
    );
    warnings.extend(non_convergence_warning(
        "This payment plan",
        &result,
        input.config.month_cap,
    ));

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Monthly amortization simulation (interest, minimums, then strategy-ordered extra)",
        &serde_json::json!({
            "strategy": input.strategy.label(),
            "extra_payment": input.extra_payment.to_string(),
            "month_cap": input.config.month_cap,
            "epsilon": input.config.epsilon.to_string(),
            "start_date": input.start_date.to_string(),
        }),
        warnings,
        elapsed,
        result,
    ))
}

/// Build a payoff plan: a minimum-only baseline against the chosen strategy
/// with the (possibly income-capped) extra payment.
pub fn plan_payoff(input: &PayoffPlanInput) -> PayoffEngineResult<ComputationOutput<PayoffPlan>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    let prepared = prepare(input, &mut warnings)?;
    let debts = &prepared.debts;
    let config = &input.config;

    let baseline = simulate(debts, Decimal::ZERO, input.strategy, config, input.start_date);
    let accelerated = simulate(debts, prepared.extra, input.strategy, config, input.start_date);

    warnings.extend(non_convergence_warning(
        "Minimum payments alone",
        &baseline,
        config.month_cap,
    ));
    if prepared.extra > Decimal::ZERO {
        warnings.extend(non_convergence_warning(
            "This payment plan",
            &accelerated,
            config.month_cap,
        ));
    }

    let order = priority_order(debts, input.strategy);
    let focus = order.first().map(|&i| {
        let d = &debts[i];
        FocusDebt {
            debt_id: d.id.clone(),
            debt_name: d.name.clone(),
            min_payment: d.min_payment,
            recommended_payment: d.min_payment + prepared.extra,
        }
    });
    let payoff_order = order
        .iter()
        .enumerate()
        .map(|(rank, &i)| {
            let d = &debts[i];
            PayoffOrderEntry {
                position: rank + 1,
                debt_id: d.id.clone(),
                debt_name: d.name.clone(),
                balance: d.principal,
                rate: d.rate,
                min_payment: d.min_payment,
                payoff_month: accelerated.milestone_for(&d.id).map(|m| m.month),
                months_at_minimum: amortization_months(d.principal, d.rate, d.min_payment).ok(),
            }
        })
        .collect();

    let interest_saved = (baseline.total_interest - accelerated.total_interest).round_dp(2);
    let months_saved = i64::from(baseline.months) - i64::from(accelerated.months);

    let output = PayoffPlan {
        strategy: input.strategy,
        budget: SimulationBudget::from_debts(debts, prepared.extra),
        requested_extra: input.extra_payment,
        extra_capped: prepared.capped,
        baseline,
        accelerated,
        interest_saved,
        months_saved,
        focus,
        payoff_order,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Monthly amortization simulation (minimum-only baseline vs strategy with extra payment)",
        &serde_json::json!({
            "strategy": input.strategy.label(),
            "extra_payment": prepared.extra.to_string(),
            "month_cap": config.month_cap,
            "epsilon": config.epsilon.to_string(),
            "start_date": input.start_date.to_string(),
            "interest": "balance * apr / 100 / 12, charged before payments",
        }),
        warnings,
        elapsed,
        output,
    ))
}

/// Rank two runs: fully repaid first, then less left owing, less interest,
/// fewer months. Equal runs prefer avalanche.
fn better_strategy(avalanche: &PayoffResult, snowball: &PayoffResult) -> Strategy {
    let key = |r: &PayoffResult| (!r.converged, r.remaining_balance, r.total_interest, r.months);
    if key(snowball) < key(avalanche) {
        Strategy::Snowball
    } else {
        Strategy::Avalanche
    }
}

/// Run avalanche and snowball side by side against the minimum-only baseline.
/// The `strategy` field of the input is ignored.
pub fn compare_strategies(
    input: &PayoffPlanInput,
) -> PayoffEngineResult<ComputationOutput<StrategyComparison>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    let prepared = prepare(input, &mut warnings)?;
    let debts = &prepared.debts;
    let config = &input.config;

    let baseline = simulate(debts, Decimal::ZERO, Strategy::Avalanche, config, input.start_date);
    let avalanche = simulate(debts, prepared.extra, Strategy::Avalanche, config, input.start_date);
    let snowball = simulate(debts, prepared.extra, Strategy::Snowball, config, input.start_date);

    warnings.extend(non_convergence_warning("Avalanche", &avalanche, config.month_cap));
    warnings.extend(non_convergence_warning("Snowball", &snowball, config.month_cap));

    let recommended = better_strategy(&avalanche, &snowball);
    let interest_difference = (snowball.total_interest - avalanche.total_interest).round_dp(2);
    let months_difference = i64::from(snowball.months) - i64::from(avalanche.months);

    let output = StrategyComparison {
        budget: SimulationBudget::from_debts(debts, prepared.extra),
        baseline,
        avalanche,
        snowball,
        recommended,
        interest_difference,
        months_difference,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Avalanche vs snowball amortization comparison",
        &serde_json::json!({
            "extra_payment": prepared.extra.to_string(),
            "month_cap": config.month_cap,
            "start_date": input.start_date.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

/// Months and interest across a range of extra payments.
pub fn extra_payment_sweep(input: &SweepInput) -> PayoffEngineResult<ComputationOutput<SweepOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_config(&input.config)?;
    validate_extra("from", input.from)?;
    validate_extra("to", input.to)?;
    if input.to < input.from {
        return Err(PayoffError::invalid("to", "to must be >= from"));
    }
    if input.step <= Decimal::ZERO {
        return Err(PayoffError::invalid("step", "step must be > 0"));
    }
    let too_many_rows = || {
        PayoffError::invalid(
            "step",
            format!("sweep would produce more than {MAX_SWEEP_ROWS} rows"),
        )
    };
    let rows_needed = (input.to - input.from)
        .checked_div(input.step)
        .ok_or_else(too_many_rows)?
        .floor();
    if rows_needed >= Decimal::from(MAX_SWEEP_ROWS) {
        return Err(too_many_rows());
    }
    let debts = resolve_debts(&input.debts)?;
    if debts.is_empty() {
        return Err(PayoffError::InsufficientData(
            "extra payment sweep requires at least one debt".into(),
        ));
    }

    let config = &input.config;
    let baseline = simulate(&debts, Decimal::ZERO, input.strategy, config, input.start_date);
    warnings.extend(non_convergence_warning(
        "Minimum payments alone",
        &baseline,
        config.month_cap,
    ));

    let mut rows = Vec::new();
    let mut extra = input.from;
    while extra <= input.to {
        let run = simulate(&debts, extra, input.strategy, config, input.start_date);
        rows.push(SweepRow {
            extra_payment: extra,
            months: run.months,
            total_interest: run.total_interest.round_dp(2),
            interest_saved: (baseline.total_interest - run.total_interest).round_dp(2),
            payoff_date: run.payoff_date,
            converged: run.converged,
        });
        extra += input.step;
    }

    if let Some(first_ok) = rows.iter().find(|r| r.converged) {
        if first_ok.extra_payment > input.from {
            warnings.push(format!(
                "Debt is repaid within {} only from an extra payment of {}",
                horizon_label(config.month_cap),
                first_ok.extra_payment.round_dp(2)
            ));
        }
    } else {
        warnings.push(format!(
            "No extra payment in the range repays the debt within {}",
            horizon_label(config.month_cap)
        ));
    }

    let output = SweepOutput {
        strategy: input.strategy,
        baseline_months: baseline.months,
        baseline_interest: baseline.total_interest.round_dp(2),
        rows,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Extra payment sweep over the monthly amortization simulation",
        &serde_json::json!({
            "strategy": input.strategy.label(),
            "from": input.from.to_string(),
            "to": input.to.to_string(),
            "step": input.step.to_string(),
            "month_cap": config.month_cap,
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
