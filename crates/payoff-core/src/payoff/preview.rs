use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::budget::{saturating_add, saturating_sum, total_min_payment, validate_amount};
use crate::error::PayoffError;
use crate::time_value::monthly_rate;
use crate::types::{with_metadata, ComputationOutput, Debt, DebtEntry, Money};
use crate::PayoffEngineResult;

pub const DEFAULT_PREVIEW_HORIZON: u32 = 48;
const MAX_PREVIEW_HORIZON: u32 = 1200;

fn default_horizon() -> u32 {
    DEFAULT_PREVIEW_HORIZON
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewInput {
    pub debts: Vec<DebtEntry>,
    #[serde(default)]
    pub extra_payment: Money,
    #[serde(default = "default_horizon")]
    pub horizon_months: u32,
}

/// One chart point. Balances are whole currency units for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewPoint {
    pub month: u32,
    pub balance_minimum: Money,
    pub balance_strategy: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewOutput {
    /// Principal-weighted average of the debts' monthly rates.
    pub blended_monthly_rate: Decimal,
    pub total_principal: Money,
    pub total_min_payment: Money,
    pub points: Vec<PreviewPoint>,
}

fn display_units(balance: Money) -> Money {
    balance
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .max(Decimal::ZERO)
}

/// One pooled month: interest at `rate`, then `payment`. Saturates instead
/// of overflowing when the balance runs away.
fn advance(balance: Money, rate: Decimal, payment: Money) -> Money {
    if balance <= Decimal::ZERO {
        return balance;
    }
    balance
        .checked_mul(rate)
        .and_then(|interest| balance.checked_add(interest))
        .map(|grown| grown - payment)
        .unwrap_or(Decimal::MAX)
}

/// Cheap chart preview: every debt pooled into one balance that accrues a
/// blended rate and is paid down by a fixed amount each month.
///
/// Ignores per-debt ordering and minimum-payment rollover, so it drifts from
/// [`super::engine::simulate`]; use it only to draw a quick two-line chart.
pub fn linear_preview(input: &PreviewInput) -> PayoffEngineResult<ComputationOutput<PreviewOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_amount("extra_payment", input.extra_payment)?;
    if input.horizon_months == 0 || input.horizon_months > MAX_PREVIEW_HORIZON {
        return Err(PayoffError::invalid(
            "horizon_months",
            format!("horizon_months must be between 1 and {MAX_PREVIEW_HORIZON}"),
        ));
    }
    let debts: Vec<Debt> = DebtEntry::resolve_all(&input.debts);
    for (i, d) in debts.iter().enumerate() {
        validate_amount(&format!("debts[{i}].principal"), d.principal)?;
        validate_amount(&format!("debts[{i}].min_payment"), d.min_payment)?;
        if d.rate < Decimal::ZERO {
            return Err(PayoffError::invalid(
                format!("debts[{i}].rate"),
                "rate must be >= 0",
            ));
        }
    }

    let total_principal: Money = saturating_sum(debts.iter().map(|d| d.principal));
    let min_payments = total_min_payment(&debts);
    let blended = if total_principal > Decimal::ZERO {
        let weighted = debts.iter().try_fold(Decimal::ZERO, |acc, d| {
            monthly_rate(d.rate)
                .checked_mul(d.principal)
                .and_then(|w| acc.checked_add(w))
        });
        weighted.ok_or_else(|| {
            PayoffError::invalid("debts", "rate too large to blend into a monthly rate")
        })? / total_principal
    } else {
        Decimal::ZERO
    };

    let strategy_payment = saturating_add(min_payments, input.extra_payment);
    let mut balance_min = total_principal;
    let mut balance_strat = total_principal;
    let mut points = Vec::with_capacity(input.horizon_months as usize + 1);

    for month in 0..=input.horizon_months {
        points.push(PreviewPoint {
            month,
            balance_minimum: display_units(balance_min),
            balance_strategy: display_units(balance_strat),
        });
        balance_min = advance(balance_min, blended, min_payments);
        balance_strat = advance(balance_strat, blended, strategy_payment);
    }

    let blended_interest = total_principal.checked_mul(blended).unwrap_or(Decimal::MAX);
    if total_principal > Decimal::ZERO && min_payments <= blended_interest {
        warnings.push("Minimum payments do not cover the blended monthly interest".into());
    }

    let output = PreviewOutput {
        blended_monthly_rate: blended,
        total_principal,
        total_min_payment: min_payments,
        points,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Approximate pooled-balance preview (blended rate, fixed horizon); not a payoff projection",
        &serde_json::json!({
            "horizon_months": input.horizon_months,
            "extra_payment": input.extra_payment.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}
