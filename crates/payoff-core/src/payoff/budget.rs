use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::PayoffError;
use crate::types::{with_metadata, ComputationOutput, Debt, DebtEntry, Money};
use crate::PayoffEngineResult;

/// Share of disposable income suggested as a safe extra payment.
pub const SAFE_EXTRA_SHARE: Decimal = dec!(0.20);

/// Minimum payment assumed for a debt entered without one: 2% of balance.
pub const DEFAULT_MIN_PAYMENT_SHARE: Decimal = dec!(0.02);

/// Largest balance, payment, or income accepted at the boundary (one
/// quadrillion). Sums over any realistic number of debts stay well inside the
/// decimal range.
pub const MAX_AMOUNT: Money = dec!(1_000_000_000_000_000);

/// Monthly money available to the engine. Derived, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationBudget {
    pub total_min_payment: Money,
    pub extra_payment: Money,
    pub total_budget: Money,
}

impl SimulationBudget {
    pub fn from_debts(debts: &[Debt], extra_payment: Money) -> Self {
        let total_min_payment = total_min_payment(debts);
        SimulationBudget {
            total_min_payment,
            extra_payment,
            total_budget: saturating_add(total_min_payment, extra_payment),
        }
    }
}

/// `a + b`, pinned to the decimal range instead of overflowing.
pub fn saturating_add(a: Money, b: Money) -> Money {
    a.checked_add(b).unwrap_or(if b.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    })
}

pub fn saturating_sum(values: impl IntoIterator<Item = Money>) -> Money {
    values.into_iter().fold(Decimal::ZERO, saturating_add)
}

pub fn total_min_payment(debts: &[Debt]) -> Money {
    saturating_sum(debts.iter().map(|d| d.min_payment))
}

/// Reject negative amounts and amounts above [`MAX_AMOUNT`].
pub fn validate_amount(field: &str, value: Money) -> PayoffEngineResult<()> {
    if value < Decimal::ZERO {
        return Err(PayoffError::invalid(field, format!("{field} must be >= 0")));
    }
    if value > MAX_AMOUNT {
        return Err(PayoffError::invalid(
            field,
            format!("{field} must be <= {MAX_AMOUNT}"),
        ));
    }
    Ok(())
}

/// Income left after every minimum payment, floored at zero.
pub fn disposable_income(monthly_income: Money, debts: &[Debt]) -> Money {
    (monthly_income - total_min_payment(debts)).max(Decimal::ZERO)
}

/// Cap a requested extra payment at disposable income.
///
/// Returns the usable extra and whether the request was reduced.
pub fn cap_extra_to_disposable(
    extra_payment: Money,
    monthly_income: Money,
    debts: &[Debt],
) -> (Money, bool) {
    let ceiling = disposable_income(monthly_income, debts);
    if extra_payment > ceiling {
        (ceiling, true)
    } else {
        (extra_payment, false)
    }
}

/// `ceil(principal * 2%)`, used when a debt arrives without a minimum.
pub fn default_min_payment(principal: Money) -> Money {
    (principal * DEFAULT_MIN_PAYMENT_SHARE).ceil()
}

// ---------------------------------------------------------------------------
// Safe extra-payment suggestion
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionInput {
    pub monthly_income: Money,
    pub debts: Vec<DebtEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtraSuggestion {
    pub monthly_income: Money,
    pub total_min_payment: Money,
    pub disposable_income: Money,
    /// Whole currency units, rounded down.
    pub suggested_extra: Money,
}

/// Suggest an extra payment the user can sustain: a fifth of what remains
/// after minimums, rounded down to whole units and never negative.
pub fn suggest_safe_extra(
    input: &SuggestionInput,
) -> PayoffEngineResult<ComputationOutput<ExtraSuggestion>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_amount("monthly_income", input.monthly_income)?;
    let debts = DebtEntry::resolve_all(&input.debts);
    for (i, debt) in debts.iter().enumerate() {
        validate_amount(&format!("debts[{i}].min_payment"), debt.min_payment)?;
    }
    let total_min = total_min_payment(&debts);
    let disposable = disposable_income(input.monthly_income, &debts);
    let suggested = ((input.monthly_income - total_min) * SAFE_EXTRA_SHARE)
        .floor()
        .max(Decimal::ZERO);

    if input.monthly_income < total_min {
        warnings.push(format!(
            "Minimum payments ({}) exceed monthly income ({})",
            total_min.round_dp(2),
            input.monthly_income.round_dp(2)
        ));
    }

    let output = ExtraSuggestion {
        monthly_income: input.monthly_income,
        total_min_payment: total_min,
        disposable_income: disposable,
        suggested_extra: suggested,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Safe extra payment (20% of income after minimum payments)",
        &serde_json::json!({
            "share_of_disposable": SAFE_EXTRA_SHARE.to_string(),
            "debt_count": debts.len(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn debts() -> Vec<Debt> {
        vec![
            Debt::new("a", "Card", dec!(2000), dec!(24), dec!(60)),
            Debt::new("b", "Loan", dec!(10000), dec!(5), dec!(120)),
        ]
    }

    fn entries() -> Vec<DebtEntry> {
        debts().into_iter().map(DebtEntry::from).collect()
    }

    #[test]
    fn test_budget_from_debts() {
        let budget = SimulationBudget::from_debts(&debts(), dec!(100));
        assert_eq!(budget.total_min_payment, dec!(180));
        assert_eq!(budget.total_budget, dec!(280));
    }

    #[test]
    fn test_cap_extra_to_disposable() {
        // 500 income - 180 minimums = 320 disposable
        assert_eq!(
            cap_extra_to_disposable(dec!(400), dec!(500), &debts()),
            (dec!(320), true)
        );
        assert_eq!(
            cap_extra_to_disposable(dec!(100), dec!(500), &debts()),
            (dec!(100), false)
        );
    }

    #[test]
    fn test_default_min_payment_rounds_up() {
        assert_eq!(default_min_payment(dec!(1234)), dec!(25));
        assert_eq!(default_min_payment(dec!(1000)), dec!(20));
    }

    #[test]
    fn test_suggest_safe_extra() {
        let input = SuggestionInput {
            monthly_income: dec!(4000),
            debts: entries(),
        };
        let out = suggest_safe_extra(&input).unwrap();
        // (4000 - 180) * 0.2 = 764
        assert_eq!(out.result.suggested_extra, dec!(764));
        assert_eq!(out.result.disposable_income, dec!(3820));
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_suggest_safe_extra_underwater_income() {
        let input = SuggestionInput {
            monthly_income: dec!(100),
            debts: entries(),
        };
        let out = suggest_safe_extra(&input).unwrap();
        assert_eq!(out.result.suggested_extra, Decimal::ZERO);
        assert_eq!(out.result.disposable_income, Decimal::ZERO);
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_suggest_safe_extra_rejects_negative_income() {
        let input = SuggestionInput {
            monthly_income: dec!(-1),
            debts: entries(),
        };
        assert!(suggest_safe_extra(&input).is_err());
    }

    #[test]
    fn test_total_min_payment_saturates() {
        let huge = vec![
            Debt::new("a", "A", dec!(100), dec!(0), dec!(50000000000000000000000000000)),
            Debt::new("b", "B", dec!(100), dec!(0), dec!(50000000000000000000000000000)),
        ];
        assert_eq!(total_min_payment(&huge), Decimal::MAX);
        assert_eq!(
            SimulationBudget::from_debts(&huge, dec!(10)).total_budget,
            Decimal::MAX
        );
    }

    #[test]
    fn test_validate_amount_bounds() {
        assert!(validate_amount("extra_payment", dec!(0)).is_ok());
        assert!(validate_amount("extra_payment", MAX_AMOUNT).is_ok());
        let err = validate_amount("extra_payment", MAX_AMOUNT + dec!(1)).unwrap_err();
        assert!(matches!(err, PayoffError::InvalidInput { ref field, .. } if field == "extra_payment"));
        assert!(validate_amount("extra_payment", dec!(-0.01)).is_err());
    }

    #[test]
    fn test_suggest_safe_extra_rejects_unbounded_minimums() {
        let input = SuggestionInput {
            monthly_income: dec!(4000),
            debts: vec![
                Debt::new("a", "A", dec!(100), dec!(0), dec!(50000000000000000000000000000)).into(),
                Debt::new("b", "B", dec!(100), dec!(0), dec!(50000000000000000000000000000)).into(),
            ],
        };
        assert!(suggest_safe_extra(&input).is_err());
    }
}
