use chrono::{Months, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::PayoffError;
use crate::types::{AprPercent, Money};
use crate::PayoffEngineResult;

const MONTHS_PER_YEAR: Decimal = dec!(12);
const PERCENT: Decimal = dec!(100);

/// One month of interest on `balance` at a nominal annual percentage rate.
///
/// Computed as `balance * (apr / 100) / 12`, with no intermediate rounding.
pub fn monthly_interest(balance: Money, apr: AprPercent) -> Money {
    balance * (apr / PERCENT) / MONTHS_PER_YEAR
}

/// Checked variant of [`monthly_interest`]; `None` when the result leaves
/// the representable decimal range.
pub fn checked_monthly_interest(balance: Money, apr: AprPercent) -> Option<Money> {
    balance
        .checked_mul(apr / PERCENT)?
        .checked_div(MONTHS_PER_YEAR)
}

/// Periodic (monthly) rate as a decimal fraction: 18.99 -> 0.015825
pub fn monthly_rate(apr: AprPercent) -> Decimal {
    apr / PERCENT / MONTHS_PER_YEAR
}

/// Calendar date `months` after `start`, clamped to the end of shorter months
/// (Jan 31 + 1 month = Feb 28/29). Saturates at `NaiveDate::MAX`.
pub fn add_months(start: NaiveDate, months: u32) -> NaiveDate {
    start
        .checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}

/// Closed-form number of whole months needed to retire a single balance with
/// a level monthly payment (NPER):
///
/// n = -ln(1 - r*P/A) / ln(1 + r)
///
/// rounded up to the next whole month.
pub fn amortization_months(
    principal: Money,
    apr: AprPercent,
    payment: Money,
) -> PayoffEngineResult<u32> {
    if principal <= Decimal::ZERO {
        return Ok(0);
    }
    if payment <= Decimal::ZERO {
        return Err(PayoffError::FinancialImpossibility(
            "a balance with no payment is never repaid".into(),
        ));
    }

    let r = monthly_rate(apr);
    let months = if r.is_zero() {
        (principal / payment).ceil()
    } else {
        let interest = principal * r;
        if payment <= interest {
            return Err(PayoffError::FinancialImpossibility(format!(
                "payment {} does not cover monthly interest {}",
                payment.round_dp(2),
                interest.round_dp(2)
            )));
        }
        let inner = Decimal::ONE - interest / payment;
        let numerator = inner.checked_ln().ok_or_else(|| {
            PayoffError::FinancialImpossibility("amortization log term undefined".into())
        })?;
        let denominator = (Decimal::ONE + r).ln();
        (-numerator / denominator).ceil()
    };

    months.to_u32().ok_or_else(|| PayoffError::InvalidInput {
        field: "principal".into(),
        reason: "payoff horizon exceeds representable months".into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_monthly_interest_basic() {
        // 1200 at 12% APR -> 1% per month -> 12
        assert_eq!(monthly_interest(dec!(1200), dec!(12)), dec!(12));
    }

    #[test]
    fn test_monthly_rate() {
        assert_eq!(monthly_rate(dec!(18)), dec!(0.015));
    }

    #[test]
    fn test_add_months_clamps_month_end() {
        let jan31 = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(
            add_months(jan31, 1),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert_eq!(
            add_months(jan31, 13),
            NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()
        );
        assert_eq!(add_months(jan31, 0), jan31);
    }

    #[test]
    fn test_add_months_saturates_past_max_date() {
        let late = NaiveDate::MAX - chrono::Days::new(40);
        assert_eq!(add_months(late, 1200), NaiveDate::MAX);
    }

    #[test]
    fn test_amortization_months_single_card() {
        // 5000 at 18.99% paying 350/month: n ≈ 16.3 -> 17 months
        let n = amortization_months(dec!(5000), dec!(18.99), dec!(350)).unwrap();
        assert_eq!(n, 17);
    }

    #[test]
    fn test_amortization_months_zero_rate() {
        let n = amortization_months(dec!(1000), dec!(0), dec!(300)).unwrap();
        assert_eq!(n, 4);
    }

    #[test]
    fn test_amortization_months_payment_below_interest() {
        // 10_000 at 24% accrues 200/month; 150 never catches up
        let err = amortization_months(dec!(10000), dec!(24), dec!(150)).unwrap_err();
        assert!(matches!(err, PayoffError::FinancialImpossibility(_)));
    }

    #[test]
    fn test_amortization_months_zero_balance() {
        assert_eq!(amortization_months(dec!(0), dec!(20), dec!(0)).unwrap(), 0);
    }
}
