use chrono::NaiveDate;
use log::{debug, warn};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::budget::{saturating_add, total_min_payment};
use super::strategy::{comparator, Prioritized};
use crate::time_value::{add_months, checked_monthly_interest};
use crate::types::{Debt, Money, Strategy};

/// 50 years of monthly steps.
pub const DEFAULT_MONTH_CAP: u32 = 600;

/// One cent. Balances at or below this are treated as repaid.
pub const DEFAULT_EPSILON: Money = dec!(0.01);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Engine tunables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Hard upper bound on simulated months; guarantees termination.
    pub month_cap: u32,
    /// Residual balance treated as zero.
    pub epsilon: Money,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            month_cap: DEFAULT_MONTH_CAP,
            epsilon: DEFAULT_EPSILON,
        }
    }
}

/// The month a debt's balance first reached zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub debt_id: String,
    pub debt_name: String,
    pub month: u32,
    pub date: NaiveDate,
}

/// Aggregate balance after all of a month's interest and payments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    pub month: u32,
    pub total_balance: Money,
}

/// Output of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoffResult {
    pub strategy: Strategy,
    pub extra_payment: Money,
    pub months: u32,
    pub total_interest: Money,
    pub total_paid: Money,
    pub payoff_date: NaiveDate,
    /// Balance still owed when the run stopped. Zero when `converged`.
    pub remaining_balance: Money,
    /// False when the month cap was reached with balances outstanding.
    pub converged: bool,
    pub milestones: Vec<Milestone>,
    pub monthly_data: Vec<TrajectoryPoint>,
}

impl PayoffResult {
    fn identity(strategy: Strategy, extra_payment: Money, start: NaiveDate) -> Self {
        PayoffResult {
            strategy,
            extra_payment,
            months: 0,
            total_interest: Decimal::ZERO,
            total_paid: Decimal::ZERO,
            payoff_date: start,
            remaining_balance: Decimal::ZERO,
            converged: true,
            milestones: Vec::new(),
            monthly_data: Vec::new(),
        }
    }

    /// Month a given debt was cleared, if it was.
    pub fn milestone_for(&self, debt_id: &str) -> Option<&Milestone> {
        self.milestones.iter().find(|m| m.debt_id == debt_id)
    }
}

// ---------------------------------------------------------------------------
// Working state
// ---------------------------------------------------------------------------

/// Private, mutable copy of a caller's debt.
#[derive(Debug, Clone)]
struct Account<'a> {
    position: usize,
    source: &'a Debt,
    balance: Money,
    cleared: bool,
}

impl Account<'_> {
    fn is_active(&self) -> bool {
        self.balance > Decimal::ZERO
    }

    /// Pay up to `amount` and return what was actually applied.
    fn pay(&mut self, amount: Money) -> Money {
        let applied = amount.min(self.balance).max(Decimal::ZERO);
        self.balance -= applied;
        applied
    }
}

impl Prioritized for Account<'_> {
    fn rate(&self) -> Decimal {
        self.source.rate
    }

    fn balance(&self) -> Decimal {
        self.balance
    }

    fn position(&self) -> usize {
        self.position
    }
}

struct Ledger<'a> {
    accounts: Vec<Account<'a>>,
    milestones: Vec<Milestone>,
    epsilon: Money,
    start: NaiveDate,
}

impl Ledger<'_> {
    fn outstanding(&self) -> Money {
        self.accounts
            .iter()
            .map(|a| a.balance.max(Decimal::ZERO))
            .fold(Decimal::ZERO, |acc, b| acc.checked_add(b).unwrap_or(Decimal::MAX))
    }

    fn any_above_epsilon(&self) -> bool {
        self.accounts.iter().any(|a| a.balance > self.epsilon)
    }

    /// Snap a near-zero balance to exactly zero and record its first payoff.
    fn settle(&mut self, idx: usize, month: u32) {
        let account = &mut self.accounts[idx];
        if account.balance > self.epsilon {
            return;
        }
        account.balance = Decimal::ZERO;
        if !account.cleared {
            account.cleared = true;
            self.milestones.push(Milestone {
                debt_id: account.source.id.clone(),
                debt_name: account.source.name.clone(),
                month,
                date: add_months(self.start, month),
            });
        }
    }
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Simulate month-by-month repayment of `debts`.
///
/// Each month, in order:
/// 1. interest accrues on every open balance (`balance * apr / 100 / 12`),
/// 2. every open debt receives `min(min_payment, balance)`,
/// 3. whatever is left of `Σ min_payment + extra_payment` goes to open debts
///    in `strategy` order until it runs out.
///
/// Minimums freed up by cleared debts stay in the monthly budget, so they
/// roll over to the priority debt. The loop stops when every balance is at
/// or below `config.epsilon` or after `config.month_cap` months; the latter
/// is reported through `converged = false`, not as an error.
///
/// Inputs are assumed validated (see `plan::validate_debts`). Interest that
/// outgrows the decimal range ends the run as non-converged at the cap;
/// budget and paid totals saturate at the range limit.
pub fn simulate(
    debts: &[Debt],
    extra_payment: Money,
    strategy: Strategy,
    config: &SimulationConfig,
    start: NaiveDate,
) -> PayoffResult {
    if debts.is_empty() {
        return PayoffResult::identity(strategy, extra_payment, start);
    }

    let order = comparator::<Account>(strategy);
    let monthly_budget = saturating_add(total_min_payment(debts), extra_payment);

    let mut ledger = Ledger {
        accounts: debts
            .iter()
            .enumerate()
            .map(|(position, source)| Account {
                position,
                source,
                balance: source.principal,
                cleared: false,
            })
            .collect(),
        milestones: Vec::new(),
        epsilon: config.epsilon,
        start,
    };

    // Balances that start at (or below) a cent are already repaid.
    for idx in 0..ledger.accounts.len() {
        ledger.settle(idx, 0);
    }

    let mut monthly_data = vec![TrajectoryPoint {
        month: 0,
        total_balance: ledger.outstanding(),
    }];
    let mut total_interest = Decimal::ZERO;
    let mut total_paid = Decimal::ZERO;
    let mut months: u32 = 0;
    let mut diverged = false;

    while ledger.any_above_epsilon() && months < config.month_cap {
        let month = months + 1;

        // 1. Accrue interest on the post-previous-month balance
        for account in ledger.accounts.iter_mut().filter(|a| a.is_active()) {
            let accrued = checked_monthly_interest(account.balance, account.source.rate)
                .and_then(|interest| {
                    let balance = account.balance.checked_add(interest)?;
                    let total = total_interest.checked_add(interest)?;
                    Some((balance, total))
                });
            match accrued {
                Some((balance, total)) => {
                    account.balance = balance;
                    total_interest = total;
                }
                None => {
                    diverged = true;
                    break;
                }
            }
        }
        if diverged {
            break;
        }

        // 2. Minimum payments
        let mut month_budget = monthly_budget;
        for idx in 0..ledger.accounts.len() {
            let account = &mut ledger.accounts[idx];
            if !account.is_active() {
                continue;
            }
            let minimum = account.source.min_payment;
            let paid = account.pay(minimum);
            month_budget -= paid;
            total_paid = saturating_add(total_paid, paid);
            ledger.settle(idx, month);
        }

        // 3. Leftover budget to the priority debts
        let mut active: Vec<usize> = (0..ledger.accounts.len())
            .filter(|&i| ledger.accounts[i].is_active())
            .collect();
        active.sort_by(|&a, &b| order(&ledger.accounts[a], &ledger.accounts[b]));
        for idx in active {
            if month_budget <= Decimal::ZERO {
                break;
            }
            let paid = ledger.accounts[idx].pay(month_budget);
            month_budget -= paid;
            total_paid = saturating_add(total_paid, paid);
            ledger.settle(idx, month);
        }

        months = month;
        monthly_data.push(TrajectoryPoint {
            month,
            total_balance: ledger.outstanding(),
        });
    }

    let converged = !diverged && !ledger.any_above_epsilon();
    if diverged {
        warn!(
            "balances outgrew decimal range after {months} months; reporting non-convergence at the {} month cap",
            config.month_cap
        );
        months = config.month_cap;
    } else if !converged {
        warn!(
            "{} strategy did not clear all debts within {} months",
            strategy, config.month_cap
        );
    }

    debug!(
        "simulated {} debts ({strategy}, extra {extra_payment}): {months} months, interest {}",
        debts.len(),
        total_interest.round_dp(2)
    );

    PayoffResult {
        strategy,
        extra_payment,
        months,
        total_interest,
        total_paid,
        payoff_date: add_months(start, months),
        remaining_balance: ledger.outstanding(),
        converged,
        milestones: ledger.milestones,
        monthly_data,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
