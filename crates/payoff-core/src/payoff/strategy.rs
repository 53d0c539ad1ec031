use std::cmp::Ordering;

use rust_decimal::Decimal;

use crate::types::{Debt, Strategy};

/// Anything the repayment policy can rank.
///
/// `position` is the debt's index in the caller's input and is the final
/// tie-break, so equal keys always keep input order.
pub trait Prioritized {
    fn rate(&self) -> Decimal;
    fn balance(&self) -> Decimal;
    fn position(&self) -> usize;
}

impl Prioritized for (usize, &Debt) {
    fn rate(&self) -> Decimal {
        self.1.rate
    }

    fn balance(&self) -> Decimal {
        self.1.principal
    }

    fn position(&self) -> usize {
        self.0
    }
}

/// Comparator selected once per simulation call.
pub type Comparator<T> = fn(&T, &T) -> Ordering;

fn highest_rate_first<T: Prioritized>(a: &T, b: &T) -> Ordering {
    b.rate()
        .cmp(&a.rate())
        .then_with(|| a.position().cmp(&b.position()))
}

fn lowest_balance_first<T: Prioritized>(a: &T, b: &T) -> Ordering {
    a.balance()
        .cmp(&b.balance())
        .then_with(|| a.position().cmp(&b.position()))
}

/// Map a strategy to its total, deterministic ordering.
pub fn comparator<T: Prioritized>(strategy: Strategy) -> Comparator<T> {
    match strategy {
        Strategy::Avalanche => highest_rate_first::<T>,
        Strategy::Snowball => lowest_balance_first::<T>,
    }
}

/// Indices of `debts` in the order the strategy would target them today,
/// skipping balances that are already cleared.
pub fn priority_order(debts: &[Debt], strategy: Strategy) -> Vec<usize> {
    let cmp = comparator::<(usize, &Debt)>(strategy);
    let mut ranked: Vec<(usize, &Debt)> = debts
        .iter()
        .enumerate()
        .filter(|(_, d)| d.principal > Decimal::ZERO)
        .collect();
    ranked.sort_by(cmp);
    ranked.into_iter().map(|(i, _)| i).collect()
}
