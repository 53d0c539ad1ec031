use chrono::NaiveDate;
use payoff_core::payoff::{simulate, PayoffResult, SimulationConfig};
use payoff_core::{Debt, Money, Strategy};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
}

fn run(debts: &[Debt], extra: Money, strategy: Strategy) -> PayoffResult {
    simulate(debts, extra, strategy, &SimulationConfig::default(), today())
}

fn card_and_loan() -> Vec<Debt> {
    vec![
        Debt::new("card-a", "Card A", dec!(2000), dec!(24), dec!(60)),
        Debt::new("loan-b", "Loan B", dec!(10000), dec!(5), dec!(120)),
    ]
}

fn mixed_portfolio() -> Vec<Debt> {
    vec![
        Debt::new("store", "Store", dec!(500), dec!(12), dec!(25)),
        Debt::new("card", "Card", dec!(4000), dec!(29.99), dec!(100)),
        Debt::new("auto", "Auto", dec!(8000), dec!(6), dec!(200)),
    ]
}

// ===========================================================================
// Identity and bounds
// ===========================================================================

#[test]
fn test_zero_debt_identity_for_any_inputs() {
    for strategy in [Strategy::Avalanche, Strategy::Snowball] {
        for extra in [dec!(0), dec!(50), dec!(10000)] {
            let result = run(&[], extra, strategy);
            assert_eq!(result.months, 0);
            assert_eq!(result.total_interest, Decimal::ZERO);
            assert_eq!(result.payoff_date, today());
        }
    }
}

#[test]
fn test_milestone_count_bounds() {
    let debts = mixed_portfolio();
    for extra in [dec!(0), dec!(75), dec!(400)] {
        let result = run(&debts, extra, Strategy::Snowball);
        assert!(result.milestones.len() <= debts.len());
        if result.months < 600 {
            assert_eq!(result.milestones.len(), debts.len());
            assert!(result.converged);
        }
    }
}

#[test]
fn test_capped_run_reports_fewer_milestones() {
    let mut debts = mixed_portfolio();
    // Minimum well below the ~100/month interest on the card
    debts[1].min_payment = dec!(20);
    let config = SimulationConfig {
        month_cap: 36,
        ..SimulationConfig::default()
    };
    let result = simulate(&debts, Decimal::ZERO, Strategy::Avalanche, &config, today());
    assert_eq!(result.months, 36);
    assert!(!result.converged);
    assert!(result.milestones.len() < debts.len());
}

// ===========================================================================
// Monotonicity
// ===========================================================================

#[test]
fn test_trajectory_non_increasing_when_payments_cover_interest() {
    for strategy in [Strategy::Avalanche, Strategy::Snowball] {
        let result = run(&mixed_portfolio(), dec!(150), strategy);
        for pair in result.monthly_data.windows(2) {
            assert!(
                pair[1].total_balance <= pair[0].total_balance,
                "{strategy}: month {} rose from {} to {}",
                pair[1].month,
                pair[0].total_balance,
                pair[1].total_balance,
            );
        }
    }
}

#[test]
fn test_more_extra_never_slower_or_costlier() {
    let debts = mixed_portfolio();
    for strategy in [Strategy::Avalanche, Strategy::Snowball] {
        let extras = [dec!(0), dec!(25), dec!(100), dec!(250), dec!(1000)];
        let runs: Vec<PayoffResult> = extras.iter().map(|&e| run(&debts, e, strategy)).collect();
        for pair in runs.windows(2) {
            assert!(pair[1].months <= pair[0].months);
            assert!(pair[1].total_interest <= pair[0].total_interest);
        }
    }
}

// ===========================================================================
// Strategy behaviour
// ===========================================================================

#[test]
fn test_single_debt_strategies_identical() {
    let debts = vec![Debt::new("only", "Only", dec!(7500), dec!(21.5), dec!(180))];
    for extra in [dec!(0), dec!(120)] {
        let avalanche = run(&debts, extra, Strategy::Avalanche);
        let snowball = run(&debts, extra, Strategy::Snowball);
        assert_eq!(avalanche.months, snowball.months);
        assert_eq!(avalanche.total_interest, snowball.total_interest);
        assert_eq!(avalanche.milestones, snowball.milestones);
        assert_eq!(avalanche.monthly_data, snowball.monthly_data);
    }
}

#[test]
fn test_deterministic_repeat_runs() {
    let debts = mixed_portfolio();
    let first = run(&debts, dec!(90), Strategy::Snowball);
    for _ in 0..5 {
        assert_eq!(run(&debts, dec!(90), Strategy::Snowball), first);
    }
}

#[test]
fn test_card_a_cleared_before_loan_b() {
    let debts = card_and_loan();
    let avalanche = run(&debts, dec!(100), Strategy::Avalanche);
    let snowball = run(&debts, dec!(100), Strategy::Snowball);

    let card = avalanche.milestone_for("card-a").unwrap();
    let loan = avalanche.milestone_for("loan-b").unwrap();
    assert!(card.month < loan.month);
    assert_eq!(card.month, 15);
    assert_eq!(loan.month, 49);
    assert_eq!(avalanche.months, 49);

    // Card A is both the highest rate and the smallest balance
    assert_eq!(snowball.milestones, avalanche.milestones);
    assert_eq!(snowball.total_interest, avalanche.total_interest);
}

#[test]
fn test_avalanche_cheaper_when_orders_disagree() {
    let debts = mixed_portfolio();
    let avalanche = run(&debts, dec!(150), Strategy::Avalanche);
    let snowball = run(&debts, dec!(150), Strategy::Snowball);

    assert_eq!(snowball.milestones[0].debt_id, "store");
    assert_eq!(snowball.milestones[0].month, 3);
    assert!(avalanche.total_interest < snowball.total_interest);
    // Regression baselines
    assert!((avalanche.total_interest - dec!(2016.66)).abs() < dec!(0.01));
    assert!((snowball.total_interest - dec!(2124.06)).abs() < dec!(0.01));
}

#[test]
fn test_equal_rates_keep_input_order() {
    let debts = vec![
        Debt::new("first", "First", dec!(1500), dec!(18), dec!(40)),
        Debt::new("second", "Second", dec!(1500), dec!(18), dec!(40)),
    ];
    for strategy in [Strategy::Avalanche, Strategy::Snowball] {
        let result = run(&debts, dec!(200), strategy);
        assert_eq!(result.milestones[0].debt_id, "first");
    }
}

// ===========================================================================
// Dates
// ===========================================================================

#[test]
fn test_payoff_date_is_start_plus_months() {
    let result = run(&card_and_loan(), dec!(100), Strategy::Avalanche);
    // 2025-06-01 + 49 months
    assert_eq!(
        result.payoff_date,
        NaiveDate::from_ymd_opt(2029, 7, 1).unwrap()
    );
    assert_eq!(
        result.milestone_for("card-a").unwrap().date,
        NaiveDate::from_ymd_opt(2026, 9, 1).unwrap()
    );
}
