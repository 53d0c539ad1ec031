use payoff_core::payoff::plan::{self, PayoffPlanInput};
use payoff_core::{PayoffError, Strategy};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Client-shaped JSON through the planning layer
// ===========================================================================

fn client_payload() -> serde_json::Value {
    serde_json::json!({
        "debts": [
            { "id": "d1", "name": "Chase Card", "principal": 5000, "rate": "18.99", "minPayment": 150 },
        ],
        "extra_payment": 200,
        "strategy": "avalanche",
        "start_date": "2025-01-15"
    })
}

#[test]
fn test_plan_from_client_json() {
    let input: PayoffPlanInput = serde_json::from_value(client_payload()).unwrap();
    assert_eq!(input.config.month_cap, 600);
    assert_eq!(input.config.epsilon, dec!(0.01));

    let out = plan::plan_payoff(&input).unwrap();
    let p = &out.result;

    assert_eq!(p.strategy, Strategy::Avalanche);
    assert_eq!(p.accelerated.months, 17);
    assert_eq!(p.baseline.months, 48);
    assert_eq!(p.months_saved, 31);
    // 2162.63 - 713.36
    assert_eq!(p.interest_saved, dec!(1449.27));
    assert!(out.warnings.is_empty());
    assert_eq!(out.metadata.precision, "rust_decimal_128bit");
}

#[test]
fn test_plan_output_serializes_dates_as_iso() {
    let input: PayoffPlanInput = serde_json::from_value(client_payload()).unwrap();
    let out = plan::plan_payoff(&input).unwrap();
    let json = serde_json::to_value(&out).unwrap();
    assert_eq!(json["result"]["accelerated"]["payoff_date"], "2026-06-15");
    assert_eq!(
        json["result"]["accelerated"]["milestones"][0]["debt_name"],
        "Chase Card"
    );
}

#[test]
fn test_missing_start_date_is_rejected_by_deserializer() {
    let mut payload = client_payload();
    payload.as_object_mut().unwrap().remove("start_date");
    assert!(serde_json::from_value::<PayoffPlanInput>(payload).is_err());
}

#[test]
fn test_negative_rate_is_an_input_error() {
    let mut payload = client_payload();
    payload["debts"][0]["rate"] = serde_json::json!(-3);
    let input: PayoffPlanInput = serde_json::from_value(payload).unwrap();
    let err = plan::plan_payoff(&input).unwrap_err();
    assert!(matches!(err, PayoffError::InvalidInput { .. }));
    assert!(err.to_string().contains("rate"));
}

#[test]
fn test_comparison_on_single_debt_is_a_tie() {
    let input: PayoffPlanInput = serde_json::from_value(client_payload()).unwrap();
    let out = plan::compare_strategies(&input).unwrap();
    assert_eq!(out.result.interest_difference, Decimal::ZERO);
    assert_eq!(out.result.months_difference, 0);
    assert_eq!(out.result.recommended, Strategy::Avalanche);
}
