use napi::Result as NapiResult;
use napi_derive::napi;

use payoff_core::payoff::{budget, plan, preview};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Amortization engine
// ---------------------------------------------------------------------------

#[napi]
pub fn simulate_payoff(input_json: String) -> NapiResult<String> {
    let input: plan::SimulationInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = plan::run_simulation(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Planning
// ---------------------------------------------------------------------------

#[napi]
pub fn plan_payoff(input_json: String) -> NapiResult<String> {
    let input: plan::PayoffPlanInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = plan::plan_payoff(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn compare_strategies(input_json: String) -> NapiResult<String> {
    let input: plan::PayoffPlanInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = plan::compare_strategies(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn extra_payment_sweep(input_json: String) -> NapiResult<String> {
    let input: plan::SweepInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = plan::extra_payment_sweep(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Budget helpers
// ---------------------------------------------------------------------------

#[napi]
pub fn linear_preview(input_json: String) -> NapiResult<String> {
    let input: preview::PreviewInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = preview::linear_preview(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn suggest_safe_extra(input_json: String) -> NapiResult<String> {
    let input: budget::SuggestionInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = budget::suggest_safe_extra(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
