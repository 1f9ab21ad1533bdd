use napi::Result as NapiResult;
use napi_derive::napi;

use gpc_core::report;
use gpc_core::schedules::Schedules;
use gpc_core::types::Lang;
use gpc_core::valuation::{self, ValuationInput};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Valuation
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_valuation(input_json: String) -> NapiResult<String> {
    let input: ValuationInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = valuation::compute(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn calculate_valuation_with_schedules(
    input_json: String,
    schedules_json: String,
) -> NapiResult<String> {
    let input: ValuationInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let schedules: Schedules = serde_json::from_str(&schedules_json).map_err(to_napi_error)?;
    let output = valuation::compute_with_schedules(&input, &schedules).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// The built-in rate tables, for rendering duty and fee breakdowns client-side.
#[napi]
pub fn default_schedules() -> NapiResult<String> {
    serde_json::to_string(&Schedules::default()).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

#[napi]
pub fn build_report_payload(
    input_json: String,
    lang: String,
    generated_at: String,
) -> NapiResult<String> {
    let input: ValuationInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let lang = match lang.as_str() {
        "en" => Lang::En,
        "zh" => Lang::Zh,
        other => {
            return Err(to_napi_error(format!(
                "unsupported report language '{other}' (expected en or zh)"
            )))
        }
    };
    let computed = valuation::compute(&input).map_err(to_napi_error)?;
    let payload = report::build_report_payload(&input, &computed.result, lang, &generated_at);
    serde_json::to_string(&payload).map_err(to_napi_error)
}
