use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Risk
// ---------------------------------------------------------------------------

#[napi]
pub fn analyze_trade_plan(input_json: String) -> NapiResult<String> {
    let input: tradelog_core::risk::TradePlanInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = tradelog_core::risk::analyze_trade_plan(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn classify_trade(trade_json: String) -> NapiResult<String> {
    let trade: tradelog_core::PlannedTrade =
        serde_json::from_str(&trade_json).map_err(to_napi_error)?;
    let assessment = tradelog_core::risk::classify_trade(&trade);
    serde_json::to_string(&assessment).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Tags
// ---------------------------------------------------------------------------

#[napi]
pub fn analyze_tag_impact(input_json: String) -> NapiResult<String> {
    let input: tradelog_core::tags::TagImpactInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = tradelog_core::tags::analyze_tag_impact(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Insights
// ---------------------------------------------------------------------------

#[napi]
pub fn generate_insights(input_json: String) -> NapiResult<String> {
    let input: tradelog_core::insights::InsightInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = tradelog_core::insights::generate_insights(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Calendar
// ---------------------------------------------------------------------------

#[napi]
pub fn analyze_period(input_json: String) -> NapiResult<String> {
    let input: tradelog_core::calendar::PeriodSummaryInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = tradelog_core::calendar::analyze_period(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn month_matrix(year: i32, month: u32) -> NapiResult<String> {
    let matrix = tradelog_core::calendar::month_matrix(year, month).map_err(to_napi_error)?;
    serde_json::to_string(&matrix).map_err(to_napi_error)
}

#[napi]
pub fn build_month_view(input_json: String) -> NapiResult<String> {
    let input: tradelog_core::calendar::MonthViewInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let view = tradelog_core::calendar::build_month_view(
        input.year,
        input.month,
        &input.days,
        input.month_summary.as_ref(),
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&view).map_err(to_napi_error)
}

/// `net_pnl` is a decimal string; None for a day without data.
#[napi]
pub fn shade_for_pnl(net_pnl: Option<String>) -> NapiResult<String> {
    let pnl = net_pnl
        .map(|s| s.parse::<Decimal>())
        .transpose()
        .map_err(to_napi_error)?;
    Ok(tradelog_core::calendar::shade_for_pnl(pnl)
        .class_name()
        .to_string())
}
