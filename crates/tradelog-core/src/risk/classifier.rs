use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::{trades::*, types::*, TradeLogError, TradeLogResult};

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

/// Risk grade of a planned trade.
///
/// Variants are declared in severity order so the derived `Ord` ranks
/// `Low < Moderate < High < Extreme`. `NotApplicable` sorts lowest and is
/// skipped by [`aggregate_risk_grade`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskGrade {
    #[serde(rename = "n/a")]
    NotApplicable,
    Low,
    Moderate,
    High,
    Extreme,
}

impl RiskGrade {
    pub fn label(&self) -> &'static str {
        match self {
            RiskGrade::NotApplicable => "N/A",
            RiskGrade::Low => "Low",
            RiskGrade::Moderate => "Moderate",
            RiskGrade::High => "High",
            RiskGrade::Extreme => "Extreme",
        }
    }
}

/// Classification of a single planned trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub grade: RiskGrade,
    pub stop_distance: Money,
    pub target_distance: Money,
    pub risk_reward_ratio: Rate,
    /// stop distance as a percentage of entry (1.5 = 1.5%)
    pub risk_percent: Rate,
    /// Money lost if the stop fills: stop distance x quantity x multiplier
    pub risk_amount: Money,
    /// Money made if the target fills
    pub reward_amount: Money,
}

impl RiskAssessment {
    fn not_applicable(stop_distance: Money, target_distance: Money) -> Self {
        Self {
            grade: RiskGrade::NotApplicable,
            stop_distance,
            target_distance,
            risk_reward_ratio: Decimal::ZERO,
            risk_percent: Decimal::ZERO,
            risk_amount: Decimal::ZERO,
            reward_amount: Decimal::ZERO,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradePlanInput {
    pub trades: Vec<PlannedTrade>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedTradeRisk {
    pub symbol: String,
    pub direction: Direction,
    pub assessment: RiskAssessment,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeCounts {
    pub low: u32,
    pub moderate: u32,
    pub high: u32,
    pub extreme: u32,
    pub not_applicable: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradePlanOutput {
    pub aggregate_grade: RiskGrade,
    pub trades: Vec<PlannedTradeRisk>,
    pub grade_counts: GradeCounts,
    pub total_risk_amount: Money,
    pub total_reward_amount: Money,
    /// total reward / total risk; zero when nothing is at risk
    pub plan_reward_to_risk: Rate,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Classify one planned trade by stop distance and reward-to-risk.
pub fn classify_trade(trade: &PlannedTrade) -> RiskAssessment {
    let entry = trade.entry_price;
    let stop_distance = trade
        .stop_price
        .map(|stop| clamp_distance(trade.direction.favourable_move(stop, entry)))
        .unwrap_or(Decimal::ZERO);
    let target_distance = trade
        .target_price
        .map(|target| clamp_distance(trade.direction.favourable_move(entry, target)))
        .unwrap_or(Decimal::ZERO);

    if entry <= Decimal::ZERO
        || trade.quantity <= Decimal::ZERO
        || stop_distance.is_zero()
        || target_distance.is_zero()
    {
        return RiskAssessment::not_applicable(stop_distance, target_distance);
    }

    let risk_reward_ratio = target_distance / stop_distance;
    let risk_percent = stop_distance / entry * dec!(100);
    let multiplier = trade
        .instrument
        .as_ref()
        .map(|m| m.multiplier)
        .filter(|m| *m > Decimal::ZERO)
        .unwrap_or(Decimal::ONE);
    let units = trade.quantity * multiplier;

    RiskAssessment {
        grade: grade_for(risk_percent, risk_reward_ratio),
        stop_distance,
        target_distance,
        risk_reward_ratio,
        risk_percent,
        risk_amount: stop_distance * units,
        reward_amount: target_distance * units,
    }
}

/// The single worst grade among the applicable grades; N/A when none are.
pub fn aggregate_risk_grade(grades: &[RiskGrade]) -> RiskGrade {
    grades
        .iter()
        .copied()
        .filter(|g| *g != RiskGrade::NotApplicable)
        .max()
        .unwrap_or(RiskGrade::NotApplicable)
}

/// Classify every trade in a plan and roll the grades up.
pub fn analyze_trade_plan(
    input: &TradePlanInput,
) -> TradeLogResult<ComputationOutput<TradePlanOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.trades.is_empty() {
        return Err(TradeLogError::InvalidInput {
            field: "trades".into(),
            reason: "At least one planned trade is required.".into(),
        });
    }

    let mut rows = Vec::with_capacity(input.trades.len());
    let mut counts = GradeCounts::default();
    let mut total_risk = Decimal::ZERO;
    let mut total_reward = Decimal::ZERO;

    for trade in &input.trades {
        let assessment = classify_trade(trade);
        match assessment.grade {
            RiskGrade::Low => counts.low += 1,
            RiskGrade::Moderate => counts.moderate += 1,
            RiskGrade::High => counts.high += 1,
            RiskGrade::Extreme => counts.extreme += 1,
            RiskGrade::NotApplicable => {
                counts.not_applicable += 1;
                warnings.push(format!(
                    "{}: not graded ({})",
                    trade.symbol,
                    not_applicable_reason(trade, &assessment)
                ));
            }
        }
        total_risk += assessment.risk_amount;
        total_reward += assessment.reward_amount;
        rows.push(PlannedTradeRisk {
            symbol: trade.symbol.clone(),
            direction: trade.direction,
            assessment,
        });
    }

    let grades: Vec<RiskGrade> = rows.iter().map(|r| r.assessment.grade).collect();
    let aggregate_grade = aggregate_risk_grade(&grades);
    tracing::debug!(
        trades = rows.len(),
        grade = aggregate_grade.label(),
        "trade plan classified"
    );

    let plan_reward_to_risk = if total_risk > Decimal::ZERO {
        total_reward / total_risk
    } else {
        Decimal::ZERO
    };

    let output = TradePlanOutput {
        aggregate_grade,
        trades: rows,
        grade_counts: counts,
        total_risk_amount: total_risk,
        total_reward_amount: total_reward,
        plan_reward_to_risk,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "risk_percent": "stop distance / entry x 100",
        "distances": "directional, clamped at zero when on the wrong side of entry",
        "aggregate": "worst applicable grade (Low < Moderate < High < Extreme)",
    });

    Ok(with_metadata(
        "Planned Trade Risk Classification",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn clamp_distance(distance: Money) -> Money {
    distance.max(Decimal::ZERO)
}

fn grade_for(risk_percent: Rate, rr: Rate) -> RiskGrade {
    if risk_percent >= dec!(3.0) || (risk_percent >= dec!(2.0) && rr < dec!(1.0)) {
        RiskGrade::Extreme
    } else if risk_percent >= dec!(2.0) || (risk_percent >= dec!(1.0) && rr < dec!(1.2)) {
        RiskGrade::High
    } else if risk_percent >= dec!(1.0) || (risk_percent >= dec!(0.5) && rr < dec!(1.5)) {
        RiskGrade::Moderate
    } else {
        RiskGrade::Low
    }
}

fn not_applicable_reason(trade: &PlannedTrade, assessment: &RiskAssessment) -> &'static str {
    if trade.entry_price <= Decimal::ZERO {
        "entry price must be positive"
    } else if trade.quantity <= Decimal::ZERO {
        "quantity must be positive"
    } else if assessment.stop_distance.is_zero() {
        "stop missing or on the wrong side of entry"
    } else {
        "target missing or on the wrong side of entry"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
