pub mod classifier;

pub use classifier::{
    aggregate_risk_grade, analyze_trade_plan, classify_trade, GradeCounts, PlannedTradeRisk,
    RiskAssessment, RiskGrade, TradePlanInput, TradePlanOutput,
};
