use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%) unless a field name says `pct`.
pub type Rate = Decimal;

/// Gross profit divided by gross loss.
///
/// A trade set with profits and no losses has an unbounded factor, which is
/// kept as its own variant rather than an arbitrary large number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfitFactor {
    Finite(Decimal),
    Infinite,
}

impl ProfitFactor {
    /// Apply the shared sentinel rules: no loss with profit is `Infinite`,
    /// no loss and no profit is zero.
    pub fn from_gross(gross_profit: Money, gross_loss: Money) -> Self {
        if gross_loss.is_zero() {
            if gross_profit > Decimal::ZERO {
                ProfitFactor::Infinite
            } else {
                ProfitFactor::Finite(Decimal::ZERO)
            }
        } else {
            ProfitFactor::Finite(gross_profit / gross_loss.abs())
        }
    }

    pub fn is_infinite(&self) -> bool {
        matches!(self, ProfitFactor::Infinite)
    }

    /// The finite value, if any.
    pub fn value(&self) -> Option<Decimal> {
        match self {
            ProfitFactor::Finite(v) => Some(*v),
            ProfitFactor::Infinite => None,
        }
    }

    /// True when the factor is finite and strictly below `threshold`.
    pub fn is_below(&self, threshold: Decimal) -> bool {
        self.value().is_some_and(|v| v < threshold)
    }

    /// True when the factor is infinite or at least `threshold`.
    pub fn is_at_least(&self, threshold: Decimal) -> bool {
        match self {
            ProfitFactor::Finite(v) => *v >= threshold,
            ProfitFactor::Infinite => true,
        }
    }
}

impl Default for ProfitFactor {
    fn default() -> Self {
        ProfitFactor::Finite(Decimal::ZERO)
    }
}

impl std::fmt::Display for ProfitFactor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProfitFactor::Finite(v) => write!(f, "{}", v.round_dp(2)),
            ProfitFactor::Infinite => write!(f, "∞"),
        }
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    if !warnings.is_empty() {
        tracing::warn!(
            methodology,
            count = warnings.len(),
            "computation produced warnings"
        );
    }
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_profit_factor_sentinels() {
        assert_eq!(
            ProfitFactor::from_gross(dec!(100), Decimal::ZERO),
            ProfitFactor::Infinite
        );
        assert_eq!(
            ProfitFactor::from_gross(Decimal::ZERO, Decimal::ZERO),
            ProfitFactor::Finite(Decimal::ZERO)
        );
        assert_eq!(
            ProfitFactor::from_gross(dec!(300), dec!(150)),
            ProfitFactor::Finite(dec!(2))
        );
    }

    #[test]
    fn test_profit_factor_thresholds() {
        assert!(ProfitFactor::Finite(dec!(0.9)).is_below(dec!(1)));
        assert!(!ProfitFactor::Infinite.is_below(dec!(1)));
        assert!(ProfitFactor::Infinite.is_at_least(dec!(2)));
        assert!(!ProfitFactor::Finite(dec!(1.99)).is_at_least(dec!(2)));
    }

    #[test]
    fn test_profit_factor_serde_shape() {
        let json = serde_json::to_value(ProfitFactor::Infinite).unwrap();
        assert_eq!(json, serde_json::json!("infinite"));
        let json = serde_json::to_value(ProfitFactor::Finite(dec!(1.5))).unwrap();
        assert_eq!(json, serde_json::json!({ "finite": "1.5" }));
    }
}
