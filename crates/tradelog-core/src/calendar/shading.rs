use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::*;

/// Heat-map bucket for a day's net P&L.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeatShade {
    Profit5,
    Profit4,
    Profit3,
    Profit2,
    Profit1,
    Neutral,
    Loss1,
    Loss2,
    Loss3,
    Loss4,
    Loss5,
}

/// Lower bounds (exclusive) for tiers 5 down to 2; anything else above zero is tier 1.
const TIERS: [(Decimal, u8); 4] = [
    (dec!(10000), 5),
    (dec!(5000), 4),
    (dec!(2000), 3),
    (dec!(500), 2),
];

impl HeatShade {
    /// Signed intensity: 5 for the deepest profit, -5 for the deepest loss.
    pub fn intensity(&self) -> i8 {
        match self {
            HeatShade::Profit5 => 5,
            HeatShade::Profit4 => 4,
            HeatShade::Profit3 => 3,
            HeatShade::Profit2 => 2,
            HeatShade::Profit1 => 1,
            HeatShade::Neutral => 0,
            HeatShade::Loss1 => -1,
            HeatShade::Loss2 => -2,
            HeatShade::Loss3 => -3,
            HeatShade::Loss4 => -4,
            HeatShade::Loss5 => -5,
        }
    }

    pub fn class_name(&self) -> &'static str {
        match self {
            HeatShade::Profit5 => "pnl-profit-5",
            HeatShade::Profit4 => "pnl-profit-4",
            HeatShade::Profit3 => "pnl-profit-3",
            HeatShade::Profit2 => "pnl-profit-2",
            HeatShade::Profit1 => "pnl-profit-1",
            HeatShade::Neutral => "pnl-neutral",
            HeatShade::Loss1 => "pnl-loss-1",
            HeatShade::Loss2 => "pnl-loss-2",
            HeatShade::Loss3 => "pnl-loss-3",
            HeatShade::Loss4 => "pnl-loss-4",
            HeatShade::Loss5 => "pnl-loss-5",
        }
    }

    fn profit(tier: u8) -> Self {
        match tier {
            5 => HeatShade::Profit5,
            4 => HeatShade::Profit4,
            3 => HeatShade::Profit3,
            2 => HeatShade::Profit2,
            _ => HeatShade::Profit1,
        }
    }

    fn loss(tier: u8) -> Self {
        match tier {
            5 => HeatShade::Loss5,
            4 => HeatShade::Loss4,
            3 => HeatShade::Loss3,
            2 => HeatShade::Loss2,
            _ => HeatShade::Loss1,
        }
    }
}

/// Map a day's net P&L to its shade. Zero and unknown are neutral.
pub fn shade_for_pnl(net_pnl: Option<Money>) -> HeatShade {
    let Some(pnl) = net_pnl else {
        return HeatShade::Neutral;
    };
    if pnl.is_zero() {
        return HeatShade::Neutral;
    }
    let magnitude = pnl.abs();
    let tier = TIERS
        .iter()
        .find(|(bound, _)| magnitude > *bound)
        .map(|(_, tier)| *tier)
        .unwrap_or(1);
    if pnl > Decimal::ZERO {
        HeatShade::profit(tier)
    } else {
        HeatShade::loss(tier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profit_tiers() {
        assert_eq!(shade_for_pnl(Some(dec!(10000.01))), HeatShade::Profit5);
        assert_eq!(shade_for_pnl(Some(dec!(10000))), HeatShade::Profit4);
        assert_eq!(shade_for_pnl(Some(dec!(5001))), HeatShade::Profit4);
        assert_eq!(shade_for_pnl(Some(dec!(2000.5))), HeatShade::Profit3);
        assert_eq!(shade_for_pnl(Some(dec!(501))), HeatShade::Profit2);
        assert_eq!(shade_for_pnl(Some(dec!(500))), HeatShade::Profit1);
        assert_eq!(shade_for_pnl(Some(dec!(0.01))), HeatShade::Profit1);
    }

    #[test]
    fn test_loss_tiers_mirror() {
        assert_eq!(shade_for_pnl(Some(dec!(-0.01))), HeatShade::Loss1);
        assert_eq!(shade_for_pnl(Some(dec!(-500))), HeatShade::Loss1);
        assert_eq!(shade_for_pnl(Some(dec!(-501))), HeatShade::Loss2);
        assert_eq!(shade_for_pnl(Some(dec!(-2001))), HeatShade::Loss3);
        assert_eq!(shade_for_pnl(Some(dec!(-5001))), HeatShade::Loss4);
        assert_eq!(shade_for_pnl(Some(dec!(-12000))), HeatShade::Loss5);
    }

    #[test]
    fn test_neutral() {
        assert_eq!(shade_for_pnl(None), HeatShade::Neutral);
        assert_eq!(shade_for_pnl(Some(Decimal::ZERO)), HeatShade::Neutral);
        assert_eq!(HeatShade::Neutral.class_name(), "pnl-neutral");
    }

    #[test]
    fn test_intensity_is_symmetric() {
        for v in [dec!(100), dec!(900), dec!(3000), dec!(6000), dec!(20000)] {
            let up = shade_for_pnl(Some(v)).intensity();
            let down = shade_for_pnl(Some(-v)).intensity();
            assert_eq!(up, -down);
        }
    }
}
