use chrono::{NaiveDate, NaiveDateTime};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tradelog_core::tags::{analyze_tag_impact, max_drawdown, TagImpactInput};
use tradelog_core::{Direction, ExecutedTrade, ProfitFactor};

fn at(h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 3)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

fn trade(symbol: &str, entry: (u32, u32), exit: (u32, u32), pnl: Decimal, mistakes: &[&str], good: &[&str]) -> ExecutedTrade {
    ExecutedTrade {
        symbol: symbol.into(),
        entry_at: at(entry.0, entry.1),
        exit_at: at(exit.0, exit.1),
        direction: Direction::Long,
        quantity: dec!(100),
        pnl,
        fees: dec!(1),
        mistakes: mistakes.iter().map(|s| s.to_string()).collect(),
        good_practices: good.iter().map(|s| s.to_string()).collect(),
        holding_minutes: None,
    }
}

fn session() -> Vec<ExecutedTrade> {
    vec![
        trade("AAPL", (9, 35), (9, 50), dec!(400), &[], &["Followed plan", "Waited for setup"]),
        trade("TSLA", (10, 0), (10, 20), dec!(-300), &["FOMO", "Oversized"], &[]),
        trade("AMD", (10, 30), (11, 0), dec!(-150), &["FOMO"], &[]),
        trade("AAPL", (11, 15), (11, 45), dec!(250), &[], &["Followed plan"]),
        trade("NVDA", (13, 0), (13, 30), dec!(-50), &[], &[]),
    ]
}

#[test]
fn test_session_tables_and_totals() {
    let out = analyze_tag_impact(&TagImpactInput {
        trades: session(),
        broker_net_pnl: None,
    })
    .unwrap();
    let a = &out.result.attribution;

    assert_eq!(a.total_mistake_cost, dec!(450));
    assert_eq!(a.top_drag.as_ref().unwrap().tag, "FOMO");
    assert_eq!(a.top_drag.as_ref().unwrap().amount, dec!(450));
    assert_eq!(a.mistakes[1].tag, "Oversized");
    assert_eq!(a.total_good_practice_profit, dec!(650));
    assert_eq!(a.top_edge.as_ref().unwrap().tag, "Followed plan");

    let s = &out.result.session;
    assert_eq!(s.actual_net_pnl, dec!(150));
    assert_eq!(s.potential_pnl, dec!(600));
    assert_eq!(s.hit_rate_pct, dec!(40));
    assert_eq!(s.profit_factor, ProfitFactor::Finite(dec!(650) / dec!(500)));
    // Curve: 400, 100, -50, 200, 150
    assert_eq!(s.max_drawdown, dec!(450));
    assert_eq!(s.total_fees, dec!(5));

    assert_eq!(out.warnings, vec!["1 of 5 trade(s) carry no tags".to_string()]);
}

#[test]
fn test_duplicate_rows_do_not_double_cost() {
    let mut trades = session();
    let dup = trades[1].clone();
    trades.push(dup);
    let out = analyze_tag_impact(&TagImpactInput {
        trades,
        broker_net_pnl: Some(dec!(149.999)),
    })
    .unwrap();
    assert_eq!(out.result.attribution.total_mistake_cost, dec!(450));
    let fomo = &out.result.attribution.mistakes[0];
    assert_eq!(fomo.occurrences, 3);
    assert_eq!(fomo.trade_count, 2);
    assert_eq!(out.result.session.duplicate_keys, 1);
    assert_eq!(out.result.session.actual_net_pnl, dec!(150.00));
    assert!(out.warnings[0].contains("repeat an earlier identity key"));
}

#[test]
fn test_empty_session_is_valid() {
    let out = analyze_tag_impact(&TagImpactInput {
        trades: vec![],
        broker_net_pnl: None,
    })
    .unwrap();
    assert!(out.result.attribution.top_drag.is_none());
    assert_eq!(out.result.session.total_trades, 0);
    assert!(out.warnings.is_empty());
}

#[test]
fn test_drawdown_starts_from_flat() {
    let trades = vec![
        trade("X", (9, 0), (9, 10), dec!(-100), &[], &[]),
        trade("X", (9, 20), (9, 30), dec!(-50), &[], &[]),
    ];
    assert_eq!(max_drawdown(&trades), dec!(150));
}
