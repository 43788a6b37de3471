use chrono::{NaiveDate, NaiveDateTime};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tradelog_core::insights::{generate_insights, InsightCategory, InsightInput};
use tradelog_core::{Direction, ExecutedTrade, TradeLogError};

fn at(h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 7, 9)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

fn long(symbol: &str, entry_hour: u32, pnl: Decimal) -> ExecutedTrade {
    ExecutedTrade {
        symbol: symbol.into(),
        entry_at: at(entry_hour, 0),
        exit_at: at(entry_hour, 30),
        direction: Direction::Long,
        quantity: dec!(10),
        pnl,
        fees: dec!(1),
        mistakes: vec![],
        good_practices: vec![],
        holding_minutes: None,
    }
}

fn losing_morning() -> Vec<ExecutedTrade> {
    vec![
        long("AAPL", 8, dec!(100)),
        long("TSLA", 9, dec!(-200)),
        long("TSLA", 10, dec!(-300)),
        long("MSFT", 11, dec!(-100)),
    ]
}

#[test]
fn test_losing_session_ranks_issues_first() {
    let input = InsightInput {
        stats: None,
        trades: losing_morning(),
        open_positions: 0,
    };
    let out = generate_insights(&input).unwrap();
    let rules: Vec<&str> = out.result.insights.iter().map(|c| c.rule.as_str()).collect();

    assert_eq!(
        rules,
        vec![
            "losses_exceed_profits",
            "payoff_inverted",
            "worst_symbol",
            "best_symbol",
            "low_hit_rate_no_payoff",
        ]
    );
    assert_eq!(
        out.result.insights[0].text,
        "Losses exceeded profits: profit factor 0.17 across 4 trades."
    );
    assert_eq!(out.result.insights[0].category, InsightCategory::Issue);
    assert!(out.result.candidate_count > 5);
}

#[test]
fn test_no_trades_gives_no_insights() {
    let input = InsightInput {
        stats: None,
        trades: vec![],
        open_positions: 0,
    };
    let out = generate_insights(&input).unwrap();
    assert!(out.result.insights.is_empty());
    assert_eq!(out.warnings, vec!["No closed trades; no insights generated".to_string()]);
}

#[test]
fn test_insights_never_exceed_five_or_repeat() {
    let mut trades = losing_morning();
    trades.push(long("NVDA", 14, dec!(50)));
    trades.push(long("NVDA", 15, dec!(-20)));
    let input = InsightInput {
        stats: None,
        trades,
        open_positions: 2,
    };
    let out = generate_insights(&input).unwrap();
    let insights = &out.result.insights;
    assert!(insights.len() <= 5);
    for (i, a) in insights.iter().enumerate() {
        assert!(insights[i + 1..].iter().all(|b| b.text != a.text));
    }
}

#[test]
fn test_supplied_stats_validated() {
    let json = r#"{
        "stats": { "total_trades": 3, "net_pnl": "10", "gross_profit": "10", "gross_loss": "0",
                   "profit_factor": "infinite", "win_rate": "1.5" }
    }"#;
    let input: InsightInput = serde_json::from_str(json).unwrap();
    match generate_insights(&input).unwrap_err() {
        TradeLogError::InvalidInput { field, .. } => assert_eq!(field, "stats.win_rate"),
        other => panic!("Expected InvalidInput, got {other:?}"),
    }
}

#[test]
fn test_supplied_profit_factor_below_one_is_top_issue() {
    let json = r#"{
        "stats": { "total_trades": 10, "net_pnl": "-500", "gross_profit": "0", "gross_loss": "0",
                   "profit_factor": { "finite": "0.5" }, "win_rate": "0.5",
                   "average_win": "100", "average_loss": "200" }
    }"#;
    let input: InsightInput = serde_json::from_str(json).unwrap();
    let out = generate_insights(&input).unwrap();
    let rules: Vec<&str> = out.result.insights.iter().map(|c| c.rule.as_str()).collect();
    assert_eq!(rules[0], "losses_exceed_profits");
    assert!(rules.contains(&"payoff_inverted"));
}

#[test]
fn test_all_losing_trades_flag_inverted_payoff() {
    let input = InsightInput {
        stats: None,
        trades: vec![long("QQQ", 9, dec!(-100)), long("QQQ", 10, dec!(-100))],
        open_positions: 0,
    };
    let out = generate_insights(&input).unwrap();
    let rules: Vec<&str> = out.result.insights.iter().map(|c| c.rule.as_str()).collect();
    assert_eq!(rules[..2], ["losses_exceed_profits", "payoff_inverted"]);
}
