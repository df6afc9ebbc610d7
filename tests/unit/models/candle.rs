//! Unit tests for the candle window

use chrono::{TimeZone, Utc};
use confluence::models::candle::{Candle, CandleWindow, DuplicatePolicy, PushOutcome};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn candle(minute: i64, close: Decimal) -> Candle {
    Candle::new(
        close,
        close + dec!(1),
        close - dec!(1),
        close,
        dec!(10),
        Utc.timestamp_opt(1_700_000_000 + minute * 60, 0).unwrap(),
    )
}

fn closes(window: &CandleWindow) -> Vec<Decimal> {
    window.iter().map(|c| c.close).collect()
}

#[test]
fn test_append_in_order() {
    let mut window = CandleWindow::new(10);
    assert!(window.is_empty());
    assert_eq!(window.push(candle(0, dec!(1))), PushOutcome::Appended);
    assert_eq!(window.push(candle(1, dec!(2))), PushOutcome::Appended);
    assert_eq!(window.len(), 2);
    assert_eq!(window.last().map(|c| c.close), Some(dec!(2)));
}

#[test]
fn test_overwrite_replaces_same_open_time() {
    let mut window = CandleWindow::new(10);
    window.push(candle(0, dec!(1)));
    window.push(candle(1, dec!(2)));
    assert_eq!(window.push(candle(0, dec!(5))), PushOutcome::Replaced);
    assert_eq!(closes(&window), vec![dec!(5), dec!(2)]);
}

#[test]
fn test_reject_policy_keeps_first_bar() {
    let mut window = CandleWindow::new(10).with_policy(DuplicatePolicy::Reject);
    window.push(candle(0, dec!(1)));
    assert_eq!(window.push(candle(0, dec!(5))), PushOutcome::Duplicate);
    assert_eq!(closes(&window), vec![dec!(1)]);
}

#[test]
fn test_out_of_order_rejected() {
    let mut window = CandleWindow::new(10);
    window.push(candle(0, dec!(1)));
    window.push(candle(2, dec!(3)));
    assert_eq!(window.push(candle(1, dec!(2))), PushOutcome::OutOfOrder);
    assert_eq!(window.len(), 2);
}

#[test]
fn test_oldest_bar_evicted_at_capacity() {
    let mut window = CandleWindow::new(3);
    for minute in 0..5 {
        window.push(candle(minute, Decimal::from(minute)));
    }
    assert_eq!(window.len(), 3);
    assert_eq!(window.max_len(), 3);
    assert_eq!(closes(&window), vec![dec!(2), dec!(3), dec!(4)]);
}

#[test]
fn test_from_history_sorts_backlog() {
    let backlog = vec![candle(2, dec!(3)), candle(0, dec!(1)), candle(1, dec!(2)), candle(1, dec!(9))];
    let window = CandleWindow::from_history(10, DuplicatePolicy::Overwrite, backlog);
    assert_eq!(closes(&window), vec![dec!(1), dec!(9), dec!(3)]);
    assert_eq!(window.closes().to_vec(), vec![Some(dec!(1)), Some(dec!(9)), Some(dec!(3))]);
    assert_eq!(window.highs().last(), Some(dec!(4)));
}
