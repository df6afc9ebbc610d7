//! Order-book wall detection

use rust_decimal::Decimal;

use crate::models::order_book::{OrderBookSnapshot, WallReport};

/// Flag the first bid below and the first ask above `current_price` whose
/// quantity reaches `multiplier` times the average quantity of the top `depth`
/// levels on both sides. Scanning stops at the first match on each side.
pub fn analyze_order_book_walls(
    book: &OrderBookSnapshot,
    current_price: Decimal,
    depth: usize,
    multiplier: Decimal,
) -> WallReport {
    let mut report = WallReport::default();
    let bids = &book.bids[..depth.min(book.bids.len())];
    let asks = &book.asks[..depth.min(book.asks.len())];

    let count = bids.len() + asks.len();
    if count == 0 {
        return report;
    }
    let total = bids
        .iter()
        .chain(asks.iter())
        .try_fold(Decimal::ZERO, |acc, level| acc.checked_add(level.quantity));
    let Some(total) = total else {
        return report;
    };
    let threshold = total / Decimal::from(count) * multiplier;

    if let Some(wall) = bids
        .iter()
        .find(|b| b.quantity >= threshold && b.price < current_price)
    {
        report.has_bullish_wall = true;
        report
            .bullish_walls
            .insert(format!("Bid@{:.4}", wall.price), wall.quantity);
    }
    if let Some(wall) = asks
        .iter()
        .find(|a| a.quantity >= threshold && a.price > current_price)
    {
        report.has_bearish_wall = true;
        report
            .bearish_walls
            .insert(format!("Ask@{:.4}", wall.price), wall.quantity);
    }
    report
}
