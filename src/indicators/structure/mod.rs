//! Market structure: price levels and order-book walls

pub mod order_book;
pub mod support_resistance;

pub use order_book::*;
pub use support_resistance::*;
