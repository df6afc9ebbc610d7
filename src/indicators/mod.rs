pub mod error;
pub mod parser;
pub mod registry;

pub mod momentum;
pub mod structure;
pub mod trend;
pub mod volatility;
pub mod volume;

pub use error::IndicatorError;
pub use parser::*;
pub use registry::*;
