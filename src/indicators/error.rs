use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IndicatorError {
    #[error("{indicator}: need at least {required} bars, got {available}")]
    InsufficientData {
        indicator: &'static str,
        required: usize,
        available: usize,
    },

    #[error("{indicator}: invalid parameter {name} = {value}")]
    InvalidParameter {
        indicator: &'static str,
        name: &'static str,
        value: String,
    },

    #[error("unknown indicator: {0}")]
    UnknownIndicator(String),

    #[error("invalid numeric format: {0}")]
    InvalidNumericFormat(String),

    #[error("missing field: {0}")]
    MissingField(String),
}
