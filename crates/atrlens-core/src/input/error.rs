use thiserror::Error;

/// Errors returned while normalizing an ATR string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("odd number of hex digits: {digits} (dangling nibble)")]
    OddLength { digits: usize },
    #[error("invalid hex digit in '{token}'")]
    InvalidDigit { token: String },
}
