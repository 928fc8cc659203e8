use thiserror::Error;

use crate::InterfaceByte;
use crate::input::error::NormalizeError;

/// Fatal decode errors.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed ATR: {0}")]
    Malformed(#[from] NormalizeError),
    #[error("ATR too short: need TS and T0 (2 bytes), got {actual}")]
    TooShort { actual: usize },
}

/// Non-fatal anomalies recorded in the `warning` entry of a record.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AtrWarning {
    #[error("ATR is truncated: interface byte {field} is announced but missing")]
    TruncatedInterfaceBytes { field: InterfaceByte },
    #[error("ATR is truncated: {missing} historical byte(s) missing")]
    TruncatedHistoricalBytes { missing: usize },
    #[error("ATR is truncated: checksum byte TCK is missing")]
    MissingChecksum,
    #[error("Error in the ATR: expecting 3 bytes, got {got}")]
    HistoricalStatusTooShort { got: usize },
    #[error("Error in the ATR: DIR data reference byte is missing")]
    MissingDirReference,
    #[error("Error in the ATR: compact TLV tag {tag} expects {expected} byte(s), got {got}")]
    TruncatedTlv { tag: u8, expected: usize, got: usize },
}
