//! Structural decomposition of the ATR.
//!
//! The parser walks TS, T0 and the TAi/TBi/TCi/TDi chain using the presence
//! bitmap in the high nibble of T0 and of each TDi, then takes the historical
//! bytes and the optional TCK. Presence is evaluated against the bitmap of the
//! current block only. Truncation at any point is a warning, never an error.
//!
//! Byte positions and masks live in `layout`; cursor access lives in `reader`.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;
