//! Byte normalizer.
//!
//! Turns a hex-digit string into the ordered byte sequence the decoder walks.
//! Colons and whitespace are separators and are dropped before pairing digits,
//! so `"3B A7 00"`, `"3B:A7:00"` and `"3BA700"` normalize identically.
//! A dangling nibble is the only structural failure; any non-hex character is
//! rejected with the offending token.

pub mod error;
pub mod parser;

pub use parser::{normalize, to_hex_string};
