//! Historical-byte analysis.
//!
//! The category indicator (first historical byte) selects the decoding:
//! compact TLV followed by a 3-byte status trailer, compact TLV alone, a DIR
//! data reference, reserved, or proprietary. The compact-TLV walk reads from a
//! cursor over the historical-byte slice and never fails; a tag claiming more
//! bytes than remain reads what is there and pads the rest with zeros.

pub mod layout;
pub mod parser;
pub mod reader;
pub mod tables;
