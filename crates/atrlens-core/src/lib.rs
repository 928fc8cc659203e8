//! atrlens core library: ISO/IEC 7816-3 Answer-To-Reset decoding.
//!
//! The pipeline is linear and synchronous: the `input` normalizer turns a hex
//! string into bytes, the `atr` decomposer walks the interface-byte chain and
//! invokes the field interpreters as each byte is located, the `historical`
//! analyzer decodes the historical-byte block once, and `checksum` validates
//! TCK when a protocol other than T=0 was announced. The result is one
//! [`AtrRecord`] whose descriptions are structured [`Message`] values, so
//! renderers never re-derive semantics.
//!
//! Invariants:
//! - Only the normalizer (and an ATR without TS/T0) fails a decode; every
//!   other anomaly becomes a `warning` entry or an annotated description.
//! - The negotiated protocol lives in a [`ProtocolContext`] owned by a single
//!   decode call.
//! - Decoding the same bytes twice yields identical records.
//!
//! # Examples
//! ```
//! use atrlens_core::{FieldId, InterfaceByte, decode_atr};
//!
//! let record = decode_atr("3B A7 00 40 18 80 65 A2 08 01 01 52")?;
//! assert_eq!(record.hbn, 7);
//! assert_eq!(record.pn, 2);
//! assert_eq!(record.value(FieldId::Interface(InterfaceByte::tc(2))), Some(24));
//! # Ok::<(), atrlens_core::DecodeError>(())
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

mod atr;
pub mod cards;
mod checksum;
mod historical;
mod input;
mod interpret;
mod message;

pub use atr::error::{AtrWarning, DecodeError};
pub use atr::parser::parse_atr;
pub use cards::{CardEntry, CardList, CardListError};
pub use checksum::{ChecksumStatus, expected_tck, xor_fold};
pub use historical::layout::Category;
pub use historical::parser::{HistoricalBytes, TlvEntry, analyze_historical_bytes};
pub use input::error::NormalizeError;
pub use input::{normalize, to_hex_string};
pub use interpret::tables::NOMINAL_CLOCK_HZ;
pub use interpret::{ClockRate, ProtocolContext, clock_rate, describe};
pub use message::{Arg, Message};

/// Interface byte letter within a protocol block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum InterfaceKind {
    A,
    B,
    C,
    D,
}

impl InterfaceKind {
    pub const ALL: [InterfaceKind; 4] = [
        InterfaceKind::A,
        InterfaceKind::B,
        InterfaceKind::C,
        InterfaceKind::D,
    ];

    const fn letter(self) -> char {
        match self {
            InterfaceKind::A => 'A',
            InterfaceKind::B => 'B',
            InterfaceKind::C => 'C',
            InterfaceKind::D => 'D',
        }
    }
}

/// Position of an interface byte: letter plus protocol block index (from 1).
///
/// Ordering is by index first, then letter, which is the transmission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InterfaceByte {
    pub index: usize,
    pub kind: InterfaceKind,
}

impl InterfaceByte {
    pub const fn new(kind: InterfaceKind, index: usize) -> Self {
        Self { index, kind }
    }

    pub const fn ta(index: usize) -> Self {
        Self::new(InterfaceKind::A, index)
    }

    pub const fn tb(index: usize) -> Self {
        Self::new(InterfaceKind::B, index)
    }

    pub const fn tc(index: usize) -> Self {
        Self::new(InterfaceKind::C, index)
    }

    pub const fn td(index: usize) -> Self {
        Self::new(InterfaceKind::D, index)
    }
}

impl fmt::Display for InterfaceByte {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}{}", self.kind.letter(), self.index)
    }
}

/// Identifier of a single-byte field in an [`AtrRecord`].
///
/// Serializes as `"TS"`, `"T0"`, `"TA1"`, ..., `"TCK"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldId {
    Ts,
    T0,
    Interface(InterfaceByte),
    Tck,
}

impl From<InterfaceByte> for FieldId {
    fn from(value: InterfaceByte) -> Self {
        FieldId::Interface(value)
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldId::Ts => f.write_str("TS"),
            FieldId::T0 => f.write_str("T0"),
            FieldId::Interface(byte) => byte.fmt(f),
            FieldId::Tck => f.write_str("TCK"),
        }
    }
}

impl FromStr for FieldId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TS" => return Ok(FieldId::Ts),
            "T0" => return Ok(FieldId::T0),
            "TCK" => return Ok(FieldId::Tck),
            _ => {}
        }
        let invalid = || format!("unknown field identifier '{s}'");
        let rest = s.strip_prefix('T').ok_or_else(invalid)?;
        let mut chars = rest.chars();
        let kind = match chars.next() {
            Some('A') => InterfaceKind::A,
            Some('B') => InterfaceKind::B,
            Some('C') => InterfaceKind::C,
            Some('D') => InterfaceKind::D,
            _ => return Err(invalid()),
        };
        let index: usize = chars.as_str().parse().map_err(|_| invalid())?;
        if index == 0 {
            return Err(invalid());
        }
        Ok(FieldId::Interface(InterfaceByte::new(kind, index)))
    }
}

impl Serialize for FieldId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FieldId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Raw byte plus its decoded description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub value: u8,
    pub description: Vec<Message>,
}

/// Decoded Answer-To-Reset.
///
/// # Examples
/// ```
/// use atrlens_core::{ChecksumStatus, decode_atr};
///
/// let record = decode_atr("3B 8E 80 01 80 31 80 66 B1 84 0C 01 6E 01 83 00 90 00 1C")?;
/// assert_eq!(record.checksum, Some(ChecksumStatus::Valid));
/// assert!(record.warnings.is_empty());
/// # Ok::<(), atrlens_core::DecodeError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtrRecord {
    /// Full normalized byte sequence.
    pub atr: Vec<u8>,
    /// TS, T0, interface bytes and TCK in transmission order.
    pub fields: BTreeMap<FieldId, Field>,
    /// Declared historical-byte count (T0 low nibble).
    pub hbn: usize,
    /// Number of protocol blocks announced (TD count + 1).
    pub pn: usize,
    /// Historical bytes actually present, with their analysis.
    pub hb: HistoricalBytes,
    /// Checksum verdict, present only when TCK is expected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<ChecksumStatus>,
    /// Non-fatal anomalies, in detection order.
    #[serde(rename = "warning", default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    /// Bytes past the expected end of the ATR.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<Vec<u8>>,
}

impl AtrRecord {
    pub fn get(&self, id: impl Into<FieldId>) -> Option<&Field> {
        self.fields.get(&id.into())
    }

    pub fn value(&self, id: impl Into<FieldId>) -> Option<u8> {
        self.get(id).map(|field| field.value)
    }

    /// Normalized uppercase hex form, as consumed by [`CardList::lookup`].
    pub fn to_hex_string(&self) -> String {
        to_hex_string(&self.atr)
    }

    /// Interface bytes grouped by protocol block index.
    pub fn blocks(&self) -> BTreeMap<usize, Vec<(InterfaceByte, &Field)>> {
        let mut blocks: BTreeMap<usize, Vec<(InterfaceByte, &Field)>> = BTreeMap::new();
        for (id, field) in &self.fields {
            if let FieldId::Interface(byte) = id {
                blocks.entry(byte.index).or_default().push((*byte, field));
            }
        }
        blocks
    }

    /// True when the record carries warnings or a checksum problem.
    pub fn has_anomalies(&self) -> bool {
        !self.warnings.is_empty()
            || matches!(
                self.checksum,
                Some(ChecksumStatus::Mismatch { .. } | ChecksumStatus::Missing { .. })
            )
    }

    /// Flat view with every description rendered to text.
    ///
    /// # Examples
    /// ```
    /// use atrlens_core::decode_atr;
    ///
    /// let record = decode_atr("3B A7 00 40 18 80 65 A2 08 01 01 52")?;
    /// let simple = record.simplified();
    /// assert_eq!(simple["TS"]["value"], "0x3B");
    /// assert_eq!(simple["hbn"], 7);
    /// # Ok::<(), atrlens_core::DecodeError>(())
    /// ```
    pub fn simplified(&self) -> serde_json::Value {
        let render = |msgs: &[Message]| {
            msgs.iter()
                .map(Message::render)
                .collect::<Vec<_>>()
                .join("\n")
        };
        let mut map = serde_json::Map::new();
        map.insert("atr".to_string(), self.to_hex_string().into());
        for (id, field) in &self.fields {
            map.insert(
                id.to_string(),
                serde_json::json!({
                    "value": format!("0x{:02X}", field.value),
                    "description": render(&field.description),
                }),
            );
        }
        map.insert(
            "hb".to_string(),
            serde_json::json!({
                "value": to_hex_string(&self.hb.value),
                "description": render(&self.hb.description),
            }),
        );
        map.insert("hbn".to_string(), self.hbn.into());
        map.insert("pn".to_string(), self.pn.into());
        if !self.warnings.is_empty() {
            map.insert("warning".to_string(), self.warnings.clone().into());
        }
        if let Some(extra) = &self.extra {
            map.insert("extra".to_string(), to_hex_string(extra).into());
        }
        serde_json::Value::Object(map)
    }
}

/// Normalize and decode an ATR hex string.
pub fn decode_atr(input: &str) -> Result<AtrRecord, DecodeError> {
    let bytes = normalize(input)?;
    parse_atr(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_id_display_roundtrip() {
        for id in [
            FieldId::Ts,
            FieldId::T0,
            FieldId::Interface(InterfaceByte::ta(1)),
            FieldId::Interface(InterfaceByte::td(12)),
            FieldId::Tck,
        ] {
            let text = id.to_string();
            assert_eq!(text.parse::<FieldId>().unwrap(), id);
        }
        assert_eq!(FieldId::Interface(InterfaceByte::tb(3)).to_string(), "TB3");
        assert!("TE1".parse::<FieldId>().is_err());
        assert!("TA0".parse::<FieldId>().is_err());
    }

    #[test]
    fn field_ids_sort_in_transmission_order() {
        let mut ids = vec![
            FieldId::Tck,
            FieldId::Interface(InterfaceByte::td(1)),
            FieldId::Interface(InterfaceByte::ta(2)),
            FieldId::Interface(InterfaceByte::ta(1)),
            FieldId::T0,
            FieldId::Ts,
        ];
        ids.sort();
        let names: Vec<String> = ids.iter().map(ToString::to_string).collect();
        assert_eq!(names, ["TS", "T0", "TA1", "TD1", "TA2", "TCK"]);
    }

    #[test]
    fn record_json_uses_string_keys_and_omits_empty_entries() {
        let record = decode_atr("3B A7 00 40 18 80 65 A2 08 01 01 52").unwrap();
        let value = serde_json::to_value(&record).expect("record json");
        assert_eq!(value["fields"]["TC2"]["value"], 24);
        assert!(value.get("warning").is_none());
        assert!(value.get("extra").is_none());
        assert!(value.get("checksum").is_none());

        let back: AtrRecord = serde_json::from_value(value).expect("record back");
        assert_eq!(back, record);
    }
}
