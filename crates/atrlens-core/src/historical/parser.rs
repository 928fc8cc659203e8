use serde::{Deserialize, Serialize};
use tracing::debug;

use super::layout::{self, Category, STATUS_TRAILER_LEN};
use super::reader::HistoricalReader;
use super::tables;
use crate::atr::error::AtrWarning;
use crate::input::to_hex_string;
use crate::message::Message;

/// Historical bytes as transmitted, plus their analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoricalBytes {
    pub value: Vec<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    /// Compact-TLV objects in stream order (empty for other categories).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entries: Vec<TlvEntry>,
    pub description: Vec<Message>,
}

/// One compact-TLV object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TlvEntry {
    pub tag: u8,
    pub length: u8,
    /// Exactly `length` bytes; positions past the end of the data are zero.
    pub value: Vec<u8>,
    /// Number of value bytes that were actually present.
    pub present: usize,
    pub description: Vec<Message>,
}

/// Analyze the historical-byte block (already bounded by the decomposer).
///
/// # Examples
/// ```
/// use atrlens_core::{Category, analyze_historical_bytes};
///
/// let mut warnings = Vec::new();
/// let hb = analyze_historical_bytes(&[0x80, 0x65, 0xA2, 0x08, 0x01, 0x01, 0x52], &mut warnings);
/// assert_eq!(hb.category, Some(Category::CompactTlv));
/// assert_eq!(hb.entries[0].tag, 6);
/// assert!(warnings.is_empty());
/// ```
pub fn analyze_historical_bytes(bytes: &[u8], warnings: &mut Vec<AtrWarning>) -> HistoricalBytes {
    let mut hb = HistoricalBytes {
        value: bytes.to_vec(),
        ..HistoricalBytes::default()
    };
    let mut reader = HistoricalReader::new(bytes);
    let Some(indicator) = reader.next_byte() else {
        return hb;
    };
    let category = Category::from_byte(indicator);
    hb.category = Some(category);
    hb.description.push(
        Message::new("Category indicator byte: 0x%X (%s)")
            .arg(indicator)
            .arg(category.label()),
    );

    match category {
        Category::CompactTlvWithStatus => {
            let Some((mut body, status)) = reader.split_tail(STATUS_TRAILER_LEN) else {
                let warning = AtrWarning::HistoricalStatusTooShort {
                    got: reader.remaining_len(),
                };
                hb.description.push(Message::new("%s").arg(warning.to_string()));
                warnings.push(warning);
                return hb;
            };
            hb.entries = walk_compact_tlv(&mut body, warnings);
            flatten_entries(&hb.entries, &mut hb.description);
            let (lcs, sw1, sw2) = (status[0], status[1], status[2]);
            hb.description
                .push(Message::new("Mandatory status indicator (3 last bytes)"));
            hb.description.push(tables::life_cycle(lcs));
            hb.description.push(tables::status_word(sw1, sw2));
        }
        Category::CompactTlv => {
            hb.entries = walk_compact_tlv(&mut reader, warnings);
            flatten_entries(&hb.entries, &mut hb.description);
        }
        Category::DirReference => {
            let (value, present) = reader.read_padded(1);
            if present == 0 {
                warnings.push(AtrWarning::MissingDirReference);
            }
            hb.description
                .push(Message::new("DIR data reference: %d").arg(value[0]));
        }
        Category::Reserved(_) => {}
        Category::Proprietary(_) => {
            let rest = reader.remaining();
            hb.description
                .push(Message::new("\"%s\"").arg(tables::ascii_with_dots(rest)));
        }
    }
    hb
}

/// Walk compact-TLV objects until the reader is exhausted.
pub fn walk_compact_tlv(
    reader: &mut HistoricalReader<'_>,
    warnings: &mut Vec<AtrWarning>,
) -> Vec<TlvEntry> {
    let mut entries = Vec::new();
    while let Some(tl) = reader.next_byte() {
        let tag = tl >> 4;
        let length = tl & 0x0F;
        let (value, present) = reader.read_padded(usize::from(length));
        if present < value.len() {
            warnings.push(AtrWarning::TruncatedTlv {
                tag,
                expected: value.len(),
                got: present,
            });
        }
        debug!(tag, length, present, "compact TLV object");
        let description = describe_tlv(tag, &value);
        entries.push(TlvEntry {
            tag,
            length,
            value,
            present,
            description,
        });
    }
    entries
}

fn flatten_entries(entries: &[TlvEntry], out: &mut Vec<Message>) {
    for entry in entries {
        out.extend(entry.description.iter().cloned());
    }
}

fn hex_and_ascii(label: &str, value: &[u8]) -> Message {
    Message::new(format!("{label}: %s \"%s\""))
        .arg(to_hex_string(value))
        .arg(tables::ascii_with_dots(value))
}

fn describe_tlv(tag: u8, value: &[u8]) -> Vec<Message> {
    let mut msgs = vec![
        Message::new("Tag: %d, len: %d (%s)")
            .arg(tag)
            .arg(value.len())
            .arg(tables::tag_name(tag)),
    ];
    let first = value.first().copied().unwrap_or(0);
    match tag {
        layout::TAG_COUNTRY_CODE => {
            msgs.push(Message::new("Country code: %s").arg(to_hex_string(value)));
        }
        layout::TAG_ISSUER_ID => {
            msgs.push(Message::new("Issuer identification number: %s").arg(to_hex_string(value)));
        }
        layout::TAG_CARD_SERVICE => {
            msgs.push(Message::new("Card service data byte: %d").arg(first));
            msgs.extend(tables::card_service(first));
        }
        layout::TAG_INITIAL_ACCESS => msgs.push(hex_and_ascii("Initial access data", value)),
        layout::TAG_ISSUER_DATA => msgs.push(hex_and_ascii("Card issuer data", value)),
        layout::TAG_PRE_ISSUING => msgs.push(hex_and_ascii("Data", value)),
        layout::TAG_CAPABILITIES => match value.len() {
            1..=3 => {
                msgs.push(Message::new("Selection methods: %d").arg(value[0]));
                msgs.extend(tables::selection_methods(value[0]));
                if let Some(&dc) = value.get(1) {
                    msgs.push(Message::new("Data coding byte: %d").arg(dc));
                    msgs.extend(tables::data_coding(dc));
                }
                if let Some(&cc) = value.get(2) {
                    msgs.push(
                        Message::new("Command chaining, length fields and logical channels: %d")
                            .arg(cc),
                    );
                    msgs.extend(tables::command_chaining(cc));
                }
            }
            _ => msgs.push(Message::new("wrong ATR")),
        },
        layout::TAG_STATUS => match *value {
            [lcs] => msgs.push(tables::life_cycle(lcs)),
            [sw1, sw2] => msgs.push(tables::status_word(sw1, sw2)),
            [lcs, sw1, sw2] => {
                msgs.push(tables::life_cycle(lcs));
                msgs.push(tables::status_word(sw1, sw2));
            }
            _ => msgs.push(Message::new("wrong ATR")),
        },
        layout::TAG_AID => msgs.push(hex_and_ascii("Application identifier", value)),
        _ => msgs.push(hex_and_ascii("Value", value)),
    }
    msgs
}
