use std::collections::BTreeMap;

use tracing::{debug, warn};

use super::error::{AtrWarning, DecodeError};
use super::layout::{self, HISTORICAL_COUNT_MASK, PROTOCOL_MASK, PROTOCOL_T0};
use super::reader::AtrReader;
use crate::checksum;
use crate::historical::parser::analyze_historical_bytes;
use crate::interpret::{self, ProtocolContext, global};
use crate::{AtrRecord, Field, FieldId, InterfaceByte, InterfaceKind};

/// Decode a normalized byte sequence into an [`AtrRecord`].
///
/// # Examples
/// ```
/// use atrlens_core::{normalize, parse_atr};
///
/// let bytes = normalize("3B A7 00 40 18 80 65 A2 08 01 01 52")?;
/// let record = parse_atr(&bytes)?;
/// assert_eq!(record.hb.value, [0x80, 0x65, 0xA2, 0x08, 0x01, 0x01, 0x52]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn parse_atr(bytes: &[u8]) -> Result<AtrRecord, DecodeError> {
    if bytes.len() < layout::MIN_LEN {
        return Err(DecodeError::TooShort {
            actual: bytes.len(),
        });
    }

    let ts = bytes[layout::TS_OFFSET];
    let t0 = bytes[layout::T0_OFFSET];
    let mut fields = BTreeMap::new();
    fields.insert(
        FieldId::Ts,
        Field {
            value: ts,
            description: global::ts(ts),
        },
    );
    fields.insert(
        FieldId::T0,
        Field {
            value: t0,
            description: global::t0(t0),
        },
    );

    let mut warnings = Vec::new();
    let mut reader = AtrReader::starting_at(bytes, layout::T0_OFFSET + 1);
    let mut ctx = ProtocolContext::new();
    let mut checksum_expected = false;
    let mut index = 1usize;
    let mut y = t0;

    'chain: loop {
        let mut next_y = None;
        for kind in InterfaceKind::ALL {
            if !layout::is_present(y, kind) {
                continue;
            }
            let field = InterfaceByte::new(kind, index);
            let Some(value) = reader.next_byte() else {
                warnings.push(AtrWarning::TruncatedInterfaceBytes { field });
                break 'chain;
            };
            debug!(%field, value, "interface byte");
            let description = interpret::describe(field, value, &mut ctx);
            fields.insert(FieldId::Interface(field), Field { value, description });
            if kind == InterfaceKind::D {
                if value & PROTOCOL_MASK != PROTOCOL_T0 {
                    checksum_expected = true;
                }
                next_y = Some(value);
            }
        }
        match next_y {
            Some(td) => {
                y = td;
                index += 1;
            }
            None => break,
        }
    }
    let pn = index;

    let hbn = usize::from(t0 & HISTORICAL_COUNT_MASK);
    let hb_bytes = reader.take_up_to(hbn);
    if hb_bytes.len() < hbn {
        warnings.push(AtrWarning::TruncatedHistoricalBytes {
            missing: hbn - hb_bytes.len(),
        });
    }
    let hb = analyze_historical_bytes(hb_bytes, &mut warnings);

    let checksum = if checksum_expected {
        let body_end = reader.position();
        let body = &bytes[layout::T0_OFFSET..body_end];
        let tck = reader.next_byte();
        let status = checksum::check(body, tck);
        match tck {
            Some(value) => {
                fields.insert(
                    FieldId::Tck,
                    Field {
                        value,
                        description: checksum::describe(&status),
                    },
                );
            }
            None => warnings.push(AtrWarning::MissingChecksum),
        }
        Some(status)
    } else {
        None
    };

    let extra = reader.remaining();
    let extra = if extra.is_empty() {
        None
    } else {
        debug!(len = extra.len(), "bytes past the end of the ATR");
        Some(extra.to_vec())
    };

    for warning in &warnings {
        warn!(%warning, "ATR anomaly");
    }

    Ok(AtrRecord {
        atr: bytes.to_vec(),
        fields,
        hbn,
        pn,
        hb,
        checksum,
        warnings: warnings.iter().map(ToString::to_string).collect(),
        extra,
    })
}
