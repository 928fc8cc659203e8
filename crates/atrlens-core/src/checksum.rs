//! TCK validation.
//!
//! TCK makes the XOR of every byte from T0 to TCK inclusive equal to zero, so
//! the expected TCK is the XOR of T0 through the last historical byte.

use serde::{Deserialize, Serialize};

use crate::message::Message;

/// Checksum verdict for an ATR that announced a protocol other than T=0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChecksumStatus {
    Valid,
    Mismatch { expected: u8 },
    /// TCK was expected but the input ended first.
    Missing { expected: u8 },
}

pub fn xor_fold(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0, |acc, b| acc ^ b)
}

/// Expected TCK for the bytes T0 through the last historical byte.
///
/// # Examples
/// ```
/// use atrlens_core::{expected_tck, normalize, xor_fold};
///
/// let atr = normalize("3B 8E 80 01 80 31 80 66 B1 84 0C 01 6E 01 83 00 90 00 1C")?;
/// let (body, tck) = atr[1..].split_at(atr.len() - 2);
/// assert_eq!(expected_tck(body), tck[0]);
/// assert_eq!(xor_fold(&atr[1..]), 0);
/// # Ok::<(), atrlens_core::NormalizeError>(())
/// ```
pub fn expected_tck(body: &[u8]) -> u8 {
    xor_fold(body)
}

pub(crate) fn check(body: &[u8], tck: Option<u8>) -> ChecksumStatus {
    let expected = expected_tck(body);
    match tck {
        Some(value) if value == expected => ChecksumStatus::Valid,
        Some(_) => ChecksumStatus::Mismatch { expected },
        None => ChecksumStatus::Missing { expected },
    }
}

pub(crate) fn describe(status: &ChecksumStatus) -> Vec<Message> {
    match status {
        ChecksumStatus::Valid => vec![Message::new("correct checksum")],
        ChecksumStatus::Mismatch { expected } | ChecksumStatus::Missing { expected } => {
            vec![Message::new("WRONG CHECKSUM, expected 0x%X").arg(*expected)]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_with_correct_tck_is_zero() {
        let body = [0xFF, 0x95, 0x00, 0xFF, 0x91, 0x81, 0x71];
        let tck = expected_tck(&body);
        let mut all = body.to_vec();
        all.push(tck);
        assert_eq!(xor_fold(&all), 0);
        assert_eq!(check(&body, Some(tck)), ChecksumStatus::Valid);
    }

    #[test]
    fn altered_tck_reports_expected_value() {
        let body = [0x80, 0x01];
        let status = check(&body, Some(0x00));
        assert_eq!(status, ChecksumStatus::Mismatch { expected: 0x81 });
        assert_eq!(describe(&status)[0].render(), "WRONG CHECKSUM, expected 0x81");
    }

    #[test]
    fn missing_tck_keeps_expected() {
        assert_eq!(check(&[0x80, 0x01], None), ChecksumStatus::Missing { expected: 0x81 });
    }
}
