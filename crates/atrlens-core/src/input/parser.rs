use tracing::trace;

use super::error::NormalizeError;

const SEPARATORS: [char; 2] = [':', ' '];

/// Parse a hex string, optionally `:`- or space-separated, into bytes.
///
/// # Examples
/// ```
/// use atrlens_core::normalize;
///
/// let bytes = normalize("3B:A7:00:40")?;
/// assert_eq!(bytes, vec![0x3B, 0xA7, 0x00, 0x40]);
/// # Ok::<(), atrlens_core::NormalizeError>(())
/// ```
pub fn normalize(input: &str) -> Result<Vec<u8>, NormalizeError> {
    let digits: Vec<char> = input
        .chars()
        .filter(|c| !SEPARATORS.contains(c) && !c.is_whitespace())
        .collect();
    if digits.len() % 2 != 0 {
        return Err(NormalizeError::OddLength {
            digits: digits.len(),
        });
    }

    let bytes = digits
        .chunks(2)
        .map(|pair| {
            let hi = pair[0].to_digit(16);
            let lo = pair[1].to_digit(16);
            match (hi, lo) {
                (Some(hi), Some(lo)) => Ok(((hi << 4) | lo) as u8),
                _ => Err(NormalizeError::InvalidDigit {
                    token: pair.iter().collect(),
                }),
            }
        })
        .collect::<Result<Vec<u8>, _>>()?;
    trace!(len = bytes.len(), "normalized ATR");
    Ok(bytes)
}

/// Render bytes as uppercase, space-separated hex (`"3B A7 00"`).
pub fn to_hex_string(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}
