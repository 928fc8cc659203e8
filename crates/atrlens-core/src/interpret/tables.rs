//! ISO/IEC 7816-3 lookup tables for the interface bytes.

/// Nominal clock used for the bit-rate figure reported with TA1.
pub const NOMINAL_CLOCK_HZ: u32 = 4_000_000;

/// Clock rate conversion integer Fi, indexed by TA1 high nibble. `None` is RFU.
pub const FI: [Option<u16>; 16] = [
    Some(372),
    Some(372),
    Some(558),
    Some(744),
    Some(1116),
    Some(1488),
    Some(1860),
    None,
    None,
    Some(512),
    Some(768),
    Some(1024),
    Some(1536),
    Some(2048),
    None,
    None,
];

/// Baud rate adjustment integer Di, indexed by TA1 low nibble. `None` is RFU.
pub const DI: [Option<u16>; 16] = [
    None,
    Some(1),
    Some(2),
    Some(4),
    Some(8),
    Some(16),
    Some(32),
    Some(64),
    Some(12),
    Some(20),
    None,
    None,
    None,
    None,
    None,
    None,
];

/// Maximum clock frequency in MHz for each Fi class.
pub const F_MAX_MHZ: [Option<f64>; 16] = [
    Some(4.0),
    Some(5.0),
    Some(6.0),
    Some(8.0),
    Some(12.0),
    Some(16.0),
    Some(20.0),
    None,
    None,
    Some(5.0),
    Some(7.5),
    Some(10.0),
    Some(15.0),
    Some(20.0),
    None,
    None,
];

/// Clock stop indicator (XI), top two bits of a class-encoding TAi.
pub const CLOCK_STOP: [&str; 4] = ["not supported", "state L", "state H", "no preference"];

/// Class indicator bits (UI), low five bits of a class-encoding TAi.
pub const CLASSES: [(u8, &str); 5] = [
    (0x01, "A 5V"),
    (0x02, "B 3V"),
    (0x04, "C 1.8V"),
    (0x08, "D RFU"),
    (0x10, "E RFU"),
];

/// Maximum programming current, TB1 bits 7-6.
pub const TB1_CURRENT: [&str; 4] = ["25 milliamperes", "50 milliamperes", "100 milliamperes", "RFU"];

/// Global interface TBi (i > 2) following T=15.
pub const GLOBAL_TB: [(u8, &str); 6] = [
    (0x00, "No additional global interface parameters supported"),
    (0x82, "Low impedance drivers and protocol available on the I/O line"),
    (0x88, "Secure channel supported"),
    (0x8C, "Secured APDU - Platform to Platform required"),
    (0x90, "UICC-CLF interface supported"),
    (0xA0, "Inter-Chip USB UICC-Terminal interface supported"),
];

pub(crate) const RFU: &str = "RFU";

pub(crate) fn fi(index: u8) -> Option<u16> {
    FI[usize::from(index & 0x0F)]
}

pub(crate) fn di(index: u8) -> Option<u16> {
    DI[usize::from(index & 0x0F)]
}

pub(crate) fn f_max(index: u8) -> Option<f64> {
    F_MAX_MHZ[usize::from(index & 0x0F)]
}

pub(crate) fn global_tb(value: u8) -> &'static str {
    GLOBAL_TB
        .iter()
        .find(|(v, _)| *v == value)
        .map(|(_, text)| *text)
        .unwrap_or(RFU)
}
