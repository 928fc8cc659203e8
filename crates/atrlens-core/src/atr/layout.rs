pub const TS_OFFSET: usize = 0;
pub const T0_OFFSET: usize = 1;
pub const MIN_LEN: usize = 2;

/// Presence bits of the Y nibble (T0 or TDi), one per interface byte letter.
pub const TA_PRESENT: u8 = 0x10;
pub const TB_PRESENT: u8 = 0x20;
pub const TC_PRESENT: u8 = 0x40;
pub const TD_PRESENT: u8 = 0x80;

pub const HISTORICAL_COUNT_MASK: u8 = 0x0F;
pub const PROTOCOL_MASK: u8 = 0x0F;
pub const PROTOCOL_T0: u8 = 0;

use crate::InterfaceKind;

pub const fn presence_bit(kind: InterfaceKind) -> u8 {
    match kind {
        InterfaceKind::A => TA_PRESENT,
        InterfaceKind::B => TB_PRESENT,
        InterfaceKind::C => TC_PRESENT,
        InterfaceKind::D => TD_PRESENT,
    }
}

/// True when `y` (T0 or TDi) announces the interface byte `kind`.
pub const fn is_present(y: u8, kind: InterfaceKind) -> bool {
    (y | !presence_bit(kind)) == 0xFF
}
