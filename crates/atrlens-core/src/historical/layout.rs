use serde::{Deserialize, Serialize};

pub const CATEGORY_TLV_WITH_STATUS: u8 = 0x00;
pub const CATEGORY_DIR_REFERENCE: u8 = 0x10;
pub const CATEGORY_TLV: u8 = 0x80;
pub const CATEGORY_RESERVED: std::ops::RangeInclusive<u8> = 0x81..=0x8F;

/// Length of the mandatory status trailer (LCS, SW1, SW2).
pub const STATUS_TRAILER_LEN: usize = 3;

pub const TAG_COUNTRY_CODE: u8 = 0x1;
pub const TAG_ISSUER_ID: u8 = 0x2;
pub const TAG_CARD_SERVICE: u8 = 0x3;
pub const TAG_INITIAL_ACCESS: u8 = 0x4;
pub const TAG_ISSUER_DATA: u8 = 0x5;
pub const TAG_PRE_ISSUING: u8 = 0x6;
pub const TAG_CAPABILITIES: u8 = 0x7;
pub const TAG_STATUS: u8 = 0x8;
pub const TAG_AID: u8 = 0xF;

/// Category indicator of the historical bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// `0x00`: compact TLV then LCS + status word.
    CompactTlvWithStatus,
    /// `0x80`: compact TLV only.
    CompactTlv,
    /// `0x10`: one DIR data reference byte.
    DirReference,
    /// `0x81`..=`0x8F`.
    Reserved(u8),
    Proprietary(u8),
}

impl Category {
    pub fn from_byte(value: u8) -> Self {
        match value {
            CATEGORY_TLV_WITH_STATUS => Category::CompactTlvWithStatus,
            CATEGORY_TLV => Category::CompactTlv,
            CATEGORY_DIR_REFERENCE => Category::DirReference,
            v if CATEGORY_RESERVED.contains(&v) => Category::Reserved(v),
            v => Category::Proprietary(v),
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Category::CompactTlvWithStatus | Category::CompactTlv => "compact TLV data object",
            Category::DirReference => "next byte is the DIR data reference",
            Category::Reserved(_) => "Reserved for future use",
            Category::Proprietary(_) => "proprietary format",
        }
    }
}
