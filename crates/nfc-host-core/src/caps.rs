//! Static capabilities of the PN544 controller.
//!
//! Pure lookups; nothing here talks to the controller.

use std::fmt;

use crate::protocol::{DEFAULT_LLCP_MIU, DEFAULT_LLCP_RWSIZE};

/// Tag technologies, numbered as the platform numbers them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum TagTechnology {
    NfcA = 1,
    NfcB = 2,
    IsoDep = 3,
    NfcF = 4,
    NfcV = 5,
    Ndef = 6,
    NdefFormatable = 7,
    MifareClassic = 8,
    MifareUltralight = 9,
    NfcBarcode = 10,
}

impl TagTechnology {
    pub const ALL: [TagTechnology; 10] = [
        TagTechnology::NfcA,
        TagTechnology::NfcB,
        TagTechnology::IsoDep,
        TagTechnology::NfcF,
        TagTechnology::NfcV,
        TagTechnology::Ndef,
        TagTechnology::NdefFormatable,
        TagTechnology::MifareClassic,
        TagTechnology::MifareUltralight,
        TagTechnology::NfcBarcode,
    ];

    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|t| *t as u32 == code)
    }
}

impl fmt::Display for TagTechnology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagTechnology::NfcA => write!(f, "NfcA"),
            TagTechnology::NfcB => write!(f, "NfcB"),
            TagTechnology::IsoDep => write!(f, "IsoDep"),
            TagTechnology::NfcF => write!(f, "NfcF"),
            TagTechnology::NfcV => write!(f, "NfcV"),
            TagTechnology::Ndef => write!(f, "Ndef"),
            TagTechnology::NdefFormatable => write!(f, "NdefFormatable"),
            TagTechnology::MifareClassic => write!(f, "MifareClassic"),
            TagTechnology::MifareUltralight => write!(f, "MifareUltralight"),
            TagTechnology::NfcBarcode => write!(f, "NfcBarcode"),
        }
    }
}

/// NDEF tag types, numbered as the platform numbers them.
pub const NDEF_TYPE_1: i32 = 1;
pub const NDEF_TYPE_2: i32 = 2;
pub const NDEF_TYPE_3: i32 = 3;
pub const NDEF_TYPE_4: i32 = 4;
pub const NDEF_TYPE_MIFARE_CLASSIC: i32 = 101;

/// Largest frame `transceive` accepts for `technology`; 0 if unsupported.
pub fn max_transceive_length(technology: TagTechnology) -> usize {
    match technology {
        // 255-byte RF buffer minus two CRC bytes
        TagTechnology::NfcA | TagTechnology::MifareClassic | TagTechnology::MifareUltralight => {
            253
        }
        TagTechnology::NfcV => 253,
        // CLA INS P1 P2 LC LE + 255 payload; split in two RF frames. No extended length.
        TagTechnology::IsoDep => 261,
        // Minus SoD and CRC
        TagTechnology::NfcF => 252,
        // Raw NfcB transceive is not supported
        TagTechnology::NfcB => 0,
        _ => 0,
    }
}

/// Whether tags of `ndef_type` can be made read-only.
pub fn can_make_read_only(ndef_type: i32) -> bool {
    matches!(ndef_type, NDEF_TYPE_1 | NDEF_TYPE_2 | NDEF_TYPE_MIFARE_CLASSIC)
}

pub fn default_llcp_miu() -> u32 {
    DEFAULT_LLCP_MIU
}

pub fn default_llcp_rw_size() -> u32 {
    DEFAULT_LLCP_RWSIZE
}

pub fn extended_length_apdus_supported() -> bool {
    false
}

/// Screen-off suspend (snooze) is not available on NXP silicon.
pub fn enable_screen_off_suspend() -> bool {
    false
}

pub fn disable_screen_off_suspend() -> bool {
    true
}

pub fn aid_table_size() -> usize {
    0
}

/// Listen-mode Type 3 tag identifiers the controller can hold.
pub fn lf_t3t_max() -> usize {
    0
}
