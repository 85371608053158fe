//! Fixed values of the NXP device host.

// ============================================================================
// Driver identity
// ============================================================================

/// Name reported by the NXP controller variant.
pub const NXP_DRIVER_NAME: &str = "nxp";

// ============================================================================
// Firmware
// ============================================================================

/// Default location of the PN544 firmware image.
pub const NFC_CONTROLLER_FIRMWARE_FILE_NAME: &str = "/vendor/firmware/libpn544_fw.so";

/// Download attempts made per currency check before giving up.
pub const MAX_FIRMWARE_DOWNLOAD_ATTEMPTS: u32 = 5;

// ============================================================================
// Preferences
// ============================================================================

/// Preference namespace owned by the device host.
pub const PREF_NAMESPACE: &str = "NxpDeviceHost";

/// Key of the last successfully applied firmware modification time.
pub const PREF_FIRMWARE_MODTIME: &str = "firmware_modtime";

/// Value returned for `PREF_FIRMWARE_MODTIME` when nothing was ever applied.
pub const FIRMWARE_MODTIME_DEFAULT: i64 = -1;

// ============================================================================
// LLCP
// ============================================================================

/// Default LLCP maximum information unit.
pub const DEFAULT_LLCP_MIU: u32 = 128;

/// Default LLCP receive window size.
pub const DEFAULT_LLCP_RWSIZE: u32 = 1;

// ============================================================================
// Discovery technology bits
// ============================================================================

pub const NFC_POLL_A: u32 = 0x01;
pub const NFC_POLL_B: u32 = 0x02;
pub const NFC_POLL_F: u32 = 0x04;
pub const NFC_POLL_ISO15693: u32 = 0x08;
pub const NFC_POLL_B_PRIME: u32 = 0x10;
pub const NFC_POLL_KOVIO: u32 = 0x20;

/// Every polling technology this host knows about.
pub const NFC_POLL_ALL: u32 = NFC_POLL_A
    | NFC_POLL_B
    | NFC_POLL_F
    | NFC_POLL_ISO15693
    | NFC_POLL_B_PRIME
    | NFC_POLL_KOVIO;
