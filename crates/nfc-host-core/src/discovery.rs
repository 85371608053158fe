//! Discovery parameters and their translation into the native discovery call.

use std::fmt;

use crate::driver::ControllerDriver;
use crate::protocol::{
    NFC_POLL_A, NFC_POLL_ALL, NFC_POLL_B, NFC_POLL_B_PRIME, NFC_POLL_F, NFC_POLL_ISO15693,
    NFC_POLL_KOVIO,
};

/// Set of polling technologies.
///
/// Bits are forwarded to the controller untouched; unknown bits are kept.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TechMask(u32);

impl TechMask {
    pub const NONE: TechMask = TechMask(0);
    pub const A: TechMask = TechMask(NFC_POLL_A);
    pub const B: TechMask = TechMask(NFC_POLL_B);
    pub const F: TechMask = TechMask(NFC_POLL_F);
    pub const ISO15693: TechMask = TechMask(NFC_POLL_ISO15693);
    pub const B_PRIME: TechMask = TechMask(NFC_POLL_B_PRIME);
    pub const KOVIO: TechMask = TechMask(NFC_POLL_KOVIO);
    /// Every technology the controller can poll for.
    pub const ALL: TechMask = TechMask(NFC_POLL_ALL);

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(&self) -> u32 {
        self.0
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub const fn contains(&self, other: TechMask) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for TechMask {
    type Output = TechMask;

    fn bitor(self, rhs: TechMask) -> TechMask {
        TechMask(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for TechMask {
    fn bitor_assign(&mut self, rhs: TechMask) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for TechMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TechMask(0x{:02X})", self.0)
    }
}

/// What a discovery session should look for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoveryParameters {
    tech_mask: TechMask,
    low_power_polling: bool,
    reader_mode: bool,
    p2p: bool,
}

impl Default for DiscoveryParameters {
    fn default() -> Self {
        Self {
            tech_mask: TechMask::NONE,
            low_power_polling: true,
            reader_mode: false,
            p2p: false,
        }
    }
}

impl DiscoveryParameters {
    pub fn new(tech_mask: TechMask, low_power_polling: bool, reader_mode: bool, p2p: bool) -> Self {
        Self {
            tech_mask,
            low_power_polling,
            reader_mode,
            p2p,
        }
    }

    pub fn builder() -> DiscoveryParametersBuilder {
        DiscoveryParametersBuilder::default()
    }

    /// Parameters used while NFC is off: nothing polled.
    pub fn nfc_off() -> Self {
        Self::default()
    }

    pub fn tech_mask(&self) -> TechMask {
        self.tech_mask
    }

    pub fn low_power_polling(&self) -> bool {
        self.low_power_polling
    }

    pub fn reader_mode(&self) -> bool {
        self.reader_mode
    }

    pub fn p2p(&self) -> bool {
        self.p2p
    }

    /// Whether these parameters ask for any discovery at all.
    pub fn should_enable_discovery(&self) -> bool {
        !self.tech_mask.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct DiscoveryParametersBuilder {
    params: DiscoveryParameters,
}

impl DiscoveryParametersBuilder {
    pub fn tech_mask(mut self, mask: TechMask) -> Self {
        self.params.tech_mask = mask;
        self
    }

    pub fn low_power_polling(mut self, enable: bool) -> Self {
        self.params.low_power_polling = enable;
        self
    }

    pub fn reader_mode(mut self, enable: bool) -> Self {
        self.params.reader_mode = enable;
        self
    }

    pub fn p2p(mut self, enable: bool) -> Self {
        self.params.p2p = enable;
        self
    }

    pub fn build(self) -> DiscoveryParameters {
        self.params
    }
}

/// Positional arguments of the native discovery-enable call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoveryCommand {
    pub tech_mask: u32,
    pub low_power_polling: bool,
    pub reader_mode: bool,
    pub p2p: bool,
    pub restart: bool,
}

impl DiscoveryCommand {
    /// Translate parameters plus restart flag. Total; nothing is validated.
    pub fn translate(params: &DiscoveryParameters, restart: bool) -> Self {
        Self {
            tech_mask: params.tech_mask.bits(),
            low_power_polling: params.low_power_polling,
            reader_mode: params.reader_mode,
            p2p: params.p2p,
            restart,
        }
    }

    /// Send to the controller.
    pub fn send<D: ControllerDriver + ?Sized>(&self, driver: &mut D) {
        driver.set_discovery(
            self.tech_mask,
            self.low_power_polling,
            self.reader_mode,
            self.p2p,
            self.restart,
        );
    }
}
