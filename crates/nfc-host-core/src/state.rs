//! Controller lifecycle state.

use std::fmt;

/// Lifecycle state of the NFC controller as seen by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControllerState {
    /// Nothing sent to the controller yet.
    #[default]
    Uninitialized,
    /// Controller initialized, or firmware freshly applied.
    Ready,
    /// Firmware download loop running. Never observable once a check returns.
    Downloading,
    /// Shutdown command sent.
    ShuttingDown,
    /// Controller torn down; may be initialized again.
    Deinitialized,
}

impl fmt::Display for ControllerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControllerState::Uninitialized => write!(f, "UNINITIALIZED"),
            ControllerState::Ready => write!(f, "READY"),
            ControllerState::Downloading => write!(f, "DOWNLOADING"),
            ControllerState::ShuttingDown => write!(f, "SHUTTING_DOWN"),
            ControllerState::Deinitialized => write!(f, "DEINITIALIZED"),
        }
    }
}

impl ControllerState {
    /// Whether the controller is initialized or its firmware was freshly applied.
    pub fn is_ready(&self) -> bool {
        matches!(self, ControllerState::Ready)
    }

    /// Transition to a new state.
    pub(crate) fn goto(&mut self, new_state: ControllerState) {
        if *self != new_state {
            tracing::info!(from = %self, to = %new_state, "Controller state transition");
        }
        *self = new_state;
    }
}
