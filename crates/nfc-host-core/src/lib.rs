//! NFC-Host-Core: host-side abstraction over an NXP NFC controller.
//!
//! This crate sits between a device-independent NFC stack and the native
//! command surface of one controller: it brings the controller up and down,
//! keeps its firmware current, turns discovery intent into controller
//! commands, creates LLCP sockets and routes controller events to a single
//! listener.
//!
//! # Architecture
//!
//! The crate is organized into layers:
//!
//! - **Driver**: `ControllerDriver` trait over the native stack (vendor drivers, simulator)
//! - **Protocol**: Native error codes and fixed host values
//! - **Firmware**: Currency check and bounded download retry
//! - **Discovery**: Discovery parameters and their translation
//! - **LLCP**: Socket creation with failure classification
//! - **Events**: Listener trait and dispatcher
//! - **Host**: `NfcDeviceHost`, the front end tying it together
//! - **Caps / Routing**: Static capabilities and the unsupported routing surface
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use nfc_host_core::{HostConfig, NfcDeviceHost, SimulatedDriver, TomlPreferenceStore, TracingListener};
//!
//! let config = HostConfig::default();
//! let prefs = TomlPreferenceStore::open(&config.preferences_path).expect("preferences");
//! let mut host = NfcDeviceHost::new(&config, SimulatedDriver::new(), prefs, Arc::new(TracingListener));
//!
//! host.check_firmware().expect("firmware check failed");
//! host.initialize().expect("controller init failed");
//! ```

pub mod caps;
pub mod config;
pub mod discovery;
pub mod driver;
pub mod error;
pub mod events;
pub mod firmware;
pub mod host;
pub mod llcp;
pub mod prefs;
pub mod protocol;
pub mod routing;
pub mod state;

// Re-exports for convenience
pub use caps::TagTechnology;
pub use config::HostConfig;
pub use discovery::{DiscoveryCommand, DiscoveryParameters, TechMask};
pub use driver::{ControllerDriver, DriverCommand, NativeSocket, SimulatedDriver};
pub use error::{HostError, LlcpError, PrefsError};
pub use events::{
    ChannelListener, DeviceHostListener, EventDispatcher, HostEvent, NativeP2pDevice, NativeTag,
    NullListener, TracingListener,
};
pub use firmware::{FirmwareArtifact, FirmwareRecord, FirmwareStatus};
pub use host::NfcDeviceHost;
pub use llcp::{LlcpConnectionlessSocket, LlcpServerSocket, LlcpSocket, LlcpSocketKind};
pub use prefs::{MemoryPreferenceStore, PreferenceStore, TomlPreferenceStore};
pub use protocol::ErrorCode;
pub use routing::CardEmulationRouting;
pub use state::ControllerState;
