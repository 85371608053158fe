//! NFC device host - controller lifecycle, firmware and command front end.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::config::HostConfig;
use crate::discovery::{DiscoveryCommand, DiscoveryParameters};
use crate::driver::ControllerDriver;
use crate::error::{HostError, LlcpError};
use crate::events::{DeviceHostListener, EventDispatcher};
use crate::firmware::{self, FirmwareArtifact, FirmwareStatus};
use crate::llcp::{self, LlcpConnectionlessSocket, LlcpServerSocket, LlcpSocket};
use crate::prefs::PreferenceStore;
use crate::routing::CardEmulationRouting;
use crate::state::ControllerState;

/// Host side of one NFC controller.
///
/// Owns the driver exclusively; every command goes through `&mut self`, so
/// at most one is in flight. Blocking calls (`initialize`, `check_firmware`,
/// `deinitialize`, socket creation) belong off latency-sensitive threads.
pub struct NfcDeviceHost<D, S, L>
where
    D: ControllerDriver,
    S: PreferenceStore,
    L: DeviceHostListener + ?Sized,
{
    driver: D,
    prefs: S,
    firmware: FirmwareArtifact,
    storage_dir: PathBuf,
    state: ControllerState,
    dispatcher: EventDispatcher<L>,
}

impl<D, S, L> NfcDeviceHost<D, S, L>
where
    D: ControllerDriver,
    S: PreferenceStore,
    L: DeviceHostListener + ?Sized,
{
    /// Create a host. `listener` receives every controller event for the
    /// lifetime of the host and is never replaced.
    pub fn new(config: &HostConfig, driver: D, prefs: S, listener: Arc<L>) -> Self {
        info!(driver = driver.name(), firmware = %config.firmware_path.display(), "Creating NFC device host");
        Self {
            driver,
            prefs,
            firmware: FirmwareArtifact::new(config.firmware_path.clone()),
            storage_dir: config.storage_dir.clone(),
            state: ControllerState::Uninitialized,
            dispatcher: EventDispatcher::new(listener),
        }
    }

    /// Driver name, e.g. `"nxp"`.
    pub fn name(&self) -> &str {
        self.driver.name()
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// Dispatcher for the driver's notification thread.
    pub fn dispatcher(&self) -> EventDispatcher<L> {
        self.dispatcher.clone()
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn preferences(&self) -> &S {
        &self.prefs
    }

    pub fn nfa_storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Initialize the controller. No retry; on failure the state is unchanged.
    #[instrument(skip(self))]
    pub fn initialize(&mut self) -> Result<(), HostError> {
        if self.driver.init() {
            self.state.goto(ControllerState::Ready);
            Ok(())
        } else {
            warn!(state = %self.state, "Controller initialization failed");
            Err(HostError::Initialization)
        }
    }

    /// Make sure the controller runs the firmware image currently on disk.
    pub fn check_firmware(&mut self) -> Result<FirmwareStatus, HostError> {
        firmware::check_firmware(
            &mut self.driver,
            &mut self.prefs,
            &self.firmware,
            &mut self.state,
        )
    }

    #[instrument(skip(self))]
    pub fn deinitialize(&mut self) -> Result<(), HostError> {
        if self.driver.deinit() {
            self.state.goto(ControllerState::Deinitialized);
            Ok(())
        } else {
            warn!(state = %self.state, "Controller deinitialization failed");
            Err(HostError::NativeCall {
                command: "deinitialize",
            })
        }
    }

    pub fn shutdown(&mut self) {
        self.state.goto(ControllerState::ShuttingDown);
        self.driver.shutdown();
    }

    pub fn factory_reset(&mut self) {
        self.driver.factory_reset();
    }

    pub fn enable_dta_mode(&mut self) {
        self.driver.enable_dta_mode();
    }

    pub fn disable_dta_mode(&mut self) {
        debug!("Disabling DTA mode");
        self.driver.disable_dta_mode();
    }

    // ========================================================================
    // Discovery
    // ========================================================================

    /// Start (or restart) discovery. The controller must be initialized.
    pub fn enable_discovery(&mut self, params: &DiscoveryParameters, restart: bool) {
        if !self.state.is_ready() {
            warn!(state = %self.state, "Enabling discovery on a controller that is not ready");
        }
        let command = DiscoveryCommand::translate(params, restart);
        debug!(?command, "Enabling discovery");
        command.send(&mut self.driver);
    }

    pub fn disable_discovery(&mut self) {
        self.driver.disable_discovery();
    }

    pub fn set_screen_state(&mut self, mask: u32) {
        self.driver.set_screen_state(mask);
    }

    pub fn start_stop_polling(&mut self, start: bool) {
        self.driver.start_stop_polling(start);
    }

    pub fn set_p2p_initiator_modes(&mut self, modes: u32) {
        self.driver.set_p2p_initiator_modes(modes);
    }

    pub fn set_p2p_target_modes(&mut self, modes: u32) {
        self.driver.set_p2p_target_modes(modes);
    }

    pub fn set_nfcee_power_and_link_ctrl(&mut self, enable: bool) {
        self.driver.set_nfcee_power_and_link_ctrl(enable);
    }

    // ========================================================================
    // LLCP sockets
    // ========================================================================

    pub fn create_llcp_connectionless_socket(
        &mut self,
        sap: u8,
        service_name: Option<&str>,
    ) -> Result<LlcpConnectionlessSocket, LlcpError> {
        llcp::create_connectionless_socket(&mut self.driver, sap, service_name)
    }

    pub fn create_llcp_server_socket(
        &mut self,
        sap: u8,
        service_name: Option<&str>,
        miu: u32,
        rw: u32,
        linear_buffer_length: u32,
    ) -> Result<LlcpServerSocket, LlcpError> {
        llcp::create_server_socket(
            &mut self.driver,
            sap,
            service_name,
            miu,
            rw,
            linear_buffer_length,
        )
    }

    pub fn create_llcp_socket(
        &mut self,
        sap: u8,
        miu: u32,
        rw: u32,
        linear_buffer_length: u32,
    ) -> Result<LlcpSocket, LlcpError> {
        llcp::create_client_socket(&mut self.driver, sap, miu, rw, linear_buffer_length)
    }

    /// Check the LLCP parameters offered by the connected peer.
    pub fn check_llcp(&mut self) -> Result<(), HostError> {
        if self.driver.check_llcp() {
            Ok(())
        } else {
            Err(HostError::NativeCall {
                command: "check_llcp",
            })
        }
    }

    /// Bring up the LLCP link once the peer parameters checked out.
    pub fn activate_llcp(&mut self) -> Result<(), HostError> {
        if self.driver.activate_llcp() {
            debug!("LLCP link activated");
            Ok(())
        } else {
            Err(HostError::NativeCall {
                command: "activate_llcp",
            })
        }
    }

    // ========================================================================
    // Misc pass-through
    // ========================================================================

    pub fn nci_version(&mut self) -> i32 {
        self.driver.nci_version()
    }

    pub fn set_timeout(&mut self, technology: u32, timeout_ms: u32) -> Result<(), HostError> {
        if self.driver.set_timeout(technology, timeout_ms) {
            Ok(())
        } else {
            Err(HostError::NativeCall {
                command: "set_timeout",
            })
        }
    }

    pub fn timeout(&mut self, technology: u32) -> i32 {
        self.driver.timeout(technology)
    }

    pub fn reset_timeouts(&mut self) {
        self.driver.reset_timeouts();
    }

    pub fn abort(&mut self, message: &str) {
        self.driver.abort(message);
    }

    /// Raw frames are not supported by this controller.
    pub fn send_raw_frame(&mut self, _data: &[u8]) -> bool {
        false
    }

    /// Secure NFC needs no controller action here.
    pub fn set_nfc_secure(&mut self, _enable: bool) -> bool {
        true
    }
}

impl<D, S, L> CardEmulationRouting for NfcDeviceHost<D, S, L>
where
    D: ControllerDriver,
    S: PreferenceStore,
    L: DeviceHostListener + ?Sized,
{
}
