//! Simulated controller driver.
//!
//! Scriptable stand-in for the native stack, used by unit tests and by the
//! CLI. Clones share state, so a test can keep one clone to inspect while the
//! host owns the other.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use super::traits::{ControllerDriver, NativeSocket};
use crate::protocol::{ErrorCode, NXP_DRIVER_NAME};

/// A command received by the simulated driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverCommand {
    Init,
    Deinit,
    Shutdown,
    DownloadFirmware,
    GetLastError,
    CreateConnectionlessSocket {
        sap: u8,
        service_name: Option<String>,
    },
    CreateServerSocket {
        sap: u8,
        service_name: Option<String>,
        miu: u32,
        rw: u32,
        linear_buffer_length: u32,
    },
    CreateClientSocket {
        sap: u8,
        miu: u32,
        rw: u32,
        linear_buffer_length: u32,
    },
    SetDiscovery {
        tech_mask: u32,
        low_power_polling: bool,
        reader_mode: bool,
        p2p: bool,
        restart: bool,
    },
    DisableDiscovery,
    SetScreenState(u32),
    EnableDtaMode,
    DisableDtaMode,
    FactoryReset,
    NciVersion,
    CheckLlcp,
    ActivateLlcp,
    StartStopPolling(bool),
    SetNfceePowerAndLinkCtrl(bool),
    SetP2pInitiatorModes(u32),
    SetP2pTargetModes(u32),
    SetTimeout { technology: u32, timeout_ms: u32 },
    GetTimeout(u32),
    ResetTimeouts,
    Abort(String),
}

#[derive(Debug)]
struct SimState {
    init_result: bool,
    deinit_result: bool,
    /// Scripted download outcomes, consumed front first.
    download_script: VecDeque<bool>,
    /// Outcome once the script is exhausted.
    download_default: bool,
    /// Scripted socket creation outcomes; `Err` carries the last-error value to report.
    socket_script: VecDeque<Result<(), ErrorCode>>,
    next_handle: u32,
    last_error: ErrorCode,
    nci_version: i32,
    /// Result of `check_llcp` and `activate_llcp`.
    llcp_result: bool,
    timeouts: HashMap<u32, i32>,
    log: Vec<DriverCommand>,
}

impl Default for SimState {
    fn default() -> Self {
        Self {
            init_result: true,
            deinit_result: true,
            download_script: VecDeque::new(),
            download_default: true,
            socket_script: VecDeque::new(),
            next_handle: 1,
            last_error: ErrorCode::SUCCESS,
            nci_version: 0x10,
            llcp_result: true,
            timeouts: HashMap::new(),
            log: Vec::new(),
        }
    }
}

/// In-process controller driver with scripted results.
#[derive(Debug, Clone, Default)]
pub struct SimulatedDriver {
    state: Arc<Mutex<SimState>>,
}

impl SimulatedDriver {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SimState> {
        // A panicking test thread must not hide the log from the others.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(&self, command: DriverCommand) {
        self.lock().log.push(command);
    }

    /// Result returned by the next `init` calls.
    pub fn set_init_result(&self, ok: bool) {
        self.lock().init_result = ok;
    }

    /// Result returned by the next `deinit` calls.
    pub fn set_deinit_result(&self, ok: bool) {
        self.lock().deinit_result = ok;
    }

    /// Queue download outcomes, returned in order.
    pub fn queue_downloads(&self, outcomes: &[bool]) {
        self.lock().download_script.extend(outcomes.iter().copied());
    }

    /// Outcome of downloads once the queue is empty.
    pub fn set_download_default(&self, ok: bool) {
        self.lock().download_default = ok;
    }

    /// Make the next socket creation fail and report `error` as last error.
    pub fn queue_socket_failure(&self, error: ErrorCode) {
        self.lock().socket_script.push_back(Err(error));
    }

    /// Make the next socket creation succeed.
    pub fn queue_socket_success(&self) {
        self.lock().socket_script.push_back(Ok(()));
    }

    /// Result returned by the next `check_llcp`/`activate_llcp` calls.
    pub fn set_llcp_result(&self, ok: bool) {
        self.lock().llcp_result = ok;
    }

    /// Get all commands received so far.
    pub fn commands(&self) -> Vec<DriverCommand> {
        self.lock().log.clone()
    }

    /// Clear the command log.
    pub fn clear_commands(&self) {
        self.lock().log.clear();
    }

    /// Number of firmware download attempts received.
    pub fn download_count(&self) -> usize {
        self.lock()
            .log
            .iter()
            .filter(|c| matches!(c, DriverCommand::DownloadFirmware))
            .count()
    }

    fn create_socket(&self, command: DriverCommand) -> Option<NativeSocket> {
        let mut state = self.lock();
        state.log.push(command);
        match state.socket_script.pop_front().unwrap_or(Ok(())) {
            Ok(()) => {
                let handle = state.next_handle;
                state.next_handle += 1;
                Some(NativeSocket(handle))
            }
            Err(error) => {
                state.last_error = error;
                None
            }
        }
    }
}

impl ControllerDriver for SimulatedDriver {
    fn name(&self) -> &str {
        NXP_DRIVER_NAME
    }

    fn init(&mut self) -> bool {
        let mut state = self.lock();
        state.log.push(DriverCommand::Init);
        if !state.init_result {
            state.last_error = ErrorCode::ERROR_IO;
        }
        state.init_result
    }

    fn deinit(&mut self) -> bool {
        let mut state = self.lock();
        state.log.push(DriverCommand::Deinit);
        state.deinit_result
    }

    fn shutdown(&mut self) {
        self.record(DriverCommand::Shutdown);
    }

    fn download_firmware(&mut self) -> bool {
        let mut state = self.lock();
        state.log.push(DriverCommand::DownloadFirmware);
        let default = state.download_default;
        state.download_script.pop_front().unwrap_or(default)
    }

    fn last_error(&mut self) -> ErrorCode {
        let mut state = self.lock();
        state.log.push(DriverCommand::GetLastError);
        state.last_error
    }

    fn create_connectionless_socket(
        &mut self,
        sap: u8,
        service_name: Option<&str>,
    ) -> Option<NativeSocket> {
        self.create_socket(DriverCommand::CreateConnectionlessSocket {
            sap,
            service_name: service_name.map(str::to_owned),
        })
    }

    fn create_server_socket(
        &mut self,
        sap: u8,
        service_name: Option<&str>,
        miu: u32,
        rw: u32,
        linear_buffer_length: u32,
    ) -> Option<NativeSocket> {
        self.create_socket(DriverCommand::CreateServerSocket {
            sap,
            service_name: service_name.map(str::to_owned),
            miu,
            rw,
            linear_buffer_length,
        })
    }

    fn create_client_socket(
        &mut self,
        sap: u8,
        miu: u32,
        rw: u32,
        linear_buffer_length: u32,
    ) -> Option<NativeSocket> {
        self.create_socket(DriverCommand::CreateClientSocket {
            sap,
            miu,
            rw,
            linear_buffer_length,
        })
    }

    fn set_discovery(
        &mut self,
        tech_mask: u32,
        low_power_polling: bool,
        reader_mode: bool,
        p2p: bool,
        restart: bool,
    ) {
        self.record(DriverCommand::SetDiscovery {
            tech_mask,
            low_power_polling,
            reader_mode,
            p2p,
            restart,
        });
    }

    fn disable_discovery(&mut self) {
        self.record(DriverCommand::DisableDiscovery);
    }

    fn set_screen_state(&mut self, mask: u32) {
        self.record(DriverCommand::SetScreenState(mask));
    }

    fn enable_dta_mode(&mut self) {
        self.record(DriverCommand::EnableDtaMode);
    }

    fn disable_dta_mode(&mut self) {
        self.record(DriverCommand::DisableDtaMode);
    }

    fn factory_reset(&mut self) {
        self.record(DriverCommand::FactoryReset);
    }

    fn nci_version(&mut self) -> i32 {
        let mut state = self.lock();
        state.log.push(DriverCommand::NciVersion);
        state.nci_version
    }

    fn check_llcp(&mut self) -> bool {
        let mut state = self.lock();
        state.log.push(DriverCommand::CheckLlcp);
        state.llcp_result
    }

    fn activate_llcp(&mut self) -> bool {
        let mut state = self.lock();
        state.log.push(DriverCommand::ActivateLlcp);
        state.llcp_result
    }

    fn start_stop_polling(&mut self, start: bool) {
        self.record(DriverCommand::StartStopPolling(start));
    }

    fn set_nfcee_power_and_link_ctrl(&mut self, enable: bool) {
        self.record(DriverCommand::SetNfceePowerAndLinkCtrl(enable));
    }

    fn set_p2p_initiator_modes(&mut self, modes: u32) {
        self.record(DriverCommand::SetP2pInitiatorModes(modes));
    }

    fn set_p2p_target_modes(&mut self, modes: u32) {
        self.record(DriverCommand::SetP2pTargetModes(modes));
    }

    fn set_timeout(&mut self, technology: u32, timeout_ms: u32) -> bool {
        let mut state = self.lock();
        state.log.push(DriverCommand::SetTimeout {
            technology,
            timeout_ms,
        });
        match i32::try_from(timeout_ms) {
            Ok(ms) => {
                state.timeouts.insert(technology, ms);
                true
            }
            Err(_) => {
                state.last_error = ErrorCode::ERROR_INVALID_PARAM;
                false
            }
        }
    }

    fn timeout(&mut self, technology: u32) -> i32 {
        let mut state = self.lock();
        state.log.push(DriverCommand::GetTimeout(technology));
        state.timeouts.get(&technology).copied().unwrap_or(0)
    }

    fn reset_timeouts(&mut self) {
        let mut state = self.lock();
        state.log.push(DriverCommand::ResetTimeouts);
        state.timeouts.clear();
    }

    fn abort(&mut self, message: &str) {
        self.record(DriverCommand::Abort(message.to_owned()));
    }
}
