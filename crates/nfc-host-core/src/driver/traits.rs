//! Controller driver abstraction.
//!
//! Defines the `ControllerDriver` trait, the synchronous command surface of
//! the native NFC stack, allowing different implementations (vendor drivers,
//! the in-process simulator, etc.).

use crate::protocol::ErrorCode;

/// Opaque handle to a socket created by the native stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeSocket(pub u32);

/// Abstract controller driver interface.
///
/// Every call blocks until the controller answers. Methods take `&mut self`:
/// the host owns its driver exclusively and issues one command at a time.
///
/// Creation calls return `None` on failure; the reason is then available from
/// [`ControllerDriver::last_error`] until the next call.
pub trait ControllerDriver: Send {
    /// Driver name, e.g. `"nxp"`.
    fn name(&self) -> &str;

    /// Bring the controller up.
    fn init(&mut self) -> bool;

    /// Tear the controller down.
    fn deinit(&mut self) -> bool;

    /// Power the controller off for system shutdown.
    fn shutdown(&mut self);

    /// Push the firmware image to the controller.
    fn download_firmware(&mut self) -> bool;

    /// Last error recorded by the driver. Only meaningful right after a failed call.
    fn last_error(&mut self) -> ErrorCode;

    fn create_connectionless_socket(
        &mut self,
        sap: u8,
        service_name: Option<&str>,
    ) -> Option<NativeSocket>;

    fn create_server_socket(
        &mut self,
        sap: u8,
        service_name: Option<&str>,
        miu: u32,
        rw: u32,
        linear_buffer_length: u32,
    ) -> Option<NativeSocket>;

    fn create_client_socket(
        &mut self,
        sap: u8,
        miu: u32,
        rw: u32,
        linear_buffer_length: u32,
    ) -> Option<NativeSocket>;

    /// Enable polling/listening with the given positional parameters.
    fn set_discovery(
        &mut self,
        tech_mask: u32,
        low_power_polling: bool,
        reader_mode: bool,
        p2p: bool,
        restart: bool,
    );

    fn disable_discovery(&mut self);

    fn set_screen_state(&mut self, mask: u32);

    fn enable_dta_mode(&mut self);

    fn disable_dta_mode(&mut self);

    fn factory_reset(&mut self);

    fn nci_version(&mut self) -> i32;

    /// Check the LLCP parameters of the remote peer.
    fn check_llcp(&mut self) -> bool;

    /// Activate the LLCP link over the current P2P connection.
    fn activate_llcp(&mut self) -> bool;

    fn start_stop_polling(&mut self, start: bool);

    fn set_nfcee_power_and_link_ctrl(&mut self, enable: bool);

    fn set_p2p_initiator_modes(&mut self, modes: u32);

    fn set_p2p_target_modes(&mut self, modes: u32);

    fn set_timeout(&mut self, technology: u32, timeout_ms: u32) -> bool;

    fn timeout(&mut self, technology: u32) -> i32;

    fn reset_timeouts(&mut self);

    fn abort(&mut self, message: &str);
}
