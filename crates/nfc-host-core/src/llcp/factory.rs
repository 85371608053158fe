//! LLCP socket creation and failure classification.
//!
//! Every creation follows the same two steps: ask the driver for a socket,
//! and only if that yields nothing, read the driver's last error and classify
//! it. The last error is never read before or after a successful creation;
//! it is only valid right after the failing call.

use tracing::{debug, warn};

use super::socket::{LlcpConnectionlessSocket, LlcpServerSocket, LlcpSocket, LlcpSocketKind};
use crate::driver::{ControllerDriver, NativeSocket};
use crate::error::LlcpError;
use crate::protocol::{DEFAULT_LLCP_MIU, DEFAULT_LLCP_RWSIZE};

fn classify_failure<D: ControllerDriver + ?Sized>(
    driver: &mut D,
    kind: LlcpSocketKind,
) -> LlcpError {
    let native = driver.last_error();
    let err = LlcpError::classify(native);
    warn!(kind = %kind, native = %native, error = %err, "Failed to create LLCP socket");
    err
}

fn created<D: ControllerDriver + ?Sized>(
    driver: &mut D,
    kind: LlcpSocketKind,
    handle: Option<NativeSocket>,
) -> Result<NativeSocket, LlcpError> {
    match handle {
        Some(handle) => {
            debug!(kind = %kind, handle = handle.0, "LLCP socket created");
            Ok(handle)
        }
        None => Err(classify_failure(driver, kind)),
    }
}

/// Create a connectionless socket bound to `sap`.
pub fn create_connectionless_socket<D: ControllerDriver + ?Sized>(
    driver: &mut D,
    sap: u8,
    service_name: Option<&str>,
) -> Result<LlcpConnectionlessSocket, LlcpError> {
    let handle = driver.create_connectionless_socket(sap, service_name);
    let handle = created(driver, LlcpSocketKind::Connectionless, handle)?;
    Ok(LlcpConnectionlessSocket {
        handle,
        sap,
        service_name: service_name.map(str::to_owned),
        miu: DEFAULT_LLCP_MIU,
        rw: DEFAULT_LLCP_RWSIZE,
    })
}

/// Create a server socket listening on `sap`.
pub fn create_server_socket<D: ControllerDriver + ?Sized>(
    driver: &mut D,
    sap: u8,
    service_name: Option<&str>,
    miu: u32,
    rw: u32,
    linear_buffer_length: u32,
) -> Result<LlcpServerSocket, LlcpError> {
    let handle = driver.create_server_socket(sap, service_name, miu, rw, linear_buffer_length);
    let handle = created(driver, LlcpSocketKind::Server, handle)?;
    Ok(LlcpServerSocket {
        handle,
        sap,
        service_name: service_name.map(str::to_owned),
        miu,
        rw,
        linear_buffer_length,
    })
}

/// Create a client socket on `sap`.
pub fn create_client_socket<D: ControllerDriver + ?Sized>(
    driver: &mut D,
    sap: u8,
    miu: u32,
    rw: u32,
    linear_buffer_length: u32,
) -> Result<LlcpSocket, LlcpError> {
    let handle = driver.create_client_socket(sap, miu, rw, linear_buffer_length);
    let handle = created(driver, LlcpSocketKind::Client, handle)?;
    Ok(LlcpSocket {
        handle,
        sap,
        miu,
        rw,
        linear_buffer_length,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::{DriverCommand, SimulatedDriver};
    use crate::protocol::ErrorCode;

    /// Create one socket of `kind`, returning only the classification.
    fn create(driver: &mut SimulatedDriver, kind: LlcpSocketKind) -> Result<(), LlcpError> {
        match kind {
            LlcpSocketKind::Connectionless => {
                create_connectionless_socket(driver, 0x10, Some("urn:nfc:sn:test")).map(|_| ())
            }
            LlcpSocketKind::Server => {
                create_server_socket(driver, 0x10, Some("urn:nfc:sn:test"), 128, 1, 1024)
                    .map(|_| ())
            }
            LlcpSocketKind::Client => create_client_socket(driver, 0x20, 128, 1, 1024).map(|_| ()),
        }
    }

    const KINDS: [LlcpSocketKind; 3] = [
        LlcpSocketKind::Connectionless,
        LlcpSocketKind::Server,
        LlcpSocketKind::Client,
    ];

    #[test]
    fn test_buffer_too_small_is_propagated() {
        for kind in KINDS {
            let mut driver = SimulatedDriver::new();
            driver.queue_socket_failure(ErrorCode::ERROR_BUFFER_TO_SMALL);
            let err = create(&mut driver, kind).unwrap_err();
            assert_eq!(err, LlcpError::BufferTooSmall, "{kind}");
            assert_eq!(err.error_code(), ErrorCode::ERROR_BUFFER_TO_SMALL);
        }
    }

    #[test]
    fn test_insufficient_resources_is_propagated() {
        for kind in KINDS {
            let mut driver = SimulatedDriver::new();
            driver.queue_socket_failure(ErrorCode::ERROR_INSUFFICIENT_RESOURCES);
            let err = create(&mut driver, kind).unwrap_err();
            assert_eq!(err, LlcpError::InsufficientResources, "{kind}");
        }
    }

    #[test]
    fn test_other_codes_become_generic() {
        for kind in KINDS {
            let mut driver = SimulatedDriver::new();
            driver.queue_socket_failure(ErrorCode::ERROR_SAP_USED);
            let err = create(&mut driver, kind).unwrap_err();
            assert_eq!(
                err,
                LlcpError::SocketCreation {
                    native: ErrorCode::ERROR_SAP_USED
                },
                "{kind}"
            );
            assert_eq!(err.error_code(), ErrorCode::ERROR_SOCKET_CREATION);
        }
    }

    #[test]
    fn test_last_error_read_only_after_failure() {
        let sim = SimulatedDriver::new();
        let mut driver = sim.clone();
        sim.queue_socket_success();
        sim.queue_socket_failure(ErrorCode::ERROR_IO);

        let socket = create_client_socket(&mut driver, 0x20, 248, 2, 4096).unwrap();
        assert_eq!(socket.kind(), LlcpSocketKind::Client);
        assert_eq!(socket.miu, 248);
        assert!(create_client_socket(&mut driver, 0x21, 248, 2, 4096).is_err());

        let commands = sim.commands();
        assert_eq!(commands.len(), 3);
        assert!(matches!(commands[0], DriverCommand::CreateClientSocket { sap: 0x20, .. }));
        assert!(matches!(commands[1], DriverCommand::CreateClientSocket { sap: 0x21, .. }));
        assert_eq!(commands[2], DriverCommand::GetLastError);
    }

    #[test]
    fn test_descriptors_carry_parameters() {
        let mut driver = SimulatedDriver::new();

        let cl = create_connectionless_socket(&mut driver, 0x11, None).unwrap();
        assert_eq!(cl.kind(), LlcpSocketKind::Connectionless);
        assert_eq!(cl.service_name, None);
        assert_eq!((cl.miu, cl.rw), (DEFAULT_LLCP_MIU, DEFAULT_LLCP_RWSIZE));

        let server =
            create_server_socket(&mut driver, 0x12, Some("urn:nfc:sn:snep"), 128, 4, 2048).unwrap();
        assert_eq!(server.service_name.as_deref(), Some("urn:nfc:sn:snep"));
        assert_eq!(server.rw, 4);
        assert_eq!(server.linear_buffer_length, 2048);
        assert_ne!(cl.handle, server.handle);
    }
}
