//! Error types surfaced by the device host.

use std::path::PathBuf;

use thiserror::Error;

use crate::protocol::ErrorCode;

/// Classified failure of an LLCP socket creation.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlcpError {
    #[error("LLCP socket creation failed: buffer too small")]
    BufferTooSmall,

    #[error("LLCP socket creation failed: insufficient resources")]
    InsufficientResources,

    /// Any other native failure. `native` is the code the driver reported.
    #[error("LLCP socket creation failed (native error {native})")]
    SocketCreation { native: ErrorCode },
}

impl LlcpError {
    /// Classify a native last-error code observed right after a failed creation.
    pub fn classify(native: ErrorCode) -> Self {
        match native {
            ErrorCode::ERROR_BUFFER_TO_SMALL => LlcpError::BufferTooSmall,
            ErrorCode::ERROR_INSUFFICIENT_RESOURCES => LlcpError::InsufficientResources,
            other => LlcpError::SocketCreation { native: other },
        }
    }

    /// Error code handed to callers.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            LlcpError::BufferTooSmall => ErrorCode::ERROR_BUFFER_TO_SMALL,
            LlcpError::InsufficientResources => ErrorCode::ERROR_INSUFFICIENT_RESOURCES,
            LlcpError::SocketCreation { .. } => ErrorCode::ERROR_SOCKET_CREATION,
        }
    }
}

/// Errors of the persistent preference store.
#[derive(Error, Debug)]
pub enum PrefsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse preferences: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize preferences: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Errors reported by the device host.
#[derive(Error, Debug)]
pub enum HostError {
    #[error("Controller initialization failed")]
    Initialization,

    #[error("Firmware artifact {path} is unreadable: {source}")]
    FirmwareCheck {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Firmware download failed after {attempts} attempts")]
    FirmwareDownloadExhausted { attempts: u32 },

    #[error(transparent)]
    Llcp(#[from] LlcpError),

    #[error("Native command '{command}' failed")]
    NativeCall { command: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_specific_codes() {
        assert_eq!(
            LlcpError::classify(ErrorCode::ERROR_BUFFER_TO_SMALL),
            LlcpError::BufferTooSmall
        );
        assert_eq!(
            LlcpError::classify(ErrorCode::ERROR_INSUFFICIENT_RESOURCES),
            LlcpError::InsufficientResources
        );
    }

    #[test]
    fn test_classify_everything_else_as_generic() {
        for raw in [0, -1, -10, -13, -99, 42] {
            let err = LlcpError::classify(ErrorCode::from_raw(raw));
            assert_eq!(
                err,
                LlcpError::SocketCreation {
                    native: ErrorCode::from_raw(raw)
                }
            );
            assert_eq!(err.error_code(), ErrorCode::ERROR_SOCKET_CREATION);
        }
    }

    #[test]
    fn test_host_error_messages() {
        let err = HostError::FirmwareDownloadExhausted { attempts: 5 };
        assert_eq!(err.to_string(), "Firmware download failed after 5 attempts");

        let err: HostError = LlcpError::BufferTooSmall.into();
        assert!(err.to_string().contains("buffer too small"));
    }
}
