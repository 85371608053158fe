//! Native last-error codes.
//!
//! The controller driver reports failures out of band: a failing call returns
//! nothing useful, and the reason is fetched afterwards with
//! `ControllerDriver::last_error`. The values mirror the platform NFC error
//! code table.

use std::fmt;

/// Error code reported by the native driver.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorCode(i32);

impl ErrorCode {
    pub const SUCCESS: ErrorCode = ErrorCode(0);
    pub const ERROR_IO: ErrorCode = ErrorCode(-1);
    pub const ERROR_CANCELLED: ErrorCode = ErrorCode(-2);
    pub const ERROR_TIMEOUT: ErrorCode = ErrorCode(-3);
    pub const ERROR_BUSY: ErrorCode = ErrorCode(-4);
    pub const ERROR_CONNECT: ErrorCode = ErrorCode(-5);
    pub const ERROR_READ: ErrorCode = ErrorCode(-6);
    pub const ERROR_WRITE: ErrorCode = ErrorCode(-7);
    pub const ERROR_INVALID_PARAM: ErrorCode = ErrorCode(-8);
    pub const ERROR_INSUFFICIENT_RESOURCES: ErrorCode = ErrorCode(-9);
    pub const ERROR_SOCKET_CREATION: ErrorCode = ErrorCode(-10);
    pub const ERROR_SOCKET_NOT_CONNECTED: ErrorCode = ErrorCode(-11);
    pub const ERROR_BUFFER_TO_SMALL: ErrorCode = ErrorCode(-12);
    pub const ERROR_SAP_USED: ErrorCode = ErrorCode(-13);
    pub const ERROR_SERVICE_NAME_USED: ErrorCode = ErrorCode(-14);
    pub const ERROR_SOCKET_OPTIONS: ErrorCode = ErrorCode(-15);
    pub const ERROR_NFC_ON: ErrorCode = ErrorCode(-16);
    pub const ERROR_NOT_INITIALIZED: ErrorCode = ErrorCode(-17);
    pub const ERROR_SE_ALREADY_SELECTED: ErrorCode = ErrorCode(-18);
    pub const ERROR_SE_CONNECTED: ErrorCode = ErrorCode(-19);
    pub const ERROR_NO_SE_CONNECTED: ErrorCode = ErrorCode(-20);
    pub const ERROR_NOT_SUPPORTED: ErrorCode = ErrorCode(-21);

    /// Wrap a raw native value. Unknown values are kept as-is.
    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    /// Raw value.
    pub const fn raw(&self) -> i32 {
        self.0
    }

    pub fn is_success(&self) -> bool {
        *self == Self::SUCCESS
    }

    /// Symbolic name, or `UNKNOWN` for values outside the table.
    pub fn as_str(&self) -> &'static str {
        match self.0 {
            0 => "SUCCESS",
            -1 => "IO",
            -2 => "CANCELLED",
            -3 => "TIMEOUT",
            -4 => "BUSY",
            -5 => "CONNECT/DISCONNECT",
            -6 => "READ",
            -7 => "WRITE",
            -8 => "INVALID_PARAM",
            -9 => "INSUFFICIENT_RESOURCES",
            -10 => "SOCKET_CREATION",
            -11 => "SOCKET_NOT_CONNECTED",
            -12 => "BUFFER_TO_SMALL",
            -13 => "SAP_USED",
            -14 => "SERVICE_NAME_USED",
            -15 => "SOCKET_OPTIONS",
            -16 => "NFC_ON",
            -17 => "NOT_INITIALIZED",
            -18 => "SE_ALREADY_SELECTED",
            -19 => "SE_CONNECTED",
            -20 => "NO_SE_CONNECTED",
            -21 => "NOT_SUPPORTED",
            _ => "UNKNOWN",
        }
    }
}

impl fmt::Debug for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ErrorCode({} {})", self.0, self.as_str())
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.as_str(), self.0)
    }
}

impl From<i32> for ErrorCode {
    fn from(raw: i32) -> Self {
        Self::from_raw(raw)
    }
}
