//! LLCP socket descriptors handed to callers.

use std::fmt;

use crate::driver::NativeSocket;

/// Socket variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlcpSocketKind {
    Connectionless,
    Server,
    Client,
}

impl fmt::Display for LlcpSocketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LlcpSocketKind::Connectionless => write!(f, "connectionless"),
            LlcpSocketKind::Server => write!(f, "server"),
            LlcpSocketKind::Client => write!(f, "client"),
        }
    }
}

/// Connectionless (UI frame) endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlcpConnectionlessSocket {
    pub handle: NativeSocket,
    pub sap: u8,
    pub service_name: Option<String>,
    /// Link defaults; the native call does not take them.
    pub miu: u32,
    pub rw: u32,
}

/// Listening endpoint accepting connection-oriented links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlcpServerSocket {
    pub handle: NativeSocket,
    pub sap: u8,
    pub service_name: Option<String>,
    pub miu: u32,
    pub rw: u32,
    pub linear_buffer_length: u32,
}

/// Connection-oriented client endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlcpSocket {
    pub handle: NativeSocket,
    pub sap: u8,
    pub miu: u32,
    pub rw: u32,
    pub linear_buffer_length: u32,
}

impl LlcpConnectionlessSocket {
    pub fn kind(&self) -> LlcpSocketKind {
        LlcpSocketKind::Connectionless
    }
}

impl LlcpServerSocket {
    pub fn kind(&self) -> LlcpSocketKind {
        LlcpSocketKind::Server
    }
}

impl LlcpSocket {
    pub fn kind(&self) -> LlcpSocketKind {
        LlcpSocketKind::Client
    }
}
