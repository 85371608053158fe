//! LLCP (peer-to-peer link layer) socket module.

pub mod factory;
pub mod socket;

pub use factory::{create_client_socket, create_connectionless_socket, create_server_socket};
pub use socket::{LlcpConnectionlessSocket, LlcpServerSocket, LlcpSocket, LlcpSocketKind};
