//! Protocol module - native error codes and fixed host values.

pub mod constants;
pub mod error_codes;

pub use constants::*;
pub use error_codes::ErrorCode;
