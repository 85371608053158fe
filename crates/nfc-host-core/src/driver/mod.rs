//! Driver layer module.

pub mod sim;
pub mod traits;

pub use sim::{DriverCommand, SimulatedDriver};
pub use traits::{ControllerDriver, NativeSocket};
