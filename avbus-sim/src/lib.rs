//! Host-side board for the avbus stack.
//!
//! Emulates the shared serial bus and the flash of an avionics unit, so that several devices can
//! run in one process, each on its own thread. Used by the `flight_demo` binary and by the
//! multi-device tests.

pub mod board;
pub mod bus;
pub mod flash;

pub use bus::{BusPort, SharedBus};
pub use flash::MemFlash;
