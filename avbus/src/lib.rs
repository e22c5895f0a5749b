//! # Avbus
//!
//! This library implements the device side of a minimal avionics bus: a shared serial line
//! carrying fixed-size packets between addressed devices. A device may hold _controller_
//! privilege over another one, which lets it start and shut down that device and manage its
//! list of controllers. The library needs no dynamic memory allocation.
//!
//! ## Architecture
//!
//! ```text
//!   ┌─────────────┐
//!   │ Application │
//!   └──────┬──────┘
//!          ▼
//!   ┌─────────────┐
//!   │  Protocol   │  blocking send / receive, command senders
//!   └──────┬──────┘
//!          ▼
//!   ┌─────────────┐      ┌─────────────┐
//!   │   Router    ├─────►│ DeviceState │
//!   └──────┬──────┘      └─────────────┘
//!          ▼
//!   ┌─────────────┐
//!   │  Transport  │  UART on the shared bus
//!   └─────────────┘
//! ```
//! Components:
//! * _Transport_ is a blocking byte channel provided by a driver (see `avbus-driver`).
//! * _BusPacket_ is the 138-byte wire packet; _ApplicationPacket_ is its payload-bearing view
//!   exposed to the application.
//! * _DeviceState_ holds the device address, the running flag, and the controller list.
//! * _Router_ consumes one packet per poll, drops echoes and packets for other devices,
//!   executes controller commands, and hands application data over while the device runs.
//! * _Protocol_ implements the blocking calls on top of the router.
//!
//! ## Concurrency model
//!
//! A device is driven by a single thread of control that owns its `DeviceState` and its
//! transport and passes them explicitly to every call. No locking is involved. Blocking calls
//! spin on the non-blocking poll and can be abandoned through a `CancelToken`.
//!
//! ## Limitations
//!
//! * Controllers are trusted by bus source address; there is no authentication.
//! * The bus is assumed lossless and synchronous; there is no back-pressure or retry.
//! * A single bus, no multi-hop routing.
//!
//! ## Example
//!
//! ```no_run
//! use avbus::core::DeviceId;
//! use avbus::driver::transport::Transport;
//! use avbus::packet::ApplicationPacket;
//! use avbus::{DeviceConfig, DeviceState, protocol};
//!
//! const GPS: DeviceId = DeviceId::new(2);
//! const AUTOPILOT: DeviceId = DeviceId::new(3);
//!
//! fn run(uart: &mut impl Transport) {
//!     let mut state = DeviceState::from(&DeviceConfig::default());
//!     protocol::wait_until_running(uart, &mut state, None).unwrap();
//!
//!     let request = protocol::wait_for_matching(uart, &mut state, GPS, 0, None).unwrap();
//!     let reply = ApplicationPacket::new(AUTOPILOT, 1, request.data()).unwrap();
//!     protocol::send_application_packet(uart, &mut state, &reply);
//! }
//! ```
#![no_std]

pub use avbus_core as core;
pub use avbus_driver as driver;

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

mod cancel;
mod config;
pub mod device;
pub mod packet;
pub mod protocol;
pub mod router;

pub use cancel::{CancelToken, Cancelled};
pub use config::DeviceConfig;
pub use device::DeviceState;
