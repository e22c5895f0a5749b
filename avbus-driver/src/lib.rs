//! Avbus driver interface
//!
//! The crate provides an interface between device drivers and the avbus stack.
//! Limited scope facilitates compatibility across versions.
//! Driver crates should depend on this crate. Avbus stack users should depend on
//! the `avbus` crate instead.
//!
//! Two collaborators are described here:
//! * `Transport` is the byte channel that carries bus packets, typically a UART wired to the
//!   shared bus. Every device on the bus hears every packet, its own included.
//! * `Flash` is page-erase / word-program persistent storage used by bootloaders and
//!   configuration writers.
//!
//! The `packet` module defines the fixed 138-byte wire format exchanged over a `Transport`.

#![no_std]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod flash;
pub mod packet;
pub mod transport;
