//! Packet classification and controller authorization
//!
//! Every packet read from the bus is classified against the device state, in this order:
//!
//! 1. packets sent by this device are discarded (the bus echoes every transmission back);
//! 2. packets addressed to another device are discarded;
//! 3. privileged commands from a controller of this device are executed and consumed;
//! 4. while the device is shut down, everything else is discarded;
//! 5. the rest is delivered to the application.
//!
//! A privileged opcode from a device that is not a controller carries no authority. It falls
//! through to steps 4 and 5 and, on a running device, reaches the application as opaque data.

use avbus_driver::transport::{self, Transport};

use crate::core::Command;
use crate::device::DeviceState;
use crate::packet::{ApplicationPacket, BusPacket, MalformedPacket};

/// Routing decision for a single bus packet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Route {
    /// Sent by this device
    SelfOrigin,
    /// Addressed to another device
    Misrouted,
    /// Command from a controller, to be executed
    Privileged(Command),
    /// Application traffic while shut down
    NotRunning,
    /// Application traffic to hand over
    Deliver,
}

/// Decides what to do with `packet` without touching the state.
pub fn classify(state: &DeviceState, packet: &BusPacket) -> Route {
    let device_id = state.device_id();

    if packet.src_id == device_id {
        Route::SelfOrigin
    } else if packet.dst_id != device_id {
        Route::Misrouted
    } else if packet.command.is_privileged() && state.is_controller(packet.src_id) {
        Route::Privileged(packet.command)
    } else if !state.is_running() {
        Route::NotRunning
    } else {
        Route::Deliver
    }
}

/// Routes a decoded packet, executing controller commands.
///
/// Returns the application packet to deliver, if any.
pub fn dispatch(state: &mut DeviceState, packet: &BusPacket) -> Option<ApplicationPacket> {
    match classify(state, packet) {
        Route::Privileged(command) => {
            execute(state, command, packet);
            None
        }
        Route::Deliver => Some(ApplicationPacket::from(packet)),
        route => {
            trace!(
                "device {}: dropped packet {} -> {}: {:?}",
                state.device_id(),
                packet.src_id,
                packet.dst_id,
                route
            );
            None
        }
    }
}

/// Processes at most one packet from `transport`.
///
/// Returns `Ok(None)` immediately when no bytes are available. Otherwise reads a whole packet,
/// which may block until it is complete. A short read drops the packet and leaves the state
/// untouched.
pub fn poll<T: Transport + ?Sized>(
    transport: &mut T,
    state: &mut DeviceState,
) -> Result<Option<ApplicationPacket>, MalformedPacket> {
    if !transport.available() {
        return Ok(None);
    }

    let packet = transport::read_packet(transport)?;
    Ok(dispatch(state, &packet))
}

fn execute(state: &mut DeviceState, command: Command, packet: &BusPacket) {
    debug!(
        "device {}: {:?} from controller {}",
        state.device_id(),
        command,
        packet.src_id
    );

    match command {
        Command::Shutdown => state.set_running(false),
        Command::Start => state.set_running(true),
        Command::AddControl => state.add_controller(packet.target_id()),
        Command::RemoveControl => state.remove_controller(packet.target_id()),
        Command::SendData | Command::Unknown(_) => unreachable!(),
    }
}
