//! Blocking send and receive on top of the router
//!
//! Receiving spins on [`router::poll`] until a packet is delivered. There is no event
//! subscription and no timeout: without a [`CancelToken`], a receive that never gets a matching
//! packet blocks forever.
//!
//! Sending while shut down performs a single poll first, giving a pending START a chance to be
//! processed, and then transmits whether or not the device was started.

use avbus_driver::transport::{self, Transport};

use crate::cancel::{CancelToken, Cancelled};
use crate::core::{Command, DeviceId};
use crate::device::DeviceState;
use crate::packet::{ApplicationPacket, BusPacket};
use crate::router;

/// Transmits `packet`, refreshing the state once first if the device is shut down.
pub fn send_when_running<T: Transport + ?Sized>(
    transport: &mut T,
    state: &mut DeviceState,
    packet: &BusPacket,
) {
    if !state.is_running() {
        // A shut-down device never delivers data, so only state changes matter here
        if let Err(err) = router::poll(transport, state) {
            warn!("device {}: dropped {:?}", state.device_id(), err);
        }
    }

    transport::write_packet(transport, packet);
}

/// Blocks until an application packet is delivered.
///
/// Controller commands and dropped packets are consumed along the way. Malformed reads are
/// skipped. Fails only if `cancel` fires.
pub fn receive_application_packet<T: Transport + ?Sized>(
    transport: &mut T,
    state: &mut DeviceState,
    cancel: Option<&CancelToken>,
) -> Result<ApplicationPacket, Cancelled> {
    loop {
        CancelToken::check(cancel)?;

        match router::poll(transport, state) {
            Ok(Some(packet)) => return Ok(packet),
            Ok(None) => {}
            Err(err) => warn!("device {}: dropped {:?}", state.device_id(), err),
        }
    }
}

/// Blocks until a packet from `peer` or of `data_type` is delivered.
///
/// A packet is accepted as soon as *either* the peer or the data type matches; it is skipped
/// only when both differ. Skipped packets are lost.
pub fn wait_for_matching<T: Transport + ?Sized>(
    transport: &mut T,
    state: &mut DeviceState,
    peer: DeviceId,
    data_type: u16,
    cancel: Option<&CancelToken>,
) -> Result<ApplicationPacket, Cancelled> {
    loop {
        let packet = receive_application_packet(transport, state, cancel)?;
        if packet.device_id == peer || packet.data_type == data_type {
            return Ok(packet);
        }

        trace!(
            "device {}: skipped type {} from {}",
            state.device_id(),
            packet.data_type,
            packet.device_id
        );
    }
}

/// Blocks until a controller starts the device.
///
/// Packets received in the meantime are consumed; none can carry application data while the
/// device is shut down.
pub fn wait_until_running<T: Transport + ?Sized>(
    transport: &mut T,
    state: &mut DeviceState,
    cancel: Option<&CancelToken>,
) -> Result<(), Cancelled> {
    while !state.is_running() {
        CancelToken::check(cancel)?;

        if let Err(err) = router::poll(transport, state) {
            warn!("device {}: dropped {:?}", state.device_id(), err);
        }
    }
    info!("device {}: running", state.device_id());
    Ok(())
}

/// Sends application data to `packet.device_id`.
pub fn send_application_packet<T: Transport + ?Sized>(
    transport: &mut T,
    state: &mut DeviceState,
    packet: &ApplicationPacket,
) {
    let bus_packet = packet.to_bus(state.device_id());
    send_when_running(transport, state, &bus_packet);
}

/// Asks `dst` to stop. Only honored if this device is one of its controllers.
pub fn send_shutdown<T: Transport + ?Sized>(
    transport: &mut T,
    state: &mut DeviceState,
    dst: DeviceId,
) {
    send_command(transport, state, dst, Command::Shutdown);
}

/// Asks `dst` to start. Only honored if this device is one of its controllers.
pub fn send_start<T: Transport + ?Sized>(
    transport: &mut T,
    state: &mut DeviceState,
    dst: DeviceId,
) {
    send_command(transport, state, dst, Command::Start);
}

/// Asks `dst` to accept `target` as a controller. Only honored if this device is one of its
/// controllers.
pub fn send_add_control<T: Transport + ?Sized>(
    transport: &mut T,
    state: &mut DeviceState,
    dst: DeviceId,
    target: DeviceId,
) {
    let packet = BusPacket::new_control(state.device_id(), dst, Command::AddControl, target);
    send_when_running(transport, state, &packet);
}

/// Asks `dst` to revoke controller privilege from `target`. Only honored if this device is one
/// of its controllers.
pub fn send_remove_control<T: Transport + ?Sized>(
    transport: &mut T,
    state: &mut DeviceState,
    dst: DeviceId,
    target: DeviceId,
) {
    let packet = BusPacket::new_control(state.device_id(), dst, Command::RemoveControl, target);
    send_when_running(transport, state, &packet);
}

fn send_command<T: Transport + ?Sized>(
    transport: &mut T,
    state: &mut DeviceState,
    dst: DeviceId,
    command: Command,
) {
    let packet = BusPacket::new_command(state.device_id(), dst, command);
    send_when_running(transport, state, &packet);
}
