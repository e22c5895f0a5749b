mod common;

use avbus::DeviceState;
use avbus::core::{Command, DeviceId};
use avbus::packet::BusPacket;
use avbus::router;
use common::ScriptedTransport;

const CONTROLLER: DeviceId = DeviceId::new(0);
const DEVICE: DeviceId = DeviceId::new(1);
const GPS: DeviceId = DeviceId::new(2);
const AUTOPILOT: DeviceId = DeviceId::new(3);
const PEER: DeviceId = DeviceId::new(5);

fn data_packet(src: DeviceId, dst: DeviceId, data_type: u16, data: &[u8]) -> BusPacket {
    let mut packet = BusPacket::new_command(src, dst, Command::SendData);
    packet.data_type = data_type;
    packet.data_len = data.len() as u16;
    packet.payload[..data.len()].copy_from_slice(data);
    packet
}

#[test]
fn test_poll_empty() {
    let mut transport = ScriptedTransport::new();
    let mut state = DeviceState::new(DEVICE, CONTROLLER);
    let before = state.clone();

    assert_eq!(router::poll(&mut transport, &mut state), Ok(None));
    assert_eq!(state, before);
    assert_eq!(transport.idle_polls(), 1);
}

#[test]
fn test_start_from_bootstrap_controller() {
    let mut transport = ScriptedTransport::new();
    transport.push_raw(&[
        0x01, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, // header
    ]);
    let mut state = DeviceState::new(DEVICE, CONTROLLER);

    // A bare header is a short read
    assert!(router::poll(&mut transport, &mut state).is_err());
    assert!(!state.is_running());

    let mut wire = [0u8; BusPacket::WIRE_SIZE];
    wire[..10].copy_from_slice(&[0x01, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00]);
    transport.push_raw(&wire);
    assert_eq!(router::poll(&mut transport, &mut state), Ok(None));
    assert!(state.is_running());
}

#[test]
fn test_deliver_data_while_running() {
    let mut transport = ScriptedTransport::new();
    transport.push(&data_packet(PEER, DEVICE, 7, &[0xce, 0xfa]));
    let mut state = DeviceState::new(DEVICE, CONTROLLER);
    state.set_running(true);

    let packet = router::poll(&mut transport, &mut state).unwrap().unwrap();
    assert_eq!(packet.device_id, PEER);
    assert_eq!(packet.data_type, 7);
    assert_eq!(packet.data_len, 2);
    assert_eq!(packet.data(), &[0xce, 0xfa]);
    assert!(state.is_running());
}

#[test]
fn test_add_control_while_shut_down() {
    let mut transport = ScriptedTransport::new();
    transport.push(&BusPacket::new_control(
        CONTROLLER,
        DEVICE,
        Command::AddControl,
        AUTOPILOT,
    ));
    let mut state = DeviceState::new(DEVICE, CONTROLLER);

    assert_eq!(router::poll(&mut transport, &mut state), Ok(None));
    assert_eq!(state.controllers(), &[CONTROLLER, AUTOPILOT]);
    assert!(!state.is_running());
}

#[test]
fn test_echo_and_misrouted_are_ignored() {
    let mut transport = ScriptedTransport::new();
    // Own transmission echoed back, even when addressed to itself
    transport.push(&BusPacket::new_command(DEVICE, DEVICE, Command::Shutdown));
    transport.push(&data_packet(DEVICE, GPS, 1, &[1, 2, 3]));
    // Commands for another device, from a controller of this one
    transport.push(&BusPacket::new_command(CONTROLLER, GPS, Command::Shutdown));
    transport.push(&BusPacket::new_control(
        CONTROLLER,
        GPS,
        Command::RemoveControl,
        CONTROLLER,
    ));
    transport.push(&data_packet(PEER, GPS, 1, &[4]));

    let mut state = DeviceState::new(DEVICE, CONTROLLER);
    state.set_running(true);
    let before = state.clone();

    while transport.pending() > 0 {
        assert_eq!(router::poll(&mut transport, &mut state), Ok(None));
        assert_eq!(state, before);
    }
}

#[test]
fn test_unauthorized_commands() {
    let mut transport = ScriptedTransport::new();
    let mut state = DeviceState::new(DEVICE, CONTROLLER);

    // Ignored while shut down
    transport.push(&BusPacket::new_command(PEER, DEVICE, Command::Start));
    assert_eq!(router::poll(&mut transport, &mut state), Ok(None));
    assert!(!state.is_running());

    transport.push(&BusPacket::new_command(CONTROLLER, DEVICE, Command::Start));
    assert_eq!(router::poll(&mut transport, &mut state), Ok(None));
    assert!(state.is_running());

    // Delivered as data while running, without effect on the state
    for packet in [
        BusPacket::new_command(PEER, DEVICE, Command::Shutdown),
        BusPacket::new_control(PEER, DEVICE, Command::AddControl, PEER),
        BusPacket::new_control(PEER, DEVICE, Command::RemoveControl, CONTROLLER),
    ] {
        transport.push(&packet);
        let delivered = router::poll(&mut transport, &mut state).unwrap().unwrap();
        assert_eq!(delivered.device_id, PEER);
        assert!(state.is_running());
        assert_eq!(state.controllers(), &[CONTROLLER]);
    }
}

#[test]
fn test_unknown_opcode() {
    let mut wire = data_packet(PEER, DEVICE, 3, &[9]).encode();
    wire[4] = 0x2a;
    let mut transport = ScriptedTransport::new();
    transport.push_raw(&wire);
    transport.push_raw(&wire);

    let mut state = DeviceState::new(DEVICE, CONTROLLER);
    assert_eq!(router::poll(&mut transport, &mut state), Ok(None));

    state.set_running(true);
    let delivered = router::poll(&mut transport, &mut state).unwrap().unwrap();
    assert_eq!(delivered.data_type, 3);
    assert_eq!(delivered.data(), &[9]);
}

#[test]
fn test_shutdown_drops_data() {
    let mut transport = ScriptedTransport::new();
    transport.push(&BusPacket::new_command(CONTROLLER, DEVICE, Command::Start));
    transport.push(&data_packet(PEER, DEVICE, 1, &[1]));
    transport.push(&BusPacket::new_command(CONTROLLER, DEVICE, Command::Shutdown));
    transport.push(&data_packet(PEER, DEVICE, 1, &[2]));

    let mut state = DeviceState::new(DEVICE, CONTROLLER);
    let mut delivered = Vec::new();
    while transport.pending() > 0 {
        if let Some(packet) = router::poll(&mut transport, &mut state).unwrap() {
            delivered.push(packet.data()[0]);
        }
    }

    assert_eq!(delivered, [1]);
    assert!(!state.is_running());
}

#[test]
fn test_controller_hand_over() {
    let mut transport = ScriptedTransport::new();
    transport.push(&BusPacket::new_control(
        CONTROLLER,
        DEVICE,
        Command::AddControl,
        AUTOPILOT,
    ));
    transport.push(&BusPacket::new_control(
        AUTOPILOT,
        DEVICE,
        Command::RemoveControl,
        CONTROLLER,
    ));
    transport.push(&BusPacket::new_command(CONTROLLER, DEVICE, Command::Start));
    transport.push(&BusPacket::new_command(AUTOPILOT, DEVICE, Command::Start));

    let mut state = DeviceState::new(DEVICE, CONTROLLER);
    for running in [false, false, false, true] {
        assert_eq!(router::poll(&mut transport, &mut state), Ok(None));
        assert_eq!(state.is_running(), running);
    }
    assert_eq!(state.controllers(), &[AUTOPILOT]);
}

#[test]
fn test_controller_list_capacity() {
    let mut transport = ScriptedTransport::new();
    let mut state = DeviceState::new(DEVICE, CONTROLLER);

    for id in 100..400 {
        transport.push(&BusPacket::new_control(
            CONTROLLER,
            DEVICE,
            Command::AddControl,
            DeviceId::new(id),
        ));
        router::poll(&mut transport, &mut state).unwrap();
    }

    let controllers = state.controllers();
    assert_eq!(controllers.len(), avbus::core::CONTROLLER_CAPACITY);
    assert_eq!(controllers[0], CONTROLLER);
    assert_eq!(controllers[1], DeviceId::new(100));
    assert_eq!(controllers.last(), Some(&DeviceId::new(226)));
}
