//! Navigation request/response exchange between avionics units on one bus.
//!
//! The flight controller starts the autopilot, nav and gps units. Gps asks nav for an update,
//! nav answers the autopilot, and the controller shuts everyone down once the autopilot has the
//! answer.

use avbus::core::DeviceId;
use avbus::packet::ApplicationPacket;
use avbus::{DeviceState, protocol};
use avbus_sim::board::{self, AUTOPILOT, CONTROL, GPS, NAV, RESPOND_MSG, UPDATE_REQ};
use avbus_sim::{BusPort, SharedBus};
use log::{error, info};
use std::process::ExitCode;
use std::thread;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let bus = SharedBus::new();
    let mut control = bus.attach();
    let nav = bus.attach();
    let gps = bus.attach();
    let autopilot = bus.attach();

    let answer = thread::scope(|s| {
        let autopilot = s.spawn(move || run_autopilot(autopilot));
        s.spawn(move || run_nav(nav));
        s.spawn(move || run_gps(gps));

        let mut state = DeviceState::new(CONTROL, CONTROL);
        // Autopilot first: everything it receives is caused by the later starts
        for device in [AUTOPILOT, NAV, GPS] {
            protocol::send_start(&mut control, &mut state, device);
        }

        let answer = autopilot.join();
        for device in [AUTOPILOT, NAV, GPS] {
            protocol::send_shutdown(&mut control, &mut state, device);
        }
        answer
    });

    match answer {
        Ok(value) if value == board::RESPOND_PAYLOAD => {
            info!("autopilot got {:#06x}", value);
            ExitCode::SUCCESS
        }
        Ok(value) => {
            error!("autopilot got unexpected {:#06x}", value);
            ExitCode::FAILURE
        }
        Err(_) => {
            error!("autopilot panicked");
            ExitCode::FAILURE
        }
    }
}

fn start(port: &mut BusPort<'_>, device_id: DeviceId) -> DeviceState {
    let mut state = DeviceState::from(&board::make_device_config(device_id));
    // Cannot fail without a cancel token
    let _ = protocol::wait_until_running(port, &mut state, None);
    state
}

fn run_gps(mut port: BusPort<'_>) {
    let mut state = start(&mut port, GPS);

    info!("gps: requesting update");
    let request = ApplicationPacket {
        device_id: NAV,
        data_type: UPDATE_REQ,
        data_len: 0,
        payload: [0; avbus::core::PAYLOAD_CAPACITY],
    };
    protocol::send_application_packet(&mut port, &mut state, &request);
}

fn run_nav(mut port: BusPort<'_>) {
    let mut state = start(&mut port, NAV);

    let Ok(request) = protocol::wait_for_matching(&mut port, &mut state, GPS, UPDATE_REQ, None)
    else {
        return;
    };
    info!("nav: request type {} from {}", request.data_type, request.device_id);

    let data = board::RESPOND_PAYLOAD.to_le_bytes();
    let Ok(reply) = ApplicationPacket::new(AUTOPILOT, RESPOND_MSG, &data) else {
        return;
    };
    protocol::send_application_packet(&mut port, &mut state, &reply);
}

fn run_autopilot(mut port: BusPort<'_>) -> u16 {
    let mut state = start(&mut port, AUTOPILOT);

    loop {
        let Ok(packet) = protocol::receive_application_packet(&mut port, &mut state, None) else {
            return 0;
        };
        if packet.data_type == RESPOND_MSG {
            info!("autopilot: response from {}", packet.device_id);
            return u16::from_le_bytes([packet.payload[0], packet.payload[1]]);
        }
    }
}
