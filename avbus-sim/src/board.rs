//! Device addresses and data types of the reference avionics setup

use avbus::DeviceConfig;
use avbus::core::DeviceId;

pub const CONTROL: DeviceId = DeviceId::new(0);
pub const NAV: DeviceId = DeviceId::new(1);
pub const GPS: DeviceId = DeviceId::new(2);
pub const AUTOPILOT: DeviceId = DeviceId::new(3);
pub const ALTIMETER: DeviceId = DeviceId::new(4);

/// Position update request, no payload
pub const UPDATE_REQ: u16 = 0;
/// Reply to an update request
pub const RESPOND_MSG: u16 = 1;

/// Payload of the nav reply
pub const RESPOND_PAYLOAD: u16 = 0xface;

/// Configuration of a device bootstrapped by the flight controller.
pub fn make_device_config(device_id: DeviceId) -> DeviceConfig {
    DeviceConfig::new(device_id, CONTROL)
}
