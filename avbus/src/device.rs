//! Device identity, running flag and controller list

use heapless::Vec;

use crate::config::DeviceConfig;
use crate::core::{CONTROLLER_CAPACITY, DeviceId};

/// Per-device protocol state
///
/// Owned by the single thread that drives the device and passed explicitly to the router and
/// protocol functions. Several instances may coexist, e.g. to simulate a bus in one process.
///
/// A device starts shut down, with the bootstrap controller as its only controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceState {
    device_id: DeviceId,
    running: bool,
    controllers: Vec<DeviceId, CONTROLLER_CAPACITY>,
}

impl DeviceState {
    pub fn new(device_id: DeviceId, bootstrap_controller: DeviceId) -> Self {
        let mut controllers = Vec::new();
        unwrap!(controllers.push(bootstrap_controller));
        Self {
            device_id,
            running: false,
            controllers,
        }
    }

    pub fn device_id(&self) -> DeviceId {
        self.device_id
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn set_running(&mut self, running: bool) {
        if self.running != running {
            debug!("device {}: running = {}", self.device_id, running);
        }
        self.running = running;
    }

    /// Devices privileged to control this device, in insertion order.
    pub fn controllers(&self) -> &[DeviceId] {
        &self.controllers
    }

    pub fn is_controller(&self, id: DeviceId) -> bool {
        self.controllers.contains(&id)
    }

    /// Grants controller privilege to `id`.
    ///
    /// Does nothing if `id` is already a controller or the list is full.
    pub fn add_controller(&mut self, id: DeviceId) {
        if self.controllers.is_full() {
            debug!("device {}: controller list full, {} ignored", self.device_id, id);
            return;
        }
        if self.is_controller(id) {
            return;
        }

        unwrap!(self.controllers.push(id));
        debug!("device {}: controller {} added", self.device_id, id);
    }

    /// Revokes controller privilege from `id`.
    ///
    /// Does nothing if `id` is not a controller. The remaining controllers keep their order.
    pub fn remove_controller(&mut self, id: DeviceId) {
        let Some(pos) = self.controllers.iter().position(|&c| c == id) else {
            return;
        };

        self.controllers.remove(pos);
        debug!("device {}: controller {} removed", self.device_id, id);
    }
}

impl From<&DeviceConfig> for DeviceState {
    fn from(config: &DeviceConfig) -> Self {
        Self::new(config.device_id, config.bootstrap_controller)
    }
}
