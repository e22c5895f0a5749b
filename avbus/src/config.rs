use crate::core::DeviceId;

/// Device start-up configuration
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceConfig {
    /// Bus address of this device
    pub device_id: DeviceId,
    /// Initial and only controller at start-up
    pub bootstrap_controller: DeviceId,
}

impl DeviceConfig {
    pub const fn new(device_id: DeviceId, bootstrap_controller: DeviceId) -> Self {
        Self {
            device_id,
            bootstrap_controller,
        }
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self::new(DeviceId::new(1), DeviceId::new(0))
    }
}
