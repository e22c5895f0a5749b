//! Avionics bus protocol core data types
//!
//! This crate provides basic data type definitions used by other avbus crates.
//! Stack users should not depend on this crate directly. Use `avbus::core` reexport instead.
#![no_std]

/// Maximum number of meaningful payload bytes in a bus packet.
///
/// The payload is always transmitted in full, regardless of the declared data length.
pub const PAYLOAD_CAPACITY: usize = 128;

/// Maximum number of devices that may hold controller privilege over a single device.
pub const CONTROLLER_CAPACITY: usize = 128;

/// Bus address of a device
///
/// The whole `u16` range is addressable. There is no broadcast address: a packet reaches only
/// the device whose address equals the packet destination.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceId(u16);

impl DeviceId {
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    pub const fn into_u16(self) -> u16 {
        self.0
    }

    pub const fn to_le_bytes(self) -> [u8; 2] {
        self.0.to_le_bytes()
    }

    pub const fn from_le_bytes(bytes: [u8; 2]) -> Self {
        Self(u16::from_le_bytes(bytes))
    }
}

impl From<u16> for DeviceId {
    fn from(value: u16) -> Self {
        Self::new(value)
    }
}

impl From<DeviceId> for u16 {
    fn from(value: DeviceId) -> Self {
        value.into_u16()
    }
}

impl core::fmt::Display for DeviceId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Bus packet command
///
/// The four privileged commands mutate the state of the destination device when they come from
/// one of its controllers. From any other source they carry no meaning and the packet is handled
/// as application data, as is any opcode outside the known set.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Stop accepting application traffic
    Shutdown,
    /// Start accepting application traffic
    Start,
    /// Grant controller privilege to the device addressed by the payload
    AddControl,
    /// Revoke controller privilege from the device addressed by the payload
    RemoveControl,
    /// Application data
    SendData,
    /// Opcode outside the known set, kept verbatim
    Unknown(u16),
}

impl Command {
    const SHUTDOWN: u16 = 0;
    const START: u16 = 1;
    const ADD_CONTROL: u16 = 2;
    const REMOVE_CONTROL: u16 = 3;
    const SEND_DATA: u16 = 4;

    pub const fn try_from_u16(code: u16) -> Option<Command> {
        match Self::from_u16(code) {
            Command::Unknown(_) => None,
            command => Some(command),
        }
    }

    pub const fn from_u16(code: u16) -> Command {
        match code {
            Self::SHUTDOWN => Command::Shutdown,
            Self::START => Command::Start,
            Self::ADD_CONTROL => Command::AddControl,
            Self::REMOVE_CONTROL => Command::RemoveControl,
            Self::SEND_DATA => Command::SendData,
            other => Command::Unknown(other),
        }
    }

    pub const fn into_u16(self) -> u16 {
        match self {
            Command::Shutdown => Self::SHUTDOWN,
            Command::Start => Self::START,
            Command::AddControl => Self::ADD_CONTROL,
            Command::RemoveControl => Self::REMOVE_CONTROL,
            Command::SendData => Self::SEND_DATA,
            Command::Unknown(code) => code,
        }
    }

    /// Returns true for commands that only a controller may issue.
    pub const fn is_privileged(self) -> bool {
        matches!(
            self,
            Command::Shutdown | Command::Start | Command::AddControl | Command::RemoveControl
        )
    }
}

impl From<Command> for u16 {
    fn from(value: Command) -> Self {
        value.into_u16()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_codes() {
        assert_eq!(Command::from_u16(0), Command::Shutdown);
        assert_eq!(Command::from_u16(1), Command::Start);
        assert_eq!(Command::from_u16(2), Command::AddControl);
        assert_eq!(Command::from_u16(3), Command::RemoveControl);
        assert_eq!(Command::from_u16(4), Command::SendData);
        assert_eq!(Command::from_u16(5), Command::Unknown(5));

        for code in 0u16..8 {
            assert_eq!(Command::from_u16(code).into_u16(), code);
        }
        assert_eq!(Command::Unknown(0xbeef).into_u16(), 0xbeef);
    }

    #[test]
    fn test_command_try_from_u16() {
        assert_eq!(Command::try_from_u16(2), Some(Command::AddControl));
        assert_eq!(Command::try_from_u16(4), Some(Command::SendData));
        assert_eq!(Command::try_from_u16(9), None);
    }

    #[test]
    fn test_privileged_commands() {
        assert!(Command::Shutdown.is_privileged());
        assert!(Command::Start.is_privileged());
        assert!(Command::AddControl.is_privileged());
        assert!(Command::RemoveControl.is_privileged());
        assert!(!Command::SendData.is_privileged());
        assert!(!Command::Unknown(7).is_privileged());
        assert!(!Command::Unknown(42).is_privileged());
    }

    #[test]
    fn test_device_id_bytes() {
        let id = DeviceId::new(0xface);
        assert_eq!(id.to_le_bytes(), [0xce, 0xfa]);
        assert_eq!(DeviceId::from_le_bytes([0xce, 0xfa]), id);
        assert_eq!(u16::from(id), 0xface);
    }
}
