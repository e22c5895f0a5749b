//! Application-level packet and its conversion to and from bus packets

use crate::core::{Command, DeviceId, PAYLOAD_CAPACITY};

pub use avbus_driver::packet::{BusPacket, MalformedPacket, Payload};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PayloadTooLong;

/// Packet exchanged with the application above the router
///
/// `device_id` is the peer: the source of a received packet, or the destination of a packet
/// about to be sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ApplicationPacket {
    pub device_id: DeviceId,
    pub data_type: u16,
    pub data_len: u16,
    pub payload: Payload,
}

impl ApplicationPacket {
    /// Creates a packet for `peer`. The rest of the payload is zero-filled.
    pub fn new(peer: DeviceId, data_type: u16, data: &[u8]) -> Result<Self, PayloadTooLong> {
        if data.len() > PAYLOAD_CAPACITY {
            return Err(PayloadTooLong);
        }

        let mut payload = [0; PAYLOAD_CAPACITY];
        payload[..data.len()].copy_from_slice(data);
        Ok(Self {
            device_id: peer,
            data_type,
            // Bounded by PAYLOAD_CAPACITY above
            data_len: data.len() as u16,
            payload,
        })
    }

    /// Meaningful payload bytes, as declared by `data_len`.
    pub fn data(&self) -> &[u8] {
        let len = usize::from(self.data_len).min(PAYLOAD_CAPACITY);
        &self.payload[..len]
    }

    /// Builds the application view of a received bus packet.
    ///
    /// The whole payload is copied, not only the declared `data_len` bytes.
    pub fn from_bus(packet: &BusPacket) -> Self {
        Self {
            device_id: packet.src_id,
            data_type: packet.data_type,
            data_len: packet.data_len,
            payload: packet.payload,
        }
    }

    /// Wraps the packet for transmission from `self_id`.
    pub fn to_bus(&self, self_id: DeviceId) -> BusPacket {
        BusPacket {
            dst_id: self.device_id,
            src_id: self_id,
            command: Command::SendData,
            data_type: self.data_type,
            data_len: self.data_len,
            payload: self.payload,
        }
    }
}

impl From<&BusPacket> for ApplicationPacket {
    fn from(packet: &BusPacket) -> Self {
        Self::from_bus(packet)
    }
}
