//! Bus packet wire format
//!
//! A bus packet always occupies [`BusPacket::WIRE_SIZE`] bytes on the wire. All integers are
//! little-endian and laid out in declaration order:
//!
//! ```text
//! offset  size  field
//!      0     2  dst_id
//!      2     2  src_id
//!      4     2  command
//!      6     2  data_type
//!      8     2  data_len
//!     10   128  payload
//! ```
//!
//! The payload is transmitted in full. `data_len` only bounds the meaningful bytes.

use avbus_core::{Command, DeviceId, PAYLOAD_CAPACITY};

/// Fixed-size packet payload
pub type Payload = [u8; PAYLOAD_CAPACITY];

/// Fewer bytes than a whole packet were received
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MalformedPacket {
    pub received: usize,
}

/// Bus-level packet
///
/// `Default` yields the all-zero packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusPacket {
    pub dst_id: DeviceId,
    pub src_id: DeviceId,
    pub command: Command,
    pub data_type: u16,
    pub data_len: u16,
    pub payload: Payload,
}

impl Default for BusPacket {
    fn default() -> Self {
        Self {
            dst_id: DeviceId::new(0),
            src_id: DeviceId::new(0),
            command: Command::Shutdown,
            data_type: 0,
            data_len: 0,
            payload: [0; PAYLOAD_CAPACITY],
        }
    }
}

impl BusPacket {
    const HEADER_SIZE: usize = 10;
    pub const WIRE_SIZE: usize = Self::HEADER_SIZE + PAYLOAD_CAPACITY;

    /// Creates a command packet with an empty payload.
    pub fn new_command(src_id: DeviceId, dst_id: DeviceId, command: Command) -> Self {
        Self {
            dst_id,
            src_id,
            command,
            ..Default::default()
        }
    }

    /// Creates a controller-list command packet carrying `target` in the first payload bytes.
    pub fn new_control(
        src_id: DeviceId,
        dst_id: DeviceId,
        command: Command,
        target: DeviceId,
    ) -> Self {
        let mut packet = Self::new_command(src_id, dst_id, command);
        packet.data_len = 2;
        packet.payload[..2].copy_from_slice(&target.to_le_bytes());
        packet
    }

    /// Device addressed by an `AddControl` or `RemoveControl` command.
    ///
    /// Reads the first two payload bytes regardless of the declared data length.
    pub fn target_id(&self) -> DeviceId {
        DeviceId::from_le_bytes([self.payload[0], self.payload[1]])
    }

    /// Parses a packet from the first [`Self::WIRE_SIZE`] bytes of `bytes`.
    pub fn decode(bytes: &[u8]) -> Result<Self, MalformedPacket> {
        let Some(wire) = bytes.get(..Self::WIRE_SIZE) else {
            return Err(MalformedPacket {
                received: bytes.len(),
            });
        };

        let word = |offset: usize| u16::from_le_bytes([wire[offset], wire[offset + 1]]);
        let mut payload = [0; PAYLOAD_CAPACITY];
        payload.copy_from_slice(&wire[Self::HEADER_SIZE..]);

        Ok(Self {
            dst_id: DeviceId::new(word(0)),
            src_id: DeviceId::new(word(2)),
            command: Command::from_u16(word(4)),
            data_type: word(6),
            data_len: word(8),
            payload,
        })
    }

    pub fn encode(&self) -> [u8; Self::WIRE_SIZE] {
        let mut wire = [0; Self::WIRE_SIZE];
        let words = [
            self.dst_id.into_u16(),
            self.src_id.into_u16(),
            self.command.into_u16(),
            self.data_type,
            self.data_len,
        ];
        for (chunk, word) in wire[..Self::HEADER_SIZE].chunks_exact_mut(2).zip(words) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
        wire[Self::HEADER_SIZE..].copy_from_slice(&self.payload);
        wire
    }
}
