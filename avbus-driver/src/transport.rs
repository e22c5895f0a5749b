//! Byte channel connecting a device to the bus

use crate::packet::{BusPacket, MalformedPacket};

/// Reliable, blocking, point-to-point byte channel
///
/// A UART attached to the shared bus is the typical implementation. The stack assumes the
/// channel is lossless and synchronous: it never retries and never applies back-pressure.
pub trait Transport {
    /// Returns true if at least one byte can be read. Must not block.
    fn available(&mut self) -> bool;

    /// Blocks until `buf` is filled and returns the number of bytes copied.
    ///
    /// A count below `buf.len()` signals that the channel failed mid-read.
    fn read_exact(&mut self, buf: &mut [u8]) -> usize;

    /// Blocks until all `bytes` are written.
    fn write_exact(&mut self, bytes: &[u8]);
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn available(&mut self) -> bool {
        (**self).available()
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> usize {
        (**self).read_exact(buf)
    }

    fn write_exact(&mut self, bytes: &[u8]) {
        (**self).write_exact(bytes)
    }
}

/// Reads one whole packet. Blocks until it arrives.
pub fn read_packet<T: Transport + ?Sized>(transport: &mut T) -> Result<BusPacket, MalformedPacket> {
    let mut wire = [0; BusPacket::WIRE_SIZE];
    let received = transport.read_exact(&mut wire);
    if received < wire.len() {
        warn!("short packet read: {} of {} bytes", received, wire.len());
    }
    BusPacket::decode(&wire[..received.min(wire.len())])
}

/// Writes one whole packet. Blocks until it is sent.
pub fn write_packet<T: Transport + ?Sized>(transport: &mut T, packet: &BusPacket) {
    transport.write_exact(&packet.encode());
}
