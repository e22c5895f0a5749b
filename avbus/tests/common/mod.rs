#![allow(dead_code)]

use avbus::driver::transport::Transport;
use avbus::packet::BusPacket;
use std::collections::VecDeque;

/// Transport fed from a script of inbound reads
///
/// Each queued chunk satisfies exactly one `read_exact` call. A chunk shorter than the request
/// models a channel failing mid-read.
pub struct ScriptedTransport<'a> {
    inbound: VecDeque<Vec<u8>>,
    outbound: Vec<u8>,
    on_idle: Option<Box<dyn FnMut() + 'a>>,
    idle_polls: usize,
}

impl<'a> ScriptedTransport<'a> {
    pub fn new() -> Self {
        Self {
            inbound: VecDeque::new(),
            outbound: Vec::new(),
            on_idle: None,
            idle_polls: 0,
        }
    }

    pub fn push(&mut self, packet: &BusPacket) {
        self.inbound.push_back(packet.encode().to_vec());
    }

    pub fn push_raw(&mut self, bytes: &[u8]) {
        self.inbound.push_back(bytes.to_vec());
    }

    /// Runs `hook` each time `available` finds nothing to read.
    pub fn on_idle(&mut self, hook: impl FnMut() + 'a) {
        self.on_idle = Some(Box::new(hook));
    }

    pub fn pending(&self) -> usize {
        self.inbound.len()
    }

    pub fn idle_polls(&self) -> usize {
        self.idle_polls
    }

    pub fn sent(&self) -> Vec<BusPacket> {
        assert_eq!(self.outbound.len() % BusPacket::WIRE_SIZE, 0);
        self.outbound
            .chunks_exact(BusPacket::WIRE_SIZE)
            .map(|chunk| BusPacket::decode(chunk).unwrap())
            .collect()
    }
}

impl<'a> Transport for ScriptedTransport<'a> {
    fn available(&mut self) -> bool {
        if self.inbound.is_empty() {
            self.idle_polls += 1;
            if let Some(hook) = self.on_idle.as_mut() {
                hook();
            }
            false
        } else {
            true
        }
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> usize {
        let Some(chunk) = self.inbound.pop_front() else {
            return 0;
        };
        let len = chunk.len().min(buf.len());
        buf[..len].copy_from_slice(&chunk[..len]);
        len
    }

    fn write_exact(&mut self, bytes: &[u8]) {
        self.outbound.extend_from_slice(bytes);
    }
}
