//! Multi-drop serial bus emulation
//!
//! All devices share a single line: every byte written by any port reaches the receive queue of
//! every port, the writer included. A port only sees traffic written after it was attached.
//! A port that is attached but never reads keeps accumulating traffic until it is dropped.

use avbus_driver::transport::Transport;
use core::cell::RefCell;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use log::{debug, trace};
use std::collections::VecDeque;
use std::thread;

#[derive(Debug)]
struct Slot {
    queue: VecDeque<u8>,
    attached: bool,
}

#[derive(Debug)]
struct Inner {
    slots: Vec<Slot>,
    closed: bool,
}

impl Inner {
    fn broadcast(&mut self, bytes: &[u8]) {
        for slot in self.slots.iter_mut().filter(|slot| slot.attached) {
            slot.queue.extend(bytes);
        }
    }
}

/// Shared bus medium
///
/// Ports borrow the bus, so the bus must outlive every device thread. `std::thread::scope`
/// fits this well.
pub struct SharedBus {
    inner: Mutex<CriticalSectionRawMutex, RefCell<Inner>>,
}

impl SharedBus {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Inner {
                slots: Vec::new(),
                closed: false,
            })),
        }
    }

    /// Connects a new device to the bus.
    pub fn attach(&self) -> BusPort<'_> {
        let index = self.inner.lock(|inner| {
            let mut inner = inner.borrow_mut();
            inner.slots.push(Slot {
                queue: VecDeque::new(),
                attached: true,
            });
            inner.slots.len() - 1
        });
        debug!("bus: port {} attached", index);
        BusPort { bus: self, index }
    }

    /// Shuts the line down.
    ///
    /// Blocked and future reads return whatever is queued, possibly short. Writes are discarded.
    pub fn close(&self) {
        self.inner.lock(|inner| inner.borrow_mut().closed = true);
        debug!("bus: closed");
    }

    pub fn is_closed(&self) -> bool {
        self.inner.lock(|inner| inner.borrow().closed)
    }

    /// Puts raw bytes on the line as if some device had written them.
    pub fn inject(&self, bytes: &[u8]) {
        self.inner.lock(|inner| inner.borrow_mut().broadcast(bytes));
    }

    /// Number of bytes waiting in the receive queue of every port, in attach order.
    ///
    /// Dropped ports report zero.
    pub fn pending(&self) -> Vec<usize> {
        self.inner.lock(|inner| {
            let inner = inner.borrow();
            inner.slots.iter().map(|slot| slot.queue.len()).collect()
        })
    }
}

impl Default for SharedBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Device connection to a [`SharedBus`]
pub struct BusPort<'a> {
    bus: &'a SharedBus,
    index: usize,
}

impl BusPort<'_> {
    pub fn index(&self) -> usize {
        self.index
    }

    /// Copies out `buf.len()` bytes, or everything queued once the bus is closed.
    fn try_read(&self, buf: &mut [u8]) -> Option<usize> {
        self.bus.inner.lock(|inner| {
            let mut inner = inner.borrow_mut();
            let closed = inner.closed;
            let queue = &mut inner.slots[self.index].queue;
            if queue.len() < buf.len() && !closed {
                return None;
            }

            let len = queue.len().min(buf.len());
            for (dst, src) in buf.iter_mut().zip(queue.drain(..len)) {
                *dst = src;
            }
            Some(len)
        })
    }
}

impl Transport for BusPort<'_> {
    fn available(&mut self) -> bool {
        self.bus
            .inner
            .lock(|inner| !inner.borrow().slots[self.index].queue.is_empty())
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> usize {
        loop {
            if let Some(len) = self.try_read(buf) {
                return len;
            }
            thread::yield_now();
        }
    }

    fn write_exact(&mut self, bytes: &[u8]) {
        self.bus.inner.lock(|inner| {
            let mut inner = inner.borrow_mut();
            if inner.closed {
                trace!("bus: port {} wrote after close", self.index);
                return;
            }
            inner.broadcast(bytes);
        });
    }
}

impl Drop for BusPort<'_> {
    fn drop(&mut self) {
        self.bus.inner.lock(|inner| {
            let mut inner = inner.borrow_mut();
            let slot = &mut inner.slots[self.index];
            slot.attached = false;
            slot.queue = VecDeque::new();
        });
        debug!("bus: port {} detached", self.index);
    }
}
