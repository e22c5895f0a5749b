//! RAM-backed flash emulation
//!
//! Behaves like NOR flash: erasing sets every byte of a page to `0xff`, programming can only
//! clear bits. Programming a word that was not erased first yields the bitwise AND of the old
//! and new contents.

use avbus_driver::flash::{Flash, FlashError, FlashGeometry};
use log::{debug, warn};
use std::collections::BTreeSet;

const ERASED: u8 = 0xff;

pub struct MemFlash {
    geometry: FlashGeometry,
    memory: Vec<u8>,
    faults: BTreeSet<u32>,
}

impl MemFlash {
    /// Creates an erased flash of the given layout.
    ///
    /// Panics if `geometry` is not valid.
    pub fn new(geometry: FlashGeometry) -> Self {
        assert!(geometry.is_valid(), "invalid flash geometry {:?}", geometry);
        Self {
            geometry,
            memory: vec![ERASED; geometry.size() as usize],
            faults: BTreeSet::new(),
        }
    }

    /// Reads back a word. Returns `None` outside the flash.
    pub fn read_word(&self, addr: u32) -> Option<u32> {
        let offset = self.word_offset(addr)?;
        let bytes = &self.memory[offset..offset + FlashGeometry::WORD_SIZE as usize];
        Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Whole flash content, starting at the geometry start address.
    pub fn as_bytes(&self) -> &[u8] {
        &self.memory
    }

    /// Makes programming the word at `addr`, and erasing its page, report a hardware fault.
    pub fn inject_fault(&mut self, addr: u32) {
        self.faults.insert(addr);
    }

    pub fn clear_faults(&mut self) {
        self.faults.clear();
    }

    fn word_offset(&self, addr: u32) -> Option<usize> {
        let last = addr.checked_add(FlashGeometry::WORD_SIZE - 1)?;
        if !self.geometry.contains(addr) || !self.geometry.contains(last) {
            return None;
        }
        Some((addr - self.geometry.start) as usize)
    }
}

impl Default for MemFlash {
    fn default() -> Self {
        Self::new(FlashGeometry::default())
    }
}

impl Flash for MemFlash {
    fn erase_page(&mut self, addr: u32) -> Result<(), FlashError> {
        if !self.geometry.contains(addr) {
            warn!("flash: erase outside flash at {:#x}", addr);
            return Err(FlashError::Fault);
        }

        let base = self.geometry.page_base(addr).max(self.geometry.start);
        let end = base
            .saturating_add(self.geometry.page_size)
            .min(self.geometry.end);
        if self.faults.range(base..end).next().is_some() {
            warn!("flash: erase fault in page {:#x}", base);
            return Err(FlashError::Fault);
        }

        let start = (base - self.geometry.start) as usize;
        let stop = (end - self.geometry.start) as usize;
        self.memory[start..stop].fill(ERASED);
        debug!("flash: erased page {:#x}", base);
        Ok(())
    }

    fn write_word(&mut self, data: u32, addr: u32) -> Result<(), FlashError> {
        if !FlashGeometry::is_word_aligned(addr) {
            return Err(FlashError::Misaligned);
        }
        let Some(offset) = self.word_offset(addr) else {
            warn!("flash: write outside flash at {:#x}", addr);
            return Err(FlashError::Fault);
        };
        if self.faults.contains(&addr) {
            return Err(FlashError::Fault);
        }

        for (cell, byte) in self.memory[offset..].iter_mut().zip(data.to_le_bytes()) {
            *cell &= byte;
        }
        Ok(())
    }
}
