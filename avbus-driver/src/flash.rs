//! Persistent storage interface
//!
//! Flash is erased a page at a time and programmed a 32-bit word at a time. Word addresses must
//! be 4-byte aligned. Multi-word writes fail fast and do not roll back words already written.

/// Flash operation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlashError {
    /// The address is not a multiple of the word size
    Misaligned,
    /// The controller reported an access, voltage or programming fault, or the address is
    /// outside the flash
    Fault,
}

/// Flash memory layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FlashGeometry {
    /// Address of the first byte
    pub start: u32,
    /// Erase unit in bytes. Must be a power of two.
    pub page_size: u32,
    /// Address one past the last byte
    pub end: u32,
}

impl Default for FlashGeometry {
    fn default() -> Self {
        // 256 KiB part with 1 KiB pages
        Self {
            start: 0x0000_0000,
            page_size: 0x0000_0400,
            end: 0x0004_0000,
        }
    }
}

impl FlashGeometry {
    pub const WORD_SIZE: u32 = 4;

    /// Returns true if `page_size` is a power of two and `start..end` is not reversed.
    pub const fn is_valid(&self) -> bool {
        self.page_size.is_power_of_two() && self.start <= self.end
    }

    /// Start address of the page containing `addr`. Meaningful for valid geometries only.
    pub const fn page_base(&self, addr: u32) -> u32 {
        addr & !self.page_size.wrapping_sub(1)
    }

    pub const fn contains(&self, addr: u32) -> bool {
        self.start <= addr && addr < self.end
    }

    pub const fn is_word_aligned(addr: u32) -> bool {
        addr & (Self::WORD_SIZE - 1) == 0
    }

    pub const fn size(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }
}

/// Page-erase / word-program storage
pub trait Flash {
    /// Erases the page containing `addr`.
    fn erase_page(&mut self, addr: u32) -> Result<(), FlashError>;

    /// Programs a single word. `addr` must be word-aligned.
    fn write_word(&mut self, data: u32, addr: u32) -> Result<(), FlashError>;

    /// Programs consecutive words starting at `addr`.
    ///
    /// Stops at the first failing word. Words written before the failure stay written.
    fn write(&mut self, data: &[u32], addr: u32) -> Result<(), FlashError> {
        if !FlashGeometry::is_word_aligned(addr) {
            return Err(FlashError::Misaligned);
        }

        let mut word_addr = addr;
        for &word in data {
            if let Err(err) = self.write_word(word, word_addr) {
                warn!("flash write failed at {:#x}: {:?}", word_addr, err);
                return Err(err);
            }
            word_addr = word_addr.wrapping_add(FlashGeometry::WORD_SIZE);
        }
        Ok(())
    }
}
