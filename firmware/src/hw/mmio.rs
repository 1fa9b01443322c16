//! Memory-mapped implementations of the hardware traits.
//!
//! These are what the bare-metal image uses. All access is volatile; the
//! compiler must neither merge nor drop a register poke or a pattern write.

use core::ptr::{read_volatile, write_volatile};

use super::{Register, Registers, TestMemory};
use crate::platform::{FB_PIXELS, FRAMEBUFFER_BASE, SYS_REG_BASE};

/// The system register block at a fixed physical address.
pub struct PocketRegisters {
    base: usize,
}

impl PocketRegisters {
    /// # Safety
    ///
    /// `base` must be the address of the system register block and nothing
    /// else may drive those registers while this value is alive.
    pub const unsafe fn new(base: usize) -> Self {
        Self { base }
    }

    /// The block at its platform address.
    ///
    /// # Safety
    ///
    /// Same contract as [`PocketRegisters::new`]: at most one instance.
    pub const unsafe fn platform() -> Self {
        Self::new(SYS_REG_BASE)
    }
}

impl Registers for PocketRegisters {
    #[inline]
    fn read(&mut self, reg: Register) -> u32 {
        // SAFETY: base + offset is inside the register block per `new`.
        unsafe { read_volatile((self.base + reg.offset()) as *const u32) }
    }

    #[inline]
    fn write(&mut self, reg: Register, value: u32) {
        // SAFETY: base + offset is inside the register block per `new`.
        unsafe { write_volatile((self.base + reg.offset()) as *mut u32, value) }
    }
}

/// Direct word access to physical memory for the integrity test.
///
/// Addresses are physical and must be word aligned; the configuration
/// validator guarantees both for every region handed to the engine.
pub struct SdramBus {
    _private: (),
}

impl SdramBus {
    /// # Safety
    ///
    /// Every address later passed to `read_word`/`write_word` must be
    /// mapped, word aligned and unused by anything else, including the code,
    /// stack and framebuffers.
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }
}

impl TestMemory for SdramBus {
    #[inline]
    fn write_word(&mut self, addr: u32, value: u32) {
        // SAFETY: caller of `new` vouched for every tested address.
        unsafe { write_volatile(addr as usize as *mut u32, value) }
    }

    #[inline]
    fn read_word(&mut self, addr: u32) -> u32 {
        // SAFETY: as above.
        unsafe { read_volatile(addr as usize as *const u32) }
    }
}

/// Borrow one hardware surface for the rest of the program.
///
/// # Safety
///
/// Must be called at most once per `index`, and `index` must be 0 or 1. The
/// surface window is plain SDRAM that only the display controller reads.
pub unsafe fn framebuffer(index: usize) -> &'static mut [u16] {
    // SAFETY: the window is FB_PIXELS u16s of dedicated RAM; uniqueness is
    // the caller's obligation.
    unsafe { core::slice::from_raw_parts_mut(FRAMEBUFFER_BASE[index] as *mut u16, FB_PIXELS) }
}
