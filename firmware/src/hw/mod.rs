//! Hardware access traits.
//!
//! The control loop never touches an address directly. System registers go
//! through [`Registers`] and the memory under test through [`TestMemory`], so
//! the same loop runs on the board ([`mmio`]) and on the host ([`sim`]).
//!
//! | Offset | Name         | Direction |
//! |--------|--------------|-----------|
//! | 0x00   | STATUS       | R         |
//! | 0x04   | CYCLE_LO     | R         |
//! | 0x08   | CYCLE_HI     | R         |
//! | 0x0C   | DISPLAY_MODE | RW        |
//! | 0x18   | FB_SWAP      | RW        |

use core::hint::spin_loop;

use crate::platform::{reg, FB_SWAP_PENDING};

pub mod mmio;
#[cfg(any(test, feature = "sim"))]
pub mod sim;

/// A system register, by name rather than offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    Status,
    CycleLo,
    CycleHi,
    DisplayMode,
    FbSwap,
}

impl Register {
    pub const fn offset(self) -> usize {
        match self {
            Register::Status => reg::STATUS,
            Register::CycleLo => reg::CYCLE_LO,
            Register::CycleHi => reg::CYCLE_HI,
            Register::DisplayMode => reg::DISPLAY_MODE,
            Register::FbSwap => reg::FB_SWAP,
        }
    }
}

/// What the video output shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum DisplayMode {
    Terminal = 0,
    Framebuffer = 1,
}

impl DisplayMode {
    pub const fn from_raw(value: u32) -> Self {
        if value & 1 == 0 {
            DisplayMode::Terminal
        } else {
            DisplayMode::Framebuffer
        }
    }
}

/// Typed access to the system register block.
///
/// Implementors only provide raw `read`/`write`; the protocol built on top
/// (64-bit counter reads, the swap handshake) lives in the provided methods.
pub trait Registers {
    fn read(&mut self, reg: Register) -> u32;
    fn write(&mut self, reg: Register, value: u32);

    /// Read the free-running 64-bit cycle counter.
    ///
    /// The halves are separate registers, so the high word is sampled on
    /// both sides of the low word and the read retried if a carry slipped
    /// in between.
    fn cycles(&mut self) -> u64 {
        loop {
            let hi = self.read(Register::CycleHi);
            let lo = self.read(Register::CycleLo);
            if self.read(Register::CycleHi) == hi {
                return (u64::from(hi) << 32) | u64::from(lo);
            }
        }
    }

    fn set_display_mode(&mut self, mode: DisplayMode) {
        self.write(Register::DisplayMode, mode as u32);
    }

    fn display_mode(&mut self) -> DisplayMode {
        DisplayMode::from_raw(self.read(Register::DisplayMode))
    }

    /// Ask the display controller to present the surface just drawn.
    fn request_swap(&mut self) {
        self.write(Register::FbSwap, FB_SWAP_PENDING);
    }

    fn swap_pending(&mut self) -> bool {
        self.read(Register::FbSwap) & FB_SWAP_PENDING != 0
    }

    /// Block until the controller has flipped surfaces at vertical blank.
    ///
    /// No timeout: the controller always acknowledges once per frame.
    fn wait_swap_complete(&mut self) {
        while self.swap_pending() {
            spin_loop();
        }
    }
}

/// Word-granular access to the memory under test, by physical address.
///
/// Every access must really reach the memory: implementations on hardware
/// use volatile operations so no pattern write or read-back is elided.
pub trait TestMemory {
    fn write_word(&mut self, addr: u32, value: u32);
    fn read_word(&mut self, addr: u32) -> u32;
}

impl<T: TestMemory + ?Sized> TestMemory for &mut T {
    fn write_word(&mut self, addr: u32, value: u32) {
        (**self).write_word(addr, value)
    }

    fn read_word(&mut self, addr: u32) -> u32 {
        (**self).read_word(addr)
    }
}

impl<T: Registers + ?Sized> Registers for &mut T {
    fn read(&mut self, reg: Register) -> u32 {
        (**self).read(reg)
    }

    fn write(&mut self, reg: Register, value: u32) {
        (**self).write(reg, value)
    }
}

#[cfg(test)]
mod tests {
    use super::sim::SimRegisters;
    use super::*;

    #[test]
    fn register_offsets_match_platform_map() {
        assert_eq!(Register::Status.offset(), 0x00);
        assert_eq!(Register::CycleLo.offset(), 0x04);
        assert_eq!(Register::CycleHi.offset(), 0x08);
        assert_eq!(Register::DisplayMode.offset(), 0x0C);
        assert_eq!(Register::FbSwap.offset(), 0x18);
    }

    #[test]
    fn display_mode_round_trips_through_register() {
        let mut regs = SimRegisters::new();
        assert_eq!(regs.display_mode(), DisplayMode::Terminal);
        regs.set_display_mode(DisplayMode::Framebuffer);
        assert_eq!(regs.display_mode(), DisplayMode::Framebuffer);
        assert_eq!(regs.read(Register::DisplayMode), 1);
    }

    #[test]
    fn cycles_combines_halves() {
        let mut regs = SimRegisters::new();
        regs.set_cycles(0x0000_0003_1234_0000);
        let value = regs.cycles();
        assert_eq!(value >> 32, 3);
        assert!(value >= 0x0000_0003_1234_0000);
    }

    #[test]
    fn cycles_retries_across_low_word_carry() {
        let mut regs = SimRegisters::new();
        // The counter ticks on every access, so the low word wraps between
        // the first high read and the low read.
        regs.set_cycles(0x0000_0001_FFFF_FFFF);
        let value = regs.cycles();
        assert_eq!(value >> 32, 2);
        assert!(value > 0x0000_0001_FFFF_FFFF);
    }

    #[test]
    fn swap_handshake_waits_for_ack() {
        let mut regs = SimRegisters::new().with_swap_latency(3);
        regs.request_swap();
        assert!(regs.swap_pending());
        regs.wait_swap_complete();
        assert!(!regs.swap_pending());
        assert_eq!(regs.swaps(), 1);
    }
}
