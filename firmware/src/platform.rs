//! Fixed physical layout of the PocketRiscV platform.
//!
//! The soft-CPU sees its control registers, both framebuffers and the SDRAM
//! reserved for testing at fixed addresses. Nothing here is discovered at
//! runtime.
//!
//! ```text
//! 0x4000_0000  system registers
//! 0x1000_0000  framebuffer 0 (320x240 RGB565, 150 KiB used of 1 MiB)
//! 0x1010_0000  framebuffer 1
//! 0x1020_0000  SDRAM test window (1 MiB)
//! ```

// =============================================================================
// System registers
// =============================================================================

/// Base of the system register block.
pub const SYS_REG_BASE: usize = 0x4000_0000;

/// Register offsets from [`SYS_REG_BASE`].
pub mod reg {
    pub const STATUS: usize = 0x00;
    pub const CYCLE_LO: usize = 0x04;
    pub const CYCLE_HI: usize = 0x08;
    pub const DISPLAY_MODE: usize = 0x0C;
    pub const FB_SWAP: usize = 0x18;
}

/// FB_SWAP bit 0: written 1 to request a swap, reads 1 until the controller
/// has flipped at vertical blank.
pub const FB_SWAP_PENDING: u32 = 1 << 0;

// =============================================================================
// Display
// =============================================================================

pub const FB_WIDTH: usize = 320;
pub const FB_HEIGHT: usize = 240;
pub const FB_PIXELS: usize = FB_WIDTH * FB_HEIGHT;

/// Physical base of each surface, indexed by surface number.
pub const FRAMEBUFFER_BASE: [usize; 2] = [0x1000_0000, 0x1010_0000];

/// Size of the window reserved for each surface.
pub const FRAMEBUFFER_WINDOW: usize = 0x0010_0000;

// =============================================================================
// Memory under test
// =============================================================================

pub const SDRAM_TEST_BASE: u32 = 0x1020_0000;
pub const SDRAM_TEST_SIZE: u32 = 1024 * 1024;

/// Words tested per frame: 4 KiB keeps a full six-phase pass well inside
/// one refresh period.
pub const WORDS_PER_FRAME: u32 = 1024;

// =============================================================================
// Static system description shown on the info panel
// =============================================================================

pub const CPU_NAME: &str = "VexRiscv 133MHz";
pub const RAM_DESC: &str = "64KB BRAM";
pub const SDRAM_DESC: &str = "64MB";
