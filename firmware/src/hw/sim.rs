//! Simulated platform for host runs and tests.
//!
//! [`SimRegisters`] models the register block closely enough to drive the
//! real control loop: a ticking cycle counter and a swap handshake that
//! acknowledges after a configurable number of polls. [`SimMemory`] backs
//! address windows with vectors and can be told to corrupt specific words.

use std::collections::BTreeMap;

use super::{Register, Registers, TestMemory};
use crate::platform::FB_SWAP_PENDING;

/// Cycles per displayed frame at 133 MHz and 60 Hz.
pub const CYCLES_PER_FRAME: u64 = 133_000_000 / 60;

/// Value reported by STATUS: bit 0 set means the system is up.
pub const STATUS_READY: u32 = 1;

pub struct SimRegisters {
    cycles: u64,
    display_mode: u32,
    swap_pending: bool,
    swap_latency: u32,
    polls_left: u32,
    swaps: u64,
    displayed: usize,
}

impl SimRegisters {
    pub fn new() -> Self {
        Self {
            cycles: 0,
            display_mode: 0,
            swap_pending: false,
            swap_latency: 0,
            polls_left: 0,
            swaps: 0,
            displayed: 0,
        }
    }

    /// Number of FB_SWAP reads that still report pending after a request.
    pub fn with_swap_latency(mut self, polls: u32) -> Self {
        self.swap_latency = polls;
        self
    }

    pub fn set_cycles(&mut self, cycles: u64) {
        self.cycles = cycles;
    }

    /// Completed swaps since reset.
    pub fn swaps(&self) -> u64 {
        self.swaps
    }

    /// Index of the surface the simulated controller is scanning out.
    pub fn displayed(&self) -> usize {
        self.displayed
    }

    pub fn raw_display_mode(&self) -> u32 {
        self.display_mode
    }

    fn tick(&mut self) {
        self.cycles = self.cycles.wrapping_add(1);
    }

    fn poll_swap(&mut self) -> u32 {
        if !self.swap_pending {
            return 0;
        }
        if self.polls_left > 0 {
            self.polls_left -= 1;
            return FB_SWAP_PENDING;
        }
        // vertical blank: flip and let a frame's worth of time pass
        self.swap_pending = false;
        self.swaps += 1;
        self.displayed ^= 1;
        self.cycles = self.cycles.wrapping_add(CYCLES_PER_FRAME);
        0
    }
}

impl Default for SimRegisters {
    fn default() -> Self {
        Self::new()
    }
}

impl Registers for SimRegisters {
    fn read(&mut self, reg: Register) -> u32 {
        let value = match reg {
            Register::Status => STATUS_READY,
            Register::CycleLo => self.cycles as u32,
            Register::CycleHi => (self.cycles >> 32) as u32,
            Register::DisplayMode => self.display_mode,
            Register::FbSwap => self.poll_swap(),
        };
        self.tick();
        value
    }

    fn write(&mut self, reg: Register, value: u32) {
        match reg {
            Register::DisplayMode => self.display_mode = value & 1,
            Register::FbSwap if value & FB_SWAP_PENDING != 0 && !self.swap_pending => {
                self.swap_pending = true;
                self.polls_left = self.swap_latency;
            }
            _ => {}
        }
        self.tick();
    }
}

/// How a faulty word misbehaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// Reads return the stored value with `mask` bits flipped.
    Flip { mask: u32 },
    /// Bits in `mask` always read as the matching bits of `value`.
    StuckAt { mask: u32, value: u32 },
}

impl Fault {
    fn apply(self, stored: u32) -> u32 {
        match self {
            Fault::Flip { mask } => stored ^ mask,
            Fault::StuckAt { mask, value } => (stored & !mask) | (value & mask),
        }
    }
}

struct Window {
    base: u32,
    words: Vec<u32>,
    writes: Vec<u32>,
}

impl Window {
    fn index(&self, addr: u32) -> Option<usize> {
        let offset = addr.checked_sub(self.base)?;
        if offset % 4 != 0 {
            return None;
        }
        let idx = (offset / 4) as usize;
        (idx < self.words.len()).then_some(idx)
    }
}

/// Vector-backed test memory covering one or more address windows.
///
/// Accessing an address outside every window panics: on hardware that would
/// be a bus fault, and in a test it means the engine strayed outside its
/// region.
#[derive(Default)]
pub struct SimMemory {
    windows: Vec<Window>,
    faults: BTreeMap<u32, Fault>,
}

impl SimMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `size_bytes` of zeroed memory at `base`.
    pub fn add_window(&mut self, base: u32, size_bytes: u32) {
        let words = (size_bytes / 4) as usize;
        self.windows.push(Window {
            base,
            words: vec![0; words],
            writes: vec![0; words],
        });
    }

    pub fn with_window(mut self, base: u32, size_bytes: u32) -> Self {
        self.add_window(base, size_bytes);
        self
    }

    pub fn inject(&mut self, addr: u32, fault: Fault) {
        self.faults.insert(addr, fault);
    }

    pub fn clear_faults(&mut self) {
        self.faults.clear();
    }

    /// How many times `addr` has been written.
    pub fn write_count(&self, addr: u32) -> u32 {
        self.locate(addr)
            .map(|(w, idx)| self.windows[w].writes[idx])
            .unwrap_or(0)
    }

    pub fn reset_write_counts(&mut self) {
        for window in &mut self.windows {
            window.writes.fill(0);
        }
    }

    /// Addresses written at least once, ascending.
    pub fn written_addresses(&self) -> Vec<u32> {
        let mut out = Vec::new();
        for window in &self.windows {
            for (idx, &count) in window.writes.iter().enumerate() {
                if count > 0 {
                    out.push(window.base + idx as u32 * 4);
                }
            }
        }
        out
    }

    fn locate(&self, addr: u32) -> Option<(usize, usize)> {
        self.windows
            .iter()
            .enumerate()
            .find_map(|(w, window)| window.index(addr).map(|idx| (w, idx)))
    }

    fn expect_mapped(&self, addr: u32) -> (usize, usize) {
        match self.locate(addr) {
            Some(hit) => hit,
            None => panic!("simulated bus fault at {addr:#010x}"),
        }
    }
}

impl TestMemory for SimMemory {
    fn write_word(&mut self, addr: u32, value: u32) {
        let (w, idx) = self.expect_mapped(addr);
        let window = &mut self.windows[w];
        window.words[idx] = value;
        window.writes[idx] = window.writes[idx].saturating_add(1);
    }

    fn read_word(&mut self, addr: u32) -> u32 {
        let (w, idx) = self.expect_mapped(addr);
        let stored = self.windows[w].words[idx];
        match self.faults.get(&addr) {
            Some(fault) => fault.apply(stored),
            None => stored,
        }
    }
}
