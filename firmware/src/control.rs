//! The dashboard control loop.
//!
//! One iteration per displayed frame:
//!
//! 1. read the cycle counter and snapshot every region,
//! 2. draw the dashboard into the writable surface,
//! 3. present it and wait for the swap (the only blocking point),
//! 4. give each unfinished region one chunk of memory testing.
//!
//! Because testing happens after the swap, the frame drawn in iteration N
//! shows the test state left by iteration N-1.

use crate::config::{ConfigError, DashboardConfig, SystemInfo, MAX_REGIONS};
use crate::dashboard::{self, DashboardState};
use crate::graphics::swap::FrameSurfaces;
use crate::hw::{DisplayMode, Registers, TestMemory};
use crate::logger;
use crate::memtest::MemoryRegion;
use crate::selftest::{self, SelfTestResult};

pub struct Dashboard<'fb, R: Registers, M: TestMemory> {
    registers: R,
    memory: M,
    surfaces: FrameSurfaces<'fb>,
    regions: heapless::Vec<MemoryRegion, MAX_REGIONS>,
    chunk_words: u32,
    system: SystemInfo,
    self_test: SelfTestResult,
    frame: u32,
}

impl<'fb, R: Registers, M: TestMemory> Dashboard<'fb, R, M> {
    /// Validate `config`, switch the display to the framebuffer and run the
    /// CPU self-test. Nothing touches the memory under test until the first
    /// [`step`](Self::step).
    pub fn boot(
        mut registers: R,
        memory: M,
        surfaces: FrameSurfaces<'fb>,
        config: &DashboardConfig<'_>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut regions = heapless::Vec::new();
        for region in config.regions {
            regions
                .push(MemoryRegion::new(region))
                .map_err(|_| ConfigError::TooManyRegions {
                    count: config.regions.len(),
                })?;
            log::info!(
                "region '{}': {:#010x}, {} KiB",
                region.title,
                region.base,
                region.size_bytes / 1024
            );
        }
        log::info!(
            "testing {} words in total, {} per region per frame",
            config.total_words(),
            config.chunk_words
        );

        registers.set_display_mode(DisplayMode::Framebuffer);
        let self_test = selftest::run();

        Ok(Dashboard {
            registers,
            memory,
            surfaces,
            regions,
            chunk_words: config.chunk_words,
            system: config.system,
            self_test,
            frame: 0,
        })
    }

    /// Run one frame. Returns the mismatches found this frame across all
    /// regions.
    pub fn step(&mut self) -> u32 {
        let cycles = self.registers.cycles();
        let state = DashboardState::capture(cycles, &self.regions, self.self_test, self.system);

        dashboard::render(&mut self.surfaces.active(), &state);
        self.surfaces.commit_frame(&mut self.registers);

        self.frame = self.frame.wrapping_add(1);
        logger::set_frame(self.frame);
        log::trace!("frame {} at cycle {}", self.frame, cycles);

        let mut found = 0u32;
        for region in self.regions.iter_mut() {
            if region.is_complete() {
                continue;
            }
            let errors = region.advance(&mut self.memory, self.chunk_words);
            if errors > 0 {
                log::warn!(
                    "{}: {} mismatches near word {} ({} total)",
                    region.title(),
                    errors,
                    region.offset(),
                    region.errors()
                );
            }
            if region.is_complete() {
                log::info!(
                    "{}: complete, {} KiB tested, {} errors",
                    region.title(),
                    region.tested_kib(),
                    region.errors()
                );
            }
            found = found.saturating_add(errors);
        }
        found
    }

    /// Run forever. Testing stops once every region is done but the
    /// dashboard keeps refreshing.
    pub fn run(mut self) -> ! {
        loop {
            self.step();
        }
    }

    pub fn all_complete(&self) -> bool {
        self.regions.iter().all(MemoryRegion::is_complete)
    }

    pub fn regions(&self) -> &[MemoryRegion] {
        &self.regions
    }

    pub fn self_test(&self) -> &SelfTestResult {
        &self.self_test
    }

    /// Frames presented so far.
    pub fn frames(&self) -> u32 {
        self.frame
    }

    pub fn surfaces(&self) -> &FrameSurfaces<'fb> {
        &self.surfaces
    }

    pub fn registers(&self) -> &R {
        &self.registers
    }

    pub fn registers_mut(&mut self) -> &mut R {
        &mut self.registers
    }

    pub fn memory(&self) -> &M {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut M {
        &mut self.memory
    }
}
