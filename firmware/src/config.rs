//! Boot-time configuration: which memory to test and how fast.
//!
//! The firmware image carries [`POCKET_CONFIG`]; the host simulator builds
//! its own from command-line arguments. Either way the configuration is
//! checked once with [`DashboardConfig::validate`] before anything touches
//! memory.

use core::fmt;

use crate::platform::{
    CPU_NAME, FRAMEBUFFER_BASE, FRAMEBUFFER_WINDOW, RAM_DESC, SDRAM_DESC, SDRAM_TEST_BASE,
    SDRAM_TEST_SIZE, WORDS_PER_FRAME,
};

/// Regions the dashboard can lay out at once.
pub const MAX_REGIONS: usize = 2;

/// One physical window to test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionConfig {
    pub title: &'static str,
    pub base: u32,
    pub size_bytes: u32,
}

impl RegionConfig {
    pub const fn new(title: &'static str, base: u32, size_bytes: u32) -> Self {
        Self {
            title,
            base,
            size_bytes,
        }
    }

    pub const fn words(&self) -> u32 {
        self.size_bytes / 4
    }

    /// One past the last byte, widened so a window ending at 4 GiB is
    /// representable.
    pub const fn end(&self) -> u64 {
        self.base as u64 + self.size_bytes as u64
    }

    fn overlaps(&self, start: u64, end: u64) -> bool {
        (self.base as u64) < end && start < self.end()
    }
}

/// Static text for the system info panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemInfo {
    pub cpu: &'static str,
    pub ram: &'static str,
    pub sdram: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct DashboardConfig<'a> {
    pub regions: &'a [RegionConfig],
    /// Words each region advances per frame.
    pub chunk_words: u32,
    pub system: SystemInfo,
}

const POCKET_REGIONS: [RegionConfig; 1] = [RegionConfig::new(
    "SDRAM Stress Test",
    SDRAM_TEST_BASE,
    SDRAM_TEST_SIZE,
)];

/// The reference board: one 1 MiB SDRAM window, 4 KiB per frame.
pub const POCKET_CONFIG: DashboardConfig<'static> = DashboardConfig {
    regions: &POCKET_REGIONS,
    chunk_words: WORDS_PER_FRAME,
    system: SystemInfo {
        cpu: CPU_NAME,
        ram: RAM_DESC,
        sdram: SDRAM_DESC,
    },
};

/// Why a configuration was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    NoRegions,
    TooManyRegions { count: usize },
    ZeroChunk,
    EmptyRegion { index: usize },
    MisalignedRegion { index: usize },
    RegionOutOfAddressSpace { index: usize },
    RegionOverlapsFramebuffer { index: usize, surface: usize },
    RegionsOverlap { first: usize, second: usize },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NoRegions => write!(f, "no memory regions configured"),
            ConfigError::TooManyRegions { count } => {
                write!(f, "{} regions configured, at most {} supported", count, MAX_REGIONS)
            }
            ConfigError::ZeroChunk => write!(f, "chunk size must be at least one word"),
            ConfigError::EmptyRegion { index } => write!(f, "region {} is empty", index),
            ConfigError::MisalignedRegion { index } => {
                write!(f, "region {} is not word aligned", index)
            }
            ConfigError::RegionOutOfAddressSpace { index } => {
                write!(f, "region {} extends past the 32-bit address space", index)
            }
            ConfigError::RegionOverlapsFramebuffer { index, surface } => {
                write!(f, "region {} overlaps framebuffer {}", index, surface)
            }
            ConfigError::RegionsOverlap { first, second } => {
                write!(f, "regions {} and {} overlap", first, second)
            }
        }
    }
}

impl DashboardConfig<'_> {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.regions.is_empty() {
            return Err(ConfigError::NoRegions);
        }
        if self.regions.len() > MAX_REGIONS {
            return Err(ConfigError::TooManyRegions {
                count: self.regions.len(),
            });
        }
        if self.chunk_words == 0 {
            return Err(ConfigError::ZeroChunk);
        }

        for (index, region) in self.regions.iter().enumerate() {
            if region.size_bytes == 0 {
                return Err(ConfigError::EmptyRegion { index });
            }
            if region.base % 4 != 0 || region.size_bytes % 4 != 0 {
                return Err(ConfigError::MisalignedRegion { index });
            }
            if region.end() > 1 << 32 {
                return Err(ConfigError::RegionOutOfAddressSpace { index });
            }
            for (surface, &fb) in FRAMEBUFFER_BASE.iter().enumerate() {
                let fb = fb as u64;
                if region.overlaps(fb, fb + FRAMEBUFFER_WINDOW as u64) {
                    return Err(ConfigError::RegionOverlapsFramebuffer { index, surface });
                }
            }
            for (first, earlier) in self.regions[..index].iter().enumerate() {
                if region.overlaps(earlier.base as u64, earlier.end()) {
                    return Err(ConfigError::RegionsOverlap {
                        first,
                        second: index,
                    });
                }
            }
        }
        Ok(())
    }

    pub fn total_words(&self) -> u64 {
        self.regions.iter().map(|r| u64::from(r.words())).sum()
    }
}
