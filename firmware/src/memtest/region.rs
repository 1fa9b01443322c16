use super::patterns::{address_uniqueness, fill_and_verify, walking_bits};
use super::TestPhase;
use crate::config::RegionConfig;
use crate::hw::TestMemory;

/// Test progress through one contiguous physical window.
///
/// Offsets and counts are in 32-bit words. `offset` only moves when a chunk
/// has passed all six phases, so the region is complete exactly when
/// `offset == total_words`; from then on [`MemoryRegion::advance`] does
/// nothing and the final error count stays on screen.
#[derive(Debug, Clone)]
pub struct MemoryRegion {
    title: &'static str,
    base: u32,
    total_words: u32,
    offset: u32,
    phase: TestPhase,
    errors: u32,
    tested_words: u32,
}

impl MemoryRegion {
    pub fn new(config: &RegionConfig) -> Self {
        Self::with_geometry(config.title, config.base, config.words())
    }

    pub fn with_geometry(title: &'static str, base: u32, total_words: u32) -> Self {
        Self {
            title,
            base,
            total_words,
            offset: 0,
            phase: TestPhase::Checkerboard,
            errors: 0,
            tested_words: 0,
        }
    }

    /// Run the current phase over the next `chunk_words` words (fewer on
    /// the last chunk) and step to the next phase.
    ///
    /// Returns the mismatches found by this call alone; they are also added
    /// to the region's running total.
    pub fn advance(&mut self, mem: &mut (impl TestMemory + ?Sized), chunk_words: u32) -> u32 {
        if self.is_complete() || chunk_words == 0 {
            return 0;
        }

        let count = chunk_words.min(self.total_words - self.offset);
        let start = self.base.wrapping_add(self.offset.wrapping_mul(4));

        let found = match self.phase {
            TestPhase::WalkingBits => walking_bits(mem, start, count),
            TestPhase::AddressUnique => address_uniqueness(mem, start, count),
            phase => fill_and_verify(mem, start, count, phase.pattern().unwrap_or(0)),
        };

        self.errors = self.errors.saturating_add(found);
        if self.phase.advances_window() {
            self.offset += count;
            self.tested_words = self.offset;
        }

        let finished = self.phase;
        self.phase = self.phase.next();
        log::debug!(
            "{}: {} at word {} -> {} ({} errors)",
            self.title,
            finished,
            self.offset,
            self.phase,
            found
        );
        found
    }

    pub fn is_complete(&self) -> bool {
        self.offset >= self.total_words
    }

    /// Whole percent of the region tested, 0 to 100. An empty region is
    /// trivially done.
    pub fn progress_percent(&self) -> u32 {
        if self.total_words == 0 {
            return 100;
        }
        let pct = u64::from(self.offset) * 100 / u64::from(self.total_words);
        pct.min(100) as u32
    }

    pub fn tested_kib(&self) -> u32 {
        (u64::from(self.tested_words) * 4 / 1024) as u32
    }

    pub fn title(&self) -> &'static str {
        self.title
    }

    pub fn base(&self) -> u32 {
        self.base
    }

    pub fn total_words(&self) -> u32 {
        self.total_words
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn phase(&self) -> TestPhase {
        self.phase
    }

    pub fn errors(&self) -> u32 {
        self.errors
    }

    pub fn tested_words(&self) -> u32 {
        self.tested_words
    }
}
