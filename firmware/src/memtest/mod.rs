//! Incremental memory integrity test.
//!
//! Each region is tested a chunk at a time so a whole pass never costs more
//! than one frame. A chunk goes through six phases, one per call to
//! [`MemoryRegion::advance`]:
//!
//! | Phase | Test                | Pattern                 |
//! |-------|---------------------|-------------------------|
//! | 0     | fixed pattern       | `0xAAAA_AAAA`           |
//! | 1     | fixed pattern       | `0x5555_5555`           |
//! | 2     | fixed pattern       | `0xFFFF_FFFF`           |
//! | 3     | fixed pattern       | `0x0000_0000`           |
//! | 4     | walking ones/zeros  | first 32 words only     |
//! | 5     | address uniqueness  | each word's own address |
//!
//! Only phase 5 moves the region on to the next chunk.

mod patterns;
mod region;

pub use patterns::{address_uniqueness, fill_and_verify, walking_bits, WALKING_BITS_MAX};
pub use region::MemoryRegion;

/// Where a region is in its six-phase cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestPhase {
    Checkerboard,
    InverseCheckerboard,
    AllOnes,
    AllZeros,
    WalkingBits,
    AddressUnique,
}

impl TestPhase {
    pub const ALL: [TestPhase; 6] = [
        TestPhase::Checkerboard,
        TestPhase::InverseCheckerboard,
        TestPhase::AllOnes,
        TestPhase::AllZeros,
        TestPhase::WalkingBits,
        TestPhase::AddressUnique,
    ];

    pub const fn index(self) -> usize {
        match self {
            TestPhase::Checkerboard => 0,
            TestPhase::InverseCheckerboard => 1,
            TestPhase::AllOnes => 2,
            TestPhase::AllZeros => 3,
            TestPhase::WalkingBits => 4,
            TestPhase::AddressUnique => 5,
        }
    }

    pub const fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }

    /// The successor phase, wrapping from 5 back to 0.
    pub const fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    /// The fill pattern for phases 0-3.
    pub const fn pattern(self) -> Option<u32> {
        match self {
            TestPhase::Checkerboard => Some(0xAAAA_AAAA),
            TestPhase::InverseCheckerboard => Some(0x5555_5555),
            TestPhase::AllOnes => Some(0xFFFF_FFFF),
            TestPhase::AllZeros => Some(0x0000_0000),
            TestPhase::WalkingBits | TestPhase::AddressUnique => None,
        }
    }

    /// Whether completing this phase moves the region to its next chunk.
    pub const fn advances_window(self) -> bool {
        matches!(self, TestPhase::AddressUnique)
    }

    /// Short label for the status panel.
    pub const fn name(self) -> &'static str {
        match self {
            TestPhase::Checkerboard => "0xAAAAAAAA",
            TestPhase::InverseCheckerboard => "0x55555555",
            TestPhase::AllOnes => "0xFFFFFFFF",
            TestPhase::AllZeros => "0x00000000",
            TestPhase::WalkingBits => "Walking bits",
            TestPhase::AddressUnique => "Address",
        }
    }
}

impl core::fmt::Display for TestPhase {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}
