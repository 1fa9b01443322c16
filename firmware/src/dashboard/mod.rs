//! Status snapshot and the panel layout drawn from it.
//!
//! The renderer never looks at live test state. Each frame the control loop
//! copies what it needs into a [`DashboardState`] and hands that to
//! [`render`].

mod panels;

pub use panels::render;

use crate::config::{SystemInfo, MAX_REGIONS};
use crate::memtest::{MemoryRegion, TestPhase};
use crate::selftest::SelfTestResult;

/// What the status line says about a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionVerdict {
    Testing,
    Passed,
    Failed,
}

impl RegionVerdict {
    pub fn from_progress(progress: u32, errors: u32) -> Self {
        if progress < 100 {
            RegionVerdict::Testing
        } else if errors == 0 {
            RegionVerdict::Passed
        } else {
            RegionVerdict::Failed
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionStatus {
    pub title: &'static str,
    pub progress: u32,
    pub tested_kib: u32,
    pub errors: u32,
    pub phase: TestPhase,
    pub verdict: RegionVerdict,
}

impl From<&MemoryRegion> for RegionStatus {
    fn from(region: &MemoryRegion) -> Self {
        let progress = region.progress_percent();
        RegionStatus {
            title: region.title(),
            progress,
            tested_kib: region.tested_kib(),
            errors: region.errors(),
            phase: region.phase(),
            verdict: RegionVerdict::from_progress(progress, region.errors()),
        }
    }
}

/// Everything one frame shows.
#[derive(Debug, Clone)]
pub struct DashboardState {
    pub cycles: u64,
    pub regions: heapless::Vec<RegionStatus, MAX_REGIONS>,
    pub self_test: SelfTestResult,
    pub system: SystemInfo,
}

impl DashboardState {
    /// Snapshot the current state. Regions beyond [`MAX_REGIONS`] are not
    /// shown; configuration validation keeps that from happening.
    pub fn capture<'r>(
        cycles: u64,
        regions: impl IntoIterator<Item = &'r MemoryRegion>,
        self_test: SelfTestResult,
        system: SystemInfo,
    ) -> Self {
        let mut statuses = heapless::Vec::new();
        for region in regions {
            if statuses.push(RegionStatus::from(region)).is_err() {
                break;
            }
        }
        DashboardState {
            cycles,
            regions: statuses,
            self_test,
            system,
        }
    }
}
