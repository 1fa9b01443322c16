use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use firmware::config::{DashboardConfig, RegionConfig, MAX_REGIONS};
use firmware::graphics::{surface, FrameSurfaces};
use firmware::hw::sim::{Fault, SimMemory, SimRegisters};
use firmware::platform::{FB_HEIGHT, FB_PIXELS, FB_WIDTH, SDRAM_TEST_BASE};
use firmware::{Dashboard, TestPhase, POCKET_CONFIG};

use crate::faults::InjectedFault;
use crate::screenshot;

const BANK_TITLES: [&str; MAX_REGIONS] = ["SDRAM Bank 0", "SDRAM Bank 1"];

/// Hard stop for "run until complete", far beyond any sane region size.
const FRAME_LIMIT: u32 = 10_000_000;

#[derive(Debug, Clone)]
pub struct SimOptions {
    pub regions: usize,
    pub region_bytes: u32,
    pub chunk_words: u32,
    /// Frames to run; `None` runs until every region is done.
    pub frames: Option<u32>,
    pub faults: Vec<InjectedFault>,
    pub swap_latency: u32,
    pub screenshot: Option<PathBuf>,
}

impl Default for SimOptions {
    fn default() -> Self {
        SimOptions {
            regions: 1,
            region_bytes: POCKET_CONFIG.regions[0].size_bytes,
            chunk_words: POCKET_CONFIG.chunk_words,
            frames: None,
            faults: Vec::new(),
            swap_latency: 0,
            screenshot: None,
        }
    }
}

impl SimOptions {
    /// Lay regions out back to back from the reference test window.
    pub fn region_configs(&self) -> Result<Vec<RegionConfig>> {
        if self.regions == 0 || self.regions > MAX_REGIONS {
            bail!("region count must be 1..={}, got {}", MAX_REGIONS, self.regions);
        }
        if self.regions == 1 {
            return Ok(vec![RegionConfig {
                size_bytes: self.region_bytes,
                ..POCKET_CONFIG.regions[0]
            }]);
        }
        (0..self.regions)
            .map(|i| -> Result<RegionConfig> {
                let offset = self
                    .region_bytes
                    .checked_mul(i as u32)
                    .context("regions do not fit in the address space")?;
                let base = SDRAM_TEST_BASE
                    .checked_add(offset)
                    .context("regions do not fit in the address space")?;
                Ok(RegionConfig::new(BANK_TITLES[i], base, self.region_bytes))
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionReport {
    pub title: &'static str,
    pub base: u32,
    pub total_words: u32,
    pub offset: u32,
    pub phase: TestPhase,
    pub errors: u32,
    pub progress: u32,
    pub tested_kib: u32,
}

impl RegionReport {
    pub fn passed(&self) -> bool {
        self.progress == 100 && self.errors == 0
    }
}

#[derive(Debug, Clone)]
pub struct SimReport {
    pub frames: u32,
    pub swaps: u64,
    pub self_test_passed: u32,
    pub self_test_total: u32,
    pub regions: Vec<RegionReport>,
    /// Checksum of the surface on screen when the run stopped.
    pub presented_checksum: u32,
}

impl SimReport {
    pub fn all_complete(&self) -> bool {
        self.regions.iter().all(|r| r.progress == 100)
    }

    pub fn total_errors(&self) -> u64 {
        self.regions.iter().map(|r| u64::from(r.errors)).sum()
    }
}

/// Boot the firmware on the simulated board and drive it.
///
/// Without a frame count the loop runs until every region is complete, plus
/// one more frame so the presented surface shows the final result.
pub fn run(options: &SimOptions) -> Result<SimReport> {
    let regions = options.region_configs()?;
    let config = DashboardConfig {
        regions: &regions,
        chunk_words: options.chunk_words,
        system: POCKET_CONFIG.system,
    };
    config
        .validate()
        .map_err(|e| anyhow!("invalid simulator configuration: {}", e))?;

    let mut memory = SimMemory::new();
    for region in &regions {
        memory.add_window(region.base, region.size_bytes);
    }
    for fault in &options.faults {
        if !regions
            .iter()
            .any(|r| u64::from(fault.addr) >= u64::from(r.base) && u64::from(fault.addr) < r.end())
        {
            log::warn!("fault at {:#010x} is outside every region and will never fire", fault.addr);
        }
        memory.inject(fault.addr, Fault::Flip { mask: fault.mask });
    }

    let mut fb0 = vec![0u16; FB_PIXELS];
    let mut fb1 = vec![0u16; FB_PIXELS];
    let surfaces = FrameSurfaces::new(&mut fb0, &mut fb1, FB_WIDTH, FB_HEIGHT);
    let registers = SimRegisters::new().with_swap_latency(options.swap_latency);

    let mut dashboard = Dashboard::boot(registers, memory, surfaces, &config)
        .map_err(|e| anyhow!("firmware refused to boot: {}", e))?;

    match options.frames {
        Some(frames) => {
            for _ in 0..frames {
                dashboard.step();
            }
        }
        None => {
            while !dashboard.all_complete() {
                if dashboard.frames() >= FRAME_LIMIT {
                    bail!("regions still incomplete after {} frames", FRAME_LIMIT);
                }
                dashboard.step();
            }
            dashboard.step();
        }
    }

    let presented = dashboard.surfaces().presented();
    if let Some(path) = &options.screenshot {
        screenshot::save_png(path, presented, FB_WIDTH, FB_HEIGHT)?;
        log::info!("saved screenshot to {}", path.display());
    }

    let self_test = dashboard.self_test();
    Ok(SimReport {
        frames: dashboard.frames(),
        swaps: dashboard.registers().swaps(),
        self_test_passed: self_test.passed(),
        self_test_total: self_test.total(),
        regions: dashboard
            .regions()
            .iter()
            .map(|r| RegionReport {
                title: r.title(),
                base: r.base(),
                total_words: r.total_words(),
                offset: r.offset(),
                phase: r.phase(),
                errors: r.errors(),
                progress: r.progress_percent(),
                tested_kib: r.tested_kib(),
            })
            .collect(),
        presented_checksum: surface::checksum(presented),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_matches_reference_board() {
        let configs = SimOptions::default().region_configs().unwrap();
        assert_eq!(configs, POCKET_CONFIG.regions);
    }

    #[test]
    fn two_banks_are_contiguous() {
        let options = SimOptions {
            regions: 2,
            region_bytes: 64 * 1024,
            ..SimOptions::default()
        };
        let configs = options.region_configs().unwrap();
        assert_eq!(configs[0].base, SDRAM_TEST_BASE);
        assert_eq!(configs[1].base, SDRAM_TEST_BASE + 64 * 1024);
        assert_eq!(configs[1].title, "SDRAM Bank 1");
    }

    #[test]
    fn region_count_is_bounded() {
        for regions in [0, 3] {
            let options = SimOptions {
                regions,
                ..SimOptions::default()
            };
            assert!(options.region_configs().is_err());
        }
    }
}
