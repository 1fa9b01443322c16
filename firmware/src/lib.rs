//! PocketDash firmware library.
//!
//! Everything the dashboard firmware does lives here so it can be exercised
//! on the host: the register interface, the incremental memory test engine,
//! the RGB565 drawing stack, the panel renderer and the control loop that
//! ties them to the display's buffer-swap cadence.
//!
//! The library is `no_std`. The `sim` feature (and `cfg(test)`) pulls in std
//! for the simulated platform in [`hw::sim`].

#![cfg_attr(not(any(test, feature = "sim")), no_std)]

pub mod config;
pub mod control;
pub mod dashboard;
pub mod graphics;
pub mod hw;
pub mod logger;
pub mod memtest;
pub mod platform;
pub mod selftest;

pub use config::{ConfigError, DashboardConfig, RegionConfig, POCKET_CONFIG};
pub use control::Dashboard;
pub use memtest::{MemoryRegion, TestPhase};
