//! Host-side harness for the PocketDash firmware.
//!
//! Runs the firmware's real control loop against simulated registers and
//! memory, with injectable faults, and can dump the presented frame to PNG.
//! The `pocketdash-sim` binary is a thin CLI over [`run`].

pub mod faults;
pub mod screenshot;
pub mod sim;

pub use faults::InjectedFault;
pub use sim::{run, RegionReport, SimOptions, SimReport};
