//! Bare-metal entry point for the PocketRiscV board.

#![no_std]
#![no_main]

use core::panic::PanicInfo;

use firmware::graphics::FrameSurfaces;
use firmware::hw::mmio::{self, PocketRegisters, SdramBus};
use firmware::platform::{FB_HEIGHT, FB_WIDTH};
use firmware::{logger, Dashboard, POCKET_CONFIG};
use log::LevelFilter;

#[riscv_rt::entry]
fn main() -> ! {
    // Only fails if a logger is already installed, which nothing else does.
    let _ = logger::init(LevelFilter::Info);
    log::info!("PocketDash firmware starting");

    // SAFETY: this is the only place the register block, the surfaces and
    // the SDRAM test window are claimed, and POCKET_CONFIG keeps the test
    // window clear of code, stack and both surfaces.
    let (registers, memory, fb0, fb1) = unsafe {
        (
            PocketRegisters::platform(),
            SdramBus::new(),
            mmio::framebuffer(0),
            mmio::framebuffer(1),
        )
    };
    let surfaces = FrameSurfaces::new(fb0, fb1, FB_WIDTH, FB_HEIGHT);

    match Dashboard::boot(registers, memory, surfaces, &POCKET_CONFIG) {
        Ok(dashboard) => dashboard.run(),
        Err(e) => {
            log::error!("refusing to start: {}", e);
            park()
        }
    }
}

fn park() -> ! {
    loop {
        core::hint::spin_loop();
    }
}

#[panic_handler]
fn panic(info: &PanicInfo) -> ! {
    // A panic inside the logger leaves its lock held; just park then.
    if !logger::LOGGER.is_busy() {
        log::error!("PANIC: {}", info);
    }
    park()
}
