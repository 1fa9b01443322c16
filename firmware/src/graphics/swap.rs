//! Hardware double buffering.
//!
//! Two fixed surfaces alternate: the display controller scans one out while
//! the CPU draws into the other. Unlike a shadow-buffer scheme nothing is
//! copied; presenting a frame is a register handshake and the roles swap.

use core::sync::atomic::{compiler_fence, Ordering};

use super::surface::Surface;
use crate::hw::Registers;

/// Which of the two hardware surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceId {
    Zero,
    One,
}

impl SurfaceId {
    pub const fn other(self) -> Self {
        match self {
            SurfaceId::Zero => SurfaceId::One,
            SurfaceId::One => SurfaceId::Zero,
        }
    }

    pub const fn index(self) -> usize {
        match self {
            SurfaceId::Zero => 0,
            SurfaceId::One => 1,
        }
    }
}

/// The surface pair and which one is writable.
pub struct FrameSurfaces<'a> {
    buffers: [&'a mut [u16]; 2],
    width: usize,
    height: usize,
    active: SurfaceId,
    swaps: u64,
}

impl<'a> FrameSurfaces<'a> {
    /// At reset the controller scans out surface 0, so drawing starts on 1.
    pub fn new(fb0: &'a mut [u16], fb1: &'a mut [u16], width: usize, height: usize) -> Self {
        Self {
            buffers: [fb0, fb1],
            width,
            height,
            active: SurfaceId::One,
            swaps: 0,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn active_id(&self) -> SurfaceId {
        self.active
    }

    /// Completed swaps.
    pub fn swaps(&self) -> u64 {
        self.swaps
    }

    /// The surface to draw the next frame into.
    pub fn active(&mut self) -> Surface<'_> {
        Surface::new(&mut *self.buffers[self.active.index()], self.width, self.height)
    }

    /// The surface currently being scanned out, i.e. the last committed frame.
    pub fn presented(&self) -> &[u16] {
        &*self.buffers[self.active.other().index()]
    }

    /// Present the active surface.
    ///
    /// Orders every pixel write before the trigger, requests the swap, then
    /// blocks until the controller acknowledges at vertical blank. Only then
    /// does the other surface become writable; drawing into it earlier would
    /// tear the frame on screen.
    pub fn commit_frame(&mut self, regs: &mut impl Registers) {
        compiler_fence(Ordering::SeqCst);
        regs.request_swap();
        regs.wait_swap_complete();
        self.active = self.active.other();
        self.swaps += 1;
        log::trace!("swap {} complete, drawing to {:?}", self.swaps, self.active);
    }
}
