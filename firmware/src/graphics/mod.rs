//! Drawing stack for the dashboard.
//!
//! Everything draws through [`Canvas`]; the only implementation in the
//! firmware is [`Surface`], a borrowed RGB565 framebuffer. [`FrameSurfaces`]
//! owns the two hardware surfaces and hands out whichever is writable.

pub mod color;
pub mod primitives;
pub mod surface;
pub mod swap;
pub mod text;

pub use color::Color;
pub use primitives::{Canvas, Rect};
pub use surface::Surface;
pub use swap::{FrameSurfaces, SurfaceId};
