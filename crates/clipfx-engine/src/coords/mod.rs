//! Host-side geometry shared by the kernel, the parameter state and callers.
//!
//! Canonical space:
//! - caller pixels, origin top-left
//! - +X right, +Y down
//!
//! The GPU program works in the same units once a texture coordinate has been
//! divided by the [`PixelStep`].

mod padding;
mod pixel_step;
mod rect;
mod vec2;
mod viewport;

pub use padding::Padding;
pub use pixel_step::PixelStep;
pub use rect::Rect;
pub use vec2::Vec2;
pub use viewport::Viewport;
