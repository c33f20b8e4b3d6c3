//! Rounded-rectangle coverage kernel.
//!
//! The GPU evaluates [`KERNEL_WGSL`] once per fragment. [`rounded_rect_coverage`]
//! and [`shade`] are the CPU references of the same math, used by tests and by
//! callers that need to predict what a pixel will look like.

mod coverage;

pub use coverage::{rounded_rect_coverage, shade, ClipUniforms, AA_HALF_WIDTH};

/// WGSL source of `rounded_rect_coverage`, prepended to the clip program.
pub const KERNEL_WGSL: &str = include_str!("shaders/coverage.wgsl");
