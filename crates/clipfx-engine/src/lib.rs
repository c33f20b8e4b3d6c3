//! Clipfx engine crate.
//!
//! Rounded-corner clipping for compositing window surfaces: an analytic
//! coverage kernel evaluated per fragment, a process-wide program template,
//! and a per-actor effect that keeps its own copy of the program parameters.

pub mod coords;
pub mod device;
pub mod effect;
pub mod error;
pub mod kernel;
pub mod logging;
pub mod prefs;
pub mod program;
pub mod render;

pub use coords::{Padding, PixelStep, Rect, Vec2, Viewport};
pub use effect::{Actor, ClipEffect, EffectState, OffscreenTarget};
pub use error::ClipError;
pub use prefs::{CornerPrefs, CornerRadiusSource};
