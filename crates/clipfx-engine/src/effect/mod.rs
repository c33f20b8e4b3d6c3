//! The rounded-corner clip effect and its host-facing pieces.

mod actor;
mod clip;
pub mod offscreen;

pub use actor::Actor;
pub use clip::{ClipEffect, EffectState};
pub use offscreen::OffscreenTarget;
