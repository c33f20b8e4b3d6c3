//! Clip program: shared template plus per-instance parameter state.
//!
//! One [`ProgramTemplate`] exists per process (see [`shared_template`]). It
//! owns the WGSL, the parameter table and, after the first draw, the device
//! objects. Each effect instance owns a [`ParameterState`] copied from it,
//! so parameter writes never collide while pipelines are shared.

mod gpu;
mod params;
mod shared;
mod template;
mod uniforms;

pub use params::{LayerFilters, ParameterState};
pub use shared::{release_shared_template, shared_template};
pub use template::{ProgramTemplate, PROGRAM_WGSL};
pub use uniforms::{ClipLocations, UniformKind, UniformLocation, UniformTable};
