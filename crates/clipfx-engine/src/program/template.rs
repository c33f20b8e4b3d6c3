use std::sync::{Arc, OnceLock};

use super::gpu::GpuProgram;
use super::params::ParameterState;
use super::uniforms::{ClipLocations, UniformTable};
use crate::error::ClipError;

/// Full WGSL of the clip program: coverage kernel followed by the program body.
pub const PROGRAM_WGSL: &str = concat!(
    include_str!("../kernel/shaders/coverage.wgsl"),
    "\n",
    include_str!("shaders/rounded_clip.wgsl"),
);

/// Reusable clip program shared by every effect instance.
///
/// Holds the program source, the parameter declarations and their default
/// values. Instances never mutate it; they work on a [`ParameterState`]
/// obtained from [`ProgramTemplate::instantiate`].
///
/// Device objects are created on the first draw and kept for the template's
/// lifetime. The first device to draw wins; the engine assumes one device per
/// process.
pub struct ProgramTemplate {
    source: &'static str,
    uniforms: UniformTable,
    locations: ClipLocations,
    defaults: Vec<u32>,
    gpu: OnceLock<GpuProgram>,
}

impl ProgramTemplate {
    pub fn new() -> Result<Self, ClipError> {
        let uniforms = UniformTable::clip();
        let locations = ClipLocations::resolve(&uniforms)?;
        // Zeroed block: no bounds, square corners, bypass off.
        let defaults = vec![0u32; uniforms.size() / 4];

        Ok(Self {
            source: PROGRAM_WGSL,
            uniforms,
            locations,
            defaults,
            gpu: OnceLock::new(),
        })
    }

    #[inline]
    pub fn source(&self) -> &'static str {
        self.source
    }

    #[inline]
    pub fn uniforms(&self) -> &UniformTable {
        &self.uniforms
    }

    /// Parameter locations, resolved once when the template was built.
    #[inline]
    pub fn locations(&self) -> ClipLocations {
        self.locations
    }

    /// Whether device objects have been created yet.
    #[inline]
    pub fn is_realised(&self) -> bool {
        self.gpu.get().is_some()
    }

    /// Creates a private parameter copy sharing this program.
    pub fn instantiate(self: &Arc<Self>) -> ParameterState {
        ParameterState::new(Arc::clone(self))
    }

    #[inline]
    pub(super) fn defaults(&self) -> &[u32] {
        &self.defaults
    }

    pub(super) fn gpu(&self, device: &wgpu::Device) -> &GpuProgram {
        self.gpu.get_or_init(|| GpuProgram::new(device, self.source))
    }
}
