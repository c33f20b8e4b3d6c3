use std::sync::Arc;

use wgpu::util::DeviceExt;

use super::gpu::{QuadUniform, QUAD_INDEX_COUNT};
use super::template::ProgramTemplate;
use super::uniforms::{UniformKind, UniformLocation};
use crate::coords::Rect;
use crate::error::ClipError;
use crate::kernel::ClipUniforms;
use crate::render::{RenderCtx, RenderTarget};

/// Minification/magnification filters used when sampling the source texture.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct LayerFilters {
    pub min: wgpu::FilterMode,
    pub mag: wgpu::FilterMode,
}

impl LayerFilters {
    pub const LINEAR: Self = Self { min: wgpu::FilterMode::Linear, mag: wgpu::FilterMode::Linear };
    pub const NEAREST: Self = Self { min: wgpu::FilterMode::Nearest, mag: wgpu::FilterMode::Nearest };
}

impl Default for LayerFilters {
    fn default() -> Self {
        Self::LINEAR
    }
}

/// One instance's copy of the clip program's parameters.
///
/// Shares the program with its [`ProgramTemplate`]; owns only the parameter
/// block, the sampling filters and the buffer holding the last uploaded
/// block. The source texture is not retained: it is bound per draw.
pub struct ParameterState {
    template: Arc<ProgramTemplate>,

    /// Parameter block as 32-bit words; every slot is 4-byte aligned.
    block: Vec<u32>,
    filters: LayerFilters,
    dirty: bool,

    /// Last uploaded block; bound by every draw until the block changes.
    clip_ubo: Option<wgpu::Buffer>,
}

impl ParameterState {
    pub(super) fn new(template: Arc<ProgramTemplate>) -> Self {
        let block = template.defaults().to_vec();
        Self {
            template,
            block,
            filters: LayerFilters::default(),
            dirty: true,
            clip_ubo: None,
        }
    }

    #[inline]
    pub fn template(&self) -> &Arc<ProgramTemplate> {
        &self.template
    }

    /// Whether the block changed since the last upload.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    // ── parameters ────────────────────────────────────────────────────────

    /// Writes a float, vec2 or vec4 parameter.
    ///
    /// `values.len()` must match the component count of the slot.
    pub fn set_uniform_float(&mut self, loc: UniformLocation, values: &[f32]) -> Result<(), ClipError> {
        if loc.kind == UniformKind::Int || values.len() != loc.kind.components() {
            return Err(mismatch(loc, values.len()));
        }
        let words = self.slot_mut(loc)?;
        for (w, v) in words.iter_mut().zip(values) {
            *w = v.to_bits();
        }
        log::trace!("uniform @{} <- {values:?}", loc.offset);
        self.dirty = true;
        Ok(())
    }

    #[inline]
    pub fn set_uniform_1f(&mut self, loc: UniformLocation, value: f32) -> Result<(), ClipError> {
        self.set_uniform_float(loc, &[value])
    }

    pub fn set_uniform_1i(&mut self, loc: UniformLocation, value: i32) -> Result<(), ClipError> {
        if loc.kind != UniformKind::Int {
            return Err(mismatch(loc, 1));
        }
        self.slot_mut(loc)?[0] = value as u32;
        log::trace!("uniform @{} <- {value}", loc.offset);
        self.dirty = true;
        Ok(())
    }

    /// Reads back a scalar float slot.
    pub fn uniform_f32(&self, loc: UniformLocation) -> Option<f32> {
        if loc.kind != UniformKind::Float {
            return None;
        }
        self.slot(loc).first().map(|&w| f32::from_bits(w))
    }

    /// Reads back a float/vector slot. Empty for int slots or foreign locations.
    pub fn uniform_floats(&self, loc: UniformLocation) -> Vec<f32> {
        if loc.kind == UniformKind::Int {
            return Vec::new();
        }
        self.slot(loc).iter().map(|&w| f32::from_bits(w)).collect()
    }

    /// Reads back an int slot. `None` for float slots or foreign locations.
    pub fn uniform_i32(&self, loc: UniformLocation) -> Option<i32> {
        if loc.kind != UniformKind::Int {
            return None;
        }
        self.slot(loc).first().map(|&w| w as i32)
    }

    /// Snapshot of the whole block as the kernel sees it.
    pub fn uniforms(&self) -> ClipUniforms {
        bytemuck::try_pod_read_unaligned(bytemuck::cast_slice(&self.block)).unwrap_or_default()
    }

    // ── sampling ──────────────────────────────────────────────────────────

    #[inline]
    pub fn set_layer_filters(&mut self, min: wgpu::FilterMode, mag: wgpu::FilterMode) {
        self.filters = LayerFilters { min, mag };
    }

    #[inline]
    pub fn layer_filters(&self) -> LayerFilters {
        self.filters
    }

    // ── drawing ───────────────────────────────────────────────────────────

    /// Draws `source` into `dest` (target pixels) through the clip program.
    ///
    /// Realises the template's device objects on first use. Buffers bound by
    /// a recorded draw are never written again, so several draws (and
    /// parameter changes between them) may share one submission. The clip
    /// block gets a new buffer only when it changed.
    ///
    /// Returns whether a draw was recorded.
    pub fn draw(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        source: &wgpu::TextureView,
        dest: Rect,
    ) -> bool {
        if !ctx.viewport.is_valid() {
            log::warn!("clip draw skipped: invalid viewport {:?}", ctx.viewport);
            return false;
        }

        let template = Arc::clone(&self.template);
        let gpu = template.gpu(ctx.device);
        let pipeline = gpu.pipeline(ctx.device, ctx.target_format);

        let clip_ubo = self.clip_buffer(ctx.device);

        let quad = QuadUniform {
            viewport: [ctx.viewport.width, ctx.viewport.height],
            _pad: [0.0; 2],
            origin: dest.origin.to_array(),
            size: dest.size.to_array(),
        };
        let quad_ubo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("clipfx quad ubo"),
            contents: bytemuck::bytes_of(&quad),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("clipfx rounded_clip bind group"),
            layout: gpu.bind_group_layout(),
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: quad_ubo.as_entire_binding() },
                wgpu::BindGroupEntry { binding: 1, resource: clip_ubo.as_entire_binding() },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(source),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::Sampler(
                        gpu.sampler(self.filters.min, self.filters.mag),
                    ),
                },
            ],
        });

        let (quad_vbo, quad_ibo) = gpu.quad_buffers();

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("clipfx rounded_clip pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(&pipeline);
        rpass.set_bind_group(0, &bind_group, &[]);
        rpass.set_vertex_buffer(0, quad_vbo.slice(..));
        rpass.set_index_buffer(quad_ibo.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..QUAD_INDEX_COUNT, 0, 0..1);
        true
    }

    // ── private helpers ────────────────────────────────────────────────────

    fn slot(&self, loc: UniformLocation) -> &[u32] {
        let start = loc.offset / 4;
        self.block.get(start..start + loc.kind.components()).unwrap_or(&[])
    }

    fn slot_mut(&mut self, loc: UniformLocation) -> Result<&mut [u32], ClipError> {
        let start = loc.offset / 4;
        let len = loc.kind.components();
        self.block
            .get_mut(start..start + len)
            .ok_or_else(|| mismatch(loc, len))
    }

    /// Buffer holding the current block, replaced after every change.
    fn clip_buffer(&mut self, device: &wgpu::Device) -> wgpu::Buffer {
        if !self.dirty {
            if let Some(buffer) = &self.clip_ubo {
                return buffer.clone();
            }
        }

        log::trace!("clip block uploaded ({} bytes)", self.block.len() * 4);
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("clipfx clip ubo"),
            contents: bytemuck::cast_slice(&self.block),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        self.clip_ubo = Some(buffer.clone());
        self.dirty = false;
        buffer
    }
}

fn mismatch(loc: UniformLocation, components: usize) -> ClipError {
    ClipError::UniformMismatch {
        offset: loc.offset,
        expected: loc.kind,
        components,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> ParameterState {
        Arc::new(ProgramTemplate::new().unwrap()).instantiate()
    }

    #[test]
    fn copy_starts_from_template_defaults() {
        let p = state();
        assert_eq!(p.uniforms(), ClipUniforms::default());
        assert_eq!(p.layer_filters(), LayerFilters::LINEAR);
        assert!(p.is_dirty());
    }

    #[test]
    fn writes_land_in_the_named_slots() {
        let mut p = state();
        let loc = p.template().locations();

        p.set_uniform_float(loc.bounds, &[1.0, 2.0, 3.0, 4.0]).unwrap();
        p.set_uniform_1f(loc.top_radius, 12.0).unwrap();
        p.set_uniform_1f(loc.bottom_radius, 6.0).unwrap();
        p.set_uniform_float(loc.pixel_step, &[0.5, 0.25]).unwrap();
        p.set_uniform_1i(loc.skip, 1).unwrap();

        let u = p.uniforms();
        assert_eq!(u.bounds, [1.0, 2.0, 3.0, 4.0]);
        assert_eq!(u.top_radius, 12.0);
        assert_eq!(u.bottom_radius, 6.0);
        assert_eq!(u.pixel_step, [0.5, 0.25]);
        assert_eq!(u.skip, 1);

        assert_eq!(p.uniform_floats(loc.pixel_step), vec![0.5, 0.25]);
        assert_eq!(p.uniform_f32(loc.top_radius), Some(12.0));
        assert_eq!(p.uniform_f32(loc.pixel_step), None);
        assert_eq!(p.uniform_i32(loc.skip), Some(1));
        assert_eq!(p.uniform_i32(loc.bounds), None);
    }

    #[test]
    fn wrong_kind_or_arity_is_rejected() {
        let mut p = state();
        let loc = p.template().locations();

        assert!(matches!(
            p.set_uniform_float(loc.bounds, &[1.0, 2.0]),
            Err(ClipError::UniformMismatch { components: 2, .. })
        ));
        assert!(p.set_uniform_1f(loc.skip, 1.0).is_err());
        assert!(p.set_uniform_1i(loc.top_radius, 1).is_err());
        assert_eq!(p.uniforms(), ClipUniforms::default());
    }

    #[test]
    fn out_of_range_location_is_rejected() {
        let mut p = state();
        let bogus = UniformLocation { offset: 4096, kind: UniformKind::Float };
        assert!(p.set_uniform_1f(bogus, 1.0).is_err());
        assert!(p.uniform_floats(bogus).is_empty());
    }

    #[test]
    fn instances_do_not_share_parameters() {
        let template = Arc::new(ProgramTemplate::new().unwrap());
        let loc = template.locations();
        let mut a = template.instantiate();
        let b = template.instantiate();

        a.set_uniform_1f(loc.top_radius, 9.0).unwrap();
        a.set_layer_filters(wgpu::FilterMode::Nearest, wgpu::FilterMode::Nearest);

        assert_eq!(b.uniforms().top_radius, 0.0);
        assert_eq!(b.layer_filters(), LayerFilters::LINEAR);
        assert_eq!(Arc::strong_count(&template), 3);
    }
}
