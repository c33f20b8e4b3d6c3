//! Offscreen texture that an actor is rendered into before the clip runs.

use super::ClipEffect;
use crate::coords::{Rect, Vec2};
use crate::error::ClipError;
use crate::render::{RenderCtx, RenderTarget};

/// Texture holding one actor's rendering, sized to the actor.
pub struct OffscreenTarget {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    extent: (u32, u32),
    format: wgpu::TextureFormat,
}

impl OffscreenTarget {
    pub fn new(device: &wgpu::Device, actor_size: Vec2, format: wgpu::TextureFormat) -> Self {
        let extent = texture_extent(actor_size);
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("clipfx offscreen"),
            size: wgpu::Extent3d {
                width: extent.0,
                height: extent.1,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_DST
                | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self { texture, view, extent, format }
    }

    #[inline]
    pub fn texture(&self) -> &wgpu::Texture {
        &self.texture
    }

    #[inline]
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    #[inline]
    pub fn extent(&self) -> (u32, u32) {
        self.extent
    }

    #[inline]
    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    /// Runs the pre-draw sequence and composites this texture into `dest`.
    ///
    /// Returns `Ok(false)` when the effect declined to paint or the draw was
    /// skipped.
    pub fn paint(
        &self,
        effect: &mut ClipEffect,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        dest: Rect,
    ) -> Result<bool, ClipError> {
        if !begin_paint(effect) {
            return Ok(false);
        }
        effect.paint(ctx, target, &self.view, dest)
    }
}

/// Pre-draw sequence for an offscreen paint.
///
/// Offscreen sampling defaults to nearest (texels map 1:1 in the common
/// case); the effect's hook then gets the last word on filtering.
pub fn begin_paint(effect: &mut ClipEffect) -> bool {
    if let Some(params) = effect.params_mut() {
        params.set_layer_filters(wgpu::FilterMode::Nearest, wgpu::FilterMode::Nearest);
    }
    effect.pre_paint()
}

/// Texture size for an actor: rounded up, at least 1×1.
fn texture_extent(size: Vec2) -> (u32, u32) {
    let dim = |v: f32| if v.is_finite() { v.ceil().max(1.0) as u32 } else { 1 };
    (dim(size.x), dim(size.y))
}
