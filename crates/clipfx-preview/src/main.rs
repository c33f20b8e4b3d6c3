//! Headless preview of the clip effect.
//!
//! Renders a synthetic window surface, composites it twice (clipped and
//! bypassed) into a canvas, checks a handful of pixels against the CPU
//! kernel and writes the canvas to a PNG.
//!
//! Usage: `clipfx-preview [output.png]`. Radii come from
//! `CLIPFX_TOP_CORNER_RADIUS` / `CLIPFX_BOTTOM_CORNER_RADIUS`.

mod readback;

use std::cell::Cell;
use std::rc::Rc;

use anyhow::{Context, Result};
use clipfx_engine::device::{Gpu, GpuInit};
use clipfx_engine::kernel;
use clipfx_engine::logging::{init_logging, LoggingConfig};
use clipfx_engine::program::release_shared_template;
use clipfx_engine::render::{RenderCtx, RenderTarget};
use clipfx_engine::{Actor, ClipEffect, CornerPrefs, OffscreenTarget, Padding, Rect, Vec2, Viewport};

const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;
const WINDOW_SIZE: Vec2 = Vec2::new(320.0, 200.0);
/// Invisible border around the window content (shadow area).
const SHADOW: Padding = Padding::all(12.0);
const MARGIN: f32 = 24.0;

/// Stand-in for a compositor window actor.
struct PreviewWindow {
    size: Cell<Vec2>,
}

impl Actor for PreviewWindow {
    fn size(&self) -> Vec2 {
        self.size.get()
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let output = std::env::args().nth(1).unwrap_or_else(|| "clipfx-preview.png".to_string());

    let gpu = match Gpu::new_blocking(GpuInit::default()) {
        Ok(gpu) => gpu,
        Err(err) => {
            log::warn!("no hardware adapter ({err:#}); trying the fallback adapter");
            Gpu::new_blocking(GpuInit { force_fallback_adapter: true, ..GpuInit::default() })?
        }
    };
    let adapter = gpu.adapter_info();
    log::debug!("adapter {:?} on {:?}", adapter.device_type, adapter.backend);
    let (device, queue) = (gpu.device(), gpu.queue());

    let prefs = Rc::new(CornerPrefs::from_env());
    let window = Rc::new(PreviewWindow { size: Cell::new(WINDOW_SIZE) });
    let window_rect = Rect::from_origin_size(Vec2::zero(), WINDOW_SIZE);

    // Window contents.
    let offscreen = OffscreenTarget::new(device, window.size(), FORMAT);
    let (w, h) = offscreen.extent();
    let source = window_pixels(w, h, SHADOW);
    queue.write_texture(
        offscreen.texture().as_image_copy(),
        &source,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(w * 4),
            rows_per_image: Some(h),
        },
        offscreen.texture().size(),
    );

    // Two instances of the same program: one clipped, one bypassed.
    let mut clipped = ClipEffect::new(prefs.clone())?;
    let mut bypassed = ClipEffect::new(prefs)?;
    for fx in [&mut clipped, &mut bypassed] {
        fx.attach(&window);
        fx.set_bounds(window_rect, SHADOW)?;
    }
    bypassed.skip()?;
    log::info!("clip bounds {:?}", clipped.bounds());

    // Canvas.
    let canvas_w = (WINDOW_SIZE.x * 2.0 + MARGIN * 3.0) as u32;
    let canvas_h = (WINDOW_SIZE.y + MARGIN * 2.0) as u32;
    let canvas = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("clipfx-preview canvas"),
        size: wgpu::Extent3d { width: canvas_w, height: canvas_h, depth_or_array_layers: 1 },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    });
    let canvas_view = canvas.create_view(&wgpu::TextureViewDescriptor::default());

    let left = Rect::new(MARGIN, MARGIN, WINDOW_SIZE.x, WINDOW_SIZE.y);
    let right = Rect::new(MARGIN * 2.0 + WINDOW_SIZE.x, MARGIN, WINDOW_SIZE.x, WINDOW_SIZE.y);

    let mut encoder = gpu.create_encoder();
    clear(&mut encoder, &canvas_view);
    {
        let ctx = RenderCtx::new(device, queue, FORMAT, Viewport::new(canvas_w as f32, canvas_h as f32));
        let mut target = RenderTarget::new(&mut encoder, &canvas_view);
        for (fx, dest) in [(&mut clipped, left), (&mut bypassed, right)] {
            if !offscreen.paint(fx, &ctx, &mut target, dest)? {
                log::warn!("panel at {:?} was not painted", dest.origin);
            }
        }
    }
    gpu.submit(encoder);

    let result = readback::read_texture(device, queue, &canvas)?;
    let params = clipped.params().context("clipped effect lost its parameters")?.uniforms();
    let mismatches = probe(&result, &source, w, left, &params);
    if mismatches == 0 {
        log::info!("GPU output matches the CPU kernel at all probes");
    } else {
        log::warn!("{mismatches} probe(s) differ from the CPU kernel");
    }

    image::RgbaImage::from_raw(result.width, result.height, result.pixels)
        .context("readback size does not match canvas")?
        .save(&output)
        .with_context(|| format!("failed to write {output}"))?;
    log::info!("wrote {output}");

    clipped.dispose();
    bypassed.dispose();
    release_shared_template();
    Ok(())
}

/// Opaque gradient with stripes, surrounded by a faint premultiplied shadow.
fn window_pixels(w: u32, h: u32, shadow: Padding) -> Vec<u8> {
    let content = Rect::new(0.0, 0.0, w as f32, h as f32).inset(shadow);
    let mut pixels = Vec::with_capacity((w * h * 4) as usize);
    for y in 0..h {
        for x in 0..w {
            let centre = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            let px = if content.contains(centre) {
                let u = x as f32 / w as f32;
                let v = y as f32 / h as f32;
                let stripe = if (x / 16 + y / 16) % 2 == 0 { 1.0 } else { 0.85 };
                [
                    (255.0 * u * stripe) as u8,
                    (255.0 * v * stripe) as u8,
                    (255.0 * (1.0 - u) * stripe) as u8,
                    255,
                ]
            } else {
                [0, 0, 0, 64]
            };
            pixels.extend_from_slice(&px);
        }
    }
    pixels
}

fn clear(encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView) {
    let _rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some("clipfx-preview clear"),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
        multiview_mask: None,
    });
}

/// Compares the clipped panel's alpha against the CPU kernel at a few points.
///
/// The panel is drawn 1:1, so each canvas pixel samples exactly one texel.
fn probe(
    canvas: &readback::Readback,
    source: &[u8],
    source_w: u32,
    panel: Rect,
    params: &kernel::ClipUniforms,
) -> usize {
    let clip = Rect::from_edges(params.bounds);
    let (min, max) = (clip.min(), clip.max());
    let mid = (min + max) * 0.5;
    let probes = [
        (min.x, min.y),
        (min.x + 2.0, min.y + 2.0),
        (mid.x, mid.y),
        (max.x - 1.0, max.y - 1.0),
        (max.x - 0.5, mid.y),
        (min.x + 1.0, max.y - 3.0),
    ];

    probes
        .iter()
        .filter(|&&(x, y)| {
            let (tx, ty) = (x.floor() as u32, y.floor() as u32);
            let uv = Vec2::new(
                (tx as f32 + 0.5) / panel.size.x,
                (ty as f32 + 0.5) / panel.size.y,
            );
            let i = ((ty * source_w + tx) * 4) as usize;
            let texel = [0, 1, 2, 3].map(|c| source[i + c] as f32 / 255.0);
            let expected = kernel::shade(uv, texel, params)[3];

            let got = canvas.pixel(panel.origin.x as u32 + tx, panel.origin.y as u32 + ty)[3] as f32 / 255.0;
            let off = (got - expected).abs() > 2.0 / 255.0;
            if off {
                log::debug!("probe ({tx}, {ty}): expected alpha {expected:.3}, got {got:.3}");
            }
            off
        })
        .count()
}
