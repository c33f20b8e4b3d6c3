//! GPU side of the clip program, realised once per process on first draw.

use std::collections::HashMap;
use std::num::NonZeroU64;
use std::sync::{Arc, Mutex, PoisonError};

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::kernel::ClipUniforms;

// ── blend ─────────────────────────────────────────────────────────────────

fn premul_alpha_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
    }
}

// ── quad ──────────────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct QuadVertex {
    pos: [f32; 2], // 0..1, doubles as the texture coordinate
}

impl QuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex { pos: [0.0, 0.0] },
    QuadVertex { pos: [1.0, 0.0] },
    QuadVertex { pos: [1.0, 1.0] },
    QuadVertex { pos: [0.0, 1.0] },
];

const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

pub(super) const QUAD_INDEX_COUNT: u32 = QUAD_INDICES.len() as u32;

/// Destination of one draw: target size plus the rect the texture lands on.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct QuadUniform {
    pub viewport: [f32; 2],
    pub _pad: [f32; 2], // 16-byte alignment
    pub origin: [f32; 2],
    pub size: [f32; 2],
}

fn min_binding_size<T>() -> Option<NonZeroU64> {
    NonZeroU64::new(std::mem::size_of::<T>() as u64)
}

// ── program ───────────────────────────────────────────────────────────────

/// Device objects shared by every parameter state.
///
/// Bind group layout:
///  0  QuadUniform   (vertex)
///  1  ClipUniforms  (fragment)
///  2  source texture
///  3  source sampler
pub(crate) struct GpuProgram {
    shader: wgpu::ShaderModule,
    bind_group_layout: wgpu::BindGroupLayout,
    pipeline_layout: wgpu::PipelineLayout,

    /// Indexed by `sampler_index(min, mag)`.
    samplers: [wgpu::Sampler; 4],

    quad_vbo: wgpu::Buffer,
    quad_ibo: wgpu::Buffer,

    pipelines: Mutex<HashMap<wgpu::TextureFormat, Arc<wgpu::RenderPipeline>>>,
}

impl GpuProgram {
    pub(super) fn new(device: &wgpu::Device, source: &str) -> Self {
        log::debug!("realising clip program on GPU");

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("clipfx rounded_clip shader"),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });

        let uniform_entry = |binding, visibility, size| wgpu::BindGroupLayoutEntry {
            binding,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: size,
            },
            count: None,
        };

        let bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("clipfx rounded_clip bgl"),
                entries: &[
                    uniform_entry(0, wgpu::ShaderStages::VERTEX, min_binding_size::<QuadUniform>()),
                    uniform_entry(1, wgpu::ShaderStages::FRAGMENT, min_binding_size::<ClipUniforms>()),
                    wgpu::BindGroupLayoutEntry {
                        binding: 2,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 3,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("clipfx rounded_clip pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let sampler = |min, mag| {
            device.create_sampler(&wgpu::SamplerDescriptor {
                label: Some("clipfx source sampler"),
                address_mode_u: wgpu::AddressMode::ClampToEdge,
                address_mode_v: wgpu::AddressMode::ClampToEdge,
                address_mode_w: wgpu::AddressMode::ClampToEdge,
                min_filter: min,
                mag_filter: mag,
                ..Default::default()
            })
        };
        use wgpu::FilterMode::{Linear, Nearest};
        let samplers = [
            sampler(Nearest, Nearest),
            sampler(Nearest, Linear),
            sampler(Linear, Nearest),
            sampler(Linear, Linear),
        ];

        let quad_vbo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("clipfx quad vbo"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let quad_ibo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("clipfx quad ibo"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            shader,
            bind_group_layout,
            pipeline_layout,
            samplers,
            quad_vbo,
            quad_ibo,
            pipelines: Mutex::new(HashMap::new()),
        }
    }

    #[inline]
    pub(super) fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    #[inline]
    pub(super) fn quad_buffers(&self) -> (&wgpu::Buffer, &wgpu::Buffer) {
        (&self.quad_vbo, &self.quad_ibo)
    }

    #[inline]
    pub(super) fn sampler(&self, min: wgpu::FilterMode, mag: wgpu::FilterMode) -> &wgpu::Sampler {
        &self.samplers[sampler_index(min, mag)]
    }

    /// Returns the pipeline for `format`, building it on first request.
    pub(super) fn pipeline(
        &self,
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
    ) -> Arc<wgpu::RenderPipeline> {
        let mut pipelines = self.pipelines.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(p) = pipelines.get(&format) {
            return Arc::clone(p);
        }

        log::debug!("building clip pipeline for {format:?}");

        let pipeline = Arc::new(device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("clipfx rounded_clip pipeline"),
            layout: Some(&self.pipeline_layout),
            vertex: wgpu::VertexState {
                module: &self.shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[QuadVertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &self.shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(premul_alpha_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        }));

        pipelines.insert(format, Arc::clone(&pipeline));
        pipeline
    }
}

#[inline]
fn sampler_index(min: wgpu::FilterMode, mag: wgpu::FilterMode) -> usize {
    let linear = |f: wgpu::FilterMode| (f == wgpu::FilterMode::Linear) as usize;
    linear(min) * 2 + linear(mag)
}
