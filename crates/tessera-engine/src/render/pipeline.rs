use std::collections::HashMap;
use std::ops::Range;

use crate::device::{BatchVertex, PrimitiveKind, TextureId};
use crate::render::RenderCtx;

use super::common::{premul_alpha_blend, topology};

/// Smallest vertex ring allocation, in vertices.
const MIN_VERTEX_CAPACITY: usize = 4096;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
struct PipelineKey {
    kind: PrimitiveKind,
    textured: bool,
}

/// GPU resources shared by every [`GpuTarget`](super::GpuTarget) of a window.
///
/// Holds one render pipeline per primitive topology (solid and textured, created
/// on first use), the vertex ring batches are uploaded into, and the registry
/// of textures that batches can reference by [`TextureId`].
///
/// Vertex uploads go through `queue.write_buffer`, which only lands at the next
/// submit; every batch of one submission therefore gets its own region of the
/// ring. Call [`begin_frame`](Self::begin_frame) once per submission.
#[derive(Default)]
pub struct BatchPipeline {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipelines: HashMap<PipelineKey, wgpu::RenderPipeline>,

    shader: Option<wgpu::ShaderModule>,
    texture_layout: Option<wgpu::BindGroupLayout>,
    textures: Vec<wgpu::BindGroup>,

    vertex_buffer: Option<wgpu::Buffer>,
    vertex_capacity: usize,
    cursor: usize,
}

impl BatchPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rewinds the vertex ring. Regions written before the previous submit may
    /// be reused afterwards.
    pub fn begin_frame(&mut self) {
        self.cursor = 0;
    }

    /// Makes `view` sampled through `sampler` available to batches as a
    /// [`TextureId`].
    pub fn register_texture(
        &mut self,
        device: &wgpu::Device,
        view: &wgpu::TextureView,
        sampler: &wgpu::Sampler,
    ) -> TextureId {
        let layout = self.ensure_texture_layout(device);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("tessera batch texture bind group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });

        let id = TextureId(self.textures.len() as u32);
        self.textures.push(bind_group);
        log::debug!("registered batch texture {id:?}");
        id
    }

    pub(super) fn texture(&self, id: TextureId) -> Option<&wgpu::BindGroup> {
        self.textures.get(id.0 as usize)
    }

    pub(super) fn pipeline(&self, kind: PrimitiveKind, textured: bool) -> Option<&wgpu::RenderPipeline> {
        self.pipelines.get(&PipelineKey { kind, textured })
    }

    pub(super) fn vertex_buffer(&self) -> Option<&wgpu::Buffer> {
        self.vertex_buffer.as_ref()
    }

    /// Copies `vertices` into a fresh region of the ring and returns its byte range.
    pub(super) fn upload(&mut self, ctx: &RenderCtx<'_>, vertices: &[BatchVertex]) -> Range<u64> {
        self.ensure_vertex_capacity(ctx, vertices.len());

        let stride = std::mem::size_of::<BatchVertex>() as u64;
        let start = self.cursor as u64 * stride;
        let end = start + vertices.len() as u64 * stride;

        if let Some(vbo) = self.vertex_buffer.as_ref() {
            ctx.queue.write_buffer(vbo, start, bytemuck::cast_slice(vertices));
        }
        self.cursor += vertices.len();
        start..end
    }

    /// Creates the pipeline for `kind` if it does not exist for the current format.
    pub(super) fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>, kind: PrimitiveKind, textured: bool) {
        if self.pipeline_format != Some(ctx.surface_format) {
            self.pipelines.clear();
            self.pipeline_format = Some(ctx.surface_format);
        }

        let key = PipelineKey { kind, textured };
        if self.pipelines.contains_key(&key) {
            return;
        }

        let pipeline = self.create_pipeline(ctx, key);
        log::debug!("created batch pipeline {kind:?} (textured: {textured}) for {:?}", ctx.surface_format);
        self.pipelines.insert(key, pipeline);
    }

    fn create_pipeline(&mut self, ctx: &RenderCtx<'_>, key: PipelineKey) -> wgpu::RenderPipeline {
        let texture_layout = self.ensure_texture_layout(ctx.device).clone();
        let shader: &wgpu::ShaderModule = self.shader.get_or_insert_with(|| {
            ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("tessera batch shader"),
                source: wgpu::ShaderSource::Wgsl(include_str!("shaders/batch.wgsl").into()),
            })
        });

        let textured_layouts = [&texture_layout];
        let bind_group_layouts: &[&wgpu::BindGroupLayout] =
            if key.textured { &textured_layouts } else { &[] };

        let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("tessera batch pipeline layout"),
            bind_group_layouts,
            immediate_size: 0,
        });

        ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("tessera batch pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[BatchVertex::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some(if key.textured { "fs_textured" } else { "fs_solid" }),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(premul_alpha_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: topology(key.kind),
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
        })
    }

    fn ensure_texture_layout(&mut self, device: &wgpu::Device) -> &wgpu::BindGroupLayout {
        self.texture_layout.get_or_insert_with(|| {
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("tessera batch texture bgl"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            })
        })
    }

    /// Guarantees room for `required` more vertices in this frame's ring.
    ///
    /// Growing allocates a new buffer and starts writing it from the beginning;
    /// passes already recorded keep the old buffer alive.
    fn ensure_vertex_capacity(&mut self, ctx: &RenderCtx<'_>, required: usize) {
        if self.vertex_buffer.is_some() && self.cursor + required <= self.vertex_capacity {
            return;
        }

        let new_cap = (self.vertex_capacity * 2)
            .max(required.next_power_of_two())
            .max(MIN_VERTEX_CAPACITY);
        let new_size = (new_cap * std::mem::size_of::<BatchVertex>()) as u64;

        log::trace!("batch vertex ring grows to {new_cap} vertices");
        self.vertex_buffer = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("tessera batch vbo"),
            size: new_size,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.vertex_capacity = new_cap;
        self.cursor = 0;
    }
}
