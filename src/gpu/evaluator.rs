// ============================================================================
// GPU CANDIDATE EVALUATOR: weighted-selection errors in one fragment pass
// ============================================================================

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use super::context::GpuContext;
use crate::io::error::{Result, gpu_error};
use crate::quilting::selection::{CandidateEvaluator, CandidateQuery, ErrorMap};
use crate::spatial::{Extent, PixelBuffer, Rect};

const ERROR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::R32Uint;
const ERROR_TEXEL_BYTES: u32 = 4;

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
struct SelectionParams {
    top_overlap: [u32; 2],
    left_overlap: [u32; 2],
    stride: u32,
    compared_pixels: u32,
    _pad: [u32; 2],
}

impl SelectionParams {
    fn from_query(query: &CandidateQuery) -> Self {
        let top = query.top.unwrap_or_default();
        let left = query.left.unwrap_or_default();
        Self {
            top_overlap: [top.width, top.height],
            left_overlap: [left.width, left.height],
            stride: query.stride.max(1),
            compared_pixels: query.compared_pixels() as u32,
            _pad: [0; 2],
        }
    }
}

/// Compiled render pipeline; built once per context and never modified
struct SelectionPipeline {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
}

impl SelectionPipeline {
    fn new(device: &wgpu::Device) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("candidate_error_shader"),
            source: wgpu::ShaderSource::Wgsl(super::shaders::CANDIDATE_ERROR_SHADER.into()),
        });

        let texture_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: false },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        };

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("candidate_error_bgl"),
            entries: &[
                texture_entry(0),
                texture_entry(1),
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("candidate_error_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("candidate_error_pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[],
                compilation_options: Default::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: ERROR_FORMAT,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            multiview: None,
        });

        Self {
            pipeline,
            bind_group_layout,
        }
    }
}

/// Source image resident on the device for the current run
struct SourceTexture {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
    extent: Extent,
}

fn upload_rgba(ctx: &GpuContext, image: &PixelBuffer, label: &str) -> wgpu::Texture {
    let size = wgpu::Extent3d {
        width: image.width(),
        height: image.height(),
        depth_or_array_layers: 1,
    };
    let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8Unorm,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    ctx.queue.write_texture(
        wgpu::ImageCopyTexture {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        image.as_bytes(),
        wgpu::ImageDataLayout {
            offset: 0,
            bytes_per_row: Some(4 * image.width()),
            rows_per_image: Some(image.height()),
        },
        size,
    );
    texture
}

/// `bytes_per_row` for texture-to-buffer copies must be a multiple of 256
const fn aligned_bytes_per_row(width: u32) -> u32 {
    let unaligned = width * ERROR_TEXEL_BYTES;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    unaligned.div_ceil(align) * align
}

/// Weighted-selection backend running the candidate error shader
///
/// The pipeline is compiled on first use and reused for every later call on
/// the same context. Each run uploads its own source texture in
/// [`CandidateEvaluator::begin`]; each evaluation uploads the canvas block and
/// uniforms, renders, and blocks until the error map has been read back.
pub struct GpuEvaluator {
    context: GpuContext,
    pipeline: Option<SelectionPipeline>,
    source: Option<SourceTexture>,
}

impl GpuEvaluator {
    /// Create an evaluator bound to a context
    pub const fn new(context: GpuContext) -> Self {
        Self {
            context,
            pipeline: None,
            source: None,
        }
    }

    fn render_errors(
        &mut self,
        block: &PixelBuffer,
        query: &CandidateQuery,
        lattice: Extent,
    ) -> Result<Vec<u32>> {
        if self.pipeline.is_none() {
            self.pipeline = Some(SelectionPipeline::new(&self.context.device));
        }
        let (Some(pipeline), Some(source)) = (&self.pipeline, &self.source) else {
            return Err(gpu_error("bind source", &"no source texture uploaded"));
        };
        let ctx = &self.context;
        let source_view = &source.view;
        let device = &ctx.device;

        let block_tex = upload_rgba(ctx, block, "candidate_block");
        let block_view = block_tex.create_view(&wgpu::TextureViewDescriptor::default());

        let params = SelectionParams::from_query(query);
        let params_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("candidate_params"),
            contents: bytemuck::bytes_of(&params),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("candidate_error_bg"),
            layout: &pipeline.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(source_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&block_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: params_buf.as_entire_binding(),
                },
            ],
        });

        let extent = wgpu::Extent3d {
            width: lattice.width,
            height: lattice.height,
            depth_or_array_layers: 1,
        };
        let target = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("candidate_errors"),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: ERROR_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let target_view = target.create_view(&wgpu::TextureViewDescriptor::default());

        let bytes_per_row = aligned_bytes_per_row(lattice.width);
        let staging = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("candidate_errors_staging"),
            size: u64::from(bytes_per_row) * u64::from(lattice.height),
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("candidate_error_encoder"),
        });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("candidate_error_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_pipeline(&pipeline.pipeline);
            pass.set_bind_group(0, &bind_group, &[]);
            pass.draw(0..3, 0..1);
        }
        encoder.copy_texture_to_buffer(
            wgpu::ImageCopyTexture {
                texture: &target,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::ImageCopyBuffer {
                buffer: &staging,
                layout: wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(bytes_per_row),
                    rows_per_image: Some(lattice.height),
                },
            },
            extent,
        );
        ctx.submit_one(encoder);

        // Blocking sync point: nothing below runs before the pass has finished
        let slice = staging.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        device.poll(wgpu::Maintain::Wait);
        match rx.recv() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(gpu_error("map error buffer", &e)),
            Err(e) => return Err(gpu_error("map error buffer", &e)),
        }

        let row_bytes = (lattice.width * ERROR_TEXEL_BYTES) as usize;
        let mut errors = Vec::with_capacity(lattice.area());
        {
            let mapped = slice.get_mapped_range();
            for row in mapped.chunks(bytes_per_row as usize).take(lattice.height as usize) {
                let texels = row.get(..row_bytes).unwrap_or_default();
                errors.extend(
                    texels
                        .chunks_exact(ERROR_TEXEL_BYTES as usize)
                        .map(bytemuck::pod_read_unaligned::<u32>),
                );
            }
        }
        staging.unmap();

        Ok(errors)
    }
}

impl CandidateEvaluator for GpuEvaluator {
    fn begin(&mut self, source: &PixelBuffer) -> Result<()> {
        if !self.context.supports_size(source.width(), source.height()) {
            return Err(gpu_error(
                "upload source",
                &format!(
                    "{} exceeds the device texture limit {}",
                    source.extent(),
                    self.context.max_texture_dim
                ),
            ));
        }
        let texture = upload_rgba(&self.context, source, "quilt_source");
        self.source = Some(SourceTexture {
            view: texture.create_view(&wgpu::TextureViewDescriptor::default()),
            _texture: texture,
            extent: source.extent(),
        });
        Ok(())
    }

    fn evaluate(
        &mut self,
        source: &PixelBuffer,
        canvas: &PixelBuffer,
        query: &CandidateQuery,
    ) -> Result<ErrorMap> {
        if self.source.as_ref().map(|s| s.extent) != Some(source.extent()) {
            self.begin(source)?;
        }

        let lattice = query.lattice(source.extent());
        let block = canvas.copy_region(Rect::new(query.block_origin, query.block_size));
        let errors = self.render_errors(&block, query, lattice)?;

        ErrorMap::new(lattice, query.stride, errors)
            .ok_or_else(|| gpu_error("read back errors", &"error map has the wrong size"))
    }
}
