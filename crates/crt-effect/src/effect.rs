use std::time::Instant;

use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use winit::dpi::PhysicalSize;

use crate::error::EffectError;
use crate::gpu::{EffectUniforms, FrameTexture, GpuContext, QuadGeometry};
use crate::shader::{compile_fragment_shader, compile_vertex_shader};
use crate::types::FrameImage;

/// The compiled program plus every resource it draws with. Built exactly
/// once per effect instance; never recompiled.
struct EffectPipeline {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    quad: QuadGeometry,
    frame_texture: FrameTexture,
}

/// Full-screen CRT post-processing effect bound to one drawable surface.
///
/// Construction acquires the context and compiles the shader pair; both
/// failure modes are fatal and surface as [`EffectError`]. After that the
/// only per-frame entry point is [`CrtEffect::render`].
pub struct CrtEffect {
    context: GpuContext,
    pipeline: Option<EffectPipeline>,
    uniforms: EffectUniforms,
    start_time: Instant,
}

impl CrtEffect {
    pub fn new<T>(target: &T, initial_size: PhysicalSize<u32>) -> Result<Self, EffectError>
    where
        T: HasDisplayHandle + HasWindowHandle,
    {
        let context = GpuContext::new(target, initial_size)?;
        let pipeline = EffectPipeline::new(&context)?;
        let uniforms = EffectUniforms::new(context.size.width, context.size.height);

        Ok(Self {
            context,
            pipeline: Some(pipeline),
            uniforms,
            start_time: Instant::now(),
        })
    }

    pub fn size(&self) -> PhysicalSize<u32> {
        self.context.size
    }

    /// Reconfigures the swapchain for a new drawable size. Zero-sized
    /// updates (minimized windows) are ignored.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.context.resize(new_size);
    }

    /// Composites `frame` to the surface through the CRT shader.
    ///
    /// `_is_mobile` is accepted for forward compatibility but drives no
    /// behavior. Surface losses propagate to the caller, which typically
    /// reconfigures and retries; all other side effects stay confined to
    /// the texture contents and the visible surface.
    pub fn render(
        &mut self,
        frame: &FrameImage,
        _is_mobile: bool,
    ) -> Result<(), wgpu::SurfaceError> {
        // Construction failures already surfaced fatally; this guard only
        // covers partially-failed state so the game loop never crashes here.
        let Some(pipeline) = self.pipeline.as_mut() else {
            return Ok(());
        };

        let surface_frame = self.context.surface.get_current_texture()?;
        let view = surface_frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let size = self.context.size;
        self.uniforms
            .set_resolution(size.width as f32, size.height as f32);
        self.uniforms
            .set_time(self.start_time.elapsed().as_secs_f32());
        self.context.queue.write_buffer(
            &pipeline.uniform_buffer,
            0,
            bytemuck::bytes_of(&self.uniforms),
        );

        pipeline
            .frame_texture
            .upload(&self.context.device, &self.context.queue, frame);

        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("crt effect encoder"),
                });
        {
            // The pass scope owns all bindings; dropping it before submit
            // returns the context to a neutral state, so nothing leaks into
            // unrelated draws sharing the device.
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("crt effect pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            render_pass.set_viewport(0.0, 0.0, size.width as f32, size.height as f32, 0.0, 1.0);
            render_pass.set_pipeline(&pipeline.pipeline);
            render_pass.set_bind_group(0, &pipeline.uniform_bind_group, &[]);
            render_pass.set_bind_group(1, pipeline.frame_texture.bind_group(), &[]);
            render_pass.set_vertex_buffer(0, pipeline.quad.position_buffer.slice(..));
            render_pass.set_vertex_buffer(1, pipeline.quad.tex_coord_buffer.slice(..));
            render_pass.draw(0..QuadGeometry::VERTEX_COUNT, 0..1);
        }

        self.context.queue.submit(std::iter::once(encoder.finish()));
        surface_frame.present();
        Ok(())
    }
}

impl EffectPipeline {
    fn new(context: &GpuContext) -> Result<Self, EffectError> {
        let device = &context.device;

        let vertex_module = compile_vertex_shader(device)?;
        let fragment_module = compile_fragment_shader(device)?;

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("uniform layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let frame_layout = FrameTexture::bind_group_layout(device);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("crt pipeline layout"),
            bind_group_layouts: &[&uniform_layout, &frame_layout],
            push_constant_ranges: &[],
        });

        // Linking the validated stages can still fail; catch it through the
        // validation scope the same way as compilation.
        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("crt pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &vertex_module,
                entry_point: Some("main"),
                buffers: &QuadGeometry::buffer_layouts(),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            fragment: Some(wgpu::FragmentState {
                module: &fragment_module,
                entry_point: Some("main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: context.surface_format,
                    // Standard alpha compositing; fixed for the lifetime of
                    // the context, never changed per draw.
                    blend: Some(wgpu::BlendState {
                        color: wgpu::BlendComponent {
                            src_factor: wgpu::BlendFactor::SrcAlpha,
                            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
                            operation: wgpu::BlendOperation::Add,
                        },
                        alpha: wgpu::BlendComponent {
                            src_factor: wgpu::BlendFactor::SrcAlpha,
                            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
                            operation: wgpu::BlendOperation::Add,
                        },
                    }),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview: None,
            cache: None,
        });
        if let Some(error) = pollster::block_on(device.pop_error_scope()) {
            return Err(EffectError::ProgramLink {
                log: error.to_string(),
            });
        }

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("effect uniforms"),
            size: std::mem::size_of::<EffectUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("effect uniform bind group"),
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let quad = QuadGeometry::new(device);
        let frame_texture = FrameTexture::new(
            device,
            &frame_layout,
            context.size.width,
            context.size.height,
        );

        Ok(Self {
            pipeline,
            uniform_buffer,
            uniform_bind_group,
            quad,
            frame_texture,
        })
    }
}
