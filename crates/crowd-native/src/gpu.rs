use crate::camera::Camera;
use crate::mesh::{self, Vertex};
use crowd_core::{CrowdRenderer, DrawBatch, InstanceRaw};
use wgpu::util::DeviceExt;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const LIGHT_DIR: [f32; 4] = [0.3, 0.8, -0.5, 0.0];
const ORBIT_RADIUS: f32 = 30.0;
const ORBIT_SPEED: f32 = 0.05;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
    light_dir: [f32; 4],
}

const INSTANCE_ATTRIBUTES: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
    2 => Float32x4,
    3 => Float32x4,
    4 => Float32x4,
    5 => Float32x4,
    6 => Float32x4,
];

const VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

struct MeshBuffer {
    buffer: wgpu::Buffer,
    vertex_count: u32,
}

impl MeshBuffer {
    fn new(device: &wgpu::Device, label: &str, vertices: &[Vertex]) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        Self {
            buffer,
            vertex_count: vertices.len() as u32,
        }
    }
}

/// Instanced renderer for the crowd. Implements the draw/transfer side of
/// [`CrowdRenderer`]: `upload` copies the frame's instances into GPU buffers
/// and `draw` queues one batch per block for the next [`GpuState::render`].
pub struct GpuState<'w> {
    pub window: &'w winit::window::Window,
    surface: wgpu::Surface<'w>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,
    lit_pipeline: wgpu::RenderPipeline,
    emissive_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    human_mesh: MeshBuffer,
    penlight_mesh: MeshBuffer,
    slab_mesh: MeshBuffer,
    human_instances: wgpu::Buffer,
    penlight_instances: wgpu::Buffer,
    slab_instances: wgpu::Buffer,
    slab_count: u32,
    batches: Vec<DrawBatch>,
    camera: Camera,
}

impl<'w> GpuState<'w> {
    pub async fn new(
        window: &'w winit::window::Window,
        instance_count: usize,
        slab_count: usize,
    ) -> anyhow::Result<Self> {
        let size = window.inner_size();
        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(window)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No GPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface_caps.formats[0];
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            desired_maximum_frame_latency: 2,
            view_formats: vec![],
        };
        surface.configure(&device, &config);
        let depth_view = create_depth_view(&device, config.width, config.height);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("crowd_shader"),
            source: wgpu::ShaderSource::Wgsl(crowd_core::CROWD_WGSL.into()),
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("uniforms"),
            size: std::mem::size_of::<Uniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("bgl"),
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
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("bg"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let lit_pipeline = make_pipeline(&device, &pipeline_layout, &shader, "fs_lit", format);
        let emissive_pipeline =
            make_pipeline(&device, &pipeline_layout, &shader, "fs_emissive", format);

        let human_mesh = MeshBuffer::new(&device, "human_mesh", &mesh::human_mesh());
        let penlight_mesh = MeshBuffer::new(&device, "penlight_mesh", &mesh::penlight_mesh());
        let slab_mesh = MeshBuffer::new(&device, "slab_mesh", &mesh::slab_mesh());

        let human_instances = create_instance_buffer(&device, "human_instances", instance_count);
        let penlight_instances =
            create_instance_buffer(&device, "penlight_instances", instance_count);
        let slab_instances = create_instance_buffer(&device, "slab_instances", slab_count);

        Ok(Self {
            window,
            surface,
            device,
            queue,
            depth_view,
            lit_pipeline,
            emissive_pipeline,
            uniform_buffer,
            bind_group,
            human_mesh,
            penlight_mesh,
            slab_mesh,
            human_instances,
            penlight_instances,
            slab_instances,
            slab_count: 0,
            batches: Vec::new(),
            camera: Camera::new(config.width as f32 / config.height as f32),
            config,
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
        self.depth_view = create_depth_view(&self.device, new_size.width, new_size.height);
        self.camera.aspect = new_size.width as f32 / new_size.height as f32;
    }

    /// Floor slabs under each sub-block; refreshed every frame since spawn
    /// transforms are live.
    pub fn upload_slabs(&mut self, slabs: &[InstanceRaw]) {
        if slabs.is_empty() {
            self.slab_count = 0;
            return;
        }
        self.queue
            .write_buffer(&self.slab_instances, 0, bytemuck::cast_slice(slabs));
        self.slab_count = slabs.len() as u32;
    }

    pub fn render(&mut self, time: f32) -> Result<(), wgpu::SurfaceError> {
        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.camera.orbit(time, ORBIT_RADIUS, ORBIT_SPEED);
        self.queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&Uniforms {
                view_proj: self.camera.view_proj().to_cols_array_2d(),
                light_dir: LIGHT_DIR,
            }),
        );

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("rpass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.01,
                            g: 0.01,
                            b: 0.03,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_bind_group(0, &self.bind_group, &[]);

            rpass.set_pipeline(&self.lit_pipeline);
            if self.slab_count > 0 {
                rpass.set_vertex_buffer(0, self.slab_mesh.buffer.slice(..));
                rpass.set_vertex_buffer(1, self.slab_instances.slice(..));
                rpass.draw(0..self.slab_mesh.vertex_count, 0..self.slab_count);
            }

            // One draw per block, humans then wands, each slicing the shared arrays
            rpass.set_vertex_buffer(0, self.human_mesh.buffer.slice(..));
            rpass.set_vertex_buffer(1, self.human_instances.slice(..));
            for batch in &self.batches {
                rpass.draw(0..self.human_mesh.vertex_count, instance_range(batch));
            }

            rpass.set_pipeline(&self.emissive_pipeline);
            rpass.set_vertex_buffer(0, self.penlight_mesh.buffer.slice(..));
            rpass.set_vertex_buffer(1, self.penlight_instances.slice(..));
            for batch in &self.batches {
                rpass.draw(0..self.penlight_mesh.vertex_count, instance_range(batch));
            }
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        self.batches.clear();
        Ok(())
    }
}

impl CrowdRenderer for GpuState<'_> {
    fn upload(&mut self, humans: &[InstanceRaw], penlights: &[InstanceRaw]) {
        if humans.is_empty() {
            return;
        }
        self.queue
            .write_buffer(&self.human_instances, 0, bytemuck::cast_slice(humans));
        self.queue
            .write_buffer(&self.penlight_instances, 0, bytemuck::cast_slice(penlights));
    }

    fn draw(&mut self, batch: DrawBatch) {
        if batch.count > 0 {
            self.batches.push(batch);
        }
    }
}

fn instance_range(batch: &DrawBatch) -> std::ops::Range<u32> {
    batch.start as u32..(batch.start + batch.count) as u32
}

fn create_instance_buffer(device: &wgpu::Device, label: &str, count: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: (std::mem::size_of::<InstanceRaw>() * count.max(1)) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let tex = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    tex.create_view(&wgpu::TextureViewDescriptor::default())
}

fn make_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    frag_entry: &str,
    color_format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let vertex_buffers = [
        // slot 0: mesh vertices
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &VERTEX_ATTRIBUTES,
        },
        // slot 1: per-instance model matrix + colour
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceRaw>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &INSTANCE_ATTRIBUTES,
        },
    ];
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(frag_entry),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &vertex_buffers,
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(frag_entry),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        cache: None,
        multiview: None,
    })
}
