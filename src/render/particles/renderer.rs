//! 粒子 GPU 渲染
//!
//! 初始化时按粒子池容量一次性分配 GPU 缓冲区，之后每帧只在偏移 0 处
//! 写入打包数据，从不重新分配。缓冲区由 `GpuParticleBuffers` 持有，
//! 在 drop 时显式销毁。

use wgpu::util::DeviceExt;

use super::packer::{
    quad_indices, PackLayout, PackedFrame, ParticleInstance, QuadVertex, INDICES_PER_QUAD,
    QUAD_CORNERS, VERTICES_PER_QUAD,
};
use super::system::ParticleSink;
use crate::core::error::{RenderError, RenderResult};
use crate::render::viewport::Viewport;

const PARTICLE_SHADER: &str = r#"
struct Camera {
    view: mat4x4<f32>,
    projection: mat4x4<f32>,
};
@group(0) @binding(0) var<uniform> camera: Camera;

struct VsOut {
    @builtin(position) pos: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_instanced(
    @location(0) corner: vec2<f32>,
    @location(1) m0: vec4<f32>,
    @location(2) m1: vec4<f32>,
    @location(3) m2: vec4<f32>,
    @location(4) m3: vec4<f32>,
    @location(5) color: vec4<f32>,
) -> VsOut {
    let model = mat4x4<f32>(m0, m1, m2, m3);
    let world = model * vec4<f32>(corner, 0.0, 1.0);
    return VsOut(camera.projection * camera.view * world, color);
}

@vertex
fn vs_quads(
    @location(0) position: vec2<f32>,
    @location(1) color: vec4<f32>,
) -> VsOut {
    let world = vec4<f32>(position, 0.0, 1.0);
    return VsOut(camera.projection * camera.view * world, color);
}

@fragment
fn fs_main(in: VsOut) -> @location(0) vec4<f32> {
    return in.color;
}
"#;

/// 相机 Uniform
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct CameraUniform {
    view: [[f32; 4]; 4],
    projection: [[f32; 4]; 4],
}

impl CameraUniform {
    fn from_viewport(viewport: &Viewport) -> Self {
        Self {
            view: viewport.view().to_cols_array_2d(),
            projection: viewport.projection().to_cols_array_2d(),
        }
    }
}

/// 加法混合：`src * src_alpha + dst`
const ADDITIVE_BLEND: wgpu::BlendState = wgpu::BlendState {
    color: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::SrcAlpha,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
    alpha: wgpu::BlendComponent::OVER,
};

/// 粒子渲染使用的 GPU 缓冲区
struct GpuParticleBuffers {
    /// 每帧写入的实例或顶点数据
    data: wgpu::Buffer,
    /// 实例布局下的单位四边形
    corners: Option<wgpu::Buffer>,
    index: wgpu::Buffer,
    camera: wgpu::Buffer,
}

impl Drop for GpuParticleBuffers {
    fn drop(&mut self) {
        self.data.destroy();
        if let Some(corners) = &self.corners {
            corners.destroy();
        }
        self.index.destroy();
        self.camera.destroy();
    }
}

/// 粒子渲染器
pub struct ParticleRenderer {
    layout: PackLayout,
    pipeline: wgpu::RenderPipeline,
    camera_bind_group: wgpu::BindGroup,
    buffers: GpuParticleBuffers,
    data_capacity: u64,
    instance_count: u32,
    index_count: u32,
}

impl ParticleRenderer {
    /// 创建渲染器并按 `capacity` 预分配所有缓冲区，超出设备缓冲区上限时返回 `BufferOverflow`
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        layout: PackLayout,
        capacity: usize,
        viewport: &Viewport,
    ) -> RenderResult<Self> {
        let (data_capacity, _) =
            buffer_sizes(layout, capacity.max(1), device.limits().max_buffer_size)?;
        let data = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Particle Data Buffer"),
            size: data_capacity,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let (corners, indices) = match layout {
            PackLayout::Instanced => {
                let corners: Vec<[f32; 2]> = QUAD_CORNERS.iter().map(|c| c.to_array()).collect();
                let corner_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Particle Quad Corners"),
                    contents: bytemuck::cast_slice(&corners),
                    usage: wgpu::BufferUsages::VERTEX,
                });
                (Some(corner_buffer), quad_indices(1))
            }
            PackLayout::Quads => (None, quad_indices(capacity.max(1))),
        };
        let index = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Particle Index Buffer"),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let camera = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Particle Camera Uniform"),
            contents: bytemuck::bytes_of(&CameraUniform::from_viewport(viewport)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Particle Camera BGL"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: std::num::NonZeroU64::new(
                        std::mem::size_of::<CameraUniform>() as u64,
                    ),
                },
                count: None,
            }],
        });
        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Particle Camera BG"),
            layout: &camera_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera.as_entire_binding(),
            }],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Particle Shader"),
            source: wgpu::ShaderSource::Wgsl(PARTICLE_SHADER.into()),
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Particle Pipeline Layout"),
            bind_group_layouts: &[&camera_bgl],
            push_constant_ranges: &[],
        });

        let corner_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x2,
            }],
        };
        let instanced_buffers = [corner_layout, ParticleInstance::desc()];
        let quad_buffers = [QuadVertex::desc()];
        let (vs_entry, buffers): (&str, &[wgpu::VertexBufferLayout]) = match layout {
            PackLayout::Instanced => ("vs_instanced", &instanced_buffers),
            PackLayout::Quads => ("vs_quads", &quad_buffers),
        };

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Particle Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: vs_entry,
                buffers,
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(ADDITIVE_BLEND),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        });

        tracing::info!(
            target: "render",
            layout = layout.name(),
            capacity,
            bytes = data_capacity,
            "Particle renderer initialized"
        );

        Ok(Self {
            layout,
            pipeline,
            camera_bind_group,
            buffers: GpuParticleBuffers {
                data,
                corners,
                index,
                camera,
            },
            data_capacity,
            instance_count: 0,
            index_count: 0,
        })
    }

    pub fn layout(&self) -> PackLayout {
        self.layout
    }

    /// 数据缓冲区容量（字节）
    pub fn data_capacity(&self) -> u64 {
        self.data_capacity
    }

    /// 根据视口刷新 view/projection
    pub fn update_camera(&self, queue: &wgpu::Queue, viewport: &Viewport) {
        queue.write_buffer(
            &self.buffers.camera,
            0,
            bytemuck::bytes_of(&CameraUniform::from_viewport(viewport)),
        );
    }

    /// 返回绑定了队列的上传端
    pub fn uploader<'a>(&'a mut self, queue: &'a wgpu::Queue) -> GpuUpload<'a> {
        GpuUpload {
            renderer: self,
            queue,
        }
    }

    /// 以本帧上传的数量发出一次绘制；无存活粒子时跳过
    pub fn draw<'a>(&'a self, rpass: &mut wgpu::RenderPass<'a>) {
        if self.instance_count == 0 || self.index_count == 0 {
            return;
        }
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &self.camera_bind_group, &[]);
        match &self.buffers.corners {
            Some(corners) => {
                rpass.set_vertex_buffer(0, corners.slice(..));
                rpass.set_vertex_buffer(1, self.buffers.data.slice(..));
            }
            None => rpass.set_vertex_buffer(0, self.buffers.data.slice(..)),
        }
        rpass.set_index_buffer(self.buffers.index.slice(..), wgpu::IndexFormat::Uint32);
        rpass.draw_indexed(0..self.index_count, 0, 0..self.instance_count);
    }

    fn record(&mut self, frame: &PackedFrame<'_>) -> RenderResult<()> {
        if frame.layout() != self.layout {
            return Err(RenderError::LayoutMismatch {
                expected: self.layout,
                got: frame.layout(),
            });
        }
        let needed = frame.bytes().len() as u64;
        if needed > self.data_capacity {
            return Err(RenderError::BufferOverflow {
                needed,
                available: self.data_capacity,
            });
        }
        self.instance_count = frame.instance_count();
        self.index_count = frame.index_count();
        Ok(())
    }
}

/// 数据缓冲区和索引缓冲区的字节数；任一超过 `max_buffer_size` 时报错
fn buffer_sizes(
    layout: PackLayout,
    capacity: usize,
    max_buffer_size: u64,
) -> RenderResult<(u64, u64)> {
    let overflow = |needed: u64| RenderError::BufferOverflow {
        needed,
        available: max_buffer_size,
    };
    let quads = match layout {
        PackLayout::Instanced => 1,
        PackLayout::Quads => capacity as u64,
    };
    let data = (layout.bytes_per_particle() as u64)
        .checked_mul(capacity as u64)
        .ok_or_else(|| overflow(u64::MAX))?;
    let index = ((INDICES_PER_QUAD * std::mem::size_of::<u32>()) as u64).saturating_mul(quads);
    let vertices = quads.saturating_mul(VERTICES_PER_QUAD as u64);
    if vertices > u64::from(u32::MAX) {
        return Err(overflow(index));
    }
    if data > max_buffer_size {
        return Err(overflow(data));
    }
    if index > max_buffer_size {
        return Err(overflow(index));
    }
    Ok((data, index))
}

/// GPU 上传端：把打包数据写入预分配缓冲区的偏移 0 处
pub struct GpuUpload<'a> {
    renderer: &'a mut ParticleRenderer,
    queue: &'a wgpu::Queue,
}

impl ParticleSink for GpuUpload<'_> {
    fn upload(&mut self, frame: &PackedFrame<'_>) -> RenderResult<()> {
        self.renderer.record(frame)?;
        if !frame.is_empty() {
            self.queue
                .write_buffer(&self.renderer.buffers.data, 0, frame.bytes());
        }
        Ok(())
    }
}
