//! 每帧 GPU 缓冲区打包
//!
//! 从粒子池存活区间生成 GPU 需要的紧凑布局，每帧整体重建，
//! 复用预分配的 `Vec`，稳态下不再分配。
//!
//! - `Instanced`: 每粒子一条 `ParticleInstance`（4x4 模型矩阵 + 颜色）
//! - `Quads`: 每粒子 4 个 `QuadVertex`（位置 + 颜色），配合初始化时生成的静态索引

use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::pool::LiveParticles;

/// 单位四边形角点（与静态索引 `[0, 1, 3, 1, 2, 3]` 对应）
pub const QUAD_CORNERS: [Vec2; 4] = [
    Vec2::new(0.5, 0.5),
    Vec2::new(0.5, -0.5),
    Vec2::new(-0.5, -0.5),
    Vec2::new(-0.5, 0.5),
];

pub const VERTICES_PER_QUAD: usize = 4;
pub const INDICES_PER_QUAD: usize = 6;
/// 粒子池容量上限：两种布局都在 u32 索引和默认 256 MiB 缓冲区上限之内
pub const MAX_PARTICLE_CAPACITY: usize = 1_000_000;
const QUAD_INDEX_PATTERN: [u32; INDICES_PER_QUAD] = [0, 1, 3, 1, 2, 3];

/// 打包布局
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackLayout {
    /// 每实例：模型矩阵 + 颜色
    #[default]
    Instanced,
    /// 每顶点：四边形展开
    Quads,
}

impl PackLayout {
    pub fn name(&self) -> &'static str {
        match self {
            PackLayout::Instanced => "instanced",
            PackLayout::Quads => "quads",
        }
    }

    /// 每个粒子占用的字节数
    pub fn bytes_per_particle(&self) -> usize {
        match self {
            PackLayout::Instanced => std::mem::size_of::<ParticleInstance>(),
            PackLayout::Quads => std::mem::size_of::<QuadVertex>() * VERTICES_PER_QUAD,
        }
    }
}

impl std::str::FromStr for PackLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "instanced" => Ok(PackLayout::Instanced),
            "quads" => Ok(PackLayout::Quads),
            other => Err(format!("unknown pack layout '{}'", other)),
        }
    }
}

/// 每实例数据（对应 WGSL 实例属性 location 1..=5）
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ParticleInstance {
    /// 列主序模型矩阵
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
}

impl ParticleInstance {
    pub const FLOATS: usize = 20;

    const ATTRIBS: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        1 => Float32x4,
        2 => Float32x4,
        3 => Float32x4,
        4 => Float32x4,
        5 => Float32x4
    ];

    pub fn new(position: Vec2, scale: Vec2, color: [f32; 4]) -> Self {
        let model = Mat4::from_translation(position.extend(0.0))
            * Mat4::from_scale(Vec3::new(scale.x, scale.y, 1.0));
        Self {
            model: model.to_cols_array_2d(),
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// 四边形顶点（每顶点位置 + 颜色）
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl QuadVertex {
    pub const FLOATS: usize = 6;

    const ATTRIBS: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// 为 `quads` 个四边形生成静态索引（两个三角形/四边形）
pub fn quad_indices(quads: usize) -> Vec<u32> {
    let mut indices = Vec::with_capacity(quads * INDICES_PER_QUAD);
    for quad in 0..quads {
        let base = (quad * VERTICES_PER_QUAD) as u32;
        indices.extend(QUAD_INDEX_PATTERN.iter().map(|i| base + i));
    }
    indices
}

/// 本帧的打包结果
#[derive(Debug, Clone, Copy)]
pub struct PackedFrame<'a> {
    layout: PackLayout,
    particles: u32,
    bytes: &'a [u8],
}

impl<'a> PackedFrame<'a> {
    pub fn layout(&self) -> PackLayout {
        self.layout
    }

    /// 打包的粒子数
    pub fn particle_count(&self) -> u32 {
        self.particles
    }

    /// 实例绘制的实例数（`Quads` 布局为 1 或 0）
    pub fn instance_count(&self) -> u32 {
        match self.layout {
            PackLayout::Instanced => self.particles,
            PackLayout::Quads => u32::from(self.particles > 0),
        }
    }

    /// 每次绘制使用的索引数
    pub fn index_count(&self) -> u32 {
        match self.layout {
            PackLayout::Instanced => INDICES_PER_QUAD as u32,
            PackLayout::Quads => self.particles.saturating_mul(INDICES_PER_QUAD as u32),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.particles == 0
    }

    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn floats(&self) -> &'a [f32] {
        bytemuck::cast_slice(self.bytes)
    }
}

/// 缓冲区打包器
pub struct BufferPacker {
    layout: PackLayout,
    capacity: usize,
    instances: Vec<ParticleInstance>,
    vertices: Vec<QuadVertex>,
    indices: Vec<u32>,
}

impl BufferPacker {
    /// 按粒子池容量预分配
    pub fn new(layout: PackLayout, capacity: usize) -> Self {
        let (instances, vertices, indices) = match layout {
            PackLayout::Instanced => (Vec::with_capacity(capacity), Vec::new(), Vec::new()),
            PackLayout::Quads => (
                Vec::new(),
                Vec::with_capacity(capacity * VERTICES_PER_QUAD),
                quad_indices(capacity),
            ),
        };
        Self {
            layout,
            capacity,
            instances,
            vertices,
            indices,
        }
    }

    pub fn layout(&self) -> PackLayout {
        self.layout
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 静态索引（`Quads` 布局），初始化时计算一次
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// 重建本帧缓冲区
    pub fn pack(&mut self, live: &LiveParticles<'_>) -> PackedFrame<'_> {
        let count = live.len().min(self.capacity);
        let positions = &live.positions[..count];
        let scales = &live.scales[..count];
        let colors = &live.colors[..count];

        let bytes: &[u8] = match self.layout {
            PackLayout::Instanced => {
                self.instances.clear();
                self.instances.extend(
                    positions
                        .iter()
                        .zip(scales)
                        .zip(colors)
                        .map(|((p, s), c)| ParticleInstance::new(*p, *s, c.to_array())),
                );
                bytemuck::cast_slice(&self.instances)
            }
            PackLayout::Quads => {
                self.vertices.clear();
                for ((p, s), c) in positions.iter().zip(scales).zip(colors) {
                    let color = c.to_array();
                    self.vertices.extend(QUAD_CORNERS.iter().map(|corner| QuadVertex {
                        position: (*p + *corner * *s).to_array(),
                        color,
                    }));
                }
                bytemuck::cast_slice(&self.vertices)
            }
        };

        PackedFrame {
            layout: self.layout,
            particles: count as u32,
            bytes,
        }
    }
}
