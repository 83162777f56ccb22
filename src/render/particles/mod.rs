//! 2D 粒子系统
//!
//! ```text
//! ┌──────────────┐   live()   ┌──────────────┐  PackedFrame  ┌──────────────────┐
//! │ ParticlePool │ ─────────▶ │ BufferPacker │ ────────────▶ │ ParticleSink     │
//! │ (SoA, 定容)  │            │ (每帧重建)   │               │ (GPU 上传/记录)  │
//! └──────────────┘            └──────────────┘               └──────────────────┘
//! ```
//!
//! - `pool`: 定容 SoA 粒子池，存活粒子始终占据前缀 `[0, len)`
//! - `packer`: 把存活区间打包为实例数据或四边形顶点
//! - `renderer`: wgpu 管线与预分配缓冲区
//! - `system`: 每帧 模拟 → 打包 → 上传
//!
//! ## 使用示例
//!
//! ```
//! use particle_fx::core::time::Timestep;
//! use particle_fx::render::particles::{EmitterConfig, PackLayout, ParticleSystem};
//!
//! let mut system =
//!     ParticleSystem::with_capacity(1000, PackLayout::Instanced, Some(7), EmitterConfig::default());
//! system.pool_mut().emit().unwrap();
//! system.pool_mut().update(Timestep::from_millis(16.0));
//! assert!(system.pool().len() <= 1000);
//! ```

pub mod emitter;
pub mod packer;
pub mod pool;
pub mod random;
pub mod renderer;
pub mod system;

pub use emitter::{EmissionMode, EmitterConfig, SpawnTemplate, MAX_SCATTER};
pub use packer::{
    BufferPacker, PackLayout, PackedFrame, ParticleInstance, QuadVertex, MAX_PARTICLE_CAPACITY,
};
pub use pool::{
    LiveParticles, ParticlePool, ParticleSnapshot, PoolError, PoolResult, PoolStats,
    SpawnOutcome, UpdateReport,
};
pub use random::{RandomAttribute, RandomAttributes, RandomRange, RandomRanges, RandomizationConfig};
pub use renderer::{GpuUpload, ParticleRenderer};
pub use system::{FrameReport, ParticleSink, ParticleSystem};
