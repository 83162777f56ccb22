pub mod context;
pub mod particles;
pub mod viewport;

pub use context::GpuContext;
pub use viewport::Viewport;

pub use particles::{
    BufferPacker, EmitterConfig, PackLayout, PackedFrame, ParticlePool, ParticleRenderer,
    ParticleSink, ParticleSystem,
};
