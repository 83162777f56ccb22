//! 粒子系统
//!
//! 把粒子池、打包器和上传端串成每帧的固定流程：
//! 模拟 → 打包 → 上传。上传端抽象为 [`ParticleSink`]，
//! GPU 渲染器与测试中的记录器都实现它。

use super::emitter::EmitterConfig;
use super::packer::{BufferPacker, PackLayout, PackedFrame};
use super::pool::{ParticlePool, UpdateReport};
use crate::core::error::RenderResult;
use crate::core::time::Timestep;

/// 打包数据的接收端
pub trait ParticleSink {
    /// 接收本帧的打包数据。每帧恰好调用一次，包括无存活粒子的帧。
    fn upload(&mut self, frame: &PackedFrame<'_>) -> RenderResult<()>;
}

/// 单帧结果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub update: UpdateReport,
    /// 本帧上传的粒子数
    pub uploaded: u32,
}

/// 粒子池 + 打包器
pub struct ParticleSystem {
    pool: ParticlePool,
    packer: BufferPacker,
}

impl ParticleSystem {
    pub fn new(pool: ParticlePool, layout: PackLayout) -> Self {
        let packer = BufferPacker::new(layout, pool.capacity());
        Self { pool, packer }
    }

    /// 按容量、布局和可选种子创建
    pub fn with_capacity(
        capacity: usize,
        layout: PackLayout,
        seed: Option<u64>,
        config: EmitterConfig,
    ) -> Self {
        let mut pool = match seed {
            Some(seed) => ParticlePool::with_seed(capacity, seed),
            None => ParticlePool::new(capacity),
        };
        pool.configure(config);
        Self::new(pool, layout)
    }

    pub fn pool(&self) -> &ParticlePool {
        &self.pool
    }

    pub fn pool_mut(&mut self) -> &mut ParticlePool {
        &mut self.pool
    }

    pub fn layout(&self) -> PackLayout {
        self.packer.layout()
    }

    /// 推进一帧并把结果交给 `sink`
    pub fn frame<S: ParticleSink + ?Sized>(
        &mut self,
        ts: Timestep,
        sink: &mut S,
    ) -> RenderResult<FrameReport> {
        let update = self.pool.update(ts);
        let packed = self.packer.pack(&self.pool.live());
        let uploaded = packed.particle_count();
        sink.upload(&packed)?;

        tracing::trace!(
            target: "particles",
            live = uploaded,
            destroyed = update.destroyed,
            spawned = update.spawned,
            "Frame complete"
        );

        Ok(FrameReport { update, uploaded })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::RenderError;
    use glam::{Vec2, Vec4};

    #[derive(Default)]
    struct RecordingSink {
        uploads: Vec<(u32, u32, Vec<f32>)>,
    }

    impl ParticleSink for RecordingSink {
        fn upload(&mut self, frame: &PackedFrame<'_>) -> RenderResult<()> {
            self.uploads.push((
                frame.instance_count(),
                frame.index_count(),
                frame.floats().to_vec(),
            ));
            Ok(())
        }
    }

    struct FailingSink;

    impl ParticleSink for FailingSink {
        fn upload(&mut self, frame: &PackedFrame<'_>) -> RenderResult<()> {
            Err(RenderError::BufferOverflow {
                needed: frame.bytes().len() as u64,
                available: 0,
            })
        }
    }

    fn still_config() -> EmitterConfig {
        EmitterConfig::default()
            .with_position(Vec2::new(10.0, 20.0))
            .with_speed(Vec2::ZERO, None)
            .with_colors(Vec4::ONE, Vec4::ONE)
            .with_scales(Vec2::splat(2.0), Vec2::splat(2.0))
            .with_life(1.0)
            .with_looping(false)
    }

    #[test]
    fn test_empty_frame_still_uploads() {
        let mut system = ParticleSystem::with_capacity(8, PackLayout::Quads, Some(1), still_config());
        let mut sink = RecordingSink::default();

        let report = system.frame(Timestep::from_millis(16.0), &mut sink).unwrap();
        assert_eq!(report.uploaded, 0);
        assert_eq!(sink.uploads.len(), 1);
        assert_eq!(sink.uploads[0].0, 0);
        assert!(sink.uploads[0].2.is_empty());
    }

    #[test]
    fn test_frame_packs_live_particles() {
        let mut system =
            ParticleSystem::with_capacity(8, PackLayout::Quads, Some(1), still_config());
        system.pool_mut().burst(2);
        let mut sink = RecordingSink::default();

        let report = system.frame(Timestep::from_millis(16.0), &mut sink).unwrap();
        assert_eq!(report.uploaded, 2);
        let (instances, indices, floats) = &sink.uploads[0];
        assert_eq!(*instances, 1);
        assert_eq!(*indices, 12);
        assert_eq!(floats.len(), 2 * 4 * 6);
        // 第一个角 (0.5, 0.5) * 2 + (10, 20)
        assert_eq!(&floats[0..2], &[11.0, 21.0]);
    }

    #[test]
    fn test_sink_error_propagates() {
        let mut system =
            ParticleSystem::with_capacity(4, PackLayout::Instanced, Some(1), still_config());
        system.pool_mut().burst(1);
        let err = system
            .frame(Timestep::from_millis(1.0), &mut FailingSink)
            .unwrap_err();
        assert!(matches!(err, RenderError::BufferOverflow { .. }));
    }
}
