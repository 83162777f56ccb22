//! 定容 SoA 粒子池
//!
//! 每个属性一条并行数组，长度固定为 `capacity`，槽位 `0..len` 为存活粒子。
//! 粒子死亡时与最后一个存活槽位整行交换后缩短存活区间，O(1) 且不重新分配。
//!
//! ## 更新顺序
//!
//! `update` 按索引递增遍历存活区间。槽位 `i` 被销毁后，换入的粒子会在
//! 同一轮中立即在 `i` 处重新检查，因此每个存活粒子每次 `update` 恰好被处理一次，
//! 死亡粒子在发现它的那一轮被全部回收。

use std::ops::{Add, Mul};

use glam::{Vec2, Vec4};
use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;

use super::emitter::{EmissionMode, EmitterConfig, SpawnTemplate};
use super::random::{RandomAttribute, RandomizationConfig};
use crate::core::time::Timestep;

/// 累加器比较容差（毫秒），吸收秒/毫秒换算的舍入
const SPAWN_EPSILON_MS: f64 = 1e-6;

/// 粒子池错误
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolError {
    #[error("Particle pool is full (capacity {capacity})")]
    CapacityExhausted { capacity: usize },

    #[error("Slot {slot} is not live ({live} live particles)")]
    SlotOutOfRange { slot: usize, live: usize },
}

pub type PoolResult<T> = Result<T, PoolError>;

/// 批量生成结果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpawnOutcome {
    /// 实际生成数
    pub spawned: usize,
    /// 因容量不足被拒绝的数量
    pub rejected: usize,
}

impl SpawnOutcome {
    pub fn is_complete(&self) -> bool {
        self.rejected == 0
    }
}

/// 单次 `update` 的统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateReport {
    /// 本帧回收的粒子数
    pub destroyed: usize,
    /// 本帧定时生成的粒子数
    pub spawned: usize,
    /// 因容量耗尽跳过的定时生成
    pub skipped: usize,
}

/// 粒子池累计统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    pub total_spawned: u64,
    pub total_destroyed: u64,
    pub total_skipped: u64,
}

/// 单个粒子的只读快照
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleSnapshot {
    pub position: Vec2,
    pub velocity: Vec2,
    pub color_begin: Vec4,
    pub color_end: Vec4,
    pub color: Vec4,
    pub scale_begin: Vec2,
    pub scale_end: Vec2,
    pub scale: Vec2,
    pub life: f32,
    pub total_life: f32,
}

/// 存活区间的只读视图，每个切片长度都等于存活数
#[derive(Debug, Clone, Copy)]
pub struct LiveParticles<'a> {
    pub positions: &'a [Vec2],
    pub velocities: &'a [Vec2],
    pub colors: &'a [Vec4],
    pub scales: &'a [Vec2],
    pub lives: &'a [f32],
}

impl<'a> LiveParticles<'a> {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// 定容粒子池
pub struct ParticlePool {
    capacity: usize,
    len: usize,

    position: Vec<Vec2>,
    velocity: Vec<Vec2>,
    color_begin: Vec<Vec4>,
    color_end: Vec<Vec4>,
    color: Vec<Vec4>,
    scale_begin: Vec<Vec2>,
    scale_end: Vec<Vec2>,
    scale: Vec<Vec2>,
    life: Vec<f32>,
    total_life: Vec<f32>,

    config: EmitterConfig,
    randomization: RandomizationConfig,
    emitting: bool,
    /// 距上次定时生成累计的毫秒数
    elapsed_ms: f64,
    rng: StdRng,
    stats: PoolStats,
}

impl ParticlePool {
    /// 创建粒子池，随机源取自系统熵
    pub fn new(capacity: usize) -> Self {
        Self::with_rng(capacity, StdRng::from_entropy())
    }

    /// 创建使用固定种子的粒子池（结果可复现）
    pub fn with_seed(capacity: usize, seed: u64) -> Self {
        Self::with_rng(capacity, StdRng::seed_from_u64(seed))
    }

    fn with_rng(capacity: usize, rng: StdRng) -> Self {
        Self {
            capacity,
            len: 0,
            position: vec![Vec2::ZERO; capacity],
            velocity: vec![Vec2::ZERO; capacity],
            color_begin: vec![Vec4::ZERO; capacity],
            color_end: vec![Vec4::ZERO; capacity],
            color: vec![Vec4::ZERO; capacity],
            scale_begin: vec![Vec2::ZERO; capacity],
            scale_end: vec![Vec2::ZERO; capacity],
            scale: vec![Vec2::ZERO; capacity],
            life: vec![0.0; capacity],
            total_life: vec![0.0; capacity],
            config: EmitterConfig::default(),
            randomization: RandomizationConfig::default(),
            emitting: false,
            elapsed_ms: 0.0,
            rng,
            stats: PoolStats::default(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 存活粒子数
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len >= self.capacity
    }

    /// 最后一个存活槽位，空池返回 `None`
    pub fn last_active(&self) -> Option<usize> {
        self.len.checked_sub(1)
    }

    pub fn is_emitting(&self) -> bool {
        self.emitting
    }

    pub fn mode(&self) -> EmissionMode {
        self.config.mode()
    }

    pub fn stats(&self) -> PoolStats {
        self.stats
    }

    pub fn config(&self) -> &EmitterConfig {
        &self.config
    }

    /// 替换生成模板，不影响已存活的粒子
    pub fn configure(&mut self, config: EmitterConfig) {
        self.config = config;
    }

    pub fn set_spawn_position(&mut self, position: Vec2) {
        self.config.position = position;
    }

    pub fn randomization(&self) -> &RandomizationConfig {
        &self.randomization
    }

    pub fn randomization_mut(&mut self) -> &mut RandomizationConfig {
        &mut self.randomization
    }

    pub fn set_random(&mut self, attribute: RandomAttribute, enabled: bool) {
        self.randomization.enabled.set(attribute, enabled);
    }

    /// 开始发射
    ///
    /// 单次模式立即生成一个粒子；循环模式下生成交给 `update` 的定时检查。
    pub fn emit(&mut self) -> PoolResult<()> {
        self.emitting = true;
        self.elapsed_ms = 0.0;
        match self.config.mode() {
            EmissionMode::OneShot => {
                let slot = self.spawn()?;
                tracing::debug!(target: "particles", slot, "One-shot particle emitted");
                Ok(())
            }
            EmissionMode::Looping => Ok(()),
        }
    }

    /// 停止发射，已有粒子继续模拟直到自然死亡
    pub fn stop(&mut self) {
        self.emitting = false;
    }

    /// 按当前模板生成一个粒子，返回其槽位
    pub fn spawn(&mut self) -> PoolResult<usize> {
        let template = self.config.template();
        self.spawn_from(&template)
    }

    /// 立即生成 `count` 个粒子，超出剩余容量的部分被拒绝
    pub fn burst(&mut self, count: usize) -> SpawnOutcome {
        let mut outcome = SpawnOutcome::default();
        for _ in 0..count {
            match self.spawn() {
                Ok(_) => outcome.spawned += 1,
                Err(_) => {
                    outcome.rejected = count - outcome.spawned;
                    break;
                }
            }
        }
        if !outcome.is_complete() {
            self.stats.total_skipped += outcome.rejected as u64;
            tracing::warn!(
                target: "particles",
                requested = count,
                spawned = outcome.spawned,
                capacity = self.capacity,
                "Burst clamped to remaining capacity"
            );
        }
        outcome
    }

    /// 清空存活区间；旧槽位数据保留，重新生成前不可达
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// 销毁存活槽位 `slot`：与最后一个存活槽位交换后缩短存活区间
    pub fn destroy(&mut self, slot: usize) -> PoolResult<()> {
        if slot >= self.len {
            return Err(PoolError::SlotOutOfRange {
                slot,
                live: self.len,
            });
        }
        self.swap_remove(slot);
        Ok(())
    }

    /// 推进一帧
    pub fn update(&mut self, ts: Timestep) -> UpdateReport {
        let dt = ts.seconds();
        let mut report = UpdateReport::default();

        let mut i = 0;
        while i < self.len {
            if self.life[i] <= 0.0 {
                self.swap_remove(i);
                report.destroyed += 1;
                // 换入的粒子在同一槽位重新检查
                continue;
            }

            self.life[i] -= dt;
            self.position[i] += self.velocity[i] * dt;

            let t = life_fraction(self.life[i], self.total_life[i]);
            self.color[i] = lerp_life(self.color_begin[i], self.color_end[i], t);
            self.scale[i] = lerp_life(self.scale_begin[i], self.scale_end[i], t);

            i += 1;
        }

        if self.emitting && self.config.mode() == EmissionMode::Looping {
            self.timed_emission(ts, &mut report);
        }

        self.stats.total_destroyed += report.destroyed as u64;
        report
    }

    /// 存活区间视图
    pub fn live(&self) -> LiveParticles<'_> {
        let n = self.len;
        LiveParticles {
            positions: &self.position[..n],
            velocities: &self.velocity[..n],
            colors: &self.color[..n],
            scales: &self.scale[..n],
            lives: &self.life[..n],
        }
    }

    /// 读取存活槽位的完整属性
    pub fn particle(&self, slot: usize) -> Option<ParticleSnapshot> {
        if slot >= self.len {
            return None;
        }
        Some(ParticleSnapshot {
            position: self.position[slot],
            velocity: self.velocity[slot],
            color_begin: self.color_begin[slot],
            color_end: self.color_end[slot],
            color: self.color[slot],
            scale_begin: self.scale_begin[slot],
            scale_end: self.scale_end[slot],
            scale: self.scale[slot],
            life: self.life[slot],
            total_life: self.total_life[slot],
        })
    }

    fn timed_emission(&mut self, ts: Timestep, report: &mut UpdateReport) {
        let Some(interval) = self.config.spawn_interval_ms() else {
            return;
        };

        self.elapsed_ms += ts.seconds() as f64 * 1000.0;
        while self.elapsed_ms + SPAWN_EPSILON_MS >= interval {
            if self.is_full() {
                report.skipped += 1;
                self.stats.total_skipped += 1;
                // 有空位时立即补一个，不累积积压
                self.elapsed_ms = self.elapsed_ms.min(interval);
                tracing::debug!(
                    target: "particles",
                    capacity = self.capacity,
                    "Limit reached, timed spawn skipped"
                );
                break;
            }

            let template = self.config.randomized(&self.randomization, &mut self.rng);
            if self.spawn_from(&template).is_ok() {
                report.spawned += 1;
            }
            self.elapsed_ms = (self.elapsed_ms - interval).max(0.0);
        }
    }

    fn spawn_from(&mut self, template: &SpawnTemplate) -> PoolResult<usize> {
        if self.is_full() {
            tracing::debug!(target: "particles", capacity = self.capacity, "Spawn rejected, pool full");
            return Err(PoolError::CapacityExhausted {
                capacity: self.capacity,
            });
        }

        let slot = self.len;
        self.position[slot] = template.position;
        self.velocity[slot] = template.velocity(&mut self.rng);
        self.color_begin[slot] = template.color_begin;
        self.color_end[slot] = template.color_end;
        self.color[slot] = template.color_begin;
        self.scale_begin[slot] = template.scale_begin;
        self.scale_end[slot] = template.scale_end;
        self.scale[slot] = template.scale_begin;
        self.life[slot] = template.total_life;
        self.total_life[slot] = template.total_life;

        self.len += 1;
        self.stats.total_spawned += 1;
        Ok(slot)
    }

    fn swap_remove(&mut self, slot: usize) {
        let last = self.len - 1;
        if slot != last {
            self.position.swap(slot, last);
            self.velocity.swap(slot, last);
            self.color_begin.swap(slot, last);
            self.color_end.swap(slot, last);
            self.color.swap(slot, last);
            self.scale_begin.swap(slot, last);
            self.scale_end.swap(slot, last);
            self.scale.swap(slot, last);
            self.life.swap(slot, last);
            self.total_life.swap(slot, last);
        }
        self.len -= 1;
    }
}

/// 剩余生命比例，出生为 1，死亡为 0；零寿命粒子直接取 0
pub fn life_fraction(life: f32, total_life: f32) -> f32 {
    if total_life > 0.0 {
        (life / total_life).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// 按生命比例在出生值与死亡值之间插值，`t = 1` 精确得到 `begin`，`t = 0` 精确得到 `end`
pub fn lerp_life<T>(begin: T, end: T, t: f32) -> T
where
    T: Copy + Mul<f32, Output = T> + Add<Output = T>,
{
    begin * t + end * (1.0 - t)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn still_config() -> EmitterConfig {
        EmitterConfig::default()
            .with_speed(Vec2::new(1.0, -2.0), None)
            .with_looping(false)
    }

    fn pool_with(capacity: usize, config: EmitterConfig) -> ParticlePool {
        let mut pool = ParticlePool::with_seed(capacity, 1);
        pool.configure(config);
        pool
    }

    #[test]
    fn test_new_pool_is_empty() {
        let pool = ParticlePool::with_seed(16, 0);
        assert_eq!(pool.capacity(), 16);
        assert_eq!(pool.len(), 0);
        assert_eq!(pool.last_active(), None);
        assert!(pool.live().is_empty());
        assert!(!pool.is_emitting());
    }

    #[test]
    fn test_spawn_writes_birth_state() {
        let mut pool = pool_with(4, still_config().with_life(2.0));
        let slot = pool.spawn().unwrap();
        assert_eq!(slot, 0);
        assert_eq!(pool.last_active(), Some(0));

        let p = pool.particle(0).unwrap();
        assert_eq!(p.velocity, Vec2::new(1.0, -2.0));
        assert_eq!(p.life, 2.0);
        assert_eq!(p.total_life, 2.0);
        assert_eq!(p.color, p.color_begin);
        assert_eq!(p.scale, p.scale_begin);
    }

    #[test]
    fn test_spawn_rejected_when_full() {
        let mut pool = pool_with(2, still_config());
        pool.spawn().unwrap();
        pool.spawn().unwrap();
        assert_eq!(pool.last_active(), Some(1));

        let err = pool.spawn().unwrap_err();
        assert_eq!(err, PoolError::CapacityExhausted { capacity: 2 });
        assert_eq!(pool.last_active(), Some(1));
    }

    #[test]
    fn test_destroy_swaps_last_into_slot() {
        // A, B, C, D 填满容量 4，销毁 B 后为 A, D, C
        let mut pool = pool_with(4, still_config());
        for x in [1.0, 2.0, 3.0, 4.0] {
            pool.set_spawn_position(Vec2::new(x, 0.0));
            pool.spawn().unwrap();
        }
        assert!(pool.is_full());
        let d_before = pool.particle(3).unwrap();

        pool.destroy(1).unwrap();

        assert_eq!(pool.last_active(), Some(2));
        let xs: Vec<f32> = pool.live().positions.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![1.0, 4.0, 3.0]);
        assert_eq!(pool.particle(1).unwrap(), d_before);
    }

    #[test]
    fn test_destroy_sole_particle() {
        let mut pool = pool_with(4, still_config());
        pool.spawn().unwrap();
        pool.destroy(0).unwrap();
        assert_eq!(pool.last_active(), None);
        assert!(pool.is_empty());
    }

    #[test]
    fn test_destroy_out_of_range() {
        let mut pool = pool_with(4, still_config());
        pool.spawn().unwrap();
        assert_eq!(
            pool.destroy(1),
            Err(PoolError::SlotOutOfRange { slot: 1, live: 1 })
        );
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_update_integrates_and_ages() {
        let mut pool = pool_with(4, still_config().with_position(Vec2::new(10.0, 10.0)).with_life(3.0));
        pool.spawn().unwrap();

        pool.update(Timestep::from_seconds(0.5));

        let p = pool.particle(0).unwrap();
        assert_eq!(p.life, 2.5);
        assert_eq!(p.position, Vec2::new(10.0, 10.0) + Vec2::new(1.0, -2.0) * 0.5);
    }

    #[test]
    fn test_color_halfway_through_life() {
        let config = still_config()
            .with_life(2.0)
            .with_colors(Vec4::new(1.0, 0.0, 0.0, 1.0), Vec4::new(0.0, 0.0, 1.0, 0.0));
        let mut pool = pool_with(4, config);
        pool.spawn().unwrap();

        pool.update(Timestep::from_seconds(1.0));

        let p = pool.particle(0).unwrap();
        assert_eq!(p.life, 1.0);
        assert_eq!(p.color, Vec4::new(0.5, 0.0, 0.5, 0.5));
    }

    #[test]
    fn test_lerp_endpoints_exact() {
        let begin = Vec4::new(0.3, 0.7, 0.1, 0.9);
        let end = Vec4::new(0.2, 0.4, 0.8, 0.0);
        assert_eq!(lerp_life(begin, end, life_fraction(2.0, 2.0)), begin);
        assert_eq!(lerp_life(begin, end, life_fraction(0.0, 2.0)), end);
    }

    #[test]
    fn test_zero_lifetime_particle() {
        let config = still_config().with_life(0.0);
        let mut pool = pool_with(4, config.clone());
        pool.spawn().unwrap();

        // 首帧：已死亡，立即回收，不发生除零
        let report = pool.update(Timestep::from_seconds(0.016));
        assert_eq!(report.destroyed, 1);
        assert!(pool.is_empty());
        assert_eq!(life_fraction(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_particle_dies_on_following_update() {
        let mut pool = pool_with(4, still_config().with_life(1.0));
        pool.spawn().unwrap();

        let report = pool.update(Timestep::from_seconds(1.0));
        assert_eq!(report.destroyed, 0);
        let p = pool.particle(0).unwrap();
        assert_eq!(p.life, 0.0);
        assert_eq!(p.color, p.color_end);
        assert_eq!(p.scale, p.scale_end);

        let report = pool.update(Timestep::from_seconds(0.1));
        assert_eq!(report.destroyed, 1);
        assert!(pool.is_empty());
    }

    #[test]
    fn test_swapped_in_particle_rechecked_same_pass() {
        // 槽位 0、2 已死，槽位 1 存活；一次 update 回收全部死亡粒子
        let mut pool = pool_with(4, still_config());
        for life in [0.0, 5.0, 0.0] {
            pool.configure(still_config().with_life(life));
            pool.spawn().unwrap();
        }

        let report = pool.update(Timestep::from_seconds(0.1));

        assert_eq!(report.destroyed, 2);
        assert_eq!(pool.len(), 1);
        let p = pool.particle(0).unwrap();
        assert_eq!(p.total_life, 5.0);
        // 存活粒子本帧被推进一次
        assert!((p.life - 4.9).abs() < 1e-6);
    }

    #[test]
    fn test_clear_then_one_shot_emit() {
        let mut pool = pool_with(8, still_config());
        pool.burst(5);
        pool.clear();
        assert!(pool.is_empty());

        pool.emit().unwrap();
        assert_eq!(pool.len(), 1);
        assert!(pool.is_emitting());

        // 单次模式不做定时生成
        let report = pool.update(Timestep::from_seconds(10.0));
        assert_eq!(report.spawned, 0);
    }

    #[test]
    fn test_one_shot_emit_when_full() {
        let mut pool = pool_with(1, still_config());
        pool.spawn().unwrap();
        assert_eq!(
            pool.emit(),
            Err(PoolError::CapacityExhausted { capacity: 1 })
        );
    }

    #[test]
    fn test_looping_emit_defers_spawn() {
        let mut pool = pool_with(8, still_config().with_looping(true));
        pool.emit().unwrap();
        assert!(pool.is_empty());
        assert_eq!(pool.mode(), EmissionMode::Looping);
    }

    #[test]
    fn test_timed_emission_cadence() {
        // 10 秒发射 100 个 => 间隔 100ms；累计 250ms 生成 2 个，余 50ms
        let config = still_config()
            .with_looping(true)
            .with_emission(100, 10.0)
            .with_life(60.0);
        let mut pool = pool_with(1000, config);
        pool.emit().unwrap();

        let mut spawned = 0;
        for _ in 0..5 {
            spawned += pool.update(Timestep::from_millis(50.0)).spawned;
        }

        assert_eq!(spawned, 2);
        assert_eq!(pool.len(), 2);
        assert!((pool.elapsed_ms - 50.0).abs() < 1e-3);
    }

    #[test]
    fn test_timed_emission_catches_up_long_frame() {
        let config = still_config()
            .with_looping(true)
            .with_emission(100, 10.0)
            .with_life(60.0);
        let mut pool = pool_with(1000, config);
        pool.emit().unwrap();

        let report = pool.update(Timestep::from_millis(250.0));
        assert_eq!(report.spawned, 2);
        assert!((pool.elapsed_ms - 50.0).abs() < 1e-3);
    }

    #[test]
    fn test_timed_emission_skips_when_full() {
        let config = still_config()
            .with_looping(true)
            .with_emission(10, 1.0)
            .with_life(60.0);
        let mut pool = pool_with(2, config);
        pool.emit().unwrap();

        let report = pool.update(Timestep::from_seconds(1.0));
        assert_eq!(report.spawned, 2);
        assert_eq!(report.skipped, 1);
        assert_eq!(pool.len(), 2);

        // 空出一个位置后下一帧立即补上
        pool.destroy(0).unwrap();
        let report = pool.update(Timestep::from_millis(1.0));
        assert_eq!(report.spawned, 1);
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_stop_halts_spawning_but_keeps_simulating() {
        let config = still_config()
            .with_looping(true)
            .with_emission(10, 1.0)
            .with_life(1.0);
        let mut pool = pool_with(64, config);
        pool.emit().unwrap();
        pool.update(Timestep::from_seconds(0.5));
        let live = pool.len();
        assert!(live > 0);

        pool.stop();
        let report = pool.update(Timestep::from_seconds(0.5));
        assert_eq!(report.spawned, 0);
        assert_eq!(pool.len(), live);

        pool.update(Timestep::from_seconds(1.0));
        pool.update(Timestep::from_seconds(0.1));
        assert!(pool.is_empty());
    }

    #[test]
    fn test_burst_clamps_to_capacity() {
        let mut pool = pool_with(10, still_config());
        pool.burst(4);
        let outcome = pool.burst(10);
        assert_eq!(outcome, SpawnOutcome { spawned: 6, rejected: 4 });
        assert!(!outcome.is_complete());
        assert_eq!(pool.len(), 10);
        assert_eq!(pool.stats().total_spawned, 10);
    }

    #[test]
    fn test_randomization_only_affects_next_spawn() {
        let config = still_config()
            .with_looping(true)
            .with_emission(1, 0.1)
            .with_life(2.0);
        let mut pool = pool_with(8, config);
        pool.spawn().unwrap();
        pool.set_random(RandomAttribute::TotalLife, true);
        pool.randomization_mut().ranges.life = super::super::random::RandomRange::new(7.0, 8.0);
        pool.emit().unwrap();

        pool.update(Timestep::from_seconds(0.1));

        assert_eq!(pool.len(), 2);
        // 已存活粒子不受影响，配置模板也不变
        assert_eq!(pool.particle(0).unwrap().total_life, 2.0);
        let fresh = pool.particle(1).unwrap().total_life;
        assert!((7.0..8.0).contains(&fresh));
        assert_eq!(pool.config().total_life, 2.0);
    }

    #[test]
    fn test_extreme_spawn_ranges_do_not_panic() {
        let config = still_config()
            .with_looping(true)
            .with_emission(1, 0.01)
            .with_speed(Vec2::ONE, Some(f32::MAX));
        let mut pool = pool_with(8, config);
        pool.set_random(RandomAttribute::Speed, true);
        pool.randomization_mut().ranges.speed_x =
            super::super::random::RandomRange::new(-3e38, 3e38);
        pool.emit().unwrap();

        pool.spawn().unwrap();
        let report = pool.update(Timestep::from_millis(50.0));

        assert!(report.spawned > 0);
        assert!(pool.len() <= pool.capacity());
    }

    #[test]
    fn test_live_view_never_exceeds_len() {
        let mut pool = pool_with(8, still_config());
        pool.burst(3);
        pool.clear();
        pool.spawn().unwrap();
        let live = pool.live();
        assert_eq!(live.len(), 1);
        assert_eq!(live.colors.len(), 1);
        assert_eq!(live.scales.len(), 1);
    }
}
