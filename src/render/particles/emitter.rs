//! 粒子发射器配置
//!
//! `EmitterConfig` 是用户配置的生成模板，只由 UI 在帧与帧之间修改。
//! 每次生成粒子时由模板（加上随机化）得到一份 `SpawnTemplate`，
//! 模板本身不会被随机化改写。

use glam::{Vec2, Vec4};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::random::{RandomAttribute, RandomizationConfig};

/// 速度散布上限，保证采样区间 `[-s, s)` 的宽度有限
pub const MAX_SCATTER: f32 = f32::MAX / 2.0;

/// 发射模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmissionMode {
    /// 单次发射
    OneShot,
    /// 按频率持续发射
    Looping,
}

/// 粒子发射器配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitterConfig {
    /// 生成位置（屏幕坐标，像素）
    pub position: Vec2,
    /// 初始速度（像素/秒）
    pub speed: Vec2,
    /// 速度散布：`Some(s)` 时每个轴的速度乘以 U(-s, s)
    pub scatter: Option<f32>,
    /// 出生颜色
    pub color_begin: Vec4,
    /// 死亡颜色
    pub color_end: Vec4,
    /// 出生缩放
    pub scale_begin: Vec2,
    /// 死亡缩放
    pub scale_end: Vec2,
    /// 生命周期（秒）
    pub total_life: f32,
    /// 每个发射周期生成的粒子数
    pub emit_quantity: u32,
    /// 发射周期（秒）
    pub emission_frequency: f32,
    /// 是否循环
    pub looping: bool,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            position: Vec2::new(640.0, 360.0),
            speed: Vec2::new(4.0, 4.0),
            scatter: Some(10.0),
            color_begin: Vec4::new(1.0, 0.0, 0.0, 1.0),
            color_end: Vec4::new(0.0, 0.0, 1.0, 0.0),
            scale_begin: Vec2::new(2.0, 2.0),
            scale_end: Vec2::new(12.0, 12.0),
            total_life: 3.0,
            emit_quantity: 100,
            emission_frequency: 1.0,
            looping: true,
        }
    }
}

impl EmitterConfig {
    pub fn mode(&self) -> EmissionMode {
        if self.looping {
            EmissionMode::Looping
        } else {
            EmissionMode::OneShot
        }
    }

    /// 两次定时生成之间的间隔（毫秒）
    ///
    /// 发射周期或数量不为正时返回 `None`，此时不做定时生成。
    pub fn spawn_interval_ms(&self) -> Option<f64> {
        if self.emit_quantity == 0 || !(self.emission_frequency > 0.0) {
            return None;
        }
        Some(self.emission_frequency as f64 * 1000.0 / self.emit_quantity as f64)
    }

    pub fn with_position(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    pub fn with_speed(mut self, speed: Vec2, scatter: Option<f32>) -> Self {
        self.speed = speed;
        self.scatter = scatter;
        self
    }

    pub fn with_colors(mut self, begin: Vec4, end: Vec4) -> Self {
        self.color_begin = begin;
        self.color_end = end;
        self
    }

    pub fn with_scales(mut self, begin: Vec2, end: Vec2) -> Self {
        self.scale_begin = begin;
        self.scale_end = end;
        self
    }

    pub fn with_life(mut self, total_life: f32) -> Self {
        self.total_life = total_life;
        self
    }

    pub fn with_emission(mut self, emit_quantity: u32, emission_frequency: f32) -> Self {
        self.emit_quantity = emit_quantity;
        self.emission_frequency = emission_frequency;
        self
    }

    pub fn with_looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    /// 验证配置，返回第一条错误描述
    pub fn validate(&self) -> Result<(), String> {
        if !self.total_life.is_finite() || self.total_life < 0.0 {
            return Err(format!("total_life must be >= 0, got {}", self.total_life));
        }
        if self.emit_quantity == 0 {
            return Err("emit_quantity must be > 0".to_string());
        }
        if !(self.emission_frequency > 0.0) {
            return Err(format!(
                "emission_frequency must be > 0, got {}",
                self.emission_frequency
            ));
        }
        if let Some(scatter) = self.scatter {
            if !scatter.is_finite() || scatter < 0.0 {
                return Err(format!("scatter must be >= 0, got {}", scatter));
            }
            if scatter > MAX_SCATTER {
                return Err(format!("scatter must be <= {}, got {}", MAX_SCATTER, scatter));
            }
        }
        Ok(())
    }

    /// 按模板生成一份未随机化的 `SpawnTemplate`
    pub fn template(&self) -> SpawnTemplate {
        SpawnTemplate {
            position: self.position,
            speed: self.speed,
            scatter: self.scatter,
            color_begin: self.color_begin,
            color_end: self.color_end,
            scale_begin: self.scale_begin,
            scale_end: self.scale_end,
            total_life: self.total_life,
        }
    }

    /// 应用已启用的随机化，得到本次生成使用的模板
    pub fn randomized<R: Rng + ?Sized>(
        &self,
        randomization: &RandomizationConfig,
        rng: &mut R,
    ) -> SpawnTemplate {
        let mut template = self.template();
        let ranges = &randomization.ranges;
        let enabled = &randomization.enabled;

        if enabled.contains(RandomAttribute::Position) {
            template.position = Vec2::new(
                ranges.position_x.sample(rng),
                ranges.position_y.sample(rng),
            );
        }
        if enabled.contains(RandomAttribute::Speed) {
            template.speed = Vec2::new(ranges.speed_x.sample(rng), ranges.speed_y.sample(rng));
        }
        if enabled.contains(RandomAttribute::TotalLife) {
            template.total_life = ranges.life.sample(rng).max(0.0);
        }
        template
    }
}

/// 单次生成使用的有效模板
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnTemplate {
    pub position: Vec2,
    pub speed: Vec2,
    pub scatter: Option<f32>,
    pub color_begin: Vec4,
    pub color_end: Vec4,
    pub scale_begin: Vec2,
    pub scale_end: Vec2,
    pub total_life: f32,
}

impl SpawnTemplate {
    /// 计算生成速度（应用速度散布）
    pub fn velocity<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        match self.scatter {
            Some(s) if s > 0.0 => {
                // 区间宽度 2s 必须有限，否则 gen_range 会 panic
                let s = s.min(MAX_SCATTER);
                Vec2::new(
                    self.speed.x * rng.gen_range(-s..s),
                    self.speed.y * rng.gen_range(-s..s),
                )
            }
            Some(_) => Vec2::ZERO,
            None => self.speed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::particles::random::RandomRange;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_spawn_interval() {
        let config = EmitterConfig::default().with_emission(100, 10.0);
        assert_eq!(config.spawn_interval_ms(), Some(100.0));

        let config = EmitterConfig::default().with_emission(0, 10.0);
        assert_eq!(config.spawn_interval_ms(), None);

        let config = EmitterConfig::default().with_emission(10, 0.0);
        assert_eq!(config.spawn_interval_ms(), None);
    }

    #[test]
    fn test_validate() {
        assert!(EmitterConfig::default().validate().is_ok());
        assert!(EmitterConfig::default().with_life(-1.0).validate().is_err());
        assert!(EmitterConfig::default().with_emission(0, 1.0).validate().is_err());
        assert!(EmitterConfig::default().with_emission(1, 0.0).validate().is_err());
    }

    #[test]
    fn test_velocity_without_scatter_is_exact() {
        let mut rng = StdRng::seed_from_u64(1);
        let template = EmitterConfig::default()
            .with_speed(Vec2::new(3.0, -2.0), None)
            .template();
        assert_eq!(template.velocity(&mut rng), Vec2::new(3.0, -2.0));
    }

    #[test]
    fn test_velocity_scatter_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let template = EmitterConfig::default()
            .with_speed(Vec2::new(1.0, 2.0), Some(10.0))
            .template();
        for _ in 0..100 {
            let v = template.velocity(&mut rng);
            assert!(v.x >= -10.0 && v.x < 10.0);
            assert!(v.y >= -20.0 && v.y < 20.0);
        }
    }

    #[test]
    fn test_huge_scatter_rejected_and_clamped() {
        let config = EmitterConfig::default().with_speed(Vec2::ONE, Some(f32::MAX));
        assert!(config.validate().is_err());
        assert!(EmitterConfig::default()
            .with_speed(Vec2::ONE, Some(MAX_SCATTER))
            .validate()
            .is_ok());

        let mut rng = StdRng::seed_from_u64(5);
        let v = config.template().velocity(&mut rng);
        assert!(v.x.abs() <= MAX_SCATTER && v.y.abs() <= MAX_SCATTER);
    }

    #[test]
    fn test_randomized_leaves_config_untouched() {
        let mut rng = StdRng::seed_from_u64(3);
        let config = EmitterConfig::default().with_life(2.0);
        let mut randomization = RandomizationConfig::default();
        randomization.enabled.insert(RandomAttribute::TotalLife);
        randomization.ranges.life = RandomRange::new(5.0, 6.0);

        let template = config.randomized(&randomization, &mut rng);
        assert!(template.total_life >= 5.0 && template.total_life < 6.0);
        assert_eq!(config.total_life, 2.0);
        // 未启用的属性保持模板值
        assert_eq!(template.position, config.position);
        assert_eq!(template.speed, config.speed);
    }
}
