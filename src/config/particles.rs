use super::{ConfigError, ConfigResult};
use crate::render::particles::{
    EmitterConfig, PackLayout, RandomizationConfig, MAX_PARTICLE_CAPACITY,
};
use serde::{Deserialize, Serialize};

/// 粒子系统配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    /// 粒子池容量，运行期间不变
    pub capacity: usize,
    /// GPU 打包布局
    pub layout: PackLayout,
    /// 随机数种子；缺省时使用系统熵
    pub seed: Option<u64>,
    /// 发射器模板
    pub emitter: EmitterConfig,
    /// 生成属性随机化
    pub randomization: RandomizationConfig,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            capacity: 1000,
            layout: PackLayout::default(),
            seed: None,
            emitter: EmitterConfig::default(),
            randomization: RandomizationConfig::default(),
        }
    }
}

impl ParticleConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.capacity == 0 {
            return Err(ConfigError::ValidationError(
                "Particle capacity must be > 0".to_string(),
            ));
        }
        if self.capacity > MAX_PARTICLE_CAPACITY {
            return Err(ConfigError::ValidationError(format!(
                "Particle capacity must be <= {}, got {}",
                MAX_PARTICLE_CAPACITY, self.capacity
            )));
        }
        self.emitter
            .validate()
            .map_err(|e| ConfigError::ValidationError(format!("emitter: {}", e)))?;
        if let Some(name) = self.randomization.ranges.invalid_range() {
            return Err(ConfigError::ValidationError(format!(
                "Random range '{}' must be finite with min <= max",
                name
            )));
        }
        Ok(())
    }
}
