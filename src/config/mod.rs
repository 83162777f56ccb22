/// 应用配置
///
/// 提供TOML/JSON配置文件与环境变量覆盖
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub mod particles;
pub mod window;

pub use particles::ParticleConfig;
pub use window::WindowConfig;

use crate::impl_default;

/// 配置文件搜索时使用的目录名
const APP_DIR: &str = "particle_fx";

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 文件读取错误
    #[error("Config file error: {0}")]
    FileError(#[from] std::io::Error),
    /// 解析错误
    #[error("Config parse error: {0}")]
    ParseError(String),
    /// 验证错误
    #[error("Config validation error: {0}")]
    ValidationError(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// 应用主配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// 窗口配置
    #[serde(default)]
    pub window: WindowConfig,

    /// 粒子配置
    #[serde(default)]
    pub particles: ParticleConfig,

    /// 日志配置
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// 从TOML文件加载配置
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(ConfigError::FileError)?;
        Self::from_toml_str(&content)
    }

    /// 从TOML字符串解析配置
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// 从JSON文件加载配置
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(ConfigError::FileError)?;
        Self::from_json_str(&content)
    }

    /// 从JSON字符串解析配置
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        serde_json::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// 按扩展名加载，`.json` 以外一律按 TOML 解析
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_file(path),
            _ => Self::from_toml_file(path),
        }
    }

    /// 保存为TOML文件
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        fs::write(path, content).map_err(ConfigError::FileError)
    }

    /// 保存为JSON文件
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        fs::write(path, content).map_err(ConfigError::FileError)
    }

    /// 从环境变量覆盖配置
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    /// 以给定查找函数覆盖配置；无法解析的值记录警告后忽略
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        override_value(&lookup, "PARTICLE_FX_WIDTH", &mut self.window.width);
        override_value(&lookup, "PARTICLE_FX_HEIGHT", &mut self.window.height);
        override_value(&lookup, "PARTICLE_FX_VSYNC", &mut self.window.vsync);
        override_value(&lookup, "PARTICLE_FX_CAPACITY", &mut self.particles.capacity);
        override_value(&lookup, "PARTICLE_FX_LAYOUT", &mut self.particles.layout);

        if let Some(raw) = lookup("PARTICLE_FX_SEED") {
            match raw.parse::<u64>() {
                Ok(seed) => self.particles.seed = Some(seed),
                Err(_) => tracing::warn!(
                    target: "config",
                    key = "PARTICLE_FX_SEED",
                    value = %raw,
                    "Ignoring unparsable override"
                ),
            }
        }
    }

    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        self.window.validate()?;
        self.particles.validate()?;
        Ok(())
    }

    /// 自动查找并加载配置文件
    ///
    /// 按以下顺序查找：
    /// 1. ./particle_fx.toml
    /// 2. ./particle_fx.json
    /// 3. <用户配置目录>/particle_fx/config.toml
    /// 4. 使用默认配置
    ///
    /// 解析失败的文件记录警告后跳过；最后应用环境变量覆盖。
    pub fn load_or_default() -> Self {
        let mut config = Self::search_paths()
            .into_iter()
            .find_map(|path| {
                if !path.exists() {
                    return None;
                }
                match Self::from_file(&path) {
                    Ok(config) => {
                        tracing::info!(target: "config", path = %path.display(), "Loaded config");
                        Some(config)
                    }
                    Err(e) => {
                        tracing::warn!(
                            target: "config",
                            path = %path.display(),
                            error = %e,
                            "Skipping unreadable config"
                        );
                        None
                    }
                }
            })
            .unwrap_or_else(|| {
                tracing::info!(target: "config", "Using default configuration");
                Self::default()
            });
        config.apply_env_overrides();
        config
    }

    fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(format!("{}.toml", APP_DIR)),
            PathBuf::from(format!("{}.json", APP_DIR)),
        ];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join(APP_DIR).join("config.toml"));
        }
        paths
    }
}

fn override_value<T, F>(lookup: &F, key: &str, target: &mut T)
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return;
    };
    match raw.trim().parse() {
        Ok(value) => *target = value,
        Err(_) => tracing::warn!(
            target: "config",
            key,
            value = %raw,
            "Ignoring unparsable override"
        ),
    }
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别，`RUST_LOG` 存在时以其为准
    pub level: LogLevel,

    /// 是否输出到文件
    pub log_to_file: bool,

    /// 日志文件路径
    pub log_file_path: String,
}

impl_default!(LoggingConfig {
    level: LogLevel::Info,
    log_to_file: false,
    log_file_path: "particle_fx.log".to_string(),
});

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    /// 跟踪
    Trace,
    /// 调试
    Debug,
    /// 信息
    Info,
    /// 警告
    Warn,
    /// 错误
    Error,
}

impl LogLevel {
    /// `EnvFilter` 指令
    pub fn as_directive(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::particles::{PackLayout, RandomRange, MAX_PARTICLE_CAPACITY};
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.window.width, 1280);
        assert_eq!(config.window.height, 720);
        assert!(!config.window.vsync);
        assert_eq!(config.particles.capacity, 1000);
    }

    #[test]
    fn test_toml_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_json_serialization() {
        let config = AppConfig::default();
        let json_str = serde_json::to_string(&config).unwrap();
        let parsed = AppConfig::from_json_str(&json_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed = AppConfig::from_toml_str(
            r#"
            [window]
            width = 800

            [particles]
            capacity = 64
            layout = "quads"

            [particles.randomization]
            enabled = ["Speed"]
            "#,
        )
        .unwrap();
        assert_eq!(parsed.window.width, 800);
        assert_eq!(parsed.window.height, 720);
        assert_eq!(parsed.particles.capacity, 64);
        assert_eq!(parsed.particles.layout, PackLayout::Quads);
        assert!(parsed
            .particles
            .randomization
            .enabled
            .contains(crate::render::particles::RandomAttribute::Speed));
    }

    #[test]
    fn test_parse_error() {
        let err = AppConfig::from_toml_str("[window\nwidth = ").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("PARTICLE_FX_WIDTH", "640"),
            ("PARTICLE_FX_VSYNC", "true"),
            ("PARTICLE_FX_CAPACITY", "not-a-number"),
            ("PARTICLE_FX_LAYOUT", "quads"),
            ("PARTICLE_FX_SEED", "99"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.window.width, 640);
        assert!(config.window.vsync);
        assert_eq!(config.particles.capacity, 1000);
        assert_eq!(config.particles.layout, PackLayout::Quads);
        assert_eq!(config.particles.seed, Some(99));
    }

    #[test]
    fn test_validation_failures() {
        let mut config = AppConfig::default();
        config.window.height = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.particles.capacity = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.particles.capacity = MAX_PARTICLE_CAPACITY + 1;
        assert!(config.validate().is_err());
        config.particles.capacity = MAX_PARTICLE_CAPACITY;
        assert!(config.validate().is_ok());

        let mut config = AppConfig::default();
        config.particles.emitter.scatter = Some(f32::MAX);
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.particles.randomization.ranges.speed_x = RandomRange::new(-3e38, 3e38);
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.particles.emitter.emission_frequency = 0.0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.particles.emitter.emit_quantity = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.particles.emitter.total_life = -1.0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.particles.randomization.ranges.life = RandomRange::new(5.0, 1.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_file_round_trip() {
        let path = std::env::temp_dir().join(format!(
            "particle_fx_config_test_{}.json",
            std::process::id()
        ));
        let mut config = AppConfig::default();
        config.particles.seed = Some(5);
        config.save_json(&path).unwrap();
        let loaded = AppConfig::from_file(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_log_level_directive() {
        assert_eq!(LogLevel::Debug.as_directive(), "debug");
        assert_eq!(LoggingConfig::default().level, LogLevel::Info);
    }
}
