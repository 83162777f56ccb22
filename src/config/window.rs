use super::{ConfigError, ConfigResult};
use crate::impl_default;
use serde::{Deserialize, Serialize};

/// 窗口配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// 宽度（像素）
    pub width: u32,
    /// 高度（像素）
    pub height: u32,
    /// 标题前缀，运行时后接帧耗时
    pub title: String,
    /// 垂直同步
    pub vsync: bool,
}

impl_default!(WindowConfig {
    width: 1280,
    height: 720,
    title: "Particle system".to_string(),
    vsync: false,
});

impl WindowConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::ValidationError(format!(
                "Invalid window size {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }

    /// 带帧耗时的窗口标题
    pub fn frame_title(&self, frame_ms: f32) -> String {
        format!("{} | {:.3} ms", self.title, frame_ms)
    }
}
