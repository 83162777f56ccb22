//! 帧时间步长
//!
//! 每帧的时间增量统一用 `Timestep` 表示，内部以秒存储。

use std::time::Duration;

/// 单帧时间步长（秒）
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Timestep(f32);

impl Timestep {
    pub const ZERO: Self = Self(0.0);

    /// 从秒创建，负值与 NaN 截断为 0
    pub fn from_seconds(seconds: f32) -> Self {
        if seconds.is_nan() || seconds < 0.0 {
            Self(0.0)
        } else {
            Self(seconds)
        }
    }

    pub fn from_millis(millis: f32) -> Self {
        Self::from_seconds(millis / 1000.0)
    }

    pub fn seconds(self) -> f32 {
        self.0
    }

    pub fn millis(self) -> f32 {
        self.0 * 1000.0
    }
}

impl From<Duration> for Timestep {
    fn from(duration: Duration) -> Self {
        Self::from_seconds(duration.as_secs_f32())
    }
}

impl From<f32> for Timestep {
    fn from(seconds: f32) -> Self {
        Self::from_seconds(seconds)
    }
}

/// 帧计时器，记录上一帧时刻并产出时间步长
#[derive(Debug)]
pub struct FrameClock {
    last: std::time::Instant,
    last_step: Timestep,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last: std::time::Instant::now(),
            last_step: Timestep::ZERO,
        }
    }

    /// 推进一帧，返回距上次调用的时间步长
    pub fn tick(&mut self) -> Timestep {
        let now = std::time::Instant::now();
        self.last_step = Timestep::from(now.duration_since(self.last));
        self.last = now;
        self.last_step
    }

    pub fn last_step(&self) -> Timestep {
        self.last_step
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
