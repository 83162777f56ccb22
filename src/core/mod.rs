//! 核心模块
//!
//! 包含引擎的核心功能：
//! - `engine` - 主入口和运行循环
//! - `app` - 与 GPU 无关的应用状态和输入处理
//! - `time` - 帧时间步长
//! - `error` - 错误类型定义

pub mod app;
pub mod engine;
pub mod error;
pub mod time;
#[macro_use]
pub mod macros;

// 重新导出错误类型
pub use error::{EngineError, EngineResult, RenderError, RenderResult};

// 重新导出主要类型
pub use app::{AppControl, ParticleApp};
pub use engine::Engine;
pub use time::{FrameClock, Timestep};
