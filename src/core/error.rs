//! 统一错误处理模块
//!
//! ## 错误类型分层
//!
//! - **粒子池错误** (`render::particles::PoolError`): 容量耗尽、槽位越界
//! - **渲染错误** (`RenderError`): 适配器、设备、表面、GPU 缓冲区
//! - **配置错误** (`config::ConfigError`): 文件读取、解析、验证
//!
//! `EngineError` 汇总以上各层错误，供入口函数统一处理。

use thiserror::Error;

use crate::config::ConfigError;
use crate::render::particles::PoolError;

/// 引擎核心错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Particle pool error: {0}")]
    Pool(#[from] PoolError),

    #[error("Window creation failed: {0}")]
    Window(String),

    #[error("Event loop error: {0}")]
    EventLoop(String),
}

/// 渲染系统错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("Failed to create surface: {0}")]
    SurfaceCreation(String),

    #[error("Failed to request adapter: no compatible GPU found")]
    NoAdapter,

    #[error("Failed to request device: {0}")]
    DeviceRequest(String),

    #[error("Surface error: {0}")]
    Surface(String),

    #[error("GPU buffer overflow: {needed} bytes needed, {available} available")]
    BufferOverflow { needed: u64, available: u64 },

    #[error("Packed layout {got:?} does not match renderer layout {expected:?}")]
    LayoutMismatch {
        expected: crate::render::particles::PackLayout,
        got: crate::render::particles::PackLayout,
    },
}

/// 引擎结果类型别名
pub type EngineResult<T> = Result<T, EngineError>;
pub type RenderResult<T> = Result<T, RenderError>;
