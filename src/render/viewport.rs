//! 视口与相机矩阵
//!
//! 视口尺寸由窗口层显式传入，渲染与模拟都不读取全局窗口状态。

use glam::{Mat4, Vec2};

/// 视口尺寸（物理像素）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    pub fn center(&self) -> Vec2 {
        self.size() * 0.5
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// 屏幕坐标正交投影：原点在左上角，y 轴向下
    pub fn projection(&self) -> Mat4 {
        let size = self.size().max(Vec2::ONE);
        Mat4::orthographic_rh(0.0, size.x, size.y, 0.0, -1.0, 1.0)
    }

    pub fn view(&self) -> Mat4 {
        Mat4::IDENTITY
    }
}
