use std::sync::Arc;

use glam::Vec2;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::EventLoop;
use winit::keyboard::PhysicalKey;
use winit::window::{Window as WinitWindowRaw, WindowBuilder};

use super::{InputEvent, KeyCode, MouseButton};
use crate::config::WindowConfig;
use crate::core::error::{EngineError, EngineResult};

#[derive(Clone)]
pub struct WinitWindow {
    window: Arc<WinitWindowRaw>,
}

impl WinitWindow {
    pub fn new(event_loop: &EventLoop<()>, config: &WindowConfig) -> EngineResult<Self> {
        let window = WindowBuilder::new()
            .with_title(config.title.as_str())
            .with_inner_size(PhysicalSize::new(config.width, config.height))
            .build(event_loop)
            .map_err(|e| EngineError::Window(e.to_string()))?;
        Ok(Self {
            window: Arc::new(window),
        })
    }

    pub fn raw(&self) -> &WinitWindowRaw {
        &self.window
    }

    /// 共享句柄，供 wgpu 表面持有
    pub fn shared(&self) -> Arc<WinitWindowRaw> {
        Arc::clone(&self.window)
    }
}

impl crate::platform::Window for WinitWindow {
    fn size(&self) -> (u32, u32) {
        let s = self.window.inner_size();
        (s.width, s.height)
    }
    fn scale_factor(&self) -> f64 {
        self.window.scale_factor()
    }
    fn request_redraw(&self) {
        self.window.request_redraw();
    }
    fn set_title(&self, title: &str) {
        self.window.set_title(title);
    }
}

impl From<winit::keyboard::KeyCode> for KeyCode {
    fn from(key: winit::keyboard::KeyCode) -> Self {
        use winit::keyboard::KeyCode as K;
        match key {
            K::Escape => KeyCode::Escape,
            K::Space => KeyCode::Space,
            K::Enter | K::NumpadEnter => KeyCode::Enter,
            K::Backspace => KeyCode::Backspace,
            K::Tab => KeyCode::Tab,
            _ => KeyCode::Unknown,
        }
    }
}

impl From<winit::event::MouseButton> for MouseButton {
    fn from(button: winit::event::MouseButton) -> Self {
        match button {
            winit::event::MouseButton::Left => MouseButton::Left,
            winit::event::MouseButton::Right => MouseButton::Right,
            winit::event::MouseButton::Middle => MouseButton::Middle,
            winit::event::MouseButton::Back => MouseButton::Other(3),
            winit::event::MouseButton::Forward => MouseButton::Other(4),
            winit::event::MouseButton::Other(n) => MouseButton::Other(n),
        }
    }
}

/// 跟踪光标位置，把 winit 窗口事件翻译为 [`InputEvent`]
#[derive(Debug, Clone, Copy, Default)]
pub struct InputTracker {
    cursor: Vec2,
}

impl InputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// 最近一次光标位置（物理像素）
    pub fn cursor(&self) -> Vec2 {
        self.cursor
    }

    pub fn translate(&mut self, event: &WindowEvent) -> Option<InputEvent> {
        match event {
            WindowEvent::CloseRequested => Some(InputEvent::WindowCloseRequested),
            WindowEvent::Resized(size) => Some(InputEvent::WindowResized {
                width: size.width,
                height: size.height,
            }),
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Vec2::new(position.x as f32, position.y as f32);
                Some(InputEvent::MouseMoved {
                    x: self.cursor.x,
                    y: self.cursor.y,
                })
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let button = MouseButton::from(*button);
                let (x, y) = (self.cursor.x, self.cursor.y);
                Some(match state {
                    ElementState::Pressed => InputEvent::MouseButtonPressed { button, x, y },
                    ElementState::Released => InputEvent::MouseButtonReleased { button, x, y },
                })
            }
            WindowEvent::KeyboardInput { event, .. } => {
                let key = match event.physical_key {
                    PhysicalKey::Code(code) => KeyCode::from(code),
                    PhysicalKey::Unidentified(_) => KeyCode::Unknown,
                };
                Some(match event.state {
                    ElementState::Pressed => InputEvent::KeyPressed { key },
                    ElementState::Released => InputEvent::KeyReleased { key },
                })
            }
            _ => None,
        }
    }
}
