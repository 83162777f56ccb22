pub mod winit;

pub use self::winit::{InputTracker, WinitWindow};

// ============================================================================
// Platform Window Abstraction
// ============================================================================

/// 平台窗口抽象
pub trait Window {
    fn size(&self) -> (u32, u32);
    fn scale_factor(&self) -> f64;
    fn request_redraw(&self);
    fn set_title(&self, title: &str);
}

// ============================================================================
// Input Abstraction
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    // Keyboard
    KeyPressed { key: KeyCode },
    KeyReleased { key: KeyCode },

    // Mouse
    MouseMoved { x: f32, y: f32 },
    MouseButtonPressed { button: MouseButton, x: f32, y: f32 },
    MouseButtonReleased { button: MouseButton, x: f32, y: f32 },

    // Window
    WindowResized { width: u32, height: u32 },
    WindowCloseRequested,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Escape,
    Space,
    Enter,
    Backspace,
    Tab,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}
