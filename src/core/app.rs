//! 应用状态
//!
//! 与 GPU 无关的部分：粒子系统、面板、视口和输入处理。
//! 事件循环只负责把窗口事件和 GPU 资源接到这里。

use glam::Vec2;

use crate::config::{AppConfig, WindowConfig};
use crate::core::error::{EngineResult, RenderResult};
use crate::core::time::Timestep;
use crate::editor::{EditorCommand, PanelStats, ParticleEditor};
use crate::platform::{InputEvent, KeyCode, MouseButton};
use crate::render::particles::{FrameReport, ParticleSink, ParticleSystem};
use crate::render::viewport::Viewport;

/// 输入处理后事件循环应采取的动作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppControl {
    Continue,
    Exit,
}

pub struct ParticleApp {
    system: ParticleSystem,
    editor: ParticleEditor,
    viewport: Viewport,
    window: WindowConfig,
    last_step: Timestep,
}

impl ParticleApp {
    /// 按配置创建并开始发射
    pub fn new(config: &AppConfig, viewport: Viewport) -> EngineResult<Self> {
        config.validate()?;

        let particles = &config.particles;
        let mut system = ParticleSystem::with_capacity(
            particles.capacity,
            particles.layout,
            particles.seed,
            particles.emitter.clone(),
        );
        *system.pool_mut().randomization_mut() = particles.randomization.clone();
        system.pool_mut().emit()?;

        tracing::info!(
            target: "engine",
            capacity = particles.capacity,
            layout = particles.layout.name(),
            mode = ?system.pool().mode(),
            "Particle system ready"
        );

        let editor = ParticleEditor::new(&system);
        Ok(Self {
            system,
            editor,
            viewport,
            window: config.window.clone(),
            last_step: Timestep::ZERO,
        })
    }

    pub fn system(&self) -> &ParticleSystem {
        &self.system
    }

    pub fn system_mut(&mut self) -> &mut ParticleSystem {
        &mut self.system
    }

    pub fn editor_mut(&mut self) -> &mut ParticleEditor {
        &mut self.editor
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// 处理一个输入事件；`ui_wants_pointer` 为真时点击交给面板
    pub fn handle_input(&mut self, event: &InputEvent, ui_wants_pointer: bool) -> AppControl {
        match event {
            InputEvent::WindowCloseRequested
            | InputEvent::KeyPressed {
                key: KeyCode::Escape,
            } => {
                tracing::info!(target: "engine", "Exit requested");
                AppControl::Exit
            }
            InputEvent::WindowResized { width, height } => {
                self.viewport = Viewport::new(*width, *height);
                AppControl::Continue
            }
            InputEvent::MouseButtonPressed {
                button: MouseButton::Left,
                x,
                y,
            } if !ui_wants_pointer => {
                let position = Vec2::new(*x, *y);
                self.system.pool_mut().set_spawn_position(position);
                self.editor.sync(&self.system);
                tracing::debug!(target: "engine", x, y, "Spawn position moved");
                AppControl::Continue
            }
            _ => AppControl::Continue,
        }
    }

    /// 应用面板命令；失败记录后继续
    pub fn apply_commands(&mut self, commands: Vec<EditorCommand>) {
        for command in commands {
            tracing::debug!(target: "editor", ?command, "Applying editor command");
            if let Err(e) = command.apply(&mut self.system) {
                tracing::warn!(target: "editor", error = %e, "Editor command failed");
            }
        }
    }

    /// 绘制面板并应用产生的命令
    pub fn run_ui(&mut self, ctx: &egui::Context) {
        let stats = PanelStats::from_system(&self.system, self.last_step.millis());
        let commands = self.editor.show(ctx, stats);
        self.apply_commands(commands);
    }

    /// 推进一帧并上传到 `sink`
    pub fn frame<S: ParticleSink + ?Sized>(
        &mut self,
        ts: Timestep,
        sink: &mut S,
    ) -> RenderResult<FrameReport> {
        self.last_step = ts;
        self.system.frame(ts, sink)
    }

    /// 当前窗口标题
    pub fn title(&self) -> String {
        self.window.frame_title(self.last_step.millis())
    }
}
