//! 引擎主入口
//!
//! 定义Engine结构和主运行循环

use std::fs::OpenOptions;
use std::sync::Mutex;

use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};

use crate::config::{AppConfig, LoggingConfig};
use crate::editor::{EditorContext, EditorOutput};
use crate::platform::winit::{InputTracker, WinitWindow};
use crate::platform::{InputEvent, Window};
use crate::render::particles::ParticleRenderer;
use crate::render::GpuContext;

use super::app::{AppControl, ParticleApp};
use super::error::{EngineError, EngineResult, RenderResult};
use super::time::{FrameClock, Timestep};

const CLEAR_COLOR: wgpu::Color = wgpu::Color::BLACK;

/// 粒子演示主结构
///
/// `Engine` 负责：
/// - 初始化日志、窗口、wgpu 设备和 egui
/// - 驱动事件循环：输入 → 面板 → 模拟/打包/上传 → 绘制
///
/// # 示例
///
/// ```no_run
/// use particle_fx::config::AppConfig;
/// use particle_fx::core::Engine;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     Engine::run(AppConfig::load_or_default())?;
///     Ok(())
/// }
/// ```
pub struct Engine;

impl Engine {
    /// 运行主循环，窗口关闭后返回
    pub fn run(config: AppConfig) -> EngineResult<()> {
        Self::initialize_logging(&config.logging);
        config.validate()?;

        let event_loop = EventLoop::new()
            .map_err(|e| EngineError::EventLoop(format!("Failed to create event loop: {}", e)))?;
        let window = WinitWindow::new(&event_loop, &config.window)?;

        let mut gpu = pollster::block_on(GpuContext::new(window.shared(), config.window.vsync))?;
        let mut app = ParticleApp::new(&config, gpu.viewport())?;
        let mut renderer = ParticleRenderer::new(
            gpu.device(),
            gpu.format(),
            app.system().layout(),
            app.system().pool().capacity(),
            &app.viewport(),
        )?;
        let mut editor = EditorContext::new(window.raw(), gpu.device(), gpu.format());
        let mut input = InputTracker::new();
        let mut clock = FrameClock::new();

        tracing::info!(
            target: "engine",
            width = config.window.width,
            height = config.window.height,
            vsync = config.window.vsync,
            "Window created"
        );

        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop
            .run(move |event, elwt| match event {
                Event::WindowEvent { event, .. } => {
                    if let WindowEvent::RedrawRequested = event {
                        let step = clock.tick();
                        if let Err(e) = Self::render_frame(
                            &window,
                            &mut gpu,
                            &mut renderer,
                            &mut editor,
                            &mut app,
                            step,
                        ) {
                            tracing::error!(target: "render", error = %e, "Frame failed");
                            elwt.exit();
                        }
                        window.set_title(&app.title());
                        return;
                    }

                    let consumed = editor.handle_event(window.raw(), &event);
                    let Some(input_event) = input.translate(&event) else {
                        return;
                    };
                    // 面板获得键盘焦点时不处理快捷键
                    if consumed && matches!(input_event, InputEvent::KeyPressed { .. }) {
                        return;
                    }
                    if let WindowEvent::Resized(size) = event {
                        gpu.resize(size.width, size.height);
                    }
                    let ui_wants_pointer = consumed || editor.wants_pointer();
                    if app.handle_input(&input_event, ui_wants_pointer) == AppControl::Exit {
                        elwt.exit();
                    }
                }
                Event::AboutToWait => window.request_redraw(),
                Event::LoopExiting => {
                    tracing::info!(target: "engine", "Engine shutting down");
                }
                _ => {}
            })
            .map_err(|e| EngineError::EventLoop(e.to_string()))
    }

    /// 初始化日志系统
    ///
    /// `RUST_LOG` 存在时优先，否则使用配置中的级别。
    fn initialize_logging(config: &LoggingConfig) {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config.level.as_directive()));

        let file = if config.log_to_file {
            match OpenOptions::new()
                .create(true)
                .append(true)
                .open(&config.log_file_path)
            {
                Ok(file) => Some(file),
                Err(e) => {
                    // 订阅者尚未安装，只能输出到 stderr
                    eprintln!("Failed to open log file {}: {}", config.log_file_path, e);
                    None
                }
            }
        } else {
            None
        };

        let _ = match file {
            Some(file) => tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init(),
            None => tracing_subscriber::fmt().with_env_filter(filter).try_init(),
        };
        tracing::info!(target: "engine", "Engine starting");
    }

    /// 单帧：面板 → 模拟/上传 → 清屏、粒子、面板绘制 → 呈现
    fn render_frame(
        window: &WinitWindow,
        gpu: &mut GpuContext,
        renderer: &mut ParticleRenderer,
        editor: &mut EditorContext,
        app: &mut ParticleApp,
        step: Timestep,
    ) -> RenderResult<()> {
        editor.begin_frame(window.raw());
        app.run_ui(&editor.context);
        let ui: EditorOutput = editor.end_frame(window.raw());

        app.frame(step, &mut renderer.uploader(gpu.queue()))?;
        renderer.update_camera(gpu.queue(), &app.viewport());

        let Some(frame) = gpu.acquire()? else {
            editor.cleanup(&ui);
            return Ok(());
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let viewport = gpu.viewport();
        let screen = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [viewport.width, viewport.height],
            pixels_per_point: ui.pixels_per_point,
        };

        let mut encoder = gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });
        let ui_commands = editor.prepare(gpu.device(), gpu.queue(), &mut encoder, &ui, &screen);

        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            renderer.draw(&mut rpass);
            editor.paint(&mut rpass, &ui, &screen);
        }

        gpu.queue()
            .submit(ui_commands.into_iter().chain(std::iter::once(encoder.finish())));
        frame.present();
        editor.cleanup(&ui);
        Ok(())
    }
}
