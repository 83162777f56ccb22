use egui_wgpu::{Renderer, ScreenDescriptor};
use egui_winit::State;
use winit::event::WindowEvent;
use winit::window::Window;

pub mod particle_editor;

pub use particle_editor::{EditorCommand, PanelStats, ParticleEditor, ParticlePreset};

/// 单帧 egui 输出，渲染完成后交回 `cleanup` 释放纹理
pub struct EditorOutput {
    pub primitives: Vec<egui::ClippedPrimitive>,
    pub textures_delta: egui::TexturesDelta,
    pub pixels_per_point: f32,
}

// egui-winit State 含非 Send 类型
pub struct EditorContext {
    pub context: egui::Context,
    pub state: State,
    pub renderer: Renderer,
}

impl EditorContext {
    pub fn new(window: &Window, device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        let context = egui::Context::default();
        let viewport_id = context.viewport_id();
        let state = State::new(
            context.clone(),
            viewport_id,
            &window,
            Some(window.scale_factor() as f32),
            None,
        );
        let renderer = Renderer::new(device, format, None, 1);
        Self {
            context,
            state,
            renderer,
        }
    }

    /// 返回事件是否被 egui 消费
    pub fn handle_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        let response = self.state.on_window_event(window, event);
        response.consumed
    }

    /// 指针是否悬停在 egui 区域上
    pub fn wants_pointer(&self) -> bool {
        self.context.wants_pointer_input()
    }

    pub fn begin_frame(&mut self, window: &Window) {
        let raw_input = self.state.take_egui_input(window);
        self.context.begin_frame(raw_input);
    }

    pub fn end_frame(&mut self, window: &Window) -> EditorOutput {
        let output = self.context.end_frame();
        self.state
            .handle_platform_output(window, output.platform_output);
        let primitives = self
            .context
            .tessellate(output.shapes, output.pixels_per_point);
        EditorOutput {
            primitives,
            textures_delta: output.textures_delta,
            pixels_per_point: output.pixels_per_point,
        }
    }

    /// 上传纹理与顶点数据，返回需要先于主命令提交的命令缓冲
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        output: &EditorOutput,
        screen: &ScreenDescriptor,
    ) -> Vec<wgpu::CommandBuffer> {
        for (id, delta) in &output.textures_delta.set {
            self.renderer.update_texture(device, queue, *id, delta);
        }
        self.renderer
            .update_buffers(device, queue, encoder, &output.primitives, screen)
    }

    pub fn paint<'rp>(
        &'rp self,
        rpass: &mut wgpu::RenderPass<'rp>,
        output: &'rp EditorOutput,
        screen: &ScreenDescriptor,
    ) {
        self.renderer.render(rpass, &output.primitives, screen);
    }

    pub fn cleanup(&mut self, output: &EditorOutput) {
        for id in &output.textures_delta.free {
            self.renderer.free_texture(id);
        }
    }
}
