use glam::{Vec2, Vec4};
use serde::{Deserialize, Serialize};

use crate::render::particles::{
    EmitterConfig, ParticleSystem, PoolResult, RandomAttribute, RandomAttributes, RandomRange,
    RandomRanges,
};

/// 发射器预设
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticlePreset {
    Fire,
    Smoke,
    Sparks,
    Fountain,
    Snow,
}

impl ParticlePreset {
    pub const ALL: [ParticlePreset; 5] = [
        ParticlePreset::Fire,
        ParticlePreset::Smoke,
        ParticlePreset::Sparks,
        ParticlePreset::Fountain,
        ParticlePreset::Snow,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ParticlePreset::Fire => "Fire",
            ParticlePreset::Smoke => "Smoke",
            ParticlePreset::Sparks => "Sparks",
            ParticlePreset::Fountain => "Fountain",
            ParticlePreset::Snow => "Snow",
        }
    }

    /// 在 `position` 处生成预设配置
    pub fn to_config(&self, position: Vec2) -> EmitterConfig {
        let base = EmitterConfig::default()
            .with_position(position)
            .with_looping(true);
        match self {
            ParticlePreset::Fire => base
                .with_speed(Vec2::new(3.0, 6.0), Some(8.0))
                .with_colors(Vec4::new(1.0, 0.5, 0.0, 1.0), Vec4::new(1.0, 0.0, 0.0, 0.0))
                .with_scales(Vec2::splat(6.0), Vec2::splat(1.0))
                .with_life(1.5)
                .with_emission(200, 1.0),
            ParticlePreset::Smoke => base
                .with_speed(Vec2::new(2.0, 2.0), Some(6.0))
                .with_colors(Vec4::new(0.5, 0.5, 0.5, 0.6), Vec4::new(0.2, 0.2, 0.2, 0.0))
                .with_scales(Vec2::splat(4.0), Vec2::splat(24.0))
                .with_life(4.0)
                .with_emission(60, 1.0),
            ParticlePreset::Sparks => base
                .with_speed(Vec2::new(20.0, 20.0), Some(10.0))
                .with_colors(Vec4::new(1.0, 0.9, 0.4, 1.0), Vec4::new(1.0, 0.3, 0.0, 0.0))
                .with_scales(Vec2::splat(2.0), Vec2::splat(0.5))
                .with_life(0.6)
                .with_emission(400, 0.5),
            ParticlePreset::Fountain => base
                .with_speed(Vec2::new(6.0, 12.0), Some(5.0))
                .with_colors(Vec4::new(0.3, 0.6, 1.0, 1.0), Vec4::new(0.1, 0.2, 1.0, 0.0))
                .with_scales(Vec2::splat(3.0), Vec2::splat(6.0))
                .with_life(2.5)
                .with_emission(150, 1.0),
            ParticlePreset::Snow => base
                .with_speed(Vec2::new(1.0, 1.0), Some(3.0))
                .with_colors(Vec4::ONE, Vec4::new(1.0, 1.0, 1.0, 0.0))
                .with_scales(Vec2::splat(3.0), Vec2::splat(3.0))
                .with_life(6.0)
                .with_emission(40, 1.0),
        }
    }
}

/// 面板对粒子系统的操作
#[derive(Debug, Clone, PartialEq)]
pub enum EditorCommand {
    Configure(EmitterConfig),
    Emit,
    Stop,
    Burst(usize),
    Clear,
    SetRandom(RandomAttribute, bool),
    SetRanges(RandomRanges),
    ApplyPreset(ParticlePreset),
    SetSpawnPosition(Vec2),
}

impl EditorCommand {
    pub fn apply(self, system: &mut ParticleSystem) -> PoolResult<()> {
        let pool = system.pool_mut();
        match self {
            EditorCommand::Configure(config) => pool.configure(config),
            EditorCommand::Emit => pool.emit()?,
            EditorCommand::Stop => pool.stop(),
            EditorCommand::Burst(count) => {
                pool.burst(count);
            }
            EditorCommand::Clear => pool.clear(),
            EditorCommand::SetRandom(attribute, enabled) => pool.set_random(attribute, enabled),
            EditorCommand::SetRanges(ranges) => pool.randomization_mut().ranges = ranges,
            EditorCommand::ApplyPreset(preset) => {
                let position = pool.config().position;
                pool.configure(preset.to_config(position));
            }
            EditorCommand::SetSpawnPosition(position) => pool.set_spawn_position(position),
        }
        Ok(())
    }
}

/// 面板显示的运行状态
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PanelStats {
    pub live: usize,
    pub capacity: usize,
    pub emitting: bool,
    pub frame_ms: f32,
}

impl PanelStats {
    pub fn from_system(system: &ParticleSystem, frame_ms: f32) -> Self {
        let pool = system.pool();
        Self {
            live: pool.len(),
            capacity: pool.capacity(),
            emitting: pool.is_emitting(),
            frame_ms,
        }
    }
}

/// 粒子发射器面板
///
/// 面板编辑一份草稿，变化时产生 [`EditorCommand`]，由调用方应用到粒子系统。
pub struct ParticleEditor {
    draft: EmitterConfig,
    random: RandomAttributes,
    ranges: RandomRanges,
    burst_count: usize,
    pending: Vec<EditorCommand>,
    /// 面板是否展开
    pub open: bool,
}

impl ParticleEditor {
    pub fn new(system: &ParticleSystem) -> Self {
        let pool = system.pool();
        Self {
            draft: pool.config().clone(),
            random: pool.randomization().enabled,
            ranges: pool.randomization().ranges.clone(),
            burst_count: 100,
            pending: Vec::new(),
            open: true,
        }
    }

    pub fn draft(&self) -> &EmitterConfig {
        &self.draft
    }

    /// 从粒子系统同步草稿（例如点击重新定位了生成点）
    pub fn sync(&mut self, system: &ParticleSystem) {
        self.draft = system.pool().config().clone();
    }

    /// 加载预设
    pub fn load_preset(&mut self, preset: ParticlePreset) {
        self.draft = preset.to_config(self.draft.position);
        self.pending.push(EditorCommand::ApplyPreset(preset));
    }

    pub fn take_commands(&mut self) -> Vec<EditorCommand> {
        std::mem::take(&mut self.pending)
    }

    /// 绘制面板窗口并返回本帧产生的命令
    pub fn show(&mut self, ctx: &egui::Context, stats: PanelStats) -> Vec<EditorCommand> {
        let mut open = self.open;
        egui::Window::new("Particle Emitter")
            .open(&mut open)
            .default_width(320.0)
            .show(ctx, |ui| self.render(ui, stats));
        self.open = open;
        self.take_commands()
    }

    /// 渲染面板内容
    pub fn render(&mut self, ui: &mut egui::Ui, stats: PanelStats) {
        ui.label(format!(
            "Particles: {} / {} | {:.3} ms",
            stats.live, stats.capacity, stats.frame_ms
        ));
        ui.separator();

        // 预设选择
        ui.horizontal_wrapped(|ui| {
            ui.label("Presets:");
            for preset in ParticlePreset::ALL {
                if ui.button(preset.name()).clicked() {
                    self.load_preset(preset);
                }
            }
        });

        ui.separator();

        let mut changed = false;

        ui.collapsing("Emitter", |ui| {
            ui.horizontal(|ui| {
                ui.label("Position:");
                changed |= ui
                    .add(egui::DragValue::new(&mut self.draft.position.x).prefix("X: "))
                    .changed();
                changed |= ui
                    .add(egui::DragValue::new(&mut self.draft.position.y).prefix("Y: "))
                    .changed();
            });

            ui.horizontal(|ui| {
                ui.label("Speed:");
                changed |= ui
                    .add(egui::DragValue::new(&mut self.draft.speed.x).prefix("X: ").speed(0.1))
                    .changed();
                changed |= ui
                    .add(egui::DragValue::new(&mut self.draft.speed.y).prefix("Y: ").speed(0.1))
                    .changed();
            });

            ui.horizontal(|ui| {
                let mut scatter_on = self.draft.scatter.is_some();
                if ui.checkbox(&mut scatter_on, "Scatter").changed() {
                    self.draft.scatter = scatter_on.then_some(10.0);
                    changed = true;
                }
                if let Some(scatter) = self.draft.scatter.as_mut() {
                    changed |= ui.add(egui::Slider::new(scatter, 0.0..=50.0)).changed();
                }
            });

            ui.horizontal(|ui| {
                ui.label("Emit quantity:");
                changed |= ui
                    .add(egui::Slider::new(&mut self.draft.emit_quantity, 1..=2000))
                    .changed();
            });

            ui.horizontal(|ui| {
                ui.label("Emission frequency (s):");
                changed |= ui
                    .add(egui::Slider::new(&mut self.draft.emission_frequency, 0.05..=10.0))
                    .changed();
            });

            changed |= ui.checkbox(&mut self.draft.looping, "Looping").changed();
        });

        ui.collapsing("Lifetime", |ui| {
            ui.horizontal(|ui| {
                ui.label("Total life (s):");
                changed |= ui
                    .add(egui::Slider::new(&mut self.draft.total_life, 0.0..=20.0))
                    .changed();
            });
        });

        ui.collapsing("Color", |ui| {
            ui.horizontal(|ui| {
                ui.label("Begin:");
                changed |= color_edit(ui, &mut self.draft.color_begin);
            });
            ui.horizontal(|ui| {
                ui.label("End:");
                changed |= color_edit(ui, &mut self.draft.color_end);
            });
        });

        ui.collapsing("Scale", |ui| {
            ui.horizontal(|ui| {
                ui.label("Begin:");
                changed |= vec2_drag(ui, &mut self.draft.scale_begin);
            });
            ui.horizontal(|ui| {
                ui.label("End:");
                changed |= vec2_drag(ui, &mut self.draft.scale_end);
            });
        });

        if changed {
            self.pending
                .push(EditorCommand::Configure(self.draft.clone()));
        }

        ui.collapsing("Randomization", |ui| {
            for attribute in RandomAttribute::ALL {
                let mut enabled = self.random.contains(attribute);
                if ui.checkbox(&mut enabled, attribute.name()).changed() {
                    self.random.set(attribute, enabled);
                    self.pending
                        .push(EditorCommand::SetRandom(attribute, enabled));
                }
            }

            let mut ranges_changed = false;
            ranges_changed |= range_edit(ui, "Position X", &mut self.ranges.position_x);
            ranges_changed |= range_edit(ui, "Position Y", &mut self.ranges.position_y);
            ranges_changed |= range_edit(ui, "Speed X", &mut self.ranges.speed_x);
            ranges_changed |= range_edit(ui, "Speed Y", &mut self.ranges.speed_y);
            ranges_changed |= range_edit(ui, "Life", &mut self.ranges.life);
            if ranges_changed {
                self.pending
                    .push(EditorCommand::SetRanges(self.ranges.clone()));
            }
        });

        ui.separator();

        // 播放控制
        ui.horizontal(|ui| {
            let label = if stats.emitting { "Stop" } else { "Emit" };
            if ui.button(label).clicked() {
                self.pending.push(if stats.emitting {
                    EditorCommand::Stop
                } else {
                    EditorCommand::Emit
                });
            }
            if ui.button("Clear").clicked() {
                self.pending.push(EditorCommand::Clear);
            }
        });

        ui.horizontal(|ui| {
            ui.add(egui::DragValue::new(&mut self.burst_count).range(1..=100_000));
            if ui.button("Burst").clicked() {
                self.pending.push(EditorCommand::Burst(self.burst_count));
            }
        });
    }
}

/// 随机区间编辑上限
const RANGE_LIMIT: f32 = 1.0e6;

fn color_edit(ui: &mut egui::Ui, color: &mut Vec4) -> bool {
    let mut rgba = color.to_array();
    let changed = ui.color_edit_button_rgba_unmultiplied(&mut rgba).changed();
    if changed {
        *color = Vec4::from_array(rgba);
    }
    changed
}

fn vec2_drag(ui: &mut egui::Ui, value: &mut Vec2) -> bool {
    let x = ui.add(egui::DragValue::new(&mut value.x).prefix("X: ").speed(0.1));
    let y = ui.add(egui::DragValue::new(&mut value.y).prefix("Y: ").speed(0.1));
    x.changed() || y.changed()
}

fn range_edit(ui: &mut egui::Ui, label: &str, range: &mut RandomRange) -> bool {
    ui.horizontal(|ui| {
        ui.label(label);
        let min = ui.add(
            egui::DragValue::new(&mut range.min)
                .prefix("min: ")
                .speed(0.1)
                .range(-RANGE_LIMIT..=RANGE_LIMIT),
        );
        let max = ui.add(
            egui::DragValue::new(&mut range.max)
                .prefix("max: ")
                .speed(0.1)
                .range(-RANGE_LIMIT..=RANGE_LIMIT),
        );
        if range.max < range.min {
            range.max = range.min;
        }
        min.changed() || max.changed()
    })
    .inner
}
