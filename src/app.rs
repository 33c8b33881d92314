use eframe::egui::{self, ColorImage, TextureHandle, TextureOptions};
use tracing::{info, warn};

use vortex_field::{
    Animator, AnimatorState, FrameHandle, FrameScheduler, ManualScheduler, PixelCanvas, Preset,
    ResizePolicy, VortexConfig,
};

/// Turns frame requests into egui repaints; `update` drains the due frames.
struct RepaintScheduler {
    ctx: egui::Context,
    frames: ManualScheduler,
}

impl RepaintScheduler {
    fn new(ctx: egui::Context) -> Self {
        Self {
            ctx,
            frames: ManualScheduler::new(),
        }
    }

    fn take_due(&mut self) -> Option<FrameHandle> {
        self.frames.take_due()
    }
}

impl FrameScheduler for RepaintScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        self.ctx.request_repaint();
        self.frames.request_frame()
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.frames.cancel_frame(handle);
    }
}

pub struct VortexApp {
    animator: Option<Animator<RepaintScheduler>>,
    canvas: PixelCanvas,
    /// Edited by the controls; applied on rebuild.
    draft: VortexConfig,
    texture: Option<TextureHandle>,
    config_error: Option<String>,
    egui_ctx: egui::Context,
}

impl VortexApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: VortexConfig) -> Self {
        let mut app = Self {
            animator: None,
            canvas: PixelCanvas::new(0, 0),
            draft: config,
            texture: None,
            config_error: None,
            egui_ctx: cc.egui_ctx.clone(),
        };
        app.rebuild();
        app
    }

    /// Replaces the animator with one built from the edited config. A
    /// rejected config keeps the current animator running.
    fn rebuild(&mut self) {
        let scheduler = RepaintScheduler::new(self.egui_ctx.clone());
        match Animator::new(self.draft.clone(), scheduler) {
            Ok(mut animator) => {
                if let Some(mut previous) = self.animator.take() {
                    previous.teardown();
                }
                animator.mount(&mut self.canvas);
                self.animator = Some(animator);
                self.config_error = None;
                info!(particles = self.draft.particle_count, "rebuilt vortex field");
            }
            Err(err) => {
                warn!("vortex config rejected: {err}");
                self.config_error = Some(err.to_string());
            }
        }
    }

    fn update_texture(&mut self, ctx: &egui::Context) {
        let [width, height] = self.canvas.dimensions();
        if width == 0 || height == 0 || self.canvas.as_rgba8().is_empty() {
            self.texture = None;
            return;
        }

        let image = ColorImage::from_rgba_unmultiplied([width, height], self.canvas.as_rgba8());
        if let Some(texture) = &mut self.texture {
            texture.set(image, TextureOptions::LINEAR);
        } else {
            self.texture = Some(ctx.load_texture("vortex-field", image, TextureOptions::LINEAR));
        }
    }

    fn draw_controls(&mut self, ui: &mut egui::Ui) {
        ui.heading("Vortex");

        ui.horizontal_wrapped(|ui| {
            for preset in Preset::ALL {
                if ui.button(preset.name()).clicked() {
                    self.draft = VortexConfig {
                        seed: self.draft.seed,
                        ..preset.config()
                    };
                    self.rebuild();
                }
            }
        });

        ui.separator();
        ui.horizontal(|ui| {
            ui.label("background");
            ui.text_edit_singleline(&mut self.draft.background_color);
        });
        ui.add(egui::Slider::new(&mut self.draft.particle_count, 0..=5000).text("particles"));
        ui.add(egui::Slider::new(&mut self.draft.particle_size, 0.0..=6.0).text("particle size"));
        ui.add(egui::Slider::new(&mut self.draft.default_speed, 0.0..=12.0).text("speed"));
        ui.add(egui::Slider::new(&mut self.draft.range_speed, 0.0..=6.0).text("speed range"));
        ui.add(egui::Slider::new(&mut self.draft.base_hue, 0.0..=360.0).text("base hue"));
        ui.add(egui::Slider::new(&mut self.draft.range_hue, 0.0..=360.0).text("hue range"));
        ui.add(egui::Slider::new(&mut self.draft.range_y, 1.0..=400.0).text("vertical range"));

        ui.horizontal(|ui| {
            ui.label("on resize");
            ui.radio_value(&mut self.draft.resize_policy, ResizePolicy::Keep, "keep");
            ui.radio_value(&mut self.draft.resize_policy, ResizePolicy::Reseed, "reseed");
        });

        ui.horizontal(|ui| {
            if let Some(animator) = &mut self.animator {
                let paused = animator.state() == AnimatorState::Paused;
                if ui
                    .button(if paused { "Resume" } else { "Pause" })
                    .clicked()
                {
                    if paused {
                        animator.start();
                    } else {
                        animator.stop();
                    }
                }
            }

            if ui.button("Rebuild field").clicked() {
                self.rebuild();
            }
        });

        if let Some(err) = &self.config_error {
            ui.separator();
            ui.colored_label(egui::Color32::from_rgb(230, 100, 100), err);
        }
    }

    fn draw_visuals(&mut self, ui: &mut egui::Ui) {
        let [canvas_w, canvas_h] = self.canvas.dimensions();
        ui.horizontal(|ui| {
            if let Some(animator) = &self.animator {
                ui.label(format!("particles: {}", animator.particles().len()));
                ui.separator();
                ui.label(format!("frame: {}", animator.time()));
                ui.separator();
                ui.label(format!("state: {:?}", animator.state()));
                ui.separator();
            }
            ui.label(format!("canvas: {canvas_w}x{canvas_h}"));
        });

        ui.separator();

        let available = ui.available_size();
        let width = available.x.max(0.0).floor() as u32;
        let height = available.y.max(0.0).floor() as u32;
        let resized = self.canvas.resize(width, height);

        let mut drew = false;
        if let Some(animator) = &mut self.animator {
            animator.resize(width, height);
            if let Some(handle) = animator.scheduler_mut().take_due() {
                drew = animator.on_frame(handle, &mut self.canvas);
            }
            if resized && !drew {
                animator.paint(&mut self.canvas);
            }
        }
        if resized || drew {
            self.update_texture(ui.ctx());
        }

        if let Some(texture) = &self.texture {
            ui.image((texture.id(), texture.size_vec2()));
        }
    }
}

impl eframe::App for VortexApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(290.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        self.draw_controls(ui);
                    });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_visuals(ui);
        });
    }
}
