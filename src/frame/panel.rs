//! The demo control panel.

use crate::settings::ClearColor;
use crate::utils::FpsCounter;

use super::gui::FrameInput;

/// What the user asked for this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PanelActions {
    pub toggle_audio: bool,
}

/// Widgets state carried across frames.
#[derive(Debug, Clone)]
pub struct ControlPanel {
    pub clear_color: ClearColor,
    show_inspector: bool,
    show_another_window: bool,
    value: f32,
    counter: u32,
}

impl ControlPanel {
    #[must_use]
    pub fn new(clear_color: ClearColor) -> Self {
        Self {
            clear_color,
            show_inspector: false,
            show_another_window: false,
            value: 0.0,
            counter: 0,
        }
    }

    pub fn show(&mut self, ctx: &egui::Context, input: &FrameInput, fps: &FpsCounter) -> PanelActions {
        let mut actions = PanelActions::default();

        egui::Window::new("Hello, world!").show(ctx, |ui| {
            ui.label("This is some useful text.");
            ui.checkbox(&mut self.show_inspector, "Inspector Window");
            ui.checkbox(&mut self.show_another_window, "Another Window");

            ui.add(egui::Slider::new(&mut self.value, 0.0..=1.0).text("float"));

            ui.horizontal(|ui| {
                let mut rgb = [self.clear_color.r, self.clear_color.g, self.clear_color.b];
                if ui.color_edit_button_rgb(&mut rgb).changed() {
                    self.clear_color = ClearColor::rgba(rgb[0], rgb[1], rgb[2], self.clear_color.a);
                }
                ui.label("clear color");
            });

            ui.horizontal(|ui| {
                if ui.button("Button").clicked() {
                    self.counter += 1;
                }
                ui.label(format!("counter = {}", self.counter));
            });

            if let Some(playing) = input.audio_playing {
                ui.horizontal(|ui| {
                    let label = if playing { "Disable Audio" } else { "Enable Audio" };
                    if ui.button(label).clicked() {
                        actions.toggle_audio = true;
                    }
                    ui.label(format!("Audio = {playing}"));
                });
            }

            ui.label(format!(
                "Average {:.3} ms/frame ({:.1} FPS)",
                fps.frame_time_ms, fps.current_fps
            ));
        });

        if self.show_another_window {
            let mut open = true;
            egui::Window::new("Another Window")
                .open(&mut open)
                .show(ctx, |ui| {
                    ui.label("Hello from another window!");
                    if ui.button("Close Me").clicked() {
                        self.show_another_window = false;
                    }
                });
            if !open {
                self.show_another_window = false;
            }
        }

        if self.show_inspector {
            egui::Window::new("Inspector")
                .open(&mut self.show_inspector)
                .vscroll(true)
                .show(ctx, |ui| ctx.inspection_ui(ui));
        }

        actions
    }
}
