//! egui implementation of [`GuiLayer`].
//!
//! Per frame: forward the window events collected by the platform into
//! `egui-winit`, run one egui pass over the [`ControlPanel`], hand platform
//! output (cursor, clipboard, IME) back to winit, and tessellate the shapes
//! into [`EguiDrawData`] for the frame backend.

use crate::settings::ClearColor;
use crate::utils::FpsCounter;

use super::gui::{FrameInput, GuiFrame, GuiLayer};
use super::panel::ControlPanel;
use super::winit_platform::WinitPlatform;

/// Tessellated egui output for one frame.
pub struct EguiDrawData {
    pub primitives: Vec<egui::ClippedPrimitive>,
    pub textures_delta: egui::TexturesDelta,
    pub screen: egui_wgpu::ScreenDescriptor,
}

impl EguiDrawData {
    fn empty() -> Self {
        Self {
            primitives: Vec::new(),
            textures_delta: egui::TexturesDelta::default(),
            screen: egui_wgpu::ScreenDescriptor {
                size_in_pixels: [0, 0],
                pixels_per_point: 1.0,
            },
        }
    }
}

pub struct EguiLayer {
    /// Shared egui context (reference-counted internally).
    ctx: egui::Context,
    /// Bridges winit events into egui raw input. `None` once destroyed.
    state: Option<egui_winit::State>,
    panel: ControlPanel,
    fps: FpsCounter,
}

impl EguiLayer {
    #[must_use]
    pub fn new(window: &winit::window::Window, clear_color: ClearColor) -> Self {
        let ctx = egui::Context::default();
        let id = ctx.viewport_id();
        let state = egui_winit::State::new(ctx.clone(), id, window, None, None, None);

        Self {
            ctx,
            state: Some(state),
            panel: ControlPanel::new(clear_color),
            fps: FpsCounter::new(),
        }
    }

    #[must_use]
    pub fn context(&self) -> &egui::Context {
        &self.ctx
    }

    #[must_use]
    pub fn panel(&self) -> &ControlPanel {
        &self.panel
    }
}

impl GuiLayer<WinitPlatform> for EguiLayer {
    type DrawData = EguiDrawData;

    fn build_frame(
        &mut self,
        platform: &mut WinitPlatform,
        input: &FrameInput,
    ) -> GuiFrame<EguiDrawData> {
        let idle = GuiFrame {
            draw_data: EguiDrawData::empty(),
            clear_color: self.panel.clear_color,
            toggle_audio: false,
        };
        let Some(window) = platform.window().cloned() else {
            return idle;
        };
        let Some(state) = self.state.as_mut() else {
            return idle;
        };

        for event in platform.drain_events() {
            let _response = state.on_window_event(&window, &event);
        }

        self.fps.update();

        let raw_input = state.take_egui_input(&window);
        self.ctx.begin_pass(raw_input);
        let actions = self.panel.show(&self.ctx, input, &self.fps);
        let egui::FullOutput {
            shapes,
            textures_delta,
            platform_output,
            ..
        } = self.ctx.end_pass();

        state.handle_platform_output(&window, platform_output);

        let pixels_per_point = self.ctx.pixels_per_point();
        let primitives = self.ctx.tessellate(shapes, pixels_per_point);
        let size = window.inner_size();

        GuiFrame {
            draw_data: EguiDrawData {
                primitives,
                textures_delta,
                screen: egui_wgpu::ScreenDescriptor {
                    size_in_pixels: [size.width, size.height],
                    pixels_per_point,
                },
            },
            clear_color: self.panel.clear_color,
            toggle_audio: actions.toggle_audio,
        }
    }

    fn destroy_context(&mut self) {
        if self.state.take().is_some() {
            log::info!("GUI context destroyed");
        }
    }
}
