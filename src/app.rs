//! Application Entry Point
//!
//! [`App`] wires the winit platform, the egui layer, the wgpu frame backend
//! and the optional tone device into a [`FrameLoop`] and runs it under the
//! configured [`LoopDriver`]:
//!
//! - [`LoopDriver::Pumped`]: this thread owns the loop and pumps winit once
//!   per frame.
//! - [`LoopDriver::HostDriven`]: winit's `run_app` owns the loop; each
//!   `about_to_wait` callback runs one frame.
//!
//! ```rust,ignore
//! use glint::app::App;
//! use glint::settings::AppSettings;
//!
//! fn main() -> glint::errors::Result<()> {
//!     App::new().with_settings(AppSettings::tone_demo()).run()
//! }
//! ```

use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::audio::ToneDevice;
use crate::errors::{GlintError, Result};
use crate::frame::{
    EguiLayer, FrameLoop, Platform, WgpuFrameBackend, WinitFrameLoop, WinitPlatform,
};
use crate::gpu::pump::LoopDriver;
use crate::settings::AppSettings;

/// Application builder.
pub struct App {
    settings: AppSettings,
}

impl App {
    #[must_use]
    pub fn new() -> Self {
        Self {
            settings: AppSettings::default(),
        }
    }

    #[must_use]
    pub fn with_settings(mut self, settings: AppSettings) -> Self {
        self.settings = settings;
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.settings.title = title.into();
        self
    }

    /// Runs until the window is closed.
    ///
    /// Startup failures (window, GPU, audio) are returned; nothing is
    /// retried.
    pub fn run(self) -> Result<()> {
        match self.settings.driver {
            LoopDriver::Pumped => {
                let platform = WinitPlatform::open(&self.settings)?;
                let mut frame_loop = build_frame_loop(platform, &self.settings)?;
                frame_loop.run();
                Ok(())
            }
            LoopDriver::HostDriven { .. } => {
                let event_loop = EventLoop::new()?;
                event_loop.set_control_flow(ControlFlow::Poll);

                let mut runner = HostRunner {
                    settings: self.settings,
                    frame_loop: None,
                    error: None,
                };
                event_loop.run_app(&mut runner)?;

                match runner.error.take() {
                    Some(e) => Err(e),
                    None => Ok(()),
                }
            }
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Acquires the GPU for `platform`'s window and assembles the frame loop.
pub fn build_frame_loop(platform: WinitPlatform, settings: &AppSettings) -> Result<WinitFrameLoop> {
    let window = platform
        .window()
        .cloned()
        .ok_or_else(|| GlintError::WindowCreateFailed("platform has no window".into()))?;

    log::info!("Initializing GPU backend...");
    let backend = WgpuFrameBackend::new(Arc::clone(&window), settings)?;
    let gui = EguiLayer::new(&window, settings.clear_color);
    let swap_chain = backend.swap_chain();

    let driver = settings.driver.for_target();
    let frame_loop = FrameLoop::new(platform, gui, backend, swap_chain, driver);

    if settings.enable_audio {
        let tone = ToneDevice::open(&settings.audio)?;
        return Ok(frame_loop.with_tone(Box::new(tone)));
    }
    Ok(frame_loop)
}

/// winit handler for [`LoopDriver::HostDriven`].
struct HostRunner {
    settings: AppSettings,
    frame_loop: Option<WinitFrameLoop>,
    error: Option<GlintError>,
}

impl HostRunner {
    fn start(&self, event_loop: &ActiveEventLoop) -> Result<WinitFrameLoop> {
        let attributes = Window::default_attributes()
            .with_title(&self.settings.title)
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.settings.width,
                self.settings.height,
            ));
        let window = event_loop
            .create_window(attributes)
            .map_err(|e| GlintError::WindowCreateFailed(e.to_string()))?;

        build_frame_loop(WinitPlatform::hosted(Arc::new(window)), &self.settings)
    }
}

impl ApplicationHandler for HostRunner {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.frame_loop.is_some() {
            return;
        }
        match self.start(event_loop) {
            Ok(frame_loop) => self.frame_loop = Some(frame_loop),
            Err(e) => {
                log::error!("Fatal startup error: {e}");
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let Some(frame_loop) = self.frame_loop.as_mut() {
            frame_loop.platform_mut().push_event(event);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(frame_loop) = self.frame_loop.as_mut() else {
            return;
        };
        if frame_loop.platform().close_requested() {
            frame_loop.teardown();
            event_loop.exit();
            return;
        }
        frame_loop.frame();
    }
}
