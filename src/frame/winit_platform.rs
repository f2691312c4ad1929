//! winit implementation of [`Platform`].
//!
//! In pumped mode the platform owns the `EventLoop` and advances it once per
//! frame with `pump_app_events`, so the frame loop stays in control of the
//! thread. In hosted mode (`winit` `run_app`) the host owns the event loop
//! and forwards window events through [`WinitPlatform::push_event`].

use std::sync::Arc;
use std::time::Duration;

use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowId};

use crate::errors::{GlintError, Result};
use crate::gpu::swap_chain::SurfaceSize;
use crate::settings::AppSettings;

use super::platform::Platform;

/// Pump attempts allowed for the platform to deliver the initial window.
const STARTUP_PUMPS: u32 = 100;

/// Window state shared between the winit callbacks and the frame loop.
#[derive(Default)]
struct WindowState {
    title: String,
    width: u32,
    height: u32,
    window: Option<Arc<Window>>,
    events: Vec<WindowEvent>,
    close_requested: bool,
    create_error: Option<String>,
}

impl WindowState {
    fn record(&mut self, event: WindowEvent) {
        if matches!(event, WindowEvent::CloseRequested) {
            self.close_requested = true;
        }
        self.events.push(event);
    }
}

impl ApplicationHandler for WindowState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = Window::default_attributes()
            .with_title(&self.title)
            .with_inner_size(winit::dpi::LogicalSize::new(self.width, self.height));

        match event_loop.create_window(attributes) {
            Ok(window) => self.window = Some(Arc::new(window)),
            Err(e) => {
                self.create_error = Some(e.to_string());
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        self.record(event);
    }
}

pub struct WinitPlatform {
    event_loop: Option<EventLoop<()>>,
    state: WindowState,
}

impl WinitPlatform {
    /// Creates the event loop and pumps it until the window exists.
    pub fn open(settings: &AppSettings) -> Result<Self> {
        let mut event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut state = WindowState {
            title: settings.title.clone(),
            width: settings.width,
            height: settings.height,
            ..WindowState::default()
        };

        for _ in 0..STARTUP_PUMPS {
            if state.window.is_some() {
                break;
            }
            if let PumpStatus::Exit(code) =
                event_loop.pump_app_events(Some(Duration::from_millis(10)), &mut state)
            {
                let reason = state
                    .create_error
                    .take()
                    .unwrap_or_else(|| format!("event loop exited with code {code}"));
                return Err(GlintError::WindowCreateFailed(reason));
            }
        }

        if state.window.is_none() {
            return Err(GlintError::WindowCreateFailed(
                "platform never resumed the application".into(),
            ));
        }

        log::info!("Window created: {} ({}x{})", settings.title, settings.width, settings.height);

        Ok(Self {
            event_loop: Some(event_loop),
            state,
        })
    }

    /// Wraps a window whose event loop is owned by the host.
    #[must_use]
    pub fn hosted(window: Arc<Window>) -> Self {
        Self {
            event_loop: None,
            state: WindowState {
                window: Some(window),
                ..WindowState::default()
            },
        }
    }

    #[must_use]
    pub fn window(&self) -> Option<&Arc<Window>> {
        self.state.window.as_ref()
    }

    /// Feeds a host-delivered event into the platform.
    pub fn push_event(&mut self, event: WindowEvent) {
        self.state.record(event);
    }

    /// Takes the events received since the last call.
    pub fn drain_events(&mut self) -> Vec<WindowEvent> {
        std::mem::take(&mut self.state.events)
    }
}

impl Platform for WinitPlatform {
    fn poll_events(&mut self) {
        let Some(event_loop) = self.event_loop.as_mut() else {
            return;
        };
        if let PumpStatus::Exit(_) = event_loop.pump_app_events(Some(Duration::ZERO), &mut self.state)
        {
            self.state.close_requested = true;
        }
    }

    fn close_requested(&self) -> bool {
        self.state.close_requested
    }

    fn framebuffer_size(&self) -> SurfaceSize {
        self.state
            .window
            .as_ref()
            .map(|w| SurfaceSize::from(w.inner_size()))
            .unwrap_or_default()
    }

    fn destroy_window(&mut self) {
        self.state.events.clear();
        if self.state.window.take().is_some() {
            log::info!("Window destroyed");
        }
    }

    fn terminate(&mut self) {
        if self.event_loop.take().is_some() {
            log::info!("Event loop terminated");
        }
    }
}
