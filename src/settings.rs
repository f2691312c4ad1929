//! Application Settings
//!
//! [`AppSettings`] collects everything that differs between the demo
//! variants: window title and size, the default clear colour, whether the
//! audio tone is available, and the GPU / swap-chain choices made once at
//! startup.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use glint::settings::{AppSettings, ClearColor};
//!
//! let settings = AppSettings::tone_demo()
//!     .with_title("Tone")
//!     .with_clear_color(ClearColor::rgb(0.1, 0.1, 0.12));
//! ```

use crate::audio::AudioSettings;
use crate::gpu::pump::LoopDriver;
use crate::gpu::swap_chain::PresentMode;

// ---------------------------------------------------------------------------
// ClearColor
// ---------------------------------------------------------------------------

/// Straight-alpha RGBA colour used to clear the frame before the GUI is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClearColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl ClearColor {
    #[must_use]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    #[must_use]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    #[must_use]
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Converts to a premultiplied `wgpu::Color` for the render pass load op.
    #[must_use]
    pub fn to_wgpu(self) -> wgpu::Color {
        let a = f64::from(self.a);
        wgpu::Color {
            r: f64::from(self.r) * a,
            g: f64::from(self.g) * a,
            b: f64::from(self.b) * a,
            a,
        }
    }
}

impl Default for ClearColor {
    fn default() -> Self {
        Self::rgb(0.45, 0.55, 0.60)
    }
}

// ---------------------------------------------------------------------------
// GpuSettings
// ---------------------------------------------------------------------------

/// Adapter and device request parameters.
#[derive(Debug, Clone)]
pub struct GpuSettings {
    /// GPU adapter selection preference.
    pub power_preference: wgpu::PowerPreference,
    /// Force the software fallback adapter.
    pub force_fallback_adapter: bool,
    /// Features the device must support.
    pub required_features: wgpu::Features,
    /// Limits the device must support.
    pub required_limits: wgpu::Limits,
}

impl Default for GpuSettings {
    fn default() -> Self {
        Self {
            power_preference: wgpu::PowerPreference::HighPerformance,
            force_fallback_adapter: false,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// AppSettings
// ---------------------------------------------------------------------------

/// Configuration for an interactive window session.
///
/// | Field             | Description                                | Default                       |
/// |-------------------|--------------------------------------------|-------------------------------|
/// | `title`           | Window title                               | "Glint"                       |
/// | `width`/`height`  | Initial window size (logical pixels)       | 1280 × 720                    |
/// | `clear_color`     | Initial frame clear colour                 | (0.45, 0.55, 0.60, 1.0)       |
/// | `enable_audio`    | Open the tone device and show its toggle   | `false`                       |
/// | `present_mode`    | Swap-chain present mode                    | `Fifo`                        |
/// | `fallback_format` | Used when the surface reports no formats   | `Bgra8Unorm`                  |
/// | `driver`          | Who drives the frame loop                  | [`LoopDriver::detect`]        |
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub clear_color: ClearColor,
    pub enable_audio: bool,
    pub audio: AudioSettings,
    pub present_mode: PresentMode,
    pub fallback_format: wgpu::TextureFormat,
    pub driver: LoopDriver,
    pub gpu: GpuSettings,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            title: "Glint".into(),
            width: 1280,
            height: 720,
            clear_color: ClearColor::default(),
            enable_audio: false,
            audio: AudioSettings::default(),
            present_mode: PresentMode::Fifo,
            fallback_format: wgpu::TextureFormat::Bgra8Unorm,
            driver: LoopDriver::detect(),
            gpu: GpuSettings::default(),
        }
    }
}

impl AppSettings {
    /// GUI-only window.
    #[must_use]
    pub fn gui_demo() -> Self {
        Self::default().with_title("egui + wgpu + winit")
    }

    /// GUI window with the audio tone toggle.
    #[must_use]
    pub fn tone_demo() -> Self {
        Self::default()
            .with_title("egui + wgpu + winit + cpal")
            .with_audio(true)
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    #[must_use]
    pub fn with_clear_color(mut self, color: ClearColor) -> Self {
        self.clear_color = color;
        self
    }

    #[must_use]
    pub fn with_audio(mut self, enabled: bool) -> Self {
        self.enable_audio = enabled;
        self
    }

    #[must_use]
    pub fn with_present_mode(mut self, mode: PresentMode) -> Self {
        self.present_mode = mode;
        self
    }

    /// Selects who drives the frame loop.
    ///
    /// `HostDriven { host_presents: true }` only exists on `wasm32`, where
    /// the browser presents the canvas. Elsewhere it is downgraded to
    /// `host_presents: false` so frames still reach the screen.
    #[must_use]
    pub fn with_driver(mut self, driver: LoopDriver) -> Self {
        let resolved = driver.for_target();
        if resolved != driver {
            log::warn!("{driver:?} is unavailable on this target, using {resolved:?}");
        }
        self.driver = resolved;
        self
    }

    #[must_use]
    pub fn with_gpu(mut self, gpu: GpuSettings) -> Self {
        self.gpu = gpu;
        self
    }
}
