//! Interactive frame loop.
//!
//! The loop itself ([`FrameLoop`]) is written against four seams
//! ([`Platform`], [`GuiLayer`], [`FrameBackend`], and the
//! [`ToneControl`](crate::audio::ToneControl) it forwards audio toggles to).
//! The winit / egui / wgpu implementations live alongside.

pub mod backend;
pub mod egui_layer;
pub mod gui;
pub mod lifecycle;
pub mod panel;
pub mod platform;
pub mod wgpu_backend;
pub mod winit_platform;

pub use backend::{FrameAcquire, FrameBackend};
pub use egui_layer::{EguiDrawData, EguiLayer};
pub use gui::{FrameInput, GuiDeviceObjects, GuiFrame, GuiLayer};
pub use lifecycle::FrameLoop;
pub use panel::{ControlPanel, PanelActions};
pub use platform::Platform;
pub use wgpu_backend::{SurfaceFrame, WgpuFrameBackend};
pub use winit_platform::WinitPlatform;

/// The concrete loop used by the demo binaries.
pub type WinitFrameLoop = FrameLoop<WinitPlatform, EguiLayer, WgpuFrameBackend>;
