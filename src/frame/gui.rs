//! Immediate-mode GUI seams.

use crate::gpu::swap_chain::SwapChainConfig;
use crate::settings::ClearColor;

use super::platform::Platform;

/// GPU objects of the GUI renderer that depend on the swap chain.
///
/// Invalidated before the swap chain is released and recreated after the
/// new one exists.
pub trait GuiDeviceObjects {
    fn invalidate_device_objects(&mut self);
    fn create_device_objects(&mut self, config: &SwapChainConfig);
}

/// State fed into the GUI each frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameInput {
    /// `None` when no tone device is attached.
    pub audio_playing: Option<bool>,
}

/// One frame of GUI output.
#[derive(Debug, Clone)]
pub struct GuiFrame<D> {
    pub draw_data: D,
    pub clear_color: ClearColor,
    /// The user asked to flip the audio tone this frame.
    pub toggle_audio: bool,
}

/// Builds one frame of GUI draw data per call.
pub trait GuiLayer<P: Platform> {
    type DrawData;

    fn build_frame(&mut self, platform: &mut P, input: &FrameInput) -> GuiFrame<Self::DrawData>;

    /// Destroys the GUI context. Called once, after the GUI renderer has
    /// been shut down.
    fn destroy_context(&mut self);
}
