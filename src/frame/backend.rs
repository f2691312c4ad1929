//! Per-frame GPU submission seam.

use crate::gpu::swap_chain::SwapChainTarget;
use crate::settings::ClearColor;

use super::gui::GuiDeviceObjects;

/// Result of asking the surface for the next frame.
#[derive(Debug)]
pub enum FrameAcquire<F> {
    Ready(F),
    /// Usable this frame, but the swap chain no longer matches the surface
    /// and is rebuilt before the next one.
    Stale(F),
    /// Nothing to draw into this frame (timeout, occluded window, transient error).
    Skip,
    /// The swap chain is stale and must be rebuilt before the next frame.
    Reconfigure,
}

/// Owns the surface and the GUI renderer.
pub trait FrameBackend: SwapChainTarget + GuiDeviceObjects {
    type Frame;
    type DrawData;

    fn acquire_frame(&mut self) -> FrameAcquire<Self::Frame>;

    /// Records one render pass into `frame` (clear to `clear`, then the GUI
    /// draw data), finishes the encoder and submits it.
    fn submit_frame(&mut self, frame: &Self::Frame, clear: ClearColor, draw_data: &Self::DrawData);

    fn present(&mut self, frame: Self::Frame);

    /// Shuts the GUI renderer down. First step of teardown.
    fn shutdown_gui(&mut self);
}
