//! Windowing platform seam.

use crate::gpu::swap_chain::SurfaceSize;

/// Window and event source for the frame loop.
///
/// `destroy_window` and `terminate` are called once each, in that order,
/// during teardown.
pub trait Platform {
    /// Processes pending input without blocking.
    fn poll_events(&mut self);

    fn close_requested(&self) -> bool;

    /// Current framebuffer size in physical pixels. Zero-area while minimised.
    fn framebuffer_size(&self) -> SurfaceSize;

    fn destroy_window(&mut self);

    /// Shuts the windowing system down.
    fn terminate(&mut self);
}
