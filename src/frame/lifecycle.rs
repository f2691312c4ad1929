//! Frame Loop
//!
//! [`FrameLoop`] owns the platform, the GUI layer and the GPU frame backend
//! and drives them through one frame at a time:
//!
//! | Step | Call                                 |
//! |------|--------------------------------------|
//! | 1    | `platform.poll_events()`             |
//! | 2    | swap-chain resize check              |
//! | 3    | `gui.build_frame(..)`                |
//! | 4    | `backend.acquire_frame()`            |
//! | 5-6  | `backend.submit_frame(..)`           |
//! | 7    | `backend.present(..)` (if we present)|
//!
//! Teardown releases everything in reverse order of acquisition. It runs at
//! most once, either explicitly or from `Drop`.

use crate::audio::ToneControl;
use crate::gpu::pump::LoopDriver;
use crate::gpu::swap_chain::SwapChain;

use super::backend::{FrameAcquire, FrameBackend};
use super::gui::{FrameInput, GuiFrame, GuiLayer};
use super::platform::Platform;

pub struct FrameLoop<P, G, B>
where
    P: Platform,
    G: GuiLayer<P>,
    B: FrameBackend<DrawData = G::DrawData>,
{
    platform: P,
    gui: G,
    backend: B,
    swap_chain: SwapChain,
    driver: LoopDriver,
    tone: Option<Box<dyn ToneControl>>,
    frame_count: u64,
    torn_down: bool,
}

impl<P, G, B> FrameLoop<P, G, B>
where
    P: Platform,
    G: GuiLayer<P>,
    B: FrameBackend<DrawData = G::DrawData>,
{
    /// Takes ownership of the collaborators and configures the initial swap
    /// chain at the platform's current framebuffer size.
    pub fn new(
        platform: P,
        gui: G,
        mut backend: B,
        mut swap_chain: SwapChain,
        driver: LoopDriver,
    ) -> Self {
        swap_chain.ensure(platform.framebuffer_size(), &mut backend);
        Self {
            platform,
            gui,
            backend,
            swap_chain,
            driver,
            tone: None,
            frame_count: 0,
            torn_down: false,
        }
    }

    #[must_use]
    pub fn with_tone(mut self, tone: Box<dyn ToneControl>) -> Self {
        self.tone = Some(tone);
        self
    }

    /// Runs one frame.
    pub fn frame(&mut self) {
        if self.torn_down {
            return;
        }

        self.platform.poll_events();

        let size = self.platform.framebuffer_size();
        self.swap_chain.ensure(size, &mut self.backend);

        let input = FrameInput {
            audio_playing: self.tone.as_ref().map(|tone| tone.is_playing()),
        };
        let gui_frame = self.gui.build_frame(&mut self.platform, &input);

        if gui_frame.toggle_audio
            && let Some(tone) = self.tone.as_mut()
            && let Err(e) = tone.toggle()
        {
            log::error!("Failed to toggle audio: {e}");
        }

        // Minimised: nothing to draw into.
        if size.is_empty() || !self.swap_chain.is_configured() {
            return;
        }

        match self.backend.acquire_frame() {
            FrameAcquire::Ready(frame) => self.draw(frame, &gui_frame),
            FrameAcquire::Stale(frame) => {
                self.draw(frame, &gui_frame);
                self.swap_chain.mark_lost();
            }
            FrameAcquire::Skip => {}
            FrameAcquire::Reconfigure => self.swap_chain.mark_lost(),
        }
    }

    fn draw(&mut self, frame: B::Frame, gui_frame: &GuiFrame<G::DrawData>) {
        self.backend
            .submit_frame(&frame, gui_frame.clear_color, &gui_frame.draw_data);
        if self.driver.presents_frames() {
            self.backend.present(frame);
        }
        self.frame_count += 1;
    }

    /// Runs frames until the platform reports a close request, then tears
    /// down.
    pub fn run(&mut self) {
        log::info!("Entering frame loop ({:?})", self.driver);
        while !self.platform.close_requested() {
            self.frame();
        }
        log::info!("Frame loop finished after {} frames", self.frame_count);
        self.teardown();
    }

    /// Releases GUI renderer, GUI context, window and platform, in that order.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;

        if let Some(mut tone) = self.tone.take()
            && tone.is_playing()
            && let Err(e) = tone.set_playing(false)
        {
            log::warn!("Failed to stop audio: {e}");
        }

        self.backend.shutdown_gui();
        self.gui.destroy_context();
        self.platform.destroy_window();
        self.platform.terminate();
    }

    #[inline]
    #[must_use]
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    #[inline]
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    #[must_use]
    pub fn swap_chain(&self) -> &SwapChain {
        &self.swap_chain
    }

    #[must_use]
    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[must_use]
    pub fn gui(&self) -> &G {
        &self.gui
    }

    #[must_use]
    pub fn tone(&self) -> Option<&dyn ToneControl> {
        self.tone.as_deref()
    }
}

impl<P, G, B> Drop for FrameLoop<P, G, B>
where
    P: Platform,
    G: GuiLayer<P>,
    B: FrameBackend<DrawData = G::DrawData>,
{
    fn drop(&mut self) {
        self.teardown();
    }
}
