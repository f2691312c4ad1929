//! Swap Chain State Machine
//!
//! A window has at most one live swap chain. [`SwapChain`] tracks whether it
//! is configured and at what size, and on every frame compares that against
//! the framebuffer size the platform reports. When they differ it tears the
//! old chain down and builds a new one through a [`SwapChainTarget`], wrapping
//! the rebuild with the GUI renderer's device-object invalidation and
//! re-creation so the GUI never draws into a released target.
//!
//! ```text
//!  Unconfigured ──ensure(size)──▶ Configured(size)
//!                                   │      ▲
//!                                   └──────┘ ensure(size') with size' != size
//! ```

use crate::frame::gui::GuiDeviceObjects;

/// Framebuffer size in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// A minimised window reports a zero-area framebuffer.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl From<(u32, u32)> for SurfaceSize {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

impl From<winit::dpi::PhysicalSize<u32>> for SurfaceSize {
    fn from(size: winit::dpi::PhysicalSize<u32>) -> Self {
        Self::new(size.width, size.height)
    }
}

/// Presentation mode, fixed for the lifetime of the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PresentMode {
    /// Vsync-locked queue of frames. Always supported.
    #[default]
    Fifo,
    Mailbox,
    Immediate,
    AutoVsync,
}

impl PresentMode {
    #[must_use]
    pub const fn to_wgpu(self) -> wgpu::PresentMode {
        match self {
            Self::Fifo => wgpu::PresentMode::Fifo,
            Self::Mailbox => wgpu::PresentMode::Mailbox,
            Self::Immediate => wgpu::PresentMode::Immediate,
            Self::AutoVsync => wgpu::PresentMode::AutoVsync,
        }
    }
}

/// Parameters a swap chain is (re)built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapChainConfig {
    pub size: SurfaceSize,
    pub format: wgpu::TextureFormat,
    pub present_mode: PresentMode,
}

/// Something that owns presentable framebuffers for a window.
pub trait SwapChainTarget {
    fn create_swap_chain(&mut self, config: &SwapChainConfig);
    fn release_swap_chain(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Unconfigured,
    Configured(SwapChainConfig),
}

/// Configuration state of a window's swap chain.
#[derive(Debug, Clone)]
pub struct SwapChain {
    format: wgpu::TextureFormat,
    present_mode: PresentMode,
    state: State,
    reconfigurations: u32,
    needs_rebuild: bool,
}

impl SwapChain {
    #[must_use]
    pub fn new(format: wgpu::TextureFormat, present_mode: PresentMode) -> Self {
        Self {
            format,
            present_mode,
            state: State::Unconfigured,
            reconfigurations: 0,
            needs_rebuild: false,
        }
    }

    /// Brings the swap chain in line with `size`.
    ///
    /// Returns `true` when the chain was (re)built. A zero-area size leaves the
    /// current state untouched.
    pub fn ensure<T>(&mut self, size: SurfaceSize, target: &mut T) -> bool
    where
        T: SwapChainTarget + GuiDeviceObjects + ?Sized,
    {
        if size.is_empty() {
            return false;
        }

        let previous = match self.state {
            State::Configured(config) if config.size == size && !self.needs_rebuild => {
                return false;
            }
            State::Configured(config) => Some(config),
            State::Unconfigured => None,
        };

        let config = SwapChainConfig {
            size,
            format: self.format,
            present_mode: self.present_mode,
        };

        target.invalidate_device_objects();
        if previous.is_some() {
            target.release_swap_chain();
        }
        target.create_swap_chain(&config);
        target.create_device_objects(&config);

        match previous {
            Some(old) => {
                self.reconfigurations += 1;
                log::info!(
                    "Swap chain reconfigured: {}x{} -> {}x{}",
                    old.size.width,
                    old.size.height,
                    size.width,
                    size.height
                );
            }
            None => log::info!(
                "Swap chain created: {}x{} {:?} {:?}",
                size.width,
                size.height,
                self.format,
                self.present_mode
            ),
        }

        self.state = State::Configured(config);
        self.needs_rebuild = false;
        true
    }

    /// Forces the next [`ensure`](Self::ensure) to rebuild even if the size
    /// is unchanged.
    pub fn mark_lost(&mut self) {
        self.needs_rebuild = true;
    }

    #[must_use]
    pub fn config(&self) -> Option<&SwapChainConfig> {
        match &self.state {
            State::Configured(config) => Some(config),
            State::Unconfigured => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_configured(&self) -> bool {
        matches!(self.state, State::Configured(_))
    }

    /// Number of `Configured -> Configured` transitions so far.
    #[inline]
    #[must_use]
    pub fn reconfigurations(&self) -> u32 {
        self.reconfigurations
    }

    #[inline]
    #[must_use]
    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }
}

/// Picks the surface format: the first one the surface reports, else `fallback`.
#[must_use]
pub fn choose_format(
    supported: &[wgpu::TextureFormat],
    fallback: wgpu::TextureFormat,
) -> wgpu::TextureFormat {
    supported.first().copied().unwrap_or(fallback)
}
