//! Event pumping and loop-driver selection.
//!
//! Every asynchronous backend operation (adapter request, device request,
//! buffer map) completes from inside the backend's own event processing. The
//! code waiting on it must keep that processing going; [`EventPump`] is the
//! explicit handle for doing so, passed to [`resolve`](super::request::resolve)
//! rather than called as an ambient side effect.
//!
//! [`LoopDriver`] answers the related platform question once at startup: does
//! this code drive the frame loop, or does the host environment call back
//! into it for every frame?

/// Advances the backend's pending work by one non-blocking step.
pub trait EventPump {
    fn tick(&mut self);
}

/// Pump that does nothing; for backends whose requests resolve eagerly.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPump;

impl EventPump for NoopPump {
    fn tick(&mut self) {}
}

/// Adapts a closure into an [`EventPump`].
pub struct PumpFn<F: FnMut()>(pub F);

impl<F: FnMut()> EventPump for PumpFn<F> {
    fn tick(&mut self) {
        (self.0)();
    }
}

/// Polls a `wgpu` device without blocking, firing any ready callbacks.
pub struct DevicePump<'a> {
    device: &'a wgpu::Device,
}

impl<'a> DevicePump<'a> {
    #[must_use]
    pub fn new(device: &'a wgpu::Device) -> Self {
        Self { device }
    }
}

impl EventPump for DevicePump<'_> {
    fn tick(&mut self) {
        if let Err(e) = self.device.poll(wgpu::PollType::Poll) {
            log::warn!("Device poll failed: {e}");
        }
    }
}

/// Polls every device created from an instance. Used while the device
/// itself does not exist yet.
pub struct InstancePump<'a> {
    instance: &'a wgpu::Instance,
}

impl<'a> InstancePump<'a> {
    #[must_use]
    pub fn new(instance: &'a wgpu::Instance) -> Self {
        Self { instance }
    }
}

impl EventPump for InstancePump<'_> {
    fn tick(&mut self) {
        let _queues_empty = self.instance.poll_all(false);
    }
}

/// Who drives the per-frame loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopDriver {
    /// This code runs the loop and pumps platform events once per frame.
    Pumped,
    /// The windowing host owns the loop and calls back once per frame.
    HostDriven {
        /// The host presents the surface itself after each callback
        /// (browser canvases); explicit presentation must be skipped.
        host_presents: bool,
    },
}

impl LoopDriver {
    /// Picks the driver the current compilation target requires.
    ///
    /// Browsers own the event loop, so `wasm32` is always host-driven;
    /// everything else pumps its own events.
    #[must_use]
    pub const fn detect() -> Self {
        if cfg!(target_arch = "wasm32") {
            Self::HostDriven {
                host_presents: true,
            }
        } else {
            Self::Pumped
        }
    }

    /// Returns `true` when this code is responsible for presenting frames.
    #[inline]
    #[must_use]
    pub const fn presents_frames(self) -> bool {
        !matches!(
            self,
            Self::HostDriven {
                host_presents: true
            }
        )
    }

    /// Drops what the current target cannot honour. Off `wasm32` there is no
    /// host to present the surface, so `host_presents` is cleared.
    #[must_use]
    pub const fn for_target(self) -> Self {
        match self {
            Self::HostDriven {
                host_presents: true,
            } if !cfg!(target_arch = "wasm32") => Self::HostDriven {
                host_presents: false,
            },
            other => other,
        }
    }
}

impl Default for LoopDriver {
    fn default() -> Self {
        Self::detect()
    }
}
