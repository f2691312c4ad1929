//! Asynchronous request resolution.
//!
//! Backends report completion of adapter, device and map requests from
//! inside a callback. Instead of letting each call site hand-roll an output
//! slot and a spin loop, a request is modelled as a [`Request<T>`] that is
//! `Pending`, `Ready` or `Failed`, living in a shared [`RequestSlot`]. The
//! callback receives a [`Completer`] that fills the slot exactly once; the
//! caller drives the backend with an explicit [`EventPump`] until the slot
//! leaves `Pending`.
//!
//! ```rust,ignore
//! let slot = RequestSlot::new();
//! let done = slot.completer();
//! buffer.slice(..).map_async(wgpu::MapMode::Read, move |r| done.complete(MapStatus::from(r)));
//! let status = resolve(&slot, &mut DevicePump::new(&device))?;
//! ```
//!
//! There is no cancellation: once issued, a request runs to completion.

use std::future::Future;
use std::pin::pin;
use std::sync::Arc;

use futures::FutureExt;
use parking_lot::Mutex;

use super::pump::EventPump;

/// State of an in-flight asynchronous request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request<T> {
    Pending,
    Ready(T),
    Failed(String),
}

impl<T> Request<T> {
    #[inline]
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

/// Caller-owned output slot for one request.
pub struct RequestSlot<T> {
    state: Arc<Mutex<Request<T>>>,
}

impl<T> RequestSlot<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(Request::Pending)),
        }
    }

    /// Returns the write half handed to the backend callback.
    #[must_use]
    pub fn completer(&self) -> Completer<T> {
        Completer {
            state: Some(Arc::clone(&self.state)),
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.state.lock().is_pending()
    }

    /// Takes the resolved state out of the slot, leaving it `Pending`.
    pub fn take(&self) -> Request<T> {
        std::mem::replace(&mut *self.state.lock(), Request::Pending)
    }
}

impl<T> Default for RequestSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Write half of a [`RequestSlot`]. Consumed on completion.
///
/// Dropping a completer without completing it fails the request, so a
/// backend that discards its callback cannot leave [`resolve`] spinning.
pub struct Completer<T> {
    state: Option<Arc<Mutex<Request<T>>>>,
}

impl<T> Completer<T> {
    pub fn complete(mut self, value: T) {
        self.settle(Request::Ready(value));
    }

    pub fn fail(mut self, reason: impl Into<String>) {
        self.settle(Request::Failed(reason.into()));
    }

    fn settle(&mut self, outcome: Request<T>) {
        if let Some(state) = self.state.take() {
            *state.lock() = outcome;
        }
    }
}

impl<T> Drop for Completer<T> {
    fn drop(&mut self) {
        self.settle(Request::Failed(DROPPED.to_string()));
    }
}

const DROPPED: &str = "request dropped before completion";

/// Spin-polls `slot`, ticking `pump` between checks, until the request
/// resolves. Returns the failure reason on `Failed`.
pub fn resolve<T>(
    slot: &RequestSlot<T>,
    pump: &mut dyn EventPump,
) -> std::result::Result<T, String> {
    loop {
        match slot.take() {
            Request::Pending => pump.tick(),
            Request::Ready(value) => return Ok(value),
            Request::Failed(reason) => return Err(reason),
        }
    }
}

/// Drives a backend future to completion by polling it once per pump tick.
///
/// Native `wgpu` request futures are ready on first poll; the pump keeps
/// backends that need explicit event processing moving.
pub fn resolve_future<F: Future>(future: F, pump: &mut dyn EventPump) -> F::Output {
    let mut future = pin!(future);
    loop {
        if let Some(output) = future.as_mut().now_or_never() {
            return output;
        }
        pump.tick();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::pump::{NoopPump, PumpFn};

    #[test]
    fn resolve_ticks_until_ready() {
        let slot = RequestSlot::<u32>::new();
        let mut completer = Some(slot.completer());
        let mut ticks = 0;
        let mut pump = PumpFn(|| {
            ticks += 1;
            if ticks == 3 {
                if let Some(c) = completer.take() {
                    c.complete(42);
                }
            }
        });

        assert_eq!(resolve(&slot, &mut pump), Ok(42));
        drop(pump);
        assert_eq!(ticks, 3);
    }

    #[test]
    fn resolve_reports_failure() {
        let slot = RequestSlot::<u32>::new();
        slot.completer().fail("no adapter");
        assert_eq!(resolve(&slot, &mut NoopPump), Err("no adapter".to_string()));
    }

    #[test]
    fn dropped_completer_fails_the_request() {
        let slot = RequestSlot::<u32>::new();
        drop(slot.completer());
        assert_eq!(
            resolve(&slot, &mut NoopPump),
            Err("request dropped before completion".to_string())
        );
    }

    #[test]
    fn completed_request_survives_completer_drop() {
        let slot = RequestSlot::<u32>::new();
        slot.completer().complete(5);
        assert_eq!(resolve(&slot, &mut NoopPump), Ok(5));
    }

    #[test]
    fn take_resets_to_pending() {
        let slot = RequestSlot::new();
        slot.completer().complete("x");
        assert!(!slot.is_pending());
        assert_eq!(slot.take(), Request::Ready("x"));
        assert!(slot.is_pending());
    }

    #[test]
    fn resolve_future_returns_ready_output() {
        let out = resolve_future(async { 7 }, &mut NoopPump);
        assert_eq!(out, 7);
    }
}
