//! Asynchronous buffer read-back.
//!
//! Reading GPU memory on the host is a three-step protocol: request a map,
//! keep the backend's event processing moving until the map callback has
//! fired, then copy the mapped range out and unmap. A map that completes with
//! anything other than [`MapStatus::Success`] never exposes data.

use std::fmt;

use crate::errors::{GlintError, Result};

use super::compute::ComputeBackend;
use super::request::{RequestSlot, resolve};

/// Outcome of a buffer map request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapStatus {
    Success,
    /// The buffer was unmapped or destroyed before the map completed.
    Aborted,
    Failed(String),
}

impl MapStatus {
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl fmt::Display for MapStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => f.write_str("success"),
            Self::Aborted => f.write_str("aborted"),
            Self::Failed(reason) => write!(f, "failed ({reason})"),
        }
    }
}

impl From<std::result::Result<(), wgpu::BufferAsyncError>> for MapStatus {
    fn from(result: std::result::Result<(), wgpu::BufferAsyncError>) -> Self {
        match result {
            Ok(()) => Self::Success,
            Err(e) => Self::Failed(e.to_string()),
        }
    }
}

/// Maps `buffer` for reading, waits for the map to complete and returns the
/// first `size` bytes.
///
/// The buffer must have been created with `MAP_READ` and every submission
/// writing to it must already be queued.
pub fn read_buffer<B>(backend: &mut B, buffer: &B::Buffer, size: u64) -> Result<Vec<u8>>
where
    B: ComputeBackend,
{
    let slot = RequestSlot::new();
    backend.map_read(buffer, size, slot.completer());

    let status = resolve(&slot, backend).map_err(GlintError::RequestFailed)?;
    if !status.is_success() {
        log::error!("Failed to map buffer: {status}");
        return Err(GlintError::MapFailed(status));
    }

    let bytes = backend.read_mapped(buffer, size);
    backend.unmap(buffer);
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_display() {
        assert_eq!(MapStatus::Success.to_string(), "success");
        assert_eq!(MapStatus::Aborted.to_string(), "aborted");
        assert_eq!(
            MapStatus::Failed("validation".into()).to_string(),
            "failed (validation)"
        );
    }

    #[test]
    fn only_success_is_success() {
        assert!(MapStatus::Success.is_success());
        assert!(!MapStatus::Aborted.is_success());
        assert!(!MapStatus::Failed(String::new()).is_success());
    }
}
