//! Error Types
//!
//! This module defines the error types used throughout the crate.
//!
//! # Overview
//!
//! The main error type [`GlintError`] covers the startup and runtime failure modes:
//! - GPU adapter / device acquisition failures
//! - Window, surface and event loop failures
//! - Audio device, configuration and stream failures
//! - Asynchronous buffer map failures
//!
//! Backend validation errors are *not* represented here: they are delivered
//! out of band to the device's uncaptured-error handler and only logged
//! (see [`crate::gpu::diagnostics`]).
//!
//! # Usage
//!
//! ```rust,ignore
//! use glint::errors::{GlintError, Result};
//!
//! fn startup() -> Result<()> {
//!     Ok(())
//! }
//! ```

use thiserror::Error;

use crate::gpu::readback::MapStatus;

/// The main error type for the crate.
#[derive(Error, Debug)]
pub enum GlintError {
    // ========================================================================
    // GPU Acquisition Errors
    // ========================================================================
    /// Failed to request a compatible GPU adapter.
    #[error("Failed to request WGPU adapter: {0}")]
    AdapterRequestFailed(String),

    /// Failed to create the GPU device.
    #[error("Failed to create WGPU device: {0}")]
    DeviceRequestFailed(String),

    /// Failed to create a presentation surface for the window.
    #[error("Failed to create surface: {0}")]
    SurfaceCreateFailed(#[from] wgpu::CreateSurfaceError),

    // ========================================================================
    // Window System Errors
    // ========================================================================
    /// Window creation failed or the window was never delivered by the platform.
    #[error("Window creation failed: {0}")]
    WindowCreateFailed(String),

    /// Event loop error (winit).
    #[error("Event loop error: {0}")]
    EventLoopError(#[from] winit::error::EventLoopError),

    // ========================================================================
    // Audio Errors
    // ========================================================================
    /// No playback device is available on the default host.
    #[error("No audio output device found")]
    NoAudioDevice,

    /// The playback device rejected every candidate configuration.
    #[error("Audio config error: {0}")]
    AudioConfigError(String),

    /// Building, starting or stopping the audio stream failed.
    #[error("Audio stream error: {0}")]
    AudioStreamError(String),

    // ========================================================================
    // Asynchronous Operation Errors
    // ========================================================================
    /// A buffer map request completed with a non-success status.
    #[error("Buffer map failed: {0}")]
    MapFailed(MapStatus),

    /// Compute inputs cannot be dispatched (mismatched or oversized).
    #[error("Invalid compute workload: {0}")]
    InvalidWorkload(String),

    /// An asynchronous backend request completed with a failure.
    #[error("Request failed: {0}")]
    RequestFailed(String),
}

// ============================================================================
// Convenient conversion implementations
// ============================================================================

impl From<wgpu::RequestDeviceError> for GlintError {
    fn from(err: wgpu::RequestDeviceError) -> Self {
        GlintError::DeviceRequestFailed(err.to_string())
    }
}

impl From<cpal::DefaultStreamConfigError> for GlintError {
    fn from(err: cpal::DefaultStreamConfigError) -> Self {
        GlintError::AudioConfigError(err.to_string())
    }
}

impl From<cpal::BuildStreamError> for GlintError {
    fn from(err: cpal::BuildStreamError) -> Self {
        GlintError::AudioStreamError(err.to_string())
    }
}

/// Alias for `Result<T, GlintError>`.
pub type Result<T> = std::result::Result<T, GlintError>;
