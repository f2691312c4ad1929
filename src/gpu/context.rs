//! GPU Context
//!
//! [`GpuContext`] owns the core GPU handles: instance, adapter, device and
//! queue. Acquisition is two asynchronous requests in sequence (adapter, then
//! device), each driven to completion with an explicit [`EventPump`].

use crate::errors::{GlintError, Result};
use crate::settings::GpuSettings;

use super::diagnostics::{self, AdapterSummary};
use super::pump::{EventPump, InstancePump};
use super::request::resolve_future;

/// Requests an adapter compatible with `compatible_surface` (if any).
pub fn request_adapter(
    instance: &wgpu::Instance,
    settings: &GpuSettings,
    compatible_surface: Option<&wgpu::Surface<'_>>,
    pump: &mut dyn EventPump,
) -> Result<wgpu::Adapter> {
    let request = instance.request_adapter(&wgpu::RequestAdapterOptions {
        power_preference: settings.power_preference,
        compatible_surface,
        force_fallback_adapter: settings.force_fallback_adapter,
    });

    resolve_future(request, pump).map_err(|e| {
        log::error!("Failed to get adapter: {e}");
        GlintError::AdapterRequestFailed(e.to_string())
    })
}

/// Requests a logical device and its queue from `adapter`.
pub fn request_device(
    adapter: &wgpu::Adapter,
    settings: &GpuSettings,
    pump: &mut dyn EventPump,
) -> Result<(wgpu::Device, wgpu::Queue)> {
    let request = adapter.request_device(&wgpu::DeviceDescriptor {
        label: Some("Glint Device"),
        required_features: settings.required_features,
        required_limits: settings.required_limits.clone(),
        memory_hints: wgpu::MemoryHints::Performance,
        ..Default::default()
    });

    resolve_future(request, pump).map_err(|e| {
        log::error!("Failed to get device: {e}");
        GlintError::from(e)
    })
}

/// Core wgpu handles shared by the compute and frame paths.
pub struct GpuContext {
    pub instance: wgpu::Instance,
    /// Kept alongside the device for surface capability queries.
    pub adapter: wgpu::Adapter,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    summary: AdapterSummary,
}

impl GpuContext {
    /// Acquires adapter and device, polling `instance` while they resolve.
    ///
    /// On success the error handlers are installed and the device report is
    /// logged.
    pub fn acquire(
        instance: wgpu::Instance,
        settings: &GpuSettings,
        compatible_surface: Option<&wgpu::Surface<'_>>,
    ) -> Result<Self> {
        let (adapter, device, queue) = {
            let mut pump = InstancePump::new(&instance);
            let adapter = request_adapter(&instance, settings, compatible_surface, &mut pump)?;
            let (device, queue) = request_device(&adapter, settings, &mut pump)?;
            (adapter, device, queue)
        };
        Ok(Self::from_parts(instance, adapter, device, queue))
    }

    /// Headless acquisition with default instance and settings.
    pub fn headless() -> Result<Self> {
        let settings = GpuSettings {
            required_limits: wgpu::Limits::downlevel_defaults(),
            ..GpuSettings::default()
        };
        let ctx = Self::acquire(wgpu::Instance::default(), &settings, None)?;
        if !ctx.supports_compute() {
            return Err(GlintError::AdapterRequestFailed(
                "Selected adapter does not support compute shaders".into(),
            ));
        }
        Ok(ctx)
    }

    /// Assembles a context from already-acquired handles.
    pub fn from_parts(
        instance: wgpu::Instance,
        adapter: wgpu::Adapter,
        device: wgpu::Device,
        queue: wgpu::Queue,
    ) -> Self {
        diagnostics::install_error_handlers(&device);
        let summary = AdapterSummary::from(&adapter.get_info());
        diagnostics::log_device_report(&summary, &device);

        Self {
            instance,
            adapter,
            device,
            queue,
            summary,
        }
    }

    #[must_use]
    pub fn adapter_summary(&self) -> &AdapterSummary {
        &self.summary
    }

    #[must_use]
    pub fn supports_compute(&self) -> bool {
        self.adapter
            .get_downlevel_capabilities()
            .flags
            .contains(wgpu::DownlevelFlags::COMPUTE_SHADERS)
    }
}
