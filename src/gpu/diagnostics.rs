//! Backend error reporting and device inspection.
//!
//! Runtime errors raised by the GPU backend (validation failures,
//! out-of-memory, device loss) arrive out of band through callbacks
//! registered on the device. They are categorised and logged here and never
//! turned into in-flow error values; the frame loop keeps running.

use std::fmt;

/// Category of an uncaptured backend error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendErrorKind {
    Validation,
    OutOfMemory,
    DeviceLost,
    Unknown,
}

impl BackendErrorKind {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Validation => "Validation",
            Self::OutOfMemory => "Out of memory",
            Self::DeviceLost => "Device lost",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for BackendErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<&wgpu::Error> for BackendErrorKind {
    fn from(error: &wgpu::Error) -> Self {
        match error {
            wgpu::Error::Validation { .. } => Self::Validation,
            wgpu::Error::OutOfMemory { .. } => Self::OutOfMemory,
            _ => Self::Unknown,
        }
    }
}

/// Logs a backend error with its category label.
pub fn log_backend_error(kind: BackendErrorKind, message: &str) {
    log::error!("{kind} error: {message}");
}

/// Installs the uncaptured-error and device-lost handlers on `device`.
pub fn install_error_handlers(device: &wgpu::Device) {
    device.on_uncaptured_error(std::sync::Arc::new(|error: wgpu::Error| {
        log_backend_error(BackendErrorKind::from(&error), &error.to_string());
    }));
    device.set_device_lost_callback(|reason, message| {
        log_backend_error(BackendErrorKind::DeviceLost, &format!("{reason:?}: {message}"));
    });
}

// ============================================================================
// Adapter / device reports
// ============================================================================

/// Human-readable description of the adapter a device was created from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterSummary {
    pub name: String,
    pub vendor_id: u32,
    pub device_id: u32,
    pub device_type: String,
    pub backend: String,
    pub driver: String,
}

impl From<&wgpu::AdapterInfo> for AdapterSummary {
    fn from(info: &wgpu::AdapterInfo) -> Self {
        let driver = if info.driver_info.is_empty() {
            info.driver.clone()
        } else {
            format!("{} ({})", info.driver, info.driver_info)
        };
        Self {
            name: info.name.clone(),
            vendor_id: info.vendor,
            device_id: info.device,
            device_type: format!("{:?}", info.device_type),
            backend: format!("{:?}", info.backend),
            driver,
        }
    }
}

impl fmt::Display for AdapterSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] via {} (vendor {:#06x}, device {:#06x}, driver {})",
            self.name, self.device_type, self.backend, self.vendor_id, self.device_id, self.driver
        )
    }
}

macro_rules! limit_rows {
    ($limits:expr; $($field:ident),* $(,)?) => {
        vec![$((stringify!($field), $limits.$field.to_string())),*]
    };
}

/// Flattens the limits that matter for compute and presentation into
/// `(name, value)` rows.
#[must_use]
pub fn limit_report(limits: &wgpu::Limits) -> Vec<(&'static str, String)> {
    limit_rows!(limits;
        max_texture_dimension_1d,
        max_texture_dimension_2d,
        max_texture_dimension_3d,
        max_texture_array_layers,
        max_bind_groups,
        max_dynamic_uniform_buffers_per_pipeline_layout,
        max_dynamic_storage_buffers_per_pipeline_layout,
        max_sampled_textures_per_shader_stage,
        max_samplers_per_shader_stage,
        max_storage_buffers_per_shader_stage,
        max_storage_textures_per_shader_stage,
        max_uniform_buffers_per_shader_stage,
        max_uniform_buffer_binding_size,
        max_storage_buffer_binding_size,
        min_uniform_buffer_offset_alignment,
        min_storage_buffer_offset_alignment,
        max_vertex_buffers,
        max_vertex_attributes,
        max_vertex_buffer_array_stride,
        max_compute_workgroup_storage_size,
        max_compute_invocations_per_workgroup,
        max_compute_workgroup_size_x,
        max_compute_workgroup_size_y,
        max_compute_workgroup_size_z,
        max_compute_workgroups_per_dimension,
    )
}

/// Logs the adapter summary, device features and device limits at `debug`.
pub fn log_device_report(summary: &AdapterSummary, device: &wgpu::Device) {
    log::info!("GPU adapter: {summary}");

    if !log::log_enabled!(log::Level::Debug) {
        return;
    }
    log::debug!("Device features: {:?}", device.features());
    log::debug!("Device limits:");
    for (name, value) in limit_report(&device.limits()) {
        log::debug!(" - {name}: {value}");
    }
}
