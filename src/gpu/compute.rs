//! Compute Dispatch
//!
//! The dispatch flow runs a WGSL program over storage buffers and reads the
//! result back to the host:
//!
//! 1. allocate input, output and staging buffers;
//! 2. upload the inputs with queue writes;
//! 3. build the pipeline and bind the buffers at bindings `0..n`;
//! 4. submit the compute pass;
//! 5. copy the output into the staging buffer in a second submission;
//! 6. map the staging buffer and copy it out ([`read_buffer`]).
//!
//! Steps are expressed against [`ComputeBackend`] so the ordering can be
//! checked without a GPU. [`WgpuCompute`] is the real implementation.

use bitflags::bitflags;

use crate::errors::{GlintError, Result};

use super::context::GpuContext;
use super::pump::{DevicePump, EventPump};
use super::readback::{MapStatus, read_buffer};
use super::request::Completer;

/// Workgroups per dimension every adapter is guaranteed to support.
pub const MAX_WORKGROUPS_PER_DIMENSION: u32 = 65_535;

bitflags! {
    /// How a buffer may be used.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BufferUsage: u32 {
        const STORAGE           = 1 << 0;
        const COPY_SRC          = 1 << 1;
        const COPY_DST          = 1 << 2;
        const MAP_READ          = 1 << 3;
        /// Texture-only. Has no buffer equivalent: [`to_wgpu`](Self::to_wgpu)
        /// drops it and [`WgpuCompute`] rejects it in debug builds.
        const RENDER_ATTACHMENT = 1 << 4;
    }
}

impl BufferUsage {
    /// Flags that map onto `wgpu::BufferUsages`.
    pub const BUFFER: Self = Self::STORAGE
        .union(Self::COPY_SRC)
        .union(Self::COPY_DST)
        .union(Self::MAP_READ);

    /// `false` if any flag has no buffer meaning.
    #[must_use]
    pub const fn is_buffer_usage(self) -> bool {
        Self::BUFFER.contains(self)
    }

    #[must_use]
    pub fn to_wgpu(self) -> wgpu::BufferUsages {
        let mut usages = wgpu::BufferUsages::empty();
        if self.contains(Self::STORAGE) {
            usages |= wgpu::BufferUsages::STORAGE;
        }
        if self.contains(Self::COPY_SRC) {
            usages |= wgpu::BufferUsages::COPY_SRC;
        }
        if self.contains(Self::COPY_DST) {
            usages |= wgpu::BufferUsages::COPY_DST;
        }
        if self.contains(Self::MAP_READ) {
            usages |= wgpu::BufferUsages::MAP_READ;
        }
        usages
    }
}

/// Description of a buffer to allocate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferSpec {
    pub label: &'static str,
    pub size: u64,
    pub usage: BufferUsage,
}

impl BufferSpec {
    #[must_use]
    pub const fn new(label: &'static str, size: u64, usage: BufferUsage) -> Self {
        Self { label, size, usage }
    }
}

/// A WGSL compute program.
#[derive(Debug, Clone, Copy)]
pub struct ComputeProgram {
    pub label: &'static str,
    pub source: &'static str,
    pub entry_point: &'static str,
}

/// `out[i] = lhs[i] + rhs[i]`, one invocation per workgroup.
pub const VECTOR_ADD: ComputeProgram = ComputeProgram {
    label: "Vector Add",
    source: include_str!("shaders/vector_add.wgsl"),
    entry_point: "main",
};

/// GPU operations the dispatch flow needs.
///
/// Submissions are executed in call order. `tick` (from [`EventPump`])
/// fires completed map callbacks.
pub trait ComputeBackend: EventPump {
    type Buffer;
    type Pipeline;

    fn create_buffer(&mut self, spec: &BufferSpec) -> Self::Buffer;

    /// Queues a write of `data` into `buffer` at `offset`.
    fn write_buffer(&mut self, buffer: &Self::Buffer, offset: u64, data: &[u8]);

    fn create_pipeline(&mut self, program: &ComputeProgram) -> Self::Pipeline;

    /// Records and submits one compute pass. `bindings[i]` is bound at
    /// binding `i` of group 0.
    fn dispatch(
        &mut self,
        pipeline: &Self::Pipeline,
        bindings: &[&Self::Buffer],
        workgroups: [u32; 3],
    );

    /// Records and submits a buffer-to-buffer copy.
    fn copy_buffer(&mut self, src: &Self::Buffer, dst: &Self::Buffer, size: u64);

    /// Starts an asynchronous read map; `done` is completed from inside `tick`.
    fn map_read(&mut self, buffer: &Self::Buffer, size: u64, done: Completer<MapStatus>);

    /// Copies the mapped range out. Only valid after a successful map.
    fn read_mapped(&mut self, buffer: &Self::Buffer, size: u64) -> Vec<u8>;

    fn unmap(&mut self, buffer: &Self::Buffer);
}

// ============================================================================
// Compute job
// ============================================================================

/// Element-wise binary operation over two `f32` slices.
pub struct ComputeJob<'a> {
    program: ComputeProgram,
    lhs: &'a [f32],
    rhs: &'a [f32],
}

impl<'a> ComputeJob<'a> {
    #[must_use]
    pub fn vector_add(lhs: &'a [f32], rhs: &'a [f32]) -> Self {
        Self {
            program: VECTOR_ADD,
            lhs,
            rhs,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lhs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lhs.is_empty()
    }

    fn validate(&self) -> Result<()> {
        if self.lhs.len() != self.rhs.len() {
            return Err(GlintError::InvalidWorkload(format!(
                "input lengths differ ({} vs {})",
                self.lhs.len(),
                self.rhs.len()
            )));
        }
        if self.lhs.len() > MAX_WORKGROUPS_PER_DIMENSION as usize {
            return Err(GlintError::InvalidWorkload(format!(
                "{} elements exceed {MAX_WORKGROUPS_PER_DIMENSION} workgroups",
                self.lhs.len()
            )));
        }
        Ok(())
    }

    /// Runs the job to completion and returns the output.
    pub fn run<B: ComputeBackend>(&self, backend: &mut B) -> Result<Vec<f32>> {
        self.validate()?;
        if self.is_empty() {
            return Ok(Vec::new());
        }

        let len = self.len();
        let size = std::mem::size_of_val(self.lhs) as u64;
        let input = BufferUsage::STORAGE | BufferUsage::COPY_DST;

        let lhs = backend.create_buffer(&BufferSpec::new("lhs", size, input));
        let rhs = backend.create_buffer(&BufferSpec::new("rhs", size, input));
        let out = backend.create_buffer(&BufferSpec::new(
            "out",
            size,
            BufferUsage::STORAGE | BufferUsage::COPY_SRC,
        ));
        let staging = backend.create_buffer(&BufferSpec::new(
            "readback",
            size,
            BufferUsage::COPY_DST | BufferUsage::MAP_READ,
        ));

        backend.write_buffer(&lhs, 0, bytemuck::cast_slice(self.lhs));
        backend.write_buffer(&rhs, 0, bytemuck::cast_slice(self.rhs));

        let pipeline = backend.create_pipeline(&self.program);
        backend.dispatch(&pipeline, &[&lhs, &rhs, &out], [len as u32, 1, 1]);
        backend.copy_buffer(&out, &staging, size);

        let bytes = read_buffer(backend, &staging, size)?;
        log::debug!("{}: read back {} bytes", self.program.label, bytes.len());

        Ok(bytes
            .chunks_exact(std::mem::size_of::<f32>())
            .map(bytemuck::pod_read_unaligned::<f32>)
            .collect())
    }
}

// ============================================================================
// wgpu backend
// ============================================================================

/// [`ComputeBackend`] over a live device.
pub struct WgpuCompute<'a> {
    ctx: &'a GpuContext,
}

impl<'a> WgpuCompute<'a> {
    #[must_use]
    pub fn new(ctx: &'a GpuContext) -> Self {
        Self { ctx }
    }
}

impl EventPump for WgpuCompute<'_> {
    fn tick(&mut self) {
        DevicePump::new(&self.ctx.device).tick();
    }
}

impl ComputeBackend for WgpuCompute<'_> {
    type Buffer = wgpu::Buffer;
    type Pipeline = wgpu::ComputePipeline;

    fn create_buffer(&mut self, spec: &BufferSpec) -> wgpu::Buffer {
        debug_assert!(
            spec.usage.is_buffer_usage(),
            "{}: {:?} has no buffer equivalent",
            spec.label,
            spec.usage.difference(BufferUsage::BUFFER)
        );
        self.ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(spec.label),
            size: spec.size,
            usage: spec.usage.to_wgpu(),
            mapped_at_creation: false,
        })
    }

    fn write_buffer(&mut self, buffer: &wgpu::Buffer, offset: u64, data: &[u8]) {
        self.ctx.queue.write_buffer(buffer, offset, data);
    }

    fn create_pipeline(&mut self, program: &ComputeProgram) -> wgpu::ComputePipeline {
        let module = self
            .ctx
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(program.label),
                source: wgpu::ShaderSource::Wgsl(program.source.into()),
            });

        // No explicit layout: it is derived from the shader and read back
        // with `get_bind_group_layout` at dispatch time.
        self.ctx
            .device
            .create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
                label: Some(program.label),
                layout: None,
                module: &module,
                entry_point: Some(program.entry_point),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                cache: None,
            })
    }

    fn dispatch(
        &mut self,
        pipeline: &wgpu::ComputePipeline,
        bindings: &[&wgpu::Buffer],
        workgroups: [u32; 3],
    ) {
        let layout = pipeline.get_bind_group_layout(0);
        let entries: Vec<wgpu::BindGroupEntry<'_>> = bindings
            .iter()
            .enumerate()
            .map(|(i, buffer)| wgpu::BindGroupEntry {
                binding: i as u32,
                resource: buffer.as_entire_binding(),
            })
            .collect();

        let bind_group = self
            .ctx
            .device
            .create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Compute BindGroup"),
                layout: &layout,
                entries: &entries,
            });

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Compute Encoder"),
            });
        {
            let mut cpass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("Compute Pass"),
                timestamp_writes: None,
            });
            cpass.set_pipeline(pipeline);
            cpass.set_bind_group(0, &bind_group, &[]);
            cpass.dispatch_workgroups(workgroups[0], workgroups[1], workgroups[2]);
        }

        self.ctx.queue.submit(std::iter::once(encoder.finish()));
    }

    fn copy_buffer(&mut self, src: &wgpu::Buffer, dst: &wgpu::Buffer, size: u64) {
        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Readback Copy Encoder"),
            });
        encoder.copy_buffer_to_buffer(src, 0, dst, 0, size);
        self.ctx.queue.submit(std::iter::once(encoder.finish()));
    }

    fn map_read(&mut self, buffer: &wgpu::Buffer, size: u64, done: Completer<MapStatus>) {
        buffer
            .slice(..size)
            .map_async(wgpu::MapMode::Read, move |result| {
                done.complete(MapStatus::from(result));
            });
    }

    fn read_mapped(&mut self, buffer: &wgpu::Buffer, size: u64) -> Vec<u8> {
        buffer.slice(..size).get_mapped_range().to_vec()
    }

    fn unmap(&mut self, buffer: &wgpu::Buffer) {
        buffer.unmap();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_attachment_is_not_a_buffer_usage() {
        assert!((BufferUsage::STORAGE | BufferUsage::MAP_READ).is_buffer_usage());
        assert!(!(BufferUsage::STORAGE | BufferUsage::RENDER_ATTACHMENT).is_buffer_usage());
        assert_eq!(
            BufferUsage::RENDER_ATTACHMENT.to_wgpu(),
            wgpu::BufferUsages::empty()
        );
    }

    #[test]
    fn usage_maps_onto_wgpu() {
        let usage = BufferUsage::COPY_DST | BufferUsage::MAP_READ;
        assert_eq!(
            usage.to_wgpu(),
            wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ
        );
        assert_eq!(
            (BufferUsage::STORAGE | BufferUsage::COPY_SRC).to_wgpu(),
            wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC
        );
    }

    #[test]
    fn vector_add_program_uses_main_entry() {
        assert_eq!(VECTOR_ADD.entry_point, "main");
        assert!(VECTOR_ADD.source.contains("@workgroup_size(1)"));
        assert!(VECTOR_ADD.source.contains("@binding(2)"));
    }
}
