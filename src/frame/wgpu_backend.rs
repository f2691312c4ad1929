//! wgpu implementation of [`FrameBackend`].
//!
//! Owns the window surface and the `egui-wgpu` renderer. Each frame is one
//! render pass over the surface texture: clear to the panel's colour, draw
//! the egui primitives, submit, present.

use std::sync::Arc;

use winit::window::Window;

use crate::errors::Result;
use crate::gpu::context::GpuContext;
use crate::gpu::swap_chain::{
    PresentMode, SwapChain, SwapChainConfig, SwapChainTarget, choose_format,
};
use crate::settings::{AppSettings, ClearColor};

use super::backend::{FrameAcquire, FrameBackend};
use super::egui_layer::EguiDrawData;
use super::gui::GuiDeviceObjects;

/// Acquired surface texture and its view.
pub struct SurfaceFrame {
    texture: wgpu::SurfaceTexture,
    view: wgpu::TextureView,
}

impl SurfaceFrame {
    fn new(texture: wgpu::SurfaceTexture) -> Self {
        let view = texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        Self { texture, view }
    }
}

pub struct WgpuFrameBackend {
    gpu: GpuContext,
    /// Holds a clone of the window; dropped on GUI shutdown so the window can
    /// actually be destroyed afterwards.
    surface: Option<wgpu::Surface<'static>>,
    format: wgpu::TextureFormat,
    present_mode: PresentMode,
    supported_present_modes: Vec<wgpu::PresentMode>,
    renderer: Option<egui_wgpu::Renderer>,
    renderer_format: Option<wgpu::TextureFormat>,
}

impl WgpuFrameBackend {
    /// Creates the surface for `window`, acquires a device compatible with
    /// it and picks the surface format.
    pub fn new(window: Arc<Window>, settings: &AppSettings) -> Result<Self> {
        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(window)?;
        let gpu = GpuContext::acquire(instance, &settings.gpu, Some(&surface))?;

        let caps = surface.get_capabilities(&gpu.adapter);
        let format = choose_format(&caps.formats, settings.fallback_format);
        log::info!("Surface format: {format:?}");

        Ok(Self {
            gpu,
            surface: Some(surface),
            format,
            present_mode: settings.present_mode,
            supported_present_modes: caps.present_modes,
            renderer: None,
            renderer_format: None,
        })
    }

    /// An unconfigured swap chain in this backend's format.
    #[must_use]
    pub fn swap_chain(&self) -> SwapChain {
        SwapChain::new(self.format, self.present_mode)
    }

    #[must_use]
    pub fn gpu(&self) -> &GpuContext {
        &self.gpu
    }

    fn resolve_present_mode(&self, requested: PresentMode) -> wgpu::PresentMode {
        let mode = requested.to_wgpu();
        if self.supported_present_modes.is_empty() || self.supported_present_modes.contains(&mode) {
            mode
        } else {
            log::warn!("Present mode {mode:?} unsupported, falling back to Fifo");
            wgpu::PresentMode::Fifo
        }
    }
}

impl SwapChainTarget for WgpuFrameBackend {
    fn create_swap_chain(&mut self, config: &SwapChainConfig) {
        let Some(surface) = self.surface.as_ref() else {
            return;
        };
        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: config.format,
            width: config.size.width,
            height: config.size.height,
            present_mode: self.resolve_present_mode(config.present_mode),
            desired_maximum_frame_latency: 2,
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
            view_formats: vec![],
        };
        surface.configure(&self.gpu.device, &surface_config);
    }

    fn release_swap_chain(&mut self) {
        // Reconfiguring the surface replaces its textures; nothing is held
        // between frames.
        log::debug!("Releasing swap chain");
    }
}

impl GuiDeviceObjects for WgpuFrameBackend {
    fn invalidate_device_objects(&mut self) {
        // The egui renderer holds no swap-chain-sized resources. Keeping it
        // alive preserves the uploaded font atlas; it is rebuilt only when
        // the target format changes.
        log::debug!("Invalidating GUI device objects");
    }

    fn create_device_objects(&mut self, config: &SwapChainConfig) {
        if self.renderer.is_some() && self.renderer_format == Some(config.format) {
            return;
        }
        self.renderer = Some(egui_wgpu::Renderer::new(
            &self.gpu.device,
            config.format,
            egui_wgpu::RendererOptions::default(),
        ));
        self.renderer_format = Some(config.format);
    }
}

impl FrameBackend for WgpuFrameBackend {
    type Frame = SurfaceFrame;
    type DrawData = EguiDrawData;

    fn acquire_frame(&mut self) -> FrameAcquire<SurfaceFrame> {
        let Some(surface) = self.surface.as_ref() else {
            return FrameAcquire::Skip;
        };
        match surface.get_current_texture() {
            wgpu::CurrentSurfaceTexture::Success(texture) => {
                FrameAcquire::Ready(SurfaceFrame::new(texture))
            }
            wgpu::CurrentSurfaceTexture::Suboptimal(texture) => {
                log::debug!("Surface suboptimal, rebuilding after this frame");
                FrameAcquire::Stale(SurfaceFrame::new(texture))
            }
            wgpu::CurrentSurfaceTexture::Timeout | wgpu::CurrentSurfaceTexture::Occluded => {
                FrameAcquire::Skip
            }
            wgpu::CurrentSurfaceTexture::Lost | wgpu::CurrentSurfaceTexture::Outdated => {
                FrameAcquire::Reconfigure
            }
            wgpu::CurrentSurfaceTexture::Validation { .. } => {
                log::error!("Surface validation error while acquiring frame");
                FrameAcquire::Skip
            }
        }
    }

    fn submit_frame(&mut self, frame: &SurfaceFrame, clear: ClearColor, draw_data: &EguiDrawData) {
        let device = &self.gpu.device;
        let queue = &self.gpu.queue;

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Frame Encoder"),
        });

        let mut command_buffers = Vec::new();
        if let Some(renderer) = self.renderer.as_mut() {
            for (id, delta) in &draw_data.textures_delta.set {
                renderer.update_texture(device, queue, *id, delta);
            }
            command_buffers = renderer.update_buffers(
                device,
                queue,
                &mut encoder,
                &draw_data.primitives,
                &draw_data.screen,
            );
        }

        {
            let mut rpass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &frame.view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(clear.to_wgpu()),
                            store: wgpu::StoreOp::Store,
                        },
                        depth_slice: None,
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                    multiview_mask: None,
                })
                .forget_lifetime();

            if let Some(renderer) = self.renderer.as_ref() {
                renderer.render(&mut rpass, &draw_data.primitives, &draw_data.screen);
            }
        }

        command_buffers.push(encoder.finish());
        queue.submit(command_buffers);

        if let Some(renderer) = self.renderer.as_mut() {
            for id in &draw_data.textures_delta.free {
                renderer.free_texture(id);
            }
        }
    }

    fn present(&mut self, frame: SurfaceFrame) {
        frame.texture.present();
    }

    fn shutdown_gui(&mut self) {
        self.renderer = None;
        self.renderer_format = None;
        self.surface = None;
        log::info!("GUI renderer shut down");
    }
}
