//! WGPU Context
//!
//! [`GpuContext`] holds the device, queue, surface and surface configuration,
//! and handles resize and backing-store reconfiguration. Construction fails
//! when no hardware-accelerated adapter is available; the engine does not
//! fall back to software rendering.

use crate::errors::{LoupeError, Result};

/// Core WGPU context.
pub struct GpuContext {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub surface: wgpu::Surface<'static>,
    pub config: wgpu::SurfaceConfiguration,

    device_type: wgpu::DeviceType,
    max_texture_dimension: u32,
}

impl GpuContext {
    /// Acquires a high-performance adapter and configures the surface.
    ///
    /// The surface prefers a non-premultiplied alpha mode when the adapter
    /// offers one; MSAA and depth are intentionally absent, the viewer draws
    /// exactly one textured quad.
    pub async fn new(
        target: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(target)
            .map_err(|e| LoupeError::ContextUnavailable(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| LoupeError::ContextUnavailable(e.to_string()))?;

        let info = adapter.get_info();
        log::info!(
            "adapter: {} ({:?}, {:?})",
            info.name,
            info.device_type,
            info.backend
        );

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("loupe device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::Performance,
                ..Default::default()
            })
            .await?;

        let mut config = surface
            .get_default_config(&adapter, width.max(1), height.max(1))
            .ok_or_else(|| {
                LoupeError::ContextUnavailable("surface not supported by adapter".to_string())
            })?;
        config.present_mode = wgpu::PresentMode::AutoVsync;
        config.alpha_mode = preferred_alpha_mode(&surface.get_capabilities(&adapter));
        surface.configure(&device, &config);

        let max_texture_dimension = device.limits().max_texture_dimension_2d;

        Ok(Self {
            device,
            queue,
            surface,
            config,
            device_type: info.device_type,
            max_texture_dimension,
        })
    }

    /// Reconfigures the backing store to a new physical size.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 && (width, height) != (self.config.width, self.config.height) {
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// The surface color format.
    #[must_use]
    pub fn color_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Adapter device class; drives the texture-memory budget.
    #[must_use]
    pub fn device_type(&self) -> wgpu::DeviceType {
        self.device_type
    }

    /// Largest texture dimension the device accepts.
    #[must_use]
    pub fn max_texture_dimension(&self) -> u32 {
        self.max_texture_dimension
    }
}

/// Picks an alpha mode: non-premultiplied when available, otherwise whatever
/// the surface supports first.
fn preferred_alpha_mode(caps: &wgpu::SurfaceCapabilities) -> wgpu::CompositeAlphaMode {
    if caps
        .alpha_modes
        .contains(&wgpu::CompositeAlphaMode::PostMultiplied)
    {
        wgpu::CompositeAlphaMode::PostMultiplied
    } else {
        caps.alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto)
    }
}
