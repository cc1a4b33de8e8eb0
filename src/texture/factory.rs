//! Texture Factory
//!
//! Produces a GPU texture for a requested LOD level from the decoded source
//! image, clamped to the device's texture limits and to a per-texture share
//! of the memory budget.
//!
//! Production paths, in priority order:
//!
//! 1. **Worker path** — a dedicated rescale thread performs the CPU
//!    downscale; the pixels are marshalled back over a channel and uploaded
//!    on the engine thread at the next tick.
//! 2. **Deferred inline path** — when the worker is unavailable, the
//!    downscale is queued as a deferred engine-thread task with a one-second
//!    deadline after which it runs regardless.
//! 3. **Direct path** — when the target size equals the source size, the
//!    source is uploaded without an intermediate rescale.
//!
//! Every produced result carries the cache generation it was requested
//! under; the engine drops results from superseded generations.

use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Instant;

use image::RgbaImage;
use image::imageops::FilterType;

use super::LodTexture;
use crate::errors::{LoupeError, Result};
use crate::source::ImageSource;

/// Deadline for the deferred inline path.
const INLINE_DEADLINE_MS: u64 = 1000;

/// A rescale request handed to the worker (or deferred inline).
pub struct RescaleJob {
    /// Cache generation at request time.
    pub generation: u64,
    /// Requested LOD level.
    pub level: usize,
    /// Target width after capping.
    pub width: u32,
    /// Target height after capping.
    pub height: u32,
    /// The shared decoded source.
    pub source: Arc<ImageSource>,
}

/// Finished CPU rescale, ready for upload on the engine thread.
pub struct RescaleResult {
    pub generation: u64,
    pub level: usize,
    pub pixels: RgbaImage,
}

/// Computes the target texture size for an LOD level.
///
/// Applies the downscale factor, then clamps to both the (pressure-capped)
/// device dimension limit and the per-texture byte cap, shrinking uniformly
/// to preserve aspect. Length bounds shrink linearly, the area bound by the
/// square root of the byte ratio.
#[must_use]
pub fn lod_target_size(
    source_width: u32,
    source_height: u32,
    scale_factor: f32,
    max_dimension: u32,
    per_texture_cap_bytes: u64,
) -> (u32, u32) {
    let mut w = (source_width as f32 * scale_factor).round().max(1.0);
    let mut h = (source_height as f32 * scale_factor).round().max(1.0);

    let dim_scale = (max_dimension as f32 / w.max(h)).min(1.0);
    let bytes = 4.0 * w as f64 * h as f64;
    let byte_scale = ((per_texture_cap_bytes as f64 / bytes).sqrt() as f32).min(1.0);

    let shrink = dim_scale.min(byte_scale);
    if shrink < 1.0 {
        w = (w * shrink).floor().max(1.0);
        h = (h * shrink).floor().max(1.0);
    }

    (
        (w as u32).min(max_dimension),
        (h as u32).min(max_dimension),
    )
}

/// Filter choice for the staging rescale: strong minification discards
/// detail anyway, so the cheaper triangle filter suffices; near-1:1 targets
/// keep the high-quality kernel.
fn filter_for(source_width: u32, target_width: u32) -> FilterType {
    if source_width >= target_width * 2 {
        FilterType::Triangle
    } else {
        FilterType::Lanczos3
    }
}

fn rescale(source: &ImageSource, width: u32, height: u32) -> RgbaImage {
    image::imageops::resize(
        source.pixels(),
        width,
        height,
        filter_for(source.width(), width),
    )
}

struct DeferredJob {
    job: RescaleJob,
    deadline: Instant,
}

/// Asynchronous LOD texture producer.
pub struct TextureFactory {
    job_tx: Option<flume::Sender<RescaleJob>>,
    result_rx: flume::Receiver<RescaleResult>,
    deferred: Option<DeferredJob>,
    worker: Option<JoinHandle<()>>,
}

impl TextureFactory {
    /// Spawns the rescale worker. When the spawn fails the factory degrades
    /// to the deferred inline path.
    #[must_use]
    pub fn new() -> Self {
        let (job_tx, job_rx) = flume::unbounded::<RescaleJob>();
        let (result_tx, result_rx) = flume::unbounded::<RescaleResult>();

        let worker = std::thread::Builder::new()
            .name("loupe-rescale".to_string())
            .spawn(move || {
                while let Ok(job) = job_rx.recv() {
                    let pixels = rescale(&job.source, job.width, job.height);
                    let result = RescaleResult {
                        generation: job.generation,
                        level: job.level,
                        pixels,
                    };
                    if result_tx.send(result).is_err() {
                        break;
                    }
                }
            });

        match worker {
            Ok(handle) => Self {
                job_tx: Some(job_tx),
                result_rx,
                deferred: None,
                worker: Some(handle),
            },
            Err(e) => {
                log::warn!("rescale worker unavailable, falling back to inline path: {e}");
                Self {
                    job_tx: None,
                    result_rx,
                    deferred: None,
                    worker: None,
                }
            }
        }
    }

    /// Whether the target size requires no rescale at all.
    #[must_use]
    pub fn is_direct(source: &ImageSource, width: u32, height: u32) -> bool {
        source.width() == width && source.height() == height
    }

    /// Queues a rescale. A newly queued job replaces any deferred one; the
    /// engine coalesces requests per level before calling this.
    pub fn submit(&mut self, job: RescaleJob) {
        let job = match &self.job_tx {
            Some(tx) => match tx.send(job) {
                Ok(()) => return,
                // Worker gone mid-flight: defer inline.
                Err(flume::SendError(job)) => job,
            },
            None => job,
        };
        self.deferred = Some(DeferredJob {
            deadline: Instant::now() + std::time::Duration::from_millis(INLINE_DEADLINE_MS),
            job,
        });
    }

    /// Polls for a finished rescale.
    ///
    /// A deferred job runs inline when the engine reports itself idle, or
    /// unconditionally once its deadline passes; it is never starved longer
    /// than one second by continuous interaction.
    pub fn poll(&mut self, idle: bool) -> Option<RescaleResult> {
        if let Ok(result) = self.result_rx.try_recv() {
            return Some(result);
        }
        if !idle
            && let Some(deferred) = &self.deferred
            && Instant::now() < deferred.deadline
        {
            return None;
        }
        let deferred = self.deferred.take()?;
        let job = deferred.job;
        let pixels = if Self::is_direct(&job.source, job.width, job.height) {
            job.source.pixels().clone()
        } else {
            rescale(&job.source, job.width, job.height)
        };
        Some(RescaleResult {
            generation: job.generation,
            level: job.level,
            pixels,
        })
    }

    /// Synchronous production for the initial-LOD bootstrap: the first frame
    /// must never be blank longer than the decode.
    #[must_use]
    pub fn produce_blocking(source: &ImageSource, width: u32, height: u32) -> RgbaImage {
        if Self::is_direct(source, width, height) {
            source.pixels().clone()
        } else {
            rescale(source, width, height)
        }
    }

    /// Uploads finished pixels as an LOD texture.
    ///
    /// Dimensions are validated against the device limit before allocation;
    /// a violation reports failure without touching GPU state.
    pub fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        level: usize,
        pixels: &RgbaImage,
        max_dimension: u32,
    ) -> Result<LodTexture> {
        let (width, height) = pixels.dimensions();
        if width == 0 || height == 0 || width > max_dimension || height > max_dimension {
            return Err(LoupeError::TextureCreation {
                level,
                reason: format!("dimensions {width}x{height} exceed device limit {max_dimension}"),
            });
        }

        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(&format!("lod-{level}")),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pixels.as_raw(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("lod sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Ok(LodTexture {
            texture,
            view,
            sampler,
            width,
            height,
            level,
            byte_size: 4 * u64::from(width) * u64::from(height),
            last_used: Instant::now(),
        })
    }

    /// Drops the job channel so the worker exits; pending results are
    /// discarded by the engine's generation check.
    pub fn shutdown(&mut self) {
        self.job_tx = None;
        self.deferred = None;
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
    }
}

impl Default for TextureFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TextureFactory {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_size_applies_scale_factor() {
        let (w, h) = lod_target_size(8000, 6000, 0.25, 16384, u64::MAX);
        assert_eq!((w, h), (2000, 1500));
    }

    #[test]
    fn target_size_clamps_to_dimension() {
        let (w, h) = lod_target_size(8000, 6000, 1.0, 2048, u64::MAX);
        assert!(w <= 2048 && h <= 2048);
        // Aspect preserved within rounding
        let aspect = w as f32 / h as f32;
        assert!((aspect - 8000.0 / 6000.0).abs() < 0.01);
    }

    #[test]
    fn target_size_clamps_to_byte_cap() {
        // Cap at 4 MiB = 1M pixels
        let cap = 4 * 1024 * 1024;
        let (w, h) = lod_target_size(8000, 6000, 1.0, 16384, cap);
        assert!(4 * u64::from(w) * u64::from(h) <= cap);
        let aspect = w as f32 / h as f32;
        assert!((aspect - 8000.0 / 6000.0).abs() < 0.01);
    }

    #[test]
    fn minification_uses_cheap_filter() {
        assert!(matches!(filter_for(8000, 1000), FilterType::Triangle));
        assert!(matches!(filter_for(8000, 8000), FilterType::Lanczos3));
        assert!(matches!(filter_for(8000, 5000), FilterType::Lanczos3));
    }

    #[test]
    fn direct_path_detection() {
        let source = ImageSource::new(RgbaImage::new(100, 50), "test");
        assert!(TextureFactory::is_direct(&source, 100, 50));
        assert!(!TextureFactory::is_direct(&source, 50, 25));
    }

    #[test]
    fn worker_round_trip() {
        let mut factory = TextureFactory::new();
        let source = Arc::new(ImageSource::new(RgbaImage::new(64, 64), "test"));
        factory.submit(RescaleJob {
            generation: 7,
            level: 1,
            width: 16,
            height: 16,
            source,
        });
        // The worker needs a moment; poll until the result lands.
        let mut result = None;
        for _ in 0..200 {
            if let Some(r) = factory.poll(true) {
                result = Some(r);
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
        let result = result.expect("worker produced no result");
        assert_eq!(result.generation, 7);
        assert_eq!(result.level, 1);
        assert_eq!(result.pixels.dimensions(), (16, 16));
    }
}
