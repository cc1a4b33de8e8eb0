//! Viewer Engine
//!
//! [`ViewerEngine`] is the central coordinator: it owns the GPU context and
//! pipeline, the LOD cache and factory, the transform/animation state and
//! the gesture decoder, and exposes the public control surface (`load`,
//! zoom operations, `reset_view`, clipboard export, `destroy`).
//!
//! # Architecture
//!
//! Everything runs on the host's event/render thread except the rescale
//! worker inside [`TextureFactory`]; its results are marshalled back and
//! uploaded here. Per frame, [`render_frame`](ViewerEngine::render_frame):
//!
//! 1. advances the frame clock and any in-flight animation,
//! 2. samples memory pressure and applies its effects,
//! 3. polls the factory, evicting the old texture *before* uploading the
//!    replacement, and arms the back slot,
//! 4. swaps front ← back at the frame boundary,
//! 5. re-evaluates the LOD policy when the debounce deadline passed,
//! 6. clears, uploads the transform matrix and draws the front texture,
//! 7. emits a debug snapshot when enabled.
//!
//! # Lifecycle
//!
//! 1. Create with [`ViewerEngine::new`]
//! 2. Load an image with [`load`](ViewerEngine::load)
//! 3. Feed input via [`handle_event`](ViewerEngine::handle_event)
//! 4. Drive [`render_frame`](ViewerEngine::render_frame) from the host loop
//! 5. Tear down with [`destroy`](ViewerEngine::destroy)

use std::sync::Arc;
use std::time::{Duration, Instant};

use glam::Vec2;

use crate::animation::TransformAnimation;
use crate::clipboard::{self, Clipboard};
use crate::config::{DoubleClickMode, ViewerConfig};
use crate::errors::{LoupeError, Result};
use crate::gestures::{GestureDecoder, GestureEvent, GestureIntent};
use crate::lod::LodTable;
use crate::memory::{MemoryInfo, MemoryMonitor, MemoryPressure, budget_for_device};
use crate::render::{GpuContext, QuadPipeline};
use crate::source::{ImageDecoder, ImageSource, UrlDecoder};
use crate::texture::factory::{RescaleJob, RescaleResult, lod_target_size};
use crate::texture::{LodCache, TextureFactory};
use crate::transform::{Transform, ViewConstraints, Viewport};
use crate::utils::fps_counter::FpsCounter;

/// Debounce window between a transform change and the LOD re-evaluation it
/// triggers.
const LOD_UPDATE_DEBOUNCE: Duration = Duration::from_millis(150);

/// Scale tolerance for the 1:1 check of the double-activation toggle.
const FULL_SCALE_EPSILON: f32 = 1e-3;

/// Fired on every transform change with `(absolute_scale, relative_scale)`.
pub type ZoomCallback = Box<dyn FnMut(f32, f32)>;
/// Fired after a successful clipboard write.
pub type CopiedCallback = Box<dyn FnMut()>;
/// Fired once per frame when debug is enabled.
pub type DebugCallback = Box<dyn FnMut(&DebugSnapshot)>;

/// Per-frame state published to the host when debug is enabled.
#[derive(Debug, Clone)]
pub struct DebugSnapshot {
    pub scale: f32,
    pub relative_scale: f32,
    pub tx: f32,
    pub ty: f32,
    pub current_lod: Option<usize>,
    pub lod_count: usize,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub image_width: u32,
    pub image_height: u32,
    pub fit_scale: f32,
    pub effective_max_scale: f32,
    pub original_size_scale: f32,
    pub render_count: u64,
    pub max_texture_size: u32,
    pub user_max_scale: f32,
    pub fps: f32,
    pub frame_time_ms: f32,
    pub memory: MemoryInfo,
}

/// The interactive large-image viewer engine.
pub struct ViewerEngine {
    context: GpuContext,
    pipeline: QuadPipeline,
    config: ViewerConfig,
    lod_table: LodTable,

    viewport: Viewport,
    transform: Transform,
    animation: Option<TransformAnimation>,
    gestures: GestureDecoder,

    cache: LodCache,
    factory: TextureFactory,
    monitor: MemoryMonitor,
    fps: FpsCounter,

    source: Option<Arc<ImageSource>>,
    decoder: Box<dyn ImageDecoder>,
    clipboard: Option<Box<dyn Clipboard>>,

    bind_group: Option<wgpu::BindGroup>,
    pending_level: Option<usize>,
    lod_deadline: Option<Instant>,
    render_count: u64,
    destroyed: bool,

    on_zoom_change: Option<ZoomCallback>,
    on_image_copied: Option<CopiedCallback>,
    on_debug_update: Option<DebugCallback>,
}

impl ViewerEngine {
    /// Creates the engine over a drawable surface.
    ///
    /// `width`/`height` are the surface's physical pixel size and
    /// `pixel_ratio` the host's device pixel ratio; the logical viewport is
    /// derived from both.
    ///
    /// # Errors
    ///
    /// Fails when the configuration is invalid or no hardware-accelerated
    /// context can be acquired. There is no software fallback.
    pub async fn new(
        target: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        pixel_ratio: f32,
        config: ViewerConfig,
    ) -> Result<Self> {
        config.validate()?;

        let context = GpuContext::new(target, width, height).await?;
        let pipeline = QuadPipeline::new(&context.device, context.color_format());
        let monitor = MemoryMonitor::new(budget_for_device(context.device_type()));
        log::info!(
            "texture memory budget: {} MiB",
            monitor.budget() / (1024 * 1024)
        );

        let ratio = if pixel_ratio > 0.0 { pixel_ratio } else { 1.0 };
        let viewport = Viewport::new(width as f32 / ratio, height as f32 / ratio, ratio);

        Ok(Self {
            context,
            pipeline,
            config,
            lod_table: LodTable::default(),
            viewport,
            transform: Transform::centered(1.0),
            animation: None,
            gestures: GestureDecoder::new(),
            cache: LodCache::new(),
            factory: TextureFactory::new(),
            monitor,
            fps: FpsCounter::new(),
            source: None,
            decoder: Box::new(UrlDecoder),
            clipboard: None,
            bind_group: None,
            pending_level: None,
            lod_deadline: None,
            render_count: 0,
            destroyed: false,
            on_zoom_change: None,
            on_image_copied: None,
            on_debug_update: None,
        })
    }

    // ========================================================================
    // Host wiring
    // ========================================================================

    /// Replaces the default URL decoder.
    pub fn set_decoder(&mut self, decoder: Box<dyn ImageDecoder>) {
        self.decoder = decoder;
    }

    /// Installs a clipboard backend. Without one, clipboard export degrades
    /// to a logged warning.
    pub fn set_clipboard(&mut self, clipboard: Box<dyn Clipboard>) {
        self.clipboard = Some(clipboard);
    }

    /// Replaces the default LOD table.
    pub fn set_lod_table(&mut self, table: LodTable) {
        self.lod_table = table;
        self.schedule_lod_update(true);
    }

    pub fn set_on_zoom_change(&mut self, callback: ZoomCallback) {
        self.on_zoom_change = Some(callback);
    }

    pub fn set_on_image_copied(&mut self, callback: CopiedCallback) {
        self.on_image_copied = Some(callback);
    }

    pub fn set_on_debug_update(&mut self, callback: DebugCallback) {
        self.on_debug_update = Some(callback);
    }

    // ========================================================================
    // Public control surface
    // ========================================================================

    /// Fetches, decodes and installs an image.
    ///
    /// Selects the optimal LOD for the initial transform and creates its
    /// texture synchronously so the first frame is never blank longer than
    /// the decode.
    ///
    /// # Errors
    ///
    /// A decode failure or a bootstrap texture failure is returned to the
    /// caller; prior engine state stays untouched in the decode case.
    pub fn load(&mut self, url: &str) -> Result<()> {
        self.ensure_alive()?;

        let source = Arc::new(self.decoder.decode(url)?);

        // From here on the previous image is gone.
        self.cache.evict_all();
        self.bind_group = None;
        self.pending_level = None;
        self.animation = None;
        self.gestures.reset();
        self.source = Some(Arc::clone(&source));

        let constraints = self
            .constraints()
            .expect("source was just installed");
        let fit = constraints.fit_scale();
        let initial = (fit * self.config.initial_scale)
            .clamp(constraints.min_scale(), constraints.max_scale());
        let mut transform = Transform::centered(initial);
        if !self.config.center_on_init {
            // Keep the previous pan; the constraint rule re-centers it when
            // the new image is smaller than fit anyway.
            transform.tx = self.transform.tx;
            transform.ty = self.transform.ty;
            constraints.constrain(&mut transform);
        }
        self.transform = transform;

        self.bootstrap_front(&source, &constraints)?;
        self.fire_zoom_change();
        Ok(())
    }

    /// Zooms in by the wheel step about the viewport center.
    pub fn zoom_in(&mut self, animated: bool) {
        self.zoom_step(1.0 + self.config.wheel.step, animated);
    }

    /// Zooms out by the wheel step about the viewport center.
    pub fn zoom_out(&mut self, animated: bool) {
        self.zoom_step(1.0 - self.config.wheel.step, animated);
    }

    /// Animates back to the initial centered view.
    pub fn reset_view(&mut self) {
        if self.destroyed {
            return;
        }
        let Some(constraints) = self.constraints() else {
            return;
        };
        let initial = (constraints.fit_scale() * self.config.initial_scale)
            .clamp(constraints.min_scale(), constraints.max_scale());
        let mut target = Transform::centered(initial);
        constraints.constrain(&mut target);
        self.animate_to(target, self.config.animation_duration_ms());
    }

    /// The current absolute scale.
    #[must_use]
    pub fn scale(&self) -> f32 {
        self.transform.scale
    }

    /// The current scale relative to fit; `None` before `load`.
    #[must_use]
    pub fn relative_scale(&self) -> Option<f32> {
        self.constraints()
            .map(|c| c.relative_scale(self.transform.scale))
    }

    /// Encodes the original image as PNG and hands it to the host clipboard.
    ///
    /// Absent clipboard support is a warning, not an error; absence of a
    /// loaded image is likewise a no-op.
    pub fn copy_original_to_clipboard(&mut self) -> Result<()> {
        self.ensure_alive()?;
        let Some(source) = self.source.clone() else {
            log::warn!("clipboard export requested before load");
            return Ok(());
        };
        let Some(clipboard) = self.clipboard.as_mut() else {
            log::warn!("{}", LoupeError::ClipboardUnsupported);
            return Ok(());
        };
        let blob = clipboard::encode_png(source.pixels())?;
        clipboard.write_image(&blob)?;
        log::info!("copied original image ({}) to clipboard", source.url());
        if let Some(cb) = self.on_image_copied.as_mut() {
            cb();
        }
        Ok(())
    }

    /// Tears the engine down: clears gesture state and timers, drops the
    /// rescale worker, destroys every texture, and poisons the engine
    /// against further operations.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        log::info!("destroying viewer engine");
        self.destroyed = true;
        self.gestures.reset();
        self.animation = None;
        self.lod_deadline = None;
        self.pending_level = None;
        self.factory.shutdown();
        self.cache.evict_all();
        self.bind_group = None;
        self.source = None;
        self.on_zoom_change = None;
        self.on_image_copied = None;
        self.on_debug_update = None;
    }

    /// Whether `destroy` has run.
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    // ========================================================================
    // Input & resize
    // ========================================================================

    /// Feeds one platform-agnostic input event through the gesture decoder
    /// and applies the resulting intents.
    pub fn handle_event(&mut self, event: GestureEvent) {
        if self.destroyed {
            return;
        }
        let intents = self.gestures.handle(event, &self.config);
        for intent in intents {
            self.apply_intent(intent);
        }
    }

    /// Handles a host resize: new physical size and pixel ratio.
    pub fn resize(&mut self, width: u32, height: u32, pixel_ratio: f32) {
        if self.destroyed || width == 0 || height == 0 {
            return;
        }
        let ratio = if pixel_ratio > 0.0 { pixel_ratio } else { 1.0 };
        self.viewport = Viewport::new(width as f32 / ratio, height as f32 / ratio, ratio);
        self.reconfigure_backing_store();

        if let Some(constraints) = self.constraints() {
            constraints.constrain(&mut self.transform);
            self.fire_zoom_change();
        }
        self.schedule_lod_update(false);
    }

    // ========================================================================
    // Frame loop
    // ========================================================================

    /// Renders one frame. Drives animation, pressure sampling, texture
    /// production and the front/back swap; see the module docs for the tick
    /// order.
    pub fn render_frame(&mut self) {
        if self.destroyed {
            return;
        }
        if let Some(fps) = self.fps.update() {
            log::trace!("{fps:.1} fps");
        }

        self.step_animation();
        self.sample_pressure();
        self.drain_factory();

        if let Some(level) = self.cache.swap() {
            log::debug!("swapped to LOD {level}");
            self.rebuild_bind_group();
        }

        if self
            .lod_deadline
            .is_some_and(|deadline| Instant::now() >= deadline)
        {
            self.lod_deadline = None;
            self.evaluate_lod();
        }

        self.draw();
        self.render_count += 1;
        self.cache.touch_front();

        if self.config.debug {
            self.emit_debug_snapshot();
        }
    }

    // ========================================================================
    // Internals: transform & intents
    // ========================================================================

    fn constraints(&self) -> Option<ViewConstraints> {
        let source = self.source.as_ref()?;
        Some(ViewConstraints {
            image_width: source.width() as f32,
            image_height: source.height() as f32,
            viewport: self.viewport,
            min_rel: self.config.min_scale,
            max_rel: self.config.max_scale,
            limit_to_bounds: self.config.limit_to_bounds,
        })
    }

    fn apply_intent(&mut self, intent: GestureIntent) {
        match intent {
            GestureIntent::Interrupt => {
                // Cancelled in place: the transform stays wherever the
                // animation had advanced it.
                self.animation = None;
            }
            GestureIntent::Pan { delta } => {
                let Some(constraints) = self.constraints() else {
                    return;
                };
                let before = self.transform;
                self.transform.tx += delta.x;
                self.transform.ty += delta.y;
                constraints.constrain(&mut self.transform);
                if self.transform != before {
                    self.fire_zoom_change();
                }
            }
            GestureIntent::ZoomAbout { anchor, factor } => {
                let Some(constraints) = self.constraints() else {
                    return;
                };
                // Out-of-range results are rejected whole: no partial
                // scaling, no translation drift.
                if let Some(next) = constraints.zoom_at(&self.transform, anchor, factor) {
                    self.transform = next;
                    self.fire_zoom_change();
                    self.schedule_lod_update(false);
                }
            }
            GestureIntent::DoubleActivate { anchor } => self.double_activate(anchor),
        }
    }

    fn double_activate(&mut self, anchor: Vec2) {
        let Some(constraints) = self.constraints() else {
            return;
        };
        let target_scale = match self.config.double_click.mode {
            DoubleClickMode::Toggle => {
                if (self.transform.scale - 1.0).abs() < FULL_SCALE_EPSILON {
                    constraints.fit_scale() * self.config.initial_scale
                } else {
                    1.0
                }
            }
            DoubleClickMode::Zoom => self.transform.scale * self.config.double_click.step,
        };
        let target = constraints.zoom_to_scale_about(&self.transform, anchor, target_scale);
        self.animate_to(target, self.config.double_click_duration_ms());
    }

    fn zoom_step(&mut self, factor: f32, animated: bool) {
        if self.destroyed {
            return;
        }
        let Some(constraints) = self.constraints() else {
            return;
        };
        let center = Vec2::new(self.viewport.width * 0.5, self.viewport.height * 0.5);
        let target =
            constraints.zoom_to_scale_about(&self.transform, center, self.transform.scale * factor);
        let duration = if animated {
            self.config.animation_duration_ms()
        } else {
            0.0
        };
        self.animate_to(target, duration);
    }

    fn animate_to(&mut self, target: Transform, duration_ms: f32) {
        if target == self.transform {
            self.animation = None;
            return;
        }
        if duration_ms <= 0.0 {
            self.animation = None;
            self.transform = target;
            self.fire_zoom_change();
            self.schedule_lod_update(false);
        } else {
            self.animation = Some(TransformAnimation::new(self.transform, target, duration_ms));
        }
    }

    fn step_animation(&mut self) {
        let Some(animation) = &self.animation else {
            return;
        };
        let (transform, done) = animation.sample(Instant::now());
        self.transform = transform;
        self.fire_zoom_change();
        if done {
            self.animation = None;
            // The settled scale decides the final LOD without waiting out
            // the debounce.
            self.schedule_lod_update(true);
        }
    }

    fn fire_zoom_change(&mut self) {
        let Some(constraints) = self.constraints() else {
            return;
        };
        let absolute = self.transform.scale;
        let relative = constraints.relative_scale(absolute);
        if let Some(cb) = self.on_zoom_change.as_mut() {
            cb(absolute, relative);
        }
    }

    // ========================================================================
    // Internals: LOD policy & texture production
    // ========================================================================

    fn schedule_lod_update(&mut self, immediate: bool) {
        let delay = if immediate {
            Duration::ZERO
        } else {
            LOD_UPDATE_DEBOUNCE
        };
        self.lod_deadline = Some(Instant::now() + delay);
    }

    fn evaluate_lod(&mut self) {
        let Some(source) = self.source.clone() else {
            return;
        };
        let Some(constraints) = self.constraints() else {
            return;
        };

        let relative = constraints.relative_scale(self.transform.scale);
        let level = self.lod_table.select(relative, self.monitor.pressure());

        if self.cache.front_level() == Some(level) {
            if self.pending_level.is_some() {
                // The front already satisfies the policy; supersede whatever
                // is still in flight.
                self.cache.bump_generation();
                self.pending_level = None;
            }
            return;
        }
        if self.pending_level == Some(level) {
            // Coalesce: a request for this level is already in flight.
            return;
        }

        let lod = self.lod_table.level(level);
        let max_dim = self
            .monitor
            .pressure()
            .effective_max_texture_dimension(self.context.max_texture_dimension());
        let (width, height) = lod_target_size(
            source.width(),
            source.height(),
            lod.scale_factor,
            max_dim,
            self.monitor.per_texture_cap(),
        );

        // A newer request supersedes anything still in flight.
        let generation = self.cache.bump_generation();
        self.pending_level = Some(level);
        log::debug!("requesting LOD {level} ({width}x{height}, r={relative:.2})");

        if TextureFactory::is_direct(&source, width, height) {
            // Direct path: no staging rescale, upload the source as-is.
            self.evict_and_upload(level, source.pixels(), max_dim);
        } else {
            self.factory.submit(RescaleJob {
                generation,
                level,
                width,
                height,
                source,
            });
        }
    }

    fn drain_factory(&mut self) {
        let idle = self.animation.is_none() && !self.gestures.is_dragging();
        while let Some(result) = self.factory.poll(idle) {
            self.install_produced(result);
        }
    }

    fn install_produced(&mut self, result: RescaleResult) {
        if self.destroyed {
            return;
        }
        // Superseded by a later request (by generation) or no longer the
        // level the policy wants: drop the pixels, keep the current front.
        if result.generation != self.cache.generation()
            || self.pending_level != Some(result.level)
        {
            log::debug!("discarding stale LOD {} result", result.level);
            return;
        }

        let max_dim = self
            .monitor
            .pressure()
            .effective_max_texture_dimension(self.context.max_texture_dimension());
        let (width, height) = result.pixels.dimensions();
        if width == 0 || height == 0 || width > max_dim || height > max_dim {
            // Pressure tightened the cap while the rescale ran. Keep the
            // front and let the next policy trigger re-request.
            log::warn!("produced LOD {} no longer fits the size cap", result.level);
            self.pending_level = None;
            self.schedule_lod_update(false);
            return;
        }

        self.evict_and_upload(result.level, &result.pixels, max_dim);
    }

    /// Single-entry policy: the old texture is destroyed before the
    /// replacement is allocated, then the replacement is armed for the next
    /// frame-boundary swap.
    fn evict_and_upload(&mut self, level: usize, pixels: &image::RgbaImage, max_dim: u32) {
        self.cache.evict_all();
        self.bind_group = None;
        match TextureFactory::upload(
            &self.context.device,
            &self.context.queue,
            level,
            pixels,
            max_dim,
        ) {
            Ok(texture) => {
                self.cache.arm(texture);
                self.pending_level = None;
            }
            Err(e) => {
                log::error!("{e}");
                self.pending_level = None;
                self.schedule_lod_update(false);
            }
        }
    }

    fn bootstrap_front(
        &mut self,
        source: &Arc<ImageSource>,
        constraints: &ViewConstraints,
    ) -> Result<()> {
        let relative = constraints.relative_scale(self.transform.scale);
        let level = self.lod_table.select(relative, self.monitor.pressure());
        let max_dim = self
            .monitor
            .pressure()
            .effective_max_texture_dimension(self.context.max_texture_dimension());
        let lod = self.lod_table.level(level);
        let (width, height) = lod_target_size(
            source.width(),
            source.height(),
            lod.scale_factor,
            max_dim,
            self.monitor.per_texture_cap(),
        );

        let pixels = TextureFactory::produce_blocking(source, width, height);
        let texture = TextureFactory::upload(
            &self.context.device,
            &self.context.queue,
            level,
            &pixels,
            max_dim,
        )
        .or_else(|e| {
            // Fallback: retry at the coarsest level so load still succeeds
            // with *something* visible.
            log::warn!("bootstrap LOD {level} failed ({e}), retrying coarsest");
            let coarse = self.lod_table.level(0);
            let (w, h) = lod_target_size(
                source.width(),
                source.height(),
                coarse.scale_factor,
                max_dim,
                self.monitor.per_texture_cap(),
            );
            let pixels = TextureFactory::produce_blocking(source, w, h);
            TextureFactory::upload(&self.context.device, &self.context.queue, 0, &pixels, max_dim)
        })?;

        self.cache.install_front(texture);
        self.rebuild_bind_group();
        log::info!(
            "loaded {}x{} image, bootstrap LOD {level}",
            source.width(),
            source.height()
        );
        Ok(())
    }

    // ========================================================================
    // Internals: pressure
    // ========================================================================

    fn sample_pressure(&mut self) {
        let Some(pressure) = self.monitor.sample(self.cache.texture_bytes()) else {
            return;
        };
        log::info!("memory pressure now {pressure:?}");
        self.reconfigure_backing_store();
        self.schedule_lod_update(true);
        if pressure == MemoryPressure::Critical {
            self.emergency_cleanup();
        }
    }

    /// Critical-pressure eviction: everything but the front goes; if the
    /// front itself is already gone, its LOD is re-requested.
    fn emergency_cleanup(&mut self) {
        if self.cache.swap_armed() {
            // Mid-swap; the boundary swap will settle the cache first.
            return;
        }
        self.cache.bump_generation();
        self.pending_level = None;
        if self.cache.front().is_none() {
            self.schedule_lod_update(true);
        }
    }

    fn reconfigure_backing_store(&mut self) {
        let effective = self
            .monitor
            .pressure()
            .effective_pixel_ratio(self.viewport.pixel_ratio);
        let (width, height) = self.viewport.backing_size(effective);
        self.context.resize(width, height);
    }

    // ========================================================================
    // Internals: drawing
    // ========================================================================

    fn rebuild_bind_group(&mut self) {
        self.bind_group = self.cache.front().map(|front| {
            self.pipeline
                .create_bind_group(&self.context.device, &front.view, &front.sampler)
        });
    }

    fn draw(&mut self) {
        let frame = match self.context.surface.get_current_texture() {
            wgpu::CurrentSurfaceTexture::Success(frame)
            | wgpu::CurrentSurfaceTexture::Suboptimal(frame) => frame,
            wgpu::CurrentSurfaceTexture::Lost | wgpu::CurrentSurfaceTexture::Outdated => {
                self.context
                    .surface
                    .configure(&self.context.device, &self.context.config);
                return;
            }
            e => {
                log::debug!("surface frame unavailable: {e:?}");
                return;
            }
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        if let Some(constraints) = self.constraints() {
            self.pipeline.write_matrix(
                &self.context.queue,
                constraints.projection_matrix(&self.transform),
            );
        }

        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("loupe frame"),
            });
        self.pipeline
            .draw(&mut encoder, &view, self.bind_group.as_ref());
        self.context.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
    }

    fn emit_debug_snapshot(&mut self) {
        let Some(source) = self.source.as_ref() else {
            return;
        };
        let Some(constraints) = self.constraints() else {
            return;
        };
        let snapshot = DebugSnapshot {
            scale: self.transform.scale,
            relative_scale: constraints.relative_scale(self.transform.scale),
            tx: self.transform.tx,
            ty: self.transform.ty,
            current_lod: self.cache.front_level(),
            lod_count: self.lod_table.len(),
            canvas_width: self.context.config.width,
            canvas_height: self.context.config.height,
            image_width: source.width(),
            image_height: source.height(),
            fit_scale: constraints.fit_scale(),
            effective_max_scale: constraints.max_scale(),
            original_size_scale: 1.0,
            render_count: self.render_count,
            max_texture_size: self.context.max_texture_dimension(),
            user_max_scale: self.config.max_scale,
            fps: self.fps.current_fps,
            frame_time_ms: self.fps.last_frame_ms,
            memory: self.monitor.info(self.cache.texture_bytes()),
        };
        if let Some(cb) = self.on_debug_update.as_mut() {
            cb(&snapshot);
        }
    }

    fn ensure_alive(&self) -> Result<()> {
        if self.destroyed {
            Err(LoupeError::Destroyed)
        } else {
            Ok(())
        }
    }
}

impl Drop for ViewerEngine {
    fn drop(&mut self) {
        if !self.destroyed {
            self.destroy();
        }
    }
}
