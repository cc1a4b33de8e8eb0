//! Winit-based Application Frame
//!
//! A minimal host for the viewer engine built on the
//! [winit](https://crates.io/crates/winit) event loop: it creates the
//! window, constructs the engine over it, translates input events through
//! [`input_adapter`], and drives [`render_frame`](crate::engine::ViewerEngine::render_frame)
//! on every redraw.
//!
//! The engine core never touches winit; hosts embedding the viewer in their
//! own window simply construct [`ViewerEngine`] directly and feed it
//! [`GestureEvent`](crate::gestures::GestureEvent)s themselves.
//!
//! # Example
//!
//! ```rust,ignore
//! use loupe::app::ViewerApp;
//! use loupe::config::ViewerConfig;
//!
//! fn main() -> loupe::Result<()> {
//!     ViewerApp::new()
//!         .with_title("Loupe")
//!         .with_url("photo.jpg")
//!         .run()
//! }
//! ```

pub mod input_adapter;

use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::config::ViewerConfig;
use crate::engine::ViewerEngine;
use crate::errors::Result;
use self::input_adapter::WinitInputAdapter;

/// Application builder for a standalone viewer window.
pub struct ViewerApp {
    title: String,
    config: ViewerConfig,
    url: Option<String>,
}

impl ViewerApp {
    #[must_use]
    pub fn new() -> Self {
        Self {
            title: "Loupe".into(),
            config: ViewerConfig::default(),
            url: None,
        }
    }

    /// Sets the window title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the viewer configuration.
    #[must_use]
    pub fn with_config(mut self, config: ViewerConfig) -> Self {
        self.config = config;
        self
    }

    /// Image URL (or file path) to load once the window exists.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Runs the event loop. Blocks until the window closes.
    pub fn run(self) -> Result<()> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut runner = AppRunner {
            title: self.title,
            config: self.config,
            url: self.url,
            window: None,
            engine: None,
            input: WinitInputAdapter::new(),
        };
        event_loop.run_app(&mut runner)?;
        Ok(())
    }
}

impl Default for ViewerApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Internal winit `ApplicationHandler`.
struct AppRunner {
    title: String,
    config: ViewerConfig,
    url: Option<String>,

    window: Option<Arc<Window>>,
    engine: Option<ViewerEngine>,
    input: WinitInputAdapter,
}

impl AppRunner {
    fn scale_factor(&self) -> f32 {
        self.window
            .as_ref()
            .map_or(1.0, |w| w.scale_factor() as f32)
    }
}

impl ApplicationHandler for AppRunner {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attributes = Window::default_attributes()
            .with_title(&self.title)
            .with_inner_size(winit::dpi::LogicalSize::new(1280.0, 720.0));

        let window = event_loop
            .create_window(window_attributes)
            .expect("Failed to create window");
        let window = Arc::new(window);
        self.window = Some(window.clone());

        log::info!("Initializing viewer engine...");

        let size = window.inner_size();
        let scale_factor = window.scale_factor() as f32;
        let engine = pollster::block_on(ViewerEngine::new(
            window.clone(),
            size.width.max(1),
            size.height.max(1),
            scale_factor,
            self.config.clone(),
        ));

        let mut engine = match engine {
            Ok(engine) => engine,
            Err(e) => {
                log::error!("Fatal engine error: {e}");
                event_loop.exit();
                return;
            }
        };

        if let Some(url) = self.url.take()
            && let Err(e) = engine.load(&url)
        {
            log::error!("failed to load '{url}': {e}");
        }

        self.engine = Some(engine);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let scale_factor = self.scale_factor();
        let Some(engine) = &mut self.engine else {
            return;
        };

        if let Some(gesture) = self.input.translate(&event, scale_factor) {
            engine.handle_event(gesture);
        }

        match event {
            WindowEvent::CloseRequested => {
                engine.destroy();
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                engine.resize(physical_size.width, physical_size.height, scale_factor);
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                if let Some(window) = &self.window {
                    let size = window.inner_size();
                    engine.resize(size.width, size.height, scale_factor as f32);
                }
            }
            WindowEvent::RedrawRequested => {
                engine.render_frame();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if self.engine.is_some()
            && let Some(window) = &self.window
        {
            window.request_redraw();
        }
    }
}
