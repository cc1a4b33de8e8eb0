//! Standalone viewer binary.
//!
//! Opens a window and views a single image with pan, wheel zoom, pinch and
//! double-click fit/1:1 toggling.
//!
//! Run: cargo run --release -- path/to/photo.jpg

use loupe::app::ViewerApp;
use loupe::config::ViewerConfig;

fn main() -> loupe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let url = std::env::args().nth(1).unwrap_or_else(|| {
        eprintln!("usage: loupe <image-url-or-path>");
        std::process::exit(2);
    });

    let config = ViewerConfig {
        debug: std::env::var_os("LOUPE_DEBUG").is_some(),
        ..Default::default()
    };

    ViewerApp::new()
        .with_title(format!("Loupe — {url}"))
        .with_config(config)
        .with_url(url)
        .run()
}
