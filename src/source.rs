//! Image Source & Decoder Contract
//!
//! The engine treats decoding as an external concern behind the
//! [`ImageDecoder`] trait: given a URL, a decoder yields fully decoded RGBA8
//! pixels with known dimensions. [`UrlDecoder`] is the provided default and
//! resolves `http(s)` URLs over the network and everything else through the
//! filesystem.
//!
//! One [`ImageSource`] exists per successful `load`; it outlives every LOD
//! texture derived from it and retains the originating URL for clipboard
//! export.

use image::RgbaImage;

use crate::errors::{LoupeError, Result};

/// A fully decoded image plus its origin.
#[derive(Debug, Clone)]
pub struct ImageSource {
    /// Decoded RGBA8 pixels.
    pixels: RgbaImage,
    /// The URL the pixels were decoded from.
    url: String,
}

impl ImageSource {
    #[must_use]
    pub fn new(pixels: RgbaImage, url: impl Into<String>) -> Self {
        Self {
            pixels,
            url: url.into(),
        }
    }

    /// Intrinsic width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Intrinsic height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// The originating URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The decoded pixel buffer.
    #[must_use]
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}

/// Decoder contract: turn a URL into decoded pixels.
///
/// Implementations may block; decoding is the engine's designated suspension
/// point and happens before any texture work begins. A failure leaves the
/// engine's prior state untouched.
pub trait ImageDecoder {
    /// Fetches and decodes the image behind `url`.
    fn decode(&self, url: &str) -> Result<ImageSource>;
}

/// Default decoder: `http(s)` via [`ehttp`], anything else via the
/// filesystem, decoded with the `image` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct UrlDecoder;

impl UrlDecoder {
    fn fetch(url: &str) -> Result<Vec<u8>> {
        if url.starts_with("http://") || url.starts_with("https://") {
            let response = ehttp::fetch_blocking(&ehttp::Request::get(url)).map_err(|e| {
                LoupeError::FetchFailed {
                    url: url.to_string(),
                    reason: e,
                }
            })?;
            if !response.ok {
                return Err(LoupeError::FetchFailed {
                    url: url.to_string(),
                    reason: format!("HTTP status {}", response.status),
                });
            }
            Ok(response.bytes)
        } else {
            let path = url.strip_prefix("file://").unwrap_or(url);
            Ok(std::fs::read(path)?)
        }
    }
}

impl ImageDecoder for UrlDecoder {
    fn decode(&self, url: &str) -> Result<ImageSource> {
        let bytes = Self::fetch(url)?;
        let decoded = image::load_from_memory(&bytes)?;
        let pixels = decoded.into_rgba8();
        log::info!(
            "decoded '{}': {}x{} px",
            url,
            pixels.width(),
            pixels.height()
        );
        Ok(ImageSource::new(pixels, url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_reports_dimensions_and_url() {
        let pixels = RgbaImage::new(64, 32);
        let source = ImageSource::new(pixels, "file:///tmp/test.png");
        assert_eq!(source.width(), 64);
        assert_eq!(source.height(), 32);
        assert_eq!(source.url(), "file:///tmp/test.png");
    }

    #[test]
    fn missing_file_is_a_fetch_error() {
        let decoder = UrlDecoder;
        assert!(decoder.decode("/definitely/not/a/file.png").is_err());
    }
}
