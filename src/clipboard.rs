//! Clipboard Contract
//!
//! The host owns the actual clipboard; the engine only hands it an encoded
//! image blob keyed by MIME type. Hosts without clipboard support simply do
//! not install a backend, which degrades `copy_original_to_clipboard` to a
//! logged warning.

use image::RgbaImage;

use crate::errors::{LoupeError, Result};

/// An encoded image ready for the host clipboard.
#[derive(Debug, Clone)]
pub struct ImageBlob {
    /// MIME type of `bytes`, e.g. `image/png`.
    pub mime: &'static str,
    /// Encoded image bytes.
    pub bytes: Vec<u8>,
}

/// Host clipboard seam.
pub trait Clipboard {
    /// Writes an image blob to the clipboard.
    fn write_image(&mut self, blob: &ImageBlob) -> Result<()>;
}

/// Encodes the original pixels as a PNG blob for clipboard export.
pub fn encode_png(pixels: &RgbaImage) -> Result<ImageBlob> {
    let mut bytes = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut bytes);
    image::ImageEncoder::write_image(
        encoder,
        pixels.as_raw(),
        pixels.width(),
        pixels.height(),
        image::ExtendedColorType::Rgba8,
    )
    .map_err(|e| LoupeError::EncodeFailed(e.to_string()))?;
    Ok(ImageBlob {
        mime: "image/png",
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_a_png_signature() {
        let pixels = RgbaImage::new(4, 4);
        let blob = encode_png(&pixels).unwrap();
        assert_eq!(blob.mime, "image/png");
        assert_eq!(&blob.bytes[..8], b"\x89PNG\r\n\x1a\n");
    }
}
