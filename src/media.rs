use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use thiserror::Error;

/// Fixed encoding quality for portrait transcoding.
pub const JPEG_QUALITY: u8 = 90;

#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("Failed to decode image: {0}")]
    Decode(#[source] image::ImageError),
    #[error("Failed to encode JPEG: {0}")]
    Encode(#[source] image::ImageError),
}

/// Sniff a media type from magic bytes.
pub fn detect_mime_type(data: &[u8]) -> Option<String> {
    infer::get(data).map(|kind| kind.mime_type().to_string())
}

/// Re-encode a bitmap buffer (PNG as produced by the image model, but any
/// supported source encoding works) as JPEG at the given quality. JPEG has
/// no alpha channel, so the pixels are flattened to RGB first.
pub fn transcode_to_jpeg(data: &[u8], quality: u8) -> Result<Vec<u8>, TranscodeError> {
    let decoded = image::load_from_memory(data).map_err(TranscodeError::Decode)?;
    let rgb = DynamicImage::ImageRgb8(decoded.to_rgb8());

    let mut jpeg = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut jpeg, quality);
    rgb.write_with_encoder(encoder).map_err(TranscodeError::Encode)?;
    Ok(jpeg)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use image::{ImageFormat, Rgba, RgbaImage};

    use super::*;

    fn png_fixture(width: u32, height: u32, alpha: u8) -> Vec<u8> {
        let pixels = RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x % 256) as u8, (y % 256) as u8, 128, alpha])
        });
        let mut png = Vec::new();
        DynamicImage::ImageRgba8(pixels)
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .expect("encode png fixture");
        png
    }

    #[test]
    fn png_round_trips_to_nonempty_jpeg() {
        let jpeg = transcode_to_jpeg(&png_fixture(32, 24, 255), JPEG_QUALITY).expect("transcode");
        assert!(!jpeg.is_empty());
        // JPEG SOI marker
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
        assert_eq!(detect_mime_type(&jpeg).as_deref(), Some("image/jpeg"));
    }

    #[test]
    fn transparent_source_is_flattened_rather_than_rejected() {
        let jpeg = transcode_to_jpeg(&png_fixture(16, 16, 0), JPEG_QUALITY).expect("transcode");
        assert!(!jpeg.is_empty());
    }

    #[test]
    fn garbage_input_is_a_decode_error() {
        let err = transcode_to_jpeg(b"definitely not a bitmap", JPEG_QUALITY).expect_err("decode");
        assert!(matches!(err, TranscodeError::Decode(_)));
        assert!(err.to_string().starts_with("Failed to decode image"));
    }

    #[test]
    fn sniffs_png_magic_bytes() {
        assert_eq!(
            detect_mime_type(&png_fixture(4, 4, 255)).as_deref(),
            Some("image/png")
        );
        assert_eq!(detect_mime_type(b"plain text"), None);
    }
}
