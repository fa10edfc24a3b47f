//! Decoding of captured photographs and small file helpers.
//!
//! - `decode_data_url`: `data:image/...;base64,...` payload into a raster.
//! - `decode_image_bytes`: PNG/JPEG bytes into a raster.
//! - `EncodedImage`: either of the above, decoded on demand.
//! - `encode_png_data_url`: the reverse, for building requests.
//! - `load_raster_image`: read an image file from disk.
//! - `save_grayscale_u8`: write an 8-bit gray buffer to a PNG.
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::raster::{RasterImage, RgbaImageU8};
use super::u8::GrayImageU8;
use crate::error::OmrError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::{DynamicImage, GrayImage};
use serde::Serialize;
use std::fs;
use std::io::Cursor;
use std::path::Path;

/// A photograph as delivered by the capture side, not yet decoded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EncodedImage {
    DataUrl(String),
    Bytes(Vec<u8>),
}

impl EncodedImage {
    pub fn decode(&self) -> Result<RasterImage, OmrError> {
        match self {
            EncodedImage::DataUrl(url) => decode_data_url(url),
            EncodedImage::Bytes(bytes) => decode_image_bytes(bytes),
        }
    }
}

/// Decode a `data:` URL carrying a base64 payload.
pub fn decode_data_url(url: &str) -> Result<RasterImage, OmrError> {
    let rest = url
        .trim()
        .strip_prefix("data:")
        .ok_or_else(|| OmrError::Decode("not a data URL".to_string()))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| OmrError::Decode("data URL has no payload".to_string()))?;
    if !meta.ends_with(";base64") {
        return Err(OmrError::Decode(format!(
            "unsupported data URL encoding '{meta}'"
        )));
    }
    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| OmrError::Decode(format!("invalid base64 payload: {e}")))?;
    decode_image_bytes(&bytes)
}

/// Decode an encoded raster (PNG, JPEG) held in memory.
pub fn decode_image_bytes(bytes: &[u8]) -> Result<RasterImage, OmrError> {
    let img = image::load_from_memory(bytes).map_err(|e| OmrError::Decode(e.to_string()))?;
    from_dynamic(img)
}

/// Encode a grayscale buffer as a `data:image/png;base64,` URL.
pub fn encode_png_data_url(buffer: &GrayImageU8) -> Result<String, String> {
    let gray = GrayImage::from_raw(
        buffer.width() as u32,
        buffer.height() as u32,
        buffer.data().to_vec(),
    )
    .ok_or_else(|| "Failed to create image buffer".to_string())?;
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageLuma8(gray)
        .write_to(&mut out, image::ImageFormat::Png)
        .map_err(|e| format!("Failed to encode PNG: {e}"))?;
    Ok(format!(
        "data:image/png;base64,{}",
        STANDARD.encode(out.into_inner())
    ))
}

/// Load an image file from disk, keeping grayscale sources single-channel.
pub fn load_raster_image(path: &Path) -> Result<RasterImage, String> {
    let img = image::open(path).map_err(|e| format!("Failed to open {}: {e}", path.display()))?;
    from_dynamic(img).map_err(|e| format!("Failed to read {}: {e}", path.display()))
}

fn from_dynamic(img: DynamicImage) -> Result<RasterImage, OmrError> {
    let (w, h) = (img.width() as usize, img.height() as usize);
    let raster = match img {
        DynamicImage::ImageLuma8(gray) => {
            GrayImageU8::from_raw(w, h, gray.into_raw()).map(RasterImage::Gray)
        }
        other => RgbaImageU8::from_raw(w, h, other.into_rgba8().into_raw()).map(RasterImage::Rgba),
    };
    raster.ok_or_else(|| OmrError::Decode(format!("unexpected buffer size for {w}x{h} image")))
}

/// Save an 8-bit grayscale buffer to a PNG.
pub fn save_grayscale_u8(buffer: &GrayImageU8, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let image = GrayImage::from_raw(
        buffer.width() as u32,
        buffer.height() as u32,
        buffer.data().to_vec(),
    )
    .ok_or_else(|| "Failed to create image buffer".to_string())?;
    DynamicImage::ImageLuma8(image)
        .save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(img: DynamicImage) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png)
            .expect("png encoding");
        out.into_inner()
    }

    #[test]
    fn decodes_grayscale_png_as_gray() {
        let gray = GrayImage::from_pixel(7, 5, image::Luma([200]));
        let bytes = png_bytes(DynamicImage::ImageLuma8(gray));
        let raster = decode_image_bytes(&bytes).expect("decode");
        assert!(matches!(raster, RasterImage::Gray(_)));
        assert_eq!((raster.width(), raster.height()), (7, 5));
    }

    #[test]
    fn decodes_base64_data_url() {
        let rgb = image::RgbImage::from_pixel(4, 3, image::Rgb([10, 20, 30]));
        let bytes = png_bytes(DynamicImage::ImageRgb8(rgb));
        let url = format!("data:image/png;base64,{}", STANDARD.encode(bytes));
        let raster = decode_data_url(&url).expect("decode");
        match raster {
            RasterImage::Rgba(img) => assert_eq!(img.pixel(0, 0), [10, 20, 30, 255]),
            other => panic!("expected rgba raster, got {other:?}"),
        }
    }

    #[test]
    fn png_data_url_round_trips_gray_pixels() {
        let mut gray = GrayImageU8::filled(6, 4, 255);
        gray.set(2, 1, 17);
        let url = encode_png_data_url(&gray).expect("encode");
        assert!(url.starts_with("data:image/png;base64,"));
        let decoded = EncodedImage::DataUrl(url).decode().expect("decode");
        assert_eq!(decoded, RasterImage::Gray(gray));
    }

    #[test]
    fn rejects_malformed_payloads() {
        assert!(matches!(
            decode_data_url("image/png;base64,AAAA"),
            Err(OmrError::Decode(_))
        ));
        assert!(matches!(
            decode_data_url("data:image/png;base64,@@@"),
            Err(OmrError::Decode(_))
        ));
        assert!(matches!(
            decode_image_bytes(b"definitely not an image"),
            Err(OmrError::Decode(_))
        ));
    }
}
