//! Image acquisition and normalization
//!
//! Turns raw request payloads (base64 strings or uploaded bytes) into
//! model-ready tensors of shape `[1, H, W, 3]` with values in `[0, 1]`.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use candle_core::{Device, Tensor};
use image::imageops::FilterType;
use image::ImageFormat;
use tomascan_core::{Error, Result};

/// Decode a base64 image payload, stripping any `data:image/...;base64,`
/// prefix first.
pub fn decode_image_payload(payload: &str) -> Result<Vec<u8>> {
    if payload.is_empty() {
        return Err(Error::validation("Empty image data"));
    }

    let encoded = match payload.split_once(',') {
        Some((prefix, rest)) if prefix.starts_with("data:image") => rest,
        _ => payload,
    };

    let bytes = BASE64
        .decode(encoded)
        .map_err(|e| Error::validation(format!("Failed to decode image: {e}")))?;

    if bytes.is_empty() {
        return Err(Error::validation("Invalid base64 image data"));
    }

    Ok(bytes)
}

/// Decode image bytes and normalize them into a `[1, H, W, 3]` tensor.
///
/// Any color mode is flattened to 3-channel RGB (alpha is dropped, not
/// composited), the image is stretched to exactly `target_size` without
/// preserving aspect ratio, and integer pixel values are scaled to
/// `[0.0, 1.0]` by uniform division. Pure function of its input.
pub fn normalize_image(bytes: &[u8], target_size: (u32, u32), device: &Device) -> Result<Tensor> {
    if bytes.is_empty() {
        return Err(Error::validation("Image data cannot be empty"));
    }

    let decoded = image::load_from_memory(bytes)
        .map_err(|e| Error::validation(format!("Failed to decode image: {e}")))?;

    let (width, height) = target_size;
    let rgb = decoded
        .resize_exact(width, height, FilterType::Triangle)
        .to_rgb8();

    let pixels: Vec<f32> = rgb.into_raw().into_iter().map(|v| v as f32 / 255.0).collect();

    Tensor::from_vec(pixels, (1, height as usize, width as usize, 3), device)
        .map_err(|e| Error::inference(format!("Failed to build input tensor: {e}")))
}

/// Sniff the content type of image bytes for the hosted inference API.
///
/// Unknown or undetectable formats default to JPEG.
pub fn sniff_content_type(bytes: &[u8]) -> &'static str {
    match image::guess_format(bytes) {
        Ok(ImageFormat::Png) => "image/png",
        Ok(ImageFormat::Gif) => "image/gif",
        Ok(ImageFormat::Bmp) => "image/bmp",
        _ => "image/jpeg",
    }
}
