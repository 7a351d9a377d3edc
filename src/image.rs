//
// image.rs
// Crop-Health-rs
//
// Decodes uploaded image bytes and reduces them to a stride-sampled HSL pixel set, with a bounded async decode wait.
//
// Thales Matheus Mendonça Santos - November 2025

use std::io::Cursor;
use std::time::Duration;

use image::{DynamicImage, GenericImageView, ImageReader, Limits};
use tracing::debug;

use crate::color::{rgb_to_hsl, Hsl};
use crate::errors::{AnalysisError, AnalysisResult};

/// Uniformly spaced subset of an image's pixels, already converted to HSL.
#[derive(Debug, Clone)]
pub struct PixelSample {
    pub width: u32,
    pub height: u32,
    pub stride: usize,
    pub pixels: Vec<Hsl>,
}

impl PixelSample {
    /// Sample every `stride`-th pixel in row-major order.
    pub fn from_image(image: &DynamicImage, stride: usize) -> Self {
        let stride = stride.max(1);
        let (width, height) = image.dimensions();
        let rgba = image.to_rgba8();

        let pixels = rgba
            .pixels()
            .step_by(stride)
            .map(|px| rgb_to_hsl(px[0], px[1], px[2]))
            .collect();

        Self {
            width,
            height,
            stride,
            pixels,
        }
    }

    /// Build a sample directly from RGB triples, bypassing any codec.
    pub fn from_rgb<I>(pixels: I) -> Self
    where
        I: IntoIterator<Item = (u8, u8, u8)>,
    {
        let pixels: Vec<Hsl> = pixels
            .into_iter()
            .map(|(r, g, b)| rgb_to_hsl(r, g, b))
            .collect();
        Self {
            width: pixels.len() as u32,
            height: 1,
            stride: 1,
            pixels,
        }
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }
}

/// Largest width or height accepted from an upload.
pub const MAX_IMAGE_DIMENSION: u32 = 12_000;

/// Decode raw bytes with whatever codec the `image` crate detects.
pub fn decode(bytes: &[u8]) -> AnalysisResult<DynamicImage> {
    decode_within(bytes, MAX_IMAGE_DIMENSION)
}

fn decode_within(bytes: &[u8], max_dimension: u32) -> AnalysisResult<DynamicImage> {
    let mut limits = Limits::default();
    limits.max_image_width = Some(max_dimension);
    limits.max_image_height = Some(max_dimension);

    let mut reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| AnalysisError::DecodeFailure(e.to_string()))?;
    reader.limits(limits);
    let img = reader
        .decode()
        .map_err(|e| AnalysisError::DecodeFailure(e.to_string()))?;

    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(AnalysisError::DecodeFailure(
            "image has no pixels".to_string(),
        ));
    }
    Ok(img)
}

/// Decode and sample in one step on the calling thread.
pub fn decode_sample(bytes: &[u8], stride: usize) -> AnalysisResult<PixelSample> {
    let img = decode(bytes)?;
    let sample = PixelSample::from_image(&img, stride);
    debug!(
        width = sample.width,
        height = sample.height,
        sampled = sample.len(),
        "decoded image sample"
    );
    Ok(sample)
}

/// Decode on the blocking pool and give up after `wait`; an expired wait is a decode failure.
pub async fn decode_sample_with_timeout(
    bytes: Vec<u8>,
    stride: usize,
    wait: Duration,
) -> AnalysisResult<PixelSample> {
    // The blocking task is not cancelled on timeout; it finishes in the background,
    // bounded by MAX_IMAGE_DIMENSION.
    let task = tokio::task::spawn_blocking(move || decode_sample(&bytes, stride));

    match tokio::time::timeout(wait, task).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_err)) => Err(AnalysisError::DecodeFailure(format!(
            "decoder task failed: {join_err}"
        ))),
        Err(_) => Err(AnalysisError::DecodeFailure(format!(
            "image decode exceeded {} ms",
            wait.as_millis()
        ))),
    }
}
