//! Size-targeted image recompression
//!
//! The image is decoded once and re-encoded from those original pixels at
//! quality 95, 90, ... down to 10, stopping at the first encoding that fits the
//! target. If none fits, the quality-10 encoding is kept.

use crate::constants::{
    LIBDEFLATER_HEAVY_LEVEL, LIBDEFLATER_LIGHT_LEVEL, LIBDEFLATER_MEDIUM_LEVEL, MIN_QUALITY,
    OXIPNG_PRESET, PNG_LIGHT_EFFORT_MIN_QUALITY, PNG_MEDIUM_EFFORT_MIN_QUALITY, QUALITY_STEP,
    START_QUALITY,
};
use crate::error::{CompressionError, Result};
use crate::formats::ImageKind;
use crate::target::{CompressionMethod, CompressionResult, CompressionTarget};
use crate::utils::write_atomically;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ColorType, DynamicImage, GenericImageView, ImageReader};
use oxipng::{Deflaters, Options, StripChunks};
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, info};

/// Quality levels tried by the sweep, highest first: 95, 90, ..., 10.
pub fn quality_levels() -> impl Iterator<Item = u8> {
    (MIN_QUALITY..=START_QUALITY)
        .rev()
        .step_by(QUALITY_STEP as usize)
}

/// Outcome of a quality sweep
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    pub bytes: Vec<u8>,
    pub quality: u8,
    pub met: bool,
    pub attempts: usize,
}

/// Run the linear quality sweep against `target`.
///
/// `encode` is called once per level, highest quality first, and must encode
/// from the original pixels. The first encoding whose size fits wins; otherwise
/// the last (quality 10) encoding is returned with `met == false`.
pub fn search_quality<F>(target: CompressionTarget, mut encode: F) -> Result<SearchOutcome>
where
    F: FnMut(u8) -> Result<Vec<u8>>,
{
    let mut last = None;
    let mut attempts = 0;

    for quality in quality_levels() {
        let bytes = encode(quality)?;
        attempts += 1;
        debug!(quality, size = bytes.len(), target = target.bytes(), "encoded candidate");

        if target.is_met_by(bytes.len() as u64) {
            return Ok(SearchOutcome {
                bytes,
                quality,
                met: true,
                attempts,
            });
        }
        last = Some((quality, bytes));
    }

    let (quality, bytes) = last.ok_or_else(|| {
        CompressionError::Encode("quality sweep produced no candidates".to_string())
    })?;
    Ok(SearchOutcome {
        bytes,
        quality,
        met: false,
        attempts,
    })
}

/// Decodes an image from disk, guessing the format from its content.
pub fn load_image(input_path: &Path) -> Result<DynamicImage> {
    if !input_path.exists() {
        return Err(CompressionError::FileNotFound(input_path.to_path_buf()));
    }
    let img = ImageReader::open(input_path)?
        .with_guessed_format()?
        .decode()?;
    Ok(img)
}

/// Encodes one source image at arbitrary quality levels
pub struct QualityEncoder {
    kind: ImageKind,
    image: DynamicImage,
    // PNG candidates only differ in deflate effort, so the raw PNG is built once
    base_png: Option<Vec<u8>>,
}

impl QualityEncoder {
    pub fn new(image: DynamicImage, kind: ImageKind) -> Self {
        let image = match kind {
            ImageKind::Jpeg => match image.color() {
                ColorType::L8 | ColorType::Rgb8 => image,
                _ => DynamicImage::ImageRgb8(image.to_rgb8()),
            },
            ImageKind::WebP => match image.color() {
                ColorType::Rgb8 | ColorType::Rgba8 => image,
                _ if image.color().has_alpha() => DynamicImage::ImageRgba8(image.to_rgba8()),
                _ => DynamicImage::ImageRgb8(image.to_rgb8()),
            },
            ImageKind::Png => image,
        };

        Self {
            kind,
            image,
            base_png: None,
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn encode(&mut self, quality: u8) -> Result<Vec<u8>> {
        match self.kind {
            ImageKind::Jpeg => {
                let mut buf = Cursor::new(Vec::new());
                self.image
                    .write_with_encoder(JpegEncoder::new_with_quality(&mut buf, quality))?;
                Ok(buf.into_inner())
            }
            ImageKind::Png => {
                if self.base_png.is_none() {
                    let mut buf = Cursor::new(Vec::new());
                    self.image.write_with_encoder(PngEncoder::new_with_quality(
                        &mut buf,
                        CompressionType::Fast,
                        FilterType::Adaptive,
                    ))?;
                    self.base_png = Some(buf.into_inner());
                }
                let base = self.base_png.as_deref().unwrap_or_default();
                oxipng::optimize_from_memory(base, &png_options(quality))
                    .map_err(|e| CompressionError::PngOptimization(e.to_string()))
            }
            ImageKind::WebP => {
                let (width, height) = self.image.dimensions();
                // lossy libwebp encoder, quality on its 0-100 scale
                let memory = match &self.image {
                    DynamicImage::ImageRgb8(rgb) => {
                        webp::Encoder::from_rgb(rgb.as_raw(), width, height).encode(quality as f32)
                    }
                    DynamicImage::ImageRgba8(rgba) => {
                        webp::Encoder::from_rgba(rgba.as_raw(), width, height)
                            .encode(quality as f32)
                    }
                    other => {
                        return Err(CompressionError::Encode(format!(
                            "unsupported WebP pixel layout: {:?}",
                            other.color()
                        )))
                    }
                };
                Ok(memory.to_vec())
            }
        }
    }
}

/// oxipng settings for a PNG candidate; lower quality means more deflate effort.
fn png_options(quality: u8) -> Options {
    let mut options = Options::from_preset(OXIPNG_PRESET);
    options.strip = StripChunks::Safe;
    options.deflate = if quality >= PNG_LIGHT_EFFORT_MIN_QUALITY {
        Deflaters::Libdeflater {
            compression: LIBDEFLATER_LIGHT_LEVEL,
        }
    } else if quality >= PNG_MEDIUM_EFFORT_MIN_QUALITY {
        Deflaters::Libdeflater {
            compression: LIBDEFLATER_MEDIUM_LEVEL,
        }
    } else {
        Deflaters::Libdeflater {
            compression: LIBDEFLATER_HEAVY_LEVEL,
        }
    };
    options
}

/// Recompresses the image at `input_path` into `output_path` so that it fits
/// `target` if any quality level allows it.
///
/// # Returns
/// * `Ok(CompressionResult)` - the final encoding, its quality and whether it fits
/// * `Err(CompressionError::Decode)` - the source is not a decodable image;
///   nothing is written in that case
///
/// Only the chosen encoding is written, atomically, to `output_path`.
pub fn recompress_image(
    input_path: &Path,
    output_path: &Path,
    kind: ImageKind,
    target: CompressionTarget,
) -> Result<CompressionResult> {
    let img = load_image(input_path)?;
    let mut encoder = QualityEncoder::new(img, kind);
    let (width, height) = encoder.dimensions();

    let outcome = search_quality(target, |quality| encoder.encode(quality))?;
    write_atomically(output_path, &outcome.bytes)?;

    info!(
        format = %kind,
        width,
        height,
        quality = outcome.quality,
        attempts = outcome.attempts,
        size = outcome.bytes.len(),
        target = target.bytes(),
        met = outcome.met,
        "recompressed image"
    );

    Ok(CompressionResult {
        stored: output_path.to_path_buf(),
        size: outcome.bytes.len() as u64,
        method: CompressionMethod::Recompressed {
            format: kind,
            quality: outcome.quality,
            met: outcome.met,
            attempts: outcome.attempts,
        },
    })
}
