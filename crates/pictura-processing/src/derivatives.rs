//! Derivative generation
//!
//! From one decoded original the generator produces two families of
//! derivatives, in a fixed order that the stored descriptor list preserves:
//!
//! - scaled variants, one per configured target width in descending order,
//!   generated only when the source is strictly wider than the target;
//! - one square thumbnail, center-cropped then downscaled, generated only
//!   when both source dimensions strictly exceed the square size.

use bytes::Bytes;
use image::{DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;
use thiserror::Error;

use pictura_core::{AppError, Derivative};

use crate::identity::derivative_path;

/// Decode failure, discriminated so callers can tell an unrecognized format
/// from data that looked like an image but did not decode.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("unsupported or unrecognized image format")]
    UnsupportedFormat,

    #[error("corrupt image data: {0}")]
    CorruptData(String),
}

impl From<DecodeError> for AppError {
    fn from(err: DecodeError) -> Self {
        AppError::ImageDecode(err.to_string())
    }
}

/// Decode image bytes, guessing the format from the content.
pub fn decode_image(data: &[u8]) -> Result<DynamicImage, DecodeError> {
    let reader = image::ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptData(e.to_string()))?;

    if reader.format().is_none() {
        return Err(DecodeError::UnsupportedFormat);
    }

    reader
        .decode()
        .map_err(|e| DecodeError::CorruptData(e.to_string()))
}

/// Output format for a derivative, chosen from the original's extension.
fn format_for_extension(extension: &str) -> ImageFormat {
    match extension {
        "png" => ImageFormat::Png,
        "gif" => ImageFormat::Gif,
        _ => ImageFormat::Jpeg,
    }
}

/// Select a resampling filter based on how far the image is being scaled
/// down; heavier downscales tolerate cheaper filters.
fn select_filter(
    orig_width: u32,
    orig_height: u32,
    new_width: u32,
    new_height: u32,
) -> image::imageops::FilterType {
    let width_ratio = orig_width as f32 / new_width as f32;
    let height_ratio = orig_height as f32 / new_height as f32;
    let max_ratio = width_ratio.max(height_ratio);

    if max_ratio > 2.0 {
        image::imageops::FilterType::Triangle
    } else if max_ratio > 1.5 {
        image::imageops::FilterType::CatmullRom
    } else {
        image::imageops::FilterType::Lanczos3
    }
}

/// A derivative produced in memory, ready to be written by the media store.
#[derive(Debug, Clone)]
pub struct GeneratedDerivative {
    pub label: String,
    pub path: String,
    pub data: Bytes,
}

impl GeneratedDerivative {
    pub fn descriptor(&self) -> Derivative {
        Derivative {
            label: self.label.clone(),
            path: self.path.clone(),
        }
    }
}

/// Derivative generator with a fixed size contract.
pub struct DerivativeGenerator {
    scaled_widths: Vec<u32>,
    thumbnail_square: u32,
}

impl DerivativeGenerator {
    pub fn new(scaled_widths: Vec<u32>, thumbnail_square: u32) -> Self {
        Self {
            scaled_widths,
            thumbnail_square,
        }
    }

    /// Generate the full derivative set for a decoded original whose stored
    /// path stem is `root` and extension is `extension` (lower-cased).
    /// Ordering is scale-descending first, thumbnail last.
    pub fn generate(
        &self,
        img: &DynamicImage,
        root: &str,
        extension: &str,
    ) -> anyhow::Result<Vec<GeneratedDerivative>> {
        let format = format_for_extension(extension);
        let (src_width, src_height) = img.dimensions();
        let mut out = Vec::new();

        for &target_width in &self.scaled_widths {
            if src_width > target_width {
                out.push(self.scaled_variant(img, root, extension, format, target_width)?);
            }
        }

        if src_width > self.thumbnail_square && src_height > self.thumbnail_square {
            out.push(self.square_thumbnail(img, root, extension, format)?);
        }

        tracing::debug!(
            src_width,
            src_height,
            count = out.len(),
            "Derivative set generated"
        );

        Ok(out)
    }

    fn scaled_variant(
        &self,
        img: &DynamicImage,
        root: &str,
        extension: &str,
        format: ImageFormat,
        target_width: u32,
    ) -> anyhow::Result<GeneratedDerivative> {
        let (src_width, src_height) = img.dimensions();
        let target_height = scaled_height(src_width, src_height, target_width);

        let filter = select_filter(src_width, src_height, target_width, target_height);
        let resized = img.resize_exact(target_width, target_height, filter);

        let label = format!("{}x{}", target_width, target_height);
        let path = derivative_path(root, &label, extension);
        let data = encode(&resized, format)?;

        Ok(GeneratedDerivative { label, path, data })
    }

    /// Center-crop the longer dimension down to the shorter one, then scale
    /// the resulting square to the thumbnail size.
    fn square_thumbnail(
        &self,
        img: &DynamicImage,
        root: &str,
        extension: &str,
        format: ImageFormat,
    ) -> anyhow::Result<GeneratedDerivative> {
        let square = self.thumbnail_square;

        let cropped = centered_square(img);
        let side = cropped.width();
        let filter = select_filter(side, side, square, square);
        let thumbnail = cropped.resize_exact(square, square, filter);

        let label = format!("{}x{}", square, square);
        let path = derivative_path(root, &label, extension);
        let data = encode(&thumbnail, format)?;

        Ok(GeneratedDerivative { label, path, data })
    }
}

/// Crop the longer dimension down to the shorter one, exactly centered: the
/// crop removes floor(diff/2) pixels from the start and ceil(diff/2) from the
/// end. An already-square image is returned unchanged.
fn centered_square(img: &DynamicImage) -> DynamicImage {
    let (width, height) = img.dimensions();
    if width < height {
        let diff = height - width;
        img.crop_imm(0, diff / 2, width, width)
    } else if width > height {
        let diff = width - height;
        img.crop_imm(diff / 2, 0, height, height)
    } else {
        img.clone()
    }
}

/// Aspect-preserving height for a target width, rounded to nearest.
pub fn scaled_height(src_width: u32, src_height: u32, target_width: u32) -> u32 {
    let height =
        (target_width as u64 * src_height as u64) as f64 / src_width as f64;
    (height.round() as u32).max(1)
}

fn encode(img: &DynamicImage, format: ImageFormat) -> anyhow::Result<Bytes> {
    let (width, height) = img.dimensions();
    let mut buffer = Vec::with_capacity((width as u64 * height as u64 * 3) as usize);
    let mut cursor = Cursor::new(&mut buffer);

    // The JPEG encoder rejects alpha channels.
    if format == ImageFormat::Jpeg && img.color().has_alpha() {
        DynamicImage::ImageRgb8(img.to_rgb8()).write_to(&mut cursor, format)?;
    } else {
        img.write_to(&mut cursor, format)?;
    }

    Ok(Bytes::from(buffer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn generator() -> DerivativeGenerator {
        DerivativeGenerator::new(vec![1200, 992, 768, 576], 150)
    }

    fn solid_image(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            width,
            height,
            Rgba([120, 30, 200, 255]),
        ))
    }

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let mut buffer = Vec::new();
        solid_image(width, height)
            .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
            .unwrap();
        buffer
    }

    #[test]
    fn test_decode_valid_png() {
        let img = decode_image(&png_bytes(10, 10)).unwrap();
        assert_eq!(img.dimensions(), (10, 10));
    }

    #[test]
    fn test_decode_unrecognized_format() {
        let result = decode_image(b"definitely not an image");
        assert!(matches!(result, Err(DecodeError::UnsupportedFormat)));
    }

    #[test]
    fn test_decode_corrupt_data() {
        // Valid PNG signature followed by garbage.
        let mut data = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        data.extend_from_slice(&[0xFF; 32]);
        let result = decode_image(&data);
        assert!(matches!(result, Err(DecodeError::CorruptData(_))));
    }

    #[test]
    fn test_scaled_height_rounding() {
        // 1200 * 1200 / 1600 = 900 exactly
        assert_eq!(scaled_height(1600, 1200, 1200), 900);
        // 992 * 1200 / 1600 = 744 exactly
        assert_eq!(scaled_height(1600, 1200, 992), 744);
        // 576 * 999 / 1000 = 575.424 -> 575
        assert_eq!(scaled_height(1000, 999, 576), 575);
        // 576 * 1001 / 1000 = 576.576 -> 577
        assert_eq!(scaled_height(1000, 1001, 576), 577);
    }

    #[test]
    fn test_full_set_for_large_source() {
        let img = solid_image(1600, 1200);
        let set = generator().generate(&img, "2024/06/abc", "jpg").unwrap();

        let labels: Vec<&str> = set.iter().map(|d| d.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["1200x900", "992x744", "768x576", "576x432", "150x150"]
        );
        // Paths follow the {root}-{label}.{ext} template exactly.
        for d in &set {
            assert_eq!(d.path, format!("2024/06/abc-{}.jpg", d.label));
        }
    }

    #[test]
    fn test_no_derivatives_for_small_source() {
        let img = solid_image(100, 100);
        let set = generator().generate(&img, "2024/06/abc", "png").unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_no_thumbnail_at_exact_square_size() {
        // 150x150 does not strictly exceed the square size.
        let img = solid_image(150, 150);
        let set = generator().generate(&img, "2024/06/abc", "png").unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_thumbnail_only_for_mid_size_source() {
        let img = solid_image(400, 300);
        let set = generator().generate(&img, "2024/06/abc", "png").unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set[0].label, "150x150");

        let thumb = decode_image(&set[0].data).unwrap();
        assert_eq!(thumb.dimensions(), (150, 150));
    }

    /// 301x150 source with the exact center column marked white.
    fn wide_marked_image() -> DynamicImage {
        let mut raw = RgbaImage::from_pixel(301, 150, Rgba([0, 0, 0, 255]));
        for y in 0..150 {
            raw.put_pixel(150, y, Rgba([255, 255, 255, 255]));
        }
        DynamicImage::ImageRgba8(raw)
    }

    #[test]
    fn test_crop_split_is_floor_ceil() {
        // Wide 301x150 source: diff = 151, the crop must remove 75 px from
        // the left and 76 from the right, never a lopsided split.
        let cropped = centered_square(&wide_marked_image());
        assert_eq!(cropped.dimensions(), (150, 150));
        // Center column of the source lands at x = 150 - 75 = 75.
        assert_eq!(
            cropped.to_rgba8().get_pixel(75, 0),
            &Rgba([255, 255, 255, 255])
        );

        // Tall orientation crops the vertical axis the same way.
        let mut raw = RgbaImage::from_pixel(150, 301, Rgba([0, 0, 0, 255]));
        for x in 0..150 {
            raw.put_pixel(x, 150, Rgba([255, 255, 255, 255]));
        }
        let cropped = centered_square(&DynamicImage::ImageRgba8(raw));
        assert_eq!(cropped.dimensions(), (150, 150));
        assert_eq!(
            cropped.to_rgba8().get_pixel(0, 75),
            &Rgba([255, 255, 255, 255])
        );
    }

    #[test]
    fn test_generated_thumbnail_is_centered() {
        // End to end through generate: 301 is narrower than every scaled
        // width, so only the thumbnail comes out, and the cropped side
        // already equals the square size.
        let set = generator()
            .generate(&wide_marked_image(), "2024/06/abc", "png")
            .unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set[0].label, "150x150");

        let thumb = decode_image(&set[0].data).unwrap().to_rgba8();
        // The marked center column survives at x = 75; the left edge stays
        // part of the black background.
        assert!(thumb.get_pixel(75, 0)[0] > 200);
        assert!(thumb.get_pixel(0, 0)[0] < 50);
    }

    #[test]
    fn test_derivatives_decode_back() {
        let img = solid_image(800, 600);
        let set = generator().generate(&img, "2024/06/abc", "png").unwrap();

        assert_eq!(set.len(), 3); // 768, 576, thumbnail
        let first = decode_image(&set[0].data).unwrap();
        assert_eq!(first.dimensions(), (768, 576));
        let second = decode_image(&set[1].data).unwrap();
        assert_eq!(second.dimensions(), (576, 432));
    }

    #[test]
    fn test_jpeg_encode_drops_alpha() {
        let img = solid_image(200, 160);
        let set = generator().generate(&img, "2024/06/abc", "jpg").unwrap();
        assert_eq!(set.len(), 1);
        let thumb = decode_image(&set[0].data).unwrap();
        assert_eq!(thumb.dimensions(), (150, 150));
    }
}
