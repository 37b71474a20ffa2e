//! EXIF summary extraction
//!
//! The gallery presents three EXIF-derived values next to a photo: focal
//! length, aperture and capture time. Each is looked up explicitly and
//! defaults to `None`; nothing else from the EXIF block is carried around.

use chrono::NaiveDateTime;
use exif::{In, Tag, Value};
use pictura_core::ExifSummary;
use std::io::Cursor;

/// Extract the presentation summary from image bytes. Images without EXIF
/// data (or with unreadable EXIF) yield the all-`None` default.
pub fn extract_summary(data: &[u8]) -> ExifSummary {
    let mut cursor = Cursor::new(data);
    let exif = match exif::Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif,
        Err(_) => return ExifSummary::default(),
    };

    ExifSummary {
        focal_length_mm: rational_value(&exif, Tag::FocalLength).map(|v| v as u32),
        f_number: rational_value(&exif, Tag::FNumber).map(|v| (v * 10.0).round() / 10.0),
        captured_at: capture_time(&exif),
    }
}

fn rational_value(exif: &exif::Exif, tag: Tag) -> Option<f64> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    match &field.value {
        Value::Rational(r) if !r.is_empty() && r[0].denom != 0 => Some(r[0].to_f64()),
        _ => None,
    }
}

/// Capture timestamp, preferring DateTimeOriginal over DateTime. EXIF
/// datetimes are `YYYY:MM:DD HH:MM:SS` with no timezone.
fn capture_time(exif: &exif::Exif) -> Option<NaiveDateTime> {
    for tag in [Tag::DateTimeOriginal, Tag::DateTime] {
        let Some(field) = exif.get_field(tag, In::PRIMARY) else {
            continue;
        };
        let Value::Ascii(ref values) = field.value else {
            continue;
        };
        let Some(raw) = values.first() else {
            continue;
        };
        let Ok(text) = std::str::from_utf8(raw) else {
            continue;
        };
        if let Ok(dt) = NaiveDateTime::parse_from_str(text.trim(), "%Y:%m:%d %H:%M:%S") {
            return Some(dt);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};

    fn plain_png() -> Vec<u8> {
        let img = RgbaImage::from_pixel(8, 8, Rgba([1, 2, 3, 255]));
        let mut buffer = Vec::new();
        img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
            .unwrap();
        buffer
    }

    #[test]
    fn test_no_exif_yields_defaults() {
        let summary = extract_summary(&plain_png());
        assert_eq!(summary, ExifSummary::default());
    }

    #[test]
    fn test_garbage_input_yields_defaults() {
        let summary = extract_summary(b"not an image at all");
        assert_eq!(summary, ExifSummary::default());
    }

    #[test]
    fn test_exif_datetime_format_parses() {
        let dt = NaiveDateTime::parse_from_str("2024:06:03 14:30:45", "%Y:%m:%d %H:%M:%S");
        assert!(dt.is_ok());
    }
}
