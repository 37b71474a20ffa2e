//! Domain models for stored images and their derivatives.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One resized/cropped copy of an original image.
///
/// `label` is the size string (`"1200x900"`, `"150x150"`) and `path` the
/// relative location of the file under the media root. Paths always follow
/// the `{root}-{label}.{ext}` template derived from the original's path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Derivative {
    pub label: String,
    pub path: String,
}

/// Serialize an ordered derivative list for the `derivatives` column.
pub fn derivatives_to_json(derivatives: &[Derivative]) -> String {
    serde_json::to_string(derivatives).unwrap_or_else(|_| "[]".to_string())
}

/// Decode a stored derivative list. Missing or malformed data yields an
/// empty list rather than an error: a record with an unreadable descriptor
/// column is treated as having no derivatives.
pub fn derivatives_from_json(raw: &str) -> Vec<Derivative> {
    serde_json::from_str(raw).unwrap_or_default()
}

/// One metadata record per stored image. The single source of truth tying
/// the on-disk original and its derivatives together.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRecord {
    /// Surrogate key, assigned by the database, never reused.
    pub id: i64,
    /// External lookup key, assigned exactly once at ingestion.
    pub uuid: Uuid,
    /// Original client-supplied file name. Display only.
    pub filename: String,
    /// Relative path of the stored original: `YYYY/MM/<hash>.<ext>`.
    pub path: String,
    /// Derivative descriptors in generation order (scale-descending,
    /// thumbnail last).
    pub derivatives: Vec<Derivative>,
    pub caption: String,
    pub location: String,
}

impl ImageRecord {
    /// Split the original path into its stem and lower-cased extension.
    /// `"2024/06/abc.JPG"` → `("2024/06/abc", "jpg")`.
    pub fn root_and_extension(&self) -> (&str, String) {
        match self.path.rsplit_once('.') {
            Some((root, ext)) => (root, ext.to_lowercase()),
            None => (self.path.as_str(), String::new()),
        }
    }

    /// Every file this record references: the original plus all derivatives.
    ///
    /// Pure derivation from the stored path and descriptor list; calling it
    /// twice always yields the same set. Used to compute the delete file set.
    pub fn all_paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.derivatives.iter().map(|d| d.path.clone()).collect();
        paths.push(self.path.clone());
        paths
    }
}

/// The handful of EXIF tags the gallery presents, populated by explicit
/// lookup-with-default. Absent or unreadable EXIF data leaves every field
/// `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExifSummary {
    /// Focal length in millimetres, truncated to whole units.
    pub focal_length_mm: Option<u32>,
    /// Aperture f-number, rounded to one decimal.
    pub f_number: Option<f64>,
    /// Capture timestamp (EXIF carries no timezone).
    pub captured_at: Option<NaiveDateTime>,
}
