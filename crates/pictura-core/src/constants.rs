//! Shared constants for the ingestion pipeline.

/// Scaled derivative target widths, descending. A variant is generated only
/// when the source is strictly wider than the target. Rendering layers rely
/// on the exact `{width}x{height}` labels these produce.
pub const SCALED_WIDTHS: [u32; 4] = [1200, 992, 768, 576];

/// Edge length of the square thumbnail. Generated only when both source
/// dimensions strictly exceed it.
pub const THUMBNAIL_SQUARE: u32 = 150;

/// Extensions accepted at upload, lower-cased.
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["jpeg", "jpg", "png", "gif"];

/// MIME types accepted at upload, lower-cased.
pub const ALLOWED_CONTENT_TYPES: [&str; 4] =
    ["image/jpeg", "image/jpg", "image/png", "image/gif"];

/// Default cap on upload size (64 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;
