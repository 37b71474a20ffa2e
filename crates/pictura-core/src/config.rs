//! Configuration module
//!
//! Gallery configuration is read once at startup from the environment (with
//! `.env` support via dotenvy) and passed explicitly to the components that
//! need it. There is no process-wide configuration state.

use std::env;
use std::path::PathBuf;

use crate::constants::{DEFAULT_MAX_UPLOAD_BYTES, SCALED_WIDTHS, THUMBNAIL_SQUARE};

/// Gallery configuration.
#[derive(Clone, Debug)]
pub struct GalleryConfig {
    /// Root of the active media tree.
    pub media_dir: PathBuf,
    /// Root of the trash tree receiving soft-deleted files.
    pub trash_dir: PathBuf,
    /// SQLite database URL or file path.
    pub database_url: String,
    /// Upper bound on accepted upload size, in bytes.
    pub max_upload_bytes: usize,
    /// Scaled derivative target widths, descending.
    pub scaled_widths: Vec<u32>,
    /// Square thumbnail edge length.
    pub thumbnail_square: u32,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            media_dir: PathBuf::from("media"),
            trash_dir: PathBuf::from("trash"),
            database_url: "sqlite://data/pictura.sqlite".to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            scaled_widths: SCALED_WIDTHS.to_vec(),
            thumbnail_square: THUMBNAIL_SQUARE,
        }
    }
}

impl GalleryConfig {
    /// Load configuration from the environment, falling back to defaults for
    /// unset variables.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let scaled_widths = match env::var("PICTURA_SCALED_WIDTHS") {
            Ok(raw) => parse_widths(&raw)?,
            Err(_) => defaults.scaled_widths,
        };

        Ok(Self {
            media_dir: env::var("PICTURA_MEDIA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.media_dir),
            trash_dir: env::var("PICTURA_TRASH_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.trash_dir),
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            max_upload_bytes: parse_env("PICTURA_MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
            scaled_widths,
            thumbnail_square: parse_env("PICTURA_THUMBNAIL_SQUARE", defaults.thumbnail_square)?,
        })
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T, anyhow::Error>
where
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid {}: {}", key, e)),
        Err(_) => Ok(default),
    }
}

/// Parse a comma-separated width list, e.g. `"1200,992,768,576"`.
fn parse_widths(raw: &str) -> Result<Vec<u32>, anyhow::Error> {
    let widths = raw
        .split(',')
        .map(|s| s.trim().parse::<u32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| anyhow::anyhow!("Invalid PICTURA_SCALED_WIDTHS: {}", e))?;
    if widths.is_empty() {
        anyhow::bail!("PICTURA_SCALED_WIDTHS must not be empty");
    }
    Ok(widths)
}
