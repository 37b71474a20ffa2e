//! Shared fixtures for gallery integration tests.

use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use tempfile::TempDir;

use pictura_core::GalleryConfig;
use pictura_db::ImageRepository;
use pictura_pipeline::{Gallery, Upload};
use pictura_storage::LocalStore;

pub struct TestGallery {
    pub gallery: Gallery,
    pub repo: ImageRepository,
    pub media_dir: PathBuf,
    pub trash_dir: PathBuf,
    // Dropped last, removing all test state.
    _dir: TempDir,
}

pub async fn setup() -> TestGallery {
    pictura_core::telemetry::init_tracing();

    let dir = TempDir::new().unwrap();
    let media_dir = dir.path().join("media");
    let trash_dir = dir.path().join("trash");

    let config = GalleryConfig {
        media_dir: media_dir.clone(),
        trash_dir: trash_dir.clone(),
        database_url: format!("sqlite://{}", dir.path().join("gallery.sqlite").display()),
        ..GalleryConfig::default()
    };

    let store = LocalStore::new(&config.media_dir, &config.trash_dir)
        .await
        .unwrap();
    let pool = pictura_db::connect(&config.database_url).await.unwrap();
    let repo = ImageRepository::new(pool);
    repo.init().await.unwrap();

    let gallery = Gallery::new(Arc::new(store), repo.clone(), &config);

    TestGallery {
        gallery,
        repo,
        media_dir,
        trash_dir,
        _dir: dir,
    }
}

fn solid(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([90, 140, 60])))
}

pub fn jpeg_bytes(width: u32, height: u32) -> Bytes {
    let mut buffer = Vec::new();
    solid(width, height)
        .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Jpeg)
        .unwrap();
    Bytes::from(buffer)
}

pub fn png_bytes(width: u32, height: u32) -> Bytes {
    let mut buffer = Vec::new();
    solid(width, height)
        .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .unwrap();
    Bytes::from(buffer)
}

pub fn upload(data: Bytes, filename: &str, content_type: &str) -> Upload {
    Upload {
        data,
        filename: filename.to_string(),
        content_type: content_type.to_string(),
        caption: String::new(),
        location: String::new(),
    }
}

/// Count regular files anywhere under a directory.
pub fn file_count(dir: &PathBuf) -> usize {
    fn walk(dir: &std::path::Path, count: &mut usize) {
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.is_dir() {
                    walk(&path, count);
                } else {
                    *count += 1;
                }
            }
        }
    }
    let mut count = 0;
    walk(dir, &mut count);
    count
}
