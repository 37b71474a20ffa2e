//! Gallery orchestrator
//!
//! Ingestion is a linear sequence with no retries: validate, write the
//! original, generate and write derivatives, insert the metadata row. The row
//! goes in last, so an interrupted upload leaves unreferenced files behind
//! rather than a record pointing at files that were never written.
//!
//! Deletion is the reverse lifecycle: files move to the trash tree first
//! (best effort, a file that is already gone is skipped with a warning), then
//! the row is removed.

use std::sync::Arc;

use bytes::Bytes;
use chrono::{Local, NaiveDate};
use image::GenericImageView;
use uuid::Uuid;

use pictura_core::{AppError, Derivative, ExifSummary, GalleryConfig, ImageRecord};
use pictura_db::ImageRepository;
use pictura_processing::{
    decode_image, extract_summary, DerivativeGenerator, GeneratedDerivative, UploadIdentity,
    UploadValidator,
};
use pictura_storage::MediaStore;

/// One upload as received from the outer layer.
#[derive(Debug, Clone)]
pub struct Upload {
    pub data: Bytes,
    pub filename: String,
    pub content_type: String,
    pub caption: String,
    pub location: String,
}

/// Everything needed to present a single stored image: the metadata record,
/// facts read from the original on disk, and the derivative descriptors that
/// still resolve to existing files.
#[derive(Debug, Clone)]
pub struct PresentedImage {
    pub record: ImageRecord,
    /// On-disk size of the original, in bytes.
    pub file_size: u64,
    pub width: u32,
    pub height: u32,
    /// Populated for JPEG originals only.
    pub exif: ExifSummary,
    /// Derivatives whose files exist right now. A descriptor whose file has
    /// gone missing is skipped, not an error.
    pub available_derivatives: Vec<Derivative>,
}

/// The gallery service. Explicitly constructed with its store and repository;
/// no process-wide state.
pub struct Gallery {
    store: Arc<dyn MediaStore>,
    repo: ImageRepository,
    validator: UploadValidator,
    generator: Arc<DerivativeGenerator>,
}

impl Gallery {
    pub fn new(store: Arc<dyn MediaStore>, repo: ImageRepository, config: &GalleryConfig) -> Self {
        Self {
            store,
            repo,
            validator: UploadValidator::with_defaults(config.max_upload_bytes),
            generator: Arc::new(DerivativeGenerator::new(
                config.scaled_widths.clone(),
                config.thumbnail_square,
            )),
        }
    }

    /// Ingest an upload, bucketing it under today's local date.
    pub async fn ingest(&self, upload: Upload) -> Result<Uuid, AppError> {
        self.ingest_at(upload, Local::now().date_naive()).await
    }

    /// Ingest an upload into the `YYYY/MM` bucket for `date`.
    #[tracing::instrument(skip(self, upload), fields(filename = %upload.filename))]
    pub async fn ingest_at(&self, upload: Upload, date: NaiveDate) -> Result<Uuid, AppError> {
        let extension =
            self.validator
                .validate_all(&upload.filename, &upload.content_type, upload.data.len())?;

        let identity = UploadIdentity::derive(&extension, date);
        let original_path = identity.original_path();

        self.store.write(&original_path, &upload.data).await?;

        let derivatives = self
            .generate_derivatives(upload.data.clone(), identity.root(), extension)
            .await?;

        for derivative in &derivatives {
            self.store.write(&derivative.path, &derivative.data).await?;
        }

        let descriptors: Vec<Derivative> =
            derivatives.iter().map(GeneratedDerivative::descriptor).collect();

        let record = self
            .repo
            .insert(
                identity.uuid,
                &upload.filename,
                &original_path,
                &descriptors,
                &upload.caption,
                &upload.location,
            )
            .await?;

        tracing::info!(
            uuid = %record.uuid,
            path = %record.path,
            derivatives = descriptors.len(),
            "Image ingested"
        );

        Ok(record.uuid)
    }

    /// Soft-delete an image: move the original and every derivative into the
    /// trash tree, then remove the metadata row. A referenced file that no
    /// longer exists is logged and skipped.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, uuid: Uuid) -> Result<(), AppError> {
        let record = self
            .repo
            .find_by_uuid(uuid)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No image with uuid {}", uuid)))?;

        for path in record.all_paths() {
            if !self.store.move_to_trash(&path).await? {
                tracing::warn!(uuid = %uuid, path = %path, "Referenced file missing, skipped");
            }
        }

        self.repo.delete(uuid).await?;

        tracing::info!(uuid = %uuid, path = %record.path, "Image deleted");

        Ok(())
    }

    /// Load a single image for presentation.
    pub async fn get(&self, uuid: Uuid) -> Result<PresentedImage, AppError> {
        let record = self
            .repo
            .find_by_uuid(uuid)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No image with uuid {}", uuid)))?;

        let data = Bytes::from(self.store.read(&record.path).await?);
        let file_size = data.len() as u64;

        let (_, extension) = record.root_and_extension();
        let is_jpeg = matches!(extension.as_str(), "jpg" | "jpeg");

        let (width, height, exif) = tokio::task::spawn_blocking(move || {
            let img = decode_image(&data)?;
            let (width, height) = img.dimensions();
            let exif = if is_jpeg {
                extract_summary(&data)
            } else {
                ExifSummary::default()
            };
            Ok::<_, AppError>((width, height, exif))
        })
        .await
        .map_err(|e| AppError::Internal(format!("Decode task failed: {}", e)))??;

        let mut available_derivatives = Vec::with_capacity(record.derivatives.len());
        for derivative in &record.derivatives {
            if self.store.exists(&derivative.path).await? {
                available_derivatives.push(derivative.clone());
            } else {
                tracing::warn!(
                    uuid = %uuid,
                    path = %derivative.path,
                    "Derivative file missing, omitted"
                );
            }
        }

        Ok(PresentedImage {
            record,
            file_size,
            width,
            height,
            exif,
            available_derivatives,
        })
    }

    /// Update caption and/or location. A `None` leaves the current value.
    pub async fn update_details(
        &self,
        uuid: Uuid,
        caption: Option<&str>,
        location: Option<&str>,
    ) -> Result<ImageRecord, AppError> {
        let record = self
            .repo
            .find_by_uuid(uuid)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No image with uuid {}", uuid)))?;

        let caption = caption.unwrap_or(&record.caption);
        let location = location.unwrap_or(&record.location);
        self.repo.update_details(uuid, caption, location).await?;

        self.repo
            .find_by_uuid(uuid)
            .await?
            .ok_or_else(|| AppError::Internal(format!("Record vanished during update: {}", uuid)))
    }

    /// All images in one `YYYY/MM` bucket, in path order.
    pub async fn browse(&self, year: i32, month: u32) -> Result<Vec<ImageRecord>, AppError> {
        self.repo
            .find_by_path_prefix(&format!("{:04}/{:02}/", year, month))
            .await
    }

    /// All images in one year, in path order (chronological by month).
    pub async fn browse_year(&self, year: i32) -> Result<Vec<ImageRecord>, AppError> {
        self.repo.find_by_path_prefix(&format!("{:04}/", year)).await
    }

    /// Decode and derive off the async runtime; both steps are CPU-bound.
    async fn generate_derivatives(
        &self,
        data: Bytes,
        root: String,
        extension: String,
    ) -> Result<Vec<GeneratedDerivative>, AppError> {
        let generator = Arc::clone(&self.generator);

        tokio::task::spawn_blocking(move || {
            let img = decode_image(&data)?;
            generator
                .generate(&img, &root, &extension)
                .map_err(|e| AppError::Internal(format!("Derivative generation failed: {}", e)))
        })
        .await
        .map_err(|e| AppError::Internal(format!("Derivative task failed: {}", e)))?
    }
}
