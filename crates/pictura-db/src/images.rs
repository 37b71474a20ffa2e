//! Image metadata repository
//!
//! The single source of truth tying stored files to their metadata. Inserts
//! happen last in the ingestion pipeline, so a crash mid-upload leaves only
//! unreferenced files on disk, never a row pointing at nothing.

use sqlx::{FromRow, Sqlite, SqlitePool};
use uuid::Uuid;

use pictura_core::{derivatives_from_json, derivatives_to_json, AppError, Derivative, ImageRecord};

/// Raw `images` row. The uuid is stored as hyphenated text and the
/// derivative list as JSON.
#[derive(Debug, FromRow)]
struct ImageRow {
    id: i64,
    uuid: String,
    filename: String,
    path: String,
    derivatives: String,
    caption: String,
    location: String,
}

impl ImageRow {
    fn into_record(self) -> Result<ImageRecord, AppError> {
        let uuid = Uuid::parse_str(&self.uuid)
            .map_err(|e| AppError::Internal(format!("Malformed uuid in row {}: {}", self.id, e)))?;
        Ok(ImageRecord {
            id: self.id,
            uuid,
            filename: self.filename,
            path: self.path,
            derivatives: derivatives_from_json(&self.derivatives),
            caption: self.caption,
            location: self.location,
        })
    }
}

/// Repository for image metadata records.
#[derive(Clone)]
pub struct ImageRepository {
    pool: SqlitePool,
}

impl ImageRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the `images` table if it does not exist yet.
    pub async fn init(&self) -> Result<(), AppError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS images (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                uuid TEXT NOT NULL UNIQUE,
                filename TEXT NOT NULL,
                path TEXT NOT NULL UNIQUE,
                derivatives TEXT NOT NULL DEFAULT '[]',
                caption TEXT NOT NULL DEFAULT '',
                location TEXT NOT NULL DEFAULT ''
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert a new record. The last step of ingestion.
    #[tracing::instrument(skip(self, derivatives), fields(db.table = "images", db.operation = "insert"))]
    pub async fn insert(
        &self,
        uuid: Uuid,
        filename: &str,
        path: &str,
        derivatives: &[Derivative],
        caption: &str,
        location: &str,
    ) -> Result<ImageRecord, AppError> {
        let row: ImageRow = sqlx::query_as::<Sqlite, ImageRow>(
            r#"
            INSERT INTO images (uuid, filename, path, derivatives, caption, location)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            RETURNING *
            "#,
        )
        .bind(uuid.to_string())
        .bind(filename)
        .bind(path)
        .bind(derivatives_to_json(derivatives))
        .bind(caption)
        .bind(location)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(uuid = %uuid, path = %path, "New image record");

        row.into_record()
    }

    /// Look a record up by its external identifier.
    pub async fn find_by_uuid(&self, uuid: Uuid) -> Result<Option<ImageRecord>, AppError> {
        let row: Option<ImageRow> = sqlx::query_as::<Sqlite, ImageRow>(
            "SELECT * FROM images WHERE uuid = ?1 LIMIT 1",
        )
        .bind(uuid.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(ImageRow::into_record).transpose()
    }

    /// All records whose path starts with `prefix`, ordered lexicographically
    /// by path. Because buckets embed zero-padded year/month, this order is
    /// chronological.
    pub async fn find_by_path_prefix(&self, prefix: &str) -> Result<Vec<ImageRecord>, AppError> {
        let rows: Vec<ImageRow> = sqlx::query_as::<Sqlite, ImageRow>(
            "SELECT * FROM images WHERE path LIKE ?1 ORDER BY path",
        )
        .bind(format!("{}%", prefix))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ImageRow::into_record).collect()
    }

    /// Update caption and location only. Paths and the derivative set are
    /// immutable after ingestion. Returns whether a row matched.
    #[tracing::instrument(skip(self), fields(db.table = "images", db.operation = "update"))]
    pub async fn update_details(
        &self,
        uuid: Uuid,
        caption: &str,
        location: &str,
    ) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE images SET caption = ?2, location = ?3 WHERE uuid = ?1")
            .bind(uuid.to_string())
            .bind(caption)
            .bind(location)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Remove a record. The caller is responsible for having relocated the
    /// referenced files to trash first. Returns whether a row existed.
    #[tracing::instrument(skip(self), fields(db.table = "images", db.operation = "delete"))]
    pub async fn delete(&self, uuid: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM images WHERE uuid = ?1")
            .bind(uuid.to_string())
            .execute(&self.pool)
            .await?;

        tracing::info!(uuid = %uuid, "Image record deleted");

        Ok(result.rows_affected() > 0)
    }
}
