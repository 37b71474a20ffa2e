//! Identity and path derivation
//!
//! Every upload gets a fresh UUIDv4 as its external identifier. The on-disk
//! filename is derived deterministically from that identifier (md5 hex of the
//! raw UUID bytes) so the user-supplied name never reaches the filesystem,
//! and the file lands in a `YYYY/MM` bucket chosen from the upload date.

use chrono::{Datelike, NaiveDate};
use uuid::Uuid;

/// Identity assigned to an upload before anything touches the disk.
#[derive(Debug, Clone)]
pub struct UploadIdentity {
    /// External lookup key, assigned exactly once.
    pub uuid: Uuid,
    /// Date bucket, `YYYY/MM` with zero padding.
    pub bucket: String,
    /// Content filename: md5 hex of the UUID bytes plus the extension.
    pub content_filename: String,
}

impl UploadIdentity {
    /// Derive a new identity for an upload with the given (already
    /// validated, lower-cased) extension, bucketed under `date`.
    pub fn derive(extension: &str, date: NaiveDate) -> Self {
        let uuid = Uuid::new_v4();
        let digest = md5::compute(uuid.as_bytes());
        Self {
            uuid,
            bucket: format!("{:04}/{:02}", date.year(), date.month()),
            content_filename: format!("{:x}.{}", digest, extension),
        }
    }

    /// Relative path of the original under the media root.
    pub fn original_path(&self) -> String {
        format!("{}/{}", self.bucket, self.content_filename)
    }

    /// Path stem the derivative names are built from.
    pub fn root(&self) -> String {
        match self.original_path().rsplit_once('.') {
            Some((root, _)) => root.to_string(),
            None => self.original_path(),
        }
    }
}

/// The derivative naming template: `{root}-{label}.{ext}`. This exact format
/// is part of the external contract; rendering layers substitute stored
/// labels into it.
pub fn derivative_path(root: &str, label: &str, extension: &str) -> String {
    format!("{}-{}.{}", root, label, extension)
}
