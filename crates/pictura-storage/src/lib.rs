//! Pictura Storage Library
//!
//! This crate owns the on-disk layout of the gallery: an active media tree
//! holding `YYYY/MM/<file>` originals and their derivatives, and a parallel
//! trash tree receiving flattened (basename-only) copies of deleted files.
//!
//! # Path format
//!
//! All operations take paths relative to the configured media root. Paths
//! must not contain `..` or a leading `/`; absolute paths are never accepted
//! from callers.

pub mod local;
pub mod traits;

// Re-export commonly used types
pub use local::LocalStore;
pub use traits::{MediaStore, StorageError, StorageResult};
