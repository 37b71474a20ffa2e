//! Pictura Pipeline Library
//!
//! The gallery orchestrator: ties validation, storage, derivative generation
//! and the metadata repository together into the ingestion, presentation and
//! deletion flows.

pub mod gallery;

// Re-export commonly used types
pub use gallery::{Gallery, PresentedImage, Upload};
