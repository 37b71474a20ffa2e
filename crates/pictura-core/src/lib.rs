//! Pictura Core Library
//!
//! This crate provides the domain models, error types, configuration and
//! tracing bootstrap shared across all Pictura components.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod telemetry;

// Re-export commonly used types
pub use config::GalleryConfig;
pub use error::AppError;
pub use models::{
    derivatives_from_json, derivatives_to_json, Derivative, ExifSummary, ImageRecord,
};
