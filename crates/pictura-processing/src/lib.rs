//! Pictura Processing Library
//!
//! Upload validation, identity/path derivation, derivative generation and
//! EXIF summary extraction. Everything in this crate is pure CPU work; the
//! pipeline runs it off the async dispatch path.

pub mod derivatives;
pub mod exif;
pub mod identity;
pub mod validator;

// Re-export commonly used types
pub use derivatives::{decode_image, DecodeError, DerivativeGenerator, GeneratedDerivative};
pub use exif::extract_summary;
pub use identity::{derivative_path, UploadIdentity};
pub use validator::{UploadValidator, ValidationError};
