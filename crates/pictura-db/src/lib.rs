//! Pictura Database Library
//!
//! Repository over the single `images` table: one row per stored image,
//! keyed by a surrogate id with a unique secondary key on `uuid`. The
//! derivative descriptor list is persisted as a JSON column and decoded
//! defensively on read.

pub mod images;
pub mod pool;

// Re-export commonly used types
pub use images::ImageRepository;
pub use pool::connect;
