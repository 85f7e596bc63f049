//! # imageset_prep
//!
//! Prepares a labeled image dataset for downstream model training: raw
//! photographs sorted by subject and orientation are normalized into
//! uniform square crops, then packed with their class labels into one
//! binary array-dataset container that reloads as two aligned arrays.
//!
//! ## Pipeline
//!
//! ```text
//! raw tree -> crop_images -> cropped tree -> assemble -> store -> load_dataset
//! ```
//!
//! ## Modules
//!
//! - `crop`: orientation categories, square crop rules, the cropping pass
//! - `dataset`: dense-array assembly and the named-array store
//! - `utils`: error taxonomy and logging helpers
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::path::Path;
//! use imageset_prep::{assemble, crop_images, load_dataset};
//!
//! crop_images(Path::new("images"), Path::new("cropped_images"))?;
//! assemble(Path::new("cropped_images"), "data", Path::new("."))?;
//! let (images, labels) = load_dataset("data", Path::new("."))?;
//! ```

pub mod crop;
pub mod dataset;
pub mod utils;

// Re-export commonly used items for convenience
pub use crop::{crop_images, CropStats, CropWindow, Orientation, CROP_EXTENSION};
pub use dataset::{assemble, load_dataset, write_dataset, AssembleStats, STORE_EXTENSION};
pub use utils::error::PrepError;
pub use utils::logging::{init_logging, LogConfig, ProgressLogger};

/// Number of orientation categories in the raw tree.
pub const NUM_ORIENTATIONS: usize = 5;

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
