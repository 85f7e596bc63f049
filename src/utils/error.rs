//! Error Handling Module
//!
//! Defines the typed error conditions of the preparation pipeline.
//! Uses thiserror for ergonomic error definitions; functions raise these
//! through `anyhow` so callers can add path context with `?`.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal error conditions of the cropping and assembly pipeline.
///
/// Recoverable conditions (unreadable crop inputs, wrong extensions) are
/// handled locally by skipping the file and never surface as an error.
#[derive(Error, Debug)]
pub enum PrepError {
    /// An image in an orientation folder violates that folder's aspect
    /// assumption, so the crop offset would be negative.
    #[error(
        "image is {width}x{height}, which violates the '{orientation}' orientation assumption"
    )]
    OrientationMismatch {
        orientation: &'static str,
        width: u32,
        height: u32,
    },

    /// A crop produced a non-square region. Contract failure: the crop
    /// windows are square by construction.
    #[error("crop produced a non-square {width}x{height} region")]
    NonSquareCrop { width: u32, height: u32 },

    /// Class labels are stored as ASCII byte strings.
    #[error("class label '{0}' contains non-ASCII characters")]
    NonAsciiLabel(String),

    /// Dense stacking requires every image to share one shape.
    #[error("image shape {found:?} does not match dataset image shape {expected:?}")]
    ShapeMismatch {
        expected: (usize, usize, usize),
        found: (usize, usize, usize),
    },

    /// The dataset store file does not exist.
    #[error("dataset store not found: {0}")]
    StoreNotFound(PathBuf),

    /// No images were found to assemble.
    #[error("no images found under {0}")]
    EmptyDataset(PathBuf),
}

/// Convenience Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PrepError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PrepError::NonSquareCrop {
            width: 10,
            height: 20,
        };
        assert_eq!(format!("{}", err), "crop produced a non-square 10x20 region");
    }

    #[test]
    fn test_orientation_mismatch_names_folder() {
        let err = PrepError::OrientationMismatch {
            orientation: "landscape_right",
            width: 80,
            height: 120,
        };
        assert!(format!("{}", err).contains("landscape_right"));
    }

    #[test]
    fn test_store_not_found_shows_path() {
        let err = PrepError::StoreNotFound(PathBuf::from("/data/set.npz"));
        assert!(format!("{}", err).contains("set.npz"));
    }
}
