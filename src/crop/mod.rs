//! Cropping stage: raw orientation-sorted photos to uniform square crops.
//!
//! The raw tree groups each subject's photos into five orientation folders;
//! every folder implies one deterministic square crop rule. The output tree
//! flattens the orientation folders away, leaving one square image per
//! eligible input under `<cropped_root>/<subject>/`.

pub mod cropper;
pub mod rules;

pub use cropper::{crop_images, subject_dirs, CropStats, CROP_EXTENSION};
pub use rules::{CropWindow, Orientation};
