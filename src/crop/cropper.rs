//! Orientation-aware cropper.
//!
//! Walks `<raw_root>/<subject>/<orientation>/` and writes one square image
//! per eligible input into `<cropped_root>/<subject>/`, flattening the
//! orientation folders away. Eligible inputs are `.png` files (the single
//! lossless format the acquisition stage produces); everything else is
//! filtered without touching the filesystem. Decoding keeps an alpha
//! channel if one is present, so transparency survives this stage.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::crop::rules::Orientation;
use crate::utils::error::PrepError;

/// The recognized raw image extension (case-sensitive suffix match).
pub const CROP_EXTENSION: &str = "png";

/// Outcome counters for one cropping run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CropStats {
    /// Subjects processed
    pub subjects: usize,
    /// Images cropped and written
    pub cropped: usize,
    /// Files filtered out by extension
    pub skipped_extension: usize,
    /// Files that failed to decode
    pub skipped_unreadable: usize,
    /// Cropped image count per subject
    pub per_subject: BTreeMap<String, usize>,
}

/// Crop every subject found under `raw_root` into `cropped_root`.
///
/// One call processes all subjects; per-file failures are handled as the
/// stats counters describe, while a violated orientation assumption or a
/// non-square result aborts the run with the offending file in the error
/// context. Destination files are overwritten.
pub fn crop_images(raw_root: &Path, cropped_root: &Path) -> Result<CropStats> {
    info!("Cropping images from {:?} into {:?}", raw_root, cropped_root);

    if !raw_root.is_dir() {
        anyhow::bail!("raw image directory does not exist: {:?}", raw_root);
    }

    let subjects = subject_dirs(raw_root)?;
    if subjects.is_empty() {
        warn!("No subject directories found under {:?}", raw_root);
    }

    let mut stats = CropStats::default();

    for subject in &subjects {
        info!("Cropping images for subject '{}'", subject);

        let dest_dir = cropped_root.join(subject);
        fs::create_dir_all(&dest_dir)
            .with_context(|| format!("Failed to create destination directory {:?}", dest_dir))?;

        let mut subject_count = 0usize;

        for orientation in Orientation::ALL {
            let src_dir = raw_root.join(subject).join(orientation.dir_name());
            let files = image_files(&src_dir).with_context(|| {
                format!(
                    "Failed to list orientation directory {:?} for subject '{}'",
                    src_dir, subject
                )
            })?;

            for path in &files {
                if path.extension().and_then(|e| e.to_str()) != Some(CROP_EXTENSION) {
                    debug!("Skipping {:?}: not a .{} file", path, CROP_EXTENSION);
                    stats.skipped_extension += 1;
                    continue;
                }

                // Alpha is preserved here; it is only dropped at assembly.
                let img = match image::open(path) {
                    Ok(img) => img,
                    Err(err) => {
                        warn!("Skipping unreadable image {:?}: {}", path, err);
                        stats.skipped_unreadable += 1;
                        continue;
                    }
                };

                let window = orientation
                    .crop_window(img.width(), img.height())
                    .with_context(|| format!("Failed to crop {:?}", path))?;
                let cropped = window.apply(&img);

                if cropped.width() != cropped.height() {
                    return Err(PrepError::NonSquareCrop {
                        width: cropped.width(),
                        height: cropped.height(),
                    })
                    .with_context(|| format!("Failed to crop {:?}", path));
                }

                let file_name = path
                    .file_name()
                    .with_context(|| format!("Input path has no file name: {:?}", path))?;
                let dest_path = dest_dir.join(file_name);
                cropped
                    .save(&dest_path)
                    .with_context(|| format!("Failed to write cropped image {:?}", dest_path))?;

                subject_count += 1;
                stats.cropped += 1;
            }

            debug!(
                "Subject '{}': {} folder done ({} files listed)",
                subject,
                orientation,
                files.len()
            );
        }

        info!("Subject '{}': {} images cropped", subject, subject_count);
        stats.per_subject.insert(subject.clone(), subject_count);
    }

    stats.subjects = subjects.len();
    info!(
        "Cropping complete: {} images across {} subjects ({} filtered, {} unreadable)",
        stats.cropped, stats.subjects, stats.skipped_extension, stats.skipped_unreadable
    );

    Ok(stats)
}

/// List the subject directories directly under `root`, sorted by name.
pub fn subject_dirs(root: &Path) -> Result<Vec<String>> {
    let mut subjects = Vec::new();

    for entry in fs::read_dir(root)
        .with_context(|| format!("Failed to read directory {:?}", root))?
    {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            if let Some(name) = entry.file_name().to_str() {
                subjects.push(name.to_string());
            }
        }
    }

    subjects.sort();
    Ok(subjects)
}

/// List the regular files directly inside `dir`, sorted by name.
fn image_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        anyhow::bail!("orientation directory does not exist: {:?}", dir);
    }

    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path().to_path_buf())
        .collect();

    files.sort();
    Ok(files)
}
