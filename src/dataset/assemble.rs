//! Dataset assembler.
//!
//! Reads every cropped image grouped by subject (subject name = class
//! label), decodes each to an RGB u8 array, and stacks the lot into one
//! dense `[N, S, S, 3]` array with an index-aligned label array. Dense
//! stacking only works when every image shares one shape, so the shape of
//! the first decoded image becomes an explicit precondition for the rest;
//! the first mismatch aborts before any store file is created.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ndarray::{s, Array3, Array4};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::crop::subject_dirs;
use crate::dataset::store::{store_path, write_dataset};
use crate::utils::error::PrepError;
use crate::utils::logging::ProgressLogger;

/// Summary of one assembly run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssembleStats {
    /// Number of subjects (classes)
    pub subjects: usize,
    /// Total images stacked
    pub images: usize,
    /// Shape of every image in the stack (height, width, channels)
    pub image_shape: (usize, usize, usize),
    /// Image count per subject
    pub per_subject: BTreeMap<String, usize>,
    /// Where the store was written
    pub store_path: PathBuf,
}

/// Assemble every cropped image under `cropped_root` into a dataset store
/// written to `<output_dir>/<output_name>.npz`.
///
/// Subjects and the files within them are visited in sorted order, so
/// labels land in deterministic subject-then-file order. Unlike the
/// cropper there is no extension filter here: the cropped tree is fully
/// owned by this pipeline, so every file is expected to decode, and a file
/// that does not is a fatal error.
pub fn assemble(cropped_root: &Path, output_name: &str, output_dir: &Path) -> Result<AssembleStats> {
    info!(
        "Assembling dataset '{}' from {:?}",
        output_name, cropped_root
    );

    if !cropped_root.is_dir() {
        anyhow::bail!("cropped image directory does not exist: {:?}", cropped_root);
    }

    let subjects = subject_dirs(cropped_root)?;

    let mut decoded: Vec<Array3<u8>> = Vec::new();
    let mut labels: Vec<String> = Vec::new();
    let mut expected_shape: Option<(usize, usize, usize)> = None;
    let mut per_subject = BTreeMap::new();

    for subject in &subjects {
        // Labels are stored as ASCII byte strings, so a subject name that
        // cannot be encoded fails the run before any of its files decode.
        if !subject.is_ascii() {
            return Err(PrepError::NonAsciiLabel(subject.clone()).into());
        }

        let subject_dir = cropped_root.join(subject);
        let files = subject_files(&subject_dir)?;
        let mut progress = ProgressLogger::new(&format!("Converting '{}'", subject), files.len());

        for path in &files {
            let img = image::open(path)
                .with_context(|| format!("Failed to decode cropped image {:?}", path))?;

            // Alpha is dropped here; downstream consumers train on RGB.
            let rgb = img.to_rgb8();
            let (width, height) = rgb.dimensions();
            let shape = (height as usize, width as usize, 3);

            match expected_shape {
                None => expected_shape = Some(shape),
                Some(expected) if shape != expected => {
                    return Err(PrepError::ShapeMismatch {
                        expected,
                        found: shape,
                    })
                    .with_context(|| format!("Failed to stack {:?}", path));
                }
                Some(_) => {}
            }

            let array = Array3::from_shape_vec(shape, rgb.into_raw())
                .with_context(|| format!("Failed to shape pixel data of {:?}", path))?;
            decoded.push(array);
            labels.push(subject.clone());
            progress.increment();
        }

        progress.finish();
        debug!("Subject '{}': {} images converted", subject, files.len());
        per_subject.insert(subject.clone(), files.len());
    }

    let image_shape = expected_shape
        .ok_or_else(|| PrepError::EmptyDataset(cropped_root.to_path_buf()))?;

    // One dense stack at the end instead of growing the array per image.
    let (height, width, channels) = image_shape;
    let mut images = Array4::<u8>::zeros((decoded.len(), height, width, channels));
    for (i, img) in decoded.iter().enumerate() {
        images.slice_mut(s![i, .., .., ..]).assign(img);
    }

    let path = store_path(output_name, output_dir);
    write_dataset(&path, &images, &labels)?;

    info!(
        "Assembled {} images from {} subjects into {:?}",
        decoded.len(),
        subjects.len(),
        path
    );

    Ok(AssembleStats {
        subjects: subjects.len(),
        images: labels.len(),
        image_shape,
        per_subject,
        store_path: path,
    })
}

/// List every regular file in a subject directory, sorted by name.
fn subject_files(dir: &Path) -> Result<Vec<PathBuf>> {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crop::crop_images;
    use crate::dataset::store::load_dataset;
    use std::fs;
    use image::{Rgb, RgbImage};
    use tempfile::tempdir;

    /// Write a `side` x `side` image whose red channel is a constant tag.
    fn save_tagged(dir: &Path, name: &str, side: u32, tag: u8) {
        fs::create_dir_all(dir).unwrap();
        let img = RgbImage::from_fn(side, side, |x, y| Rgb([tag, x as u8, y as u8]));
        img.save(dir.join(name)).unwrap();
    }

    #[test]
    fn test_assemble_stacks_subjects_in_order() {
        let tmp = tempdir().unwrap();
        let cropped = tmp.path().join("cropped_images");
        save_tagged(&cropped.join("cat"), "a.png", 64, 1);
        save_tagged(&cropped.join("cat"), "b.png", 64, 2);
        save_tagged(&cropped.join("dog"), "a.png", 64, 3);
        save_tagged(&cropped.join("dog"), "b.png", 64, 4);
        save_tagged(&cropped.join("dog"), "c.png", 64, 5);

        let stats = assemble(&cropped, "data", tmp.path()).unwrap();
        assert_eq!(stats.images, 5);
        assert_eq!(stats.subjects, 2);
        assert_eq!(stats.image_shape, (64, 64, 3));

        let (images, labels) = load_dataset("data", tmp.path()).unwrap();
        assert_eq!(images.shape(), &[5, 64, 64, 3]);
        assert_eq!(labels, vec!["cat", "cat", "dog", "dog", "dog"]);

        // Red-channel tags confirm subject-then-file order.
        let tags: Vec<u8> = (0..5).map(|i| images[[i, 0, 0, 0]]).collect();
        assert_eq!(tags, vec![1, 2, 3, 4, 5]);
        // Pixel layout is (row, column, channel).
        assert_eq!(images[[0, 9, 5, 1]], 5);
        assert_eq!(images[[0, 9, 5, 2]], 9);
    }

    #[test]
    fn test_round_trip_matches_in_memory_arrays() {
        let tmp = tempdir().unwrap();
        let cropped = tmp.path().join("cropped_images");
        save_tagged(&cropped.join("cat"), "a.png", 16, 7);

        let stats = assemble(&cropped, "data", tmp.path()).unwrap();
        let (images, labels) = load_dataset("data", tmp.path()).unwrap();

        assert_eq!(images.shape(), &[1, 16, 16, 3]);
        assert_eq!(labels.len(), stats.images);

        let expected = RgbImage::from_fn(16, 16, |x, y| Rgb([7, x as u8, y as u8]));
        for y in 0..16usize {
            for x in 0..16usize {
                let px = expected.get_pixel(x as u32, y as u32);
                for ch in 0..3usize {
                    assert_eq!(images[[0, y, x, ch]], px[ch]);
                }
            }
        }
    }

    #[test]
    fn test_shape_mismatch_fails_before_store_exists() {
        let tmp = tempdir().unwrap();
        let cropped = tmp.path().join("cropped_images");
        save_tagged(&cropped.join("cat"), "a.png", 64, 1);
        save_tagged(&cropped.join("cat"), "b.png", 32, 2);

        let err = assemble(&cropped, "data", tmp.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PrepError>(),
            Some(PrepError::ShapeMismatch { .. })
        ));
        assert!(!store_path("data", tmp.path()).exists());
    }

    #[test]
    fn test_non_ascii_subject_is_fatal() {
        let tmp = tempdir().unwrap();
        let cropped = tmp.path().join("cropped_images");
        save_tagged(&cropped.join("café"), "a.png", 64, 1);

        let err = assemble(&cropped, "data", tmp.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PrepError>(),
            Some(PrepError::NonAsciiLabel(_))
        ));
    }

    #[test]
    fn test_empty_tree_is_fatal() {
        let tmp = tempdir().unwrap();
        let cropped = tmp.path().join("cropped_images");
        fs::create_dir_all(&cropped).unwrap();

        let err = assemble(&cropped, "data", tmp.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PrepError>(),
            Some(PrepError::EmptyDataset(_))
        ));
    }

    #[test]
    fn test_undecodable_file_is_fatal_here() {
        // The assembler owns its input tree, so it does not skip.
        let tmp = tempdir().unwrap();
        let cropped = tmp.path().join("cropped_images");
        save_tagged(&cropped.join("cat"), "a.png", 64, 1);
        fs::write(cropped.join("cat/junk.bin"), b"not an image").unwrap();

        assert!(assemble(&cropped, "data", tmp.path()).is_err());
    }

    #[test]
    fn test_alpha_is_dropped_at_assembly() {
        use image::{DynamicImage, Rgba, RgbaImage};

        let tmp = tempdir().unwrap();
        let cropped = tmp.path().join("cropped_images");
        fs::create_dir_all(cropped.join("cat")).unwrap();
        let rgba = RgbaImage::from_fn(8, 8, |_, _| Rgba([10, 20, 30, 40]));
        DynamicImage::ImageRgba8(rgba)
            .save(cropped.join("cat/a.png"))
            .unwrap();

        assemble(&cropped, "data", tmp.path()).unwrap();
        let (images, _) = load_dataset("data", tmp.path()).unwrap();
        assert_eq!(images.shape(), &[1, 8, 8, 3]);
        assert_eq!(images[[0, 0, 0, 0]], 10);
        assert_eq!(images[[0, 0, 0, 2]], 30);
    }

    #[test]
    fn test_full_pipeline_crop_then_assemble() {
        let tmp = tempdir().unwrap();
        let raw = tmp.path().join("images");
        let cropped = tmp.path().join("cropped_images");

        // One centred landscape cat, one right-anchored landscape dog.
        for orientation in crate::crop::Orientation::ALL {
            fs::create_dir_all(raw.join("cat").join(orientation.dir_name())).unwrap();
            fs::create_dir_all(raw.join("dog").join(orientation.dir_name())).unwrap();
        }
        let img = RgbImage::from_fn(128, 64, |x, y| Rgb([x as u8, y as u8, 0]));
        img.save(raw.join("cat/centre/one.png")).unwrap();
        let img = RgbImage::from_fn(128, 64, |x, y| Rgb([x as u8, y as u8, 1]));
        img.save(raw.join("dog/landscape_right/one.png")).unwrap();

        crop_images(&raw, &cropped).unwrap();
        assemble(&cropped, "data", tmp.path()).unwrap();
        let (images, labels) = load_dataset("data", tmp.path()).unwrap();

        assert_eq!(images.shape(), &[2, 64, 64, 3]);
        assert_eq!(labels, vec!["cat", "dog"]);
        // Centre crop keeps columns 32..96, right crop keeps 64..128.
        assert_eq!(images[[0, 0, 0, 0]], 32);
        assert_eq!(images[[1, 0, 0, 0]], 64);
    }
}
