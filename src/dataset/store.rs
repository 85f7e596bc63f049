//! Named-array dataset store.
//!
//! The assembled dataset lives in one NPZ container with exactly two named
//! entries: `image_data`, a dense `[N, S, S, 3]` u8 array, and
//! `class_labels`, a `[N, L]` u8 array of ASCII label bytes zero-padded to
//! the longest label (the fixed-width byte-string convention of numpy's
//! `|S` dtype). Reading the store back yields the same arrays bit for bit.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ndarray::{Array2, Array4};
use ndarray_npy::{NpzReader, NpzWriter};
use tracing::info;

use crate::utils::error::PrepError;

/// Entry name of the stacked image array.
pub const IMAGE_DATA_ENTRY: &str = "image_data";
/// Entry name of the label array.
pub const CLASS_LABELS_ENTRY: &str = "class_labels";
/// File extension of the store container.
pub const STORE_EXTENSION: &str = "npz";

/// Path of the store file for `name` under `dir`.
pub fn store_path(name: &str, dir: &Path) -> PathBuf {
    dir.join(format!("{}.{}", name, STORE_EXTENSION))
}

/// Encode labels as a fixed-width, zero-padded ASCII byte array.
///
/// Fails with [`PrepError::NonAsciiLabel`] on the first label that cannot
/// be represented as ASCII.
pub fn encode_labels(labels: &[String]) -> Result<Array2<u8>, PrepError> {
    for label in labels {
        if !label.is_ascii() {
            return Err(PrepError::NonAsciiLabel(label.clone()));
        }
    }

    let width = labels.iter().map(|l| l.len()).max().unwrap_or(0);
    let mut encoded = Array2::<u8>::zeros((labels.len(), width));
    for (row, label) in labels.iter().enumerate() {
        for (col, byte) in label.bytes().enumerate() {
            encoded[[row, col]] = byte;
        }
    }

    Ok(encoded)
}

/// Decode fixed-width label rows back into strings, stripping the padding.
pub fn decode_labels(encoded: &Array2<u8>) -> Vec<String> {
    encoded
        .rows()
        .into_iter()
        .map(|row| {
            let bytes: Vec<u8> = row.iter().copied().take_while(|&b| b != 0).collect();
            String::from_utf8_lossy(&bytes).into_owned()
        })
        .collect()
}

/// Write `images` and `labels` as a fresh store at `path`, overwriting any
/// existing file.
pub fn write_dataset(path: &Path, images: &Array4<u8>, labels: &[String]) -> Result<()> {
    let encoded = encode_labels(labels)?;

    let file = File::create(path)
        .with_context(|| format!("Failed to create dataset store {:?}", path))?;
    let mut npz = NpzWriter::new(file);
    npz.add_array(IMAGE_DATA_ENTRY, images)
        .with_context(|| format!("Failed to write '{}' entry", IMAGE_DATA_ENTRY))?;
    npz.add_array(CLASS_LABELS_ENTRY, &encoded)
        .with_context(|| format!("Failed to write '{}' entry", CLASS_LABELS_ENTRY))?;
    npz.finish()
        .with_context(|| format!("Failed to finalize dataset store {:?}", path))?;

    info!(
        "Wrote dataset store {:?}: {} images, {} labels",
        path,
        images.shape()[0],
        labels.len()
    );

    Ok(())
}

/// Load the store `<dir>/<name>.npz` fully into memory.
///
/// Returns the stacked image array and the decoded labels, index-aligned.
/// Fails with a not-found error if the file is absent and a format error
/// if either named entry is missing or has the wrong shape or dtype.
pub fn load_dataset(name: &str, dir: &Path) -> Result<(Array4<u8>, Vec<String>)> {
    let path = store_path(name, dir);
    if !path.is_file() {
        return Err(PrepError::StoreNotFound(path).into());
    }

    let file =
        File::open(&path).with_context(|| format!("Failed to open dataset store {:?}", path))?;
    let mut npz = NpzReader::new(file)
        .with_context(|| format!("Failed to read dataset store {:?}", path))?;

    let images: Array4<u8> = npz
        .by_name(IMAGE_DATA_ENTRY)
        .with_context(|| format!("Store entry '{}' is missing or malformed", IMAGE_DATA_ENTRY))?;
    let labels: Array2<u8> = npz
        .by_name(CLASS_LABELS_ENTRY)
        .with_context(|| format!("Store entry '{}' is missing or malformed", CLASS_LABELS_ENTRY))?;

    info!(
        "Loaded dataset store {:?}: image shape {:?}",
        path,
        images.shape()
    );

    Ok((images, decode_labels(&labels)))
}
