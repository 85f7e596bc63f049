//! Dataset assembly and loading.
//!
//! This module turns the cropped tree into a single binary dataset store
//! and reads it back:
//! - `assemble`: decode every cropped image, stack into one dense
//!   `[N, S, S, 3]` array with index-aligned labels, write the store
//! - `store`: the named-array container (write + load)
//!
//! The store holds exactly two named entries, `image_data` and
//! `class_labels`; loading reproduces both arrays bit for bit.

pub mod assemble;
pub mod store;

pub use assemble::{assemble, AssembleStats};
pub use store::{
    load_dataset, store_path, write_dataset, CLASS_LABELS_ENTRY, IMAGE_DATA_ENTRY,
    STORE_EXTENSION,
};
