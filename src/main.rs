//! imageset_prep CLI
//!
//! Entry point for the dataset preparation pipeline: orientation-aware
//! square cropping followed by assembly into a binary array-dataset store.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use imageset_prep::crop::{crop_images, subject_dirs, Orientation};
use imageset_prep::dataset::{assemble, load_dataset, store_path};
use imageset_prep::utils::logging::{init_logging, LogConfig};

/// Square-crop orientation-sorted photos and pack them into an
/// array-dataset container for model training.
#[derive(Parser, Debug)]
#[command(name = "imageset_prep")]
#[command(version)]
#[command(about = "Orientation-aware cropping and array-dataset assembly", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, default_value = "false")]
    verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Crop every subject's raw images into uniform squares
    Crop {
        /// Root directory of the raw orientation-sorted images
        #[arg(short, long, default_value = "images")]
        raw_dir: String,

        /// Destination directory for the cropped images
        #[arg(short, long, default_value = "cropped_images")]
        output_dir: String,
    },

    /// Assemble cropped images into a binary dataset store
    Assemble {
        /// Root directory of the cropped images
        #[arg(short, long, default_value = "cropped_images")]
        input_dir: String,

        /// Name of the dataset store (written as <name>.npz)
        #[arg(short, long, default_value = "data")]
        name: String,

        /// Directory the store is written into
        #[arg(short, long, default_value = ".")]
        output_dir: String,
    },

    /// Load a dataset store and print its contents
    Inspect {
        /// Name of the dataset store
        #[arg(short, long, default_value = "data")]
        name: String,

        /// Directory containing the store
        #[arg(short, long, default_value = ".")]
        dir: String,
    },

    /// Show file counts for a raw image tree without decoding anything
    Stats {
        /// Root directory of the raw orientation-sorted images
        #[arg(short, long, default_value = "images")]
        raw_dir: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_config = if cli.verbose {
        LogConfig::verbose()
    } else {
        LogConfig::default()
    };
    let _ = init_logging(&log_config);

    print_banner();

    match cli.command {
        Commands::Crop {
            raw_dir,
            output_dir,
        } => cmd_crop(&raw_dir, &output_dir)?,

        Commands::Assemble {
            input_dir,
            name,
            output_dir,
        } => cmd_assemble(&input_dir, &name, &output_dir)?,

        Commands::Inspect { name, dir } => cmd_inspect(&name, &dir)?,

        Commands::Stats { raw_dir } => cmd_stats(&raw_dir)?,
    }

    Ok(())
}

fn print_banner() {
    println!(
        "{}",
        "imageset_prep — square crops in, training arrays out".green()
    );
    println!();
}

fn cmd_crop(raw_dir: &str, output_dir: &str) -> Result<()> {
    info!("Cropping {} -> {}", raw_dir, output_dir);

    let stats = crop_images(Path::new(raw_dir), Path::new(output_dir))?;

    println!("{}", "Cropping complete!".green().bold());
    println!("  Subjects:        {}", stats.subjects);
    println!("  Images cropped:  {}", stats.cropped);
    println!("  Filtered (ext):  {}", stats.skipped_extension);
    println!("  Unreadable:      {}", stats.skipped_unreadable);
    println!();
    for (subject, count) in &stats.per_subject {
        println!("  {:30} {:>6}", subject, count);
    }

    Ok(())
}

fn cmd_assemble(input_dir: &str, name: &str, output_dir: &str) -> Result<()> {
    info!("Assembling {} -> {}/{}.npz", input_dir, output_dir, name);

    let stats = assemble(Path::new(input_dir), name, Path::new(output_dir))?;

    println!("{}", "Dataset assembled!".green().bold());
    println!("  Store:        {:?}", stats.store_path);
    println!("  Images:       {}", stats.images);
    println!("  Subjects:     {}", stats.subjects);
    println!(
        "  Image shape:  {}x{}x{}",
        stats.image_shape.0, stats.image_shape.1, stats.image_shape.2
    );

    // Summary JSON beside the store, for tooling that doesn't read NPZ.
    let summary_path = Path::new(output_dir).join(format!("{}_summary.json", name));
    let summary = serde_json::to_string_pretty(&stats)?;
    fs::write(&summary_path, summary)?;
    println!("  Summary:      {:?}", summary_path);

    Ok(())
}

fn cmd_inspect(name: &str, dir: &str) -> Result<()> {
    let dir = Path::new(dir);
    info!("Inspecting dataset store {:?}", store_path(name, dir));

    let (images, labels) = load_dataset(name, dir)?;

    println!("{}", "Dataset contents:".cyan().bold());
    println!("  image_data shape:   {:?}", images.shape());
    println!("  class_labels count: {}", labels.len());
    println!();

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for label in &labels {
        *counts.entry(label.as_str()).or_default() += 1;
    }

    println!("{}", "Class distribution:".cyan().bold());
    let total = labels.len().max(1);
    for (label, count) in &counts {
        let pct = 100.0 * *count as f64 / total as f64;
        println!("  {:30} {:>6} ({:>5.1}%)", label, count, pct);
    }

    Ok(())
}

fn cmd_stats(raw_dir: &str) -> Result<()> {
    let root = Path::new(raw_dir);
    if !root.is_dir() {
        println!(
            "{} Raw image directory not found: {}",
            "Error:".red(),
            raw_dir
        );
        return Ok(());
    }

    println!("{}", "Raw tree statistics:".cyan().bold());

    for subject in subject_dirs(root)? {
        println!("  {}", subject.yellow());
        for orientation in Orientation::ALL {
            let dir = root.join(&subject).join(orientation.dir_name());
            let count = match fs::read_dir(&dir) {
                Ok(entries) => entries
                    .filter_map(|e| e.ok())
                    .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
                    .count(),
                Err(_) => {
                    println!("    {:18} {}", orientation.dir_name(), "missing".red());
                    continue;
                }
            };
            println!("    {:18} {:>6}", orientation.dir_name(), count);
        }
    }

    Ok(())
}
