/**
 * ============================================================================
 * BOOTH STORAGE MODULE
 * ============================================================================
 *
 * PURPOSE: Write composited strips to disk and list past exports
 *
 * FILE STRUCTURE:
 * {export_dir}/
 * ├── photo-strip-1736956800123.png
 * └── ...
 *
 * Filenames carry the export time in unix milliseconds; default format
 * is PNG.
 *
 * ============================================================================
 */

use chrono::{DateTime, Utc};
use image::ImageFormat;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::booth::types::ExportError;
use crate::strip::compositor::CompositedStrip;

const STRIP_PREFIX: &str = "photo-strip-";

// Filename for a strip exported at `at`
pub fn strip_filename(at: DateTime<Utc>) -> String {
    format!("{}{}.png", STRIP_PREFIX, at.timestamp_millis())
}

// Default export directory: the platform pictures dir, falling back to
// the data dir, under a photobooth subfolder
pub fn default_export_dir() -> PathBuf {
    dirs::picture_dir()
        .or_else(dirs::data_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("photobooth")
}

// Write a composited strip as a timestamped PNG under `dir`
pub fn write_strip(strip: &CompositedStrip, dir: &Path) -> Result<PathBuf, ExportError> {
    std::fs::create_dir_all(dir)?;

    let path = dir.join(strip_filename(Utc::now()));
    strip.pixels().save_with_format(&path, ImageFormat::Png)?;

    log::info!(
        "Exported {}x{} strip to {}",
        strip.width(),
        strip.height(),
        path.display()
    );
    Ok(path)
}

// List previously exported strips under `dir`, newest first
pub fn list_strips(dir: &Path) -> Vec<PathBuf> {
    if !dir.exists() {
        return Vec::new();
    }

    let mut strips: Vec<PathBuf> = WalkDir::new(dir)
        .max_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path().to_path_buf())
        .filter(|p| {
            p.extension().is_some_and(|ext| ext == "png")
                && p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with(STRIP_PREFIX))
        })
        .collect();

    // Timestamped names sort chronologically
    strips.sort();
    strips.reverse();
    strips
}
