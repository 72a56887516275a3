//! Output file naming for generated images

use anyhow::Result;
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Create `dir` if needed and return a fresh path inside it.
///
/// Names look like `2024-05-01_<uuid>.png`.
pub fn unique_output_path(dir: &Path, extension: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;

    let date = Local::now().format("%Y-%m-%d");
    let id = Uuid::new_v4();
    let extension = extension.trim_start_matches('.');

    let file_name = if extension.is_empty() {
        format!("{}_{}", date, id)
    } else {
        format!("{}_{}.{}", date, id, extension)
    };
    Ok(dir.join(file_name))
}
