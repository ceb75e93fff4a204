//! Atomic file writes
//!
//! Temp file in the target directory, then rename, so an interrupted run
//! never leaves a half-written manifest or backup file.

use kdev_core::errors::{KdevError, Result};
use std::fs;
use std::path::Path;

/// Atomically write bytes to a file, creating parent directories
///
/// # Errors
///
/// `Io` naming the step that failed.
pub fn atomic_write(target_path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = target_path.parent() {
        fs::create_dir_all(parent).map_err(|e| KdevError::io("create_output_dir", e))?;
    }

    let temp_path = target_path.with_extension("tmp");
    fs::write(&temp_path, content).map_err(|e| KdevError::io("write_temp_file", e))?;
    fs::rename(&temp_path, target_path).map_err(|e| KdevError::io("rename_temp_file", e))?;

    Ok(())
}
