//! Utility functions for error handling
//!
//! Filesystem helpers that attach the path and purpose to any failure.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::{ReportError, Result};

/// Safely open a file with rich error information
///
/// # Arguments
/// * `path` - The path to the file to open
/// * `purpose` - Why the file is being opened (for error context)
pub fn safe_open_file(path: &Path, purpose: &str) -> Result<fs::File> {
    if !path.exists() {
        return Err(ReportError::io(
            path,
            format!("File not found, needed for: {purpose}"),
            io::Error::from(io::ErrorKind::NotFound),
        ));
    }

    if !path.is_file() {
        return Err(ReportError::io(
            path,
            format!("Path is not a file, expected a file for: {purpose}"),
            io::Error::from(io::ErrorKind::InvalidInput),
        ));
    }

    fs::File::open(path).map_err(|e| {
        let context = match e.kind() {
            io::ErrorKind::PermissionDenied => {
                "Permission denied - check file permissions".to_string()
            }
            _ => format!("Failed to open file for: {purpose}"),
        };
        ReportError::io(path, context, e)
    })
}

/// Make sure an output directory exists, creating it (and parents) if absent
pub fn ensure_directory(path: &Path, purpose: &str) -> Result<()> {
    if path.is_dir() {
        return Ok(());
    }

    if path.exists() {
        return Err(ReportError::io(
            path,
            format!("Path exists but is not a directory, needed for: {purpose}"),
            io::Error::from(io::ErrorKind::AlreadyExists),
        ));
    }

    log::debug!("Creating directory {} for {purpose}", path.display());
    fs::create_dir_all(path)
        .map_err(|e| ReportError::io(path, format!("Failed to create directory for: {purpose}"), e))
}

/// Make sure the parent directory of an output file exists
pub fn ensure_parent_directory(path: &Path, purpose: &str) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_directory(parent, purpose),
        _ => Ok(()),
    }
}
