//! Start, completion and warning lines shared by the pipeline stages.

use std::path::Path;
use std::time::Duration;

/// `"<operation> <path>"` at info level
pub fn log_operation_start(operation: &str, path: &Path) {
    log::info!("{operation} {}", path.display());
}

/// Item count and, when known, elapsed time of a finished operation
pub fn log_operation_complete(
    operation: &str,
    path: &Path,
    items: usize,
    elapsed: Option<Duration>,
) {
    let path = path.display();
    match elapsed {
        Some(duration) => log::info!("{path}: {operation} {items} items in {duration:?}"),
        None => log::info!("{path}: {operation} {items} items"),
    }
}

pub fn log_warning(message: &str, path: Option<&Path>) {
    match path {
        Some(path) => log::warn!("{message}: {}", path.display()),
        None => log::warn!("{message}"),
    }
}
