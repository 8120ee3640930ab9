use super::Error;
use std::{io, path::Path};

pub const INVALID_DIRECTIVE: &str = "invalid directive";
pub const FAILED_READ: &str = "unable to read template";
pub const FAILED_WRITE: &str = "unable to write compiled template";
pub const FAILED_MODIFIED: &str = "unable to read modified time";

/// Return an [`Error`] explaining that the template source could not be read.
pub fn error_read(path: &Path, error: io::Error) -> Error {
    Error::build(FAILED_READ)
        .with_name(path.display().to_string())
        .with_help(error.to_string())
}

/// Return an [`Error`] explaining that the compiled output could not be
/// written to the cache.
///
/// The cache directory is not created implicitly, which is a common cause.
pub fn error_write(path: &Path, error: io::Error) -> Error {
    Error::build(FAILED_WRITE)
        .with_name(path.display().to_string())
        .with_help(format!("{error}, does the cache directory exist?"))
}

/// Return an [`Error`] explaining that a modified timestamp was unavailable.
pub fn error_modified(path: &Path, error: io::Error) -> Error {
    Error::build(FAILED_MODIFIED)
        .with_name(path.display().to_string())
        .with_help(error.to_string())
}
