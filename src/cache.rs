use crate::log::{error_modified, Error};

use std::{
    fs,
    path::{Path, PathBuf},
};

/// File extension given to compiled artifacts.
pub(crate) const COMPILED_EXTENSION: &str = "php";

/// Return the path a compiled artifact is stored at for the given source path.
///
/// The file name is the hex digest of the source path itself, not of its
/// contents, so a document edited in place reuses the same artifact.
/// Staleness is decided by [`is_expired`], never by content.
pub(crate) fn compiled_path(cache: &Path, source: &Path) -> PathBuf {
    let digest = md5::compute(source.to_string_lossy().as_bytes());

    cache.join(format!("{digest:x}.{COMPILED_EXTENSION}"))
}

/// Return true if the compiled artifact must be regenerated.
///
/// A missing artifact is expired. An existing artifact is valid while its
/// modified time is at least the source's modified time.
///
/// # Errors
///
/// Returns an [`Error`] when a modified timestamp cannot be read for
/// either file.
pub(crate) fn is_expired(source: &Path, compiled: &Path) -> Result<bool, Error> {
    if !compiled.exists() {
        return Ok(true);
    }

    let modified = |path: &Path| {
        fs::metadata(path)
            .and_then(|metadata| metadata.modified())
            .map_err(|error| error_modified(path, error))
    };

    Ok(modified(compiled)? < modified(source)?)
}
