//! FIFO path checks shared by both pipe ends.

use std::os::unix::fs::FileTypeExt;
use std::path::Path;

use crate::error::PipeError;

/// Fail fast unless `path` exists and is a named pipe.
///
/// A missing or wrong-typed path is a configuration error, distinct from a
/// pipe that merely has no peer yet.
pub(crate) async fn ensure_fifo(path: &Path) -> Result<(), PipeError> {
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.file_type().is_fifo() => Ok(()),
        Ok(_) => Err(PipeError::NotAFifo {
            path: path.to_path_buf(),
        }),
        Err(err) => Err(PipeError::from_open(path, err)),
    }
}
