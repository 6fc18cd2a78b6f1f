//! Whole-file writes that never leave a partial artifact behind
//!
//! Content goes to a sibling `<name>.partial` file which replaces the
//! target only once it is fully flushed. On failure the partial file is
//! removed and the target is left untouched.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Result, VerifyError};

const PARTIAL_SUFFIX: &str = ".partial";

/// Path of the staging file used while `path` is being written
pub fn partial_path(path: &Path) -> Option<PathBuf> {
    let name = path.file_name()?;
    let mut staged = name.to_os_string();
    staged.push(PARTIAL_SUFFIX);
    Some(path.with_file_name(staged))
}

/// Run `write` against a staging file, then move it over `path`
pub fn write_atomically<T, F>(path: &Path, write: F) -> Result<T>
where
    F: FnOnce(&mut BufWriter<File>) -> io::Result<T>,
{
    let write_error = |source: io::Error| VerifyError::FileWrite {
        path: path.to_path_buf(),
        source,
    };

    let staged = partial_path(path).ok_or_else(|| {
        write_error(io::Error::new(
            io::ErrorKind::InvalidInput,
            "output path has no file name",
        ))
    })?;

    let file = File::create(&staged).map_err(write_error)?;
    let mut writer = BufWriter::new(file);

    let outcome = write(&mut writer).and_then(|value| {
        writer.flush()?;
        writer.get_ref().sync_all()?;
        Ok(value)
    });

    let value = match outcome {
        Ok(value) => value,
        Err(e) => {
            drop(writer);
            let _ = fs::remove_file(&staged);
            return Err(write_error(e));
        }
    };

    drop(writer);
    if let Err(e) = fs::rename(&staged, path) {
        let _ = fs::remove_file(&staged);
        return Err(write_error(e));
    }

    debug!(path = %path.display(), "Committed file");
    Ok(value)
}
