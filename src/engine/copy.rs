//! Byte copy into the destination directory with collision-safe naming.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::utils::config::CopyConsts;

/// Per-file copy failure. Logged by the copier; never stops it.
#[derive(Error, Debug)]
pub enum CopyError {
    #[error("no free destination name for {name} after {attempts} attempts")]
    DestinationExhausted { name: String, attempts: usize },

    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl CopyError {
    fn io(path: &Path, source: io::Error) -> Self {
        CopyError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Destination file name for attempt `n`: `stem.ext` for 0, `stem(n).ext` after that.
/// Names without an extension get `stem(n)`.
pub fn candidate_name(file_name: &Path, attempt: usize) -> OsString {
    if attempt == 0 {
        return file_name.as_os_str().to_os_string();
    }
    let stem = file_name
        .file_stem()
        .unwrap_or_else(|| file_name.as_os_str());
    let mut name = stem.to_os_string();
    name.push(format!("({attempt})"));
    if let Some(ext) = file_name.extension() {
        name.push(".");
        name.push(ext);
    }
    name
}

/// Create a new, empty destination file for `source_name` inside `dest_dir`.
///
/// Each candidate is opened with `create_new`, so two copiers can never claim the same name.
/// Gives up with [`CopyError::DestinationExhausted`] after `max_attempts` names.
pub fn reserve_destination(
    dest_dir: &Path,
    source_name: &Path,
    max_attempts: usize,
) -> Result<(PathBuf, File), CopyError> {
    for attempt in 0..max_attempts {
        let candidate = dest_dir.join(candidate_name(source_name, attempt));
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&candidate)
        {
            Ok(file) => return Ok((candidate, file)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(CopyError::io(&candidate, e)),
        }
    }
    Err(CopyError::DestinationExhausted {
        name: source_name.display().to_string(),
        attempts: max_attempts,
    })
}

/// Copy all bytes from `reader` to `writer` through a fixed-size buffer. Returns bytes copied.
fn copy_stream<R: Read, W: Write>(reader: &mut R, writer: &mut W) -> io::Result<u64> {
    let mut buffer = [0u8; CopyConsts::COPY_BUFFER_SIZE];
    let mut total = 0_u64;
    loop {
        let n = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        writer.write_all(&buffer[..n])?;
        total += n as u64;
    }
    writer.flush()?;
    Ok(total)
}

/// Copy `source` into `dest_dir`, keeping its file name unless taken. Returns the destination path.
///
/// Creates `dest_dir` when missing. Sources that are not regular files are refused before they
/// are opened. A failed copy removes the partial destination file.
pub fn copy_file(source: &Path, dest_dir: &Path) -> Result<PathBuf, CopyError> {
    let file_name = source.file_name().ok_or_else(|| {
        CopyError::io(
            source,
            io::Error::new(io::ErrorKind::InvalidInput, "source has no file name"),
        )
    })?;
    fs::create_dir_all(dest_dir).map_err(|e| CopyError::io(dest_dir, e))?;

    // Opening a FIFO for reading blocks until a writer shows up.
    let metadata = fs::metadata(source).map_err(|e| CopyError::io(source, e))?;
    if !metadata.is_file() {
        return Err(CopyError::io(
            source,
            io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"),
        ));
    }
    let mut reader = File::open(source).map_err(|e| CopyError::io(source, e))?;
    let (dest_path, mut writer) =
        reserve_destination(dest_dir, Path::new(file_name), CopyConsts::MAX_NAME_ATTEMPTS)?;

    match copy_stream(&mut reader, &mut writer) {
        Ok(_) => Ok(dest_path),
        Err(e) => {
            drop(writer);
            let _ = fs::remove_file(&dest_path);
            Err(CopyError::io(source, e))
        }
    }
}
