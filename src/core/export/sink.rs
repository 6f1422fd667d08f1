//! File sink for CSV chunks

use crate::domain::{DumpError, Result};
use futures::stream::{BoxStream, TryStreamExt};
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};
use tokio::io::{AsyncWriteExt, BufWriter};

/// Create the output directory and its parents
///
/// # Errors
///
/// Returns [`DumpError::OutputIo`] naming the directory on failure.
pub async fn ensure_output_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).await.map_err(|e| {
        DumpError::OutputIo(format!("cannot create directory {}: {e}", dir.display()))
    })
}

/// Path of the CSV file for a file name without suffix
pub fn csv_path(dir: &Path, file_name: &str) -> PathBuf {
    dir.join(format!("{file_name}.csv"))
}

/// Stream chunks into `path`, creating or truncating the file
///
/// The file is flushed once the stream ends. On a stream error the bytes
/// written so far stay on disk and the error is returned.
///
/// # Errors
///
/// Returns the first stream error, or [`DumpError::OutputIo`] for write
/// failures.
pub async fn write_chunks(path: &Path, mut chunks: BoxStream<'_, Result<String>>) -> Result<u64> {
    let io_error =
        |e: std::io::Error| DumpError::OutputIo(format!("cannot write {}: {e}", path.display()));

    let file = File::create(path).await.map_err(io_error)?;
    let mut writer = BufWriter::new(file);
    let mut written = 0u64;

    let outcome = async {
        while let Some(chunk) = chunks.try_next().await? {
            writer.write_all(chunk.as_bytes()).await.map_err(io_error)?;
            written += chunk.len() as u64;
        }
        Ok::<_, DumpError>(())
    }
    .await;

    let flushed = writer.flush().await.map_err(io_error);
    outcome?;
    flushed?;
    Ok(written)
}
