//! Input reading: file discovery plus NDJSON parsing.

mod compression;
mod reader;

pub use compression::{CompressionCodec, DecompressionError, GzipCodec, NoopCodec};
pub use reader::NdjsonReader;

use serde::de::DeserializeOwned;
use snafu::prelude::*;
use tracing::info;

use songlake_core::StorageProvider;

use crate::config::CompressionFormat;
use crate::error::{FileReadSnafu, ReaderError};

/// Read every record under a storage root.
///
/// Discovers `.json` (or `.json.gz`) files recursively, fetches each and
/// parses it line-wise into typed records. Any read or parse failure
/// aborts the run.
pub async fn read_all_records<T: DeserializeOwned>(
    storage: &StorageProvider,
    compression: CompressionFormat,
) -> Result<Vec<T>, ReaderError> {
    let suffix = compression.json_suffix();
    let files = storage
        .list_files_with_suffix(suffix)
        .await
        .context(FileReadSnafu {
            path: storage.url().to_string(),
        })?;

    let reader = NdjsonReader::new(compression);
    let mut records = Vec::new();

    for path in &files {
        let bytes = storage
            .get(path.as_str())
            .await
            .context(FileReadSnafu { path: path.clone() })?;
        records.extend(reader.read_records::<T>(&bytes, path)?);
    }

    info!(
        "Read {} records from {} files under {}",
        records.len(),
        files.len(),
        storage.url()
    );

    Ok(records)
}
