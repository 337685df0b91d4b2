//! Newline-delimited JSON reader.
//!
//! Parses one file's bytes into typed records. Catalog files hold a
//! single JSON document and log files hold one document per line; both
//! are handled by line-wise parsing since a single document is one line.

use std::io::BufRead;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::CompressionFormat;
use crate::error::{JsonParseSnafu, ReaderError};
use snafu::prelude::*;

/// A reader that parses (optionally compressed) NDJSON bytes into typed
/// records.
#[derive(Debug, Clone)]
pub struct NdjsonReader {
    compression: CompressionFormat,
}

impl NdjsonReader {
    /// Create a reader for the given input compression format.
    pub fn new(compression: CompressionFormat) -> Self {
        Self { compression }
    }

    /// Parse all records in one file's bytes.
    ///
    /// Empty lines are skipped; any malformed line is fatal and reported
    /// with its path and line number.
    pub fn read_records<T: DeserializeOwned>(
        &self,
        data: &Bytes,
        path: &str,
    ) -> Result<Vec<T>, ReaderError> {
        let codec = self.compression.codec();
        let reader = codec
            .create_reader(data)
            .map_err(|e| ReaderError::Decompression {
                path: path.to_string(),
                message: e.message,
            })?;

        let mut records = Vec::new();

        for (line_num, line_result) in reader.lines().enumerate() {
            let line = line_result.map_err(|source| ReaderError::LineRead {
                path: path.to_string(),
                source,
            })?;

            if line.trim().is_empty() {
                continue;
            }

            let record = serde_json::from_str(&line).context(JsonParseSnafu {
                path: path.to_string(),
                line: line_num + 1,
            })?;
            records.push(record);
        }

        debug!("Parsed {} records from {}", records.len(), path);

        Ok(records)
    }
}
