//! Error types for the songlake ETL job.

use snafu::prelude::*;

// Re-export the storage error
pub use songlake_core::error::StorageError;

/// Errors that can occur during configuration parsing and validation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ConfigError {
    /// Song data path is empty.
    #[snafu(display("Song data path cannot be empty"))]
    EmptySongDataPath,

    /// Log data path is empty.
    #[snafu(display("Log data path cannot be empty"))]
    EmptyLogDataPath,

    /// Sink path is empty.
    #[snafu(display("Sink path cannot be empty"))]
    EmptySinkPath,

    /// Environment variable interpolation failed.
    #[snafu(display("Environment variable interpolation failed:\n{message}"))]
    EnvInterpolation { message: String },

    /// Failed to parse YAML configuration.
    #[snafu(display("Failed to parse YAML configuration"))]
    YamlParse { source: serde_yaml::Error },

    /// Failed to read configuration file.
    #[snafu(display("Failed to read configuration file"))]
    ReadFile { source: std::io::Error },
}

/// Errors that can occur while reading and parsing raw JSON records.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ReaderError {
    /// Failed to fetch a file from storage.
    #[snafu(display("Failed to read {path}: {source}"))]
    FileRead { path: String, source: StorageError },

    /// Failed to decompress a file.
    #[snafu(display("Failed to decompress {path}: {message}"))]
    Decompression { path: String, message: String },

    /// Failed to parse a JSON record.
    #[snafu(display("Failed to parse JSON in {path} line {line}: {source}"))]
    JsonParse {
        path: String,
        line: usize,
        source: serde_json::Error,
    },

    /// IO error while reading decompressed lines.
    #[snafu(display("IO error while reading {path}: {source}"))]
    LineRead { path: String, source: std::io::Error },
}

/// Errors that can occur while writing a table to the sink.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum SinkError {
    /// Failed to build an Arrow record batch.
    #[snafu(display("Failed to build record batch for {table}: {source}"))]
    BatchBuild {
        table: &'static str,
        source: arrow::error::ArrowError,
    },

    /// Failed to create a Parquet writer.
    #[snafu(display("Failed to create Parquet writer: {source}"))]
    WriterCreate {
        source: parquet::errors::ParquetError,
    },

    /// Failed to write to Parquet.
    #[snafu(display("Failed to write to Parquet: {source}"))]
    ParquetWrite {
        source: parquet::errors::ParquetError,
    },

    /// Failed to finalize a Parquet file.
    #[snafu(display("Failed to close Parquet writer: {source}"))]
    WriterClose {
        source: parquet::errors::ParquetError,
    },

    /// Failed to persist a file to storage.
    #[snafu(display("Failed to write {path} to storage: {source}"))]
    StorageWrite { path: String, source: StorageError },

    /// Failed to clear previous table output.
    #[snafu(display("Failed to clear previous output under {prefix}: {source}"))]
    Overwrite { prefix: String, source: StorageError },
}

/// Top-level pipeline errors.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum EtlError {
    /// Configuration error.
    #[snafu(display("Configuration error: {source}"))]
    Config { source: ConfigError },

    /// Storage error.
    #[snafu(display("Storage error: {source}"))]
    Storage { source: StorageError },

    /// Reader error.
    #[snafu(display("Reader error: {source}"))]
    Reader { source: ReaderError },

    /// Sink error.
    #[snafu(display("Sink error: {source}"))]
    Sink { source: SinkError },
}

impl From<ConfigError> for EtlError {
    fn from(source: ConfigError) -> Self {
        EtlError::Config { source }
    }
}

impl From<StorageError> for EtlError {
    fn from(source: StorageError) -> Self {
        EtlError::Storage { source }
    }
}

impl From<ReaderError> for EtlError {
    fn from(source: ReaderError) -> Self {
        EtlError::Reader { source }
    }
}

impl From<SinkError> for EtlError {
    fn from(source: SinkError) -> Self {
        EtlError::Sink { source }
    }
}
