//! Configuration for the songlake ETL job.
//!
//! The original form of this job hard-coded its input and output URIs and
//! pushed credentials into process-global environment state. Here the
//! whole run is driven by one explicit config struct, constructed once in
//! `main` and passed down.

mod vars;

use parquet::basic::{Compression, ZstdLevel};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::ConfigError;
pub use vars::{InterpolationResult, interpolate};

/// Configuration for the input data roots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Root of the song catalog files (supports S3, local).
    /// Files are discovered recursively under this prefix.
    pub song_data: String,
    /// Root of the listening-event log files.
    pub log_data: String,
    /// Compression format of input files.
    #[serde(default)]
    pub compression: CompressionFormat,
    /// Storage options for source storage (credentials, region, etc.)
    #[serde(default)]
    pub storage_options: HashMap<String, String>,
}

/// Compression format of input files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionFormat {
    #[default]
    None,
    Gzip,
}

impl CompressionFormat {
    /// File extension the listing step should match.
    pub fn json_suffix(self) -> &'static str {
        match self {
            CompressionFormat::None => ".json",
            CompressionFormat::Gzip => ".json.gz",
        }
    }
}

/// Configuration for the Parquet sink.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SinkConfig {
    /// Root URI of the output lake. Tables are written under fixed
    /// subpaths: `songs/`, `artists/`, `users/`, `time/`, `songplays/`.
    pub path: String,
    /// Parquet compression codec.
    #[serde(default)]
    pub compression: ParquetCompression,
    /// Storage options for sink storage (credentials, region, etc.)
    #[serde(default)]
    pub storage_options: HashMap<String, String>,
}

/// Parquet compression codec.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParquetCompression {
    #[default]
    Snappy,
    Zstd,
    None,
}

impl ParquetCompression {
    /// Convert to the parquet crate's compression setting.
    pub fn to_parquet(self) -> Compression {
        match self {
            ParquetCompression::Snappy => Compression::SNAPPY,
            ParquetCompression::Zstd => Compression::ZSTD(ZstdLevel::default()),
            ParquetCompression::None => Compression::UNCOMPRESSED,
        }
    }
}

/// Main configuration for songlake.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Source configuration.
    pub source: SourceConfig,
    /// Sink configuration.
    pub sink: SinkConfig,
}

impl Config {
    /// Load configuration from a file.
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile { source })?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        // Interpolate environment variables
        let result = interpolate(contents);
        if !result.is_ok() {
            return Err(ConfigError::EnvInterpolation {
                message: result.errors.join("\n"),
            });
        }

        // Parse YAML
        let config: Config = serde_yaml::from_str(&result.text)
            .map_err(|source| ConfigError::YamlParse { source })?;

        // Validate
        config.validate()?;

        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source.song_data.is_empty() {
            return Err(ConfigError::EmptySongDataPath);
        }
        if self.source.log_data.is_empty() {
            return Err(ConfigError::EmptyLogDataPath);
        }
        if self.sink.path.is_empty() {
            return Err(ConfigError::EmptySinkPath);
        }
        Ok(())
    }
}
