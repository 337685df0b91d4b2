//! Songlake: batch ETL from raw JSON in object storage to a partitioned
//! Parquet star schema.
//!
//! This crate handles:
//! - Reading song-catalog and listening-event JSON files from S3 or local
//!   storage (optionally gzip-compressed)
//! - Deriving the dimension tables (Songs, Artists, Users, Time) and the
//!   Songplays fact table in memory
//! - Writing each table as Hive-partitioned Parquet, replacing the
//!   previous run's output wholesale

pub mod config;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod sink;
pub mod source;
pub mod tables;
pub mod transform;

// Re-export commonly used items
pub use config::Config;
pub use error::EtlError;
pub use pipeline::{PipelineStats, run_pipeline};

// Re-export from songlake-core
pub use songlake_core::{StorageProvider, StorageProviderRef, init_tracing};
