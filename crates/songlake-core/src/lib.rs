//! songlake-core: Shared primitives for the songlake ETL job.
//!
//! This crate contains the pieces of the pipeline that are not specific to
//! any one table:
//!
//! - `storage/` - Storage abstraction over S3 and the local filesystem
//! - `partition` - Hive-style partition path construction
//! - `tracing` - Tracing initialization for the CLI
//! - `error` - Storage error types

pub mod error;
pub mod partition;
pub mod storage;
pub mod tracing;

// Re-export commonly used items
pub use error::StorageError;
pub use partition::partition_path;
pub use storage::{StorageProvider, StorageProviderRef};
pub use tracing::init_tracing;
