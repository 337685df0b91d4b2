//! Storage abstraction.
//!
//! Provides a unified interface for working with S3 and the local
//! filesystem, so the pipeline and its tests can run against either.

mod local;
mod s3;
mod url_parser;

pub use local::LocalConfig;
pub use s3::S3Config;
pub use url_parser::BackendConfig;

use bytes::Bytes;
use futures::StreamExt;
use object_store::path::Path;
use object_store::{
    Attribute, AttributeValue, Attributes, ObjectStore, PutOptions, PutPayload,
};
use snafu::prelude::*;
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::error::{ObjectStoreSnafu, StorageError};

/// A reference-counted storage provider.
pub type StorageProviderRef = Arc<StorageProvider>;

/// Storage provider that abstracts over the supported storage backends.
#[derive(Clone)]
pub struct StorageProvider {
    pub(crate) config: BackendConfig,
    pub(crate) object_store: Arc<dyn ObjectStore>,
    pub(crate) canonical_url: String,
}

impl std::fmt::Debug for StorageProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "StorageProvider<{}>", self.canonical_url)
    }
}

impl StorageProvider {
    /// Create a storage provider for the given URL with storage options.
    pub async fn for_url_with_options(
        url: &str,
        options: HashMap<String, String>,
    ) -> Result<Self, StorageError> {
        let config = BackendConfig::parse_url(url)?;

        match config {
            BackendConfig::S3(config) => Self::construct_s3(config, options),
            BackendConfig::Local(config) => Self::construct_local(config).await,
        }
    }

    /// Create a storage provider for the given URL.
    pub async fn for_url(url: &str) -> Result<Self, StorageError> {
        Self::for_url_with_options(url, HashMap::new()).await
    }

    /// Qualify a path with the configured key prefix.
    fn qualify_path<'a>(&self, path: &'a Path) -> Cow<'a, Path> {
        match self.config.key() {
            Some(prefix) => Cow::Owned(prefix.parts().chain(path.parts()).collect()),
            None => Cow::Borrowed(path),
        }
    }

    /// Recursively list files whose path ends with `suffix`.
    ///
    /// Returns paths relative to the configured key prefix, sorted for
    /// consistent ordering.
    pub async fn list_files_with_suffix(&self, suffix: &str) -> Result<Vec<String>, StorageError> {
        let key_path: Option<Path> = self.config.key().map(|key| key.to_string().into());
        let key_part_count = key_path
            .as_ref()
            .map(|key| key.parts().count())
            .unwrap_or_default();

        let mut stream = self.object_store.list(key_path.as_ref());
        let mut files = Vec::new();
        let mut total_listed = 0;

        while let Some(result) = stream.next().await {
            let meta = result.context(ObjectStoreSnafu)?;
            total_listed += 1;

            if meta.location.as_ref().ends_with(suffix) {
                // Strip the prefix so callers get paths relative to the
                // configured root, matching the contract of get/put.
                let relative: Path = meta.location.parts().skip(key_part_count).collect();
                files.push(relative.to_string());
            }
        }

        debug!(
            "Listed {} total files under {}, {} match *{}",
            total_listed, self.canonical_url, files.len(), suffix
        );

        files.sort();
        Ok(files)
    }

    /// List all files under a prefix (relative to the configured root).
    pub async fn list_prefix(&self, prefix: &str) -> Result<Vec<Path>, StorageError> {
        let full_prefix: Path = match self.config.key() {
            Some(key) => key.parts().chain(Path::from(prefix).parts()).collect(),
            None => Path::from(prefix),
        };
        let key_part_count = self
            .config
            .key()
            .map(|key| key.parts().count())
            .unwrap_or_default();

        let mut stream = self.object_store.list(Some(&full_prefix));
        let mut paths = Vec::new();

        while let Some(result) = stream.next().await {
            match result {
                Ok(meta) => {
                    let relative: Path = meta.location.parts().skip(key_part_count).collect();
                    paths.push(relative);
                }
                Err(object_store::Error::NotFound { .. }) => {}
                Err(source) => return Err(StorageError::ObjectStore { source }),
            }
        }

        Ok(paths)
    }

    /// Get the contents of a file.
    pub async fn get(&self, path: impl Into<Path>) -> Result<Bytes, StorageError> {
        let path = path.into();
        let bytes = self
            .object_store
            .get(&self.qualify_path(&path))
            .await
            .context(ObjectStoreSnafu)?
            .bytes()
            .await
            .context(ObjectStoreSnafu)?;
        Ok(bytes)
    }

    /// Put bytes to a path.
    pub async fn put(&self, path: &Path, bytes: Bytes) -> Result<(), StorageError> {
        self.object_store
            .put(&self.qualify_path(path), PutPayload::from(bytes))
            .await
            .context(ObjectStoreSnafu)?;
        Ok(())
    }

    /// Put a Parquet file to a path with the correct content type.
    ///
    /// Sets `Content-Type: application/vnd.apache.parquet` on cloud storage
    /// backends. Local filesystem doesn't support attributes, so they are
    /// skipped.
    pub async fn put_parquet(&self, path: &Path, bytes: Bytes) -> Result<(), StorageError> {
        if matches!(self.config, BackendConfig::Local(_)) {
            return self.put(path, bytes).await;
        }

        let opts = PutOptions {
            attributes: Attributes::from_iter([(
                Attribute::ContentType,
                AttributeValue::from("application/vnd.apache.parquet"),
            )]),
            ..Default::default()
        };
        self.object_store
            .put_opts(&self.qualify_path(path), PutPayload::from(bytes), opts)
            .await
            .context(ObjectStoreSnafu)?;
        Ok(())
    }

    /// Delete a file at the given path.
    pub async fn delete(&self, path: &Path) -> Result<(), StorageError> {
        self.object_store
            .delete(&self.qualify_path(path))
            .await
            .context(ObjectStoreSnafu)?;
        Ok(())
    }

    /// Delete every object under a prefix.
    ///
    /// Used for overwrite-mode table writes: each run replaces the previous
    /// output wholesale. A missing prefix is not an error.
    pub async fn delete_prefix(&self, prefix: &str) -> Result<usize, StorageError> {
        let paths = self.list_prefix(prefix).await?;
        let deleted = paths.len();

        for path in &paths {
            match self.delete(path).await {
                Ok(()) => {}
                Err(e) if e.is_not_found() => {}
                Err(e) => return Err(e),
            }
        }

        if deleted > 0 {
            debug!("Deleted {} objects under {}/{}", deleted, self.canonical_url, prefix);
        }

        Ok(deleted)
    }

    /// The canonical URL of this provider, for logging.
    pub fn url(&self) -> &str {
        &self.canonical_url
    }
}
