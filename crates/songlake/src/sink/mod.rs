//! Parquet sink: partitioned, overwrite-mode table writes.

use std::collections::BTreeMap;

use bytes::Bytes;
use object_store::path::Path;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use snafu::prelude::*;
use tracing::info;
use uuid::Uuid;

use songlake_core::{partition_path, StorageProvider};

use crate::config::SinkConfig;
use crate::error::{
    BatchBuildSnafu, OverwriteSnafu, ParquetWriteSnafu, SinkError, StorageWriteSnafu,
    WriterCloseSnafu, WriterCreateSnafu,
};
use crate::tables::Table;
use songlake_core::error::StorageError;

/// Outcome of one table write, for pipeline stats and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableWriteStats {
    pub table: &'static str,
    pub rows: usize,
    pub files: usize,
    pub bytes: usize,
}

/// Writes star-schema tables under a single output root.
///
/// Each write replaces the table's previous output wholesale: the
/// `table/` prefix is cleared, then one Parquet file per Hive partition
/// is uploaded. Partition columns live in the directory path and are
/// excluded from the file schema.
pub struct TableSink {
    storage: StorageProvider,
    compression: Compression,
}

impl TableSink {
    /// Create a sink rooted at the configured output URI.
    pub async fn new(config: &SinkConfig) -> Result<Self, StorageError> {
        let storage =
            StorageProvider::for_url_with_options(&config.path, config.storage_options.clone())
                .await?;

        Ok(Self {
            storage,
            compression: config.compression.to_parquet(),
        })
    }

    /// Create a sink over an existing provider, mainly for tests.
    pub fn with_storage(storage: StorageProvider, compression: Compression) -> Self {
        Self {
            storage,
            compression,
        }
    }

    /// Write a full table, replacing any previous run's output.
    ///
    /// An empty table still clears the prefix, so a rerun against
    /// shrunken input leaves no stale rows behind.
    pub async fn write_table<T: Table>(&self, rows: &[T]) -> Result<TableWriteStats, SinkError> {
        self.storage
            .delete_prefix(T::NAME)
            .await
            .context(OverwriteSnafu {
                prefix: T::NAME.to_string(),
            })?;

        // BTreeMap keeps partition ordering deterministic across runs
        let mut partitions: BTreeMap<String, Vec<&T>> = BTreeMap::new();
        for row in rows {
            let values = row.partition_values();
            let dir = if values.is_empty() {
                T::NAME.to_string()
            } else {
                format!("{}/{}", T::NAME, partition_path(&values))
            };
            partitions.entry(dir).or_default().push(row);
        }

        let mut stats = TableWriteStats {
            table: T::NAME,
            rows: rows.len(),
            files: 0,
            bytes: 0,
        };

        for (dir, group) in &partitions {
            let batch = T::to_batch(group).context(BatchBuildSnafu { table: T::NAME })?;
            let encoded = self.encode_parquet(&batch)?;
            stats.files += 1;
            stats.bytes += encoded.len();

            let path = Path::from(format!("{dir}/{}.parquet", Uuid::new_v4()));
            self.storage
                .put_parquet(&path, Bytes::from(encoded))
                .await
                .context(StorageWriteSnafu {
                    path: path.to_string(),
                })?;
        }

        info!(
            "Wrote table {}: {} rows across {} files ({} bytes) under {}",
            stats.table,
            stats.rows,
            stats.files,
            stats.bytes,
            self.storage.url()
        );

        Ok(stats)
    }

    fn encode_parquet(&self, batch: &arrow::array::RecordBatch) -> Result<Vec<u8>, SinkError> {
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .build();

        let mut buffer = Vec::new();
        let mut writer = ArrowWriter::try_new(&mut buffer, batch.schema(), Some(props))
            .context(WriterCreateSnafu)?;
        writer.write(batch).context(ParquetWriteSnafu)?;
        writer.close().context(WriterCloseSnafu)?;

        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::{SongRow, UserRow};
    use bytes::Bytes;
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
    use tempfile::TempDir;

    fn song(song_id: &str, year: i32, artist_id: &str) -> SongRow {
        SongRow {
            song_id: song_id.to_string(),
            title: "Halo".to_string(),
            artist_id: artist_id.to_string(),
            year,
            duration: 360.0,
        }
    }

    async fn sink_for(temp_dir: &TempDir) -> TableSink {
        let storage = StorageProvider::for_url(temp_dir.path().to_str().unwrap())
            .await
            .unwrap();
        TableSink::with_storage(storage, Compression::SNAPPY)
    }

    #[tokio::test]
    async fn test_partitioned_table_layout() {
        let temp_dir = TempDir::new().unwrap();
        let sink = sink_for(&temp_dir).await;

        let rows = vec![song("S1", 2008, "A1"), song("S2", 2008, "A2"), song("S3", 2013, "A1")];
        let stats = sink.write_table(&rows).await.unwrap();

        assert_eq!(stats.rows, 3);
        assert_eq!(stats.files, 3);
        assert!(temp_dir
            .path()
            .join("songs/year=2008/artist_id=A1")
            .is_dir());
        assert!(temp_dir
            .path()
            .join("songs/year=2013/artist_id=A1")
            .is_dir());
    }

    #[tokio::test]
    async fn test_unpartitioned_table_is_single_file() {
        let temp_dir = TempDir::new().unwrap();
        let sink = sink_for(&temp_dir).await;

        let rows = vec![
            UserRow {
                user_id: "26".to_string(),
                first_name: Some("Ryan".to_string()),
                last_name: None,
                gender: None,
                level: Some("free".to_string()),
            },
            UserRow {
                user_id: "44".to_string(),
                first_name: None,
                last_name: None,
                gender: None,
                level: Some("paid".to_string()),
            },
        ];
        let stats = sink.write_table(&rows).await.unwrap();
        assert_eq!(stats.files, 1);

        let entries: Vec<_> = std::fs::read_dir(temp_dir.path().join("users"))
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert_eq!(entries.len(), 1);

        let bytes = std::fs::read(&entries[0]).unwrap();
        let reader = ParquetRecordBatchReaderBuilder::try_new(Bytes::from(bytes))
            .unwrap()
            .build()
            .unwrap();
        let total: usize = reader.map(|b| b.unwrap().num_rows()).sum();
        assert_eq!(total, 2);
    }

    #[tokio::test]
    async fn test_partition_columns_excluded_from_file_schema() {
        let temp_dir = TempDir::new().unwrap();
        let sink = sink_for(&temp_dir).await;

        sink.write_table(&[song("S1", 2008, "A1")]).await.unwrap();

        let dir = temp_dir.path().join("songs/year=2008/artist_id=A1");
        let file = std::fs::read_dir(&dir).unwrap().next().unwrap().unwrap();
        let bytes = std::fs::read(file.path()).unwrap();

        let builder = ParquetRecordBatchReaderBuilder::try_new(Bytes::from(bytes)).unwrap();
        let fields: Vec<_> = builder
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect();
        assert_eq!(fields, vec!["song_id", "title", "duration"]);
    }

    #[tokio::test]
    async fn test_rerun_replaces_previous_output() {
        let temp_dir = TempDir::new().unwrap();
        let sink = sink_for(&temp_dir).await;

        sink.write_table(&[song("S1", 2008, "A1"), song("S2", 1999, "A9")])
            .await
            .unwrap();
        assert!(temp_dir.path().join("songs/year=1999/artist_id=A9").is_dir());

        // Second run no longer contains the 1999 song
        sink.write_table(&[song("S1", 2008, "A1")]).await.unwrap();

        let stale = temp_dir.path().join("songs/year=1999/artist_id=A9");
        let stale_files = std::fs::read_dir(&stale)
            .map(|d| d.count())
            .unwrap_or_default();
        assert_eq!(stale_files, 0);

        let kept = temp_dir.path().join("songs/year=2008/artist_id=A1");
        assert_eq!(std::fs::read_dir(&kept).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_empty_table_clears_prefix() {
        let temp_dir = TempDir::new().unwrap();
        let sink = sink_for(&temp_dir).await;

        sink.write_table(&[song("S1", 2008, "A1")]).await.unwrap();
        let stats = sink.write_table::<SongRow>(&[]).await.unwrap();

        assert_eq!(stats.rows, 0);
        assert_eq!(stats.files, 0);
        let remaining = temp_dir
            .path()
            .join("songs/year=2008/artist_id=A1")
            .read_dir()
            .map(|d| d.count())
            .unwrap_or_default();
        assert_eq!(remaining, 0);
    }
}
