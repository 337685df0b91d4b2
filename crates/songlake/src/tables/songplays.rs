//! Songplays fact table.

use std::sync::Arc;

use arrow::array::{Int64Array, RecordBatch, StringArray, TimestampMillisecondArray};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef, TimeUnit};
use arrow::error::ArrowError;

use super::Table;

/// One row of the Songplays fact table: a play event that resolved to a
/// song, an artist and a time row.
#[derive(Debug, Clone, PartialEq)]
pub struct SongplayRow {
    /// Synthetic identifier, unique and monotonically increasing within a
    /// run. Not stable across runs.
    pub songplay_id: i64,
    /// Raw event timestamp, epoch milliseconds.
    pub start_time: i64,
    pub user_id: String,
    pub level: String,
    pub song_id: String,
    pub artist_id: String,
    pub session_id: i64,
    pub location: Option<String>,
    pub user_agent: Option<String>,
    /// Partition columns, taken from the matched Time row.
    pub year: i32,
    pub month: i32,
}

impl Table for SongplayRow {
    const NAME: &'static str = "songplays";
    const PARTITION_COLUMNS: &'static [&'static str] = &["year", "month"];

    fn file_schema() -> SchemaRef {
        Arc::new(Schema::new(vec![
            Field::new("songplay_id", DataType::Int64, false),
            Field::new(
                "start_time",
                DataType::Timestamp(TimeUnit::Millisecond, Some("UTC".into())),
                false,
            ),
            Field::new("user_id", DataType::Utf8, false),
            Field::new("level", DataType::Utf8, false),
            Field::new("song_id", DataType::Utf8, false),
            Field::new("artist_id", DataType::Utf8, false),
            Field::new("session_id", DataType::Int64, false),
            Field::new("location", DataType::Utf8, true),
            Field::new("user_agent", DataType::Utf8, true),
        ]))
    }

    fn partition_values(&self) -> Vec<(&'static str, String)> {
        vec![
            ("year", self.year.to_string()),
            ("month", self.month.to_string()),
        ]
    }

    fn to_batch(rows: &[&Self]) -> Result<RecordBatch, ArrowError> {
        RecordBatch::try_new(
            Self::file_schema(),
            vec![
                Arc::new(Int64Array::from_iter_values(
                    rows.iter().map(|r| r.songplay_id),
                )),
                Arc::new(
                    TimestampMillisecondArray::from_iter_values(
                        rows.iter().map(|r| r.start_time),
                    )
                    .with_timezone("UTC"),
                ),
                Arc::new(StringArray::from_iter_values(
                    rows.iter().map(|r| r.user_id.as_str()),
                )),
                Arc::new(StringArray::from_iter_values(
                    rows.iter().map(|r| r.level.as_str()),
                )),
                Arc::new(StringArray::from_iter_values(
                    rows.iter().map(|r| r.song_id.as_str()),
                )),
                Arc::new(StringArray::from_iter_values(
                    rows.iter().map(|r| r.artist_id.as_str()),
                )),
                Arc::new(Int64Array::from_iter_values(
                    rows.iter().map(|r| r.session_id),
                )),
                Arc::new(StringArray::from_iter(
                    rows.iter().map(|r| r.location.as_deref()),
                )),
                Arc::new(StringArray::from_iter(
                    rows.iter().map(|r| r.user_agent.as_deref()),
                )),
            ],
        )
    }
}
