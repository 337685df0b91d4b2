//! Songs dimension table.

use std::sync::Arc;

use arrow::array::{Float64Array, RecordBatch, StringArray};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::error::ArrowError;

use super::Table;

/// One row of the Songs dimension, projected from a catalog record.
#[derive(Debug, Clone, PartialEq)]
pub struct SongRow {
    pub song_id: String,
    pub title: String,
    pub artist_id: String,
    pub year: i32,
    pub duration: f64,
}

impl SongRow {
    /// Full-row equality key. Floats are compared bitwise, so two rows
    /// dedup only on an exact duration match.
    pub fn dedup_key(&self) -> (String, String, String, i32, u64) {
        (
            self.song_id.clone(),
            self.title.clone(),
            self.artist_id.clone(),
            self.year,
            self.duration.to_bits(),
        )
    }
}

impl Table for SongRow {
    const NAME: &'static str = "songs";
    const PARTITION_COLUMNS: &'static [&'static str] = &["year", "artist_id"];

    fn file_schema() -> SchemaRef {
        Arc::new(Schema::new(vec![
            Field::new("song_id", DataType::Utf8, false),
            Field::new("title", DataType::Utf8, false),
            Field::new("duration", DataType::Float64, false),
        ]))
    }

    fn partition_values(&self) -> Vec<(&'static str, String)> {
        vec![
            ("year", self.year.to_string()),
            ("artist_id", self.artist_id.clone()),
        ]
    }

    fn to_batch(rows: &[&Self]) -> Result<RecordBatch, ArrowError> {
        RecordBatch::try_new(
            Self::file_schema(),
            vec![
                Arc::new(StringArray::from_iter_values(
                    rows.iter().map(|r| r.song_id.as_str()),
                )),
                Arc::new(StringArray::from_iter_values(
                    rows.iter().map(|r| r.title.as_str()),
                )),
                Arc::new(Float64Array::from_iter_values(
                    rows.iter().map(|r| r.duration),
                )),
            ],
        )
    }
}
