//! Artists dimension table.

use std::sync::Arc;

use arrow::array::{Float64Array, RecordBatch, StringArray};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::error::ArrowError;

use super::Table;

/// One row of the Artists dimension, projected and renamed from the
/// catalog record's `artist_*` fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtistRow {
    pub artist_id: String,
    pub name: String,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl ArtistRow {
    /// Full-row equality key with bitwise float comparison.
    pub fn dedup_key(&self) -> (String, String, Option<String>, Option<u64>, Option<u64>) {
        (
            self.artist_id.clone(),
            self.name.clone(),
            self.location.clone(),
            self.latitude.map(f64::to_bits),
            self.longitude.map(f64::to_bits),
        )
    }
}

impl Table for ArtistRow {
    const NAME: &'static str = "artists";
    const PARTITION_COLUMNS: &'static [&'static str] = &[];

    fn file_schema() -> SchemaRef {
        Arc::new(Schema::new(vec![
            Field::new("artist_id", DataType::Utf8, false),
            Field::new("name", DataType::Utf8, false),
            Field::new("location", DataType::Utf8, true),
            Field::new("latitude", DataType::Float64, true),
            Field::new("longitude", DataType::Float64, true),
        ]))
    }

    fn partition_values(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }

    fn to_batch(rows: &[&Self]) -> Result<RecordBatch, ArrowError> {
        RecordBatch::try_new(
            Self::file_schema(),
            vec![
                Arc::new(StringArray::from_iter_values(
                    rows.iter().map(|r| r.artist_id.as_str()),
                )),
                Arc::new(StringArray::from_iter_values(
                    rows.iter().map(|r| r.name.as_str()),
                )),
                Arc::new(StringArray::from_iter(
                    rows.iter().map(|r| r.location.as_deref()),
                )),
                Arc::new(Float64Array::from_iter(rows.iter().map(|r| r.latitude))),
                Arc::new(Float64Array::from_iter(rows.iter().map(|r| r.longitude))),
            ],
        )
    }
}
