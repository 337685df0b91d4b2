//! Time dimension table.
//!
//! One row per distinct event timestamp. The key is the raw
//! epoch-millisecond value (stored as a UTC millisecond timestamp); all
//! calendar fields are functions of it, decomposed in UTC so runs are
//! reproducible across machines.

use std::sync::Arc;

use arrow::array::{Int32Array, RecordBatch, TimestampMillisecondArray};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef, TimeUnit};
use arrow::error::ArrowError;
use chrono::{DateTime, Datelike, Timelike, Utc};

use super::Table;

/// One row of the Time dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRow {
    /// Raw event timestamp, epoch milliseconds.
    pub start_time: i64,
    /// Hour of day, 0-23.
    pub hour: i32,
    /// Day of month, 1-31.
    pub day: i32,
    /// ISO week of year, 1-53.
    pub week: i32,
    /// Month, 1-12.
    pub month: i32,
    /// Calendar year.
    pub year: i32,
    /// Day of week, 1 = Sunday through 7 = Saturday.
    pub weekday: i32,
}

impl TimeRow {
    /// Decompose an epoch-millisecond timestamp into calendar fields.
    pub fn from_millis(millis: i64) -> Self {
        let dt: DateTime<Utc> = DateTime::from_timestamp_millis(millis).unwrap_or_default();

        Self {
            start_time: millis,
            hour: dt.hour() as i32,
            day: dt.day() as i32,
            week: dt.iso_week().week() as i32,
            month: dt.month() as i32,
            year: dt.year(),
            weekday: dt.weekday().num_days_from_sunday() as i32 + 1,
        }
    }
}

impl Table for TimeRow {
    const NAME: &'static str = "time";
    const PARTITION_COLUMNS: &'static [&'static str] = &["year", "month"];

    fn file_schema() -> SchemaRef {
        Arc::new(Schema::new(vec![
            Field::new(
                "start_time",
                DataType::Timestamp(TimeUnit::Millisecond, Some("UTC".into())),
                false,
            ),
            Field::new("hour", DataType::Int32, false),
            Field::new("day", DataType::Int32, false),
            Field::new("week", DataType::Int32, false),
            Field::new("weekday", DataType::Int32, false),
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
                Arc::new(
                    TimestampMillisecondArray::from_iter_values(
                        rows.iter().map(|r| r.start_time),
                    )
                    .with_timezone("UTC"),
                ),
                Arc::new(Int32Array::from_iter_values(rows.iter().map(|r| r.hour))),
                Arc::new(Int32Array::from_iter_values(rows.iter().map(|r| r.day))),
                Arc::new(Int32Array::from_iter_values(rows.iter().map(|r| r.week))),
                Arc::new(Int32Array::from_iter_values(
                    rows.iter().map(|r| r.weekday),
                )),
            ],
        )
    }
}
