//! Output tables of the star schema.
//!
//! Each table is a typed row struct plus the metadata the sink needs to
//! lay it out on storage: a name, the partition columns, and an Arrow
//! schema for the Parquet files. Partition column values are encoded in
//! the directory path and excluded from the file schema, matching the
//! layout query engines expect for partitioned tables.

mod artists;
mod songplays;
mod songs;
mod time;
mod users;

pub use artists::ArtistRow;
pub use songplays::SongplayRow;
pub use songs::SongRow;
pub use time::TimeRow;
pub use users::UserRow;

use arrow::array::RecordBatch;
use arrow::datatypes::SchemaRef;
use arrow::error::ArrowError;

/// A writable output table.
pub trait Table: Sized {
    /// Table name; also the subpath under the sink root.
    const NAME: &'static str;

    /// Partition columns, in path order. Empty for unpartitioned tables.
    const PARTITION_COLUMNS: &'static [&'static str];

    /// Schema of the Parquet files (partition columns excluded).
    fn file_schema() -> SchemaRef;

    /// Partition values for this row, aligned with `PARTITION_COLUMNS`.
    fn partition_values(&self) -> Vec<(&'static str, String)>;

    /// Build a record batch from rows that share a partition.
    fn to_batch(rows: &[&Self]) -> Result<RecordBatch, ArrowError>;
}
