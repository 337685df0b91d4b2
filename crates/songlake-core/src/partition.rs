//! Hive-style partition path construction.
//!
//! Builds `key=value` directory prefixes from partition column values, the
//! layout expected by query engines reading partitioned Parquet tables.

/// Build a Hive-style partition path from ordered `(column, value)` pairs.
///
/// Returns an empty string for an empty column list, so unpartitioned
/// tables can join the result with a filename without special-casing.
///
/// # Examples
///
/// ```
/// use songlake_core::partition_path;
///
/// let path = partition_path(&[("year", "2008".into()), ("artist_id", "AR1".into())]);
/// assert_eq!(path, "year=2008/artist_id=AR1");
///
/// assert_eq!(partition_path(&[]), "");
/// ```
pub fn partition_path(values: &[(&str, String)]) -> String {
    values
        .iter()
        .map(|(column, value)| format!("{column}={}", escape_value(value)))
        .collect::<Vec<_>>()
        .join("/")
}

/// Escape characters that would corrupt the directory structure.
///
/// Partition values come from data columns (artist ids, years, months) and
/// are normally path-safe, but a `/` or `=` in a value must not introduce
/// spurious path segments.
fn escape_value(value: &str) -> String {
    if value.contains(['/', '=', '\0']) {
        value
            .chars()
            .map(|c| match c {
                '/' => "%2F".to_string(),
                '=' => "%3D".to_string(),
                '\0' => "%00".to_string(),
                other => other.to_string(),
            })
            .collect()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_column() {
        assert_eq!(partition_path(&[("year", "2018".into())]), "year=2018");
    }

    #[test]
    fn test_multiple_columns_preserve_order() {
        let path = partition_path(&[("year", "2018".into()), ("month", "11".into())]);
        assert_eq!(path, "year=2018/month=11");
    }

    #[test]
    fn test_empty_columns() {
        assert_eq!(partition_path(&[]), "");
    }

    #[test]
    fn test_escapes_path_separators() {
        let path = partition_path(&[("artist_id", "AR/1=2".into())]);
        assert_eq!(path, "artist_id=AR%2F1%3D2");
    }
}
