//! Catalog loader: Songs and Artists dimensions from raw catalog records.

use std::collections::HashSet;

use tracing::info;

use crate::model::SongRecord;
use crate::tables::{ArtistRow, SongRow};

/// Project catalog records into the Songs and Artists dimensions.
///
/// Both tables are deduplicated by full-row equality (a record repeated
/// across catalog files collapses to one row); input order is preserved
/// with the first occurrence kept.
pub fn load_catalog(records: &[SongRecord]) -> (Vec<SongRow>, Vec<ArtistRow>) {
    let songs = project_songs(records);
    let artists = project_artists(records);

    info!(
        "Catalog: {} records -> {} songs, {} artists",
        records.len(),
        songs.len(),
        artists.len()
    );

    (songs, artists)
}

fn project_songs(records: &[SongRecord]) -> Vec<SongRow> {
    let mut seen = HashSet::new();
    let mut rows = Vec::new();

    for record in records {
        let row = SongRow {
            song_id: record.song_id.clone(),
            title: record.title.clone(),
            artist_id: record.artist_id.clone(),
            year: record.year,
            duration: record.duration,
        };

        if seen.insert(row.dedup_key()) {
            rows.push(row);
        }
    }

    rows
}

fn project_artists(records: &[SongRecord]) -> Vec<ArtistRow> {
    let mut seen = HashSet::new();
    let mut rows = Vec::new();

    for record in records {
        let row = ArtistRow {
            artist_id: record.artist_id.clone(),
            name: record.artist_name.clone(),
            location: record.artist_location.clone(),
            latitude: record.artist_latitude,
            longitude: record.artist_longitude,
        };

        if seen.insert(row.dedup_key()) {
            rows.push(row);
        }
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(song_id: &str, title: &str, year: i32, duration: f64) -> SongRecord {
        SongRecord {
            song_id: song_id.to_string(),
            title: title.to_string(),
            artist_id: "A1".to_string(),
            year,
            duration,
            artist_name: "Beyonce".to_string(),
            artist_location: Some("Houston, TX".to_string()),
            artist_latitude: Some(29.76),
            artist_longitude: Some(-95.37),
        }
    }

    #[test]
    fn test_exact_duplicate_songs_collapse() {
        let records = vec![
            record("S1", "Halo", 2008, 360.0),
            record("S1", "Halo", 2008, 360.0),
        ];

        let (songs, artists) = load_catalog(&records);
        assert_eq!(songs.len(), 1);
        // Same artist fields on both records, so Artists collapses too
        assert_eq!(artists.len(), 1);
    }

    #[test]
    fn test_same_song_id_different_fields_both_survive() {
        // Dedup is by full-row equality, not by key
        let records = vec![
            record("S1", "Halo", 2008, 360.0),
            record("S1", "Halo", 2008, 361.0),
        ];

        let (songs, _) = load_catalog(&records);
        assert_eq!(songs.len(), 2);
    }

    #[test]
    fn test_artists_project_and_rename() {
        let records = vec![record("S1", "Halo", 2008, 360.0)];

        let (_, artists) = load_catalog(&records);
        assert_eq!(artists.len(), 1);
        assert_eq!(artists[0].artist_id, "A1");
        assert_eq!(artists[0].name, "Beyonce");
        assert_eq!(artists[0].location.as_deref(), Some("Houston, TX"));
        assert_eq!(artists[0].latitude, Some(29.76));
        assert_eq!(artists[0].longitude, Some(-95.37));
    }

    #[test]
    fn test_one_artist_from_many_songs() {
        let records = vec![
            record("S1", "Halo", 2008, 360.0),
            record("S2", "Partition", 2013, 199.0),
        ];

        let (songs, artists) = load_catalog(&records);
        assert_eq!(songs.len(), 2);
        assert_eq!(artists.len(), 1);
    }

    #[test]
    fn test_input_order_preserved() {
        let records = vec![
            record("S2", "Partition", 2013, 199.0),
            record("S1", "Halo", 2008, 360.0),
            record("S2", "Partition", 2013, 199.0),
        ];

        let (songs, _) = load_catalog(&records);
        assert_eq!(songs.len(), 2);
        assert_eq!(songs[0].song_id, "S2");
        assert_eq!(songs[1].song_id, "S1");
    }

    #[test]
    fn test_empty_input() {
        let (songs, artists) = load_catalog(&[]);
        assert!(songs.is_empty());
        assert!(artists.is_empty());
    }
}
