//! Raw input records.
//!
//! These are the shapes of the JSON documents in object storage, typed
//! explicitly rather than schema-inferred. Unknown fields (e.g.
//! `num_songs` on catalog records) are ignored by serde.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// One song-catalog record. Source of truth for the Songs and Artists
/// dimensions.
#[derive(Debug, Clone, Deserialize)]
pub struct SongRecord {
    pub song_id: String,
    pub title: String,
    pub artist_id: String,
    pub year: i32,
    pub duration: f64,
    pub artist_name: String,
    #[serde(default)]
    pub artist_location: Option<String>,
    #[serde(default)]
    pub artist_latitude: Option<f64>,
    #[serde(default)]
    pub artist_longitude: Option<f64>,
}

/// One logged client action. Most fields are nullable because non-play
/// actions (login, logout, home page) carry no song or user detail.
#[derive(Debug, Clone, Deserialize)]
pub struct EventRecord {
    /// Event timestamp in epoch milliseconds.
    pub ts: i64,
    pub page: String,
    #[serde(rename = "sessionId")]
    pub session_id: i64,
    #[serde(rename = "userId", default)]
    pub user_id: Option<String>,
    #[serde(rename = "firstName", default)]
    pub first_name: Option<String>,
    #[serde(rename = "lastName", default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub song: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub length: Option<f64>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(rename = "userAgent", default)]
    pub user_agent: Option<String>,
}

impl EventRecord {
    /// Whether this row is a song play.
    pub fn is_play(&self) -> bool {
        self.page == "NextSong"
    }
}

/// A song-play event: the subset of `EventRecord` fields the fact
/// assembler needs, with the nullable play fields resolved.
///
/// Conversion fails (returns `None`) for play rows missing any of the
/// fields the join or fact projection requires.
#[derive(Debug, Clone)]
pub struct PlayEvent {
    pub ts: i64,
    pub user_id: String,
    pub level: String,
    pub song: String,
    pub artist: String,
    pub length: f64,
    pub session_id: i64,
    pub user_agent: Option<String>,
}

impl PlayEvent {
    /// Build a play event from a raw record, or `None` if the record is
    /// not a play or lacks a required field.
    pub fn from_record(record: &EventRecord) -> Option<Self> {
        if !record.is_play() {
            return None;
        }

        Some(Self {
            ts: record.ts,
            user_id: record.user_id.clone().filter(|id| !id.is_empty())?,
            level: record.level.clone()?,
            song: record.song.clone()?,
            artist: record.artist.clone()?,
            length: record.length?,
            session_id: record.session_id,
            user_agent: record.user_agent.clone(),
        })
    }

    /// The event timestamp truncated to whole epoch seconds.
    pub fn epoch_seconds(&self) -> i64 {
        self.ts.div_euclid(1000)
    }

    /// The event timestamp as a UTC datetime.
    ///
    /// `ts` values come from client logs and are always in range; an
    /// out-of-range value falls back to the epoch rather than panicking.
    pub fn datetime(&self) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp_millis(self.ts).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play_record() -> EventRecord {
        serde_json::from_str(
            r#"{"ts": 1541721000000, "page": "NextSong", "sessionId": 583,
                "userId": "26", "firstName": "Ryan", "lastName": "Smith",
                "gender": "M", "level": "free", "song": "Halo",
                "artist": "Beyonce", "length": 360.0,
                "location": "San Jose-Sunnyvale-Santa Clara, CA",
                "userAgent": "Mozilla/5.0"}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_play_event_from_next_song_record() {
        let record = play_record();
        let play = PlayEvent::from_record(&record).unwrap();

        assert_eq!(play.ts, 1541721000000);
        assert_eq!(play.user_id, "26");
        assert_eq!(play.song, "Halo");
        assert_eq!(play.epoch_seconds(), 1541721000);
    }

    #[test]
    fn test_non_play_record_is_skipped() {
        let record: EventRecord = serde_json::from_str(
            r#"{"ts": 1541721000000, "page": "Home", "sessionId": 583, "userId": "26"}"#,
        )
        .unwrap();

        assert!(!record.is_play());
        assert!(PlayEvent::from_record(&record).is_none());
    }

    #[test]
    fn test_play_record_with_empty_user_id_is_skipped() {
        let mut record = play_record();
        record.user_id = Some(String::new());

        assert!(PlayEvent::from_record(&record).is_none());
    }

    #[test]
    fn test_datetime_is_utc_decomposition_input() {
        let play = PlayEvent::from_record(&play_record()).unwrap();
        assert_eq!(play.datetime().to_rfc3339(), "2018-11-08T23:50:00+00:00");
    }
}
