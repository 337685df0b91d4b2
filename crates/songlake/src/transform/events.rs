//! Event loader: Users and Time dimensions plus the play-event stream.

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::{debug, info};

use crate::model::{EventRecord, PlayEvent};
use crate::tables::{TimeRow, UserRow};

/// Derive the Users and Time dimensions from raw log records, keeping
/// the filtered play events for the fact assembler.
///
/// Only `NextSong` actions count. Play rows missing a field the fact
/// projection requires (user id, level, song, artist, length) are
/// dropped; they cannot join anyway.
pub fn load_events(records: Vec<EventRecord>) -> (Vec<UserRow>, Vec<TimeRow>, Vec<PlayEvent>) {
    let total = records.len();
    let mut plays = Vec::new();
    let mut user_rows = Vec::new();
    let mut dropped = 0usize;

    for record in &records {
        if !record.is_play() {
            continue;
        }
        match PlayEvent::from_record(record) {
            Some(play) => {
                user_rows.push(UserRow {
                    user_id: play.user_id.clone(),
                    first_name: record.first_name.clone(),
                    last_name: record.last_name.clone(),
                    gender: record.gender.clone(),
                    level: Some(play.level.clone()),
                });
                plays.push(play);
            }
            None => {
                debug!(
                    "Dropping incomplete play event at ts {} (session {})",
                    record.ts, record.session_id
                );
                dropped += 1;
            }
        }
    }

    let users = dedup_users(user_rows);
    let time = project_time(&plays);

    info!(
        "Events: {} records -> {} plays ({} incomplete dropped), {} users, {} time rows",
        total,
        plays.len(),
        dropped,
        users.len(),
        time.len()
    );

    (users, time, plays)
}

/// Collapse identical user rows, then collapse by `user_id`.
///
/// When the same user appears with different attributes (typically a
/// free-to-paid level change) the last-seen row wins, kept at the
/// user's first-seen position.
fn dedup_users(candidates: Vec<UserRow>) -> Vec<UserRow> {
    let mut seen_rows = HashSet::new();
    let mut position: HashMap<String, usize> = HashMap::new();
    let mut rows: Vec<UserRow> = Vec::new();

    for row in candidates {
        if !seen_rows.insert(row.clone()) {
            continue;
        }

        match position.get(&row.user_id) {
            Some(&index) => rows[index] = row,
            None => {
                position.insert(row.user_id.clone(), rows.len());
                rows.push(row);
            }
        }
    }

    rows
}

/// Decompose every distinct event timestamp into a Time row, ordered by
/// `start_time`.
fn project_time(plays: &[PlayEvent]) -> Vec<TimeRow> {
    let mut by_millis = BTreeMap::new();

    for play in plays {
        by_millis
            .entry(play.ts)
            .or_insert_with(|| TimeRow::from_millis(play.ts));
    }

    by_millis.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play_json(ts: i64, user_id: &str, level: &str) -> String {
        format!(
            r#"{{"ts": {ts}, "page": "NextSong", "sessionId": 583,
                "userId": "{user_id}", "firstName": "Ryan", "lastName": "Smith",
                "gender": "M", "level": "{level}", "song": "Halo",
                "artist": "Beyonce", "length": 360.0}}"#
        )
    }

    fn parse(json: &str) -> EventRecord {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_non_play_events_are_filtered() {
        let records = vec![
            parse(&play_json(1541721000000, "26", "free")),
            parse(r#"{"ts": 1541721000001, "page": "Home", "sessionId": 583, "userId": "26"}"#),
        ];

        let (users, time, plays) = load_events(records);
        assert_eq!(plays.len(), 1);
        assert_eq!(users.len(), 1);
        assert_eq!(time.len(), 1);
        assert_eq!(users[0].first_name.as_deref(), Some("Ryan"));
    }

    #[test]
    fn test_identical_user_rows_collapse() {
        let records = vec![
            parse(&play_json(1541721000000, "26", "free")),
            parse(&play_json(1541721060000, "26", "free")),
        ];

        let (users, time, plays) = load_events(records);
        assert_eq!(plays.len(), 2);
        assert_eq!(users.len(), 1);
        assert_eq!(time.len(), 2);
    }

    #[test]
    fn test_level_change_keeps_last_seen_row() {
        let records = vec![
            parse(&play_json(1541721000000, "26", "free")),
            parse(&play_json(1541721060000, "44", "paid")),
            parse(&play_json(1541721120000, "26", "paid")),
        ];

        let (users, _, _) = load_events(records);
        assert_eq!(users.len(), 2);
        // First-seen position, last-seen attributes
        assert_eq!(users[0].user_id, "26");
        assert_eq!(users[0].level.as_deref(), Some("paid"));
        assert_eq!(users[1].user_id, "44");
    }

    #[test]
    fn test_time_rows_are_distinct_and_sorted() {
        let records = vec![
            parse(&play_json(1541721060000, "26", "free")),
            parse(&play_json(1541721000000, "26", "free")),
            parse(&play_json(1541721060000, "44", "paid")),
        ];

        let (_, time, _) = load_events(records);
        assert_eq!(time.len(), 2);
        assert_eq!(time[0].start_time, 1541721000000);
        assert_eq!(time[1].start_time, 1541721060000);
        assert_eq!(time[0].hour, 23);
        assert_eq!(time[0].weekday, 5);
    }

    #[test]
    fn test_incomplete_play_is_dropped_not_fatal() {
        let records = vec![parse(
            r#"{"ts": 1541721000000, "page": "NextSong", "sessionId": 583, "userId": "26"}"#,
        )];

        let (users, time, plays) = load_events(records);
        assert!(plays.is_empty());
        assert!(users.is_empty());
        assert!(time.is_empty());
    }
}
