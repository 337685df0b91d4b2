//! Fact assembler: resolve play events against the dimensions.

use std::collections::HashMap;

use tracing::info;

use crate::model::PlayEvent;
use crate::tables::{ArtistRow, SongRow, SongplayRow, TimeRow};

/// Resolve each play event to the Songplays fact table.
///
/// A play yields a fact row only when all three lookups succeed: a song
/// matching on title and exact duration, that song's artist matching the
/// event's artist name, and a time row for the raw timestamp. Unmatched
/// plays are silently excluded (the catalog is a sample and most plays
/// will not resolve).
///
/// The fact row's `location` is the matched artist's location; only
/// `user_agent` comes from the event itself.
///
/// With a deduplicated catalog each lookup is at most one row, so the
/// output never exceeds the input: |Songplays| <= |PlayEvents|. When the
/// catalog still holds several rows for one index key (two artist rows
/// sharing an `artist_id`, say), the last occurrence wins the index slot
/// and is the only candidate a play can match.
pub fn assemble_songplays(
    plays: &[PlayEvent],
    songs: &[SongRow],
    artists: &[ArtistRow],
    times: &[TimeRow],
) -> Vec<SongplayRow> {
    let song_index: HashMap<(&str, u64), &SongRow> = songs
        .iter()
        .map(|s| ((s.title.as_str(), s.duration.to_bits()), s))
        .collect();
    let artist_index: HashMap<&str, &ArtistRow> =
        artists.iter().map(|a| (a.artist_id.as_str(), a)).collect();
    let time_index: HashMap<i64, &TimeRow> =
        times.iter().map(|t| (t.start_time, t)).collect();

    let mut rows = Vec::new();

    for play in plays {
        let Some(song) = song_index.get(&(play.song.as_str(), play.length.to_bits())) else {
            continue;
        };
        let Some(artist) = artist_index.get(song.artist_id.as_str()) else {
            continue;
        };
        if artist.name != play.artist {
            continue;
        }
        let Some(time) = time_index.get(&play.ts) else {
            continue;
        };

        rows.push(SongplayRow {
            songplay_id: rows.len() as i64,
            start_time: play.ts,
            user_id: play.user_id.clone(),
            level: play.level.clone(),
            song_id: song.song_id.clone(),
            artist_id: song.artist_id.clone(),
            session_id: play.session_id,
            location: artist.location.clone(),
            user_agent: play.user_agent.clone(),
            year: time.year,
            month: time.month,
        });
    }

    info!(
        "Assembled {} songplays from {} play events",
        rows.len(),
        plays.len()
    );

    rows
}
