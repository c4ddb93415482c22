//! Test fixture creation
//!
//! Writes streaming history exports to temporary directories.

use super::constants::*;
use anyhow::Result;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn play(ts: &str, track: &str, ms_played: u64, extra: Value) -> Value {
    let mut entry = json!({
        "ts": ts,
        "platform": "Linux",
        "ms_played": ms_played,
        "master_metadata_track_name": track,
        "master_metadata_album_artist_name": ARTIST_1_NAME,
        "master_metadata_album_album_name": "Music Has the Right to Children",
        "shuffle": false,
        "skipped": false,
        "offline": false
    });
    if let (Some(target), Some(extra)) = (entry.as_object_mut(), extra.as_object()) {
        for (key, value) in extra {
            target.insert(key.clone(), value.clone());
        }
    }
    entry
}

/// First export: two sessions on Monday 2024-03-04, one play on Tuesday,
/// plus a short play and a podcast episode that normalization drops.
pub fn export_1() -> Value {
    json!([
        play(
            "2024-03-04T08:00:00Z",
            TRACK_1_NAME,
            180_000,
            json!({"spotify_track_uri": format!("spotify:track:{}", TRACK_1_ID), "shuffle": true})
        ),
        play("2024-03-04T08:04:00Z", TRACK_2_NAME, 240_000, json!({})),
        play("2024-03-04T08:10:00Z", TRACK_BROKEN_NAME, 90_000, json!({"skipped": true})),
        play("2024-03-04T09:00:00Z", TRACK_1_NAME, 180_000, json!({"platform": "Android"})),
        play("2024-03-05T20:00:00Z", TRACK_1_NAME, 180_000, json!({"offline": true})),
        play("2024-03-05T20:05:00Z", TRACK_2_NAME, 10_000, json!({"skipped": true})),
        {
            "ts": "2024-03-05T21:00:00Z",
            "ms_played": 1_200_000,
            "master_metadata_track_name": null,
            "master_metadata_album_artist_name": null,
            "episode_name": "Some Podcast Episode"
        }
    ])
}

/// Second export: repeats the last two kept plays of the first and adds one
/// play on Wednesday.
pub fn export_2() -> Value {
    json!([
        play("2024-03-04T09:00:00Z", TRACK_1_NAME, 180_000, json!({"platform": "Android"})),
        play("2024-03-05T20:00:00Z", TRACK_1_NAME, 180_000, json!({"offline": true})),
        play("2024-03-06T07:00:00Z", TRACK_2_NAME, 240_000, json!({})),
    ])
}

pub fn write_export(dir: &Path, name: &str, content: &Value) -> Result<PathBuf> {
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_string_pretty(content)?)?;
    Ok(path)
}

/// Creates a temporary directory holding both fixture exports.
///
/// Returns the directory guard and the two file paths.
pub fn create_test_exports() -> Result<(TempDir, PathBuf, PathBuf)> {
    let dir = TempDir::new()?;
    let first = write_export(dir.path(), "Streaming_History_Audio_2024_0.json", &export_1())?;
    let second = write_export(dir.path(), "Streaming_History_Audio_2024_1.json", &export_2())?;
    Ok((dir, first, second))
}
