//! Listening session detection.
//!
//! Plays separated by more than [`SESSION_GAP_MINUTES`] start a new session.

use super::round2;
use crate::history::NormalizedRecord;
use chrono::Duration;
use serde::{Deserialize, Serialize};

pub const SESSION_GAP_MINUTES: i64 = 30;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub average_session_minutes: f64,
    pub average_tracks_per_session: f64,
    pub total_sessions: u64,
}

/// Group plays into sessions by start-time gaps.
///
/// Input order does not matter, plays are sorted by timestamp first.
pub fn compute_sessions(records: &[NormalizedRecord]) -> SessionStats {
    if records.is_empty() {
        return SessionStats::default();
    }

    let mut ordered: Vec<&NormalizedRecord> = records.iter().collect();
    ordered.sort_by_key(|r| r.timestamp);

    let gap = Duration::minutes(SESSION_GAP_MINUTES);
    let mut sessions: Vec<(u64, u64)> = Vec::new(); // (ms played, track count)
    let mut previous = None;
    for record in ordered {
        let starts_new = match previous {
            None => true,
            Some(prev) => record.timestamp - prev > gap,
        };
        if starts_new {
            sessions.push((0, 0));
        }
        if let Some(current) = sessions.last_mut() {
            current.0 += record.ms_played;
            current.1 += 1;
        }
        previous = Some(record.timestamp);
    }

    let total = sessions.len() as f64;
    let total_ms: u64 = sessions.iter().map(|s| s.0).sum();
    let total_tracks: u64 = sessions.iter().map(|s| s.1).sum();

    SessionStats {
        average_session_minutes: round2(total_ms as f64 / total / 60_000.0),
        average_tracks_per_session: round2(total_tracks as f64 / total),
        total_sessions: sessions.len() as u64,
    }
}
