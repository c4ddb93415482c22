//! Genre and audio-feature totals over a set of enriched tracks.

use super::models::{EnrichedTrack, Provenance, UNKNOWN_GENRE};
use crate::stats::{round2, NamedCount, OrderedCounter};
use serde::{Deserialize, Serialize};

/// Roll-up of an enrichment run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentSummary {
    pub enriched_tracks: usize,
    pub remote: usize,
    pub generated: usize,
    pub unknown: usize,
    /// Mean likability of tracks that got metadata. Unknown tracks are left out.
    pub average_likability: f64,
    /// Genres weighted by play count, most played first.
    pub genre_breakdown: Vec<NamedCount>,
}

impl EnrichmentSummary {
    pub fn from_tracks(tracks: &[EnrichedTrack]) -> Self {
        let mut summary = Self {
            enriched_tracks: tracks.len(),
            ..Default::default()
        };
        let mut genres = OrderedCounter::new();
        let mut likability_total = 0.0;

        for track in tracks {
            match track.provenance {
                Provenance::Remote => summary.remote += 1,
                Provenance::Generated => summary.generated += 1,
                Provenance::Unknown => {
                    summary.unknown += 1;
                    continue;
                }
            }
            likability_total += track.likability;
            for genre in track.genres.iter().filter(|g| g.as_str() != UNKNOWN_GENRE) {
                genres.add_count(genre, track.play_count);
            }
        }

        let resolved = summary.remote + summary.generated;
        if resolved > 0 {
            summary.average_likability = round2(likability_total / resolved as f64);
        }
        summary.genre_breakdown = genres
            .top(genres.len())
            .into_iter()
            .map(|(name, count)| NamedCount::new(name, count))
            .collect();
        summary
    }
}
