//! Data models for track enrichment.

use super::likability::likability_score;
use crate::history::track_id_from_uri;
use serde::{Deserialize, Serialize};

/// Genre list used when nothing better is known.
pub const UNKNOWN_GENRE: &str = "Unknown";

/// A track to enrich, usually one of the most played tracks of a history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackQuery {
    pub artist: String,
    pub track: String,
    pub count: u64,
    /// `spotify:track:<id>` reference from the export, if any.
    pub external_ref: Option<String>,
}

impl TrackQuery {
    pub fn new(artist: impl Into<String>, track: impl Into<String>, count: u64) -> Self {
        Self {
            artist: artist.into(),
            track: track.into(),
            count,
            external_ref: None,
        }
    }

    pub fn with_external_ref(mut self, external_ref: impl Into<String>) -> Self {
        self.external_ref = Some(external_ref.into());
        self
    }

    pub fn track_id(&self) -> Option<&str> {
        self.external_ref.as_deref().and_then(track_id_from_uri)
    }

    /// Case-insensitive `artist:track` key.
    pub fn cache_key(&self) -> String {
        format!(
            "{}:{}",
            self.artist.trim().to_lowercase(),
            self.track.trim().to_lowercase()
        )
    }
}

/// Audio features as reported by the metadata service.
///
/// The seven descriptive features are in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioFeatures {
    pub danceability: f64,
    pub energy: f64,
    pub valence: f64,
    pub speechiness: f64,
    pub acousticness: f64,
    pub instrumentalness: f64,
    pub liveness: f64,
    /// Beats per minute.
    pub tempo: f64,
    /// Pitch class, -1 when undetected.
    pub key: i32,
    /// 1 = major, 0 = minor.
    pub mode: i32,
    /// Decibels, typically -60..0.
    pub loudness: f64,
}

/// Where a track's genre and feature data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Remote,
    Generated,
    Unknown,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::Remote => "remote",
            Provenance::Generated => "generated",
            Provenance::Unknown => "unknown",
        }
    }
}

/// Track reference returned by the metadata service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackRef {
    pub id: String,
    pub name: String,
    /// First credited artist.
    pub artist_id: Option<String>,
    pub popularity: u32,
}

/// Output of a [`Resolver`](super::Resolver).
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMetadata {
    pub genres: Vec<String>,
    pub audio_features: Option<AudioFeatures>,
    pub popularity: u32,
    pub provenance: Provenance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedTrack {
    pub artist: String,
    pub track: String,
    pub play_count: u64,
    pub genres: Vec<String>,
    pub audio_features: Option<AudioFeatures>,
    pub popularity: Option<u32>,
    pub likability: f64,
    pub provenance: Provenance,
}

impl EnrichedTrack {
    pub fn from_resolved(query: &TrackQuery, resolved: ResolvedMetadata) -> Self {
        let likability = resolved
            .audio_features
            .as_ref()
            .map(|features| likability_score(features, resolved.popularity))
            .unwrap_or(0.0);
        let genres = if resolved.genres.is_empty() {
            vec![UNKNOWN_GENRE.to_string()]
        } else {
            resolved.genres
        };

        Self {
            artist: query.artist.clone(),
            track: query.track.clone(),
            play_count: query.count,
            genres,
            audio_features: resolved.audio_features,
            popularity: Some(resolved.popularity),
            likability,
            provenance: resolved.provenance,
        }
    }

    /// Placeholder for a track whose enrichment failed outright.
    pub fn unknown(query: &TrackQuery) -> Self {
        Self {
            artist: query.artist.clone(),
            track: query.track.clone(),
            play_count: query.count,
            genres: vec![UNKNOWN_GENRE.to_string()],
            audio_features: None,
            popularity: None,
            likability: 0.0,
            provenance: Provenance::Unknown,
        }
    }
}
