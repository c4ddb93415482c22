//! Deterministic stand-in for the metadata service.
//!
//! Seeds a small PRNG with a hash of the track key, so the same
//! `(artist, track)` pair always produces the same genres and features,
//! without network access or credentials.

use super::models::{AudioFeatures, Provenance, ResolvedMetadata, TrackQuery};
use super::resolver::{ResolveError, Resolver};
use async_trait::async_trait;

const SYNTHETIC_GENRES: [&str; 18] = [
    "pop",
    "rock",
    "hip hop",
    "indie",
    "electronic",
    "r&b",
    "jazz",
    "classical",
    "metal",
    "folk",
    "country",
    "latin",
    "soul",
    "punk",
    "reggae",
    "dance",
    "alternative",
    "blues",
];

const MAX_SYNTHETIC_GENRES: usize = 3;

/// 32-bit rolling string hash (`h * 31 + c` over UTF-16 units).
pub fn string_hash(s: &str) -> u32 {
    let mut hash: i32 = 0;
    for unit in s.encode_utf16() {
        hash = hash
            .wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(unit as i32);
    }
    hash.unsigned_abs()
}

/// mulberry32: tiny, fast, and good enough for fake metadata.
struct SeededRng {
    state: u32,
}

impl SeededRng {
    fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Uniform in `[0, 1)`.
    fn next_f64(&mut self) -> f64 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        (t ^ (t >> 14)) as f64 / 4_294_967_296.0
    }

    fn next_below(&mut self, bound: usize) -> usize {
        ((self.next_f64() * bound as f64) as usize).min(bound - 1)
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Synthetic genres, features and popularity for `query`.
pub fn generate_metadata(query: &TrackQuery) -> ResolvedMetadata {
    let mut rng = SeededRng::new(string_hash(&query.cache_key()));

    let genre_count = 1 + rng.next_below(MAX_SYNTHETIC_GENRES);
    let mut genres: Vec<String> = Vec::with_capacity(genre_count);
    while genres.len() < genre_count {
        let candidate = SYNTHETIC_GENRES[rng.next_below(SYNTHETIC_GENRES.len())];
        if !genres.iter().any(|g| g == candidate) {
            genres.push(candidate.to_string());
        }
    }

    let mut unit = || round_to(rng.next_f64(), 3);
    let danceability = unit();
    let energy = unit();
    let valence = unit();
    let speechiness = unit();
    let acousticness = unit();
    let instrumentalness = unit();
    let liveness = unit();

    let audio_features = AudioFeatures {
        danceability,
        energy,
        valence,
        speechiness,
        acousticness,
        instrumentalness,
        liveness,
        tempo: round_to(60.0 + rng.next_f64() * 120.0, 1),
        key: rng.next_below(12) as i32,
        mode: rng.next_below(2) as i32,
        loudness: round_to(-20.0 + rng.next_f64() * 20.0, 2),
    };
    let popularity = rng.next_below(101) as u32;

    ResolvedMetadata {
        genres,
        audio_features: Some(audio_features),
        popularity,
        provenance: Provenance::Generated,
    }
}

/// [`Resolver`] that never fails and never touches the network.
#[derive(Debug, Default, Clone, Copy)]
pub struct DeterministicFallbackResolver;

#[async_trait]
impl Resolver for DeterministicFallbackResolver {
    fn name(&self) -> &'static str {
        "generated"
    }

    async fn resolve(&self, query: &TrackQuery) -> Result<ResolvedMetadata, ResolveError> {
        Ok(generate_metadata(query))
    }
}
