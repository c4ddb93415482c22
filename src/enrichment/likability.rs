//! Likability heuristic.
//!
//! The weights are fixed; stored and exported scores depend on them.

use super::models::AudioFeatures;

const VALENCE_WEIGHT: f64 = 25.0;
const DANCEABILITY_WEIGHT: f64 = 15.0;
const ENERGY_WEIGHT: f64 = 15.0;
const POPULARITY_WEIGHT: f64 = 25.0;
const SPEECHINESS_WEIGHT: f64 = 10.0;
const INSTRUMENTALNESS_WEIGHT: f64 = 10.0;

const IDEAL_DANCEABILITY: f64 = 0.7;
const IDEAL_ENERGY: f64 = 0.65;

/// Score in `[0, 100]`, rounded to 2 decimals. `popularity` is 0-100.
pub fn likability_score(features: &AudioFeatures, popularity: u32) -> f64 {
    let score = features.valence * VALENCE_WEIGHT
        + (1.0 - (features.danceability - IDEAL_DANCEABILITY).abs()) * DANCEABILITY_WEIGHT
        + (1.0 - (features.energy - IDEAL_ENERGY).abs()) * ENERGY_WEIGHT
        + (popularity as f64 / 100.0) * POPULARITY_WEIGHT
        + (1.0 - features.speechiness) * SPEECHINESS_WEIGHT
        + (1.0 - features.instrumentalness) * INSTRUMENTALNESS_WEIGHT;

    let clamped = score.clamp(0.0, 100.0);
    (clamped * 100.0).round() / 100.0
}
