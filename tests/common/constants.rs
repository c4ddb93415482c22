//! Shared constants for end-to-end tests
//!
//! When the fixture exports or the fake API catalog change, update only
//! this file.

// ============================================================================
// Fake Spotify Web API
// ============================================================================

/// Bearer token accepted by the fake API
pub const TEST_TOKEN: &str = "test-token";

/// Maximum time to wait for the fake API to accept connections (milliseconds)
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

// ============================================================================
// Catalog known to the fake API
// ============================================================================

/// Artist "Boards of Canada"
pub const ARTIST_1_ID: &str = "artist-boc";
pub const ARTIST_1_NAME: &str = "Boards of Canada";

/// "Roygbiv", referenced by URI in the fixture export
pub const TRACK_1_ID: &str = "track-roygbiv";
pub const TRACK_1_NAME: &str = "Roygbiv";

/// "Dayvan Cowboy", only found through search
pub const TRACK_2_ID: &str = "track-dayvan";
pub const TRACK_2_NAME: &str = "Dayvan Cowboy";

/// "Olson", its audio features endpoint always fails
pub const TRACK_BROKEN_ID: &str = "track-olson";
pub const TRACK_BROKEN_NAME: &str = "Olson";

/// Genres of ARTIST_1
pub const ARTIST_1_GENRES: [&str; 2] = ["ambient", "electronica"];

/// Popularity of every known track
pub const TRACK_POPULARITY: u32 = 60;

// ============================================================================
// Fixture export
// ============================================================================

/// Plays in the first fixture export that pass normalization
pub const EXPORT_1_KEPT: usize = 5;

/// Entries in the first fixture export
pub const EXPORT_1_ENTRIES: usize = 7;

/// Interval between readiness polls (milliseconds)
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 10;
