//! Common test infrastructure
//!
//! Fixture exports on disk and a fake Spotify Web API. Tests should only
//! import from this module, not from internal submodules.
//!
//! # Example
//!
//! ```no_run
//! mod common;
//! use common::{create_test_exports, FakeSpotifyApi};
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let (_dir, first, second) = create_test_exports().unwrap();
//!     let api = FakeSpotifyApi::spawn().await;
//!     // ...
//! }
//! ```

#![allow(dead_code)]

mod constants;
mod fixtures;
mod server;

// Public API - this is what tests import
pub use constants::*;
pub use fixtures::{create_test_exports, export_1, export_2, write_export};
pub use server::FakeSpotifyApi;
