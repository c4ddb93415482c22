//! Spotify Web API client for track, audio-feature and artist lookups.
//!
//! Authentication is out of scope: the client is handed a bearer token that
//! was obtained elsewhere.

use super::models::{AudioFeatures, TrackRef};
use super::resolver::ResolveError;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

pub const SPOTIFY_API_BASE: &str = "https://api.spotify.com/v1";

/// The lookups the enrichment pipeline needs from a metadata service.
///
/// `Ok(None)` means the service answered but has no such entity.
#[async_trait]
pub trait MetadataApi: Send + Sync {
    async fn search_track(&self, artist: &str, track: &str)
        -> Result<Option<TrackRef>, ResolveError>;

    async fn get_track(&self, track_id: &str) -> Result<Option<TrackRef>, ResolveError>;

    async fn get_audio_features(&self, track_id: &str)
        -> Result<Option<AudioFeatures>, ResolveError>;

    async fn get_artist_genres(&self, artist_id: &str) -> Result<Option<Vec<String>>, ResolveError>;
}

pub struct SpotifyClient {
    client: Client,
    base_url: String,
    access_token: String,
}

#[derive(Deserialize)]
struct SearchResponse {
    tracks: Option<SearchTracks>,
}

#[derive(Deserialize)]
struct SearchTracks {
    #[serde(default)]
    items: Vec<ApiTrack>,
}

#[derive(Deserialize)]
struct ApiTrack {
    id: Option<String>,
    name: String,
    #[serde(default)]
    popularity: u32,
    #[serde(default)]
    artists: Vec<ApiArtistRef>,
}

#[derive(Deserialize)]
struct ApiArtistRef {
    id: Option<String>,
}

#[derive(Deserialize)]
struct ApiArtist {
    #[serde(default)]
    genres: Vec<String>,
}

impl ApiTrack {
    fn into_track_ref(self) -> Option<TrackRef> {
        let id = self.id.filter(|id| !id.is_empty())?;
        let artist_id = self.artists.into_iter().find_map(|a| a.id);
        Some(TrackRef {
            id,
            name: self.name,
            artist_id,
            popularity: self.popularity.min(100),
        })
    }
}

impl SpotifyClient {
    pub fn new(base_url: &str, access_token: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: access_token.to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, ResolveError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        let Some(response) = check_status(response)? else {
            return Ok(None);
        };

        let body = response.text().await?;
        parse_body(&body).map(Some)
    }
}

fn check_status(response: Response) -> Result<Option<Response>, ResolveError> {
    match response.status() {
        status if status.is_success() => Ok(Some(response)),
        StatusCode::NOT_FOUND => Ok(None),
        StatusCode::TOO_MANY_REQUESTS => Err(ResolveError::RateLimited),
        status => Err(ResolveError::Status(status.as_u16())),
    }
}

fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T, ResolveError> {
    serde_json::from_str(body).map_err(|e| ResolveError::Malformed(e.to_string()))
}

fn search_query(artist: &str, track: &str) -> String {
    format!("track:{} artist:{}", track.trim(), artist.trim())
}

#[async_trait]
impl MetadataApi for SpotifyClient {
    async fn search_track(
        &self,
        artist: &str,
        track: &str,
    ) -> Result<Option<TrackRef>, ResolveError> {
        let path = format!(
            "/search?q={}&type=track&limit=1",
            urlencoding::encode(&search_query(artist, track))
        );
        let response: Option<SearchResponse> = self.get_json(&path).await?;

        Ok(response
            .and_then(|r| r.tracks)
            .and_then(|t| t.items.into_iter().next())
            .and_then(ApiTrack::into_track_ref))
    }

    async fn get_track(&self, track_id: &str) -> Result<Option<TrackRef>, ResolveError> {
        let path = format!("/tracks/{}", urlencoding::encode(track_id));
        let track: Option<ApiTrack> = self.get_json(&path).await?;
        Ok(track.and_then(ApiTrack::into_track_ref))
    }

    async fn get_audio_features(
        &self,
        track_id: &str,
    ) -> Result<Option<AudioFeatures>, ResolveError> {
        let path = format!("/audio-features/{}", urlencoding::encode(track_id));
        self.get_json(&path).await
    }

    async fn get_artist_genres(&self, artist_id: &str) -> Result<Option<Vec<String>>, ResolveError> {
        let path = format!("/artists/{}", urlencoding::encode(artist_id));
        let artist: Option<ApiArtist> = self.get_json(&path).await?;
        Ok(artist.map(|a| a.genres))
    }
}
