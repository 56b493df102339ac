//! # Spotify Integration Module
//!
//! Implements [`Catalog`](crate::backend::Catalog) and
//! [`PlaylistStore`](crate::backend::PlaylistStore) on top of the Spotify Web
//! API.
//!
//! ## API Coverage
//!
//! - `GET /search` - Track search (first hit only)
//! - `GET /users/{user_id}/playlists` - Owned playlists, paginated
//! - `POST /users/{user_id}/playlists` - Create a playlist
//! - `GET /playlists/{playlist_id}/tracks` - Track ids, paginated
//! - `PUT /playlists/{playlist_id}/tracks` - Replace all tracks
//! - `POST /playlists/{playlist_id}/tracks` - Insert tracks at a position
//! - `DELETE /playlists/{playlist_id}/tracks` - Remove all occurrences
//!
//! Write endpoints accept at most 100 tracks per call, so larger batches are
//! split into consecutive chunks.
//!
//! ## Authentication
//!
//! Requests carry a bearer token from [`TokenManager`], which refreshes it
//! from the stored refresh token. There is no interactive authorization here.

pub mod playlist;
pub mod search;

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;

use crate::{Error, Res, config, management::TokenManager};

/// Spotify's per-request limit for playlist writes.
pub const MAX_TRACKS_PER_REQUEST: usize = 100;

/// Spotify Web API client acting for one user.
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    user_id: String,
    tokens: Mutex<TokenManager>,
}

impl SpotifyClient {
    /// Creates a client.
    ///
    /// # Arguments
    ///
    /// * `api_url` - Web API base URL, trailing slash optional
    /// * `user_id` - Account that owns the playlists
    /// * `tokens` - Source of bearer tokens
    pub fn new(api_url: String, user_id: String, tokens: TokenManager) -> Self {
        Self {
            http: Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            user_id,
            tokens: Mutex::new(tokens),
        }
    }

    /// Client for the configured user with a token from the environment or
    /// the local cache. Fails if credentials are missing.
    pub async fn from_env() -> Res<Self> {
        let user_id = config::spotify_user()?;
        let tokens = TokenManager::load().await?;
        Ok(Self::new(config::spotify_apiurl(), user_id, tokens))
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    async fn request(&self, method: Method, url: &str) -> Res<RequestBuilder> {
        let token = self.tokens.lock().await.get_valid_token().await?;
        Ok(self.http.request(method, url).bearer_auth(token))
    }

    async fn send(&self, builder: RequestBuilder) -> Res<Response> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        Err(Error::Api {
            service: "Spotify",
            status: status.as_u16(),
            message,
        })
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Res<T> {
        let response = self.send(builder).await?;
        Ok(response.json::<T>().await?)
    }
}

/// URI form of a track id, as the playlist endpoints expect it.
pub fn track_uri(track_id: &str) -> String {
    format!("spotify:track:{}", track_id)
}

/// Splits an insert of `track_ids` at `position` into request-sized batches,
/// each paired with the position it goes to so the block keeps its order.
pub fn insert_batches(track_ids: &[String], position: usize) -> Vec<(usize, &[String])> {
    track_ids
        .chunks(MAX_TRACKS_PER_REQUEST)
        .enumerate()
        .map(|(i, chunk)| (position + i * MAX_TRACKS_PER_REQUEST, chunk))
        .collect()
}

/// Splits a replace into the tracks sent with the replace call and the
/// inserts that append the rest behind them.
pub fn replace_batches(track_ids: &[String]) -> (&[String], Vec<(usize, &[String])>) {
    let (head, tail) = track_ids.split_at(track_ids.len().min(MAX_TRACKS_PER_REQUEST));
    (head, insert_batches(tail, head.len()))
}
