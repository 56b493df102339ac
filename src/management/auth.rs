use std::path::{Path, PathBuf};

use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::{Error, Res, config, types::Token};

/// Seconds before expiry at which a token is refreshed.
const EXPIRY_MARGIN_SECS: u64 = 240;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    #[serde(default)]
    scope: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

/// Holds the Spotify access token and refreshes it when it is about to expire.
pub struct TokenManager {
    token: Token,
    client: Client,
    client_id: String,
    client_secret: String,
    token_url: String,
    cache_path: Option<PathBuf>,
}

impl TokenManager {
    pub fn new(token: Token, client_id: String, client_secret: String, token_url: String) -> Self {
        TokenManager {
            token,
            client: Client::new(),
            client_id,
            client_secret,
            token_url,
            cache_path: None,
        }
    }

    /// Builds a manager from the environment, preferring a cached token.
    ///
    /// Without a cache the refresh token from `SPOTIFY_REFRESH_TOKEN` seeds an
    /// already expired token, so the first request refreshes it.
    pub async fn load() -> Res<Self> {
        let client_id = config::spotify_client_id()?;
        let client_secret = config::spotify_client_secret()?;
        let token_url = config::spotify_apitoken_url();
        let cache_path = Self::token_path();

        let token = match Self::read_cache(&cache_path).await {
            Some(token) => token,
            None => Token {
                access_token: String::new(),
                refresh_token: config::spotify_refresh_token()?,
                scope: String::new(),
                expires_in: 0,
                obtained_at: 0,
            },
        };

        let mut manager = Self::new(token, client_id, client_secret, token_url);
        manager.cache_path = Some(cache_path);
        Ok(manager)
    }

    async fn read_cache(path: &Path) -> Option<Token> {
        let content = async_fs::read_to_string(path).await.ok()?;
        match serde_json::from_str::<Token>(&content) {
            Ok(token) if !token.refresh_token.is_empty() => Some(token),
            _ => None,
        }
    }

    pub async fn persist(&self) -> Res<()> {
        let Some(path) = &self.cache_path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(&self.token)?;
        async_fs::write(path, json).await?;
        Ok(())
    }

    /// Access token valid for at least a few more minutes.
    pub async fn get_valid_token(&mut self) -> Res<String> {
        if self.is_expired() {
            self.token = self.refresh_token().await?;
            self.persist().await?;
        }

        Ok(self.token.access_token.clone())
    }

    fn is_expired(&self) -> bool {
        if self.token.access_token.is_empty() {
            return true;
        }
        let now = Utc::now().timestamp() as u64;
        now + EXPIRY_MARGIN_SECS >= self.token.obtained_at + self.token.expires_in
    }

    async fn refresh_token(&self) -> Res<Token> {
        debug!("refreshing Spotify access token");
        let res = self
            .client
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", self.token.refresh_token.as_str()),
            ])
            .send()
            .await
            .map_err(|e| Error::Auth(e.to_string()))?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(Error::Auth(format!("token refresh returned {}: {}", status, body)));
        }

        let json: TokenResponse = res.json().await.map_err(|e| Error::Auth(e.to_string()))?;

        Ok(Token {
            access_token: json.access_token,
            // Spotify only sometimes rotates the refresh token
            refresh_token: json
                .refresh_token
                .unwrap_or_else(|| self.token.refresh_token.clone()),
            scope: json.scope,
            expires_in: json.expires_in,
            obtained_at: Utc::now().timestamp() as u64,
        })
    }

    fn token_path() -> PathBuf {
        let mut path = config::data_dir();
        path.push("cache/token.json");
        path
    }
}
