//! Configuration management for spotbot.
//!
//! Values come from, in order of priority:
//! 1. Environment variables
//! 2. A `.env` file in the local data directory (`spotbot/.env`)
//! 3. Built-in defaults (where applicable)
//!
//! Credentials are read through the accessor functions below. The lists that
//! steer title matching live in [`Config`], which is passed explicitly to the
//! job orchestrator so tests and deployments can override them.

use std::{env, path::PathBuf};

use crate::{Error, Res};

pub const DEFAULT_PLAYLIST_NAME: &str = "/r/{} - Hot Songs";
pub const DEFAULT_MAX_QPS: u32 = 50;
pub const SONGS_PER_DAY: usize = 2;
pub const PLAYLIST_LENGTH: usize = 40;

const DEFAULT_MUSIC_DOMAINS: &[&str] = &[
    "youtube.com",
    "youtu.be",
    "soundcloud.com",
    "spotify.com",
    "open.spotify.com",
    "bandcamp.com",
];
const DEFAULT_IGNORED_TERMS: &[&str] = &["album"];
const DEFAULT_AMBIGUOUS_TERMS: &[&str] = &[" feat ", " ft ", " ft. "];

/// Job configuration: which posts count as music and how titles are cleaned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Post domains that are treated as music links (exact match).
    pub music_domains: Vec<String>,
    /// Titles containing any of these are skipped.
    pub ignored_terms: Vec<String>,
    /// Terms removed from titles before searching.
    pub ambiguous_terms: Vec<String>,
    /// Playlist name; `{}` is replaced with the subreddit.
    pub playlist_name: String,
    /// Ceiling for catalog searches per second.
    pub max_qps: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            music_domains: to_strings(DEFAULT_MUSIC_DOMAINS),
            ignored_terms: to_strings(DEFAULT_IGNORED_TERMS),
            ambiguous_terms: to_strings(DEFAULT_AMBIGUOUS_TERMS),
            playlist_name: DEFAULT_PLAYLIST_NAME.to_string(),
            max_qps: DEFAULT_MAX_QPS,
        }
    }
}

impl Config {
    /// Builds the configuration from defaults overridden by `SPOTBOT_*`
    /// environment variables. List values are comma-separated; ambiguous terms
    /// keep their surrounding spaces.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(domains) = env_list("SPOTBOT_MUSIC_DOMAINS", true) {
            config.music_domains = domains;
        }
        if let Some(terms) = env_list("SPOTBOT_IGNORED_TERMS", true) {
            config.ignored_terms = terms;
        }
        if let Some(terms) = env_list("SPOTBOT_AMBIGUOUS_TERMS", false) {
            config.ambiguous_terms = terms;
        }
        if let Ok(name) = env::var("SPOTBOT_PLAYLIST_NAME") {
            if !name.trim().is_empty() {
                config.playlist_name = name;
            }
        }
        config
    }

    pub fn with_max_qps(mut self, max_qps: u32) -> Self {
        self.max_qps = max_qps;
        self
    }

    /// Deterministic playlist name for a subreddit.
    pub fn playlist_name_for(&self, subreddit: &str) -> String {
        self.playlist_name.replace("{}", subreddit)
    }

    pub fn is_music_domain(&self, domain: &str) -> bool {
        self.music_domains.iter().any(|d| d == domain)
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn env_list(name: &str, trim: bool) -> Option<Vec<String>> {
    let raw = env::var(name).ok()?;
    let values: Vec<String> = raw
        .split(',')
        .map(|v| if trim { v.trim() } else { v })
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string)
        .collect();
    if values.is_empty() { None } else { Some(values) }
}

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the `spotbot` data directory if needed. A missing `.env` file is
/// not an error since every value can also come from the process environment.
///
/// The file is looked up in:
/// - Linux: `~/.local/share/spotbot/.env`
/// - macOS: `~/Library/Application Support/spotbot/.env`
/// - Windows: `%LOCALAPPDATA%/spotbot/.env`
pub async fn load_env() -> Res<()> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    if path.is_file() {
        dotenv::from_path(&path)
            .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
    }
    Ok(())
}

/// Root of spotbot's local files (`.env`, token cache).
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spotbot");
    path
}

fn required(name: &str) -> Res<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(Error::Config(format!("{} must be set", name))),
    }
}

fn optional(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Spotify account that owns the playlists (`SPOTIFY_USER_ID`).
pub fn spotify_user() -> Res<String> {
    required("SPOTIFY_USER_ID")
}

/// Client ID of the registered Spotify application.
pub fn spotify_client_id() -> Res<String> {
    required("SPOTIFY_API_AUTH_CLIENT_ID")
}

/// Client secret of the registered Spotify application.
///
/// Keep it out of logs and version control.
pub fn spotify_client_secret() -> Res<String> {
    required("SPOTIFY_API_AUTH_CLIENT_SECRET")
}

/// Long-lived refresh token for the playlist owner, obtained once out of band.
pub fn spotify_refresh_token() -> Res<String> {
    required("SPOTIFY_REFRESH_TOKEN")
}

/// Spotify Web API base URL, e.g. `https://api.spotify.com/v1`.
pub fn spotify_apiurl() -> String {
    optional("SPOTIFY_API_URL", "https://api.spotify.com/v1")
}

/// Spotify token endpoint, e.g. `https://accounts.spotify.com/api/token`.
pub fn spotify_apitoken_url() -> String {
    optional(
        "SPOTIFY_API_TOKEN_URL",
        "https://accounts.spotify.com/api/token",
    )
}

/// Reddit base URL for public listings.
pub fn reddit_apiurl() -> String {
    optional("REDDIT_API_URL", "https://www.reddit.com")
}

/// User-Agent sent to Reddit, which rejects generic agents.
pub fn reddit_user_agent() -> String {
    let default = format!("web:spotbot:v{}", env!("CARGO_PKG_VERSION"));
    optional("REDDIT_USER_AGENT", &default)
}
