use std::fmt;

use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// Spotify OAuth token as cached on disk.
///
/// `obtained_at` is a Unix timestamp in seconds; the token is valid for
/// `expires_in` seconds from then.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

/// A post from the top listing of a subreddit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedPost {
    pub title: String,
    pub domain: String,
    pub score: i64,
    pub permalink: String,
}

impl RankedPost {
    pub fn new(title: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            domain: domain.into(),
            score: 0,
            permalink: String::new(),
        }
    }
}

/// One search hit from the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogTrack {
    pub id: String,
    pub artist: String,
    pub title: String,
}

/// Handle to a playlist in the store. Tracks are read through the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    pub id: String,
    pub name: String,
}

/// Ranking scope for top posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeWindow {
    Day,
    Week,
    Month,
    Year,
    All,
}

impl TimeWindow {
    /// Value of Reddit's `t` listing parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeWindow::Day => "day",
            TimeWindow::Week => "week",
            TimeWindow::Month => "month",
            TimeWindow::Year => "year",
            TimeWindow::All => "all",
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Job modes selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobMode {
    Daily,
    Weekly,
    NewList,
}

impl JobMode {
    /// Window of the first pass.
    pub fn window(&self) -> TimeWindow {
        match self {
            JobMode::Daily => TimeWindow::Day,
            JobMode::Weekly => TimeWindow::Week,
            JobMode::NewList => TimeWindow::Month,
        }
    }

    /// Number of ranked posts fetched per pass.
    pub fn pool_size(&self) -> usize {
        match self {
            JobMode::Daily => 100,
            JobMode::Weekly | JobMode::NewList => 200,
        }
    }

    /// Song cap when none is given on the command line.
    pub fn default_num_songs(&self, playlist_length: usize) -> usize {
        match self {
            JobMode::Daily => crate::config::SONGS_PER_DAY,
            JobMode::Weekly => crate::config::SONGS_PER_DAY * 5,
            JobMode::NewList => playlist_length,
        }
    }
}

impl fmt::Display for JobMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            JobMode::Daily => "daily",
            JobMode::Weekly => "weekly",
            JobMode::NewList => "new-list",
        })
    }
}

/// A job as requested on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRequest {
    pub mode: JobMode,
    pub subreddit: String,
    pub num_songs: Option<usize>,
    pub playlist_length: usize,
}

impl JobRequest {
    /// Songs to add, falling back to the mode default when unset or zero.
    pub fn num_songs(&self) -> usize {
        self.num_songs
            .filter(|n| *n > 0)
            .unwrap_or_else(|| self.mode.default_num_songs(self.playlist_length))
    }
}

/// Parameters of a single playlist pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobParams {
    pub subreddit: String,
    pub replace: bool,
    pub num_songs: usize,
    pub window: TimeWindow,
    pub pool_size: usize,
    pub max_playlist_length: usize,
}

/// What one pass did to the playlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassReport {
    pub window: TimeWindow,
    pub replace: bool,
    pub requested: usize,
    pub added: usize,
    pub new_length: usize,
}

/// Result of a whole job, possibly spanning several passes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobOutcome {
    pub added: usize,
    pub new_length: usize,
    pub passes: Vec<PassReport>,
}

/// Table row for the new-list pass report.
#[derive(Tabled)]
pub struct PassTableRow {
    pub window: String,
    pub mode: String,
    pub requested: usize,
    pub added: usize,
    pub length: usize,
}

impl From<&PassReport> for PassTableRow {
    fn from(pass: &PassReport) -> Self {
        Self {
            window: pass.window.to_string(),
            mode: if pass.replace { "replace" } else { "incremental" }.to_string(),
            requested: pass.requested,
            added: pass.added,
            length: pass.new_length,
        }
    }
}

// Reddit listing payloads
//
// Only the fields spotbot reads are modelled; serde skips the rest.

#[derive(Debug, Clone, Deserialize)]
pub struct RedditListing {
    pub data: RedditListingData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedditListingData {
    pub children: Vec<RedditListingChild>,
    pub after: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedditListingChild {
    pub data: RedditPostData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedditPostData {
    pub title: String,
    pub domain: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub permalink: String,
}

impl From<RedditPostData> for RankedPost {
    fn from(post: RedditPostData) -> Self {
        Self {
            title: post.title,
            domain: post.domain,
            score: post.score,
            permalink: post.permalink,
        }
    }
}

// Spotify payloads

/// Response of `GET /search` with `type=track`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    pub tracks: Option<Paging<Track>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Paging<T> {
    pub items: Vec<T>,
    pub next: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Track {
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<TrackArtist>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackArtist {
    pub name: String,
}

/// Playlist item; `track` is null for some unavailable items.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistItem {
    pub track: Option<PlaylistItemTrack>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistItemTrack {
    pub id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
    pub collaborative: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyPlaylist {
    pub id: String,
    pub name: String,
    pub owner: Option<PlaylistOwner>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistOwner {
    pub id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplaceTracksRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddTracksRequest {
    pub uris: Vec<String>,
    pub position: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RemoveTracksRequest {
    pub tracks: Vec<TrackUri>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrackUri {
    pub uri: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotResponse {
    pub snapshot_id: String,
}
