// In-memory stand-ins for the external services.
#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use async_trait::async_trait;
use spotbot::{
    Error, Res,
    backend::{Catalog, PlaylistStore, PostSource},
    throttle::Clock,
    types::{CatalogTrack, Playlist, RankedPost, TimeWindow},
};

#[derive(Clone, Default)]
pub struct FakePosts {
    posts: Arc<Mutex<HashMap<&'static str, Vec<RankedPost>>>>,
    calls: Arc<Mutex<Vec<(String, TimeWindow, usize)>>>,
}

impl FakePosts {
    pub fn with(self, window: TimeWindow, posts: Vec<RankedPost>) -> Self {
        self.posts.lock().unwrap().insert(window.as_str(), posts);
        self
    }

    pub fn calls(&self) -> Vec<(String, TimeWindow, usize)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PostSource for FakePosts {
    async fn top_posts(
        &self,
        community: &str,
        window: TimeWindow,
        limit: usize,
    ) -> Res<Vec<RankedPost>> {
        self.calls
            .lock()
            .unwrap()
            .push((community.to_string(), window, limit));
        let posts = self
            .posts
            .lock()
            .unwrap()
            .get(window.as_str())
            .cloned()
            .unwrap_or_default();
        Ok(posts.into_iter().take(limit).collect())
    }
}

#[derive(Clone, Copy)]
pub enum SearchFailure {
    Server,
    Auth,
}

#[derive(Clone, Default)]
pub struct FakeCatalog {
    tracks: Arc<Mutex<HashMap<String, Vec<CatalogTrack>>>>,
    failures: Arc<Mutex<HashMap<String, SearchFailure>>>,
    queries: Arc<Mutex<Vec<String>>>,
}

impl FakeCatalog {
    /// Registers `track_id` as the only hit for `query`.
    pub fn with_hit(self, query: &str, track_id: &str) -> Self {
        self.tracks.lock().unwrap().insert(
            query.to_string(),
            vec![CatalogTrack {
                id: track_id.to_string(),
                artist: "Artist".to_string(),
                title: query.to_string(),
            }],
        );
        self
    }

    pub fn with_hits(self, query: &str, track_ids: &[&str]) -> Self {
        let hits = track_ids
            .iter()
            .map(|id| CatalogTrack {
                id: id.to_string(),
                artist: "Artist".to_string(),
                title: query.to_string(),
            })
            .collect();
        self.tracks.lock().unwrap().insert(query.to_string(), hits);
        self
    }

    pub fn failing(self, query: &str, failure: SearchFailure) -> Self {
        self.failures
            .lock()
            .unwrap()
            .insert(query.to_string(), failure);
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl Catalog for FakeCatalog {
    async fn search(&self, query: &str) -> Res<Vec<CatalogTrack>> {
        self.queries.lock().unwrap().push(query.to_string());
        match self.failures.lock().unwrap().get(query) {
            Some(SearchFailure::Server) => {
                return Err(Error::Api {
                    service: "Spotify",
                    status: 500,
                    message: "boom".to_string(),
                });
            }
            Some(SearchFailure::Auth) => {
                return Err(Error::Auth("refresh token revoked".to_string()));
            }
            None => {}
        }
        Ok(self
            .tracks
            .lock()
            .unwrap()
            .get(query)
            .cloned()
            .unwrap_or_default())
    }
}

/// Items named `local:...` stand for local files, which have no track id.
fn track_id(item: &str) -> Option<String> {
    if item.starts_with("local:") {
        None
    } else {
        Some(item.to_string())
    }
}

#[derive(Default)]
struct StoreState {
    playlists: Vec<(Playlist, Vec<String>)>,
    created: Vec<String>,
    writes: usize,
}

#[derive(Clone, Default)]
pub struct FakeStore {
    state: Arc<Mutex<StoreState>>,
}

impl FakeStore {
    pub fn with_playlist(self, name: &str, tracks: &[&str]) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            let id = format!("pl{}", state.playlists.len());
            state.playlists.push((
                Playlist {
                    id,
                    name: name.to_string(),
                },
                tracks.iter().map(|t| t.to_string()).collect(),
            ));
        }
        self
    }

    pub fn tracks_of(&self, name: &str) -> Option<Vec<String>> {
        self.state
            .lock()
            .unwrap()
            .playlists
            .iter()
            .find(|(p, _)| p.name == name)
            .map(|(_, tracks)| tracks.clone())
    }

    pub fn created(&self) -> Vec<String> {
        self.state.lock().unwrap().created.clone()
    }

    pub fn writes(&self) -> usize {
        self.state.lock().unwrap().writes
    }

    pub fn playlist(&self, name: &str) -> Playlist {
        self.state
            .lock()
            .unwrap()
            .playlists
            .iter()
            .find(|(p, _)| p.name == name)
            .map(|(p, _)| p.clone())
            .expect("playlist exists")
    }

    fn with_tracks<R>(&self, playlist: &Playlist, f: impl FnOnce(&mut Vec<String>) -> R) -> Res<R> {
        let mut state = self.state.lock().unwrap();
        state.writes += 1;
        let (_, tracks) = state
            .playlists
            .iter_mut()
            .find(|(p, _)| p.id == playlist.id)
            .ok_or_else(|| Error::Api {
                service: "Spotify",
                status: 404,
                message: "playlist not found".to_string(),
            })?;
        Ok(f(tracks))
    }
}

#[async_trait]
impl PlaylistStore for FakeStore {
    async fn list_owned_playlists(&self) -> Res<Vec<Playlist>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .playlists
            .iter()
            .map(|(p, _)| p.clone())
            .collect())
    }

    async fn create_playlist(&self, name: &str) -> Res<Playlist> {
        let mut state = self.state.lock().unwrap();
        let playlist = Playlist {
            id: format!("pl{}", state.playlists.len()),
            name: name.to_string(),
        };
        state.playlists.push((playlist.clone(), Vec::new()));
        state.created.push(name.to_string());
        Ok(playlist)
    }

    async fn read_tracks(&self, playlist: &Playlist) -> Res<Vec<Option<String>>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .playlists
            .iter()
            .find(|(p, _)| p.id == playlist.id)
            .map(|(_, tracks)| tracks.iter().map(|t| track_id(t)).collect())
            .unwrap_or_default())
    }

    async fn replace_tracks(&self, playlist: &Playlist, track_ids: &[String]) -> Res<()> {
        self.with_tracks(playlist, |tracks| *tracks = track_ids.to_vec())
    }

    async fn insert_tracks_at(
        &self,
        playlist: &Playlist,
        track_ids: &[String],
        position: usize,
    ) -> Res<()> {
        self.with_tracks(playlist, |tracks| {
            let position = position.min(tracks.len());
            tracks.splice(position..position, track_ids.iter().cloned());
        })
    }

    async fn remove_all_occurrences(&self, playlist: &Playlist, track_ids: &[String]) -> Res<()> {
        self.with_tracks(playlist, |tracks| {
            tracks.retain(|t| !track_ids.contains(t));
        })
    }
}

/// Clock that only moves when told to; sleeping advances it.
#[derive(Clone)]
pub struct FakeClock {
    base: Instant,
    offset: Arc<Mutex<Duration>>,
    sleeps: Arc<Mutex<Vec<Duration>>>,
}

impl Default for FakeClock {
    fn default() -> Self {
        Self {
            base: Instant::now(),
            offset: Arc::new(Mutex::new(Duration::ZERO)),
            sleeps: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl FakeClock {
    pub fn advance(&self, by: Duration) {
        *self.offset.lock().unwrap() += by;
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Clock for FakeClock {
    fn now(&self) -> Instant {
        self.base + *self.offset.lock().unwrap()
    }

    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
        self.advance(duration);
    }
}

pub fn post(title: &str, domain: &str) -> RankedPost {
    RankedPost::new(title, domain)
}

pub fn ids(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
