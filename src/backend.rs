//! Seams to the external services.
//!
//! The job logic only talks to these traits. [`crate::reddit::RedditClient`]
//! and [`crate::spotify::SpotifyClient`] implement them against the real APIs;
//! tests use in-memory fakes.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    Res,
    types::{CatalogTrack, Playlist, RankedPost, TimeWindow},
};

/// Ranked posts of a community.
#[async_trait]
pub trait PostSource: Send + Sync {
    /// Top `limit` posts of `community` over `window`, most popular first.
    async fn top_posts(
        &self,
        community: &str,
        window: TimeWindow,
        limit: usize,
    ) -> Res<Vec<RankedPost>>;
}

/// Free-text track search.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Matching tracks, best match first.
    async fn search(&self, query: &str) -> Res<Vec<CatalogTrack>>;
}

/// Playlists owned by the configured account.
#[async_trait]
pub trait PlaylistStore: Send + Sync {
    async fn list_owned_playlists(&self) -> Res<Vec<Playlist>>;

    async fn create_playlist(&self, name: &str) -> Res<Playlist>;

    /// One entry per playlist item, in order. Items without a catalog id
    /// (local files, unavailable tracks) are `None` but still take a slot.
    async fn read_tracks(&self, playlist: &Playlist) -> Res<Vec<Option<String>>>;

    async fn replace_tracks(&self, playlist: &Playlist, track_ids: &[String]) -> Res<()>;

    /// Inserts `track_ids` as a block, in order, starting at `position`.
    async fn insert_tracks_at(
        &self,
        playlist: &Playlist,
        track_ids: &[String],
        position: usize,
    ) -> Res<()>;

    /// Removes every occurrence of each id.
    async fn remove_all_occurrences(&self, playlist: &Playlist, track_ids: &[String]) -> Res<()>;
}

// Shared handles, so one client can serve as both catalog and store.

#[async_trait]
impl<T: PostSource + ?Sized> PostSource for Arc<T> {
    async fn top_posts(
        &self,
        community: &str,
        window: TimeWindow,
        limit: usize,
    ) -> Res<Vec<RankedPost>> {
        (**self).top_posts(community, window, limit).await
    }
}

#[async_trait]
impl<T: Catalog + ?Sized> Catalog for Arc<T> {
    async fn search(&self, query: &str) -> Res<Vec<CatalogTrack>> {
        (**self).search(query).await
    }
}

#[async_trait]
impl<T: PlaylistStore + ?Sized> PlaylistStore for Arc<T> {
    async fn list_owned_playlists(&self) -> Res<Vec<Playlist>> {
        (**self).list_owned_playlists().await
    }

    async fn create_playlist(&self, name: &str) -> Res<Playlist> {
        (**self).create_playlist(name).await
    }

    async fn read_tracks(&self, playlist: &Playlist) -> Res<Vec<Option<String>>> {
        (**self).read_tracks(playlist).await
    }

    async fn replace_tracks(&self, playlist: &Playlist, track_ids: &[String]) -> Res<()> {
        (**self).replace_tracks(playlist, track_ids).await
    }

    async fn insert_tracks_at(
        &self,
        playlist: &Playlist,
        track_ids: &[String],
        position: usize,
    ) -> Res<()> {
        (**self).insert_tracks_at(playlist, track_ids, position).await
    }

    async fn remove_all_occurrences(&self, playlist: &Playlist, track_ids: &[String]) -> Res<()> {
        (**self).remove_all_occurrences(playlist, track_ids).await
    }
}
