//! Playlist reconciliation policy.
//!
//! New tracks go to the head of the playlist and the tail is trimmed, so the
//! playlist behaves like a queue with the freshest songs on top.

use std::collections::HashSet;

use tracing::debug;

use crate::{
    Res,
    backend::PlaylistStore,
    types::Playlist,
};

/// Applies resolved tracks to a playlist in a [`PlaylistStore`].
pub struct PlaylistReconciler<'a, S: PlaylistStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: PlaylistStore + ?Sized> PlaylistReconciler<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Finds the playlist named `name` (exact match) or creates an empty one.
    pub async fn resolve_playlist(&self, name: &str) -> Res<Playlist> {
        let playlists = self.store.list_owned_playlists().await?;
        if let Some(playlist) = playlists.into_iter().find(|p| p.name == name) {
            debug!(
                "found existing playlist \"{}\" - playlist_id {}",
                name, playlist.id
            );
            return Ok(playlist);
        }

        debug!("didn't find playlist \"{}\"; creating it now", name);
        self.store.create_playlist(name).await
    }

    /// Writes up to `max_to_add` candidates and returns how many were written.
    ///
    /// In replace mode the playlist content is discarded. Otherwise candidates
    /// already in the playlist are skipped and the rest are inserted as a
    /// block at position 0.
    ///
    /// # Arguments
    ///
    /// * `playlist` - Target playlist
    /// * `candidates` - Track ids, most popular first, without duplicates
    /// * `max_to_add` - Upper bound on tracks written
    /// * `replace` - Whether to discard the current content
    pub async fn apply_new_tracks(
        &self,
        playlist: &Playlist,
        candidates: &[String],
        max_to_add: usize,
        replace: bool,
    ) -> Res<usize> {
        if replace {
            let new_ids: Vec<String> = candidates.iter().take(max_to_add).cloned().collect();
            debug!(
                "replacing playlist \"{}\" with {} songs: {:?}",
                playlist.id,
                new_ids.len(),
                new_ids
            );
            self.store.replace_tracks(playlist, &new_ids).await?;
            return Ok(new_ids.len());
        }

        let current: HashSet<String> = self
            .store
            .read_tracks(playlist)
            .await?
            .into_iter()
            .flatten()
            .collect();
        let new_ids: Vec<String> = candidates
            .iter()
            .filter(|id| !current.contains(*id))
            .take(max_to_add)
            .cloned()
            .collect();
        debug!(
            "adding {} new songs to playlist \"{}\": {:?}",
            new_ids.len(),
            playlist.id,
            new_ids
        );

        if new_ids.is_empty() {
            return Ok(0);
        }

        self.store.insert_tracks_at(playlist, &new_ids, 0).await?;
        Ok(new_ids.len())
    }

    /// Drops everything past `max_length` and returns the new length.
    ///
    /// Items without an id count towards the length. Removal goes by track id,
    /// so an id that appears both before and after the cut is removed
    /// everywhere and the playlist can end up shorter than `max_length`, while
    /// an id-less item past the cut cannot be removed at all. The returned
    /// value is `max_length` in both cases.
    pub async fn trim_to_capacity(&self, playlist: &Playlist, max_length: usize) -> Res<usize> {
        let current = self.store.read_tracks(playlist).await?;
        if current.len() <= max_length {
            return Ok(current.len());
        }

        let removed: Vec<String> = current[max_length..].iter().flatten().cloned().collect();
        debug!(
            "removing {} tracks: {:?} ({} items without an id are kept)",
            removed.len(),
            removed,
            current.len() - max_length - removed.len()
        );
        if !removed.is_empty() {
            self.store.remove_all_occurrences(playlist, &removed).await?;
        }
        Ok(max_length)
    }
}
