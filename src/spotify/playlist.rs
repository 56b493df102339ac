use async_trait::async_trait;
use reqwest::Method;
use tracing::debug;

use crate::{
    Res,
    backend::PlaylistStore,
    spotify::{
        MAX_TRACKS_PER_REQUEST, SpotifyClient, insert_batches, replace_batches, track_uri,
    },
    types::{
        AddTracksRequest, CreatePlaylistRequest, Paging, Playlist, PlaylistItem,
        RemoveTracksRequest, ReplaceTracksRequest, SnapshotResponse, SpotifyPlaylist, TrackUri,
    },
};

const PLAYLISTS_PAGE_SIZE: &str = "50";
const TRACKS_PAGE_SIZE: &str = "100";

#[async_trait]
impl PlaylistStore for SpotifyClient {
    async fn list_owned_playlists(&self) -> Res<Vec<Playlist>> {
        let url = self.url(&format!("/users/{}/playlists", self.user_id));
        let mut builder = self
            .request(Method::GET, &url)
            .await?
            .query(&[("limit", PLAYLISTS_PAGE_SIZE)]);

        let mut playlists = Vec::new();
        loop {
            let page: Paging<SpotifyPlaylist> = self.send_json(builder).await?;
            playlists.extend(
                page.items
                    .into_iter()
                    .filter(|p| p.owner.as_ref().is_none_or(|o| o.id == self.user_id))
                    .map(|p| Playlist {
                        id: p.id,
                        name: p.name,
                    }),
            );

            match page.next {
                Some(next) => builder = self.request(Method::GET, &next).await?,
                None => break,
            }
        }

        Ok(playlists)
    }

    async fn create_playlist(&self, name: &str) -> Res<Playlist> {
        let url = self.url(&format!("/users/{}/playlists", self.user_id));
        let body = CreatePlaylistRequest {
            name: name.to_string(),
            description: format!("The hottest songs of {}, updated daily by spotbot.", name),
            public: true,
            collaborative: false,
        };

        let created: SpotifyPlaylist = self
            .send_json(self.request(Method::POST, &url).await?.json(&body))
            .await?;
        debug!("created playlist \"{}\" - playlist_id {}", created.name, created.id);

        Ok(Playlist {
            id: created.id,
            name: created.name,
        })
    }

    async fn read_tracks(&self, playlist: &Playlist) -> Res<Vec<Option<String>>> {
        let url = self.url(&format!("/playlists/{}/tracks", playlist.id));
        let mut builder = self.request(Method::GET, &url).await?.query(&[
            ("fields", "items(track(id)),next"),
            ("limit", TRACKS_PAGE_SIZE),
        ]);

        let mut track_ids = Vec::new();
        loop {
            let page: Paging<PlaylistItem> = self.send_json(builder).await?;
            // local files and removed tracks come back without an id
            track_ids.extend(
                page.items
                    .into_iter()
                    .map(|item| item.track.and_then(|t| t.id)),
            );

            match page.next {
                Some(next) => builder = self.request(Method::GET, &next).await?,
                None => break,
            }
        }

        Ok(track_ids)
    }

    async fn replace_tracks(&self, playlist: &Playlist, track_ids: &[String]) -> Res<()> {
        let url = self.url(&format!("/playlists/{}/tracks", playlist.id));
        let (head, appends) = replace_batches(track_ids);

        let body = ReplaceTracksRequest {
            uris: head.iter().map(|id| track_uri(id)).collect(),
        };
        let _: SnapshotResponse = self
            .send_json(self.request(Method::PUT, &url).await?.json(&body))
            .await?;

        for (position, chunk) in appends {
            self.post_tracks(&url, chunk, position).await?;
        }
        Ok(())
    }

    async fn insert_tracks_at(
        &self,
        playlist: &Playlist,
        track_ids: &[String],
        position: usize,
    ) -> Res<()> {
        let url = self.url(&format!("/playlists/{}/tracks", playlist.id));
        for (position, chunk) in insert_batches(track_ids, position) {
            self.post_tracks(&url, chunk, position).await?;
        }
        Ok(())
    }

    async fn remove_all_occurrences(&self, playlist: &Playlist, track_ids: &[String]) -> Res<()> {
        let url = self.url(&format!("/playlists/{}/tracks", playlist.id));
        for chunk in track_ids.chunks(MAX_TRACKS_PER_REQUEST) {
            let body = RemoveTracksRequest {
                tracks: chunk
                    .iter()
                    .map(|id| TrackUri { uri: track_uri(id) })
                    .collect(),
            };
            let _: SnapshotResponse = self
                .send_json(self.request(Method::DELETE, &url).await?.json(&body))
                .await?;
        }
        Ok(())
    }
}

impl SpotifyClient {
    async fn post_tracks(&self, url: &str, track_ids: &[String], position: usize) -> Res<()> {
        let body = AddTracksRequest {
            uris: track_ids.iter().map(|id| track_uri(id)).collect(),
            position,
        };
        let _: SnapshotResponse = self
            .send_json(self.request(Method::POST, url).await?.json(&body))
            .await?;
        Ok(())
    }
}
