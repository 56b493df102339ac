use async_trait::async_trait;
use reqwest::Method;

use crate::{
    Res,
    backend::Catalog,
    spotify::SpotifyClient,
    types::{CatalogTrack, SearchResponse, Track},
};

/// Only the top hit is ever used.
const SEARCH_LIMIT: &str = "1";

#[async_trait]
impl Catalog for SpotifyClient {
    async fn search(&self, query: &str) -> Res<Vec<CatalogTrack>> {
        let url = self.url("/search");
        let builder = self
            .request(Method::GET, &url)
            .await?
            .query(&[("q", query), ("type", "track"), ("limit", SEARCH_LIMIT)]);

        let response: SearchResponse = self.send_json(builder).await?;
        let tracks = response.tracks.map(|page| page.items).unwrap_or_default();
        Ok(tracks.into_iter().filter_map(to_catalog_track).collect())
    }
}

fn to_catalog_track(track: Track) -> Option<CatalogTrack> {
    let id = track.id?;
    let artist = track
        .artists
        .first()
        .map(|a| a.name.clone())
        .unwrap_or_default();
    Some(CatalogTrack {
        id,
        artist,
        title: track.name,
    })
}
