use tracing::{debug, warn};

use crate::{Res, backend::Catalog, normalize::TitleNormalizer};

/// Resolves search queries to a catalog track id.
///
/// The first search hit is trusted as-is; there is no scoring of its own and
/// no retry on an empty result.
pub struct TrackResolver<'a, C: Catalog + ?Sized> {
    catalog: &'a C,
    normalizer: &'a TitleNormalizer,
}

impl<'a, C: Catalog + ?Sized> TrackResolver<'a, C> {
    pub fn new(catalog: &'a C, normalizer: &'a TitleNormalizer) -> Self {
        Self {
            catalog,
            normalizer,
        }
    }

    /// Track id of the best match for `query`, or `None`.
    ///
    /// An empty query short-circuits without a search. Search failures are
    /// treated as "no match" unless they are fatal (e.g. authentication).
    pub async fn resolve(&self, query: &str) -> Res<Option<String>> {
        if query.is_empty() {
            return Ok(None);
        }

        debug!("searching \"{}\"", query);
        let results = match self.catalog.search(query).await {
            Ok(results) => results,
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                warn!("search for \"{}\" failed: {}", query, e);
                return Ok(None);
            }
        };

        match results.into_iter().next() {
            Some(track) => {
                debug!("found track: {} - {}", track.artist, track.title);
                Ok(Some(track.id))
            }
            None => {
                debug!("could not find any results for search term {}", query);
                Ok(None)
            }
        }
    }

    /// Normalizes a submission title and resolves it.
    pub async fn resolve_title(&self, title: &str) -> Res<Option<String>> {
        let query = self.normalizer.normalize(title);
        self.resolve(&query).await
    }
}
