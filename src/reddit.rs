//! Reddit listing client.
//!
//! Reads the public JSON listings (`/r/{subreddit}/top.json`), which need no
//! authentication beyond a descriptive User-Agent. Reddit serves at most 100
//! posts per page, so larger pools are fetched page by page via the `after`
//! cursor.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::{
    Error, Res,
    backend::PostSource,
    config,
    types::{RankedPost, RedditListing, TimeWindow},
};

/// Reddit's cap on posts per listing page.
pub const MAX_PAGE_SIZE: usize = 100;

/// Client for the public subreddit listings.
pub struct RedditClient {
    http: Client,
    api_url: String,
}

impl RedditClient {
    /// Creates a client with a 30 second request timeout.
    ///
    /// # Arguments
    ///
    /// * `api_url` - Base URL, e.g. `https://www.reddit.com`
    /// * `user_agent` - Descriptive User-Agent; Reddit throttles generic ones
    pub fn new(api_url: String, user_agent: &str) -> Res<Self> {
        let http = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    /// Client for `REDDIT_API_URL` and `REDDIT_USER_AGENT`.
    pub fn from_env() -> Res<Self> {
        Self::new(config::reddit_apiurl(), &config::reddit_user_agent())
    }

    async fn fetch_page(
        &self,
        subreddit: &str,
        window: TimeWindow,
        limit: usize,
        after: Option<&str>,
    ) -> Res<RedditListing> {
        let url = format!("{}/r/{}/top.json", self.api_url, subreddit);
        let limit = limit.to_string();
        let mut query = vec![
            ("t", window.as_str()),
            ("limit", limit.as_str()),
            ("raw_json", "1"),
        ];
        if let Some(after) = after {
            query.push(("after", after));
        }

        let response = self.http.get(&url).query(&query).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Api {
                service: "Reddit",
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        Ok(response.json::<RedditListing>().await?)
    }
}

#[async_trait]
impl PostSource for RedditClient {
    async fn top_posts(
        &self,
        community: &str,
        window: TimeWindow,
        limit: usize,
    ) -> Res<Vec<RankedPost>> {
        let posts = collect_pages(limit, |page_size, after| async move {
            self.fetch_page(community, window, page_size, after.as_deref())
                .await
        })
        .await?;
        debug!("fetched {} posts from /r/{}", posts.len(), community);
        Ok(posts)
    }
}

/// Pages through a listing until `limit` posts are collected.
///
/// `fetch_page` is called with the page size (never above 100) and the
/// `after` cursor of the previous page. Paging stops early on an empty page or
/// a missing cursor; the result is cut to `limit`.
pub async fn collect_pages<F, Fut>(limit: usize, mut fetch_page: F) -> Res<Vec<RankedPost>>
where
    F: FnMut(usize, Option<String>) -> Fut,
    Fut: Future<Output = Res<RedditListing>>,
{
    let mut posts: Vec<RankedPost> = Vec::with_capacity(limit);
    let mut after: Option<String> = None;

    while posts.len() < limit {
        let page_size = (limit - posts.len()).min(MAX_PAGE_SIZE);
        let listing = fetch_page(page_size, after.take()).await?;
        let fetched = listing.data.children.len();
        posts.extend(
            listing
                .data
                .children
                .into_iter()
                .map(|child| RankedPost::from(child.data)),
        );

        match listing.data.after {
            Some(next) if fetched > 0 => after = Some(next),
            _ => break,
        }
    }

    posts.truncate(limit);
    Ok(posts)
}
