//! Job orchestration.
//!
//! Every mode is built from one primitive, [`JobOrchestrator::run_job`]: fetch
//! the top posts, resolve their titles to tracks, then add to and trim the
//! playlist. Daily and weekly jobs run it once in incremental mode. A new list
//! first replaces the playlist with the top songs of the month and, while it is
//! still short, widens the window to the year and then all time.

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{Instrument, debug, info, info_span};

use crate::{
    Res,
    backend::{Catalog, PlaylistStore, PostSource},
    config::Config,
    normalize::TitleNormalizer,
    reconcile::PlaylistReconciler,
    resolver::TrackResolver,
    throttle::{Clock, Throttle, TokioClock},
    types::{JobMode, JobOutcome, JobParams, JobRequest, PassReport, TimeWindow},
};

/// Windows tried, in order, when a new list is not full after the first pass.
pub const ESCALATION_WINDOWS: [TimeWindow; 2] = [TimeWindow::Year, TimeWindow::All];

/// Runs jobs against a post source, a catalog and a playlist store.
///
/// The clock only drives the search throttle; tests pass a fake one through
/// [`JobOrchestrator::with_clock`].
pub struct JobOrchestrator<P, C, S, K = TokioClock> {
    config: Config,
    normalizer: TitleNormalizer,
    throttle: Throttle,
    posts: P,
    catalog: C,
    store: S,
    clock: K,
    show_progress: bool,
}

impl<P, C, S> JobOrchestrator<P, C, S, TokioClock>
where
    P: PostSource,
    C: Catalog,
    S: PlaylistStore,
{
    /// Orchestrator on the wall clock.
    pub fn new(config: Config, posts: P, catalog: C, store: S) -> Self {
        Self::with_clock(config, posts, catalog, store, TokioClock)
    }
}

impl<P, C, S, K> JobOrchestrator<P, C, S, K>
where
    P: PostSource,
    C: Catalog,
    S: PlaylistStore,
    K: Clock,
{
    /// Creates an orchestrator with an explicit clock.
    ///
    /// # Arguments
    ///
    /// * `config` - Domains, title terms, playlist name and search rate
    /// * `posts` - Source of ranked posts
    /// * `catalog` - Track search
    /// * `store` - Playlist storage
    /// * `clock` - Time source for the search throttle
    pub fn with_clock(config: Config, posts: P, catalog: C, store: S, clock: K) -> Self {
        let normalizer = TitleNormalizer::new(&config.ignored_terms, &config.ambiguous_terms);
        let throttle = Throttle::new(config.max_qps);
        Self {
            config,
            normalizer,
            throttle,
            posts,
            catalog,
            store,
            clock,
            show_progress: false,
        }
    }

    /// Shows a progress bar while titles are resolved.
    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Runs a job in the requested mode.
    ///
    /// Daily and weekly jobs make one incremental pass. A new list replaces
    /// the playlist, then escalates through [`ESCALATION_WINDOWS`] while the
    /// playlist is short. Every pass is recorded in the returned outcome.
    ///
    /// # Errors
    ///
    /// Fails on fatal search errors and on any post source or store error.
    pub async fn run(&self, request: &JobRequest) -> Res<JobOutcome> {
        let span = info_span!("job", subreddit = %request.subreddit);
        async move {
            match request.mode {
                JobMode::Daily | JobMode::Weekly => self.run_top_up(request).await,
                JobMode::NewList => self.run_new_list(request).await,
            }
        }
        .instrument(span)
        .await
    }

    async fn run_top_up(&self, request: &JobRequest) -> Res<JobOutcome> {
        let mut outcome = JobOutcome::default();
        let params = JobParams {
            subreddit: request.subreddit.clone(),
            replace: false,
            num_songs: request.num_songs(),
            window: request.mode.window(),
            pool_size: request.mode.pool_size(),
            max_playlist_length: request.playlist_length,
        };
        self.run_pass(&params, &mut outcome).await?;
        Ok(outcome)
    }

    async fn run_new_list(&self, request: &JobRequest) -> Res<JobOutcome> {
        let mut outcome = JobOutcome::default();
        let num_songs = request.num_songs();
        let mut params = JobParams {
            subreddit: request.subreddit.clone(),
            replace: true,
            num_songs,
            window: request.mode.window(),
            pool_size: request.mode.pool_size(),
            max_playlist_length: request.playlist_length,
        };
        self.run_pass(&params, &mut outcome).await?;

        for window in ESCALATION_WINDOWS {
            if outcome.new_length >= request.playlist_length {
                break;
            }
            let requested = num_songs.saturating_sub(outcome.new_length);
            if requested == 0 {
                break;
            }

            debug!(
                "playlist has only {} songs and has not yet reached capacity; re-running search for time period \"{}\"",
                outcome.new_length, window
            );
            params.replace = false;
            params.num_songs = requested;
            params.window = window;
            self.run_pass(&params, &mut outcome).await?;
        }

        Ok(outcome)
    }

    async fn run_pass(&self, params: &JobParams, outcome: &mut JobOutcome) -> Res<()> {
        let (added, new_length) = self.run_job(params).await?;
        outcome.added += added;
        outcome.new_length = new_length;
        outcome.passes.push(PassReport {
            window: params.window,
            replace: params.replace,
            requested: params.num_songs,
            added,
            new_length,
        });
        Ok(())
    }

    /// One full pass: posts, tracks, playlist. Returns `(added, new_length)`.
    pub async fn run_job(&self, params: &JobParams) -> Res<(usize, usize)> {
        info!(
            "Finding top songs for /r/{} from time period \"{}\"; creating a new list? {}; going to add {} songs, to a max playlist length of {}.",
            params.subreddit,
            params.window,
            params.replace,
            params.num_songs,
            params.max_playlist_length
        );

        let track_ids = self.collect_track_ids(params).await?;

        let reconciler = PlaylistReconciler::new(&self.store);
        let playlist_name = self.config.playlist_name_for(&params.subreddit);
        let playlist = reconciler.resolve_playlist(&playlist_name).await?;
        let added = reconciler
            .apply_new_tracks(&playlist, &track_ids, params.num_songs, params.replace)
            .await?;
        let new_length = reconciler
            .trim_to_capacity(&playlist, params.max_playlist_length)
            .await?;

        Ok((added, new_length))
    }

    /// Unique track ids for the top music posts, most popular first.
    pub async fn collect_track_ids(&self, params: &JobParams) -> Res<Vec<String>> {
        debug!(
            "searching for top submissions on /r/{} for time period \"{}\"",
            params.subreddit, params.window
        );
        let posts = self
            .posts
            .top_posts(&params.subreddit, params.window, params.pool_size)
            .await?;
        let music_posts: Vec<_> = posts
            .into_iter()
            .filter(|post| self.config.is_music_domain(&post.domain))
            .collect();
        debug!("found {} posts from our music domains", music_posts.len());

        let resolver = TrackResolver::new(&self.catalog, &self.normalizer);
        let pb = self.progress_bar(music_posts.len() as u64);
        let mut track_ids: Vec<String> = Vec::new();

        for post in &music_posts {
            let started = self.clock.now();
            if let Some(track_id) = resolver.resolve_title(&post.title).await? {
                if !track_ids.contains(&track_id) {
                    debug!(
                        "added track {}; track_id {} (score {}, {})",
                        track_ids.len() + 1,
                        track_id,
                        post.score,
                        post.permalink
                    );
                    track_ids.push(track_id);
                }
            }
            pb.inc(1);
            self.throttle.wait(&self.clock, started).await;
        }
        pb.finish_and_clear();

        Ok(track_ids)
    }

    fn progress_bar(&self, len: u64) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(len);
        let style = ProgressStyle::with_template("{spinner:.blue} {msg} [{bar:30.cyan/blue}] {pos}/{len}")
            .map(|s| s.progress_chars("=> ").tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        pb.set_style(style);
        pb.set_message("Searching tracks...");
        pb
    }
}
