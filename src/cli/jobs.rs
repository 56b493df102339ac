use std::{sync::Arc, time::Duration};

use tracing::info;

use crate::{
    Res,
    config::Config,
    job::JobOrchestrator,
    reddit::RedditClient,
    spotify::SpotifyClient,
    success,
    types::{JobMode, JobOutcome, JobRequest},
    utils,
};

/// Runs one job against the live services.
///
/// Credentials are checked before any request is made; a missing or rejected
/// credential aborts the run.
pub async fn run(config: Config, request: &JobRequest, show_progress: bool) -> Res<JobOutcome> {
    let posts = RedditClient::from_env()?;
    let spotify = SpotifyClient::from_env().await?;
    info!(
        "running {} job for /r/{} as Spotify user {}",
        request.mode,
        request.subreddit,
        spotify.user_id()
    );

    // one client serves both the catalog and the playlist store
    let spotify = Arc::new(spotify);
    let orchestrator = JobOrchestrator::new(config, posts, spotify.clone(), spotify)
        .show_progress(show_progress);
    orchestrator.run(request).await
}

/// Prints the per-pass table for new lists and the completion line.
pub fn report(config: &Config, request: &JobRequest, outcome: &JobOutcome, elapsed: Duration) {
    if request.mode == JobMode::NewList {
        if let Some(table) = utils::pass_table(&outcome.passes) {
            println!("{}", table);
        }
    }

    let playlist_name = config.playlist_name_for(&request.subreddit);
    let message =
        utils::completion_message(outcome.added, &playlist_name, outcome.new_length, elapsed);
    info!("{}", message);
    success!("{}", message);
}
