use std::{path::PathBuf, time::Instant};

use clap::{
    ArgGroup, Parser,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};

use spotbot::{
    cli,
    config::{self, Config, DEFAULT_MAX_QPS, PLAYLIST_LENGTH},
    error, logging,
    types::{JobMode, JobRequest},
    utils, warning,
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

/// Find the top songs of a subreddit and keep a Spotify playlist of them.
///
/// Examples:
///
///   spotbot --subreddit popheads --daily
///
///   spotbot --subreddit hiphopheads --new-list --playlist-length 50
#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name = env!("CARGO_PKG_NAME"),
  bin_name = env!("CARGO_PKG_NAME"),
  styles = styles(),
)]
#[command(group(
    ArgGroup::new("job")
        .required(true)
        .multiple(false)
        .args(["daily", "weekly", "new_list"])
))]
struct Cli {
    /// The subreddit to find top songs from
    #[clap(long, value_parser = utils::parse_subreddit)]
    subreddit: String,

    /// Run a daily job; adds the top songs of the past day to the playlist
    #[clap(long)]
    daily: bool,

    /// Run a weekly job; adds the top songs of the past week to the playlist
    #[clap(long)]
    weekly: bool,

    /// Rebuild the playlist from the top songs of the month, widening to the
    /// year and all time until it is full
    #[clap(long)]
    new_list: bool,

    /// Max number of songs to add. Default: 2 for daily, 10 for weekly and
    /// the playlist length for a new list. 0 means the default
    #[clap(long)]
    num_songs: Option<usize>,

    /// Maximum length of the playlist
    #[clap(long, default_value_t = PLAYLIST_LENGTH)]
    playlist_length: usize,

    /// Maximum queries per second sent to Spotify's search
    #[clap(long, default_value_t = DEFAULT_MAX_QPS, value_parser = clap::value_parser!(u32).range(1..))]
    max_spotify_qps: u32,

    /// Write logs to this file instead of stderr
    #[clap(long)]
    logfile: Option<PathBuf>,

    /// Log at DEBUG level
    #[clap(long)]
    verbose: bool,
}

impl Cli {
    fn mode(&self) -> JobMode {
        if self.daily {
            JobMode::Daily
        } else if self.weekly {
            JobMode::Weekly
        } else {
            JobMode::NewList
        }
    }
}

#[tokio::main]
async fn main() {
    let start = Instant::now();
    let args = Cli::parse();

    // before logging, so RUST_LOG from the .env file applies
    if let Err(e) = config::load_env().await {
        warning!("Cannot load environment. Err: {}", e);
    }

    if let Err(e) = logging::init(args.verbose, args.logfile.as_deref()) {
        error!("Cannot set up logging. Err: {}", e);
    }

    let config = Config::from_env().with_max_qps(args.max_spotify_qps);
    let request = JobRequest {
        mode: args.mode(),
        subreddit: args.subreddit.clone(),
        num_songs: args.num_songs,
        playlist_length: args.playlist_length,
    };

    let show_progress = args.logfile.is_none() && std::io::IsTerminal::is_terminal(&std::io::stderr());
    match cli::run(config.clone(), &request, show_progress).await {
        Ok(outcome) => cli::report(&config, &request, &outcome, start.elapsed()),
        Err(e) => {
            tracing::error!("job for /r/{} failed: {}", request.subreddit, e);
            error!("Job failed. Err: {}", e);
        }
    }
}
