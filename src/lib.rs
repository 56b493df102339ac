//! Subreddit to Spotify playlist bot.
//!
//! This library mines the top posts of a subreddit for music links, turns each
//! post title into a Spotify search, and keeps a per-subreddit playlist topped
//! up with the matched tracks.
//!
//! # Modules
//!
//! - `backend` - Traits for the post source, catalog and playlist store
//! - `cli` - Job entry points used by the binary
//! - `config` - Configuration management and environment variables
//! - `error` - The crate error type
//! - `job` - Job orchestration for the daily, weekly and new-list modes
//! - `logging` - Tracing subscriber setup
//! - `management` - Cached Spotify token handling
//! - `normalize` - Submission title to search query extraction
//! - `reconcile` - Playlist add, replace and trim policy
//! - `reddit` - Reddit listing client
//! - `resolver` - Search query to track resolution
//! - `spotify` - Spotify Web API client
//! - `throttle` - Fixed-delay request throttle
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers

pub mod backend;
pub mod cli;
pub mod config;
pub mod error;
pub mod job;
pub mod logging;
pub mod management;
pub mod normalize;
pub mod reconcile;
pub mod reddit;
pub mod resolver;
pub mod spotify;
pub mod throttle;
pub mod types;
pub mod utils;

pub use error::Error;

/// A convenient Result type alias for operations that may fail.
///
/// Every fallible operation in the crate reports through [`Error`], so callers
/// can propagate with `?` all the way up to the binary.
pub type Res<T> = std::result::Result<T, Error>;

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Added {} songs", count);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a warning message with a yellow exclamation mark.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only for fatal errors: code after this macro does not execute.
///
/// # Example
///
/// ```
/// error!("Missing required environment variable: {}", var_name);
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}
