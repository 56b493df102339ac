//! # CLI Module
//!
//! Entry points used by the `spotbot` binary. The binary parses flags and
//! sets up logging; this module wires the real Reddit and Spotify clients into
//! a [`JobOrchestrator`](crate::job::JobOrchestrator) and reports the result.
//!
//! ## Usage
//!
//! ```bash
//! spotbot --subreddit popheads --daily
//! spotbot --subreddit hiphopheads --weekly --num-songs 5
//! spotbot --subreddit hiphopheads --new-list --playlist-length 50
//! ```

mod jobs;

pub use jobs::report;
pub use jobs::run;
