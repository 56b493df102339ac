use std::time::Duration;

use tabled::Table;

use crate::types::{PassReport, PassTableRow};

/// Final line printed after a job, e.g.
/// `Complete! Added 2 songs to playlist "/r/popheads - Hot Songs"; now has 40 songs. Completed in 3.21 seconds.`
pub fn completion_message(
    added: usize,
    playlist_name: &str,
    new_length: usize,
    elapsed: Duration,
) -> String {
    format!(
        "Complete! Added {} songs to playlist \"{}\"; now has {} songs. Completed in {:.2} seconds.",
        added,
        playlist_name,
        new_length,
        elapsed.as_secs_f64()
    )
}

/// Renders one row per pass; empty input renders nothing.
pub fn pass_table(passes: &[PassReport]) -> Option<String> {
    if passes.is_empty() {
        return None;
    }

    let rows: Vec<PassTableRow> = passes.iter().map(PassTableRow::from).collect();
    Some(Table::new(rows).to_string())
}

/// Checks a subreddit name given on the command line, accepting an `r/` or
/// `/r/` prefix.
pub fn parse_subreddit(value: &str) -> Result<String, String> {
    let name = value
        .trim()
        .trim_start_matches('/')
        .trim_start_matches("r/")
        .trim_end_matches('/');

    if name.is_empty() {
        return Err("subreddit name cannot be empty".to_string());
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(format!("invalid subreddit name: {}", value));
    }
    Ok(name.to_string())
}
