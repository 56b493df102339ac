use std::{fs::OpenOptions, path::Path, sync::Mutex};

use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::Res;

/// Installs the global tracing subscriber.
///
/// INFO by default, DEBUG with `verbose`; `RUST_LOG` directives are applied on
/// top. With a `logfile` the output is appended there without colours,
/// otherwise it goes to stderr. Job lines carry the subreddit through the
/// `job` span.
pub fn init(verbose: bool, logfile: Option<&Path>) -> Res<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    match logfile {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }

    Ok(())
}
