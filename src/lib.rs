//! disksearcher: find files by name under a directory tree and copy them, through a
//! scouter -> searchers -> copiers pipeline joined by bounded blocking queues.

pub mod engine;
pub mod pipeline;
pub mod queue;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use types::*;

use log::debug;
use std::sync::Arc;

/// Result alias used by public disksearcher API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Single entry point: search `opts.root` and copy every match into `opts.destination`.
///
/// Blocks until the scouter, every searcher and every copier have finished. Per-file copy
/// failures are logged and counted in [`RunSummary::failed`]; only setup problems (root not a
/// directory, destination not creatable, zero-sized pools) return `Err`.
///
/// ```ignore
/// let opts = disksearcher::SearchOpts {
///     pattern: "test".into(),
///     extension: "txt".into(),
///     root: "/data".into(),
///     destination: "/tmp/found".into(),
///     searchers: Some(2),
///     copiers: Some(2),
///     exclude: vec![".git".into()],
/// };
/// let summary = disksearcher::search_and_copy(&opts)?;
/// ```
pub fn search_and_copy(opts: &SearchOpts) -> Result<RunSummary> {
    let opts = Opts::from(opts);
    debug!(
        "{} CONFIG:{:#?}",
        env!("CARGO_PKG_NAME").to_string().to_uppercase(),
        opts
    );
    pipeline::run_search(&opts, Arc::new(engine::FsLister))
}
