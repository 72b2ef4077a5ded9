//! Searcher pool: directories in, matching files out.

use log::debug;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::engine::tools::{display_path, is_file_match};
use crate::queue::{BoundedQueue, Producer};

use super::context::SearchContext;

/// Single searcher: take directories until the directory queue is done, enqueue matches.
/// Dropping `producer` on exit unregisters this searcher from the results queue.
fn searcher_loop(
    directory_queue: Arc<BoundedQueue<PathBuf>>,
    producer: Producer<PathBuf>,
    ctx: Arc<SearchContext>,
) -> usize {
    let mut matched = 0_usize;
    for dir in directory_queue.iter() {
        matched += search_directory(&dir, &producer, &ctx);
    }
    drop(producer);
    matched
}

/// Spawn one searcher per producer handle. The handles are registered by the caller before
/// any copier starts, so copiers cannot see `Done` while a searcher is still coming up.
pub fn spawn_searchers(
    directory_queue: &Arc<BoundedQueue<PathBuf>>,
    producers: Vec<Producer<PathBuf>>,
    ctx: &Arc<SearchContext>,
) -> Vec<JoinHandle<usize>> {
    producers
        .into_iter()
        .map(|producer| {
            let directory_queue = Arc::clone(directory_queue);
            let ctx = Arc::clone(ctx);
            thread::spawn(move || searcher_loop(directory_queue, producer, ctx))
        })
        .collect()
}

/// Enqueue every direct regular file of `dir` whose name matches. Subdirectories are left to
/// the scouter; FIFOs, sockets and devices are ignored. Returns the number of files enqueued.
pub fn search_directory(dir: &Path, producer: &Producer<PathBuf>, ctx: &SearchContext) -> usize {
    let mut matched = 0_usize;
    for entry in ctx.lister.list_entries(dir) {
        if !entry.is_file() {
            continue;
        }
        if is_file_match(&entry.name, &ctx.pattern, &ctx.extension) {
            let path = dir.join(&entry.name);
            debug!("searcher: match {}", display_path(&path, &ctx.root));
            producer.enqueue(path);
            matched += 1;
        }
    }
    matched
}
