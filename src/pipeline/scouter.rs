//! Scouter stage: walks the tree and feeds every directory to the directory queue.

use log::debug;
use std::path::PathBuf;
use std::thread::{self, JoinHandle};

use crate::engine::tools::{display_path, should_scout};
use crate::queue::Producer;

use super::context::ScoutContext;

pub fn spawn_scouter(producer: Producer<PathBuf>, ctx: ScoutContext) -> JoinHandle<usize> {
    thread::spawn(move || run_scouter(producer, &ctx))
}

/// Walk `ctx.root` depth-first in pre-order (a directory is enqueued before its children) and
/// enqueue every directory that passes [`should_scout`]. Sibling order is the lister's.
///
/// Dropping `producer` at the end unregisters the scouter, which is how searchers learn the
/// walk is over. Returns the number of directories enqueued.
pub fn run_scouter(producer: Producer<PathBuf>, ctx: &ScoutContext) -> usize {
    let mut count = 0_usize;
    // Explicit stack instead of recursion: deep trees must not overflow the thread stack.
    let mut stack = vec![ctx.root.clone()];
    while let Some(dir) = stack.pop() {
        let children: Vec<PathBuf> = ctx
            .lister
            .list_entries(&dir)
            .into_iter()
            .filter(|e| e.is_dir())
            .map(|e| dir.join(e.name))
            .filter(|p| should_scout(p, &ctx.root, &ctx.destination_canonical, &ctx.exclude))
            .collect();

        debug!("scouter: {}", display_path(&dir, &ctx.root));
        producer.enqueue(dir);
        count += 1;

        // Reverse so the first listed child is visited first.
        stack.extend(children.into_iter().rev());
    }
    debug!("scouter: done, {} directories", count);
    drop(producer);
    count
}
