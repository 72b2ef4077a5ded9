//! Pipeline context: the queues between stages, per-stage shared settings, and the handles
//! the orchestrator joins at the end.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::JoinHandle;

use crate::engine::listing::EntryLister;
use crate::engine::progress::ProgressBar;
use crate::queue::BoundedQueue;
use crate::{CopierReport, Opts};

/// Pool sizes after validation and FD capping.
#[derive(Clone, Debug)]
pub struct PipelineTuning {
    pub searchers: usize,
    pub copiers: usize,
}

/// Settings for the scouter thread.
pub struct ScoutContext {
    /// Canonical search root; always the first directory enqueued.
    pub root: PathBuf,
    /// Canonical destination, skipped by the walk.
    pub destination_canonical: Option<PathBuf>,
    pub exclude: Vec<String>,
    pub lister: Arc<dyn EntryLister>,
}

/// Settings shared by every searcher.
pub struct SearchContext {
    pub root: PathBuf,
    pub pattern: String,
    /// Literal suffix every matched name ends with.
    pub extension: String,
    pub lister: Arc<dyn EntryLister>,
}

/// Settings shared by every copier.
pub struct CopyContext {
    pub root: PathBuf,
    pub destination: PathBuf,
    pub progress: Option<ProgressBar>,
}

/// The two queues of a run: scouter -> searchers, searchers -> copiers.
pub struct PipelineQueues {
    pub directory_queue: Arc<BoundedQueue<PathBuf>>,
    pub results_queue: Arc<BoundedQueue<PathBuf>>,
}

pub fn create_pipeline_queues(opts: &Opts) -> Result<PipelineQueues> {
    let directory_queue = BoundedQueue::new(opts.dir_queue_capacity)
        .with_context(|| format!("directory queue (capacity {})", opts.dir_queue_capacity))?;
    let results_queue = BoundedQueue::new(opts.results_queue_capacity).with_context(|| {
        format!("results queue (capacity {})", opts.results_queue_capacity)
    })?;
    Ok(PipelineQueues {
        directory_queue: Arc::new(directory_queue),
        results_queue: Arc::new(results_queue),
    })
}

/// Handles returned by [`run_pipeline`](super::run_pipeline): join them with
/// [`join_pipeline`](super::join_pipeline) when done.
/// Each stage returns its own count; the queues are kept for diagnostics.
pub struct PipelineHandles {
    pub scouter_handle: JoinHandle<usize>,
    pub searcher_handles: Vec<JoinHandle<usize>>,
    pub copier_handles: Vec<JoinHandle<CopierReport>>,
    pub queues: PipelineQueues,
    pub progress: Option<ProgressBar>,
}
