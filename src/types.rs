//! Public and internal types for the disksearcher API and pipeline.

use std::path::PathBuf;

use crate::utils::config::{QueueConsts, WorkerThreadLimits};

/// One file copied by a copier: where it came from and the name it got in the destination.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CopyRecord {
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// What one copier did before its input queue reported `Done`.
#[derive(Clone, Debug, Default)]
pub struct CopierReport {
    pub copied: Vec<CopyRecord>,
    pub failed: usize,
}

/// Totals for a finished run, summed over every stage.
#[derive(Clone, Debug, Default)]
pub struct RunSummary {
    /// Directories the scouter put on the directory queue (root included).
    pub directories: usize,
    /// Files the searchers put on the results queue.
    pub matched: usize,
    /// Successful copies, in no particular order.
    pub copied: Vec<CopyRecord>,
    /// Files whose copy failed (logged, then skipped).
    pub failed: usize,
}

impl RunSummary {
    pub fn copied_count(&self) -> usize {
        self.copied.len()
    }

    /// Fold one copier's report into the totals.
    pub fn absorb(&mut self, report: CopierReport) {
        self.copied.extend(report.copied);
        self.failed += report.failed;
    }
}

/// Lib-only options for [`search_and_copy`](crate::search_and_copy).
#[derive(Clone, Debug)]
pub struct SearchOpts {
    /// Substring the file name (extension stripped) must contain.
    pub pattern: String,
    /// Suffix the file name must end with, taken literally (`.txt` or `txt`).
    pub extension: String,
    /// Directory tree to search.
    pub root: PathBuf,
    /// Directory matches are copied into. Created when missing.
    pub destination: PathBuf,
    /// Searcher pool size. When None, derived from available threads.
    pub searchers: Option<usize>,
    /// Copier pool size. When None, derived from available threads.
    pub copiers: Option<usize>,
    /// Exclude patterns for directories (glob syntax, e.g. `node_modules`, `.git`).
    pub exclude: Vec<String>,
}

impl From<&SearchOpts> for Opts {
    fn from(o: &SearchOpts) -> Self {
        let limits = WorkerThreadLimits::current();
        Opts {
            pattern: o.pattern.clone(),
            extension: o.extension.clone(),
            root: o.root.clone(),
            destination: o.destination.clone(),
            searchers: o.searchers.unwrap_or_else(|| limits.default_pool_size()),
            copiers: o.copiers.unwrap_or_else(|| limits.default_pool_size()),
            exclude: o.exclude.clone(),
            ..Opts::default()
        }
    }
}

/// Full options (CLI and lib). Use [`SearchOpts`] for lib.
#[derive(Clone, Debug)]
pub struct Opts {
    /// Substring the file name (extension stripped) must contain.
    pub pattern: String,
    /// Extension the file name must end with.
    pub extension: String,
    /// Directory tree to search.
    pub root: PathBuf,
    /// Directory matches are copied into.
    pub destination: PathBuf,
    /// Searcher pool size (>= 1).
    pub searchers: usize,
    /// Copier pool size (>= 1).
    pub copiers: usize,
    /// Capacity of the scouter -> searchers queue.
    pub dir_queue_capacity: usize,
    /// Capacity of the searchers -> copiers queue.
    pub results_queue_capacity: usize,
    /// Exclude patterns for directories (glob syntax).
    pub exclude: Vec<String>,
    /// Debug logging and copy counter.
    pub verbose: bool,
    /// Print every copy. If more than LIST_THRESHOLD, write to disksearcher.results instead of stdout.
    pub list_paths: bool,
}

impl Default for Opts {
    fn default() -> Self {
        let pool = WorkerThreadLimits::current().default_pool_size();
        Self {
            pattern: String::new(),
            extension: String::new(),
            root: PathBuf::from("."),
            destination: PathBuf::new(),
            searchers: pool,
            copiers: pool,
            dir_queue_capacity: QueueConsts::DIRECTORY_QUEUE_CAPACITY,
            results_queue_capacity: QueueConsts::RESULTS_QUEUE_CAPACITY,
            exclude: Vec::new(),
            verbose: false,
            list_paths: false,
        }
    }
}
