use anyhow::{Context, Result};
use log::debug;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::engine::listing::EntryLister;
use crate::engine::progress::{create_counter, finish_counter, refresh_bar};
use crate::engine::tools::canonicalize_paths;
use crate::pipeline;
use crate::utils::fd_limit::cap_pools_by_fd_limit;
use crate::{Opts, RunSummary};

/// Start scouter, searchers and copiers. Returns the handles; the caller must
/// [`join_pipeline`] them.
///
/// Producer registrations are taken here, before any thread exists: the scouter's on the
/// directory queue and every searcher's on the results queue. A consumer that starts first
/// therefore blocks instead of seeing an empty queue with no producers and quitting early.
pub fn run_pipeline(opts: &Opts, lister: Arc<dyn EntryLister>) -> Result<pipeline::PipelineHandles> {
    let tuning = setup_pipeline_tuning(opts)?;
    let (root, destination) = setup_pipeline_paths(opts)?;
    let queues = pipeline::create_pipeline_queues(opts)?;

    let scout_producer = queues.directory_queue.producer();
    let search_producers: Vec<_> = (0..tuning.searchers)
        .map(|_| queues.results_queue.producer())
        .collect();

    let progress = opts.verbose.then(|| {
        let bar = create_counter("Copying");
        refresh_bar(&bar);
        bar
    });

    let scouter_handle = pipeline::spawn_scouter(
        scout_producer,
        pipeline::ScoutContext {
            root: root.clone(),
            destination_canonical: Some(destination.clone()),
            exclude: opts.exclude.clone(),
            lister: Arc::clone(&lister),
        },
    );

    let search_ctx = Arc::new(pipeline::SearchContext {
        root: root.clone(),
        pattern: opts.pattern.clone(),
        extension: opts.extension.clone(),
        lister,
    });
    let searcher_handles =
        pipeline::spawn_searchers(&queues.directory_queue, search_producers, &search_ctx);

    let copy_ctx = Arc::new(pipeline::CopyContext {
        root,
        destination,
        progress: progress.clone(),
    });
    let copier_handles = pipeline::spawn_copiers(&queues.results_queue, &copy_ctx, tuning.copiers);

    Ok(pipeline::PipelineHandles {
        scouter_handle,
        searcher_handles,
        copier_handles,
        queues,
        progress,
    })
}

/// Join scouter, searchers and copiers (in pipeline order) and total their counts.
pub fn join_pipeline(handles: pipeline::PipelineHandles) -> Result<RunSummary> {
    let pipeline::PipelineHandles {
        scouter_handle,
        searcher_handles,
        copier_handles,
        queues,
        progress,
    } = handles;

    let mut summary = RunSummary {
        directories: scouter_handle
            .join()
            .map_err(|_| anyhow::anyhow!("scouter thread panicked"))?,
        ..RunSummary::default()
    };
    for h in searcher_handles {
        summary.matched += h
            .join()
            .map_err(|_| anyhow::anyhow!("searcher thread panicked"))?;
    }
    for h in copier_handles {
        summary.absorb(
            h.join()
                .map_err(|_| anyhow::anyhow!("copier thread panicked"))?,
        );
    }
    debug_assert_eq!(queues.directory_queue.producer_count(), 0);
    debug_assert_eq!(queues.results_queue.producer_count(), 0);

    if let Some(bar) = &progress {
        finish_counter(bar, summary.copied_count());
    }
    Ok(summary)
}

/// Validate pool sizes and cap them to the FD limit.
pub fn setup_pipeline_tuning(opts: &Opts) -> Result<pipeline::PipelineTuning> {
    if opts.searchers == 0 {
        anyhow::bail!("at least one searcher is required");
    }
    if opts.copiers == 0 {
        anyhow::bail!("at least one copier is required");
    }
    let (searchers, copiers) = cap_pools_by_fd_limit(opts.searchers, opts.copiers);
    if (searchers, copiers) != (opts.searchers, opts.copiers) {
        debug!(
            "Capping pools {}+{} -> {}+{} (FD limit ~80%)",
            opts.searchers, opts.copiers, searchers, copiers
        );
    }
    debug!("Searchers: {}, copiers: {}", searchers, copiers);
    Ok(pipeline::PipelineTuning { searchers, copiers })
}

/// Check the root is a directory, create the destination, and canonicalize both.
pub fn setup_pipeline_paths(opts: &Opts) -> Result<(PathBuf, PathBuf)> {
    if !opts.root.is_dir() {
        anyhow::bail!("root is not a directory: {}", opts.root.display());
    }
    ensure_destination(&opts.destination)?;
    let (root, destination_canonical) = canonicalize_paths(&opts.root, &opts.destination)?;
    let destination = destination_canonical
        .with_context(|| format!("canonicalize destination {}", opts.destination.display()))?;
    if destination == root {
        anyhow::bail!("destination must differ from root: {}", root.display());
    }
    Ok((root, destination))
}

/// Create the destination up front so its canonical path is known before the walk starts.
fn ensure_destination(destination: &Path) -> Result<()> {
    std::fs::create_dir_all(destination)
        .with_context(|| format!("create destination {}", destination.display()))
}

/// Main orchestrator: run the whole pipeline and wait for every stage.
/// Scouter → directory queue → searchers → results queue → copiers → destination.
pub fn run_search(opts: &Opts, lister: Arc<dyn EntryLister>) -> Result<RunSummary> {
    let handles = run_pipeline(opts, lister)?;
    let summary = join_pipeline(handles)?;
    debug!(
        "{} directories searched, {} files matched, {} copied",
        summary.directories,
        summary.matched,
        summary.copied_count()
    );
    pipeline::check_for_failed_copies(&summary);
    Ok(summary)
}
