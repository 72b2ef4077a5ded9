//! CLI command handler: build options (defaults < .disksearcher.toml < flags), run, report.

use anyhow::Result;
use log::{debug, warn};
use std::sync::Arc;

use crate::Opts;
use crate::engine::arg_parser::Cli;
use crate::engine::listing::FsLister;
use crate::engine::report::{print_summary, write_copy_list};
use crate::pipeline::run_search;
use crate::utils::disksearcher_toml::{apply_file_to_opts, load_disksearcher_toml};
use crate::utils::setup_logging;

/// Merge defaults, the settings file in ROOT, and CLI flags, in that order.
/// Exclude patterns from the file and the CLI are combined.
pub fn build_opts(cli: &Cli) -> (Opts, Option<anyhow::Error>) {
    let mut opts = Opts {
        pattern: cli.pattern.clone(),
        extension: cli.extension.clone(),
        root: cli.root.clone(),
        destination: cli.destination.clone(),
        ..Opts::default()
    };

    let file_error = match load_disksearcher_toml(&cli.root) {
        Ok(Some(file)) => {
            apply_file_to_opts(&file, &mut opts);
            None
        }
        Ok(None) => None,
        Err(e) => Some(e),
    };

    if let Some(n) = cli.searchers {
        opts.searchers = n;
    }
    if let Some(n) = cli.copiers {
        opts.copiers = n;
    }
    if let Some(n) = cli.dir_queue_capacity {
        opts.dir_queue_capacity = n;
    }
    if let Some(n) = cli.results_queue_capacity {
        opts.results_queue_capacity = n;
    }
    opts.exclude.extend(cli.exclude.iter().cloned());
    if let Some(list) = cli.list {
        opts.list_paths = list;
    }
    if let Some(verbose) = cli.verbose {
        opts.verbose = verbose;
    }
    (opts, file_error)
}

/// Run the search-and-copy pipeline for the parsed command line.
pub fn handle_run(cli: &Cli) -> Result<()> {
    let (opts, file_error) = build_opts(cli);
    setup_logging(opts.verbose);
    if let Some(e) = file_error {
        warn!("ignoring settings file: {:#}", e);
    }
    debug!(
        "{} CONFIG:{:#?}",
        env!("CARGO_PKG_NAME").to_uppercase(),
        opts
    );

    let summary = run_search(&opts, Arc::new(FsLister))?;
    print_summary(&summary);
    if opts.list_paths {
        write_copy_list(&summary, &std::env::current_dir()?)?;
    }
    Ok(())
}
