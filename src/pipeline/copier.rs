//! Copier pool: drains the results queue into the destination directory.

use log::{debug, warn};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::engine::copy::copy_file;
use crate::engine::progress::update_progress_bar;
use crate::engine::tools::display_path;
use crate::queue::BoundedQueue;
use crate::{CopierReport, CopyRecord};

use super::context::CopyContext;

/// Single copier: copy files until the results queue is done. A failed file is logged and
/// counted; the loop goes on with the next one.
fn copier_loop(results_queue: Arc<BoundedQueue<PathBuf>>, ctx: Arc<CopyContext>) -> CopierReport {
    let mut report = CopierReport::default();
    for source in results_queue.iter() {
        match copy_file(&source, &ctx.destination) {
            Ok(destination) => {
                debug!(
                    "copier: {} -> {}",
                    display_path(&source, &ctx.root),
                    destination.display()
                );
                if let Some(bar) = &ctx.progress {
                    update_progress_bar(bar, 1);
                }
                report.copied.push(CopyRecord {
                    source,
                    destination,
                });
            }
            Err(e) => {
                warn!("copy failed for {}: {}", source.display(), e);
                report.failed += 1;
            }
        }
    }
    report
}

pub fn spawn_copiers(
    results_queue: &Arc<BoundedQueue<PathBuf>>,
    ctx: &Arc<CopyContext>,
    num_copiers: usize,
) -> Vec<JoinHandle<CopierReport>> {
    (0..num_copiers)
        .map(|_| {
            let results_queue = Arc::clone(results_queue);
            let ctx = Arc::clone(ctx);
            thread::spawn(move || copier_loop(results_queue, ctx))
        })
        .collect()
}
