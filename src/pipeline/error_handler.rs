use crate::RunSummary;

/// Per-file copy failures were logged as they happened; after the join, warn once with the total.
pub fn check_for_failed_copies(summary: &RunSummary) {
    if summary.failed > 0 {
        log::warn!(
            "{} of {} matched files could not be copied",
            summary.failed,
            summary.matched
        );
    }
}
