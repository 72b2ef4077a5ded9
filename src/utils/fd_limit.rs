//! File descriptor limit detection for capping stage pools (Unix).

/// File descriptors a searcher holds at once (one directory handle).
pub const FDS_PER_SEARCHER: usize = 1;

/// File descriptors a copier holds at once (source and destination).
pub const FDS_PER_COPIER: usize = 2;

/// Fraction of the process FD limit to use (leave headroom for other code).
const FD_LIMIT_FRACTION: f64 = 0.8;

/// Returns the soft limit for max open file descriptors, or `None` if unavailable (e.g. Windows).
#[cfg(unix)]
pub fn max_open_fds() -> Option<u64> {
    use std::mem::MaybeUninit;
    let mut rlim = MaybeUninit::<libc::rlimit>::uninit();
    if unsafe { libc::getrlimit(libc::RLIMIT_NOFILE, rlim.as_mut_ptr()) } != 0 {
        return None;
    }
    let rlim = unsafe { rlim.assume_init() };
    let cur = rlim.rlim_cur;
    // RLIM_INFINITY is typically !0 or u64::MAX; treat as "no practical limit"
    if cur == libc::RLIM_INFINITY || cur > i64::MAX as u64 {
        return None;
    }
    Some(cur)
}

#[cfg(not(unix))]
pub fn max_open_fds() -> Option<u64> {
    None
}

/// Largest number of workers using `fds_per_worker` each that stays under ~80% of the FD limit.
/// Returns `None` if no limit is available (use the requested size).
pub fn max_workers_by_fd_limit(fds_per_worker: usize) -> Option<usize> {
    let limit = max_open_fds()?;
    let usable = (limit as f64 * FD_LIMIT_FRACTION) as usize;
    let per = fds_per_worker.max(1);
    if usable < per {
        return Some(1);
    }
    Some(usable / per)
}

/// Cap `(searchers, copiers)` so both pools together fit the FD budget.
///
/// The budget is split in proportion to each pool's FD use; each pool keeps at least one worker.
pub fn cap_pools_by_fd_limit(searchers: usize, copiers: usize) -> (usize, usize) {
    let Some(budget) = max_workers_by_fd_limit(1) else {
        return (searchers, copiers);
    };
    let searcher_fds = searchers.saturating_mul(FDS_PER_SEARCHER);
    let wanted = searcher_fds.saturating_add(copiers.saturating_mul(FDS_PER_COPIER));
    if wanted <= budget {
        return (searchers, copiers);
    }
    // u128 keeps budget * searcher_fds exact for any pool size.
    let searcher_share = (budget as u128 * searcher_fds as u128 / wanted as u128) as usize;
    let copier_share = budget - searcher_share;
    (
        (searcher_share / FDS_PER_SEARCHER).clamp(1, searchers),
        (copier_share / FDS_PER_COPIER).clamp(1, copiers),
    )
}
