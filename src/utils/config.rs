//! Application configuration constants.
//! Queue sizes, pool limits and copy tuning in one place.

use std::sync::OnceLock;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived file names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    config_filename: String,
    results_filename: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                config_filename: format!(".{pkg}.toml"),
                results_filename: format!("{pkg}.results"),
            }
        })
    }

    /// Optional settings file looked up in the search root.
    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }

    /// File written in the working directory when `--list` output is too long for stdout.
    pub fn results_filename(&self) -> &str {
        &self.results_filename
    }
}

// ---- Queues ----

/// Queue capacities between stages.
pub struct QueueConsts;

impl QueueConsts {
    /// Scouter -> searchers.
    pub const DIRECTORY_QUEUE_CAPACITY: usize = 50;
    /// Searchers -> copiers.
    pub const RESULTS_QUEUE_CAPACITY: usize = 50;
}

// ---- Worker threads ----

/// Default and maximum pool sizes for searchers and copiers.
/// Use [`WorkerThreadLimits::current()`] to fill `all_threads` from rayon; the rest are const.
#[derive(Clone, Copy, Debug)]
pub struct WorkerThreadLimits {
    /// Available threads (from rayon); set by [`WorkerThreadLimits::current()`].
    pub all_threads: usize,
    /// Minimum size of either pool.
    pub floor: usize,
    /// Upper bound for the default size of either pool.
    pub default_max: usize,
}

impl Default for WorkerThreadLimits {
    fn default() -> Self {
        Self {
            all_threads: 0, // use current() to set from rayon
            floor: Self::FLOOR_THREADS,
            default_max: Self::DEFAULT_MAX_THREADS,
        }
    }
}

impl WorkerThreadLimits {
    pub const FLOOR_THREADS: usize = 1;
    pub const DEFAULT_MAX_THREADS: usize = 8;

    /// Build limits with `all_threads` set from `rayon::current_num_threads()`.
    pub fn current() -> Self {
        Self {
            all_threads: rayon::current_num_threads(),
            ..Self::default()
        }
    }

    /// Pool size used when neither the CLI nor the config file sets one.
    pub fn default_pool_size(&self) -> usize {
        self.all_threads.clamp(self.floor, self.default_max)
    }
}

// ---- Copying ----

/// Copier I/O and naming limits.
pub struct CopyConsts;

impl CopyConsts {
    /// Intermediate buffer for byte copies (bytes).
    pub const COPY_BUFFER_SIZE: usize = 4096;
    /// Destination names tried per file (`name.ext`, `name(1).ext`, ...) before giving up.
    pub const MAX_NAME_ATTEMPTS: usize = 100;
}

// ---- List output ----

/// When --list is set, if more files than this were copied, write them to RESULTS_FILENAME instead of stdout.
pub const LIST_THRESHOLD: usize = 100;
