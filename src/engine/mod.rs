//! Engine module: CLI handling and the helpers the pipeline stages call

pub mod arg_parser;
pub mod cli;
pub mod copy;
pub mod listing;
pub mod progress;
pub mod report;
pub mod tools;

// Re-export commonly used functions
pub use arg_parser::Cli;
pub use cli::{build_opts, handle_run};
pub use copy::{CopyError, candidate_name, copy_file, reserve_destination};
pub use listing::{EntryKind, EntryLister, FsLister, ListedEntry};
pub use report::{print_summary, write_copy_list};
pub use tools::{
    display_path, glob_match, is_file_match, path_relative_to, should_scout,
};
