use clap::Parser;
use std::path::PathBuf;

/// Search a directory tree for files by name and copy the matches.
#[derive(Clone, Parser)]
#[command(name = "disksearcher")]
#[command(
    about = "Find files whose name contains PATTERN and ends with EXTENSION under ROOT; copy them to DEST."
)]
pub struct Cli {
    /// Substring the file name must contain (extension excluded).
    #[arg(value_name = "PATTERN")]
    pub pattern: String,

    /// Suffix the file name must end with, taken literally (`.txt` also requires the dot).
    #[arg(value_name = "EXTENSION")]
    pub extension: String,

    /// Directory tree to search.
    #[arg(value_name = "ROOT")]
    pub root: PathBuf,

    /// Directory to copy matches into. Created if missing.
    #[arg(value_name = "DEST")]
    pub destination: PathBuf,

    /// Number of searcher threads. Default: available threads, at most 8.
    #[arg(long, short = 's', value_parser = clap::value_parser!(usize))]
    pub searchers: Option<usize>,

    /// Number of copier threads. Default: available threads, at most 8.
    #[arg(long, short = 'c', value_parser = clap::value_parser!(usize))]
    pub copiers: Option<usize>,

    /// Capacity of the directory queue (scouter -> searchers).
    #[arg(long, value_parser = clap::value_parser!(usize))]
    pub dir_queue_capacity: Option<usize>,

    /// Capacity of the results queue (searchers -> copiers).
    #[arg(long, value_parser = clap::value_parser!(usize))]
    pub results_queue_capacity: Option<usize>,

    /// Exclude directories (glob syntax). Can specify multiple: -e pattern1 pattern2 pattern3
    #[arg(long, short = 'e', num_args = 1..)]
    pub exclude: Vec<String>,

    /// List each copy (source -> destination). Long lists are written to disksearcher.results instead of stdout.
    #[arg(long, short = 'l', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub list: Option<bool>,

    /// Verbose output.
    #[arg(long, short = 'v', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,
}
