//! disksearcher CLI: search a tree for files by name and copy the matches.

use anyhow::Result;
use clap::Parser;
use disksearcher::engine::arg_parser::Cli;
use disksearcher::engine::handle_run;
use std::time::Instant;

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();
    handle_run(&cli)?;
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(())
}
