//! Load `.disksearcher.toml` from the search root (CLI only). Lib callers pass options directly.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::Opts;
use crate::utils::config::PackagePaths;

#[derive(Debug, Default, Deserialize)]
pub struct DisksearcherToml {
    #[serde(default)]
    settings: SettingsSection,
}

#[derive(Debug, Default, Deserialize)]
struct SettingsSection {
    searchers: Option<usize>,
    copiers: Option<usize>,
    dir_queue_capacity: Option<usize>,
    results_queue_capacity: Option<usize>,
    exclude: Option<Vec<String>>,
    list: Option<bool>,
    verbose: Option<bool>,
}

/// Load the settings file from `dir`. `Ok(None)` when there is no file; `Err` when it exists
/// but cannot be read or parsed.
pub fn load_disksearcher_toml(dir: &Path) -> Result<Option<DisksearcherToml>> {
    let path = dir.join(PackagePaths::get().config_filename());
    if !path.is_file() {
        return Ok(None);
    }
    let s = std::fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    parse_disksearcher_toml(&s)
        .with_context(|| format!("parse {}", path.display()))
        .map(Some)
}

pub fn parse_disksearcher_toml(s: &str) -> Result<DisksearcherToml> {
    Ok(toml::from_str(s)?)
}

/// Overwrite opts field from file when present.
macro_rules! apply_file_opt {
    ($idx:expr, $opts:expr, $idx_field:ident => $opts_field:ident) => {
        if let Some(v) = $idx.$idx_field {
            $opts.$opts_field = v;
        }
    };
}

/// Apply file config to opts (only set fields present in the file). Call before applying CLI.
pub fn apply_file_to_opts(file: &DisksearcherToml, opts: &mut Opts) {
    let s = &file.settings;
    apply_file_opt!(s, opts, searchers => searchers);
    apply_file_opt!(s, opts, copiers => copiers);
    apply_file_opt!(s, opts, dir_queue_capacity => dir_queue_capacity);
    apply_file_opt!(s, opts, results_queue_capacity => results_queue_capacity);
    if let Some(ref v) = s.exclude {
        opts.exclude = v.clone();
    }
    apply_file_opt!(s, opts, list => list_paths);
    apply_file_opt!(s, opts, verbose => verbose);
}
