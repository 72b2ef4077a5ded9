//! Path, name-matching and filter utilities

use anyhow::{Context, Result};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Convert absolute path to relative path from base
pub fn path_relative_to(path: &Path, base: &Path) -> Option<PathBuf> {
    path.strip_prefix(base).ok().map(|p| p.to_path_buf())
}

/// Path shown in logs: relative to `root` when under it, else as given.
pub fn display_path(path: &Path, root: &Path) -> String {
    path_relative_to(path, root)
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| path.to_path_buf())
        .display()
        .to_string()
}

/// True when `name` ends with `extension` and the rest of the name contains `pattern`.
///
/// Both are literal: extension `txt` matches `notes.txt` and also `mytesttxt`. Names are
/// compared as raw bytes, so names that are not valid UTF-8 can still match.
pub fn is_file_match(name: &OsStr, pattern: &str, extension: &str) -> bool {
    let Some(base) = name.as_encoded_bytes().strip_suffix(extension.as_bytes()) else {
        return false;
    };
    let pattern = pattern.as_bytes();
    pattern.is_empty() || base.windows(pattern.len()).any(|w| w == pattern)
}

/// Returns true if the scouter should enqueue and descend into `path`.
///
/// The root is always scouted. Other directories are skipped when they are the destination
/// (copies must not feed back into the search) or match an exclude pattern by name or path.
pub fn should_scout(
    path: &Path,
    root: &Path,
    destination_canonical: &Option<PathBuf>,
    exclude_patterns: &[String],
) -> bool {
    if path == root {
        return true;
    }
    if let Some(dest) = destination_canonical
        && path == dest.as_path()
    {
        return false;
    }
    if exclude_patterns.is_empty() {
        return true;
    }
    let name = match path.file_name().and_then(|n| n.to_str()) {
        Some(n) => n,
        None => return true,
    };
    let path_str = path.to_str().unwrap_or("");
    for pattern in exclude_patterns {
        if glob_match(pattern, name) || glob_match(pattern, path_str) {
            return false;
        }
    }
    true
}

/// Simple glob pattern matching (supports * and ?)
pub fn glob_match(pattern: &str, text: &str) -> bool {
    // Remove leading '!' if present (negation handled by caller)
    let pattern = pattern.strip_prefix('!').unwrap_or(pattern);

    let mut pattern_chars = pattern.chars().peekable();
    let mut text_chars = text.chars().peekable();

    while let Some(&p) = pattern_chars.peek() {
        match p {
            '*' => {
                pattern_chars.next();
                if pattern_chars.peek().is_none() {
                    return true; // trailing * matches everything
                }
                // Try to match rest of pattern at every remaining offset
                let rest: String = pattern_chars.by_ref().collect();
                loop {
                    if glob_match(&rest, &text_chars.clone().collect::<String>()) {
                        return true;
                    }
                    if text_chars.next().is_none() {
                        return false;
                    }
                }
            }
            '?' => {
                pattern_chars.next();
                if text_chars.next().is_none() {
                    return false;
                }
            }
            _ => {
                pattern_chars.next();
                if text_chars.next() != Some(p) {
                    return false;
                }
            }
        }
    }

    text_chars.peek().is_none()
}

/// Canonicalize the search root, and the destination when it exists.
pub fn canonicalize_paths(root: &Path, destination: &Path) -> Result<(PathBuf, Option<PathBuf>)> {
    let root = root
        .canonicalize()
        .with_context(|| format!("canonicalize root {}", root.display()))?;
    let destination_canonical = destination.canonicalize().ok();
    Ok((root, destination_canonical))
}
