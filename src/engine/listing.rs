//! Directory listing collaborator used by the scouter and the searchers.

use log::debug;
use std::ffi::OsString;
use std::path::Path;
use walkdir::WalkDir;

/// What a listed entry is. Only `File` entries are ever matched and copied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    Dir,
    /// Regular file, or a symlink resolving to one.
    File,
    /// FIFO, socket, device, dangling or directory symlink: never descended, never copied.
    Other,
}

/// One direct child of a listed directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListedEntry {
    pub name: OsString,
    pub kind: EntryKind,
}

impl ListedEntry {
    pub fn new(name: impl Into<OsString>, kind: EntryKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn dir(name: impl Into<OsString>) -> Self {
        Self::new(name, EntryKind::Dir)
    }

    pub fn file(name: impl Into<OsString>) -> Self {
        Self::new(name, EntryKind::File)
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }
}

/// Lists the direct children of a directory.
///
/// Unreadable or missing directories give an empty (or partial) listing, never an error.
pub trait EntryLister: Send + Sync {
    fn list_entries(&self, dir: &Path) -> Vec<ListedEntry>;
}

/// Filesystem lister: one level of walkdir, symlinks not followed for descent.
///
/// A symlink is never `Dir`, so the scouter cannot loop through link cycles. It is `File` only
/// when it resolves to a regular file.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsLister;

impl EntryLister for FsLister {
    fn list_entries(&self, dir: &Path) -> Vec<ListedEntry> {
        WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
            .into_iter()
            .filter_map(|r| match r {
                Ok(entry) => {
                    let file_type = entry.file_type();
                    let kind = if file_type.is_dir() {
                        EntryKind::Dir
                    } else if file_type.is_file()
                        || (file_type.is_symlink() && entry.path().is_file())
                    {
                        EntryKind::File
                    } else {
                        EntryKind::Other
                    };
                    Some(ListedEntry::new(entry.file_name(), kind))
                }
                Err(err) => {
                    debug!("list {}: {}", dir.display(), err);
                    None
                }
            })
            .collect()
    }
}
