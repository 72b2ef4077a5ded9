use anyhow::Result;
use crossbeam_channel::bounded;
use disksearcher::engine::{EntryKind, EntryLister, FsLister, ListedEntry};
use disksearcher::pipeline::{ScoutContext, SearchContext, run_scouter, run_search, search_directory};
use disksearcher::queue::BoundedQueue;
use disksearcher::{Opts, RunSummary, SearchOpts, search_and_copy};
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tempfile::tempdir;

/// In-memory tree: directory path -> direct children.
#[derive(Default)]
struct MemLister {
    dirs: HashMap<PathBuf, Vec<ListedEntry>>,
}

impl MemLister {
    /// `(name, is_dir)` pairs; non-directories are regular files.
    fn dir(self, path: impl Into<PathBuf>, entries: &[(&str, bool)]) -> Self {
        self.entries(
            path,
            entries
                .iter()
                .map(|(name, is_dir)| {
                    if *is_dir {
                        ListedEntry::dir(*name)
                    } else {
                        ListedEntry::file(*name)
                    }
                })
                .collect(),
        )
    }

    fn entries(mut self, path: impl Into<PathBuf>, entries: Vec<ListedEntry>) -> Self {
        self.dirs.insert(path.into(), entries);
        self
    }
}

impl EntryLister for MemLister {
    fn list_entries(&self, dir: &Path) -> Vec<ListedEntry> {
        self.dirs.get(dir).cloned().unwrap_or_default()
    }
}

fn scout(lister: MemLister, destination: Option<&str>, exclude: &[&str]) -> Vec<PathBuf> {
    let queue = Arc::new(BoundedQueue::new(2).unwrap());
    let producer = queue.producer();
    let ctx = ScoutContext {
        root: PathBuf::from("/r"),
        destination_canonical: destination.map(PathBuf::from),
        exclude: exclude.iter().map(|s| s.to_string()).collect(),
        lister: Arc::new(lister),
    };
    let h = thread::spawn(move || run_scouter(producer, &ctx));
    let dirs: Vec<PathBuf> = queue.iter().collect();
    assert_eq!(h.join().unwrap(), dirs.len());
    assert_eq!(queue.producer_count(), 0);
    dirs
}

fn paths(list: &[&str]) -> Vec<PathBuf> {
    list.iter().map(PathBuf::from).collect()
}

fn write(path: &Path, content: &[u8]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn dir_names(dir: &Path) -> BTreeSet<String> {
    fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect()
}

/// Run the pipeline on another thread and fail the test if it does not finish in time.
fn run_with_deadline(opts: Opts, lister: Arc<dyn EntryLister>) -> Result<RunSummary> {
    let (tx, rx) = bounded(1);
    thread::spawn(move || {
        let _ = tx.send(run_search(&opts, lister));
    });
    rx.recv_timeout(Duration::from_secs(10))
        .expect("pipeline did not finish within 10s")
}

fn opts(root: &Path, dest: &Path, searchers: usize, copiers: usize) -> Opts {
    Opts {
        pattern: "test".to_string(),
        extension: "txt".to_string(),
        root: root.to_path_buf(),
        destination: dest.to_path_buf(),
        searchers,
        copiers,
        ..Opts::default()
    }
}

// --- scouter ---

#[test]
fn test_scouter_pre_order() {
    let lister = MemLister::default()
        .dir("/r", &[("a", true), ("b", true), ("f.txt", false)])
        .dir("/r/a", &[("c", true)]);
    assert_eq!(
        scout(lister, None, &[]),
        paths(&["/r", "/r/a", "/r/a/c", "/r/b"])
    );
}

#[test]
fn test_scouter_empty_root_still_enqueued() {
    assert_eq!(scout(MemLister::default(), None, &[]), paths(&["/r"]));
}

#[test]
fn test_scouter_skips_destination_and_excluded() {
    let lister = MemLister::default()
        .dir("/r", &[("out", true), (".git", true), ("src", true)])
        .dir("/r/out", &[("inner", true)])
        .dir("/r/.git", &[("objects", true)]);
    assert_eq!(
        scout(lister, Some("/r/out"), &[".git"]),
        paths(&["/r", "/r/src"])
    );
}

// --- searcher ---

#[test]
fn test_search_directory_direct_files_only() {
    let lister = MemLister::default().dir(
        "/r/a",
        &[
            ("foo_test.txt", false),
            ("bar.txt", false),
            ("test_dir.txt", true),
            ("other_test.md", false),
            ("test.txt", false),
        ],
    );
    let ctx = SearchContext {
        root: PathBuf::from("/r"),
        pattern: "test".to_string(),
        extension: ".txt".to_string(),
        lister: Arc::new(lister),
    };
    let queue = Arc::new(BoundedQueue::new(8).unwrap());
    let producer = queue.producer();
    assert_eq!(search_directory(Path::new("/r/a"), &producer, &ctx), 2);
    drop(producer);
    assert_eq!(
        queue.iter().collect::<Vec<_>>(),
        paths(&["/r/a/foo_test.txt", "/r/a/test.txt"])
    );
}

#[test]
fn test_search_directory_ignores_special_files() {
    let lister = MemLister::default().entries(
        "/r",
        vec![
            ListedEntry::new("pipe_test.txt", EntryKind::Other),
            ListedEntry::file("real_test.txt"),
            ListedEntry::dir("dir_test.txt"),
        ],
    );
    let ctx = SearchContext {
        root: PathBuf::from("/r"),
        pattern: "test".to_string(),
        extension: ".txt".to_string(),
        lister: Arc::new(lister),
    };
    let queue = Arc::new(BoundedQueue::new(4).unwrap());
    let producer = queue.producer();
    assert_eq!(search_directory(Path::new("/r"), &producer, &ctx), 1);
    drop(producer);
    assert_eq!(
        queue.iter().collect::<Vec<_>>(),
        paths(&["/r/real_test.txt"])
    );
}

// --- full pipeline ---

#[test]
fn test_single_match_copied_identical() -> Result<()> {
    let root = tempdir()?;
    let dest = tempdir()?;
    write(&root.path().join("a/foo_test.txt"), b"hello from foo");
    write(&root.path().join("a/bar.txt"), b"no match");
    fs::create_dir_all(root.path().join("b"))?;

    let summary = run_search(&opts(root.path(), dest.path(), 1, 1), Arc::new(FsLister))?;

    assert_eq!(summary.directories, 3);
    assert_eq!(summary.matched, 1);
    assert_eq!(summary.copied_count(), 1);
    assert_eq!(summary.failed, 0);
    assert_eq!(dir_names(dest.path()), BTreeSet::from(["foo_test.txt".to_string()]));
    assert_eq!(
        fs::read(dest.path().join("foo_test.txt"))?,
        fs::read(root.path().join("a/foo_test.txt"))?
    );
    Ok(())
}

#[test]
fn test_existing_destination_file_not_overwritten() -> Result<()> {
    let root = tempdir()?;
    let dest = tempdir()?;
    write(&root.path().join("a/foo_test.txt"), b"new");
    write(&dest.path().join("foo_test.txt"), b"old");

    let summary = run_search(&opts(root.path(), dest.path(), 1, 1), Arc::new(FsLister))?;

    assert_eq!(summary.copied_count(), 1);
    assert_eq!(fs::read(dest.path().join("foo_test.txt"))?, b"old");
    assert_eq!(fs::read(dest.path().join("foo_test(1).txt"))?, b"new");
    assert_eq!(
        summary.copied[0].destination.file_name().unwrap(),
        "foo_test(1).txt"
    );
    Ok(())
}

#[test]
fn test_same_name_in_two_directories() -> Result<()> {
    let root = tempdir()?;
    let dest = tempdir()?;
    write(&root.path().join("a/n_test.txt"), b"a");
    write(&root.path().join("b/n_test.txt"), b"b");

    let summary = run_search(&opts(root.path(), dest.path(), 2, 2), Arc::new(FsLister))?;

    assert_eq!(summary.copied_count(), 2);
    assert_eq!(
        dir_names(dest.path()),
        BTreeSet::from(["n_test.txt".to_string(), "n_test(1).txt".to_string()])
    );
    let mut contents = vec![
        fs::read(dest.path().join("n_test.txt"))?,
        fs::read(dest.path().join("n_test(1).txt"))?,
    ];
    contents.sort();
    assert_eq!(contents, vec![b"a".to_vec(), b"b".to_vec()]);
    Ok(())
}

#[test]
fn test_many_files_many_workers() -> Result<()> {
    let root = tempdir()?;
    let dest = tempdir()?;
    let mut expected = BTreeSet::new();
    for d in 0..6 {
        for f in 0..20 {
            let name = if f % 2 == 0 {
                format!("d{d}_f{f}_test.txt")
            } else {
                format!("d{d}_f{f}.txt")
            };
            write(
                &root.path().join(format!("lvl{d}/sub{d}")).join(&name),
                name.as_bytes(),
            );
            if f % 2 == 0 {
                expected.insert(name);
            }
        }
    }

    let mut o = opts(root.path(), dest.path(), 4, 3);
    o.dir_queue_capacity = 2;
    o.results_queue_capacity = 3;
    let summary = run_search(&o, Arc::new(FsLister))?;

    assert_eq!(summary.directories, 1 + 6 * 2);
    assert_eq!(summary.matched, 60);
    assert_eq!(summary.copied_count(), 60);
    assert_eq!(dir_names(dest.path()), expected);
    for name in &expected {
        assert_eq!(fs::read(dest.path().join(name))?, name.as_bytes());
    }
    Ok(())
}

#[test]
fn test_destination_inside_root_not_searched() -> Result<()> {
    let root = tempdir()?;
    let dest = root.path().join("out");
    write(&dest.join("old_test.txt"), b"already here");
    write(&root.path().join("x_test.txt"), b"x");

    let summary = run_search(&opts(root.path(), &dest, 2, 2), Arc::new(FsLister))?;

    assert_eq!(summary.matched, 1);
    assert_eq!(
        dir_names(&dest),
        BTreeSet::from(["old_test.txt".to_string(), "x_test.txt".to_string()])
    );
    Ok(())
}

#[test]
fn test_excluded_directory_not_searched() -> Result<()> {
    let root = tempdir()?;
    let dest = tempdir()?;
    write(&root.path().join("skip/s_test.txt"), b"s");
    write(&root.path().join("keep/k_test.txt"), b"k");

    let mut o = opts(root.path(), dest.path(), 1, 1);
    o.exclude = vec!["skip".to_string()];
    let summary = run_search(&o, Arc::new(FsLister))?;

    assert_eq!(summary.matched, 1);
    assert_eq!(dir_names(dest.path()), BTreeSet::from(["k_test.txt".to_string()]));
    Ok(())
}

#[test]
fn test_no_matches_terminates() -> Result<()> {
    let root = tempdir()?;
    let dest = tempdir()?;
    write(&root.path().join("a/b/c/readme.md"), b"");

    let summary = run_search(&opts(root.path(), dest.path(), 3, 3), Arc::new(FsLister))?;

    assert_eq!(summary.directories, 4);
    assert_eq!(summary.matched, 0);
    assert_eq!(summary.copied_count(), 0);
    assert!(dir_names(dest.path()).is_empty());
    Ok(())
}

#[test]
fn test_missing_destination_created() -> Result<()> {
    let root = tempdir()?;
    let scratch = tempdir()?;
    let dest = scratch.path().join("new/dest");
    write(&root.path().join("y_test.txt"), b"y");

    let summary = run_search(&opts(root.path(), &dest, 1, 1), Arc::new(FsLister))?;

    assert_eq!(summary.copied_count(), 1);
    assert_eq!(fs::read(dest.join("y_test.txt"))?, b"y");
    Ok(())
}

#[test]
fn test_invalid_setup_rejected() -> Result<()> {
    let root = tempdir()?;
    let dest = tempdir()?;
    assert!(run_search(&opts(root.path(), dest.path(), 0, 1), Arc::new(FsLister)).is_err());
    assert!(run_search(&opts(root.path(), dest.path(), 1, 0), Arc::new(FsLister)).is_err());

    let mut o = opts(root.path(), dest.path(), 1, 1);
    o.results_queue_capacity = 0;
    assert!(run_search(&o, Arc::new(FsLister)).is_err());

    let file = root.path().join("plain.txt");
    write(&file, b"");
    assert!(run_search(&opts(&file, dest.path(), 1, 1), Arc::new(FsLister)).is_err());
    assert!(run_search(&opts(root.path(), root.path(), 1, 1), Arc::new(FsLister)).is_err());
    Ok(())
}

#[test]
fn test_search_and_copy_entry_point() -> Result<()> {
    let root = tempdir()?;
    let dest = tempdir()?;
    write(&root.path().join("deep/er/z_test.log"), b"z");
    write(&root.path().join("deep/z_test.txt"), b"wrong extension");

    let summary = search_and_copy(&SearchOpts {
        pattern: "_test".to_string(),
        extension: ".log".to_string(),
        root: root.path().to_path_buf(),
        destination: dest.path().to_path_buf(),
        searchers: Some(2),
        copiers: None,
        exclude: Vec::new(),
    })?;

    assert_eq!(summary.copied_count(), 1);
    assert_eq!(fs::read(dest.path().join("z_test.log"))?, b"z");
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_fifo_with_matching_name_is_skipped() -> Result<()> {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let root = tempdir()?;
    let dest = tempdir()?;
    write(&root.path().join("real_test.txt"), b"real");
    let fifo = root.path().join("pipe_test.txt");
    let c_path = CString::new(fifo.as_os_str().as_bytes())?;
    assert_eq!(unsafe { libc::mkfifo(c_path.as_ptr(), 0o644) }, 0);

    let summary = run_with_deadline(opts(root.path(), dest.path(), 1, 1), Arc::new(FsLister))?;

    assert_eq!(summary.matched, 1);
    assert_eq!(summary.failed, 0);
    assert_eq!(dir_names(dest.path()), BTreeSet::from(["real_test.txt".to_string()]));
    Ok(())
}

#[test]
fn test_failed_copy_does_not_stop_copier() -> Result<()> {
    let root = tempdir()?;
    let dest = tempdir()?;
    write(&root.path().join("real_test.txt"), b"real");
    // The lister reports a file that is not on disk, so its copy fails.
    let lister = MemLister::default().entries(
        root.path().canonicalize()?,
        vec![
            ListedEntry::file("ghost_test.txt"),
            ListedEntry::file("real_test.txt"),
        ],
    );

    let summary = run_with_deadline(opts(root.path(), dest.path(), 1, 1), Arc::new(lister))?;

    assert_eq!(summary.matched, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.copied_count(), 1);
    assert_eq!(fs::read(dest.path().join("real_test.txt"))?, b"real");
    assert_eq!(dir_names(dest.path()), BTreeSet::from(["real_test.txt".to_string()]));
    Ok(())
}

#[test]
fn test_extension_without_dot_matched_literally() -> Result<()> {
    let root = tempdir()?;
    let dest = tempdir()?;
    write(&root.path().join("mytesttxt"), b"no dot");
    write(&root.path().join("other.txt"), b"no pattern");

    let summary = run_search(&opts(root.path(), dest.path(), 1, 1), Arc::new(FsLister))?;

    assert_eq!(summary.matched, 1);
    assert_eq!(fs::read(dest.path().join("mytesttxt"))?, b"no dot");
    Ok(())
}
