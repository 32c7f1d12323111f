//! Per-directory module index cache.
//!
//! Scanning a MIB directory means reading every file to learn which
//! modules it defines. The result is kept in `<dir>/mib_indexes/<n>`:
//!
//! ```text
//! DIR /usr/share/snmp/mibs
//! IF-MIB IF-MIB.txt
//! SNMPv2-MIB SNMPv2-MIB.txt
//! ```
//!
//! A cache file is used only while it is newer than the directory it
//! describes; otherwise the directory is rescanned and the file rewritten.
//! Cache write failures are logged and otherwise ignored.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use mibtree_core::lexer::module_names;
use tracing::{debug, warn};

/// Name of the cache subdirectory under the persistent directory.
pub const INDEX_DIR: &str = "mib_indexes";

/// Upper bound on cache file numbers tried for one directory.
const MAX_SLOTS: usize = 1000;

/// Modules defined by the files of one directory.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DirIndex {
    pub dir: PathBuf,
    /// Module name to file name within `dir`.
    pub entries: BTreeMap<String, String>,
}

impl DirIndex {
    /// Full path of the file defining `module`.
    #[must_use]
    pub fn path_of(&self, module: &str) -> Option<PathBuf> {
        self.entries.get(module).map(|file| self.dir.join(file))
    }

    /// Read every regular file of `dir`. Hidden files and editor backups
    /// are skipped; the first file defining a module wins.
    pub fn scan(dir: &Path) -> io::Result<Self> {
        let mut files: Vec<(String, PathBuf)> = fs::read_dir(dir)?
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_ok_and(|t| t.is_file()))
            .filter_map(|entry| {
                let name = entry.file_name().to_str()?.to_string();
                (!name.starts_with('.') && !name.ends_with('~')).then(|| (name, entry.path()))
            })
            .collect();
        files.sort();

        let mut entries = BTreeMap::new();
        for (name, path) in files {
            let text = match fs::read(&path) {
                Ok(text) => text,
                Err(err) => {
                    debug!(file = %path.display(), error = %err, "skipping unreadable file");
                    continue;
                }
            };
            for module in module_names(&text) {
                entries.entry(module).or_insert_with(|| name.clone());
            }
        }
        Ok(Self {
            dir: dir.to_path_buf(),
            entries,
        })
    }

    fn render(&self) -> String {
        let mut out = format!("DIR {}\n", self.dir.display());
        for (module, file) in &self.entries {
            out.push_str(module);
            out.push(' ');
            out.push_str(file);
            out.push('\n');
        }
        out
    }

    fn parse(text: &str) -> Option<Self> {
        let mut lines = text.lines();
        let dir = lines.next()?.strip_prefix("DIR ")?;
        let entries = lines
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                let (module, file) = line.split_once(' ')?;
                Some((module.to_string(), file.to_string()))
            })
            .collect::<Option<BTreeMap<_, _>>>()?;
        Some(Self {
            dir: PathBuf::from(dir),
            entries,
        })
    }
}

/// Cache of [`DirIndex`] files under a persistent directory.
#[derive(Clone, Debug, Default)]
pub struct IndexCache {
    root: Option<PathBuf>,
}

impl IndexCache {
    /// Cache files go to `<persistent_dir>/mib_indexes`. With `None`
    /// every directory is scanned on each use.
    #[must_use]
    pub fn new(persistent_dir: Option<&Path>) -> Self {
        Self {
            root: persistent_dir.map(|dir| dir.join(INDEX_DIR)),
        }
    }

    /// Index of `dir`, from the cache when it is fresh.
    pub fn load(&self, dir: &Path) -> io::Result<DirIndex> {
        let Some(root) = &self.root else {
            return DirIndex::scan(dir);
        };

        let (slot, cached) = find_slot(root, dir);
        if let Some((index, written)) = cached {
            if modified(dir).is_ok_and(|changed| changed <= written) {
                debug!(dir = %dir.display(), "using cached module index");
                return Ok(index);
            }
        }

        let index = DirIndex::scan(dir)?;
        if let Some(slot) = slot {
            if let Err(err) = fs::create_dir_all(root).and_then(|()| fs::write(&slot, index.render())) {
                warn!(file = %slot.display(), error = %err, "cannot write module index");
            }
        }
        Ok(index)
    }
}

/// Cache file for `dir`: the first numbered file whose `DIR` line names
/// it, else the first unused number. Returns the parsed contents and
/// write time of an existing file.
fn find_slot(root: &Path, dir: &Path) -> (Option<PathBuf>, Option<(DirIndex, SystemTime)>) {
    for n in 0..MAX_SLOTS {
        let slot = root.join(n.to_string());
        let Ok(text) = fs::read_to_string(&slot) else {
            return (Some(slot), None);
        };
        match DirIndex::parse(&text) {
            Some(index) if index.dir == dir => {
                let cached = modified(&slot).ok().map(|written| (index, written));
                return (Some(slot), cached);
            }
            _ => continue,
        }
    }
    (None, None)
}

fn modified(path: &Path) -> io::Result<SystemTime> {
    fs::metadata(path)?.modified()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module(name: &str) -> String {
        format!("{name} DEFINITIONS ::= BEGIN\nEND\n")
    }

    #[test]
    fn test_scan_skips_hidden_and_backups() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("A.txt"), module("A-MIB")).unwrap();
        fs::write(dir.path().join(".hidden"), module("HIDDEN-MIB")).unwrap();
        fs::write(dir.path().join("A.txt~"), module("BACKUP-MIB")).unwrap();
        fs::write(
            dir.path().join("pair.my"),
            format!("{}{}", module("B-MIB"), module("C-MIB")),
        )
        .unwrap();

        let index = DirIndex::scan(dir.path()).unwrap();
        let names: Vec<_> = index.entries.keys().map(String::as_str).collect();
        assert_eq!(names, ["A-MIB", "B-MIB", "C-MIB"]);
        assert_eq!(index.path_of("C-MIB"), Some(dir.path().join("pair.my")));
    }

    #[test]
    fn test_cache_written_and_reused() {
        let mibs = tempfile::tempdir().unwrap();
        let store = tempfile::tempdir().unwrap();
        fs::write(mibs.path().join("A.txt"), module("A-MIB")).unwrap();

        let cache = IndexCache::new(Some(store.path()));
        let first = cache.load(mibs.path()).unwrap();
        let written = fs::read_to_string(store.path().join(INDEX_DIR).join("0")).unwrap();
        assert_eq!(
            written,
            format!("DIR {}\nA-MIB A.txt\n", mibs.path().display())
        );

        let second = cache.load(mibs.path()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_second_directory_gets_next_slot() {
        let one = tempfile::tempdir().unwrap();
        let two = tempfile::tempdir().unwrap();
        let store = tempfile::tempdir().unwrap();
        fs::write(two.path().join("B.txt"), module("B-MIB")).unwrap();

        let cache = IndexCache::new(Some(store.path()));
        cache.load(one.path()).unwrap();
        let index = cache.load(two.path()).unwrap();
        assert!(index.entries.contains_key("B-MIB"));
        let slot = fs::read_to_string(store.path().join(INDEX_DIR).join("1")).unwrap();
        assert!(slot.starts_with(&format!("DIR {}", two.path().display())));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(DirIndex::parse("not an index").is_none());
        assert!(DirIndex::parse("DIR /x\nbroken-line\n").is_none());
    }
}
