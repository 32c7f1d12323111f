//! Loading modules from MIB directories.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use mibtree_core::{LoadError, Mib, ModuleId, ModuleSource, Settings, SourceText};
use tracing::{debug, info_span, warn};

use crate::index_cache::IndexCache;
use crate::search_path::{ModuleList, SearchPath};

/// Module source backed by a list of directories.
///
/// Directories are indexed on first use. A module defined in several
/// directories comes from the earliest one on the path.
#[derive(Debug)]
pub struct DirectorySource {
    dirs: Vec<PathBuf>,
    cache: IndexCache,
    index: Option<BTreeMap<String, PathBuf>>,
}

impl DirectorySource {
    #[must_use]
    pub fn new(dirs: Vec<PathBuf>, cache: IndexCache) -> Self {
        Self {
            dirs,
            cache,
            index: None,
        }
    }

    #[must_use]
    pub fn from_search_path(path: &SearchPath, cache: IndexCache) -> Self {
        Self::new(path.dirs().to_vec(), cache)
    }

    /// Forget the directory indexes; the next lookup rescans.
    pub fn rescan(&mut self) {
        self.index = None;
    }

    fn index(&mut self) -> &BTreeMap<String, PathBuf> {
        let Self { dirs, cache, index } = self;
        index.get_or_insert_with(|| {
            let mut merged = BTreeMap::new();
            for dir in dirs.iter() {
                match cache.load(dir) {
                    Ok(found) => {
                        debug!(dir = %dir.display(), modules = found.entries.len(), "indexed directory");
                        for module in found.entries.keys() {
                            if let Some(path) = found.path_of(module) {
                                merged.entry(module.clone()).or_insert(path);
                            }
                        }
                    }
                    Err(err) => debug!(dir = %dir.display(), error = %err, "skipping directory"),
                }
            }
            merged
        })
    }
}

impl ModuleSource for DirectorySource {
    fn find(&mut self, module: &str) -> Result<Option<SourceText>, LoadError> {
        let Some(path) = self.index().get(module).cloned() else {
            return Ok(None);
        };
        let text = fs::read(&path).map_err(|err| LoadError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        Ok(Some(SourceText {
            path: path.display().to_string(),
            text,
        }))
    }

    fn module_names(&mut self) -> Vec<String> {
        self.index().keys().cloned().collect()
    }
}

/// Registry reading from `path`, with index files kept under
/// `persistent_dir`. Nothing is loaded yet.
#[must_use]
pub fn open(path: &SearchPath, persistent_dir: Option<&Path>, settings: Settings) -> Mib {
    let source = DirectorySource::from_search_path(path, IndexCache::new(persistent_dir));
    Mib::with_source(source).with_settings(settings)
}

/// Load the modules `path` names. Every failure is collected into one
/// [`LoadError::Failed`].
pub fn load_configured(mib: &mut Mib, path: &SearchPath) -> Result<(), LoadError> {
    let span = info_span!("load_configured");
    let _enter = span.enter();

    let names = match path.modules() {
        ModuleList::All => return mib.read_all_modules(),
        ModuleList::Named(names) => names,
    };
    let mut failed = Vec::new();
    for name in names {
        if let Err(err) = mib.read_module(name) {
            warn!(module = %name, error = %err, "cannot load module");
            failed.push(name.clone());
        }
    }
    if failed.is_empty() {
        Ok(())
    } else {
        Err(LoadError::Failed { modules: failed })
    }
}

/// Parse and link the modules in one file.
pub fn load_file(mib: &mut Mib, path: &Path) -> Result<ModuleId, LoadError> {
    let text = fs::read(path).map_err(|err| LoadError::Io {
        path: path.display().to_string(),
        message: err.to_string(),
    })?;
    mib.load_text(&path.display().to_string(), &text)
}
