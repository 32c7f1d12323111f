//! MIB directory search path and the list of modules to load.
//!
//! Both lists are built from layers of increasing priority: a built-in
//! default, the `mibdirs` / `mibs` configuration directives, and the
//! `MIBDIRS` / `MIBS` environment variables. A layer starting with `+`
//! appends to the list built so far, one starting with `-` prepends to
//! it, and anything else replaces it.

use std::env;
use std::path::PathBuf;

/// Separator between list entries.
#[cfg(windows)]
pub const LIST_SEPARATOR: char = ';';
#[cfg(not(windows))]
pub const LIST_SEPARATOR: char = ':';

/// Directories searched when nothing else is configured.
pub const DEFAULT_MIBDIRS: &str = "$HOME/.snmp/mibs:/usr/share/snmp/mibs:/usr/share/mibs";

/// Modules loaded when nothing else is configured.
pub const DEFAULT_MIBS: &str = "SNMPv2-MIB:IF-MIB:IP-MIB:TCP-MIB:UDP-MIB";

/// Value of the module list meaning every module on the search path.
pub const ALL_MODULES: &str = "ALL";

/// Configuration-file directives feeding the search path.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchConfig {
    /// `mibdirs` directive.
    pub mibdirs: Option<String>,
    /// `mibs` directive.
    pub mibs: Option<String>,
}

/// Modules to load at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModuleList {
    /// Every module found on the search path.
    All,
    Named(Vec<String>),
}

/// Resolved directory list and module list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchPath {
    dirs: Vec<PathBuf>,
    modules: ModuleList,
}

impl SearchPath {
    /// Build from explicit layers. `home` replaces `$HOME` in directory
    /// entries; entries that need it are dropped when it is `None`.
    #[must_use]
    pub fn build(
        config: &SearchConfig,
        env_mibdirs: Option<&str>,
        env_mibs: Option<&str>,
        home: Option<&str>,
    ) -> Self {
        let mut path = Self {
            dirs: Vec::new(),
            modules: ModuleList::Named(Vec::new()),
        };
        path.apply_dirs(DEFAULT_MIBDIRS, home);
        path.apply_modules(DEFAULT_MIBS);
        for layer in [config.mibdirs.as_deref(), env_mibdirs].into_iter().flatten() {
            path.apply_dirs(layer, home);
        }
        for layer in [config.mibs.as_deref(), env_mibs].into_iter().flatten() {
            path.apply_modules(layer);
        }
        path
    }

    /// Layer a directory list over the current one.
    pub fn apply_dirs(&mut self, layer: &str, home: Option<&str>) {
        let mut dirs: Vec<String> = self
            .dirs
            .iter()
            .map(|dir| dir.to_string_lossy().into_owned())
            .collect();
        apply_layer(&mut dirs, layer);
        self.dirs = dirs
            .iter()
            .filter_map(|dir| expand_home(dir, home))
            .map(PathBuf::from)
            .collect();
    }

    /// Layer a module list over the current one. Once `ALL` is named,
    /// further layers change nothing.
    pub fn apply_modules(&mut self, layer: &str) {
        let ModuleList::Named(modules) = &mut self.modules else {
            return;
        };
        apply_layer(modules, layer);
        if modules.iter().any(|m| m == ALL_MODULES) {
            self.modules = ModuleList::All;
        }
    }

    /// Build from `config` and the process environment.
    #[must_use]
    pub fn from_env(config: &SearchConfig) -> Self {
        let mibdirs = env::var("MIBDIRS").ok();
        let mibs = env::var("MIBS").ok();
        let home = env::var("HOME").ok();
        Self::build(config, mibdirs.as_deref(), mibs.as_deref(), home.as_deref())
    }

    /// Fixed directories and modules, bypassing every layer.
    #[must_use]
    pub fn with_dirs(dirs: Vec<PathBuf>, modules: ModuleList) -> Self {
        Self { dirs, modules }
    }

    #[must_use]
    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    #[must_use]
    pub fn modules(&self) -> &ModuleList {
        &self.modules
    }
}

fn split(value: &str) -> Vec<String> {
    value
        .split(LIST_SEPARATOR)
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

fn apply_layer(current: &mut Vec<String>, layer: &str) {
    if let Some(rest) = layer.strip_prefix('+') {
        current.extend(split(rest));
    } else if let Some(rest) = layer.strip_prefix('-') {
        let mut front = split(rest);
        front.append(current);
        *current = front;
    } else {
        *current = split(layer);
    }
}

fn expand_home(entry: &str, home: Option<&str>) -> Option<String> {
    if entry.contains("$HOME") {
        home.map(|home| entry.replace("$HOME", home))
    } else {
        Some(entry.to_string())
    }
}
