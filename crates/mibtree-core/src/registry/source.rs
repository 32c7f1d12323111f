//! Where module text comes from.

use std::collections::BTreeMap;

use crate::error::LoadError;
use crate::lexer::module_names;

/// Text of a file holding one or more modules.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceText {
    /// Path or other origin, used in diagnostics.
    pub path: String,
    pub text: Vec<u8>,
}

/// Locates module text by module name.
pub trait ModuleSource {
    /// Text of the file defining `module`, or `None` if this source does
    /// not know the module.
    fn find(&mut self, module: &str) -> Result<Option<SourceText>, LoadError>;

    /// Every module name this source can supply.
    fn module_names(&mut self) -> Vec<String>;
}

/// In-memory source, keyed by the module names found in each text.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    files: Vec<SourceText>,
    index: BTreeMap<String, usize>,
}

impl MemorySource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file. Every module it defines becomes findable; a module
    /// already present keeps its first file.
    pub fn add(&mut self, path: impl Into<String>, text: impl Into<Vec<u8>>) {
        let text = text.into();
        let slot = self.files.len();
        for name in module_names(&text) {
            self.index.entry(name).or_insert(slot);
        }
        self.files.push(SourceText {
            path: path.into(),
            text,
        });
    }

    /// Builder form of [`add`](Self::add).
    #[must_use]
    pub fn with(mut self, path: impl Into<String>, text: impl Into<Vec<u8>>) -> Self {
        self.add(path, text);
        self
    }
}

impl ModuleSource for MemorySource {
    fn find(&mut self, module: &str) -> Result<Option<SourceText>, LoadError> {
        Ok(self
            .index
            .get(module)
            .and_then(|&slot| self.files.get(slot))
            .cloned())
    }

    fn module_names(&mut self) -> Vec<String> {
        self.index.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_source_indexes_every_module() {
        let mut source = MemorySource::new().with(
            "two.txt",
            "A-MIB DEFINITIONS ::= BEGIN END B-MIB DEFINITIONS ::= BEGIN END",
        );
        assert_eq!(source.module_names(), vec!["A-MIB", "B-MIB"]);
        let found = source.find("B-MIB").unwrap().unwrap();
        assert_eq!(found.path, "two.txt");
        assert!(source.find("C-MIB").unwrap().is_none());
    }
}
