//! Module records and the module table.

use std::collections::BTreeMap;

use super::ids::ModuleId;
use crate::lexer::Diagnostic;

/// Load state of a module.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LoadState {
    #[default]
    NotLoaded,
    /// Imports are being read. Seeing this state again means an import cycle.
    Loading,
    Loaded,
    SyntaxError,
}

/// One imported symbol and the module it resolved to.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Import {
    pub label: String,
    /// `None` if the source module could not be loaded.
    pub module: Option<ModuleId>,
}

/// A known MIB module.
#[derive(Clone, Debug)]
pub struct Module {
    pub id: ModuleId,
    pub name: String,
    /// Where the text came from, if it has been read.
    pub file: Option<String>,
    pub imports: Vec<Import>,
    pub state: LoadState,
    /// Diagnostics from the last load.
    pub diagnostics: Vec<Diagnostic>,
}

impl Module {
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    /// Module an imported label comes from.
    #[must_use]
    pub fn import_source(&self, label: &str) -> Option<ModuleId> {
        self.imports
            .iter()
            .find(|import| import.label == label)
            .and_then(|import| import.module)
    }
}

/// Id-indexed module table with a name index.
#[derive(Clone, Debug, Default)]
pub struct ModuleTable {
    modules: Vec<Module>,
    by_name: BTreeMap<String, ModuleId>,
}

impl ModuleTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Id of `name`, registering a not-yet-loaded record if needed.
    pub fn intern(&mut self, name: &str) -> ModuleId {
        if let Some(&id) = self.by_name.get(name) {
            return id;
        }
        let id = ModuleId::from_index(self.modules.len())
            .unwrap_or_else(|| unreachable!("module table exceeds u32 range"));
        self.modules.push(Module {
            id,
            name: name.to_string(),
            file: None,
            imports: Vec::new(),
            state: LoadState::NotLoaded,
            diagnostics: Vec::new(),
        });
        self.by_name.insert(name.to_string(), id);
        id
    }

    #[must_use]
    pub fn id_of(&self, name: &str) -> Option<ModuleId> {
        self.by_name.get(name).copied()
    }

    #[must_use]
    pub fn get(&self, id: ModuleId) -> Option<&Module> {
        self.modules.get(id.to_index())
    }

    pub fn get_mut(&mut self, id: ModuleId) -> Option<&mut Module> {
        self.modules.get_mut(id.to_index())
    }

    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&Module> {
        self.id_of(name).and_then(|id| self.get(id))
    }

    #[must_use]
    pub fn name(&self, id: ModuleId) -> Option<&str> {
        self.get(id).map(|m| m.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Module> {
        self.modules.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn clear(&mut self) {
        self.modules.clear();
        self.by_name.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_is_stable() {
        let mut table = ModuleTable::new();
        let a = table.intern("IF-MIB");
        let b = table.intern("IP-MIB");
        assert_ne!(a, b);
        assert_eq!(table.intern("IF-MIB"), a);
        assert_eq!(table.len(), 2);
        assert_eq!(table.name(b), Some("IP-MIB"));
        assert_eq!(table.get(a).unwrap().state, LoadState::NotLoaded);
    }

    #[test]
    fn test_import_source() {
        let mut table = ModuleTable::new();
        let smi = table.intern("SNMPv2-SMI");
        let id = table.intern("ACME-MIB");
        let module = table.get_mut(id).unwrap();
        module.imports.push(Import {
            label: "enterprises".into(),
            module: Some(smi),
        });
        assert_eq!(module.import_source("enterprises"), Some(smi));
        assert_eq!(module.import_source("mib-2"), None);
    }
}
