//! Textual-convention table.
//!
//! Maps `(descriptor, module)` to the base type and presentation metadata
//! of a TEXTUAL-CONVENTION or SMIv1 type assignment.

use std::collections::BTreeMap;

use crate::model::{AsnType, EnumItem, ModuleId, RangeItem};

/// One textual convention.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TcEntry {
    pub name: String,
    pub module: ModuleId,
    pub base: AsnType,
    pub hint: Option<String>,
    pub enums: Vec<EnumItem>,
    pub ranges: Vec<RangeItem>,
    pub description: Option<String>,
}

/// All textual conventions known to a registry.
#[derive(Clone, Debug, Default)]
pub struct TcTable {
    entries: Vec<TcEntry>,
    by_name: BTreeMap<String, Vec<usize>>,
}

impl TcTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry, replacing any previous `(name, module)` entry.
    pub fn insert(&mut self, entry: TcEntry) {
        if let Some(slot) = self
            .by_name
            .get(&entry.name)
            .and_then(|idxs| idxs.iter().find(|&&i| self.entries[i].module == entry.module))
            .copied()
        {
            self.entries[slot] = entry;
            return;
        }
        self.by_name
            .entry(entry.name.clone())
            .or_default()
            .push(self.entries.len());
        self.entries.push(entry);
    }

    /// Entry defined by `module`.
    #[must_use]
    pub fn get(&self, name: &str, module: ModuleId) -> Option<&TcEntry> {
        self.by_name
            .get(name)?
            .iter()
            .map(|&i| &self.entries[i])
            .find(|e| e.module == module)
    }

    /// First entry with `name` from any module.
    #[must_use]
    pub fn get_any(&self, name: &str) -> Option<&TcEntry> {
        self.by_name
            .get(name)
            .and_then(|idxs| idxs.first())
            .map(|&i| &self.entries[i])
    }

    /// Drop every entry owned by `module`.
    pub fn remove_module(&mut self, module: ModuleId) {
        self.entries.retain(|e| e.module != module);
        self.by_name.clear();
        for (i, entry) in self.entries.iter().enumerate() {
            self.by_name.entry(entry.name.clone()).or_default().push(i);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &TcEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.by_name.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module(raw: u32) -> ModuleId {
        ModuleId::from_raw(raw).unwrap()
    }

    fn entry(name: &str, module_id: ModuleId, hint: &str) -> TcEntry {
        TcEntry {
            name: name.into(),
            module: module_id,
            base: AsnType::OctetString,
            hint: Some(hint.into()),
            enums: Vec::new(),
            ranges: Vec::new(),
            description: None,
        }
    }

    #[test]
    fn test_lookup_by_module_and_any() {
        let mut table = TcTable::new();
        table.insert(entry("DisplayString", module(1), "255a"));
        table.insert(entry("DisplayString", module(2), "255t"));

        assert_eq!(
            table.get("DisplayString", module(2)).unwrap().hint.as_deref(),
            Some("255t")
        );
        assert_eq!(
            table.get_any("DisplayString").unwrap().module,
            module(1)
        );
        assert!(table.get("DisplayString", module(3)).is_none());
    }

    #[test]
    fn test_insert_replaces_same_module() {
        let mut table = TcTable::new();
        table.insert(entry("MacAddress", module(1), "1x:"));
        table.insert(entry("MacAddress", module(1), "1x-"));
        assert_eq!(table.len(), 1);
        assert_eq!(
            table.get_any("MacAddress").unwrap().hint.as_deref(),
            Some("1x-")
        );
    }

    #[test]
    fn test_remove_module() {
        let mut table = TcTable::new();
        table.insert(entry("A", module(1), "1d"));
        table.insert(entry("B", module(2), "1d"));
        table.insert(entry("C", module(1), "1d"));
        table.remove_module(module(1));
        assert_eq!(table.len(), 1);
        assert!(table.get_any("A").is_none());
        assert_eq!(table.get_any("B").unwrap().module, module(2));
    }
}
