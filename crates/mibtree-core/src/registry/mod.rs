//! Module registry and import linker.
//!
//! [`Mib`] owns every piece of compiler state: the OID tree, the module
//! table, the textual-convention table, the orphan pool and the settings.
//! Independent instances share nothing.
//!
//! # Loading
//!
//! [`Mib::read_module`] finds module text through the registry's
//! [`ModuleSource`], falling back to the built-in base modules and then to
//! the replacement rules for retired module names. Imports are read before
//! the module body is parsed, so textual conventions and parent nodes from
//! imported modules are known when the body is linked.
//!
//! ```text
//! NotLoaded ──read──> Loading ──parse+link──> Loaded | SyntaxError
//!     ^                                                 │
//!     └────────────────────unload───────────────────────┘
//! ```

mod base_modules;
mod compat;
mod linker;
mod source;

pub use base_modules::BaseModule;
pub use compat::{default_rules, CompatRule, CompatTag};
pub use source::{MemorySource, ModuleSource, SourceText};

use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, info_span, warn};

use crate::error::LoadError;
use crate::lexer::{Diagnostic, Severity, Span};
use crate::model::{
    Import, LoadState, ModuleId, ModuleTable, NodeId, Oid, Tree, TreeNode, ROOTS,
};
use crate::parser::{ModuleHeader, ParseContext, ParseNode, Parser};
use crate::settings::Settings;
use crate::tc::TcTable;

use linker::{check_references, unlink_module, Linker};

/// Origin recorded for modules loaded from the built-in texts.
pub const BUILTIN_PATH: &str = "<builtin>";

/// A parse node waiting for its parent.
#[derive(Clone, Debug, PartialEq)]
pub struct Orphan {
    pub module: String,
    pub label: String,
    pub parent: String,
    pub line: u32,
}

/// MIB compiler state: tree, modules, textual conventions and settings.
pub struct Mib {
    pub(crate) tree: Tree,
    pub(crate) modules: ModuleTable,
    pub(crate) tcs: TcTable,
    orphans: Vec<ParseNode>,
    aliases: BTreeMap<String, NodeId>,
    compat: Vec<CompatRule>,
    pub(crate) settings: Settings,
    source: Box<dyn ModuleSource>,
    anonymous: u32,
}

impl fmt::Debug for Mib {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mib")
            .field("nodes", &self.tree.len())
            .field("modules", &self.modules.len())
            .field("tcs", &self.tcs.len())
            .field("orphans", &self.orphans.len())
            .finish_non_exhaustive()
    }
}

impl Default for Mib {
    fn default() -> Self {
        Self::new()
    }
}

impl Mib {
    /// Registry with an empty in-memory source. Only the built-in base
    /// modules and texts passed to [`load_text`](Self::load_text) load.
    #[must_use]
    pub fn new() -> Self {
        Self::with_source(MemorySource::new())
    }

    #[must_use]
    pub fn with_source<S: ModuleSource + 'static>(source: S) -> Self {
        let mut mib = Self {
            tree: Tree::new(),
            modules: ModuleTable::new(),
            tcs: TcTable::new(),
            orphans: Vec::new(),
            aliases: BTreeMap::new(),
            compat: default_rules(),
            settings: Settings::default(),
            source: Box::new(source),
            anonymous: 0,
        };
        mib.init();
        mib
    }

    /// Builder form of [`set_settings`](Self::set_settings).
    #[must_use]
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Create the implicit roots. Safe to call repeatedly.
    pub fn init(&mut self) {
        self.tree.init_roots();
    }

    /// Drop every node, module and textual convention.
    ///
    /// The registry is usable again after [`init`](Self::init).
    pub fn shutdown(&mut self) {
        self.tree.clear();
        self.modules.clear();
        self.tcs.clear();
        self.orphans.clear();
        self.aliases.clear();
        self.anonymous = 0;
    }

    pub fn set_source<S: ModuleSource + 'static>(&mut self, source: S) {
        self.source = Box::new(source);
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    /// Register a replacement rule. Rules added later are consulted last.
    pub fn add_compat_rule(&mut self, rule: CompatRule) {
        self.compat.push(rule);
    }

    // === Loading ===

    /// Load a module and everything it imports.
    ///
    /// Loading a module that is already loaded does nothing. A module name
    /// that no source knows is looked up in the replacement rules.
    pub fn read_module(&mut self, name: &str) -> Result<ModuleId, LoadError> {
        let span = info_span!("read_module", module = name);
        let _enter = span.enter();

        if let Some(id) = self.read_direct(name)? {
            return Ok(id);
        }

        let rules: Vec<CompatRule> = self
            .compat
            .iter()
            .filter(|rule| rule.old == name)
            .cloned()
            .collect();
        if let Some(rule) = rules.iter().find(|rule| rule.tag.is_none()) {
            debug!(replacement = %rule.replacement, "using replacement module");
            return self.read_module(&rule.replacement);
        }

        // Tagged rules only: the old module was split, so load every part.
        let mut first = None;
        let mut seen: Vec<&str> = Vec::new();
        for rule in &rules {
            if seen.contains(&rule.replacement.as_str()) {
                continue;
            }
            seen.push(&rule.replacement);
            if let Ok(id) = self.read_module(&rule.replacement) {
                first.get_or_insert(id);
            }
        }
        first.ok_or_else(|| LoadError::ModuleNotFound {
            name: name.to_string(),
        })
    }

    /// Parse and link every module in `text`. Returns the first module.
    pub fn load_text(&mut self, path: &str, text: &[u8]) -> Result<ModuleId, LoadError> {
        let span = info_span!("load_text", path);
        let _enter = span.enter();

        let loaded = self.load_source(path, text);
        let Some(&first) = loaded.first() else {
            return Err(LoadError::Syntax {
                module: path.to_string(),
                errors: 1,
            });
        };
        self.check_state(first)
    }

    /// Load every module the source can supply. Failures are collected
    /// into one [`LoadError::Failed`].
    pub fn read_all_modules(&mut self) -> Result<(), LoadError> {
        let mut failed = Vec::new();
        for name in self.source.module_names() {
            if let Err(err) = self.read_module(&name) {
                debug!(module = %name, error = %err, "module failed to load");
                failed.push(name);
            }
        }
        for orphan in self.orphans() {
            warn!(
                module = %orphan.module,
                line = orphan.line,
                "unlinked object {}: parent {} not found",
                orphan.label,
                orphan.parent
            );
        }
        if failed.is_empty() {
            Ok(())
        } else {
            Err(LoadError::Failed { modules: failed })
        }
    }

    /// Remove a module's claims from the tree, pruning nodes no other module
    /// claims. The module returns to [`LoadState::NotLoaded`].
    pub fn unload_module(&mut self, name: &str) -> Result<(), LoadError> {
        let id = self
            .modules
            .id_of(name)
            .ok_or_else(|| LoadError::ModuleNotFound {
                name: name.to_string(),
            })?;

        let removed = unlink_module(&mut self.tree, id);
        self.tcs.remove_module(id);
        self.orphans.retain(|orphan| orphan.module != id);
        let tree = &self.tree;
        self.aliases.retain(|_, node| tree.get(*node).is_some());
        if let Some(module) = self.modules.get_mut(id) {
            module.state = LoadState::NotLoaded;
            module.imports.clear();
            module.diagnostics.clear();
        }
        debug!(module = name, removed, "module unloaded");
        Ok(())
    }

    /// Retry linking every orphan. Returns how many were attached.
    pub fn adopt_orphans(&mut self) -> usize {
        if self.orphans.is_empty() {
            return 0;
        }
        let before = self.orphans.len();
        let mut by_module: BTreeMap<ModuleId, Vec<ParseNode>> = BTreeMap::new();
        for orphan in std::mem::take(&mut self.orphans) {
            by_module.entry(orphan.module).or_default().push(orphan);
        }

        for (id, nodes) in by_module {
            let Some(module) = self.modules.get(id) else {
                continue;
            };
            let mut linker = Linker {
                tree: &mut self.tree,
                aliases: &mut self.aliases,
                module,
                replace_with_latest: self.settings.replace_with_latest,
                diagnostics: Vec::new(),
            };
            let left = linker.link(nodes);
            let diagnostics = linker.diagnostics;
            self.orphans.extend(left);
            for diag in &diagnostics {
                log_diagnostic(self.settings.mib_warnings, &module.name, module.file.as_deref(), diag);
            }
        }
        before - self.orphans.len()
    }

    /// Parse nodes still waiting for their parent.
    #[must_use]
    pub fn orphans(&self) -> Vec<Orphan> {
        self.orphans
            .iter()
            .map(|node| Orphan {
                module: self
                    .modules
                    .name(node.module)
                    .unwrap_or_default()
                    .to_string(),
                label: node.label.clone(),
                parent: node.parent.clone(),
                line: node.line,
            })
            .collect()
    }

    /// Load `name` from the source or the built-in texts, without
    /// replacement rules. `Ok(None)` when no text was found.
    fn read_direct(&mut self, name: &str) -> Result<Option<ModuleId>, LoadError> {
        if let Some(id) = self.modules.id_of(name) {
            match self.modules.get(id).map(|m| m.state) {
                Some(LoadState::Loaded | LoadState::Loading) => return Ok(Some(id)),
                Some(LoadState::SyntaxError) => return self.check_state(id).map(Some),
                _ => {}
            }
        }

        if let Some(found) = self.source.find(name)? {
            self.load_source(&found.path, &found.text);
        } else if let Some(base) = BaseModule::from_name(name) {
            self.load_source(BUILTIN_PATH, base.text().as_bytes());
        } else {
            return Ok(None);
        }

        match self.modules.id_of(name) {
            Some(id) if self.module_state(name) != Some(LoadState::NotLoaded) => {
                self.check_state(id).map(Some)
            }
            // The file did not define the module it was indexed under.
            _ => Ok(None),
        }
    }

    fn check_state(&self, id: ModuleId) -> Result<ModuleId, LoadError> {
        match self.modules.get(id) {
            Some(module) if module.state == LoadState::SyntaxError => Err(LoadError::Syntax {
                module: module.name.clone(),
                errors: module.error_count(),
            }),
            _ => Ok(id),
        }
    }

    /// Parse and link every module of one file. Returns the module ids in
    /// file order.
    fn load_source(&mut self, path: &str, text: &[u8]) -> Vec<ModuleId> {
        let mut parser = Parser::new(text, self.settings.comment_mode);
        let mut loaded = Vec::new();

        while let Some(header) = parser.next_header() {
            let header = match header {
                Ok(header) => header,
                Err(diag) => {
                    log_diagnostic(self.settings.mib_warnings, "", Some(path), &diag);
                    continue;
                }
            };
            let id = self.modules.intern(&header.name);
            loaded.push(id);

            if self.module_state(&header.name) != Some(LoadState::NotLoaded) {
                // Already known: consume the body without linking it.
                let mut scratch = 0;
                let mut ctx = ParseContext {
                    module: id,
                    imports: &[],
                    tcs: &self.tcs,
                    save_descriptions: false,
                    anonymous: &mut scratch,
                };
                parser.parse_body(&mut ctx);
                continue;
            }

            if let Some(module) = self.modules.get_mut(id) {
                module.state = LoadState::Loading;
                module.file = Some(path.to_string());
            }
            let (imports, mut diagnostics) = self.resolve_imports(&header);

            let mut ctx = ParseContext {
                module: id,
                imports: &imports,
                tcs: &self.tcs,
                save_descriptions: self.settings.save_descriptions,
                anonymous: &mut self.anonymous,
            };
            let parsed = parser.parse_body(&mut ctx);
            diagnostics.extend(parsed.diagnostics);
            for tc in parsed.tcs {
                self.tcs.insert(tc);
            }

            if let Some(module) = self.modules.get_mut(id) {
                module.imports = imports;
            }
            let Some(module) = self.modules.get(id) else {
                continue;
            };

            let mut linker = Linker {
                tree: &mut self.tree,
                aliases: &mut self.aliases,
                module,
                replace_with_latest: self.settings.replace_with_latest,
                diagnostics: Vec::new(),
            };
            let left = linker.link(parsed.nodes);
            diagnostics.append(&mut linker.diagnostics);
            self.orphans.extend(left);
            diagnostics.extend(check_references(
                &self.tree,
                module,
                &self.modules,
                &parsed.references,
            ));

            for diag in &diagnostics {
                log_diagnostic(self.settings.mib_warnings, &header.name, Some(path), diag);
            }
            let errors = diagnostics.iter().filter(|d| d.is_error()).count();
            if let Some(module) = self.modules.get_mut(id) {
                module.state = if errors > 0 {
                    LoadState::SyntaxError
                } else {
                    LoadState::Loaded
                };
                module.diagnostics = diagnostics;
            }

            let adopted = self.adopt_orphans();
            if adopted > 0 {
                debug!(module = %header.name, adopted, "adopted orphans");
            }
        }
        loaded
    }

    /// Load imported modules and map each imported symbol to its source.
    fn resolve_imports(&mut self, header: &ModuleHeader) -> (Vec<Import>, Vec<Diagnostic>) {
        let mut imports = Vec::new();
        let mut diagnostics = Vec::new();

        for clause in &header.imports {
            let direct = match self.read_direct(&clause.from) {
                Ok(found) => found,
                Err(LoadError::Syntax { module, .. }) => self.modules.id_of(&module),
                Err(err) => {
                    diagnostics.push(Diagnostic::warning(
                        Span::default(),
                        clause.line,
                        err.to_string(),
                    ));
                    None
                }
            };

            for symbol in &clause.symbols {
                let module = match direct {
                    Some(id) => Some(id),
                    None => self.replacement_for(&clause.from, symbol),
                };
                if module.is_none() {
                    diagnostics.push(Diagnostic::warning(
                        Span::default(),
                        clause.line,
                        format!("cannot find module ({}) for {symbol}", clause.from),
                    ));
                }
                imports.push(Import {
                    label: symbol.clone(),
                    module,
                });
            }
        }

        for (label, _) in ROOTS {
            if !imports.iter().any(|import| import.label == label) {
                imports.push(Import {
                    label: label.to_string(),
                    module: None,
                });
            }
        }
        (imports, diagnostics)
    }

    /// Module that replaces `old` for one imported symbol.
    fn replacement_for(&mut self, old: &str, symbol: &str) -> Option<ModuleId> {
        let replacement = self
            .compat
            .iter()
            .find(|rule| rule.applies(old, symbol))
            .map(|rule| rule.replacement.clone())?;
        match self.read_module(&replacement) {
            Ok(id) => Some(id),
            Err(LoadError::Syntax { module, .. }) => self.modules.id_of(&module),
            Err(_) => None,
        }
    }

    // === Lookups ===

    #[must_use]
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    #[must_use]
    pub fn modules(&self) -> &ModuleTable {
        &self.modules
    }

    #[must_use]
    pub fn tcs(&self) -> &TcTable {
        &self.tcs
    }

    #[must_use]
    pub fn module_state(&self, name: &str) -> Option<LoadState> {
        self.modules.by_name(name).map(|m| m.state)
    }

    /// Diagnostics recorded by the last load of `name`.
    #[must_use]
    pub fn module_diagnostics(&self, name: &str) -> &[Diagnostic] {
        self.modules
            .by_name(name)
            .map_or(&[], |m| m.diagnostics.as_slice())
    }

    /// First node labelled `label`.
    #[must_use]
    pub fn find_node(&self, label: &str) -> Option<NodeId> {
        self.tree.find(label)
    }

    /// Node labelled `label` that `module` defines.
    #[must_use]
    pub fn find_node_in_module(&self, label: &str, module: &str) -> Option<NodeId> {
        let id = self.modules.id_of(module)?;
        self.tree.find_in_module(label, id)
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&TreeNode> {
        self.tree.get(id)
    }

    #[must_use]
    pub fn node_oid(&self, id: NodeId) -> Oid {
        self.tree.oid_of(id)
    }

    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.tree.get(id).and_then(|n| n.parent)
    }

    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.tree.children(Some(id))
    }

    /// Name of the module that first defined a node.
    #[must_use]
    pub fn node_module(&self, id: NodeId) -> Option<&str> {
        self.tree
            .get(id)
            .and_then(|n| n.module)
            .and_then(|m| self.modules.name(m))
    }
}

fn log_diagnostic(level: u8, module: &str, file: Option<&str>, diag: &Diagnostic) {
    let file = file.unwrap_or_default();
    match diag.severity {
        Severity::Error => warn!(
            target: "mibtree::load",
            module,
            file,
            line = diag.line,
            "{}",
            diag.message
        ),
        Severity::Warning if level >= 1 => warn!(
            target: "mibtree::load",
            module,
            file,
            line = diag.line,
            "{}",
            diag.message
        ),
        Severity::Note if level >= 2 => debug!(
            target: "mibtree::load",
            module,
            file,
            line = diag.line,
            "{}",
            diag.message
        ),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeKind;

    const ACME: &str = r#"
ACME-MIB DEFINITIONS ::= BEGIN
IMPORTS
    OBJECT-TYPE, enterprises FROM SNMPv2-SMI
    DisplayString FROM SNMPv2-TC;

acme OBJECT IDENTIFIER ::= { enterprises 9999 }

acmeName OBJECT-TYPE
    SYNTAX DisplayString
    MAX-ACCESS read-only
    STATUS current
    DESCRIPTION "Name."
    ::= { acme 1 }
END
"#;

    #[test]
    fn test_builtin_modules_load() {
        let mut mib = Mib::new();
        for base in BaseModule::ALL {
            mib.read_module(base.name()).unwrap();
            assert_eq!(mib.module_state(base.name()), Some(LoadState::Loaded));
        }
        let enterprises = mib.find_node("enterprises").unwrap();
        assert_eq!(mib.node_oid(enterprises).arcs(), &[1, 3, 6, 1, 4, 1]);
        // Both SMI modules define it; it is one node.
        let node = mib.node(enterprises).unwrap();
        assert_eq!(node.modules.len(), 2);
        assert!(mib.tcs().get_any("DateAndTime").is_some());
    }

    #[test]
    fn test_load_text_links_imports() {
        let mut mib = Mib::new();
        let id = mib.load_text("acme.mib", ACME.as_bytes()).unwrap();
        assert_eq!(mib.modules().name(id), Some("ACME-MIB"));
        assert_eq!(mib.module_state("SNMPv2-SMI"), Some(LoadState::Loaded));

        let name = mib.find_node("acmeName").unwrap();
        assert_eq!(mib.node_oid(name).arcs(), &[1, 3, 6, 1, 4, 1, 9999, 1]);
        let node = mib.node(name).unwrap();
        assert_eq!(node.info.hint.as_deref(), Some("255a"));
        assert_eq!(node.info.kind, NodeKind::Scalar);
        assert_eq!(mib.node_module(name), Some("ACME-MIB"));
    }

    #[test]
    fn test_missing_module() {
        let mut mib = Mib::new();
        assert_eq!(
            mib.read_module("NO-SUCH-MIB"),
            Err(LoadError::ModuleNotFound {
                name: "NO-SUCH-MIB".into()
            })
        );
    }

    #[test]
    fn test_replacement_rule() {
        let mut mib = Mib::new();
        let id = mib.read_module("RFC1065-SMI").unwrap();
        assert_eq!(mib.modules().name(id), Some("RFC1155-SMI"));
    }

    #[test]
    fn test_source_module_and_read_all() {
        let source = MemorySource::new().with("acme.mib", ACME);
        let mut mib = Mib::with_source(source);
        mib.read_all_modules().unwrap();
        assert!(mib.find_node_in_module("acmeName", "ACME-MIB").is_some());
        assert!(mib.find_node_in_module("acmeName", "SNMPv2-SMI").is_none());
    }

    #[test]
    fn test_syntax_error_reported() {
        let text = "BAD-MIB DEFINITIONS ::= BEGIN\n x OBJECT-TYPE SYNTAX ::= { iso 9 }\nEND\n";
        let mut mib = Mib::new();
        let err = mib.load_text("bad.mib", text.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::Syntax { ref module, .. } if module == "BAD-MIB"));
        assert_eq!(mib.module_state("BAD-MIB"), Some(LoadState::SyntaxError));
        assert!(!mib.module_diagnostics("BAD-MIB").is_empty());
    }

    #[test]
    fn test_shutdown_then_init() {
        let mut mib = Mib::new();
        mib.read_module("SNMPv2-SMI").unwrap();
        mib.shutdown();
        assert!(mib.tree().is_empty());
        mib.init();
        assert_eq!(mib.tree().len(), 3);
        assert_eq!(mib.module_state("SNMPv2-SMI"), None);
    }
}
