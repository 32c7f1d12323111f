//! Parser output: transient parse nodes and per-module side tables.

use crate::lexer::Diagnostic;
use crate::model::{Import, ModuleId, NodeInfo};
use crate::tc::{TcEntry, TcTable};

/// One OID-defining statement, before linking.
#[derive(Clone, Debug, PartialEq)]
pub struct ParseNode {
    pub label: String,
    /// `None` when the statement had no usable sub-identifier.
    pub subid: Option<u32>,
    pub module: ModuleId,
    /// Label of the parent, resolved by the linker.
    pub parent: String,
    pub info: NodeInfo,
    pub line: u32,
}

/// `sym, sym FROM Module` inside IMPORTS.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportClause {
    pub symbols: Vec<String>,
    pub from: String,
    pub line: u32,
}

/// Module name and imports, parsed before the body so the imports can be
/// loaded first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModuleHeader {
    pub name: String,
    pub imports: Vec<ImportClause>,
    pub line: u32,
}

/// Where a group or object reference was written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReferenceSite {
    /// OBJECTS / NOTIFICATIONS of a group.
    Group,
    /// MANDATORY-GROUPS, GROUP or OBJECT of a MODULE-COMPLIANCE.
    Compliance,
    /// INCLUDES or VARIATION of an AGENT-CAPABILITIES.
    Capabilities,
}

/// A name that must exist once the module is linked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectReference {
    pub name: String,
    /// Module named by a MODULE or SUPPORTS clause.
    pub module: Option<String>,
    pub site: ReferenceSite,
    pub line: u32,
}

/// Everything the parser produced for one module body.
#[derive(Clone, Debug, Default)]
pub struct ParsedModule {
    pub nodes: Vec<ParseNode>,
    pub tcs: Vec<TcEntry>,
    pub references: Vec<ObjectReference>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ParsedModule {
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    /// Whether the module itself defines `label`.
    #[must_use]
    pub fn defines(&self, label: &str) -> bool {
        self.nodes.iter().any(|n| n.label == label)
    }
}

/// Registry state the parser reads while parsing a body.
pub struct ParseContext<'a> {
    pub module: ModuleId,
    pub imports: &'a [Import],
    pub tcs: &'a TcTable,
    pub save_descriptions: bool,
    /// Counter for `anonymous#N` labels, shared across modules.
    pub anonymous: &'a mut u32,
}

impl ParseContext<'_> {
    /// Textual convention visible to the module: imported first, then any.
    #[must_use]
    pub fn lookup_tc(&self, name: &str) -> Option<&TcEntry> {
        self.imports
            .iter()
            .filter(|import| import.label == name)
            .find_map(|import| import.module.and_then(|m| self.tcs.get(name, m)))
            .or_else(|| self.tcs.get_any(name))
    }

    /// Fresh placeholder label.
    pub fn next_anonymous(&mut self) -> String {
        *self.anonymous += 1;
        format!("{}{}", crate::model::ANONYMOUS_PREFIX, self.anonymous)
    }
}
