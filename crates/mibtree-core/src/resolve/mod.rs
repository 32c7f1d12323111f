//! Name and OID translation.
//!
//! - [`Mib::resolve_name`] turns `IF-MIB::ifDescr.1`, `ifDescr.1`,
//!   `.iso.org.dod.1`, `.1.3.6.1` or `ifName."eth0"` into a numeric OID.
//! - [`Mib::render_oid`] is the reverse, in the configured [`OidFormat`].
//! - [`Mib::best_match`] finds the node whose label matches a regular
//!   expression earliest.

mod index;

pub use index::{IndexPart, IndexValue};

use std::fmt::Write;

use regex::Regex;

use crate::error::ResolveError;
use crate::model::{NodeId, NodeKind, Oid};
use crate::registry::Mib;
use crate::settings::OidFormat;

/// Path of `mib-2`, the base of relative names when random access is off.
const MIB2: [u32; 6] = [1, 3, 6, 1, 2, 1];

/// Label prefixes stripped by [`OidFormat::Ucd`].
const UCD_PREFIXES: [&str; 5] = [
    ".iso.org.dod.internet.mgmt.mib-2.",
    ".iso.org.dod.internet.experimental.",
    ".iso.org.dod.internet.private.",
    ".iso.org.dod.internet.snmpParties.",
    ".iso.org.dod.internet.snmpSecrets.",
];

/// Split `MOD::label` or `MOD:label` into the module name and the rest.
fn split_module(input: &str) -> Option<(&str, &str)> {
    let (module, rest) = input.split_once(':')?;
    if module.is_empty() || module.contains(['.', '"', '[']) {
        return None;
    }
    Some((module, rest.strip_prefix(':').unwrap_or(rest)))
}

/// One dot-separated piece of a textual OID.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Component {
    /// Label or number.
    Plain(String),
    /// `"text"`, without the quotes.
    Quoted(String),
    /// `[text]`, without the brackets.
    Bracket(String),
}

impl Component {
    /// Text handed to the index value parser. Quotes are kept so octet
    /// strings can tell `"12"` from `12`.
    fn text(&self) -> String {
        match self {
            Self::Plain(s) | Self::Bracket(s) => s.clone(),
            Self::Quoted(s) => format!("\"{s}\""),
        }
    }

    fn number(&self) -> Option<u32> {
        match self {
            Self::Plain(s) => s.parse().ok(),
            _ => None,
        }
    }
}

/// Split on dots outside quotes and brackets.
pub(crate) fn split_components(text: &str) -> Result<Vec<Component>, ResolveError> {
    let bad = || ResolveError::BadSubid(text.to_string());
    let mut out = Vec::new();
    let mut plain = String::new();
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        match c {
            '.' => {
                if !plain.is_empty() {
                    out.push(Component::Plain(std::mem::take(&mut plain)));
                }
            }
            '"' => {
                if !plain.is_empty() {
                    out.push(Component::Plain(std::mem::take(&mut plain)));
                }
                let mut quoted = String::new();
                let mut closed = false;
                while let Some(q) = chars.next() {
                    match q {
                        '\\' => quoted.push(chars.next().ok_or_else(bad)?),
                        '"' => {
                            closed = true;
                            break;
                        }
                        _ => quoted.push(q),
                    }
                }
                if !closed {
                    return Err(bad());
                }
                out.push(Component::Quoted(quoted));
            }
            '[' => {
                if !plain.is_empty() {
                    out.push(Component::Plain(std::mem::take(&mut plain)));
                }
                let mut inner = String::new();
                let mut in_quotes = false;
                let mut closed = false;
                for b in chars.by_ref() {
                    match b {
                        '"' => {
                            in_quotes = !in_quotes;
                            inner.push(b);
                        }
                        ']' if !in_quotes => {
                            closed = true;
                            break;
                        }
                        _ => inner.push(b),
                    }
                }
                if !closed {
                    return Err(bad());
                }
                out.push(Component::Bracket(inner));
            }
            _ => plain.push(c),
        }
    }
    if !plain.is_empty() {
        out.push(Component::Plain(plain));
    }
    Ok(out)
}

impl Mib {
    /// Numeric OID for a textual name.
    ///
    /// The configured input suffix is appended first. If the name does not
    /// resolve and an input prefix is configured, the prefixed name is
    /// tried before giving up.
    pub fn resolve_name(&self, text: &str) -> Result<Oid, ResolveError> {
        let mut input = text.trim().to_string();
        if let Some(suffix) = &self.settings.oid_input_suffix {
            input.push_str(suffix);
        }
        match self.resolve_plain(&input) {
            Err(err) => match &self.settings.oid_input_prefix {
                Some(prefix) => self
                    .resolve_plain(&format!("{prefix}{input}"))
                    .map_err(|_| err),
                None => Err(err),
            },
            ok => ok,
        }
    }

    /// [`best_match`](Self::best_match) when regex access is on,
    /// [`resolve_name`](Self::resolve_name) otherwise.
    pub fn resolve_input(&mut self, text: &str) -> Result<Oid, ResolveError> {
        if self.settings.regex_access {
            self.best_match(text)
        } else {
            self.resolve_name(text)
        }
    }

    fn resolve_plain(&self, input: &str) -> Result<Oid, ResolveError> {
        if input.is_empty() {
            return Err(ResolveError::UnknownLabel(String::new()));
        }

        if let Some((module, rest)) = split_module(input) {
            let id = self
                .modules
                .by_name(module)
                .filter(|m| m.state != crate::model::LoadState::NotLoaded)
                .map(|m| m.id)
                .ok_or_else(|| ResolveError::UnknownModule(module.to_string()))?;
            let components = split_components(rest)?;
            let Some((Component::Plain(label), tail)) = components.split_first() else {
                return Err(ResolveError::UnknownLabel(rest.to_string()));
            };
            let node = self
                .tree
                .find_in_module(label, id)
                .ok_or_else(|| ResolveError::UnknownLabel(format!("{module}::{label}")))?;
            return self.walk(Some(node), tail);
        }

        let components = split_components(input)?;
        let first = components
            .first()
            .ok_or_else(|| ResolveError::UnknownLabel(input.to_string()))?;

        if input.starts_with('.') || first.number().is_some() {
            return self.walk(None, &components);
        }
        let Component::Plain(label) = first else {
            return Err(ResolveError::UnknownLabel(input.to_string()));
        };
        if self.settings.random_access {
            let node = self
                .tree
                .find(label)
                .ok_or_else(|| ResolveError::UnknownLabel(label.clone()))?;
            self.walk(Some(node), &components[1..])
        } else {
            let base = self
                .tree
                .node_at(&MIB2)
                .ok_or_else(|| ResolveError::UnknownLabel("mib-2".into()))?;
            self.walk(Some(base), &components)
        }
    }

    /// Descend from `start` (the roots for `None`) by label or number, then
    /// treat whatever does not match a child as an index.
    fn walk(&self, start: Option<NodeId>, components: &[Component]) -> Result<Oid, ResolveError> {
        let mut current = start;
        let mut oid = start.map(|id| self.tree.oid_of(id)).unwrap_or_default();
        let mut consumed = 0;

        for component in components {
            let child = match component {
                Component::Plain(text) => match text.parse::<u32>() {
                    Ok(n) => self.tree.child_by_subid(current, n),
                    Err(_) => self.tree.child_by_label(current, text),
                },
                _ => None,
            };
            let Some(child) = child else { break };
            let Some(node) = self.tree.get(child) else { break };
            oid.push(node.subid);
            current = Some(child);
            consumed += 1;
        }

        let rest = &components[consumed..];
        if rest.is_empty() {
            return Ok(oid);
        }
        let numbers: Option<Vec<u32>> = rest.iter().map(Component::number).collect();
        if let Some(numbers) = numbers {
            oid.extend_from_slice(&numbers);
            return Ok(oid);
        }

        let row = current
            .and_then(|id| self.index_row(id))
            .ok_or_else(|| ResolveError::UnknownLabel(rest[0].text()))?;
        let index = self.parse_index_components(row, rest)?;
        oid.extend_from_slice(&index);
        Ok(oid)
    }

    /// Text form of an OID in the configured output format.
    ///
    /// Labels are used as far as the tree knows the OID; the rest is
    /// numeric, or `[a][b]` index values with extended index output.
    #[must_use]
    pub fn render_oid(&self, oid: &[u32]) -> String {
        self.render_oid_as(oid, self.settings.oid_format)
    }

    #[must_use]
    pub fn render_oid_as(&self, oid: &[u32], format: OidFormat) -> String {
        let Some((node, matched)) = self.tree.longest_match(oid) else {
            return Oid::from_slice(oid).to_dotted();
        };
        if format == OidFormat::Numeric {
            return Oid::from_slice(oid).to_dotted();
        }
        let suffix = self.render_suffix(node, &oid[matched..]);
        let label = self
            .tree
            .get(node)
            .map(|n| n.label.as_str())
            .unwrap_or_default();

        match format {
            OidFormat::Numeric => Oid::from_slice(oid).to_dotted(),
            OidFormat::Suffix => format!("{label}{suffix}"),
            OidFormat::Module => match self.node_module(node) {
                Some(module) => format!("{module}::{label}{suffix}"),
                None => format!("{label}{suffix}"),
            },
            OidFormat::Full | OidFormat::Ucd => {
                let mut full = String::new();
                for id in self.tree.path_of(node) {
                    if let Some(n) = self.tree.get(id) {
                        full.push('.');
                        full.push_str(&n.label);
                    }
                }
                full.push_str(&suffix);
                if format == OidFormat::Ucd {
                    if let Some(rest) = UCD_PREFIXES
                        .iter()
                        .find_map(|prefix| full.strip_prefix(prefix))
                    {
                        return rest.to_string();
                    }
                }
                full
            }
        }
    }

    fn render_suffix(&self, node: NodeId, rest: &[u32]) -> String {
        if rest.is_empty() {
            return String::new();
        }
        if self.settings.extended_index {
            if let Some(text) = self
                .index_row(node)
                .and_then(|row| self.decompose_index(row, rest).ok())
                .and_then(|parts| self.bracketed_index(&parts))
            {
                return text;
            }
        }
        Oid::from_slice(rest).to_dotted()
    }

    /// Reset the visited flag of every node.
    pub fn clear_reported(&mut self) {
        let ids: Vec<NodeId> = self.tree.iter().map(|(id, _)| id).collect();
        for id in ids {
            if let Some(node) = self.tree.get_mut(id) {
                node.reported = false;
            }
        }
    }

    /// OID of the node whose label matches `pattern` at the lowest offset.
    /// Ties go to the node reached first in a depth-first walk.
    pub fn best_match(&mut self, pattern: &str) -> Result<Oid, ResolveError> {
        let regex = Regex::new(pattern).map_err(|e| ResolveError::BadPattern(e.to_string()))?;
        self.clear_reported();

        let mut best: Option<(usize, NodeId)> = None;
        let mut stack: Vec<NodeId> = self.tree.roots().iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let Some(node) = self.tree.get_mut(id) else {
                continue;
            };
            if node.reported {
                continue;
            }
            node.reported = true;
            if let Some(found) = regex.find(&node.label) {
                if best.map_or(true, |(offset, _)| found.start() < offset) {
                    best = Some((found.start(), id));
                }
            }
            if best.is_some_and(|(offset, _)| offset == 0) {
                break;
            }
            stack.extend(node.children.iter().rev().copied());
        }

        best.map(|(_, id)| self.tree.oid_of(id))
            .ok_or_else(|| ResolveError::NoMatch(pattern.to_string()))
    }

    /// Human-readable summary of a node's metadata.
    #[must_use]
    pub fn describe(&self, id: NodeId) -> Option<String> {
        let node = self.tree.get(id)?;
        let info = &node.info;
        let mut out = String::new();
        // write! into a String cannot fail
        let _ = writeln!(out, "{}", self.render_oid_as(&self.tree.oid_of(id), OidFormat::Module));
        if let Some(module) = self.node_module(id) {
            let _ = writeln!(out, "  -- FROM\t{module}");
        }
        if let Some(tc) = &info.tc {
            let _ = writeln!(out, "  -- TEXTUAL CONVENTION {tc}");
        }
        if info.kind.is_object_type() {
            let _ = write!(out, "  SYNTAX\t{}", info.syntax);
            if !info.enums.is_empty() {
                let items: Vec<String> = info
                    .enums
                    .iter()
                    .map(|e| format!("{}({})", e.label, e.value))
                    .collect();
                let _ = write!(out, " {{{}}}", items.join(", "));
            }
            if !info.ranges.is_empty() {
                let items: Vec<String> = info
                    .ranges
                    .iter()
                    .map(|r| {
                        if r.low == r.high {
                            r.low.to_string()
                        } else {
                            format!("{}..{}", r.low, r.high)
                        }
                    })
                    .collect();
                let _ = write!(out, " ({})", items.join(" | "));
            }
            out.push('\n');
            if let Some(hint) = &info.hint {
                let _ = writeln!(out, "  DISPLAY-HINT\t\"{hint}\"");
            }
            if let Some(units) = &info.units {
                let _ = writeln!(out, "  UNITS\t\t\"{units}\"");
            }
            let _ = writeln!(out, "  MAX-ACCESS\t{}", info.access.as_str());
        }
        if info.kind != NodeKind::Internal {
            let _ = writeln!(out, "  STATUS\t{}", info.status.as_str());
        }
        if let Some(description) = &info.description {
            let _ = writeln!(out, "  DESCRIPTION\t\"{description}\"");
        }
        if let Some(reference) = &info.reference {
            let _ = writeln!(out, "  REFERENCE\t\"{reference}\"");
        }
        if !info.indexes.is_empty() {
            let items: Vec<String> = info
                .indexes
                .iter()
                .map(|i| {
                    if i.implied {
                        format!("IMPLIED {}", i.label)
                    } else {
                        i.label.clone()
                    }
                })
                .collect();
            let _ = writeln!(out, "  INDEX\t\t{{ {} }}", items.join(", "));
        }
        if let Some(augments) = &info.augments {
            let _ = writeln!(out, "  AUGMENTS\t{{ {augments} }}");
        }
        if !info.varbinds.is_empty() {
            let _ = writeln!(out, "  OBJECTS\t{{ {} }}", info.varbinds.join(", "));
        }
        if let Some(defval) = &info.defval {
            let _ = writeln!(out, "  DEFVAL\t{{ {defval} }}");
        }

        let path: Vec<String> = self
            .tree
            .path_of(id)
            .into_iter()
            .filter_map(|p| self.tree.get(p))
            .map(|n| format!("{}({})", n.label, n.subid))
            .collect();
        let _ = write!(out, "::= {{ {} }}", path.join(" "));
        Some(out)
    }

    /// Indented listing of a subtree, one `label(subid) SYNTAX` per line.
    /// `None` lists every root.
    #[must_use]
    pub fn dump_tree(&self, root: Option<NodeId>) -> String {
        let mut out = String::new();
        let mut stack: Vec<(NodeId, usize)> = match root {
            Some(id) => vec![(id, 0)],
            None => self.tree.roots().iter().rev().map(|&id| (id, 0)).collect(),
        };
        while let Some((id, depth)) = stack.pop() {
            let Some(node) = self.tree.get(id) else {
                continue;
            };
            let _ = write!(out, "{}+--{}({})", "|  ".repeat(depth), node.label, node.subid);
            if node.info.kind.is_object_type() && node.info.kind != NodeKind::Table {
                let _ = write!(out, " {}", node.info.syntax);
            }
            out.push('\n');
            stack.extend(node.children.iter().rev().map(|&c| (c, depth + 1)));
        }
        out
    }
}
