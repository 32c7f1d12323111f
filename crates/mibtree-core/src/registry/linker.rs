//! Attaches parse nodes to the tree.
//!
//! Pending nodes are attached in passes: every pass links the nodes whose
//! parent label now resolves, until a pass makes no progress. Whatever is
//! left goes to the orphan pool.

use std::collections::BTreeMap;

use tracing::warn;

use crate::lexer::{Diagnostic, Span};
use crate::model::{Module, ModuleId, NodeId, NodeKind, Tree, TreeNode};
use crate::parser::{ObjectReference, ParseNode, ReferenceSite};

/// Linking state borrowed from the registry for one module.
pub(crate) struct Linker<'a> {
    pub tree: &'a mut Tree,
    /// Labels of anonymous parse nodes merged into an existing node.
    pub aliases: &'a mut BTreeMap<String, NodeId>,
    pub module: &'a Module,
    pub replace_with_latest: bool,
    pub diagnostics: Vec<Diagnostic>,
}

impl Linker<'_> {
    /// Link `nodes`. Returns the nodes whose parent is still unknown.
    pub fn link(&mut self, nodes: Vec<ParseNode>) -> Vec<ParseNode> {
        let mut pending = nodes;
        loop {
            let before = pending.len();
            let mut unresolved = Vec::new();
            for node in pending {
                match self.pick_parent(&node.parent, node.module) {
                    Some(parent) => self.attach(parent, node),
                    None => unresolved.push(node),
                }
            }
            pending = unresolved;
            if pending.is_empty() || pending.len() == before {
                return pending;
            }
        }
    }

    /// Node a parent label refers to, seen from `module`.
    fn pick_parent(&self, label: &str, module: ModuleId) -> Option<NodeId> {
        if let Some(&id) = self.aliases.get(label) {
            if self.tree.get(id).is_some() {
                return Some(id);
            }
        }
        if let Some(id) = self.tree.find_in_module(label, module) {
            return Some(id);
        }
        if let Some(id) = self
            .module
            .import_source(label)
            .and_then(|source| self.tree.find_in_module(label, source))
        {
            return Some(id);
        }
        self.tree.find(label)
    }

    fn attach(&mut self, parent: NodeId, mut node: ParseNode) {
        let Some(subid) = node.subid else {
            self.diagnostics.push(Diagnostic::warning(
                Span::default(),
                node.line,
                format!("{} has no sub-identifier", node.label),
            ));
            return;
        };

        if node.info.kind == NodeKind::Scalar
            && self
                .tree
                .get(parent)
                .is_some_and(|p| p.info.kind == NodeKind::Row)
        {
            node.info.kind = NodeKind::Column;
        }

        let peers: Vec<NodeId> = self
            .tree
            .children(Some(parent))
            .iter()
            .copied()
            .filter(|&c| self.tree.get(c).is_some_and(|n| n.subid == subid))
            .collect();

        let new_is_anonymous = crate::model::is_anonymous_label(&node.label);
        let mut same_label = None;
        let mut anonymous = None;
        for &peer in &peers {
            let Some(existing) = self.tree.get(peer) else {
                continue;
            };
            if existing.label == node.label {
                same_label = Some(peer);
                break;
            }
            if anonymous.is_none() && existing.is_anonymous() {
                anonymous = Some(peer);
            }
        }

        if let Some(existing) = same_label {
            self.merge(existing, node);
            return;
        }

        if new_is_anonymous {
            if let Some(&existing) = peers.first() {
                self.aliases.insert(node.label, existing);
                if let Some(target) = self.tree.get_mut(existing) {
                    target.claim(node.module);
                }
                return;
            }
        } else if let Some(existing) = anonymous {
            if let Some(old) = self.tree.get(existing).map(|n| n.label.clone()) {
                self.aliases.insert(old, existing);
            }
            self.tree.rename(existing, &node.label);
            if let Some(target) = self.tree.get_mut(existing) {
                target.claim(node.module);
                if node.info.kind != NodeKind::Internal {
                    target.set_info(node.info);
                }
            }
            return;
        } else if let Some(&first) = peers.first() {
            let existing = self
                .tree
                .get(first)
                .map(|n| n.label.clone())
                .unwrap_or_default();
            warn!(
                target: "mibtree::linker",
                module = %self.module.name,
                line = node.line,
                "{} and {} share sub-identifier {}",
                existing,
                node.label,
                subid
            );
            self.diagnostics.push(Diagnostic::warning(
                Span::default(),
                node.line,
                format!(
                    "{} conflicts with {existing} at sub-identifier {subid}",
                    node.label
                ),
            ));
        }

        let mut tree_node = TreeNode::new(node.label, subid, Some(parent));
        tree_node.claim(node.module);
        tree_node.set_info(node.info);
        self.tree.insert(Some(parent), tree_node);
    }

    /// Same label and sub-identifier: one node claimed by both modules.
    fn merge(&mut self, existing: NodeId, node: ParseNode) {
        let replace = self.replace_with_latest;
        let Some(target) = self.tree.get_mut(existing) else {
            return;
        };
        target.claim(node.module);
        if node.info.kind != NodeKind::Internal
            && (target.info.kind == NodeKind::Internal || replace)
        {
            target.set_info(node.info);
        }
    }
}

/// Release `module` from every node, pruning nodes nobody claims.
///
/// Children are visited before their parents so an unclaimed parent whose
/// last child goes away in this pass is pruned too.
pub(crate) fn unlink_module(tree: &mut Tree, module: ModuleId) -> usize {
    let mut removed = 0;
    for id in tree.preorder(None).into_iter().rev() {
        let Some(node) = tree.get_mut(id) else {
            continue;
        };
        let released = node.release(module);
        if !node.modules.is_empty() {
            continue;
        }
        if node.children.is_empty() && node.parent.is_some() {
            tree.remove(id);
            removed += 1;
        } else if released {
            node.strip();
        }
    }
    removed
}

/// Warnings for group and compliance members that name nothing the module
/// defines or imports.
pub(crate) fn check_references(
    tree: &Tree,
    module: &Module,
    modules: &crate::model::ModuleTable,
    references: &[ObjectReference],
) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for reference in references {
        let found = match reference.module.as_deref().and_then(|m| modules.id_of(m)) {
            Some(other) if other != module.id => {
                tree.find_in_module(&reference.name, other).is_some()
                    || tree.find(&reference.name).is_some()
            }
            _ => {
                tree.find_in_module(&reference.name, module.id).is_some()
                    || module
                        .imports
                        .iter()
                        .any(|import| import.label == reference.name)
            }
        };
        if !found {
            let site = match reference.site {
                ReferenceSite::Group => "group member",
                ReferenceSite::Compliance => "compliance reference",
                ReferenceSite::Capabilities => "capabilities reference",
            };
            diagnostics.push(Diagnostic::warning(
                Span::default(),
                reference.line,
                format!("unresolved {site} {}", reference.name),
            ));
        }
    }
    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ModuleTable, NodeInfo};

    fn parse_node(label: &str, subid: u32, module: ModuleId, parent: &str) -> ParseNode {
        ParseNode {
            label: label.into(),
            subid: Some(subid),
            module,
            parent: parent.into(),
            info: NodeInfo {
                kind: NodeKind::Node,
                ..NodeInfo::default()
            },
            line: 1,
        }
    }

    fn setup() -> (Tree, ModuleTable) {
        let mut tree = Tree::new();
        tree.init_roots();
        (tree, ModuleTable::new())
    }

    fn link(
        tree: &mut Tree,
        aliases: &mut BTreeMap<String, NodeId>,
        module: &Module,
        nodes: Vec<ParseNode>,
    ) -> (Vec<ParseNode>, Vec<Diagnostic>) {
        let mut linker = Linker {
            tree,
            aliases,
            module,
            replace_with_latest: false,
            diagnostics: Vec::new(),
        };
        let left = linker.link(nodes);
        (left, linker.diagnostics)
    }

    #[test]
    fn test_links_out_of_order() {
        let (mut tree, mut modules) = setup();
        let a = modules.intern("A");
        let module = modules.get(a).unwrap().clone();
        let nodes = vec![
            parse_node("dod", 6, a, "org"),
            parse_node("org", 3, a, "iso"),
        ];
        let (left, _) = link(&mut tree, &mut BTreeMap::new(), &module, nodes);
        assert!(left.is_empty());
        let dod = tree.find("dod").unwrap();
        assert_eq!(tree.oid_of(dod).arcs(), &[1, 3, 6]);
    }

    #[test]
    fn test_unresolved_parent_left_over() {
        let (mut tree, mut modules) = setup();
        let a = modules.intern("A");
        let module = modules.get(a).unwrap().clone();
        let (left, _) = link(
            &mut tree,
            &mut BTreeMap::new(),
            &module,
            vec![parse_node("x", 1, a, "nowhere")],
        );
        assert_eq!(left.len(), 1);
        assert!(tree.find("x").is_none());
    }

    #[test]
    fn test_conflicting_labels_become_peers() {
        let (mut tree, mut modules) = setup();
        let a = modules.intern("A");
        let module = modules.get(a).unwrap().clone();
        let (_, diags) = link(
            &mut tree,
            &mut BTreeMap::new(),
            &module,
            vec![parse_node("one", 7, a, "iso"), parse_node("two", 7, a, "iso")],
        );
        assert_eq!(diags.len(), 1);
        let iso = tree.find("iso").unwrap();
        assert_eq!(tree.children(Some(iso)).len(), 2);
    }

    #[test]
    fn test_anonymous_aliases_existing_node() {
        let (mut tree, mut modules) = setup();
        let a = modules.intern("A");
        let b = modules.intern("B");
        let module_a = modules.get(a).unwrap().clone();
        let module_b = modules.get(b).unwrap().clone();
        let mut aliases = BTreeMap::new();

        link(&mut tree, &mut aliases, &module_a, vec![parse_node("real", 4, a, "iso")]);
        let mut anon = parse_node("anonymous#1", 4, b, "iso");
        anon.info.kind = NodeKind::Internal;
        let (left, _) = link(
            &mut tree,
            &mut aliases,
            &module_b,
            vec![parse_node("leaf", 1, b, "anonymous#1"), anon],
        );
        assert!(left.is_empty());
        let real = tree.find("real").unwrap();
        assert_eq!(tree.children(Some(real)).len(), 1);
        assert!(tree.get(real).unwrap().is_claimed_by(b));
    }

    /// The first definition wins unless replace-with-latest is on.
    #[test]
    fn test_duplicate_definition_policy() {
        for (replace, expected) in [(false, "first"), (true, "second")] {
            let (mut tree, mut modules) = setup();
            let a = modules.intern("A");
            let b = modules.intern("B");
            let module_a = modules.get(a).unwrap().clone();
            let module_b = modules.get(b).unwrap().clone();
            let mut aliases = BTreeMap::new();

            let mut first = parse_node("obj", 2, a, "iso");
            first.info.description = Some("first".into());
            let mut second = parse_node("obj", 2, b, "iso");
            second.info.description = Some("second".into());

            link(&mut tree, &mut aliases, &module_a, vec![first]);
            let mut linker = Linker {
                tree: &mut tree,
                aliases: &mut aliases,
                module: &module_b,
                replace_with_latest: replace,
                diagnostics: Vec::new(),
            };
            linker.link(vec![second]);

            let obj = tree.find("obj").unwrap();
            let node = tree.get(obj).unwrap();
            assert_eq!(node.info.description.as_deref(), Some(expected));
            assert!(node.is_claimed_by(a) && node.is_claimed_by(b));
        }
    }

    #[test]
    fn test_unlink_strips_node_with_foreign_children() {
        let (mut tree, mut modules) = setup();
        let a = modules.intern("A");
        let b = modules.intern("B");
        let module_a = modules.get(a).unwrap().clone();
        let module_b = modules.get(b).unwrap().clone();
        let mut aliases = BTreeMap::new();
        link(&mut tree, &mut aliases, &module_a, vec![parse_node("top", 5, a, "iso")]);
        link(&mut tree, &mut aliases, &module_b, vec![parse_node("leaf", 1, b, "top")]);

        assert_eq!(unlink_module(&mut tree, a), 0);
        let top = tree.find("top").unwrap();
        assert_eq!(tree.get(top).unwrap().info.kind, NodeKind::Internal);

        assert_eq!(unlink_module(&mut tree, b), 2);
        assert!(tree.find("leaf").is_none());
        assert!(tree.find("top").is_none());
    }
}
