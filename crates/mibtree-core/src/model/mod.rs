//! The linked OID tree.
//!
//! Nodes live in an arena addressed by [`NodeId`]. Parent and sibling
//! relations are stored as ids; a name index maps every label to the nodes
//! carrying it (labels are not globally unique).
//!
//! ```text
//! ccitt(0)   iso(1)   joint-iso-ccitt(2)
//!              └── org(3) └── dod(6) └── internet(1) ...
//! ```

mod ids;
mod module;
mod node;
mod oid;
mod types;

pub use ids::{ModuleId, NodeId};
pub use module::{Import, LoadState, Module, ModuleTable};
pub use node::{is_anonymous_label, NodeInfo, Printer, TreeNode, ANONYMOUS_PREFIX};
pub use oid::Oid;
pub use types::{
    enum_label, enum_value, fixed_size, Access, AsnType, EnumItem, IndexItem, NodeKind, RangeItem,
    Status,
};

use std::collections::BTreeMap;

/// Labels and sub-ids of the three implicit roots.
pub const ROOTS: [(&str, u32); 3] = [("ccitt", 0), ("iso", 1), ("joint-iso-ccitt", 2)];

/// Arena-backed OID tree.
#[derive(Clone, Debug, Default)]
pub struct Tree {
    nodes: Vec<Option<TreeNode>>,
    roots: Vec<NodeId>,
    names: BTreeMap<String, Vec<NodeId>>,
}

impl Tree {
    /// An empty tree without roots.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the implicit roots. Existing roots are left alone.
    pub fn init_roots(&mut self) {
        for (label, subid) in ROOTS {
            let present = self
                .roots
                .iter()
                .any(|&id| self.get(id).is_some_and(|n| n.label == label));
            if !present {
                let mut node = TreeNode::new(label, subid, None);
                node.info.kind = NodeKind::Internal;
                self.insert(None, node);
            }
        }
    }

    /// Remove every node.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.roots.clear();
        self.names.clear();
    }

    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id.to_index()).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut TreeNode> {
        self.nodes.get_mut(id.to_index()).and_then(Option::as_mut)
    }

    #[must_use]
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Number of live nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Children of `parent`, or the roots for `None`.
    #[must_use]
    pub fn children(&self, parent: Option<NodeId>) -> &[NodeId] {
        match parent {
            None => &self.roots,
            Some(id) => self.get(id).map_or(&[], |n| n.children.as_slice()),
        }
    }

    /// Link `node` under `parent`, keeping siblings ordered by sub-id.
    /// Nodes sharing a sub-id keep insertion order.
    pub fn insert(&mut self, parent: Option<NodeId>, mut node: TreeNode) -> NodeId {
        let id = NodeId::from_index(self.nodes.len())
            .unwrap_or_else(|| unreachable!("node arena exceeds u32 range"));
        node.parent = parent;
        let subid = node.subid;
        self.names.entry(node.label.clone()).or_default().push(id);
        self.nodes.push(Some(node));

        let position = {
            let siblings = self.children(parent);
            siblings
                .iter()
                .position(|&s| self.get(s).is_some_and(|n| n.subid > subid))
                .unwrap_or(siblings.len())
        };
        match parent {
            None => self.roots.insert(position, id),
            Some(p) => {
                if let Some(parent_node) = self.get_mut(p) {
                    parent_node.children.insert(position, id);
                }
            }
        }
        id
    }

    /// Unlink and drop a node. Its children must already be gone.
    pub fn remove(&mut self, id: NodeId) -> Option<TreeNode> {
        let node = self.nodes.get_mut(id.to_index())?.take()?;
        match node.parent {
            None => self.roots.retain(|&r| r != id),
            Some(p) => {
                if let Some(parent) = self.get_mut(p) {
                    parent.children.retain(|&c| c != id);
                }
            }
        }
        self.unindex(&node.label, id);
        Some(node)
    }

    /// Change a node's label, keeping the name index current.
    pub fn rename(&mut self, id: NodeId, label: &str) {
        let Some(node) = self.get_mut(id) else {
            return;
        };
        let old = std::mem::replace(&mut node.label, label.to_string());
        self.unindex(&old, id);
        self.names.entry(label.to_string()).or_default().push(id);
    }

    fn unindex(&mut self, label: &str, id: NodeId) {
        if let Some(ids) = self.names.get_mut(label) {
            ids.retain(|&n| n != id);
            if ids.is_empty() {
                self.names.remove(label);
            }
        }
    }

    /// All nodes carrying `label`, oldest first.
    #[must_use]
    pub fn find_all(&self, label: &str) -> &[NodeId] {
        self.names.get(label).map_or(&[], Vec::as_slice)
    }

    /// First node carrying `label`.
    #[must_use]
    pub fn find(&self, label: &str) -> Option<NodeId> {
        self.find_all(label).first().copied()
    }

    /// Node carrying `label` that `module` claims.
    #[must_use]
    pub fn find_in_module(&self, label: &str, module: ModuleId) -> Option<NodeId> {
        self.find_all(label)
            .iter()
            .copied()
            .find(|&id| self.get(id).is_some_and(|n| n.is_claimed_by(module)))
    }

    /// First child of `parent` with sub-id `subid`.
    #[must_use]
    pub fn child_by_subid(&self, parent: Option<NodeId>, subid: u32) -> Option<NodeId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|&c| self.get(c).is_some_and(|n| n.subid == subid))
    }

    /// Child of `parent` with `label`.
    #[must_use]
    pub fn child_by_label(&self, parent: Option<NodeId>, label: &str) -> Option<NodeId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|&c| self.get(c).is_some_and(|n| n.label == label))
    }

    /// Numeric OID of a node.
    #[must_use]
    pub fn oid_of(&self, id: NodeId) -> Oid {
        let mut arcs = Vec::new();
        let mut current = Some(id);
        while let Some(cid) = current {
            let Some(node) = self.get(cid) else { break };
            arcs.push(node.subid);
            current = node.parent;
        }
        arcs.reverse();
        Oid::new(arcs)
    }

    /// Path of node ids from a root down to `id`.
    #[must_use]
    pub fn path_of(&self, id: NodeId) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut current = Some(id);
        while let Some(cid) = current {
            let Some(node) = self.get(cid) else { break };
            path.push(cid);
            current = node.parent;
        }
        path.reverse();
        path
    }

    /// Longest known prefix of `arcs`: the deepest matching node and how
    /// many arcs it consumed.
    #[must_use]
    pub fn longest_match(&self, arcs: &[u32]) -> Option<(NodeId, usize)> {
        let mut parent = None;
        let mut matched = None;
        for (depth, &arc) in arcs.iter().enumerate() {
            match self.child_by_subid(parent, arc) {
                Some(child) => {
                    matched = Some((child, depth + 1));
                    parent = Some(child);
                }
                None => break,
            }
        }
        matched
    }

    /// Node at exactly `arcs`.
    #[must_use]
    pub fn node_at(&self, arcs: &[u32]) -> Option<NodeId> {
        match self.longest_match(arcs) {
            Some((id, len)) if len == arcs.len() => Some(id),
            _ => None,
        }
    }

    /// Pre-order walk of the subtree at `start` (every root for `None`),
    /// using an explicit stack.
    #[must_use]
    pub fn preorder(&self, start: Option<NodeId>) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = match start {
            Some(id) => vec![id],
            None => self.roots.iter().rev().copied().collect(),
        };
        while let Some(id) = stack.pop() {
            let Some(node) = self.get(id) else { continue };
            out.push(id);
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    /// Depth of a node below its root (roots are 0).
    #[must_use]
    pub fn depth(&self, id: NodeId) -> usize {
        self.path_of(id).len().saturating_sub(1)
    }

    /// Iterate live nodes.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &TreeNode)> {
        self.nodes.iter().enumerate().filter_map(|(i, n)| {
            n.as_ref()
                .and_then(|node| NodeId::from_index(i).map(|id| (id, node)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Tree, NodeId) {
        let mut tree = Tree::new();
        tree.init_roots();
        let iso = tree.find("iso").unwrap();
        let org = tree.insert(Some(iso), TreeNode::new("org", 3, None));
        (tree, org)
    }

    #[test]
    fn test_init_roots_idempotent() {
        let mut tree = Tree::new();
        tree.init_roots();
        tree.init_roots();
        assert_eq!(tree.roots().len(), 3);
        assert_eq!(tree.len(), 3);
        let subids: Vec<u32> = tree
            .roots()
            .iter()
            .map(|&r| tree.get(r).unwrap().subid)
            .collect();
        assert_eq!(subids, vec![0, 1, 2]);
    }

    #[test]
    fn test_children_sorted_by_subid() {
        let (mut tree, org) = sample();
        tree.insert(Some(org), TreeNode::new("c", 9, None));
        tree.insert(Some(org), TreeNode::new("a", 1, None));
        tree.insert(Some(org), TreeNode::new("b", 6, None));
        let labels: Vec<&str> = tree
            .children(Some(org))
            .iter()
            .map(|&c| tree.get(c).unwrap().label.as_str())
            .collect();
        assert_eq!(labels, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_oid_and_lookup() {
        let (mut tree, org) = sample();
        let dod = tree.insert(Some(org), TreeNode::new("dod", 6, None));
        assert_eq!(tree.oid_of(dod).arcs(), &[1, 3, 6]);
        assert_eq!(tree.node_at(&[1, 3, 6]), Some(dod));
        assert_eq!(tree.longest_match(&[1, 3, 6, 1, 4]), Some((dod, 3)));
        assert_eq!(tree.node_at(&[1, 3, 7]), None);
        assert_eq!(tree.depth(dod), 2);
    }

    #[test]
    fn test_remove_and_rename() {
        let (mut tree, org) = sample();
        let anon = tree.insert(Some(org), TreeNode::new("anonymous#1", 6, None));
        tree.rename(anon, "dod");
        assert!(tree.find("anonymous#1").is_none());
        assert_eq!(tree.find("dod"), Some(anon));

        tree.remove(anon);
        assert!(tree.find("dod").is_none());
        assert!(tree.children(Some(org)).is_empty());
        assert!(tree.get(anon).is_none());
    }

    #[test]
    fn test_preorder() {
        let (mut tree, org) = sample();
        let dod = tree.insert(Some(org), TreeNode::new("dod", 6, None));
        tree.insert(Some(dod), TreeNode::new("internet", 1, None));
        let labels: Vec<&str> = tree
            .preorder(Some(org))
            .into_iter()
            .map(|id| tree.get(id).unwrap().label.as_str())
            .collect();
        assert_eq!(labels, vec!["org", "dod", "internet"]);
    }
}
