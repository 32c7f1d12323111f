//! Linked tree nodes.

use super::ids::{ModuleId, NodeId};
use super::types::{Access, AsnType, EnumItem, IndexItem, NodeKind, RangeItem, Status};

/// Prefix of labels synthesized for unlabeled intermediate OID arcs.
pub const ANONYMOUS_PREFIX: &str = "anonymous#";

/// Value printer selected for a node from its syntax.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Printer {
    #[default]
    Unknown,
    Octets,
    Integer,
    Unsigned,
    Gauge,
    Counter,
    Counter64,
    TimeTicks,
    ObjectId,
    IpAddress,
    NetAddress,
    Nsap,
    Opaque,
    Bits,
    Null,
}

impl Printer {
    #[must_use]
    pub const fn for_syntax(syntax: AsnType) -> Self {
        match syntax {
            AsnType::Other => Self::Unknown,
            AsnType::OctetString => Self::Octets,
            AsnType::Integer | AsnType::Integer32 => Self::Integer,
            AsnType::Unsigned32 | AsnType::UInteger => Self::Unsigned,
            AsnType::Gauge => Self::Gauge,
            AsnType::Counter => Self::Counter,
            AsnType::Counter64 => Self::Counter64,
            AsnType::TimeTicks => Self::TimeTicks,
            AsnType::ObjectId => Self::ObjectId,
            AsnType::IpAddress => Self::IpAddress,
            AsnType::NetAddress => Self::NetAddress,
            AsnType::NsapAddress => Self::Nsap,
            AsnType::Opaque => Self::Opaque,
            AsnType::Bits => Self::Bits,
            AsnType::Null => Self::Null,
        }
    }
}

/// MIB metadata carried by a node. Everything here is stripped when the
/// last claiming module unloads while children remain.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeInfo {
    pub kind: NodeKind,
    pub syntax: AsnType,
    pub access: Access,
    pub status: Status,
    pub enums: Vec<EnumItem>,
    pub ranges: Vec<RangeItem>,
    pub indexes: Vec<IndexItem>,
    pub augments: Option<String>,
    pub varbinds: Vec<String>,
    pub hint: Option<String>,
    pub units: Option<String>,
    /// Name of the textual convention the syntax came from.
    pub tc: Option<String>,
    pub description: Option<String>,
    pub reference: Option<String>,
    pub defval: Option<String>,
}

/// A node of the OID tree.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TreeNode {
    pub label: String,
    pub subid: u32,
    /// Module that first defined this position.
    pub module: Option<ModuleId>,
    /// Every module claiming this position, `module` included.
    pub modules: Vec<ModuleId>,
    pub parent: Option<NodeId>,
    /// Children ordered by sub-identifier.
    pub children: Vec<NodeId>,
    pub info: NodeInfo,
    pub printer: Printer,
    /// Best-match visited flag.
    pub reported: bool,
}

impl TreeNode {
    #[must_use]
    pub fn new(label: impl Into<String>, subid: u32, parent: Option<NodeId>) -> Self {
        Self {
            label: label.into(),
            subid,
            module: None,
            modules: Vec::new(),
            parent,
            children: Vec::new(),
            info: NodeInfo::default(),
            printer: Printer::Unknown,
            reported: false,
        }
    }

    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        is_anonymous_label(&self.label)
    }

    #[must_use]
    pub fn is_claimed_by(&self, module: ModuleId) -> bool {
        self.modules.contains(&module)
    }

    /// Add a claiming module. Returns false if it was already present.
    pub fn claim(&mut self, module: ModuleId) -> bool {
        if self.modules.contains(&module) {
            return false;
        }
        if self.module.is_none() {
            self.module = Some(module);
        }
        self.modules.push(module);
        true
    }

    /// Drop a claiming module, promoting the next claimant to owner.
    pub fn release(&mut self, module: ModuleId) -> bool {
        let before = self.modules.len();
        self.modules.retain(|m| *m != module);
        if self.module == Some(module) {
            self.module = self.modules.first().copied();
        }
        before != self.modules.len()
    }

    /// Replace the metadata and refresh the printer.
    pub fn set_info(&mut self, info: NodeInfo) {
        self.printer = Printer::for_syntax(info.syntax);
        self.info = info;
    }

    /// Remove all module-specific metadata, keeping the label and links.
    pub fn strip(&mut self) {
        self.info = NodeInfo::default();
        self.printer = Printer::Unknown;
    }
}

/// Labels of synthesized placeholders: anonymous arcs and the implicit
/// `.0` trap parent (`enterprise#`).
#[must_use]
pub fn is_anonymous_label(label: &str) -> bool {
    label.starts_with(ANONYMOUS_PREFIX) || label.ends_with('#')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module(raw: u32) -> ModuleId {
        ModuleId::from_raw(raw).unwrap()
    }

    #[test]
    fn test_claim_and_release() {
        let mut node = TreeNode::new("mgmt", 2, None);
        assert!(node.claim(module(1)));
        assert!(!node.claim(module(1)));
        assert!(node.claim(module(2)));
        assert_eq!(node.module, Some(module(1)));

        assert!(node.release(module(1)));
        assert_eq!(node.module, Some(module(2)));
        assert!(node.release(module(2)));
        assert!(node.modules.is_empty());
        assert_eq!(node.module, None);
    }

    #[test]
    fn test_anonymous_labels() {
        assert!(is_anonymous_label("anonymous#3"));
        assert!(is_anonymous_label("acme#"));
        assert!(!is_anonymous_label("acme"));
    }

    #[test]
    fn test_strip_keeps_label() {
        let mut node = TreeNode::new("ifTable", 2, None);
        node.set_info(NodeInfo {
            kind: NodeKind::Table,
            description: Some("interfaces".into()),
            syntax: AsnType::Integer,
            ..NodeInfo::default()
        });
        assert_eq!(node.printer, Printer::Integer);
        node.strip();
        assert_eq!(node.label, "ifTable");
        assert_eq!(node.info, NodeInfo::default());
        assert_eq!(node.printer, Printer::Unknown);
    }
}
