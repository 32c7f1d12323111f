//! Type, access and status codes plus the per-node value lists.

use std::fmt;

/// ASN.1 syntax of a node or textual convention.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AsnType {
    /// No syntax, or a syntax we could not resolve.
    #[default]
    Other,
    ObjectId,
    OctetString,
    Integer,
    /// SMIv1 `NetworkAddress`.
    NetAddress,
    IpAddress,
    /// `Counter` / `Counter32`.
    Counter,
    /// `Gauge` / `Gauge32`.
    Gauge,
    TimeTicks,
    Opaque,
    Null,
    Counter64,
    Bits,
    NsapAddress,
    /// SMIv1 `UInteger32`.
    UInteger,
    Unsigned32,
    Integer32,
}

impl AsnType {
    /// Name used in `TYPE: value` output and in descriptions.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Other => "OTHER",
            Self::ObjectId => "OBJECT IDENTIFIER",
            Self::OctetString => "OCTET STRING",
            Self::Integer => "INTEGER",
            Self::NetAddress => "NetworkAddress",
            Self::IpAddress => "IpAddress",
            Self::Counter => "Counter32",
            Self::Gauge => "Gauge32",
            Self::TimeTicks => "TimeTicks",
            Self::Opaque => "Opaque",
            Self::Null => "NULL",
            Self::Counter64 => "Counter64",
            Self::Bits => "BITS",
            Self::NsapAddress => "NsapAddress",
            Self::UInteger => "UInteger32",
            Self::Unsigned32 => "Unsigned32",
            Self::Integer32 => "Integer32",
        }
    }

    /// Types encoded as a single sub-identifier inside an INDEX.
    #[must_use]
    pub const fn is_integer_like(self) -> bool {
        matches!(
            self,
            Self::Integer
                | Self::Integer32
                | Self::Unsigned32
                | Self::UInteger
                | Self::Counter
                | Self::Gauge
                | Self::TimeTicks
        )
    }

    /// Types holding an octet sequence.
    #[must_use]
    pub const fn is_octet_like(self) -> bool {
        matches!(
            self,
            Self::OctetString | Self::Opaque | Self::Bits | Self::NsapAddress
        )
    }
}

impl fmt::Display for AsnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// MAX-ACCESS / ACCESS value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Access {
    #[default]
    Unspecified,
    ReadOnly,
    ReadWrite,
    WriteOnly,
    NotAccessible,
    AccessibleForNotify,
    ReadCreate,
    NotImplemented,
}

impl Access {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unspecified => "unspecified",
            Self::ReadOnly => "read-only",
            Self::ReadWrite => "read-write",
            Self::WriteOnly => "write-only",
            Self::NotAccessible => "not-accessible",
            Self::AccessibleForNotify => "accessible-for-notify",
            Self::ReadCreate => "read-create",
            Self::NotImplemented => "not-implemented",
        }
    }
}

/// STATUS value. `Mandatory` and `Optional` are SMIv1 only.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Status {
    #[default]
    Unspecified,
    Mandatory,
    Optional,
    Obsolete,
    Deprecated,
    Current,
}

impl Status {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unspecified => "unspecified",
            Self::Mandatory => "mandatory",
            Self::Optional => "optional",
            Self::Obsolete => "obsolete",
            Self::Deprecated => "deprecated",
            Self::Current => "current",
        }
    }
}

/// Which macro produced a node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeKind {
    /// Root, anonymous placeholder, or a node stripped by unload.
    #[default]
    Internal,
    /// OBJECT IDENTIFIER value assignment or OBJECT-IDENTITY.
    Node,
    ModuleIdentity,
    /// OBJECT-TYPE outside a table.
    Scalar,
    /// OBJECT-TYPE with `SEQUENCE OF` syntax.
    Table,
    /// OBJECT-TYPE with INDEX or AUGMENTS.
    Row,
    /// OBJECT-TYPE whose parent is a row.
    Column,
    /// NOTIFICATION-TYPE or TRAP-TYPE.
    Notification,
    /// OBJECT-GROUP or NOTIFICATION-GROUP.
    Group,
    Compliance,
    Capabilities,
}

impl NodeKind {
    #[must_use]
    pub const fn is_object_type(self) -> bool {
        matches!(self, Self::Scalar | Self::Table | Self::Row | Self::Column)
    }
}

/// One `label(value)` entry of an enumeration or BITS list.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnumItem {
    pub label: String,
    pub value: i64,
}

impl EnumItem {
    #[must_use]
    pub fn new(label: impl Into<String>, value: i64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Inclusive value range or SIZE range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RangeItem {
    pub low: i64,
    pub high: i64,
}

impl RangeItem {
    #[must_use]
    pub const fn new(low: i64, high: i64) -> Self {
        Self { low, high }
    }

    #[must_use]
    pub const fn contains(&self, value: i64) -> bool {
        value >= self.low && value <= self.high
    }
}

/// One INDEX entry of a table row.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndexItem {
    pub label: String,
    pub implied: bool,
}

impl IndexItem {
    #[must_use]
    pub fn new(label: impl Into<String>, implied: bool) -> Self {
        Self {
            label: label.into(),
            implied,
        }
    }
}

/// Look up the label for an enumerated value.
#[must_use]
pub fn enum_label(items: &[EnumItem], value: i64) -> Option<&str> {
    items
        .iter()
        .find(|item| item.value == value)
        .map(|item| item.label.as_str())
}

/// Look up the value for an enumeration label.
#[must_use]
pub fn enum_value(items: &[EnumItem], label: &str) -> Option<i64> {
    items
        .iter()
        .find(|item| item.label == label)
        .map(|item| item.value)
}

/// A single fixed SIZE, if the range list pins the length to one value.
#[must_use]
pub fn fixed_size(ranges: &[RangeItem]) -> Option<usize> {
    match ranges {
        [only] if only.low == only.high => usize::try_from(only.low).ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_size() {
        assert_eq!(fixed_size(&[RangeItem::new(6, 6)]), Some(6));
        assert_eq!(fixed_size(&[RangeItem::new(0, 255)]), None);
        assert_eq!(
            fixed_size(&[RangeItem::new(4, 4), RangeItem::new(16, 16)]),
            None
        );
        assert_eq!(fixed_size(&[]), None);
    }

    #[test]
    fn test_enum_lookup() {
        let items = vec![EnumItem::new("up", 1), EnumItem::new("down", 2)];
        assert_eq!(enum_label(&items, 2), Some("down"));
        assert_eq!(enum_label(&items, 3), None);
        assert_eq!(enum_value(&items, "up"), Some(1));
    }

    #[test]
    fn test_integer_like() {
        assert!(AsnType::TimeTicks.is_integer_like());
        assert!(!AsnType::IpAddress.is_integer_like());
        assert!(AsnType::Opaque.is_octet_like());
    }
}
