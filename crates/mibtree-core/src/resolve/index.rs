//! Table index codec.
//!
//! A row's INDEX list determines how the sub-identifiers after a column
//! OID split into typed values:
//!
//! | index syntax               | sub-identifiers                      |
//! |----------------------------|--------------------------------------|
//! | INTEGER-like               | 1                                    |
//! | IpAddress, NetworkAddress  | 4                                    |
//! | OCTET STRING, IMPLIED      | all remaining                        |
//! | OCTET STRING, SIZE(n)      | n                                    |
//! | OCTET STRING               | length, then that many               |
//! | OBJECT IDENTIFIER          | all remaining if IMPLIED, else length-prefixed |
//!
//! [`Mib::decompose_index`] and [`Mib::compose_index`] are exact inverses.

use crate::error::ResolveError;
use crate::hint::{HintField, OctetHint};
use crate::model::{
    enum_label, fixed_size, AsnType, EnumItem, IndexItem, NodeId, NodeKind, Oid, RangeItem,
};
use crate::registry::Mib;

use super::Component;

/// AUGMENTS chains longer than this are treated as cycles.
const MAX_AUGMENTS_DEPTH: usize = 8;

/// One decoded index value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IndexValue {
    Integer(u32),
    IpAddress([u8; 4]),
    Octets(Vec<u8>),
    Oid(Oid),
}

impl IndexValue {
    const fn kind(&self) -> &'static str {
        match self {
            Self::Integer(_) => "integer",
            Self::IpAddress(_) => "IpAddress",
            Self::Octets(_) => "octet string",
            Self::Oid(_) => "object identifier",
        }
    }
}

/// A decoded index value with the metadata of its index object.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexPart {
    pub label: String,
    pub node: NodeId,
    pub value: IndexValue,
    pub syntax: AsnType,
    pub hint: Option<String>,
    pub enums: Vec<EnumItem>,
}

impl IndexPart {
    /// Hint fields of an octet-string value. A missing or malformed hint
    /// yields one number per byte.
    #[must_use]
    pub fn fields(&self) -> Vec<HintField> {
        match &self.value {
            IndexValue::Octets(bytes) => match self.hint.as_deref().map(OctetHint::parse) {
                Some(Ok(hint)) => hint.fields(bytes),
                _ => bytes.iter().map(|&b| HintField::Number(u64::from(b))).collect(),
            },
            IndexValue::Integer(v) => vec![HintField::Number(u64::from(*v))],
            IndexValue::IpAddress(ip) => {
                ip.iter().map(|&b| HintField::Number(u64::from(b))).collect()
            }
            IndexValue::Oid(oid) => oid.iter().map(|&a| HintField::Number(u64::from(a))).collect(),
        }
    }
}

/// Shape of one INDEX object.
#[derive(Clone, Debug)]
pub(crate) struct IndexShape {
    pub label: String,
    pub node: NodeId,
    pub implied: bool,
    pub syntax: AsnType,
    pub ranges: Vec<RangeItem>,
    pub hint: Option<String>,
    pub enums: Vec<EnumItem>,
}

impl Mib {
    /// Row that defines the index of `id`: the node itself if it is a row,
    /// its parent if it is a column.
    #[must_use]
    pub fn index_row(&self, id: NodeId) -> Option<NodeId> {
        let node = self.tree.get(id)?;
        match node.info.kind {
            NodeKind::Row => Some(id),
            NodeKind::Column => node.parent,
            _ => None,
        }
    }

    /// INDEX entries in effect for a row, following AUGMENTS.
    pub fn index_items(&self, row: NodeId) -> Result<Vec<IndexItem>, ResolveError> {
        let mut current = row;
        for _ in 0..MAX_AUGMENTS_DEPTH {
            let node = self
                .tree
                .get(current)
                .ok_or_else(|| ResolveError::UnknownLabel(format!("{current}")))?;
            if !node.info.indexes.is_empty() {
                return Ok(node.info.indexes.clone());
            }
            let Some(target) = &node.info.augments else {
                break;
            };
            current = node
                .module
                .and_then(|m| self.tree.find_in_module(target, m))
                .or_else(|| self.tree.find(target))
                .ok_or_else(|| ResolveError::UnknownLabel(target.clone()))?;
        }
        let label = self.tree.get(row).map(|n| n.label.clone()).unwrap_or_default();
        Err(ResolveError::NotARow { label })
    }

    pub(crate) fn index_shapes(&self, row: NodeId) -> Result<Vec<IndexShape>, ResolveError> {
        let module = self.tree.get(row).and_then(|n| n.module);
        self.index_items(row)?
            .into_iter()
            .map(|item| {
                let node = module
                    .and_then(|m| self.tree.find_in_module(&item.label, m))
                    .or_else(|| self.tree.find(&item.label))
                    .ok_or_else(|| ResolveError::UnknownLabel(item.label.clone()))?;
                let info = self
                    .tree
                    .get(node)
                    .map(|n| n.info.clone())
                    .unwrap_or_default();
                Ok(IndexShape {
                    label: item.label,
                    node,
                    implied: item.implied,
                    syntax: info.syntax,
                    ranges: info.ranges,
                    hint: info.hint,
                    enums: info.enums,
                })
            })
            .collect()
    }

    /// Split the sub-identifiers following a row or column OID into index
    /// values. Every sub-identifier must be consumed.
    pub fn decompose_index(
        &self,
        row: NodeId,
        subids: &[u32],
    ) -> Result<Vec<IndexPart>, ResolveError> {
        let shapes = self.index_shapes(row)?;
        let mut rest = subids;
        let mut parts = Vec::with_capacity(shapes.len());

        for shape in shapes {
            let (value, used) = self.decode_one(&shape, rest)?;
            rest = &rest[used..];
            parts.push(IndexPart {
                label: shape.label,
                node: shape.node,
                value,
                syntax: shape.syntax,
                hint: shape.hint,
                enums: shape.enums,
            });
        }

        if rest.is_empty() {
            Ok(parts)
        } else {
            Err(ResolveError::TrailingSubids { count: rest.len() })
        }
    }

    /// Decode one index value from the front of `rest`. Returns the value
    /// and the number of sub-identifiers it used.
    fn decode_one(
        &self,
        shape: &IndexShape,
        rest: &[u32],
    ) -> Result<(IndexValue, usize), ResolveError> {
        let truncated = || ResolveError::IndexTruncated {
            label: shape.label.clone(),
        };
        match shape.syntax {
            t if t.is_integer_like() => {
                let &first = rest.first().ok_or_else(truncated)?;
                Ok((IndexValue::Integer(first), 1))
            }
            AsnType::IpAddress | AsnType::NetAddress => {
                let arcs = rest.get(..4).ok_or_else(truncated)?;
                let mut ip = [0u8; 4];
                for (byte, &arc) in ip.iter_mut().zip(arcs) {
                    *byte = octet(&shape.label, arc)?;
                }
                Ok((IndexValue::IpAddress(ip), 4))
            }
            t if t.is_octet_like() => {
                let (len, skip) = length_of(shape, rest)?;
                let arcs = rest.get(skip..skip + len).ok_or_else(truncated)?;
                let bytes = arcs
                    .iter()
                    .map(|&arc| octet(&shape.label, arc))
                    .collect::<Result<Vec<u8>, _>>()?;
                Ok((IndexValue::Octets(bytes), skip + len))
            }
            AsnType::ObjectId => {
                let (len, skip) = length_of(shape, rest)?;
                let arcs = rest.get(skip..skip + len).ok_or_else(truncated)?;
                Ok((IndexValue::Oid(Oid::from_slice(arcs)), skip + len))
            }
            other => Err(ResolveError::IndexMismatch {
                label: shape.label.clone(),
                expected: "a supported index syntax",
                found: other.to_string(),
            }),
        }
    }

    /// Build the sub-identifiers for `values` under a row's INDEX.
    pub fn compose_index(
        &self,
        row: NodeId,
        values: &[IndexValue],
    ) -> Result<Vec<u32>, ResolveError> {
        let shapes = self.index_shapes(row)?;
        if values.len() != shapes.len() {
            return Err(ResolveError::IndexMismatch {
                label: self.tree.get(row).map(|n| n.label.clone()).unwrap_or_default(),
                expected: "one value per INDEX entry",
                found: format!("{} value(s)", values.len()),
            });
        }

        let mut out = Vec::new();
        for (shape, value) in shapes.iter().zip(values) {
            let mismatch = |expected| ResolveError::IndexMismatch {
                label: shape.label.clone(),
                expected,
                found: value.kind().to_string(),
            };
            match (shape.syntax, value) {
                (t, IndexValue::Integer(v)) if t.is_integer_like() => out.push(*v),
                (AsnType::IpAddress | AsnType::NetAddress, IndexValue::IpAddress(ip)) => {
                    out.extend(ip.iter().map(|&b| u32::from(b)));
                }
                (t, IndexValue::Octets(bytes)) if t.is_octet_like() => {
                    match fixed_size(&shape.ranges) {
                        _ if shape.implied => {}
                        Some(size) if size == bytes.len() => {}
                        Some(_) => return Err(mismatch("the fixed SIZE")),
                        None => out.push(length(bytes.len())),
                    }
                    out.extend(bytes.iter().map(|&b| u32::from(b)));
                }
                (AsnType::ObjectId, IndexValue::Oid(oid)) => {
                    if !shape.implied {
                        out.push(length(oid.len()));
                    }
                    out.extend_from_slice(oid);
                }
                (t, _) if t.is_integer_like() => return Err(mismatch("integer")),
                (AsnType::IpAddress | AsnType::NetAddress, _) => {
                    return Err(mismatch("IpAddress"))
                }
                (t, _) if t.is_octet_like() => return Err(mismatch("octet string")),
                (AsnType::ObjectId, _) => return Err(mismatch("object identifier")),
                _ => return Err(mismatch("a supported index syntax")),
            }
        }
        Ok(out)
    }

    /// `[a][b]` form of decoded index values. `None` when a value has no
    /// bracketed form that reads back unchanged.
    pub(crate) fn bracketed_index(&self, parts: &[IndexPart]) -> Option<String> {
        let mut out = String::new();
        for part in parts {
            let text = match &part.value {
                IndexValue::Integer(v) => {
                    match enum_label(&part.enums, i64::from(*v)) {
                        Some(label) => label.to_string(),
                        None => v.to_string(),
                    }
                }
                IndexValue::IpAddress(ip) => format!("{}.{}.{}.{}", ip[0], ip[1], ip[2], ip[3]),
                IndexValue::Octets(bytes) => {
                    let text = std::str::from_utf8(bytes).ok()?;
                    if text.is_empty()
                        || !text.chars().all(|c| c.is_ascii_graphic() || c == ' ')
                        || text.contains(['"', '[', ']'])
                    {
                        return None;
                    }
                    format!("\"{text}\"")
                }
                IndexValue::Oid(oid) => {
                    if oid.is_empty() {
                        return None;
                    }
                    oid.to_dotted()
                }
            };
            out.push('[');
            out.push_str(&text);
            out.push(']');
        }
        Some(out)
    }

    /// Encode index components written after a column name: quoted or
    /// bracketed values, enum labels, or plain sub-identifiers.
    pub(crate) fn parse_index_components(
        &self,
        row: NodeId,
        components: &[Component],
    ) -> Result<Vec<u32>, ResolveError> {
        let shapes = self.index_shapes(row)?;
        let mut rest = components;
        let mut values = Vec::with_capacity(shapes.len());

        for shape in &shapes {
            let Some((first, tail)) = rest.split_first() else {
                return Err(ResolveError::IndexTruncated {
                    label: shape.label.clone(),
                });
            };
            if let Component::Plain(text) = first {
                if !shape.syntax.is_integer_like() && text.parse::<u32>().is_ok() {
                    let numbers: Vec<u32> = rest
                        .iter()
                        .map_while(|c| match c {
                            Component::Plain(t) => t.parse::<u32>().ok(),
                            _ => None,
                        })
                        .collect();
                    let (value, used) = self.decode_one(shape, &numbers)?;
                    values.push(value);
                    rest = &rest[used..];
                    continue;
                }
            }
            values.push(self.parse_index_value(shape, &first.text())?);
            rest = tail;
        }

        if !rest.is_empty() {
            return Err(ResolveError::TrailingSubids { count: rest.len() });
        }
        self.compose_index(row, &values)
    }

    fn parse_index_value(&self, shape: &IndexShape, text: &str) -> Result<IndexValue, ResolveError> {
        let mismatch = |expected| ResolveError::IndexMismatch {
            label: shape.label.clone(),
            expected,
            found: text.to_string(),
        };
        match shape.syntax {
            t if t.is_integer_like() => {
                if let Ok(v) = text.parse::<u32>() {
                    return Ok(IndexValue::Integer(v));
                }
                shape
                    .enums
                    .iter()
                    .find(|item| item.label == text)
                    .and_then(|item| u32::try_from(item.value).ok())
                    .map(IndexValue::Integer)
                    .ok_or_else(|| mismatch("integer or enumeration label"))
            }
            AsnType::IpAddress | AsnType::NetAddress => text
                .parse::<std::net::Ipv4Addr>()
                .map(|ip| IndexValue::IpAddress(ip.octets()))
                .map_err(|_| mismatch("dotted IPv4 address")),
            t if t.is_octet_like() => {
                if let Some(quoted) = text.strip_prefix('"').and_then(|t| t.strip_suffix('"')) {
                    return Ok(IndexValue::Octets(quoted.as_bytes().to_vec()));
                }
                match shape.hint.as_deref() {
                    Some(hint) => Ok(IndexValue::Octets(OctetHint::parse(hint)?.encode(text)?)),
                    None => Ok(IndexValue::Octets(text.as_bytes().to_vec())),
                }
            }
            AsnType::ObjectId => {
                let inner = text
                    .strip_prefix('"')
                    .and_then(|t| t.strip_suffix('"'))
                    .unwrap_or(text);
                Ok(IndexValue::Oid(self.resolve_name(inner)?))
            }
            _ => Err(mismatch("a supported index syntax")),
        }
    }
}

/// Element count and prefix length of a variable-length index value.
fn length_of(shape: &IndexShape, rest: &[u32]) -> Result<(usize, usize), ResolveError> {
    if shape.implied {
        return Ok((rest.len(), 0));
    }
    if shape.syntax != AsnType::ObjectId {
        if let Some(size) = fixed_size(&shape.ranges) {
            return Ok((size, 0));
        }
    }
    let &len = rest.first().ok_or_else(|| ResolveError::IndexTruncated {
        label: shape.label.clone(),
    })?;
    let len = usize::try_from(len).map_err(|_| ResolveError::IndexTruncated {
        label: shape.label.clone(),
    })?;
    if len > rest.len() - 1 {
        return Err(ResolveError::IndexTruncated {
            label: shape.label.clone(),
        });
    }
    Ok((len, 1))
}

fn octet(label: &str, arc: u32) -> Result<u8, ResolveError> {
    u8::try_from(arc).map_err(|_| ResolveError::IndexMismatch {
        label: label.to_string(),
        expected: "octet value 0..255",
        found: arc.to_string(),
    })
}

fn length(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}
