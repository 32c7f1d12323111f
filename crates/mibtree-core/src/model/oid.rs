//! Numeric object identifiers.

use std::fmt::{self, Write};
use std::ops::Deref;

/// A numeric OID path from one of the tree roots.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Oid {
    arcs: Vec<u32>,
}

impl Oid {
    #[must_use]
    pub fn new(arcs: Vec<u32>) -> Self {
        Self { arcs }
    }

    #[must_use]
    pub fn from_slice(arcs: &[u32]) -> Self {
        Self {
            arcs: arcs.to_vec(),
        }
    }

    /// Parse dotted notation. A single leading dot is accepted.
    #[must_use]
    pub fn from_dotted(s: &str) -> Option<Self> {
        let s = s.strip_prefix('.').unwrap_or(s);
        if s.is_empty() {
            return Some(Self::default());
        }
        s.split('.')
            .map(str::parse)
            .collect::<Result<Vec<u32>, _>>()
            .ok()
            .map(Self::new)
    }

    /// Dotted notation with a leading dot, e.g. `.1.3.6.1`.
    #[must_use]
    pub fn to_dotted(&self) -> String {
        let mut out = String::with_capacity(self.arcs.len() * 4);
        for arc in &self.arcs {
            // write! into a String cannot fail
            let _ = write!(out, ".{arc}");
        }
        out
    }

    /// All arcs except the last.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        match self.arcs.split_last() {
            Some((_, rest)) if !rest.is_empty() => Some(Self::from_slice(rest)),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_prefix_of(&self, other: &Self) -> bool {
        other.arcs.starts_with(&self.arcs)
    }

    #[must_use]
    pub fn arcs(&self) -> &[u32] {
        &self.arcs
    }

    #[must_use]
    pub fn child(&self, arc: u32) -> Self {
        let mut arcs = Vec::with_capacity(self.arcs.len() + 1);
        arcs.extend_from_slice(&self.arcs);
        arcs.push(arc);
        Self::new(arcs)
    }

    pub fn push(&mut self, arc: u32) {
        self.arcs.push(arc);
    }

    pub fn extend_from_slice(&mut self, arcs: &[u32]) {
        self.arcs.extend_from_slice(arcs);
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<u32> {
        self.arcs
    }
}

impl Deref for Oid {
    type Target = [u32];

    fn deref(&self) -> &[u32] {
        &self.arcs
    }
}

impl From<Vec<u32>> for Oid {
    fn from(arcs: Vec<u32>) -> Self {
        Self::new(arcs)
    }
}

impl From<&[u32]> for Oid {
    fn from(arcs: &[u32]) -> Self {
        Self::from_slice(arcs)
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_dotted())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_dotted_leading_dot() {
        let oid = Oid::from_dotted(".1.3.6.1").unwrap();
        assert_eq!(oid.arcs(), &[1, 3, 6, 1]);
        assert_eq!(Oid::from_dotted("1.3.6.1"), Some(oid));
    }

    #[test]
    fn test_from_dotted_invalid() {
        assert!(Oid::from_dotted("1.3.x.1").is_none());
        assert!(Oid::from_dotted("1..3").is_none());
    }

    #[test]
    fn test_to_dotted() {
        assert_eq!(Oid::new(vec![1, 3, 6, 1, 2, 1]).to_dotted(), ".1.3.6.1.2.1");
        assert_eq!(Oid::default().to_dotted(), "");
    }

    #[test]
    fn test_parent_and_child() {
        let oid = Oid::new(vec![1, 3, 6, 1]);
        assert_eq!(oid.parent().unwrap().arcs(), &[1, 3, 6]);
        assert_eq!(oid.child(2).arcs(), &[1, 3, 6, 1, 2]);
        assert!(Oid::new(vec![1]).parent().is_none());
    }

    #[test]
    fn test_is_prefix_of() {
        let prefix = Oid::new(vec![1, 3, 6]);
        let full = Oid::new(vec![1, 3, 6, 1, 2, 1]);
        assert!(prefix.is_prefix_of(&full));
        assert!(!full.is_prefix_of(&prefix));
    }
}
