//! Arena handles for tree nodes and modules.
//!
//! `NonZeroU32` keeps `Option<Id>` the same size as the id itself.

use std::fmt;
use std::num::NonZeroU32;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(NonZeroU32);

        impl $name {
            /// Create from a raw value (1-based).
            #[must_use]
            pub const fn from_raw(raw: u32) -> Option<Self> {
                match NonZeroU32::new(raw) {
                    Some(n) => Some(Self(n)),
                    None => None,
                }
            }

            /// Create from a 0-based arena slot.
            #[must_use]
            pub fn from_index(index: usize) -> Option<Self> {
                u32::try_from(index + 1).ok().and_then(Self::from_raw)
            }

            /// Raw value (1-based).
            #[must_use]
            pub const fn to_raw(self) -> u32 {
                self.0.get()
            }

            /// 0-based arena slot.
            #[must_use]
            pub const fn to_index(self) -> usize {
                (self.0.get() - 1) as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

define_id!(
    /// Module table handle. Stable for the lifetime of a registry.
    ModuleId,
    "module#"
);

define_id!(
    /// Tree node handle. Slots of pruned nodes are never reused.
    NodeId,
    "node#"
);
