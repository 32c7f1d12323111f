//! mibtree-core: SMIv1/SMIv2 MIB compiler and OID tree
//!
//! Parses MIB module text into a shared tree of named nodes, translates
//! between textual names and numeric OIDs, and renders SNMP values using the
//! type metadata of the tree. The crate performs no I/O; module text reaches
//! it through a [`ModuleSource`].
//!
//! ```
//! use mibtree_core::{Mib, Value, OutBuf};
//!
//! let mut mib = Mib::new();
//! mib.read_module("SNMPv2-TC").unwrap();
//! let oid = mib.resolve_name("SNMPv2-SMI::enterprises.9").unwrap();
//! assert_eq!(oid.to_dotted(), "1.3.6.1.4.1.9");
//!
//! let mut buf = OutBuf::growable();
//! mib.format_varbind(&oid, &Value::Integer(1), &mut buf).unwrap();
//! ```

pub mod error;
pub mod format;
pub mod hint;
pub mod lexer;
pub mod model;
pub mod parser;
pub mod registry;
pub mod resolve;
pub mod settings;
pub mod tc;

pub use error::{FormatError, HintError, LoadError, ResolveError, SettingsError};
pub use format::{OutBuf, Value, ValueMeta};
pub use hint::{IntegerHint, OctetHint};
pub use lexer::{CommentMode, Diagnostic, Severity};
pub use model::{
    Access, AsnType, LoadState, ModuleId, NodeId, NodeInfo, NodeKind, Oid, Status, TreeNode,
};
pub use registry::{BaseModule, CompatRule, MemorySource, Mib, ModuleSource, Orphan, SourceText};
pub use resolve::{IndexPart, IndexValue};
pub use settings::{OidFormat, Settings, StringOutput};
