//! Error types.
//!
//! Lexer and parser problems are never errors here: they are collected as
//! [`Diagnostic`](crate::lexer::Diagnostic)s on the module record. These
//! enums cover the operations that return `Result`.

/// Failure to load one or more modules.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    #[error("cannot find module ({name})")]
    ModuleNotFound { name: String },
    #[error("{errors} syntax error(s) in module {module}")]
    Syntax { module: String, errors: usize },
    /// Summary of a bulk load.
    #[error("failed to load modules: {}", .modules.join(", "))]
    Failed { modules: Vec<String> },
    #[error("cannot read {path}: {message}")]
    Io { path: String, message: String },
}

/// Failure to translate between names and OIDs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("unknown module {0}")]
    UnknownModule(String),
    #[error("unknown object identifier: {0}")]
    UnknownLabel(String),
    #[error("bad sub-identifier {0:?}")]
    BadSubid(String),
    #[error("{label} has no INDEX")]
    NotARow { label: String },
    #[error("index {label} expects {expected}, found {found}")]
    IndexMismatch {
        label: String,
        expected: &'static str,
        found: String,
    },
    #[error("index {label} truncated")]
    IndexTruncated { label: String },
    #[error("{count} sub-identifier(s) left after the last index")]
    TrailingSubids { count: usize },
    #[error("no object matches {0}")]
    NoMatch(String),
    #[error("invalid regular expression: {0}")]
    BadPattern(String),
    #[error(transparent)]
    Hint(#[from] HintError),
}

/// Malformed DISPLAY-HINT, or text that does not fit a hint.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HintError {
    #[error("malformed display hint {hint:?}: {reason}")]
    Malformed { hint: String, reason: &'static str },
    #[error("value {text:?} does not match display hint {hint:?}")]
    Mismatch { hint: String, text: String },
}

/// Failure to render a value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    /// The output buffer is full and may not grow.
    #[error("output buffer full ({capacity} bytes)")]
    BufferFull { capacity: usize },
    #[error(transparent)]
    Hint(#[from] HintError),
    #[error("cannot parse {text:?} as {expected}")]
    BadValue { text: String, expected: &'static str },
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// Bad key or value for [`Settings::apply`](crate::settings::Settings::apply).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("unknown setting {0}")]
    UnknownKey(String),
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: String, value: String },
}
