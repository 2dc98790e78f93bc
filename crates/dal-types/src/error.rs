use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    #[error("invalid byte length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("unsupported namespace version: {0}")]
    UnsupportedNamespaceVersion(u8),

    #[error("version 0 namespace id must start with {prefix} zero bytes")]
    InvalidVersionZeroPrefix { prefix: usize },

    #[error("namespace {0} is reserved")]
    ReservedNamespace(String),
}
