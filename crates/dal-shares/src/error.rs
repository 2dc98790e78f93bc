use dal_types::{Namespace, TypeError};
use thiserror::Error;

/// Top-level codec error: one variant per failure class.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShareError {
    #[error("encoding error: {0}")]
    Encoding(#[from] EncodingError),

    #[error("decoding error: {0}")]
    Decoding(#[from] DecodingError),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Failures while turning blobs into shares.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncodingError {
    #[error("invalid namespace: {0}")]
    InvalidNamespace(#[from] TypeError),

    #[error("namespace {0} is reserved for parity shares")]
    ParityNamespace(Namespace),

    #[error("blob in namespace {namespace} has no data")]
    EmptyBlobData { namespace: Namespace },

    #[error("unsupported share version: {0}")]
    UnsupportedShareVersion(u8),

    #[error("blob of {size} bytes exceeds the sequence length limit of {max}")]
    BlobTooLarge { size: usize, max: usize },
}

/// Failures while turning raw bytes back into shares.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodingError {
    #[error("namespace header truncated: need {expected} bytes, got {actual}")]
    TruncatedNamespace { expected: usize, actual: usize },

    #[error("invalid share size: expected {expected}, got {actual}")]
    InvalidShareSize { expected: usize, actual: usize },

    #[error("unsupported share version {version} in info byte {info:#04x}")]
    UnsupportedShareVersion { version: u8, info: u8 },

    #[error("sequence in namespace {namespace} declares {declared} bytes but only {supplied} of {needed} shares were supplied")]
    TruncatedSequence {
        namespace: Namespace,
        declared: u32,
        supplied: usize,
        needed: usize,
    },

    #[error("sequence in namespace {namespace} declares {declared} bytes but continues past its last share at index {index}")]
    SequenceOverrun {
        namespace: Namespace,
        declared: u32,
        index: usize,
    },

    #[error("continuation share at index {index} has no preceding sequence start")]
    UnexpectedContinuation { index: usize },

    #[error("share at index {index} switches namespace mid-sequence: expected {expected}, got {actual}")]
    NamespaceMismatch {
        index: usize,
        expected: Namespace,
        actual: Namespace,
    },
}

pub type ShareResult<T> = Result<T, ShareError>;
