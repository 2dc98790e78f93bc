//! Wire constants of the sparse share format.

use dal_types::NAMESPACE_SIZE;

/// Total width of every share in bytes.
pub const SHARE_SIZE: usize = 512;

/// Width of the info byte following the namespace.
pub const SHARE_INFO_BYTES: usize = 1;

/// Width of the big-endian sequence length carried by the first share.
pub const SEQUENCE_LEN_BYTES: usize = 4;

/// Highest share version the 7-bit info field can express.
pub const MAX_SHARE_VERSION: u8 = 127;

/// The first, and currently only, share format version.
pub const SHARE_VERSION_ZERO: u8 = 0;

/// Share versions this codec knows how to frame and parse.
pub const SUPPORTED_SHARE_VERSIONS: &[u8] = &[SHARE_VERSION_ZERO];

/// Offset of the info byte within a share.
pub const INFO_BYTE_OFFSET: usize = NAMESPACE_SIZE;

/// Offset of the sequence length field within a first share.
pub const SEQUENCE_LEN_OFFSET: usize = INFO_BYTE_OFFSET + SHARE_INFO_BYTES;

/// Payload bytes available in the first share of a sequence.
pub const FIRST_SPARSE_SHARE_CONTENT_SIZE: usize =
    SHARE_SIZE - NAMESPACE_SIZE - SHARE_INFO_BYTES - SEQUENCE_LEN_BYTES;

/// Payload bytes available in every later share of a sequence.
pub const CONTINUATION_SPARSE_SHARE_CONTENT_SIZE: usize =
    SHARE_SIZE - NAMESPACE_SIZE - SHARE_INFO_BYTES;

/// Returns `true` if `version` is one of [`SUPPORTED_SHARE_VERSIONS`].
pub fn is_supported_share_version(version: u8) -> bool {
    SUPPORTED_SHARE_VERSIONS.contains(&version)
}
