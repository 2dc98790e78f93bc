//! Blob-to-share codec for the data-availability layer.
//!
//! Turns namespaced blobs into the fixed-width shares consumed by the
//! namespaced Merkle tree and the erasure-coding grid, and back again.
//!
//! # Architecture
//!
//! - **Splitter** ([`split_blobs`]): projects blobs into [`BlobRecord`]s,
//!   stably sorts them by namespace identifier and frames each into a share
//!   sequence
//! - **Parser** ([`parse_shares`], [`parse_sequences`]): validates raw shares,
//!   skips padding and regroups sequences so blob data can be reassembled
//! - **Grid indexer** ([`locate`]): maps a flat share position to its
//!   `(row, col)` cell
//!
//! # Share layout
//!
//! ```text
//! first share:        | namespace (29) | info (1) | sequence len (4, BE) | payload (478) |
//! continuation share: | namespace (29) | info (1) | payload (482)                        |
//! ```
//!
//! The final share of a sequence is zero-padded to [`SHARE_SIZE`]. All
//! functions are pure and safe to call from any number of threads.

pub mod blob;
pub mod consts;
pub mod error;
pub mod grid;
pub mod info;
pub mod padding;
pub mod parser;
pub mod sequence;
pub mod share;
pub mod splitter;

pub use blob::{compare_records, Blob, BlobRecord};
pub use consts::{
    CONTINUATION_SPARSE_SHARE_CONTENT_SIZE, FIRST_SPARSE_SHARE_CONTENT_SIZE, MAX_SHARE_VERSION,
    SEQUENCE_LEN_BYTES, SHARE_INFO_BYTES, SHARE_SIZE, SHARE_VERSION_ZERO,
    SUPPORTED_SHARE_VERSIONS,
};
pub use error::{DecodingError, EncodingError, ShareError, ShareResult};
pub use grid::{flat_index, locate};
pub use info::InfoByte;
pub use padding::{
    namespace_padding_share, namespace_padding_shares, reserved_padding_shares,
    tail_padding_shares,
};
pub use parser::{parse_sequences, parse_shares};
pub use sequence::ShareSequence;
pub use share::Share;
pub use splitter::{shares_to_bytes, sparse_shares_needed, split_blobs, split_records};
