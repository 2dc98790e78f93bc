//! Foundation types for the data-availability layer (DAL).
//!
//! This crate provides the namespace primitive shared by the share codec, the
//! state-access boundary and the node wiring. Every other DAL crate depends on
//! `dal-types`.
//!
//! # Key Types
//!
//! - [`Namespace`]: versioned 29-byte routing tag for blobs and shares
//! - [`TypeError`]: construction and validation failures
//!
//! Reserved namespaces used for padding and parity are constants in
//! [`namespace`].

pub mod error;
pub mod namespace;

pub use error::TypeError;
pub use namespace::{
    Namespace, MAX_PRIMARY_RESERVED_NAMESPACE, MIN_SECONDARY_RESERVED_NAMESPACE,
    NAMESPACE_ID_SIZE, NAMESPACE_SIZE, NAMESPACE_VERSION_MAX, NAMESPACE_VERSION_SIZE,
    NAMESPACE_VERSION_ZERO, NAMESPACE_VERSION_ZERO_ID_SIZE, NAMESPACE_VERSION_ZERO_PREFIX_SIZE,
    PARITY_SHARES_NAMESPACE, PRIMARY_RESERVED_PADDING_NAMESPACE, TAIL_PADDING_NAMESPACE,
};
