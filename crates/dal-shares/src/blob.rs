use std::cmp::Ordering;

use bytes::Bytes;
use dal_types::Namespace;

use crate::error::{EncodingError, ShareResult};
use crate::splitter::sparse_shares_needed;

/// An application payload submitted under a namespace.
///
/// Blobs are immutable once constructed. Validation of the payload against
/// the share framing rules happens when the blob is split.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Blob {
    namespace: Namespace,
    data: Bytes,
    share_version: u8,
}

impl Blob {
    pub fn new(namespace: Namespace, data: impl Into<Bytes>, share_version: u8) -> Self {
        Self {
            namespace,
            data: data.into(),
            share_version,
        }
    }

    /// Build a blob from an untyped namespace, as received from a caller.
    pub fn from_raw_parts(
        namespace: &[u8],
        data: impl Into<Bytes>,
        share_version: u8,
    ) -> ShareResult<Self> {
        let namespace = Namespace::from_bytes(namespace).map_err(EncodingError::from)?;
        Ok(Self::new(namespace, data, share_version))
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn share_version(&self) -> u8 {
        self.share_version
    }

    /// Number of shares this blob occupies once split.
    pub fn share_count(&self) -> usize {
        sparse_shares_needed(self.data.len())
    }
}

/// Wire-ready projection of a [`Blob`], owned by the splitter.
///
/// The namespace is carried as its version byte and identifier body so the
/// ordering contract can compare identifiers alone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlobRecord {
    pub namespace_version: u8,
    pub namespace_id: Vec<u8>,
    pub data: Bytes,
    pub share_version: u8,
}

impl BlobRecord {
    /// Ordering used to lay blobs out in the data square.
    ///
    /// Compares namespace identifier bytes only; the version byte does not
    /// participate. Combined with a stable sort, records with equal
    /// identifiers keep their input order.
    pub fn cmp_by_namespace_id(&self, other: &Self) -> Ordering {
        self.namespace_id.cmp(&other.namespace_id)
    }
}

impl From<&Blob> for BlobRecord {
    fn from(blob: &Blob) -> Self {
        Self {
            namespace_version: blob.namespace.version(),
            namespace_id: blob.namespace.id().to_vec(),
            data: blob.data.clone(),
            share_version: blob.share_version,
        }
    }
}

/// Free-function form of [`BlobRecord::cmp_by_namespace_id`], usable with
/// `sort_by`.
pub fn compare_records(a: &BlobRecord, b: &BlobRecord) -> Ordering {
    a.cmp_by_namespace_id(b)
}
