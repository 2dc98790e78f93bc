use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Size of the namespace version prefix in bytes.
pub const NAMESPACE_VERSION_SIZE: usize = 1;

/// Size of the namespace identifier body in bytes.
pub const NAMESPACE_ID_SIZE: usize = 28;

/// Total namespace width: version prefix plus identifier.
pub const NAMESPACE_SIZE: usize = NAMESPACE_VERSION_SIZE + NAMESPACE_ID_SIZE;

/// Namespace version available to user blobs.
pub const NAMESPACE_VERSION_ZERO: u8 = 0;

/// Namespace version reserved for protocol use (parity and tail padding).
pub const NAMESPACE_VERSION_MAX: u8 = u8::MAX;

/// Number of leading zero bytes a version 0 identifier must carry.
pub const NAMESPACE_VERSION_ZERO_PREFIX_SIZE: usize = 18;

/// Number of user-controlled bytes in a version 0 identifier.
pub const NAMESPACE_VERSION_ZERO_ID_SIZE: usize =
    NAMESPACE_ID_SIZE - NAMESPACE_VERSION_ZERO_PREFIX_SIZE;

/// Namespace of the erasure-coded parity shares.
pub const PARITY_SHARES_NAMESPACE: Namespace = Namespace([0xFF; NAMESPACE_SIZE]);

/// Namespace used to pad the data square after the last blob.
pub const TAIL_PADDING_NAMESPACE: Namespace = Namespace::secondary_reserved(0xFE);

/// Namespace used to pad between reserved-namespace data and the first blob.
pub const PRIMARY_RESERVED_PADDING_NAMESPACE: Namespace = Namespace::primary_reserved(0xFF);

/// Highest namespace in the primary reserved range.
pub const MAX_PRIMARY_RESERVED_NAMESPACE: Namespace = Namespace::primary_reserved(0xFF);

/// Lowest namespace in the secondary reserved range.
pub const MIN_SECONDARY_RESERVED_NAMESPACE: Namespace = {
    let mut bytes = [0u8; NAMESPACE_SIZE];
    bytes[0] = NAMESPACE_VERSION_MAX;
    Namespace(bytes)
};

/// Versioned routing tag attached to every blob and share.
///
/// A `Namespace` is a fixed 29-byte value: one version byte followed by a
/// 28-byte identifier. Namespaces order lexicographically over all 29 bytes,
/// which is the order the namespaced Merkle tree expects its leaves in.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Namespace([u8; NAMESPACE_SIZE]);

impl Namespace {
    /// Create a namespace from a version byte and a full 28-byte identifier.
    pub fn new(version: u8, id: &[u8]) -> Result<Self, TypeError> {
        if id.len() != NAMESPACE_ID_SIZE {
            return Err(TypeError::InvalidLength {
                expected: NAMESPACE_ID_SIZE,
                actual: id.len(),
            });
        }
        let mut bytes = [0u8; NAMESPACE_SIZE];
        bytes[0] = version;
        bytes[NAMESPACE_VERSION_SIZE..].copy_from_slice(id);
        Ok(Self(bytes))
    }

    /// Create a version 0 namespace from up to 10 user bytes.
    ///
    /// The user bytes are right-aligned and left-padded with zeros, so the
    /// mandatory 18-byte zero prefix is always present.
    pub fn new_v0(sub_id: &[u8]) -> Result<Self, TypeError> {
        if sub_id.len() > NAMESPACE_VERSION_ZERO_ID_SIZE {
            return Err(TypeError::InvalidLength {
                expected: NAMESPACE_VERSION_ZERO_ID_SIZE,
                actual: sub_id.len(),
            });
        }
        let mut bytes = [0u8; NAMESPACE_SIZE];
        bytes[NAMESPACE_SIZE - sub_id.len()..].copy_from_slice(sub_id);
        Ok(Self(bytes))
    }

    /// Parse a namespace from exactly 29 raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TypeError> {
        let arr: [u8; NAMESPACE_SIZE] =
            bytes.try_into().map_err(|_| TypeError::InvalidLength {
                expected: NAMESPACE_SIZE,
                actual: bytes.len(),
            })?;
        Ok(Self(arr))
    }

    /// Create from a raw 29-byte array without validation.
    pub const fn from_raw(bytes: [u8; NAMESPACE_SIZE]) -> Self {
        Self(bytes)
    }

    const fn primary_reserved(last: u8) -> Self {
        let mut bytes = [0u8; NAMESPACE_SIZE];
        bytes[NAMESPACE_SIZE - 1] = last;
        Self(bytes)
    }

    const fn secondary_reserved(last: u8) -> Self {
        let mut bytes = [0xFF; NAMESPACE_SIZE];
        bytes[NAMESPACE_SIZE - 1] = last;
        Self(bytes)
    }

    /// The version byte.
    pub fn version(&self) -> u8 {
        self.0[0]
    }

    /// The 28-byte identifier following the version byte.
    pub fn id(&self) -> &[u8] {
        &self.0[NAMESPACE_VERSION_SIZE..]
    }

    /// All 29 bytes, version first.
    pub fn as_bytes(&self) -> &[u8; NAMESPACE_SIZE] {
        &self.0
    }

    /// Hex-encoded string of all 29 bytes.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Short hex form: version byte and the last four identifier bytes.
    pub fn short_hex(&self) -> String {
        format!(
            "{:02x}:{}",
            self.version(),
            hex::encode(&self.0[NAMESPACE_SIZE - 4..])
        )
    }

    /// Parse from a 58-character hex string.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// Returns `true` for namespaces at or below the primary reserved maximum.
    pub fn is_primary_reserved(&self) -> bool {
        *self <= MAX_PRIMARY_RESERVED_NAMESPACE
    }

    /// Returns `true` for namespaces at or above the secondary reserved minimum.
    pub fn is_secondary_reserved(&self) -> bool {
        *self >= MIN_SECONDARY_RESERVED_NAMESPACE
    }

    /// Returns `true` if the namespace belongs to either reserved range.
    pub fn is_reserved(&self) -> bool {
        self.is_primary_reserved() || self.is_secondary_reserved()
    }

    pub fn is_parity_shares(&self) -> bool {
        *self == PARITY_SHARES_NAMESPACE
    }

    pub fn is_tail_padding(&self) -> bool {
        *self == TAIL_PADDING_NAMESPACE
    }

    /// Check the rules a namespace must satisfy to carry a user blob.
    ///
    /// The namespace must be version 0, carry the 18-byte zero prefix, and
    /// lie outside both reserved ranges.
    pub fn validate_for_blob(&self) -> Result<(), TypeError> {
        if self.version() != NAMESPACE_VERSION_ZERO {
            return Err(TypeError::UnsupportedNamespaceVersion(self.version()));
        }
        if self.id()[..NAMESPACE_VERSION_ZERO_PREFIX_SIZE]
            .iter()
            .any(|b| *b != 0)
        {
            return Err(TypeError::InvalidVersionZeroPrefix {
                prefix: NAMESPACE_VERSION_ZERO_PREFIX_SIZE,
            });
        }
        if self.is_reserved() {
            return Err(TypeError::ReservedNamespace(self.to_hex()));
        }
        Ok(())
    }
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Namespace({})", self.short_hex())
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl From<[u8; NAMESPACE_SIZE]> for Namespace {
    fn from(bytes: [u8; NAMESPACE_SIZE]) -> Self {
        Self(bytes)
    }
}

impl From<Namespace> for [u8; NAMESPACE_SIZE] {
    fn from(ns: Namespace) -> Self {
        ns.0
    }
}

impl AsRef<[u8]> for Namespace {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
