use std::fmt;

use bytes::Bytes;
use dal_types::{Namespace, NAMESPACE_SIZE};

use crate::consts::{
    is_supported_share_version, INFO_BYTE_OFFSET, SEQUENCE_LEN_BYTES, SEQUENCE_LEN_OFFSET,
    SHARE_SIZE,
};
use crate::error::DecodingError;
use crate::info::InfoByte;

/// A fixed-width share with its header decoded.
///
/// Holding a `Share` guarantees the raw bytes are exactly [`SHARE_SIZE`] long
/// and the info byte names a supported share version.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Share {
    namespace: Namespace,
    info: InfoByte,
    raw: Bytes,
}

impl Share {
    /// Decode and validate a single raw share.
    pub fn from_bytes(raw: &[u8]) -> Result<Self, DecodingError> {
        let namespace = decode_namespace(raw)?;
        if raw.len() != SHARE_SIZE {
            return Err(DecodingError::InvalidShareSize {
                expected: SHARE_SIZE,
                actual: raw.len(),
            });
        }
        let info = InfoByte::from_byte(raw[INFO_BYTE_OFFSET]);
        if !is_supported_share_version(info.version()) {
            return Err(DecodingError::UnsupportedShareVersion {
                version: info.version(),
                info: info.as_u8(),
            });
        }
        Ok(Self {
            namespace,
            info,
            raw: Bytes::copy_from_slice(raw),
        })
    }

    /// Assemble a share the codec has just framed itself.
    pub(crate) fn from_parts(namespace: Namespace, info: InfoByte, raw: Bytes) -> Self {
        debug_assert_eq!(raw.len(), SHARE_SIZE);
        Self {
            namespace,
            info,
            raw,
        }
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    pub fn info(&self) -> InfoByte {
        self.info
    }

    pub fn share_version(&self) -> u8 {
        self.info.version()
    }

    pub fn is_sequence_start(&self) -> bool {
        self.info.is_sequence_start()
    }

    /// Declared byte length of the sequence. Only present on first shares.
    pub fn sequence_len(&self) -> Option<u32> {
        if !self.is_sequence_start() {
            return None;
        }
        let mut len = [0u8; SEQUENCE_LEN_BYTES];
        len.copy_from_slice(&self.raw[SEQUENCE_LEN_OFFSET..SEQUENCE_LEN_OFFSET + SEQUENCE_LEN_BYTES]);
        Some(u32::from_be_bytes(len))
    }

    /// A padding share starts a sequence that declares zero bytes.
    pub fn is_padding(&self) -> bool {
        self.sequence_len() == Some(0)
    }

    /// Bytes following the header: the blob payload plus any zero padding.
    pub fn payload(&self) -> &[u8] {
        let start = if self.is_sequence_start() {
            SEQUENCE_LEN_OFFSET + SEQUENCE_LEN_BYTES
        } else {
            SEQUENCE_LEN_OFFSET
        };
        &self.raw[start..]
    }

    /// The full raw share.
    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }

    pub fn into_bytes(self) -> Bytes {
        self.raw
    }
}

impl fmt::Debug for Share {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Share")
            .field("namespace", &self.namespace)
            .field("version", &self.share_version())
            .field("start", &self.is_sequence_start())
            .field("sequence_len", &self.sequence_len())
            .finish()
    }
}

impl AsRef<[u8]> for Share {
    fn as_ref(&self) -> &[u8] {
        &self.raw
    }
}

impl TryFrom<&[u8]> for Share {
    type Error = DecodingError;

    fn try_from(raw: &[u8]) -> Result<Self, Self::Error> {
        Self::from_bytes(raw)
    }
}

/// Read the namespace header of a raw share, failing if it is cut short.
pub(crate) fn decode_namespace(raw: &[u8]) -> Result<Namespace, DecodingError> {
    let header = raw
        .get(..NAMESPACE_SIZE)
        .ok_or(DecodingError::TruncatedNamespace {
            expected: NAMESPACE_SIZE,
            actual: raw.len(),
        })?;
    let mut bytes = [0u8; NAMESPACE_SIZE];
    bytes.copy_from_slice(header);
    Ok(Namespace::from_raw(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FIRST_SPARSE_SHARE_CONTENT_SIZE;

    fn raw_share(ns: &Namespace, info: u8, len: Option<u32>) -> Vec<u8> {
        let mut raw = Vec::with_capacity(SHARE_SIZE);
        raw.extend_from_slice(ns.as_bytes());
        raw.push(info);
        if let Some(len) = len {
            raw.extend_from_slice(&len.to_be_bytes());
        }
        raw.resize(SHARE_SIZE, 0xAB);
        raw
    }

    fn ns() -> Namespace {
        Namespace::new_v0(&[0x01, 0x02, 0x03]).unwrap()
    }

    #[test]
    fn decodes_first_share() {
        let share = Share::from_bytes(&raw_share(&ns(), 0x01, Some(42))).unwrap();
        assert_eq!(share.namespace(), &ns());
        assert!(share.is_sequence_start());
        assert_eq!(share.sequence_len(), Some(42));
        assert_eq!(share.share_version(), 0);
        assert_eq!(share.payload().len(), FIRST_SPARSE_SHARE_CONTENT_SIZE);
        assert!(!share.is_padding());
    }

    #[test]
    fn decodes_continuation_share() {
        let share = Share::from_bytes(&raw_share(&ns(), 0x00, None)).unwrap();
        assert!(!share.is_sequence_start());
        assert_eq!(share.sequence_len(), None);
        assert_eq!(share.payload().len(), SHARE_SIZE - NAMESPACE_SIZE - 1);
    }

    #[test]
    fn zero_length_start_is_padding() {
        let mut raw = raw_share(&ns(), 0x01, Some(0));
        raw[SEQUENCE_LEN_OFFSET + SEQUENCE_LEN_BYTES..].fill(0);
        let share = Share::from_bytes(&raw).unwrap();
        assert!(share.is_padding());
    }

    #[test]
    fn rejects_truncated_namespace() {
        let err = Share::from_bytes(&[0u8; 12]).unwrap_err();
        assert_eq!(
            err,
            DecodingError::TruncatedNamespace {
                expected: NAMESPACE_SIZE,
                actual: 12
            }
        );
    }

    #[test]
    fn rejects_wrong_size() {
        let mut raw = raw_share(&ns(), 0x01, Some(1));
        raw.truncate(SHARE_SIZE - 1);
        let err = Share::from_bytes(&raw).unwrap_err();
        assert!(matches!(err, DecodingError::InvalidShareSize { .. }));
    }

    #[test]
    fn rejects_unknown_version() {
        let err = Share::from_bytes(&raw_share(&ns(), 0x03, Some(1))).unwrap_err();
        assert_eq!(
            err,
            DecodingError::UnsupportedShareVersion {
                version: 1,
                info: 0x03
            }
        );
    }

    #[test]
    fn try_from_slice() {
        let raw = raw_share(&ns(), 0x01, Some(7));
        let share = Share::try_from(raw.as_slice()).unwrap();
        assert_eq!(share.as_bytes(), raw.as_slice());
        assert_eq!(share.into_bytes().len(), SHARE_SIZE);
    }
}
