//! Padding shares: first shares that declare an empty sequence.
//!
//! Three flavours fill gaps in the data square: namespace padding after a
//! blob, reserved padding after reserved-namespace data, and tail padding
//! after the last blob.

use bytes::{BufMut, BytesMut};
use dal_types::{Namespace, PRIMARY_RESERVED_PADDING_NAMESPACE, TAIL_PADDING_NAMESPACE};

use crate::consts::{is_supported_share_version, SHARE_SIZE};
use crate::error::{EncodingError, ShareResult};
use crate::info::InfoByte;
use crate::share::Share;

/// A padding share in `namespace`, used to align the next blob.
pub fn namespace_padding_share(namespace: Namespace, share_version: u8) -> ShareResult<Share> {
    if !is_supported_share_version(share_version) {
        return Err(EncodingError::UnsupportedShareVersion(share_version).into());
    }
    let info = InfoByte::new(share_version, true)
        .ok_or(EncodingError::UnsupportedShareVersion(share_version))?;
    Ok(padding_share(namespace, info))
}

/// `count` namespace padding shares.
pub fn namespace_padding_shares(
    namespace: Namespace,
    share_version: u8,
    count: usize,
) -> ShareResult<Vec<Share>> {
    let share = namespace_padding_share(namespace, share_version)?;
    Ok(vec![share; count])
}

/// `count` padding shares in the primary reserved padding namespace.
pub fn reserved_padding_shares(count: usize) -> Vec<Share> {
    vec![version_zero_padding(PRIMARY_RESERVED_PADDING_NAMESPACE); count]
}

/// `count` padding shares in the tail padding namespace.
pub fn tail_padding_shares(count: usize) -> Vec<Share> {
    vec![version_zero_padding(TAIL_PADDING_NAMESPACE); count]
}

fn version_zero_padding(namespace: Namespace) -> Share {
    padding_share(namespace, InfoByte::SEQUENCE_START_V0)
}

fn padding_share(namespace: Namespace, info: InfoByte) -> Share {
    let mut buf = BytesMut::with_capacity(SHARE_SIZE);
    buf.put_slice(namespace.as_bytes());
    buf.put_u8(info.as_u8());
    buf.put_u32(0);
    buf.resize(SHARE_SIZE, 0);
    Share::from_parts(namespace, info, buf.freeze())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ShareError;
    use dal_types::NAMESPACE_SIZE;

    #[test]
    fn namespace_padding_layout() {
        let ns = Namespace::new_v0(&[0x42, 0x00]).unwrap();
        let share = namespace_padding_share(ns, 0).unwrap();
        assert!(share.is_padding());
        assert_eq!(share.namespace(), &ns);
        let raw = share.as_bytes();
        assert_eq!(raw.len(), SHARE_SIZE);
        assert_eq!(raw[NAMESPACE_SIZE], 0x01);
        assert!(raw[NAMESPACE_SIZE + 1..].iter().all(|b| *b == 0));
    }

    #[test]
    fn padding_decodes_back() {
        for share in tail_padding_shares(1)
            .into_iter()
            .chain(reserved_padding_shares(1))
        {
            let decoded = Share::from_bytes(share.as_bytes()).unwrap();
            assert!(decoded.is_padding());
            assert_eq!(decoded, share);
        }
    }

    #[test]
    fn tail_padding_namespace() {
        let shares = tail_padding_shares(3);
        assert_eq!(shares.len(), 3);
        assert!(shares.iter().all(|s| s.namespace().is_tail_padding()));
    }

    #[test]
    fn zero_count_is_empty() {
        assert!(reserved_padding_shares(0).is_empty());
        let ns = Namespace::new_v0(&[0x42, 0x00]).unwrap();
        assert!(namespace_padding_shares(ns, 0, 0).unwrap().is_empty());
    }

    #[test]
    fn unsupported_version_rejected() {
        let ns = Namespace::new_v0(&[0x42, 0x00]).unwrap();
        assert_eq!(
            namespace_padding_share(ns, 9).unwrap_err(),
            ShareError::Encoding(EncodingError::UnsupportedShareVersion(9))
        );
    }
}
