use dal_types::Namespace;

use crate::error::{DecodingError, ShareResult};
use crate::grid::locate;
use crate::share::Share;
use crate::splitter::sparse_shares_needed;

/// The run of shares carrying one blob, as recovered by the parser.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShareSequence {
    namespace: Namespace,
    share_version: u8,
    sequence_len: u32,
    start_index: usize,
    shares: Vec<Share>,
}

impl ShareSequence {
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    pub fn share_version(&self) -> u8 {
        self.share_version
    }

    /// Byte length declared by the first share.
    pub fn sequence_len(&self) -> u32 {
        self.sequence_len
    }

    /// Position of the first share in the raw input, padding included.
    pub fn start_index(&self) -> usize {
        self.start_index
    }

    pub fn shares(&self) -> &[Share] {
        &self.shares
    }

    pub fn into_shares(self) -> Vec<Share> {
        self.shares
    }

    /// Reassemble the blob payload, dropping the trailing zero padding.
    pub fn data(&self) -> Vec<u8> {
        let len = self.sequence_len as usize;
        let mut data = Vec::with_capacity(len);
        for share in &self.shares {
            let missing = len - data.len();
            let payload = share.payload();
            data.extend_from_slice(&payload[..payload.len().min(missing)]);
        }
        data
    }

    /// Number of zero bytes padding out the final share.
    pub fn padding_len(&self) -> usize {
        let capacity: usize = self.shares.iter().map(|s| s.payload().len()).sum();
        capacity - self.sequence_len as usize
    }

    /// Grid cell of the sequence's first share for a square of `row_width`.
    pub fn position(&self, row_width: usize) -> ShareResult<(usize, usize)> {
        locate(row_width, self.start_index)
    }
}

/// Accumulates shares of one sequence while the parser walks raw input.
pub(crate) struct SequenceBuilder {
    namespace: Namespace,
    share_version: u8,
    sequence_len: u32,
    start_index: usize,
    needed: usize,
    shares: Vec<Share>,
}

impl SequenceBuilder {
    /// Open a sequence on a non-padding first share.
    pub(crate) fn start(index: usize, share: Share) -> Self {
        let sequence_len = share.sequence_len().unwrap_or_default();
        let needed = sparse_shares_needed(sequence_len as usize);
        Self {
            namespace: *share.namespace(),
            share_version: share.share_version(),
            sequence_len,
            start_index: index,
            needed,
            shares: vec![share],
        }
    }

    /// Append a continuation share found at `index`.
    pub(crate) fn push(&mut self, index: usize, share: Share) -> Result<(), DecodingError> {
        if *share.namespace() != self.namespace {
            return Err(DecodingError::NamespaceMismatch {
                index,
                expected: self.namespace,
                actual: *share.namespace(),
            });
        }
        if self.shares.len() >= self.needed {
            return Err(DecodingError::SequenceOverrun {
                namespace: self.namespace,
                declared: self.sequence_len,
                index,
            });
        }
        self.shares.push(share);
        Ok(())
    }

    /// Close the sequence, failing if the declared length needs more shares.
    pub(crate) fn finish(self) -> Result<ShareSequence, DecodingError> {
        if self.shares.len() < self.needed {
            return Err(DecodingError::TruncatedSequence {
                namespace: self.namespace,
                declared: self.sequence_len,
                supplied: self.shares.len(),
                needed: self.needed,
            });
        }
        Ok(ShareSequence {
            namespace: self.namespace,
            share_version: self.share_version,
            sequence_len: self.sequence_len,
            start_index: self.start_index,
            shares: self.shares,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::Blob;
    use crate::consts::{CONTINUATION_SPARSE_SHARE_CONTENT_SIZE, FIRST_SPARSE_SHARE_CONTENT_SIZE};
    use crate::splitter::split_blobs;

    fn split_one(len: usize) -> Vec<Share> {
        let ns = Namespace::new_v0(&[0x0A, 0x00]).unwrap();
        let data: Vec<u8> = (0..len).map(|i| (i % 200) as u8 + 1).collect();
        split_blobs(&[Blob::new(ns, data, 0)]).unwrap()
    }

    fn build(shares: Vec<Share>) -> Result<ShareSequence, DecodingError> {
        let mut iter = shares.into_iter().enumerate();
        let (index, first) = iter.next().unwrap();
        let mut builder = SequenceBuilder::start(index, first);
        for (index, share) in iter {
            builder.push(index, share)?;
        }
        builder.finish()
    }

    #[test]
    fn complete_sequence_reassembles() {
        let sequence = build(split_one(700)).unwrap();
        assert_eq!(sequence.sequence_len(), 700);
        assert_eq!(sequence.shares().len(), 2);
        let data = sequence.data();
        assert_eq!(data.len(), 700);
        assert_eq!(data[0], 1);
        assert_eq!(
            sequence.padding_len(),
            FIRST_SPARSE_SHARE_CONTENT_SIZE + CONTINUATION_SPARSE_SHARE_CONTENT_SIZE - 700
        );
    }

    #[test]
    fn exact_fit_has_no_padding() {
        let len = FIRST_SPARSE_SHARE_CONTENT_SIZE + CONTINUATION_SPARSE_SHARE_CONTENT_SIZE;
        let sequence = build(split_one(len)).unwrap();
        assert_eq!(sequence.shares().len(), 2);
        assert_eq!(sequence.padding_len(), 0);
    }

    #[test]
    fn missing_share_is_truncated() {
        let mut shares = split_one(1200);
        shares.pop();
        let err = build(shares).unwrap_err();
        assert!(matches!(
            err,
            DecodingError::TruncatedSequence {
                declared: 1200,
                supplied: 2,
                needed: 3,
                ..
            }
        ));
    }

    #[test]
    fn extra_share_is_overrun() {
        let mut shares = split_one(100);
        let extra = split_one(1000).remove(1);
        shares.push(extra);
        let err = build(shares).unwrap_err();
        assert!(matches!(err, DecodingError::SequenceOverrun { index: 1, .. }));
    }

    #[test]
    fn foreign_namespace_rejected() {
        let mut shares = split_one(1000);
        let other_ns = Namespace::new_v0(&[0x0B, 0x00]).unwrap();
        let foreign = split_blobs(&[Blob::new(other_ns, vec![1u8; 1000], 0)])
            .unwrap()
            .remove(1);
        shares[1] = foreign;
        let err = build(shares).unwrap_err();
        assert!(matches!(err, DecodingError::NamespaceMismatch { index: 1, .. }));
    }

    #[test]
    fn position_uses_start_index() {
        let shares = split_one(10);
        let sequence = SequenceBuilder::start(9, shares[0].clone()).finish().unwrap();
        assert_eq!(sequence.start_index(), 9);
        assert_eq!(sequence.position(4).unwrap(), (2, 1));
    }
}
