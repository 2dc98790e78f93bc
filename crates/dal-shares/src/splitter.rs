use bytes::{BufMut, Bytes, BytesMut};
use dal_types::Namespace;
use tracing::debug;

use crate::blob::{compare_records, Blob, BlobRecord};
use crate::consts::{
    is_supported_share_version, CONTINUATION_SPARSE_SHARE_CONTENT_SIZE,
    FIRST_SPARSE_SHARE_CONTENT_SIZE, SHARE_SIZE,
};
use crate::error::{EncodingError, ShareResult};
use crate::info::InfoByte;
use crate::share::Share;

/// Split blobs into a namespace-ordered run of shares.
///
/// Blobs are projected into [`BlobRecord`]s, stably sorted by namespace
/// identifier (see [`compare_records`]) and framed one sequence per blob. If
/// any blob violates the framing rules the whole batch fails and no shares
/// are returned.
pub fn split_blobs(blobs: &[Blob]) -> ShareResult<Vec<Share>> {
    let records = blobs.iter().map(BlobRecord::from).collect();
    split_records(records)
}

/// Sort already-projected records and frame them into shares.
pub fn split_records(mut records: Vec<BlobRecord>) -> ShareResult<Vec<Share>> {
    // `sort_by` is stable: equal namespace ids keep their input order.
    records.sort_by(compare_records);

    let capacity = records
        .iter()
        .map(|r| sparse_shares_needed(r.data.len()))
        .sum();
    let mut shares = Vec::with_capacity(capacity);
    for record in &records {
        write_sequence(record, &mut shares)?;
    }

    debug!(blobs = records.len(), shares = shares.len(), "split blobs into shares");
    Ok(shares)
}

/// Number of shares a payload of `len` bytes occupies.
pub fn sparse_shares_needed(len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    if len <= FIRST_SPARSE_SHARE_CONTENT_SIZE {
        return 1;
    }
    let rest = len - FIRST_SPARSE_SHARE_CONTENT_SIZE;
    1 + rest.div_ceil(CONTINUATION_SPARSE_SHARE_CONTENT_SIZE)
}

/// Flatten shares into raw byte blocks for the grid layer.
pub fn shares_to_bytes(shares: &[Share]) -> Vec<Bytes> {
    shares.iter().map(|s| s.clone().into_bytes()).collect()
}

fn write_sequence(record: &BlobRecord, out: &mut Vec<Share>) -> Result<(), EncodingError> {
    let namespace = Namespace::new(record.namespace_version, &record.namespace_id)?;
    // Parity-namespace shares are skipped on parse.
    if namespace.is_parity_shares() {
        return Err(EncodingError::ParityNamespace(namespace));
    }
    if record.data.is_empty() {
        return Err(EncodingError::EmptyBlobData { namespace });
    }
    if !is_supported_share_version(record.share_version) {
        return Err(EncodingError::UnsupportedShareVersion(record.share_version));
    }
    let sequence_len = u32::try_from(record.data.len()).map_err(|_| EncodingError::BlobTooLarge {
        size: record.data.len(),
        max: u32::MAX as usize,
    })?;
    let first_info = InfoByte::new(record.share_version, true)
        .ok_or(EncodingError::UnsupportedShareVersion(record.share_version))?;
    let continuation_info = InfoByte::new(record.share_version, false)
        .ok_or(EncodingError::UnsupportedShareVersion(record.share_version))?;

    let mut remaining: &[u8] = &record.data;
    let mut first = true;
    while !remaining.is_empty() {
        let mut buf = BytesMut::with_capacity(SHARE_SIZE);
        buf.put_slice(namespace.as_bytes());
        let (info, capacity) = if first {
            buf.put_u8(first_info.as_u8());
            buf.put_u32(sequence_len);
            (first_info, FIRST_SPARSE_SHARE_CONTENT_SIZE)
        } else {
            buf.put_u8(continuation_info.as_u8());
            (continuation_info, CONTINUATION_SPARSE_SHARE_CONTENT_SIZE)
        };

        let take = remaining.len().min(capacity);
        let (chunk, rest) = remaining.split_at(take);
        buf.put_slice(chunk);
        buf.resize(SHARE_SIZE, 0);
        remaining = rest;
        first = false;

        out.push(Share::from_parts(namespace, info, buf.freeze()));
    }
    Ok(())
}
