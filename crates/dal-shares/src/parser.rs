use tracing::debug;

use crate::consts::SHARE_SIZE;
use crate::error::{DecodingError, ShareResult};
use crate::sequence::{SequenceBuilder, ShareSequence};
use crate::share::{decode_namespace, Share};

/// Decode raw share blocks into structured shares.
///
/// Padding shares and parity shares carry no blob data and are skipped.
/// Every remaining share must decode on its own, and together they must form
/// complete sequences: each declared length is backed by exactly the number
/// of shares it needs.
pub fn parse_shares<R: AsRef<[u8]>>(raw: &[R]) -> ShareResult<Vec<Share>> {
    let sequences = parse_sequences(raw)?;
    Ok(sequences
        .into_iter()
        .flat_map(ShareSequence::into_shares)
        .collect())
}

/// Decode raw share blocks and group them into per-blob sequences.
pub fn parse_sequences<R: AsRef<[u8]>>(raw: &[R]) -> ShareResult<Vec<ShareSequence>> {
    let mut sequences = Vec::new();
    let mut current: Option<SequenceBuilder> = None;
    let mut skipped = 0usize;

    for (index, block) in raw.iter().enumerate() {
        let block = block.as_ref();
        if decode_namespace(block)?.is_parity_shares() {
            if block.len() != SHARE_SIZE {
                return Err(DecodingError::InvalidShareSize {
                    expected: SHARE_SIZE,
                    actual: block.len(),
                }
                .into());
            }
            skipped += 1;
            continue;
        }
        let share = Share::from_bytes(block)?;

        if share.is_sequence_start() {
            if let Some(builder) = current.take() {
                sequences.push(builder.finish()?);
            }
            if share.is_padding() {
                skipped += 1;
                continue;
            }
            current = Some(SequenceBuilder::start(index, share));
        } else {
            match current.as_mut() {
                Some(builder) => builder.push(index, share)?,
                None => return Err(DecodingError::UnexpectedContinuation { index }.into()),
            }
        }
    }
    if let Some(builder) = current {
        sequences.push(builder.finish()?);
    }

    debug!(
        raw = raw.len(),
        sequences = sequences.len(),
        skipped,
        "parsed shares"
    );
    Ok(sequences)
}
