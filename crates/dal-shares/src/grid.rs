//! Placement of flat share positions onto the 2-D erasure-coding grid.

use crate::error::{ShareError, ShareResult};

/// Map `flat_index` to its `(row, col)` cell in a grid `row_width` wide.
///
/// Rows are filled left to right, top to bottom.
pub fn locate(row_width: usize, flat_index: usize) -> ShareResult<(usize, usize)> {
    if row_width == 0 {
        return Err(ShareError::InvalidArgument(
            "row width must be positive".into(),
        ));
    }
    let row = flat_index / row_width;
    let col = flat_index - row * row_width;
    Ok((row, col))
}

/// Inverse of [`locate`]: the flat position of cell `(row, col)`.
pub fn flat_index(row_width: usize, row: usize, col: usize) -> ShareResult<usize> {
    if col >= row_width {
        return Err(ShareError::InvalidArgument(format!(
            "column {col} outside row width {row_width}"
        )));
    }
    row.checked_mul(row_width)
        .and_then(|base| base.checked_add(col))
        .ok_or_else(|| ShareError::InvalidArgument(format!("cell ({row}, {col}) overflows")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn first_row() {
        assert_eq!(locate(4, 0).unwrap(), (0, 0));
        assert_eq!(locate(4, 3).unwrap(), (0, 3));
    }

    #[test]
    fn wraps_to_next_row() {
        assert_eq!(locate(4, 4).unwrap(), (1, 0));
        assert_eq!(locate(4, 11).unwrap(), (2, 3));
    }

    #[test]
    fn width_one_is_a_column() {
        assert_eq!(locate(1, 7).unwrap(), (7, 0));
    }

    #[test]
    fn zero_width_rejected() {
        assert!(matches!(locate(0, 5), Err(ShareError::InvalidArgument(_))));
    }

    #[test]
    fn flat_index_rejects_wide_column() {
        assert!(flat_index(4, 0, 4).is_err());
        assert_eq!(flat_index(4, 2, 3).unwrap(), 11);
    }

    proptest! {
        #[test]
        fn locate_reconstructs_index(row_width in 1usize..4096, index in 0usize..1_000_000) {
            let (row, col) = locate(row_width, index).unwrap();
            prop_assert!(col < row_width);
            prop_assert_eq!(row_width * row + col, index);
            prop_assert_eq!(flat_index(row_width, row, col).unwrap(), index);
        }
    }
}
