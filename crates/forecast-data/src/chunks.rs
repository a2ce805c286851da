//! Splitting a dataset along its time axis.

use std::ops::Range;

use crate::dataset::Dataset;
use crate::error::{DataError, DataResult};

/// Contiguous ranges of at most `chunk_size` covering `0..len`.
pub fn chunk_ranges(len: usize, chunk_size: usize) -> DataResult<Vec<Range<usize>>> {
    if chunk_size == 0 {
        return Err(DataError::InvalidChunkSize);
    }
    Ok((0..len)
        .step_by(chunk_size)
        .map(|start| start..(start + chunk_size).min(len))
        .collect())
}

/// Partition a dataset into independent sub-datasets of `chunk_size` timesteps.
///
/// Chunks are disjoint, ordered, and together cover the full time axis.
pub fn chunks_dataset(dataset: &Dataset, chunk_size: usize) -> DataResult<Vec<Dataset>> {
    let ranges = chunk_ranges(dataset.len(), chunk_size)?;
    tracing::debug!(
        timesteps = dataset.len(),
        chunk_size,
        chunks = ranges.len(),
        "Partitioned time axis"
    );
    ranges.into_iter().map(|r| dataset.isel(r)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_ranges_uneven() {
        assert_eq!(chunk_ranges(7, 3).unwrap(), vec![0..3, 3..6, 6..7]);
    }

    #[test]
    fn test_chunk_ranges_exact() {
        assert_eq!(chunk_ranges(4, 2).unwrap(), vec![0..2, 2..4]);
    }

    #[test]
    fn test_chunk_ranges_empty_axis() {
        assert!(chunk_ranges(0, 5).unwrap().is_empty());
    }

    #[test]
    fn test_chunk_size_zero() {
        assert!(matches!(chunk_ranges(4, 0), Err(DataError::InvalidChunkSize)));
    }
}
