use std::iter::FusedIterator;
use std::ops::Range;

use rayon::iter::plumbing::{bridge, Consumer, Producer, ProducerCallback, UnindexedConsumer};
use rayon::iter::{IndexedParallelIterator, IntoParallelIterator, ParallelIterator};

use crate::{unravel_index, ArraySubset, RegularChunkGrid};

/// An iterator over the chunks of a [`RegularChunkGrid`].
///
/// Iterates over the last dimension fastest (i.e. C-contiguous order).
/// For example, consider a grid of 2x3 chunks
/// ```text
/// (0, 0)  (0, 1)  (0, 2)
/// (1, 0)  (1, 1)  (1, 2)
/// ```
/// The iterator produces the subsets of chunks `[(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2)]`.
///
/// A grid with a zero sized dimension has no chunks, and a grid with no dimensions has exactly one chunk with no dimensions.
#[derive(Clone, Debug)]
pub struct ChunkSubsets {
    grid: RegularChunkGrid,
    range: Range<usize>,
}

impl ChunkSubsets {
    /// Create an iterator over the chunks of `grid`.
    ///
    /// The number of chunks saturates at [`usize::MAX`].
    #[must_use]
    pub fn new(grid: RegularChunkGrid) -> Self {
        let num_chunks = grid
            .grid_shape()
            .iter()
            .try_fold(1u64, |acc, &n| acc.checked_mul(n))
            .map_or(usize::MAX, |n| usize::try_from(n).unwrap_or(usize::MAX));
        Self {
            grid,
            range: 0..num_chunks,
        }
    }

    fn subset(&self, index: usize) -> Option<ArraySubset> {
        let chunk_indices = unravel_index(index as u64, self.grid.grid_shape())?;
        self.grid.chunk_subset(&chunk_indices)
    }
}

impl Iterator for ChunkSubsets {
    type Item = ArraySubset;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.range.next()?;
        self.subset(index)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.range.size_hint()
    }
}

impl DoubleEndedIterator for ChunkSubsets {
    fn next_back(&mut self) -> Option<Self::Item> {
        let index = self.range.next_back()?;
        self.subset(index)
    }
}

impl ExactSizeIterator for ChunkSubsets {}

impl FusedIterator for ChunkSubsets {}

impl IntoParallelIterator for ChunkSubsets {
    type Item = ArraySubset;
    type Iter = ParChunkSubsets;

    fn into_par_iter(self) -> Self::Iter {
        ParChunkSubsets {
            grid: self.grid,
            range: self.range,
        }
    }
}

/// Parallel iterator over the chunks of a [`RegularChunkGrid`].
///
/// See [`ChunkSubsets`].
#[derive(Debug)]
pub struct ParChunkSubsets {
    grid: RegularChunkGrid,
    range: Range<usize>,
}

impl ParallelIterator for ParChunkSubsets {
    type Item = ArraySubset;

    fn drive_unindexed<C>(self, consumer: C) -> C::Result
    where
        C: UnindexedConsumer<Self::Item>,
    {
        bridge(self, consumer)
    }

    fn opt_len(&self) -> Option<usize> {
        Some(self.len())
    }
}

impl IndexedParallelIterator for ParChunkSubsets {
    fn with_producer<CB: ProducerCallback<Self::Item>>(self, callback: CB) -> CB::Output {
        callback.callback(self)
    }

    fn drive<C: Consumer<Self::Item>>(self, consumer: C) -> C::Result {
        bridge(self, consumer)
    }

    fn len(&self) -> usize {
        self.range.len()
    }
}

impl Producer for ParChunkSubsets {
    type Item = ArraySubset;
    type IntoIter = ChunkSubsets;

    fn into_iter(self) -> Self::IntoIter {
        ChunkSubsets {
            grid: self.grid,
            range: self.range,
        }
    }

    fn split_at(self, index: usize) -> (Self, Self) {
        let mid = self.range.start + index;
        let left = ParChunkSubsets {
            grid: self.grid.clone(),
            range: self.range.start..mid,
        };
        let right = ParChunkSubsets {
            grid: self.grid,
            range: mid..self.range.end,
        };
        (left, right)
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU64;

    use super::*;

    fn grid(axes: &[(u64, u64)]) -> RegularChunkGrid {
        axes.iter()
            .map(|&(array_size, chunk_size)| (array_size, NonZeroU64::new(chunk_size).unwrap()))
            .collect()
    }

    fn ranges(subsets: impl Iterator<Item = ArraySubset>) -> Vec<Vec<Range<u64>>> {
        subsets.map(|subset| subset.to_ranges()).collect()
    }

    #[test]
    fn chunk_subsets_c_order() {
        let chunks = grid(&[(4, 2), (6, 4)]).chunk_subsets();
        assert_eq!(chunks.len(), 4);
        assert_eq!(
            ranges(chunks.clone()),
            vec![
                vec![0..2, 0..4],
                vec![0..2, 4..6],
                vec![2..4, 0..4],
                vec![2..4, 4..6]
            ]
        );

        let mut chunks = chunks;
        assert_eq!(chunks.next_back().unwrap().to_ranges(), vec![2..4, 4..6]);
        assert_eq!(chunks.next().unwrap().to_ranges(), vec![0..2, 0..4]);
        assert_eq!(chunks.size_hint(), (2, Some(2)));
    }

    #[test]
    fn chunk_subsets_parallel() {
        let chunks = grid(&[(9, 2), (5, 5), (7, 3)]).chunk_subsets();
        let serial = ranges(chunks.clone());
        assert_eq!(serial.len(), 5 * 3);
        let parallel: Vec<Vec<Range<u64>>> = chunks
            .into_par_iter()
            .map(|subset| subset.to_ranges())
            .collect();
        assert_eq!(serial, parallel);
    }

    #[test]
    fn chunk_subsets_degenerate() {
        let scalar = RegularChunkGrid::default().chunk_subsets();
        assert_eq!(ranges(scalar), vec![Vec::<Range<u64>>::new()]);

        let mut empty = grid(&[(3, 1), (0, 2)]).chunk_subsets();
        assert_eq!(empty.len(), 0);
        assert_eq!(empty.next(), None);
    }
}
