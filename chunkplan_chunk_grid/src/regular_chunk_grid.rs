//! A regular chunk grid.

use std::num::NonZeroU64;

use crate::iterators::ChunkSubsets;
use crate::{ArrayShape, ArraySubset, ChunkShape};

/// A regular chunk grid.
///
/// Each axis is divided into `ceil(array_size / chunk_size)` chunks.
/// All chunks along an axis have the chunk length except the last, which holds the remainder if the chunk length does not evenly divide the axis.
/// An axis of size zero has no chunks, and a grid with no axes has a single chunk.
#[allow(clippy::struct_field_names)]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RegularChunkGrid {
    array_shape: ArrayShape,
    grid_shape: ArrayShape,
    chunk_shape: ChunkShape,
}

impl FromIterator<(u64, NonZeroU64)> for RegularChunkGrid {
    fn from_iter<T: IntoIterator<Item = (u64, NonZeroU64)>>(axes: T) -> Self {
        let mut grid = Self::default();
        for (array_size, chunk_size) in axes {
            grid.array_shape.push(array_size);
            grid.grid_shape.push(array_size.div_ceil(chunk_size.get()));
            grid.chunk_shape.push(chunk_size);
        }
        grid
    }
}

impl RegularChunkGrid {
    /// Create a new regular chunk grid from the `(array size, chunk size)` of each axis.
    #[must_use]
    pub fn new(axes: impl IntoIterator<Item = (u64, NonZeroU64)>) -> Self {
        axes.into_iter().collect()
    }

    /// The dimensionality of the chunk grid.
    #[must_use]
    pub fn dimensionality(&self) -> usize {
        self.chunk_shape.len()
    }

    /// The grid shape (i.e. number of chunks along each axis).
    #[must_use]
    pub fn grid_shape(&self) -> &[u64] {
        &self.grid_shape
    }

    /// Return the [`ArraySubset`] of the chunk at `chunk_indices`.
    ///
    /// Returns [`None`] if `chunk_indices` do not match the dimensionality of the grid or are out of bounds.
    #[must_use]
    pub fn chunk_subset(&self, chunk_indices: &[u64]) -> Option<ArraySubset> {
        if chunk_indices.len() != self.dimensionality() {
            return None;
        }
        std::iter::zip(chunk_indices, std::iter::zip(&self.array_shape, &self.chunk_shape))
            .map(|(&chunk_index, (&array_size, chunk_size))| {
                let start = chunk_index.checked_mul(chunk_size.get())?;
                (start < array_size)
                    .then(|| start..std::cmp::min(start.saturating_add(chunk_size.get()), array_size))
            })
            .collect::<Option<Vec<_>>>()
            .map(ArraySubset::from)
    }

    /// Returns the subsets of every chunk in the grid, last axis fastest.
    #[must_use]
    pub fn chunk_subsets(self) -> ChunkSubsets {
        ChunkSubsets::new(self)
    }
}
