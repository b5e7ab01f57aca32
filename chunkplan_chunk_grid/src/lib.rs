//! The chunk grid API for the `chunkplan` crate.
//!
//! A [`RegularChunkGrid`] partitions every axis of an array into consecutive chunks of a fixed length,
//! with a shorter trailing chunk holding any remainder.
//! [`ChunkSubsets`](iterators::ChunkSubsets) iterates over the chunks of a grid in C order (last axis fastest).
//!
//! ## Licence
//! `chunkplan_chunk_grid` is licensed under either of
//!  - the Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> or
//!  - the MIT license <http://opensource.org/licenses/MIT>, at your option.
//!
//! Unless you explicitly state otherwise, any contribution intentionally submitted for inclusion in the work by you, as defined in the Apache-2.0 license, shall be dual licensed as above, without any additional terms or conditions.

mod array_subset;
pub use array_subset::ArraySubset;

mod regular_chunk_grid;
pub use regular_chunk_grid::RegularChunkGrid;

pub mod iterators;

use std::num::NonZeroU64;

/// An array shape. Dimensions may be zero.
pub type ArrayShape = Vec<u64>;

/// A chunk shape. Dimensions must be non-zero.
pub type ChunkShape = Vec<NonZeroU64>;

/// An ND index to a chunk in a chunk grid.
/// Uses [`TinyVec`](tinyvec::TinyVec) for stack allocation up to 4 dimensions.
pub type ChunkIndicesTinyVec = tinyvec::TinyVec<[u64; 4]>;

/// Unravel a linearised index into ND indices for an array with `shape`, C order.
///
/// Returns [`None`] if `index` is out of bounds or the number of elements in `shape` overflows [`u64`].
#[must_use]
pub fn unravel_index(mut index: u64, shape: &[u64]) -> Option<ChunkIndicesTinyVec> {
    let total_size: u64 = shape
        .iter()
        .try_fold(1u64, |acc, &dim| acc.checked_mul(dim))?;
    if index >= total_size {
        return None;
    }

    match shape.len() {
        0 => Some(ChunkIndicesTinyVec::new()),
        1 => Some(tinyvec::tiny_vec!([u64; 4] => index)),
        2 => {
            let i1 = index % shape[1];
            index /= shape[1];
            Some(tinyvec::tiny_vec!([u64; 4] => index, i1))
        }
        _ => {
            let mut indices = ChunkIndicesTinyVec::with_capacity(shape.len());
            indices.resize(shape.len(), 0);
            for (idx, &dim) in std::iter::zip(indices.iter_mut(), shape).rev() {
                *idx = index % dim;
                index /= dim;
            }
            Some(indices)
        }
    }
}
