//! Chunk grid iterators.
//!
//! [`ChunkSubsets`] iterates over the [`ArraySubset`](crate::ArraySubset) of every chunk in a [`RegularChunkGrid`](crate::RegularChunkGrid), last axis fastest.
//! It is an [`Iterator`] and supports [`rayon`]'s [`into_par_iter()`](rayon::iter::IntoParallelIterator::into_par_iter) ([`IntoParallelIterator`](rayon::iter::IntoParallelIterator)).

mod chunk_subsets_iterator;

pub use chunk_subsets_iterator::{ChunkSubsets, ParChunkSubsets};
