use std::collections::{btree_map, BTreeMap};
use std::num::NonZeroU64;
use std::ops::Range;

use derive_more::{Deref, From};
use itertools::Itertools;
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use serde::{Deserialize, Serialize};

use crate::chunk_grid::iterators::ChunkSubsets;
use crate::chunk_grid::{ArraySubset, RegularChunkGrid};
use crate::{ArrayMeta, DatasetMeta};

/// The requested chunk length of each named dimension.
///
/// Dimensions without a chunk length are chunked as a whole.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug, Default, Deref, From)]
#[serde(transparent)]
pub struct ChunkSizes(BTreeMap<String, NonZeroU64>);

impl ChunkSizes {
    /// Create empty chunk sizes: every dimension is chunked as a whole.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the chunk length of `dimension`.
    #[must_use]
    pub fn with_chunk_size(mut self, dimension: impl Into<String>, chunk_size: NonZeroU64) -> Self {
        self.0.insert(dimension.into(), chunk_size);
        self
    }

    /// Return the chunk length along `dimension` of size `dimension_size`.
    ///
    /// This is the requested length, or the dimension size if unspecified.
    /// A zero sized dimension without a requested length has a chunk length of one.
    #[must_use]
    pub fn chunk_size(&self, dimension: &str, dimension_size: u64) -> NonZeroU64 {
        self.0.get(dimension).copied().unwrap_or_else(|| {
            NonZeroU64::new(dimension_size).unwrap_or(NonZeroU64::MIN)
        })
    }

    /// Return the chunk grid of `array_meta`.
    pub(crate) fn chunk_grid(&self, array_meta: &ArrayMeta) -> RegularChunkGrid {
        std::iter::zip(array_meta.dimension_names(), array_meta.shape())
            .map(|(dimension, &size)| (size, self.chunk_size(dimension, size)))
            .collect()
    }
}

impl<S: Into<String>> FromIterator<(S, NonZeroU64)> for ChunkSizes {
    fn from_iter<T: IntoIterator<Item = (S, NonZeroU64)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(dimension, chunk_size)| (dimension.into(), chunk_size))
                .collect(),
        )
    }
}

/// A chunk of a variable: one element range per dimension, in dimension order.
///
/// A chunk of a scalar variable has no dimensions.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Default)]
pub struct ChunkRegion(Vec<(String, Range<u64>)>);

impl ChunkRegion {
    /// Create a new chunk region from `(dimension name, element range)` pairs.
    #[must_use]
    pub fn new(axes: Vec<(String, Range<u64>)>) -> Self {
        Self(axes)
    }

    /// Return the element range along `dimension`.
    #[must_use]
    pub fn get(&self, dimension: &str) -> Option<&Range<u64>> {
        self.0
            .iter()
            .find_map(|(name, range)| (name == dimension).then_some(range))
    }

    pub(crate) fn get_mut(&mut self, dimension: &str) -> Option<&mut Range<u64>> {
        self.0
            .iter_mut()
            .find_map(|(name, range)| (name == dimension).then_some(range))
    }

    /// Return the number of dimensions.
    #[must_use]
    pub fn dimensionality(&self) -> usize {
        self.0.len()
    }

    /// Return the dimension names.
    pub fn dimension_names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }

    /// Return the element ranges.
    pub fn ranges(&self) -> impl Iterator<Item = &Range<u64>> {
        self.0.iter().map(|(_, range)| range)
    }

    /// Iterate over `(dimension name, element range)` pairs.
    pub fn iter(&self) -> std::slice::Iter<'_, (String, Range<u64>)> {
        self.0.iter()
    }

    /// Return the shape of the region.
    #[must_use]
    pub fn shape(&self) -> Vec<u64> {
        self.ranges().map(|range| range.end.saturating_sub(range.start)).collect()
    }

    /// Return the number of elements of the region.
    #[must_use]
    pub fn num_elements(&self) -> u64 {
        self.shape().iter().product()
    }

    /// Returns true if the region has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranges().any(|range| range.start >= range.end)
    }
}

impl std::fmt::Display for ChunkRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{{}}}",
            self.0
                .iter()
                .format_with(", ", |(name, range), f| f(&format_args!(
                    "{name}: {}..{}",
                    range.start, range.end
                )))
        )
    }
}

impl<'a> IntoIterator for &'a ChunkRegion {
    type Item = &'a (String, Range<u64>);
    type IntoIter = std::slice::Iter<'a, (String, Range<u64>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn chunk_region(array_meta: &ArrayMeta, subset: &ArraySubset) -> ChunkRegion {
    ChunkRegion(
        std::iter::zip(array_meta.dimension_names(), subset.to_ranges())
            .map(|(name, range)| (name.clone(), range))
            .collect(),
    )
}

#[derive(Clone)]
struct VariableChunks<'a> {
    name: &'a str,
    array_meta: &'a ArrayMeta,
    subsets: ChunkSubsets,
}

impl<'a> VariableChunks<'a> {
    fn new(name: &'a str, array_meta: &'a ArrayMeta, chunk_sizes: &ChunkSizes) -> Self {
        Self {
            name,
            array_meta,
            subsets: chunk_sizes.chunk_grid(array_meta).chunk_subsets(),
        }
    }
}

/// The chunks of every variable of a [`DatasetMeta`] for some [`ChunkSizes`].
///
/// Variables are visited in name order, and the chunks of each variable in C order (last dimension fastest).
/// Every dimension is partitioned into consecutive chunks of the requested length, with a shorter trailing chunk if the length does not evenly divide the dimension.
/// A variable with a zero sized dimension has no chunks, and a scalar variable has a single chunk with no dimensions.
///
/// The iterator is lazy. Clone it to iterate again from the current position.
#[derive(Clone)]
pub struct ChunkDefinitions<'a> {
    variables: btree_map::Iter<'a, String, ArrayMeta>,
    chunk_sizes: &'a ChunkSizes,
    current: Option<VariableChunks<'a>>,
}

impl<'a> ChunkDefinitions<'a> {
    pub(crate) fn new(dataset_meta: &'a DatasetMeta, chunk_sizes: &'a ChunkSizes) -> Self {
        Self {
            variables: dataset_meta.arrays().iter(),
            chunk_sizes,
            current: None,
        }
    }
}

impl<'a> Iterator for ChunkDefinitions<'a> {
    type Item = (&'a str, ChunkRegion);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(current) = &mut self.current {
                if let Some(subset) = current.subsets.next() {
                    return Some((current.name, chunk_region(current.array_meta, &subset)));
                }
            }
            let (name, array_meta) = self.variables.next()?;
            self.current = Some(VariableChunks::new(name, array_meta, self.chunk_sizes));
        }
    }
}

impl std::iter::FusedIterator for ChunkDefinitions<'_> {}

impl DatasetMeta {
    /// Enumerate the chunks of every variable for `chunk_sizes`.
    ///
    /// See [`ChunkDefinitions`].
    #[must_use]
    pub fn enumerate_chunks<'a>(&'a self, chunk_sizes: &'a ChunkSizes) -> ChunkDefinitions<'a> {
        ChunkDefinitions::new(self, chunk_sizes)
    }

    /// Enumerate the chunks of every variable for `chunk_sizes` in parallel.
    ///
    /// Yields the same chunks as [`enumerate_chunks`](DatasetMeta::enumerate_chunks), in the same order when collected.
    pub fn par_enumerate_chunks<'a>(
        &'a self,
        chunk_sizes: &'a ChunkSizes,
    ) -> impl ParallelIterator<Item = (&'a str, ChunkRegion)> + 'a {
        self.arrays()
            .iter()
            .collect::<Vec<_>>()
            .into_par_iter()
            .flat_map(move |(name, array_meta)| {
                chunk_sizes
                    .chunk_grid(array_meta)
                    .chunk_subsets()
                    .into_par_iter()
                    .map(move |subset| (name.as_str(), chunk_region(array_meta, &subset)))
            })
    }
}

#[cfg(test)]
mod tests {
    use crate::metadata::{ArrayMetadataRecord, DataType};

    use super::*;

    fn nz(n: u64) -> NonZeroU64 {
        NonZeroU64::new(n).unwrap()
    }

    fn region(axes: &[(&str, Range<u64>)]) -> ChunkRegion {
        ChunkRegion::new(
            axes.iter()
                .map(|(name, range)| ((*name).to_string(), range.clone()))
                .collect(),
        )
    }

    fn dataset() -> DatasetMeta {
        DatasetMeta::from_extraction([
            ArrayMetadataRecord::new("a", vec![5, 4], DataType::Float32, &["time", "x"]),
            ArrayMetadataRecord::new("b", vec![4], DataType::Float32, &["x"]),
            ArrayMetadataRecord::new("c", vec![], DataType::Int64, &[]),
        ])
        .unwrap()
    }

    #[test]
    fn chunk_sizes_lookup() {
        let chunk_sizes: ChunkSizes = [("time", nz(2))].into_iter().collect();
        assert_eq!(chunk_sizes.len(), 1);
        assert_eq!(chunk_sizes.chunk_size("time", 5), nz(2));
        assert_eq!(chunk_sizes.chunk_size("x", 4), nz(4));
        assert_eq!(chunk_sizes.chunk_size("x", 0), nz(1));
        assert_eq!(
            serde_json::from_str::<ChunkSizes>(r#"{"time": 2}"#).unwrap(),
            chunk_sizes
        );
        assert!(serde_json::from_str::<ChunkSizes>(r#"{"time": 0}"#).is_err());
    }

    #[test]
    fn chunk_region_accessors() {
        let chunk = region(&[("time", 2..4), ("x", 0..3)]);
        assert_eq!(chunk.get("x"), Some(&(0..3)));
        assert_eq!(chunk.get("y"), None);
        assert_eq!(chunk.dimensionality(), 2);
        assert_eq!(chunk.dimension_names().collect::<Vec<_>>(), vec!["time", "x"]);
        assert_eq!(chunk.shape(), vec![2, 3]);
        assert_eq!(chunk.num_elements(), 6);
        assert!(!chunk.is_empty());
        assert_eq!(chunk.to_string(), "{time: 2..4, x: 0..3}");

        let mut chunk = chunk;
        *chunk.get_mut("time").unwrap() = 3..3;
        assert!(chunk.is_empty());
        assert!(chunk.get_mut("y").is_none());

        let scalar = ChunkRegion::default();
        assert!(!scalar.is_empty());
        assert_eq!(scalar.num_elements(), 1);
        assert_eq!(scalar.to_string(), "{}");
    }

    #[test]
    fn enumerate_chunks_remainder() {
        let dataset = dataset();
        let chunk_sizes = ChunkSizes::new().with_chunk_size("time", nz(2));
        let chunks = dataset.enumerate_chunks(&chunk_sizes).collect::<Vec<_>>();
        assert_eq!(
            chunks,
            vec![
                ("a", region(&[("time", 0..2), ("x", 0..4)])),
                ("a", region(&[("time", 2..4), ("x", 0..4)])),
                ("a", region(&[("time", 4..5), ("x", 0..4)])),
                ("b", region(&[("x", 0..4)])),
                ("c", region(&[])),
            ]
        );
    }

    #[test]
    fn enumerate_chunks_exact_last_axis_fastest() {
        let dataset = dataset();
        let chunk_sizes = ChunkSizes::new()
            .with_chunk_size("time", nz(5))
            .with_chunk_size("x", nz(2));
        let chunks = dataset
            .enumerate_chunks(&chunk_sizes)
            .filter(|(name, _)| *name == "a")
            .map(|(_, region)| region)
            .collect::<Vec<_>>();
        assert_eq!(
            chunks,
            vec![
                region(&[("time", 0..5), ("x", 0..2)]),
                region(&[("time", 0..5), ("x", 2..4)]),
            ]
        );
    }

    #[test]
    fn enumerate_chunks_oversized_and_empty() {
        let dataset = DatasetMeta::from_extraction([
            ArrayMetadataRecord::new("a", vec![3], DataType::UInt8, &["x"]),
            ArrayMetadataRecord::new("empty", vec![0, 4], DataType::UInt8, &["y", "x"]),
        ])
        .unwrap();
        let chunk_sizes = ChunkSizes::new().with_chunk_size("x", nz(10));
        let chunks = dataset.enumerate_chunks(&chunk_sizes).collect::<Vec<_>>();
        assert_eq!(chunks, vec![("a", region(&[("x", 0..3)]))]);
    }

    #[test]
    fn enumerate_chunks_restartable() {
        let dataset = dataset();
        let chunk_sizes = ChunkSizes::new().with_chunk_size("x", nz(3));
        let mut chunks = dataset.enumerate_chunks(&chunk_sizes);
        let first = chunks.next().unwrap();
        let rest = chunks.clone().collect::<Vec<_>>();
        assert_eq!(chunks.collect::<Vec<_>>(), rest);
        assert_eq!(
            dataset.enumerate_chunks(&chunk_sizes).next().unwrap(),
            first
        );
        assert_eq!(dataset.enumerate_chunks(&chunk_sizes).count(), 5);
    }

    #[test]
    fn par_enumerate_chunks() {
        let dataset = dataset();
        let chunk_sizes = ChunkSizes::new()
            .with_chunk_size("time", nz(2))
            .with_chunk_size("x", nz(3));
        let serial = dataset.enumerate_chunks(&chunk_sizes).collect::<Vec<_>>();
        let parallel = dataset
            .par_enumerate_chunks(&chunk_sizes)
            .collect::<Vec<_>>();
        assert_eq!(serial.len(), 9);
        assert_eq!(serial, parallel);
    }
}
