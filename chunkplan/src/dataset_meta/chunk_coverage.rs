use std::collections::{BTreeMap, BTreeSet};
use std::ops::Range;

use crate::{ChunkCoverageError, ChunkRegion, ChunkSizes, DatasetMeta};

/// The extent of a source file: the variables it contains and its dimension sizes.
pub trait FileExtentProvider {
    /// Returns true if the file contains `variable`.
    fn has_variable(&self, variable: &str) -> bool;

    /// Return the size of the file along `dimension`, if declared.
    fn dimension_size(&self, dimension: &str) -> Option<u64>;
}

/// An in-memory [`FileExtentProvider`].
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct FileExtent {
    variables: BTreeSet<String>,
    dimension_sizes: BTreeMap<String, u64>,
}

impl FileExtent {
    /// Create an empty file extent.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variable.
    #[must_use]
    pub fn with_variable(mut self, variable: impl Into<String>) -> Self {
        self.variables.insert(variable.into());
        self
    }

    /// Set the size along a dimension.
    #[must_use]
    pub fn with_dimension_size(mut self, dimension: impl Into<String>, size: u64) -> Self {
        self.dimension_sizes.insert(dimension.into(), size);
        self
    }
}

impl FileExtentProvider for FileExtent {
    fn has_variable(&self, variable: &str) -> bool {
        self.variables.contains(variable)
    }

    fn dimension_size(&self, dimension: &str) -> Option<u64> {
        self.dimension_sizes.get(dimension).copied()
    }
}

/// The metadata of a single file describes its extent.
///
/// The size along a dimension is taken from the first variable (in name order) with that dimension.
impl FileExtentProvider for DatasetMeta {
    fn has_variable(&self, variable: &str) -> bool {
        self.arrays().contains_key(variable)
    }

    fn dimension_size(&self, dimension: &str) -> Option<u64> {
        self.arrays()
            .values()
            .find_map(|array_meta| array_meta.dimension_size(dimension))
    }
}

/// The chunks present in a source file.
///
/// Chunks are listed in [enumeration](DatasetMeta::enumerate_chunks) order.
/// A chunk is in at most one of the lists, and in neither if it does not intersect the file.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct ChunkCoverage {
    /// Chunks entirely within the file, with their dataset element ranges.
    pub fully_covered: Vec<(String, ChunkRegion)>,
    /// Chunks that extend beyond the file along the concatenation dimension.
    ///
    /// The range along the concatenation dimension is the part of the chunk within the file, relative to the start of the file.
    /// Other ranges are unchanged.
    pub partially_covered: Vec<(String, ChunkRegion)>,
}

/// The intersection of `chunk` with `file`, relative to the start of the file, and whether the chunk is within the file.
///
/// Returns [`None`] if they are disjoint.
fn covered_range(chunk: &Range<u64>, file: &Range<u64>) -> Option<(Range<u64>, bool)> {
    if chunk.end <= file.start || chunk.start >= file.end {
        return None;
    }
    let start = chunk.start.max(file.start) - file.start;
    let end = chunk.end.min(file.end) - file.start;
    let within = chunk.start >= file.start && chunk.end <= file.end;
    Some((start..end, within))
}

impl DatasetMeta {
    /// Determine the chunks of the merged dataset present in file `file_index`.
    ///
    /// Every file is assumed to have the same size `S` along the [concatenation dimension](DatasetMeta::concat_dim) as `file`,
    /// so file `file_index` spans `[file_index * S, (file_index + 1) * S)`. This is not validated.
    ///
    /// Chunks of variables absent from `file` are skipped.
    /// Chunks of variables without the concatenation dimension, and all chunks if the metadata is not merged, are fully covered.
    ///
    /// # Errors
    /// Returns a [`ChunkCoverageError`] if a chunk spans the concatenation dimension and `file` does not declare its size along it,
    /// or if the start or end of the file along the concatenation dimension overflows.
    pub fn chunk_coverage(
        &self,
        file: &impl FileExtentProvider,
        chunk_sizes: &ChunkSizes,
        file_index: u64,
    ) -> Result<ChunkCoverage, ChunkCoverageError> {
        let mut coverage = ChunkCoverage::default();
        let concat_dim = self.concat_dim();
        let file_span = match concat_dim.and_then(|dimension| file.dimension_size(dimension)) {
            Some(file_size) => {
                let overflow = ChunkCoverageError::FileOffsetOverflow {
                    file_index,
                    file_size,
                };
                let start = file_index.checked_mul(file_size).ok_or(overflow.clone())?;
                let end = start.checked_add(file_size).ok_or(overflow)?;
                Some(start..end)
            }
            None => None,
        };

        for (variable, mut region) in self.enumerate_chunks(chunk_sizes) {
            if !file.has_variable(variable) {
                continue;
            }
            let Some((concat_dim, chunk_range)) = concat_dim
                .and_then(|dimension| Some((dimension, region.get_mut(dimension)?)))
            else {
                log::debug!("`{variable}` chunk {region} is fully covered");
                coverage.fully_covered.push((variable.to_string(), region));
                continue;
            };
            let file_span = file_span
                .as_ref()
                .ok_or_else(|| ChunkCoverageError::MissingConcatExtent(concat_dim.to_string()))?;

            match covered_range(chunk_range, file_span) {
                None => {
                    log::debug!("`{variable}` chunk {region} is outside file {file_index}");
                }
                Some((_, true)) => {
                    log::debug!("`{variable}` chunk {region} is fully covered");
                    coverage.fully_covered.push((variable.to_string(), region));
                }
                Some((range, false)) => {
                    let chunk_range = std::mem::replace(chunk_range, range);
                    log::debug!("`{variable}` chunk {chunk_range:?} is partially covered by {region}");
                    coverage.partially_covered.push((variable.to_string(), region));
                }
            }
        }
        Ok(coverage)
    }
}
