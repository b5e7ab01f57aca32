//! Chunk size analysis.

use std::collections::BTreeMap;
use std::num::NonZeroU64;

use itertools::Itertools;
use serde::Serialize;

use crate::config::global_config;
use crate::{AnalysisError, ChunkSizes, DatasetMeta};

const MEMORY_UNITS: [&str; 6] = ["", "K", "M", "G", "T", "P"];

/// Format a number of bytes with binary prefixes and two decimals, e.g. `976.56KB`.
///
/// Sizes of 1024 PB and above are expressed in PB.
#[must_use]
pub fn format_mem_size(bytes: f64) -> String {
    let mut size = bytes;
    let mut unit = MEMORY_UNITS[0];
    for next_unit in &MEMORY_UNITS[1..] {
        if size.abs() < 1024.0 {
            break;
        }
        size /= 1024.0;
        unit = next_unit;
    }
    format!("{size:.2}{unit}B")
}

/// A chunk length that evenly divides a dimension.
#[derive(Serialize, Clone, Copy, PartialEq, Debug)]
pub struct AlternativeChunkSize {
    /// The chunk length.
    pub chunk_size: u64,
    /// The size in bytes of a chunk.
    pub chunk_memory: f64,
}

/// The analysis of a chunk length along one dimension.
#[derive(Serialize, Clone, PartialEq, Debug)]
pub struct ChunkAnalysis {
    /// The dimension size.
    pub dim_size: u64,
    /// The chunk length.
    pub chunk_size: u64,
    /// The number of whole chunks.
    pub num_chunks: u64,
    /// The length of the trailing partial chunk, zero if the chunk length evenly divides the dimension.
    pub remainder: u64,
    /// The size in bytes of a chunk.
    pub chunk_memory: f64,
    /// The evenly dividing chunk lengths closest to the chunk length, closest first.
    pub alternatives: Vec<AlternativeChunkSize>,
}

impl std::fmt::Display for ChunkAnalysis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "chunk size {} of {}: {} chunks, remainder {}, {} per chunk",
            self.chunk_size,
            self.dim_size,
            self.num_chunks,
            self.remainder,
            format_mem_size(self.chunk_memory)
        )?;
        if self.remainder != 0 && !self.alternatives.is_empty() {
            write!(
                f,
                ", evenly dividing alternatives [{}]",
                self.alternatives.iter().format_with(", ", |alternative, f| f(
                    &format_args!(
                        "{} ({})",
                        alternative.chunk_size,
                        format_mem_size(alternative.chunk_memory)
                    )
                ))
            )?;
        }
        Ok(())
    }
}

/// The divisors of `n` other than 1 and `n`, in ascending order.
fn proper_divisors(n: u64) -> Vec<u64> {
    let mut low = Vec::new();
    let mut high = Vec::new();
    let mut divisor = 2u64;
    while divisor.checked_mul(divisor).is_some_and(|square| square <= n) {
        if n % divisor == 0 {
            low.push(divisor);
            let pair = n / divisor;
            if pair != divisor {
                high.push(pair);
            }
        }
        divisor += 1;
    }
    low.extend(high.into_iter().rev());
    low
}

/// Analyse splitting a dimension of `dim_size` elements of `element_size` bytes into chunks of `chunk_size`.
///
/// The number of alternatives is limited by the [alternative chunk sizes limit](crate::config::Config#alternative-chunk-sizes-limit).
/// The analysis is logged at `info` level.
#[must_use]
pub fn analyze_chunking_strategy(
    dim_size: u64,
    chunk_size: NonZeroU64,
    element_size: f64,
) -> ChunkAnalysis {
    let limit = global_config().alternative_chunk_sizes_limit();
    let chunk_size = chunk_size.get();

    #[allow(clippy::cast_precision_loss)]
    let alternatives = proper_divisors(dim_size)
        .into_iter()
        .sorted_by_key(|divisor| (divisor.abs_diff(chunk_size), *divisor))
        .take(limit)
        .map(|divisor| AlternativeChunkSize {
            chunk_size: divisor,
            chunk_memory: element_size * divisor as f64,
        })
        .collect();

    #[allow(clippy::cast_precision_loss)]
    let analysis = ChunkAnalysis {
        dim_size,
        chunk_size,
        num_chunks: dim_size / chunk_size,
        remainder: dim_size % chunk_size,
        chunk_memory: element_size * chunk_size as f64,
        alternatives,
    };
    log::info!("Analysed {analysis}");
    analysis
}

/// The chunking of a data variable.
#[derive(Serialize, Clone, PartialEq, Debug)]
pub struct DataVariableChunking {
    /// The chunk shape.
    pub chunk_shape: Vec<u64>,
    /// The size in bytes of a chunk.
    pub chunk_memory: f64,
}

/// The analysis of [`ChunkSizes`] for a dataset.
#[derive(Serialize, Clone, PartialEq, Debug, Default)]
pub struct ChunkingReport {
    /// The analysis of each requested dimension.
    pub dimensions: BTreeMap<String, ChunkAnalysis>,
    /// The chunking of each data variable.
    pub data_variables: BTreeMap<String, DataVariableChunking>,
}

impl DatasetMeta {
    /// Analyse `chunk_sizes` for this dataset.
    ///
    /// Each requested dimension is [analysed](analyze_chunking_strategy) against the coordinate variable of the same name.
    /// The chunk shape of each data variable is the requested length capped at the dimension size, or the whole dimension if unspecified.
    ///
    /// # Errors
    /// Returns [`AnalysisError::MissingCoordinateVariable`] if a requested dimension has no coordinate variable.
    pub fn analyze_chunking_strategy(
        &self,
        chunk_sizes: &ChunkSizes,
    ) -> Result<ChunkingReport, AnalysisError> {
        let mut report = ChunkingReport::default();
        for (dimension, &chunk_size) in chunk_sizes.iter() {
            let coordinate = self
                .array_meta(dimension)
                .ok_or_else(|| AnalysisError::MissingCoordinateVariable(dimension.clone()))?;
            let dim_size = coordinate
                .dimension_size(dimension)
                .or_else(|| coordinate.shape().first().copied())
                .unwrap_or_default();
            let analysis = analyze_chunking_strategy(
                dim_size,
                chunk_size,
                coordinate.estimated_element_size(),
            );
            report.dimensions.insert(dimension.clone(), analysis);
        }

        for (name, array_meta) in self.data_vars() {
            let chunk_shape: Vec<u64> =
                std::iter::zip(array_meta.dimension_names(), array_meta.shape())
                    .map(|(dimension, &size)| {
                        chunk_sizes
                            .get(dimension)
                            .map_or(size, |chunk_size| chunk_size.get().min(size))
                    })
                    .collect();
            #[allow(clippy::cast_precision_loss)]
            let chunk_memory =
                array_meta.estimated_element_size() * chunk_shape.iter().product::<u64>() as f64;
            log::info!(
                "`{name}` chunk shape {chunk_shape:?}, {} per chunk",
                format_mem_size(chunk_memory)
            );
            report.data_variables.insert(
                name.to_string(),
                DataVariableChunking {
                    chunk_shape,
                    chunk_memory,
                },
            );
        }
        Ok(report)
    }
}
