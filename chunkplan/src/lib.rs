//! `chunkplan` plans the chunking of N-dimensional datasets that span several source files.
//!
//! A dataset is a set of named variables (arrays) with named axes, such as `pr(time, lat, lon)`.
//! When a logical dataset is split across files along one axis (typically time), `chunkplan`
//! - merges the per-file metadata into one logical description with [`DatasetMeta::merge_with`] or [`DatasetMeta::merge_all`],
//! - enumerates the candidate chunks of a [`ChunkSizes`] specification with [`DatasetMeta::enumerate_chunks`],
//! - determines which chunks are fully or partially present in a given file with [`DatasetMeta::chunk_coverage`], and
//! - reports chunk counts, remainders and memory footprints with [`analyze_chunking_strategy`].
//!
//! Reading array data and sampling the size of variable length elements is left to the metadata extractor,
//! which reports each variable as an [`ArrayMetadataRecord`](metadata::ArrayMetadataRecord).
//!
//! ## Example
//! ```rust
//! # use std::num::NonZeroU64;
//! use chunkplan::metadata::{ArrayMetadataRecord, DataType};
//! use chunkplan::{ChunkSizes, DatasetMeta};
//!
//! let file = |first: &str, last: &str| {
//!     DatasetMeta::from_extraction([
//!         ArrayMetadataRecord::new("pr", vec![100, 4], DataType::Float32, &["time", "lat"])
//!             .with_data_var(true),
//!         ArrayMetadataRecord::new("time", vec![100], DataType::Float64, &["time"])
//!             .with_dimension_range("time", (first, last)),
//!         ArrayMetadataRecord::new("lat", vec![4], DataType::Float64, &["lat"]),
//!     ])
//! };
//! let merged = DatasetMeta::merge_all(
//!     &[file("2000-01-01", "2000-04-09")?, file("2000-04-10", "2000-07-18")?],
//!     "time",
//! )?;
//! assert_eq!(merged.array_meta("pr").unwrap().shape(), &[200, 4]);
//!
//! let chunk_sizes = ChunkSizes::new().with_chunk_size("time", NonZeroU64::new(30).unwrap());
//! let coverage = merged.chunk_coverage(&file("2000-04-10", "2000-07-18")?, &chunk_sizes, 1)?;
//! assert_eq!(coverage.partially_covered.len(), 2); // pr and time over 90..120
//! assert_eq!(coverage.fully_covered.len(), 7);
//! # Ok::<_, Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Logging
//! `chunkplan` logs analysis reports and coordinate ranges at `info`, coverage classification and merges at `debug`, using the [`log`] crate.
//! A logging implementation must be enabled to capture logs.
//!
//! ## Licence
//! `chunkplan` is licensed under either of
//!  - the Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> or
//!  - the MIT license <http://opensource.org/licenses/MIT>, at your option.
//!
//! Unless you explicitly state otherwise, any contribution intentionally submitted for inclusion in the work by you, as defined in the Apache-2.0 license, shall be dual licensed as above, without any additional terms or conditions.

pub mod config;

mod analysis;
mod array_meta;
mod dataset_meta;
mod errors;

pub use chunkplan_chunk_grid as chunk_grid;
pub use chunkplan_metadata as metadata;

pub use analysis::{
    analyze_chunking_strategy, format_mem_size, AlternativeChunkSize, ChunkAnalysis,
    ChunkingReport, DataVariableChunking,
};
pub use array_meta::ArrayMeta;
pub use dataset_meta::{
    ChunkCoverage, ChunkDefinitions, ChunkRegion, ChunkSizes, DatasetMeta, FileExtent,
    FileExtentProvider,
};
pub use errors::{AnalysisError, ChunkCoverageError, DatasetMetaCreateError, ValidationError};
