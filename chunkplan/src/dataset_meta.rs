//! Dataset metadata.

mod chunk_coverage;
mod chunk_definitions;

pub use chunk_coverage::{ChunkCoverage, FileExtent, FileExtentProvider};
pub use chunk_definitions::{ChunkDefinitions, ChunkRegion, ChunkSizes};

use std::collections::{btree_map, BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::metadata::{ArrayAttributes, ArrayMetadataRecord};
use crate::{ArrayMeta, DatasetMetaCreateError, ValidationError};

/// The metadata of a dataset: a set of uniquely named variables.
///
/// A `DatasetMeta` either describes a single source file, or, once [merged](DatasetMeta::merge_with),
/// a logical dataset spanning several files concatenated along [`concat_dim`](DatasetMeta::concat_dim).
/// Variables iterate in name order.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug, Default)]
pub struct DatasetMeta {
    arrays: BTreeMap<String, ArrayMeta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    concat_dim: Option<String>,
}

impl DatasetMeta {
    /// Create new dataset metadata.
    #[must_use]
    pub fn new(arrays: BTreeMap<String, ArrayMeta>, concat_dim: Option<String>) -> Self {
        Self { arrays, concat_dim }
    }

    /// Create the metadata of a single source file from the records of a metadata extractor.
    ///
    /// Chunking hints default to one chunk spanning each array, and element size estimates to the size of the data type.
    ///
    /// # Errors
    /// Returns a [`DatasetMetaCreateError`] if
    ///  - a variable name is reported more than once,
    ///  - the number of dimension names of a record does not match its dimensionality,
    ///  - the fill value of a record is not compatible with its data type, or
    ///  - a variable length data type has no element size estimate, or an estimate is not a positive finite number.
    pub fn from_extraction(
        records: impl IntoIterator<Item = ArrayMetadataRecord>,
    ) -> Result<Self, DatasetMetaCreateError> {
        let mut arrays = BTreeMap::new();
        let mut logged_dimensions = BTreeSet::new();
        for record in records {
            #[allow(clippy::cast_precision_loss)]
            let estimated_element_size = match record.estimated_element_size {
                Some(size) if size.is_finite() && size > 0.0 => size,
                Some(size) => {
                    return Err(DatasetMetaCreateError::InvalidElementSize(
                        record.name,
                        size,
                    ))
                }
                None => match record.data_type.size() {
                    Some(size) => size as f64,
                    None => {
                        return Err(DatasetMetaCreateError::MissingElementSize(
                            record.name,
                            record.data_type,
                        ))
                    }
                },
            };

            let fill_value = record
                .fill_value
                .map(|fill_value| record.data_type.fill_value_from_metadata(&fill_value))
                .transpose()
                .map_err(|err| DatasetMetaCreateError::InvalidFillValue(record.name.clone(), err))?;

            let attributes = ArrayAttributes::new(record.dimension_names)
                .with_additional(record.attributes);
            let chunk_grid = record.chunk_grid.unwrap_or_else(|| record.shape.clone());
            let array_meta = ArrayMeta::new(record.shape, record.data_type, attributes)
                .map_err(|err| DatasetMetaCreateError::InvalidArrayMeta(record.name.clone(), err))?
                .with_fill_value(fill_value)
                .with_chunk_grid(chunk_grid)
                .with_dimension_ranges(record.dimension_ranges)
                .with_estimated_element_size(estimated_element_size)
                .with_data_var(record.is_data_var);

            for (dimension, range) in array_meta.dimension_ranges() {
                if logged_dimensions.insert(dimension.clone()) {
                    log::info!("Dimension `{dimension}` spans {range}");
                }
            }

            match arrays.entry(record.name) {
                btree_map::Entry::Vacant(entry) => {
                    entry.insert(array_meta);
                }
                btree_map::Entry::Occupied(entry) => {
                    return Err(DatasetMetaCreateError::DuplicateVariable(
                        entry.key().clone(),
                    ));
                }
            }
        }

        Ok(Self {
            arrays,
            concat_dim: None,
        })
    }

    /// Merge with the metadata of the file following this one along `concat_dim`.
    ///
    /// Variables with `concat_dim` in both operands are [merged](ArrayMeta::merge_with).
    /// All other variables must be identical in both operands and are carried unchanged.
    /// The result is [merged](DatasetMeta::is_merged) along `concat_dim`.
    ///
    /// # Errors
    /// Returns a [`ValidationError`] if
    ///  - the operands do not have the same variable names,
    ///  - a variable without `concat_dim` differs between the operands, or
    ///  - a variable with `concat_dim` cannot be merged.
    pub fn merge_with(&self, other: &Self, concat_dim: &str) -> Result<Self, ValidationError> {
        let missing = |a: &Self, b: &Self| {
            b.arrays
                .keys()
                .filter(|name| !a.arrays.contains_key(*name))
                .cloned()
                .collect::<Vec<_>>()
        };
        let missing_in_self = missing(self, other);
        let missing_in_other = missing(other, self);
        if !missing_in_self.is_empty() || !missing_in_other.is_empty() {
            return Err(ValidationError::VariableSetMismatch {
                missing_in_self,
                missing_in_other,
            });
        }

        // Both maps have the same keys, so they iterate in lockstep
        let arrays = std::iter::zip(&self.arrays, &other.arrays)
            .map(|((name, meta), (_, other_meta))| {
                let merged = if meta.attributes().has_dimension(concat_dim)
                    && other_meta.attributes().has_dimension(concat_dim)
                {
                    log::debug!("Merging `{name}` along `{concat_dim}`");
                    meta.merge_with(other_meta, concat_dim).map_err(|err| {
                        ValidationError::Variable {
                            variable: name.clone(),
                            source: Box::new(err),
                        }
                    })?
                } else if meta == other_meta {
                    meta.clone()
                } else {
                    return Err(ValidationError::NonConcatVariableMismatch(name.clone()));
                };
                Ok((name.clone(), merged))
            })
            .collect::<Result<_, _>>()?;

        Ok(Self {
            arrays,
            concat_dim: Some(concat_dim.to_string()),
        })
    }

    /// Merge an ordered sequence of per-file metadata along `concat_dim`.
    ///
    /// The sequence order is the concatenation order, so file `i` of the sequence is file index `i` in [`chunk_coverage`](DatasetMeta::chunk_coverage).
    /// A single element is returned as is, marked as merged along `concat_dim`.
    ///
    /// # Errors
    /// Returns [`ValidationError::EmptyMerge`] if `metas` is empty, or any error of [`merge_with`](DatasetMeta::merge_with).
    pub fn merge_all<'a>(
        metas: impl IntoIterator<Item = &'a DatasetMeta>,
        concat_dim: &str,
    ) -> Result<Self, ValidationError> {
        let mut metas = metas.into_iter();
        let first = metas.next().ok_or(ValidationError::EmptyMerge)?;
        let mut merged = first.clone();
        merged.concat_dim = Some(concat_dim.to_string());
        metas.try_fold(merged, |merged, meta| merged.merge_with(meta, concat_dim))
    }

    /// Returns true if the metadata is the result of a merge.
    #[must_use]
    pub fn is_merged(&self) -> bool {
        self.concat_dim.is_some()
    }

    /// Return the concatenation dimension, if merged.
    #[must_use]
    pub fn concat_dim(&self) -> Option<&str> {
        self.concat_dim.as_deref()
    }

    /// Return the metadata of every variable.
    #[must_use]
    pub fn arrays(&self) -> &BTreeMap<String, ArrayMeta> {
        &self.arrays
    }

    /// Return the metadata of variable `name`.
    #[must_use]
    pub fn array_meta(&self, name: &str) -> Option<&ArrayMeta> {
        self.arrays.get(name)
    }

    /// Return the data variables.
    pub fn data_vars(&self) -> impl Iterator<Item = (&str, &ArrayMeta)> {
        self.arrays
            .iter()
            .filter(|(_, meta)| meta.is_data_var())
            .map(|(name, meta)| (name.as_str(), meta))
    }
}
