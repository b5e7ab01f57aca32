//! Per-variable array metadata.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::metadata::{ArrayAttributes, ArrayShape, DataType, DimensionRange, FillValue};
use crate::ValidationError;

/// The metadata of one variable.
///
/// Describes the shape, element type and coordinate extent of a variable in a single source file,
/// or of a logical variable spanning several files after [merging](ArrayMeta::merge_with).
///
/// The dimension names in the [`attributes`](ArrayMeta::attributes) name the axes of the [`shape`](ArrayMeta::shape) positionally.
#[derive(Serialize, Clone, PartialEq, Debug)]
pub struct ArrayMeta {
    shape: ArrayShape,
    data_type: DataType,
    fill_value: Option<FillValue>,
    chunk_grid: Vec<u64>,
    attributes: ArrayAttributes,
    dimension_ranges: BTreeMap<String, DimensionRange>,
    estimated_element_size: f64,
    is_data_var: bool,
}

fn validate_dimensionality(
    shape: &[u64],
    attributes: &ArrayAttributes,
) -> Result<(), ValidationError> {
    if attributes.dimension_names.len() == shape.len() {
        Ok(())
    } else {
        Err(ValidationError::DimensionalityMismatch(
            attributes.dimension_names.clone(),
            shape.to_vec(),
        ))
    }
}

impl<'de> Deserialize<'de> for ArrayMeta {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct ArrayMetaFields {
            shape: ArrayShape,
            data_type: DataType,
            fill_value: Option<FillValue>,
            chunk_grid: Vec<u64>,
            attributes: ArrayAttributes,
            dimension_ranges: BTreeMap<String, DimensionRange>,
            estimated_element_size: f64,
            is_data_var: bool,
        }
        let fields = ArrayMetaFields::deserialize(d)?;
        validate_dimensionality(&fields.shape, &fields.attributes)
            .map_err(serde::de::Error::custom)?;
        Ok(Self {
            shape: fields.shape,
            data_type: fields.data_type,
            fill_value: fields.fill_value,
            chunk_grid: fields.chunk_grid,
            attributes: fields.attributes,
            dimension_ranges: fields.dimension_ranges,
            estimated_element_size: fields.estimated_element_size,
            is_data_var: fields.is_data_var,
        })
    }
}

impl ArrayMeta {
    /// Create new array metadata.
    ///
    /// The chunk grid defaults to a single chunk spanning the array and the estimated element size to the size of `data_type`
    /// (zero for variable length types, see [`with_estimated_element_size`](ArrayMeta::with_estimated_element_size)).
    ///
    /// # Errors
    /// Returns [`ValidationError::DimensionalityMismatch`] if the number of dimension names in `attributes` does not match the length of `shape`.
    pub fn new(
        shape: ArrayShape,
        data_type: DataType,
        attributes: ArrayAttributes,
    ) -> Result<Self, ValidationError> {
        validate_dimensionality(&shape, &attributes)?;
        #[allow(clippy::cast_precision_loss)]
        let estimated_element_size = data_type.size().unwrap_or_default() as f64;
        Ok(Self {
            chunk_grid: shape.clone(),
            shape,
            data_type,
            fill_value: None,
            attributes,
            dimension_ranges: BTreeMap::new(),
            estimated_element_size,
            is_data_var: false,
        })
    }

    /// Set the fill value.
    #[must_use]
    pub fn with_fill_value(mut self, fill_value: Option<FillValue>) -> Self {
        self.fill_value = fill_value;
        self
    }

    /// Set the chunking hints.
    #[must_use]
    pub fn with_chunk_grid(mut self, chunk_grid: Vec<u64>) -> Self {
        self.chunk_grid = chunk_grid;
        self
    }

    /// Set the dimension ranges.
    #[must_use]
    pub fn with_dimension_ranges(
        mut self,
        dimension_ranges: BTreeMap<String, DimensionRange>,
    ) -> Self {
        self.dimension_ranges = dimension_ranges;
        self
    }

    /// Set the estimated size in bytes of an element.
    #[must_use]
    pub fn with_estimated_element_size(mut self, estimated_element_size: f64) -> Self {
        self.estimated_element_size = estimated_element_size;
        self
    }

    /// Mark the variable as a data variable.
    #[must_use]
    pub fn with_data_var(mut self, is_data_var: bool) -> Self {
        self.is_data_var = is_data_var;
        self
    }

    /// Return the shape.
    #[must_use]
    pub fn shape(&self) -> &[u64] {
        &self.shape
    }

    /// Return the dimensionality.
    #[must_use]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Return the data type.
    #[must_use]
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Return the fill value.
    #[must_use]
    pub fn fill_value(&self) -> Option<&FillValue> {
        self.fill_value.as_ref()
    }

    /// Return the chunking hints.
    ///
    /// These are informational and do not influence [chunk enumeration](crate::DatasetMeta::enumerate_chunks).
    #[must_use]
    pub fn chunk_grid(&self) -> &[u64] {
        &self.chunk_grid
    }

    /// Return the attributes.
    #[must_use]
    pub fn attributes(&self) -> &ArrayAttributes {
        &self.attributes
    }

    /// Return the dimension names.
    #[must_use]
    pub fn dimension_names(&self) -> &[String] {
        &self.attributes.dimension_names
    }

    /// Return the size of the array along `dimension`.
    #[must_use]
    pub fn dimension_size(&self, dimension: &str) -> Option<u64> {
        self.attributes
            .dimension_index(dimension)
            .and_then(|index| self.shape.get(index).copied())
    }

    /// Return the dimension ranges.
    #[must_use]
    pub fn dimension_ranges(&self) -> &BTreeMap<String, DimensionRange> {
        &self.dimension_ranges
    }

    /// Return the estimated size in bytes of an element.
    #[must_use]
    pub fn estimated_element_size(&self) -> f64 {
        self.estimated_element_size
    }

    /// Returns true if the variable is a data variable.
    #[must_use]
    pub fn is_data_var(&self) -> bool {
        self.is_data_var
    }

    /// A name identifying the variable in messages: its `standard_name`, or `unknown`.
    #[must_use]
    pub fn identifier(&self) -> &str {
        self.attributes.standard_name().unwrap_or("unknown")
    }

    /// Merge with the metadata of the same variable in the file following this one along `concat_dim`.
    ///
    /// The merged array
    ///  - has the sum of both sizes along `concat_dim` and the shared size along every other dimension,
    ///  - has the attributes of both, with `other` taking precedence,
    ///  - keeps the chunking hints of `self`,
    ///  - spans from the first coordinate of `self` to the last coordinate of `other` along `concat_dim`,
    ///    and the union of both ranges along every other dimension,
    ///  - has the mean of both estimated element sizes.
    ///
    /// # Errors
    /// Returns a [`ValidationError`] if
    ///  - the data types or fill values differ,
    ///  - `concat_dim` is not a dimension of `self`,
    ///  - the dimension names differ or the shapes differ along a dimension other than `concat_dim`,
    ///  - the merged size along `concat_dim` overflows [`u64`], or
    ///  - the ranges of a shared dimension are incomparable.
    pub fn merge_with(&self, other: &Self, concat_dim: &str) -> Result<Self, ValidationError> {
        if self.data_type != other.data_type {
            return Err(ValidationError::DataTypeMismatch(
                self.data_type,
                other.data_type,
            ));
        }
        if self.fill_value != other.fill_value {
            return Err(ValidationError::FillValueMismatch(
                self.fill_value.clone(),
                other.fill_value.clone(),
            ));
        }
        let concat_index = self.attributes.dimension_index(concat_dim).ok_or_else(|| {
            ValidationError::MissingConcatDimension {
                dimension: concat_dim.to_string(),
                variable: self.identifier().to_string(),
            }
        })?;
        if self.attributes.dimension_names != other.attributes.dimension_names {
            return Err(ValidationError::DimensionNamesMismatch(
                self.attributes.dimension_names.clone(),
                other.attributes.dimension_names.clone(),
            ));
        }
        let shape_mismatch = self.shape.len() != other.shape.len()
            || std::iter::zip(&self.shape, &other.shape)
                .enumerate()
                .any(|(index, (a, b))| index != concat_index && a != b);
        if shape_mismatch {
            return Err(ValidationError::ShapeMismatch(
                self.shape.clone(),
                other.shape.clone(),
                concat_dim.to_string(),
            ));
        }

        let mut shape = self.shape.clone();
        let (Some(size), Some(&other_size)) =
            (shape.get_mut(concat_index), other.shape.get(concat_index))
        else {
            return Err(ValidationError::DimensionalityMismatch(
                self.attributes.dimension_names.clone(),
                self.shape.clone(),
            ));
        };
        *size = size
            .checked_add(other_size)
            .ok_or_else(|| ValidationError::ConcatSizeOverflow(concat_dim.to_string()))?;

        let mut dimension_ranges = self.dimension_ranges.clone();
        for (dimension, other_range) in &other.dimension_ranges {
            let range = match self.dimension_ranges.get(dimension) {
                Some(range) if dimension == concat_dim => range.concatenate(other_range),
                Some(range) => range.union(other_range).ok_or_else(|| {
                    ValidationError::IncomparableDimensionRange(dimension.clone())
                })?,
                None => other_range.clone(),
            };
            dimension_ranges.insert(dimension.clone(), range);
        }

        if self.estimated_element_size != other.estimated_element_size {
            log::warn!(
                "Averaging differing element size estimates {} and {} for `{}`.",
                self.estimated_element_size,
                other.estimated_element_size,
                self.identifier()
            );
        }

        Ok(Self {
            shape,
            data_type: self.data_type,
            fill_value: self.fill_value.clone(),
            chunk_grid: self.chunk_grid.clone(),
            attributes: self.attributes.union(&other.attributes),
            dimension_ranges,
            estimated_element_size: (self.estimated_element_size
                + other.estimated_element_size)
                / 2.0,
            is_data_var: self.is_data_var,
        })
    }
}
