use itertools::Itertools;
use thiserror::Error;

use crate::metadata::{ArrayShape, DataType, FillValue, IncompatibleFillValueMetadataError};

fn display_fill_value(fill_value: Option<&FillValue>) -> String {
    fill_value.map_or_else(|| "none".to_string(), ToString::to_string)
}

/// A metadata validation error.
///
/// Raised when array metadata is inconsistent or two metadata sets cannot be merged.
#[derive(Clone, Debug, Error)]
#[non_exhaustive]
pub enum ValidationError {
    /// The number of dimension names does not match the array dimensionality.
    #[error("dimension names {0:?} do not match the dimensionality of shape {1:?}")]
    DimensionalityMismatch(Vec<String>, ArrayShape),
    /// The data types of the operands differ.
    #[error("data types do not match: {0} and {1}")]
    DataTypeMismatch(DataType, DataType),
    /// The fill values of the operands differ.
    #[error("fill values do not match: {} and {}", display_fill_value(.0.as_ref()), display_fill_value(.1.as_ref()))]
    FillValueMismatch(Option<FillValue>, Option<FillValue>),
    /// The concatenation dimension is not a dimension of the variable.
    #[error("concatenation dimension `{dimension}` not found in metadata for `{variable}`")]
    MissingConcatDimension {
        /// The concatenation dimension.
        dimension: String,
        /// The `standard_name` of the variable, or `unknown`.
        variable: String,
    },
    /// The dimension names of the operands differ.
    #[error("dimension names do not match: {0:?} and {1:?}")]
    DimensionNamesMismatch(Vec<String>, Vec<String>),
    /// The operands differ in size along a dimension other than the concatenation dimension.
    #[error("shapes {0:?} and {1:?} differ outside the concatenation dimension `{2}`")]
    ShapeMismatch(ArrayShape, ArrayShape, String),
    /// The merged size along the concatenation dimension overflows.
    #[error("the merged size along the concatenation dimension `{0}` overflows")]
    ConcatSizeOverflow(String),
    /// The coordinate values of a dimension range cannot be ordered.
    #[error("the ranges of dimension `{0}` have incomparable coordinate values")]
    IncomparableDimensionRange(String),
    /// The operands do not have the same variables.
    #[error(
        "metadata mismatch: missing in self [{}], missing in other [{}]",
        .missing_in_self.iter().join(", "),
        .missing_in_other.iter().join(", ")
    )]
    VariableSetMismatch {
        /// Variables of `other` that are not in `self`.
        missing_in_self: Vec<String>,
        /// Variables of `self` that are not in `other`.
        missing_in_other: Vec<String>,
    },
    /// A variable without the concatenation dimension differs between the operands.
    #[error("non-merging variable `{0}` differs between metadata sets")]
    NonConcatVariableMismatch(String),
    /// A variable could not be merged.
    #[error("variable `{variable}`: {source}")]
    Variable {
        /// The variable name.
        variable: String,
        /// The underlying error.
        #[source]
        source: Box<ValidationError>,
    },
    /// There was nothing to merge.
    #[error("no metadata to merge")]
    EmptyMerge,
}

/// A [`DatasetMeta`](crate::DatasetMeta) creation error.
#[derive(Clone, Debug, Error)]
#[non_exhaustive]
pub enum DatasetMetaCreateError {
    /// A variable was reported more than once.
    #[error("duplicate variable `{0}`")]
    DuplicateVariable(String),
    /// The metadata of a variable is inconsistent.
    #[error("variable `{0}`: {1}")]
    InvalidArrayMeta(String, #[source] ValidationError),
    /// The fill value of a variable does not suit its data type.
    #[error("variable `{0}`: {1}")]
    InvalidFillValue(String, #[source] IncompatibleFillValueMetadataError),
    /// A variable length data type has no element size estimate.
    #[error("variable `{0}` has variable length data type `{1}` and no estimated element size")]
    MissingElementSize(String, DataType),
    /// An element size estimate is not a positive finite number.
    #[error("variable `{0}` has invalid estimated element size {1}")]
    InvalidElementSize(String, f64),
}

/// A chunk coverage error.
#[derive(Clone, Debug, Error)]
#[non_exhaustive]
pub enum ChunkCoverageError {
    /// The file does not declare its size along the concatenation dimension.
    #[error("the file does not declare its size along the concatenation dimension `{0}`")]
    MissingConcatExtent(String),
    /// The offset of the file along the concatenation dimension overflows.
    #[error("the offset of file {file_index} with size {file_size} along the concatenation dimension overflows")]
    FileOffsetOverflow {
        /// The file index.
        file_index: u64,
        /// The file size along the concatenation dimension.
        file_size: u64,
    },
}

/// A chunking strategy analysis error.
#[derive(Clone, Debug, Error)]
#[non_exhaustive]
pub enum AnalysisError {
    /// A chunk size was requested for a dimension without a coordinate variable.
    #[error("dimension `{0}` has no coordinate variable")]
    MissingCoordinateVariable(String),
}
