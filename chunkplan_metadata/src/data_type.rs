//! Array element data types.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An unsupported data type error.
#[derive(Clone, Debug, Error)]
#[error("unsupported data type {_0}")]
pub struct UnsupportedDataTypeError(String);

/// The element type of an array.
///
/// Fixed size types carry their byte width in their name.
/// [`DataType::Object`] covers variable length elements (e.g. strings or Python objects), whose size can only be estimated.
///
/// Data types serialise to their name and deserialise from either their name or a `NumPy` type string (see [`DataType::from_numpy_typestr`]).
#[derive(Serialize, Deserialize, Clone, Copy, Eq, PartialEq, Hash, Debug, Display)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum DataType {
    /// `bool` Boolean.
    #[display("bool")]
    Bool,
    /// `int8` Integer in `[-2^7, 2^7-1]`.
    #[display("int8")]
    Int8,
    /// `int16` Integer in `[-2^15, 2^15-1]`.
    #[display("int16")]
    Int16,
    /// `int32` Integer in `[-2^31, 2^31-1]`.
    #[display("int32")]
    Int32,
    /// `int64` Integer in `[-2^63, 2^63-1]`.
    #[display("int64")]
    Int64,
    /// `uint8` Integer in `[0, 2^8-1]`.
    #[display("uint8")]
    UInt8,
    /// `uint16` Integer in `[0, 2^16-1]`.
    #[display("uint16")]
    UInt16,
    /// `uint32` Integer in `[0, 2^32-1]`.
    #[display("uint32")]
    UInt32,
    /// `uint64` Integer in `[0, 2^64-1]`.
    #[display("uint64")]
    UInt64,
    /// `float16` IEEE 754 half-precision floating point.
    #[display("float16")]
    Float16,
    /// `float32` IEEE 754 single-precision floating point.
    #[display("float32")]
    Float32,
    /// `float64` IEEE 754 double-precision floating point.
    #[display("float64")]
    Float64,
    /// `complex64` real and complex components are each IEEE 754 single-precision floating point.
    #[display("complex64")]
    Complex64,
    /// `complex128` real and complex components are each IEEE 754 double-precision floating point.
    #[display("complex128")]
    Complex128,
    /// `datetime64` a 64-bit timestamp.
    #[display("datetime64")]
    DateTime64,
    /// `timedelta64` a 64-bit time interval.
    #[display("timedelta64")]
    TimeDelta64,
    /// `object` variable length elements.
    #[display("object")]
    Object,
}

impl DataType {
    /// The size in bytes of an element, or [`None`] for variable length types.
    #[must_use]
    pub const fn size(&self) -> Option<usize> {
        match self {
            Self::Bool | Self::Int8 | Self::UInt8 => Some(1),
            Self::Int16 | Self::UInt16 | Self::Float16 => Some(2),
            Self::Int32 | Self::UInt32 | Self::Float32 => Some(4),
            Self::Int64
            | Self::UInt64
            | Self::Float64
            | Self::Complex64
            | Self::DateTime64
            | Self::TimeDelta64 => Some(8),
            Self::Complex128 => Some(16),
            Self::Object => None,
        }
    }

    /// Returns true if elements are variable length.
    #[must_use]
    pub const fn is_variable_length(&self) -> bool {
        self.size().is_none()
    }

    /// Create a data type from a `NumPy` array-interface type string, such as `<f4`, `|b1` or `<M8[ns]`.
    ///
    /// # Errors
    /// Returns an [`UnsupportedDataTypeError`] if the type string does not describe a supported data type.
    pub fn from_numpy_typestr(typestr: &str) -> Result<Self, UnsupportedDataTypeError> {
        let unsupported = || UnsupportedDataTypeError(typestr.to_string());
        let typestr = typestr.trim_start_matches(['<', '>', '|', '=']);
        let mut chars = typestr.chars();
        let kind = chars.next().ok_or_else(unsupported)?;
        let rest = chars.as_str();
        let width = rest.split('[').next().unwrap_or_default();
        let width: usize = if width.is_empty() {
            0
        } else {
            width.parse().map_err(|_| unsupported())?
        };
        Ok(match (kind, width) {
            ('b', 1) | ('?', 0 | 1) => Self::Bool,
            ('i', 1) => Self::Int8,
            ('i', 2) => Self::Int16,
            ('i', 4) => Self::Int32,
            ('i', 8) => Self::Int64,
            ('u', 1) => Self::UInt8,
            ('u', 2) => Self::UInt16,
            ('u', 4) => Self::UInt32,
            ('u', 8) => Self::UInt64,
            ('f', 2) => Self::Float16,
            ('f', 4) => Self::Float32,
            ('f', 8) => Self::Float64,
            ('c', 8) => Self::Complex64,
            ('c', 16) => Self::Complex128,
            ('M', 8) => Self::DateTime64,
            ('m', 8) => Self::TimeDelta64,
            ('O' | 'U' | 'S', _) => Self::Object,
            _ => return Err(unsupported()),
        })
    }
}

impl std::str::FromStr for DataType {
    type Err = UnsupportedDataTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "bool" => Self::Bool,
            "int8" => Self::Int8,
            "int16" => Self::Int16,
            "int32" => Self::Int32,
            "int64" => Self::Int64,
            "uint8" => Self::UInt8,
            "uint16" => Self::UInt16,
            "uint32" => Self::UInt32,
            "uint64" => Self::UInt64,
            "float16" => Self::Float16,
            "float32" => Self::Float32,
            "float64" => Self::Float64,
            "complex64" => Self::Complex64,
            "complex128" => Self::Complex128,
            "datetime64" => Self::DateTime64,
            "timedelta64" => Self::TimeDelta64,
            "object" => Self::Object,
            _ => return Self::from_numpy_typestr(s),
        })
    }
}

impl TryFrom<String> for DataType {
    type Error = UnsupportedDataTypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
