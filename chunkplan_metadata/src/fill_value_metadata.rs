//! Fill value metadata.
//!
//! Extractors report fill values as JSON values, such as `1e20`, `-9999` or `"NaN"`.
//! The interpretation of fill value metadata depends on the data type, see [`DataType::fill_value_from_metadata`].

use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{DataType, FillValue};

/// Fill value metadata.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug, Display, From)]
#[serde(untagged)]
pub enum FillValueMetadata {
    /// A boolean value.
    Bool(bool),
    /// An unsigned integer.
    UInt(u64),
    /// A signed integer.
    Int(i64),
    /// A float.
    Float(FillValueFloat),
}

impl From<f64> for FillValueMetadata {
    fn from(value: f64) -> Self {
        Self::Float(value.into())
    }
}

impl From<f32> for FillValueMetadata {
    fn from(value: f32) -> Self {
        Self::Float(f64::from(value).into())
    }
}

/// A float fill value.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug, Display)]
#[serde(untagged)]
pub enum FillValueFloat {
    /// A finite float.
    Float(f64),
    /// A string representation of a non finite value.
    NonFinite(FillValueFloatStringNonFinite),
}

impl From<f64> for FillValueFloat {
    fn from(value: f64) -> Self {
        use FillValueFloatStringNonFinite as NF;
        if value.is_nan() {
            Self::NonFinite(NF::NaN)
        } else if value.is_infinite() && value.is_sign_positive() {
            Self::NonFinite(NF::PosInfinity)
        } else if value.is_infinite() {
            Self::NonFinite(NF::NegInfinity)
        } else {
            Self::Float(value)
        }
    }
}

impl FillValueFloat {
    fn to_f64(self) -> f64 {
        use FillValueFloatStringNonFinite as NF;
        match self {
            Self::Float(float) => float,
            Self::NonFinite(NF::PosInfinity) => f64::INFINITY,
            Self::NonFinite(NF::NegInfinity) => f64::NEG_INFINITY,
            Self::NonFinite(NF::NaN) => f64::NAN,
        }
    }
}

/// A string representation of a non finite value.
#[derive(Serialize, Deserialize, Clone, Copy, Eq, PartialEq, Debug, Display)]
pub enum FillValueFloatStringNonFinite {
    /// Positive infinity.
    #[serde(rename = "Infinity")]
    #[display("Infinity")]
    PosInfinity,
    /// Negative infinity.
    #[serde(rename = "-Infinity")]
    #[display("-Infinity")]
    NegInfinity,
    /// NaN (not-a-number).
    #[serde(rename = "NaN")]
    #[display("NaN")]
    NaN,
}

impl FillValueMetadata {
    /// Convert the fill value to a [`bool`].
    #[must_use]
    pub const fn try_as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(bool) => Some(*bool),
            _ => None,
        }
    }

    /// Convert the fill value to an integer, if it is an integer in the range of `T`.
    #[must_use]
    pub fn try_as_int<T: TryFrom<i64> + TryFrom<u64>>(&self) -> Option<T> {
        match self {
            Self::UInt(uint) => T::try_from(*uint).ok(),
            Self::Int(int) => T::try_from(*int).ok(),
            _ => None,
        }
    }

    /// Convert the fill value to a float.
    ///
    /// Integers are converted to the nearest float.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn try_as_float(&self) -> Option<f64> {
        match self {
            Self::Float(float) => Some(float.to_f64()),
            Self::UInt(uint) => Some(*uint as f64),
            Self::Int(int) => Some(*int as f64),
            Self::Bool(_) => None,
        }
    }
}

/// An incompatible fill value metadata error.
#[derive(Clone, Debug, Error)]
#[error("incompatible fill value {_1} for data type {_0}")]
pub struct IncompatibleFillValueMetadataError(DataType, FillValueMetadata);

impl DataType {
    /// Create a fill value from fill value metadata.
    ///
    /// Datetime and timedelta fill values are integers, with `NaT` being [`i64::MIN`].
    /// Complex fill values are real.
    ///
    /// # Errors
    /// Returns [`IncompatibleFillValueMetadataError`] if the fill value metadata is not compatible with the data type,
    /// or the data type is variable length.
    #[allow(clippy::cast_possible_truncation)]
    pub fn fill_value_from_metadata(
        &self,
        fill_value: &FillValueMetadata,
    ) -> Result<FillValue, IncompatibleFillValueMetadataError> {
        use FillValue as FV;
        let err = || IncompatibleFillValueMetadataError(*self, fill_value.clone());
        let float = || fill_value.try_as_float().ok_or_else(err);
        Ok(match self {
            Self::Bool => FV::from(fill_value.try_as_bool().ok_or_else(err)?),
            Self::Int8 => FV::from(fill_value.try_as_int::<i8>().ok_or_else(err)?),
            Self::Int16 => FV::from(fill_value.try_as_int::<i16>().ok_or_else(err)?),
            Self::Int32 => FV::from(fill_value.try_as_int::<i32>().ok_or_else(err)?),
            Self::Int64 | Self::DateTime64 | Self::TimeDelta64 => {
                FV::from(fill_value.try_as_int::<i64>().ok_or_else(err)?)
            }
            Self::UInt8 => FV::from(fill_value.try_as_int::<u8>().ok_or_else(err)?),
            Self::UInt16 => FV::from(fill_value.try_as_int::<u16>().ok_or_else(err)?),
            Self::UInt32 => FV::from(fill_value.try_as_int::<u32>().ok_or_else(err)?),
            Self::UInt64 => FV::from(fill_value.try_as_int::<u64>().ok_or_else(err)?),
            Self::Float16 => FV::from(half::f16::from_f64(float()?)),
            Self::Float32 => FV::from(float()? as f32),
            Self::Float64 => FV::from(float()?),
            Self::Complex64 => {
                let mut bytes = (float()? as f32).to_le_bytes().to_vec();
                bytes.extend(0f32.to_le_bytes());
                FV::from(bytes)
            }
            Self::Complex128 => {
                let mut bytes = float()?.to_le_bytes().to_vec();
                bytes.extend(0f64.to_le_bytes());
                FV::from(bytes)
            }
            Self::Object => return Err(err()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_value_metadata_json() {
        let parse = |json: &str| serde_json::from_str::<FillValueMetadata>(json).unwrap();
        assert_eq!(parse("true"), FillValueMetadata::Bool(true));
        assert_eq!(parse("7"), FillValueMetadata::UInt(7));
        assert_eq!(parse("-9999"), FillValueMetadata::Int(-9999));
        assert_eq!(parse("1e20"), FillValueMetadata::from(1.0e20f64));
        assert_eq!(parse(r#""NaN""#), FillValueMetadata::from(f64::NAN));
        assert_eq!(parse(r#""-Infinity""#), FillValueMetadata::from(f64::NEG_INFINITY));
        assert!(serde_json::from_str::<FillValueMetadata>(r#""missing""#).is_err());

        assert_eq!(
            serde_json::to_string(&FillValueMetadata::from(f32::INFINITY)).unwrap(),
            r#""Infinity""#
        );
        assert_eq!(FillValueMetadata::from(f64::NAN).to_string(), "NaN");
    }

    #[test]
    fn fill_value_from_metadata() {
        let fill_value = FillValueMetadata::from(1.0e20f64);
        assert_eq!(
            DataType::Float32.fill_value_from_metadata(&fill_value).unwrap(),
            FillValue::from(1.0e20f32)
        );
        assert_eq!(
            DataType::Float64.fill_value_from_metadata(&fill_value).unwrap(),
            FillValue::from(1.0e20f64)
        );
        assert!(DataType::Int32.fill_value_from_metadata(&fill_value).is_err());

        let fill_value = FillValueMetadata::Int(-9999);
        assert_eq!(
            DataType::Int16.fill_value_from_metadata(&fill_value).unwrap(),
            FillValue::from(-9999i16)
        );
        assert_eq!(
            DataType::Float32.fill_value_from_metadata(&fill_value).unwrap(),
            FillValue::from(-9999.0f32)
        );
        assert!(DataType::Int8.fill_value_from_metadata(&fill_value).is_err());
        assert!(DataType::UInt16.fill_value_from_metadata(&fill_value).is_err());

        assert_eq!(
            DataType::Float32
                .fill_value_from_metadata(&FillValueMetadata::from(f32::NAN))
                .unwrap(),
            FillValue::from(f32::NAN)
        );
        assert_eq!(
            DataType::DateTime64
                .fill_value_from_metadata(&FillValueMetadata::from(i64::MIN))
                .unwrap(),
            FillValue::from(i64::MIN)
        );
        assert_eq!(
            DataType::Complex64
                .fill_value_from_metadata(&FillValueMetadata::UInt(1))
                .unwrap()
                .as_le_bytes(),
            [1f32.to_le_bytes(), 0f32.to_le_bytes()].concat()
        );
        assert_eq!(
            DataType::Bool
                .fill_value_from_metadata(&FillValueMetadata::Bool(false))
                .unwrap(),
            FillValue::from(false)
        );

        let err = DataType::Object
            .fill_value_from_metadata(&FillValueMetadata::UInt(0))
            .unwrap_err();
        assert_eq!(err.to_string(), "incompatible fill value 0 for data type object");
    }
}
