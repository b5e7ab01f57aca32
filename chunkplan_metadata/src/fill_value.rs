//! Fill values.

use serde::{Deserialize, Serialize};

/// A fill value.
///
/// The little-endian bytes of the sentinel element that denotes missing data.
/// Two fill values are equal if their bytes are equal, so identical `NaN` sentinels compare equal.
///
/// Fill values are created from [`FillValueMetadata`](crate::FillValueMetadata) with [`DataType::fill_value_from_metadata`](crate::DataType::fill_value_from_metadata).
#[derive(Serialize, Deserialize, Clone, Eq, PartialEq, Hash, Debug)]
#[serde(transparent)]
pub struct FillValue(Vec<u8>);

impl core::fmt::Display for FillValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl From<Vec<u8>> for FillValue {
    fn from(value: Vec<u8>) -> Self {
        Self(value)
    }
}

impl From<bool> for FillValue {
    fn from(value: bool) -> Self {
        Self(vec![u8::from(value)])
    }
}

macro_rules! impl_fill_value_from_primitive {
    ($($t:ty),*) => {
        $(
            impl From<$t> for FillValue {
                fn from(value: $t) -> Self {
                    Self(value.to_le_bytes().to_vec())
                }
            }
        )*
    };
}

impl_fill_value_from_primitive!(u8, u16, u32, u64, i8, i16, i32, i64, f32, f64, half::f16);

impl FillValue {
    /// Returns the size in bytes of the fill value.
    #[must_use]
    pub fn size(&self) -> usize {
        self.0.len()
    }

    /// Return the little-endian byte representation of the fill value.
    #[must_use]
    pub fn as_le_bytes(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_value() {
        assert_eq!(FillValue::from(1.0e20f32).size(), 4);
        assert_eq!(FillValue::from(1.0e20f32), FillValue::from(1.0e20f32));
        assert_ne!(FillValue::from(1.0e20f32), FillValue::from(1.0e20f64));
        assert_eq!(FillValue::from(f64::NAN), FillValue::from(f64::NAN));
        assert_eq!(FillValue::from(true).as_le_bytes(), &[1]);
        assert_eq!(FillValue::from(0x0102u16).as_le_bytes(), &[2, 1]);
        assert_eq!(
            FillValue::from(half::f16::from_f32(1.0)).as_le_bytes(),
            &[0x00, 0x3c]
        );
    }

    #[test]
    fn fill_value_serde() {
        let fill_value = FillValue::from(-2i16);
        let json = serde_json::to_string(&fill_value).unwrap();
        assert_eq!(json, "[254,255]");
        assert_eq!(serde_json::from_str::<FillValue>(&json).unwrap(), fill_value);
    }
}
