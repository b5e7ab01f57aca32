//! Coordinate values and dimension ranges.

use std::cmp::Ordering;

use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

/// The value of a coordinate variable at one position along its axis.
///
/// Time coordinates are carried as ISO 8601 strings, which order chronologically.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug, Display, From)]
#[serde(untagged)]
pub enum CoordinateValue {
    /// An integer coordinate.
    Integer(i64),
    /// A floating point coordinate.
    Float(f64),
    /// A string coordinate, such as a timestamp or a label.
    String(String),
}

impl From<&str> for CoordinateValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl PartialOrd for CoordinateValue {
    /// Numeric coordinates compare by value regardless of representation.
    /// Numeric and string coordinates are incomparable.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => a.partial_cmp(b),
            (Self::String(a), Self::String(b)) => a.partial_cmp(b),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b),
            #[allow(clippy::cast_precision_loss)]
            (Self::Integer(a), Self::Float(b)) => (*a as f64).partial_cmp(b),
            #[allow(clippy::cast_precision_loss)]
            (Self::Float(a), Self::Integer(b)) => a.partial_cmp(&(*b as f64)),
            (Self::String(_), Self::Integer(_) | Self::Float(_))
            | (Self::Integer(_) | Self::Float(_), Self::String(_)) => None,
        }
    }
}

/// The first and last coordinate values along an axis.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug, Display)]
#[display("({first}, {last})")]
pub struct DimensionRange {
    /// The coordinate at the first index.
    pub first: CoordinateValue,
    /// The coordinate at the last index.
    pub last: CoordinateValue,
}

impl<A: Into<CoordinateValue>, B: Into<CoordinateValue>> From<(A, B)> for DimensionRange {
    fn from((first, last): (A, B)) -> Self {
        Self::new(first, last)
    }
}

impl DimensionRange {
    /// Create a new dimension range.
    pub fn new(first: impl Into<CoordinateValue>, last: impl Into<CoordinateValue>) -> Self {
        Self {
            first: first.into(),
            last: last.into(),
        }
    }

    /// The range of this axis followed by `other` along the same axis.
    ///
    /// Takes the first value of `self` and the last value of `other` without reordering.
    #[must_use]
    pub fn concatenate(&self, other: &Self) -> Self {
        Self {
            first: self.first.clone(),
            last: other.last.clone(),
        }
    }

    /// The smallest range spanning both `self` and `other`.
    ///
    /// Returns [`None`] if the coordinate values are incomparable.
    #[must_use]
    pub fn union(&self, other: &Self) -> Option<Self> {
        let first = match self.first.partial_cmp(&other.first)? {
            Ordering::Greater => other.first.clone(),
            Ordering::Less | Ordering::Equal => self.first.clone(),
        };
        let last = match self.last.partial_cmp(&other.last)? {
            Ordering::Less => other.last.clone(),
            Ordering::Greater | Ordering::Equal => self.last.clone(),
        };
        Some(Self { first, last })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_value_ordering() {
        assert!(CoordinateValue::from(1i64) < CoordinateValue::from(2i64));
        assert!(CoordinateValue::from(1i64) < CoordinateValue::from(1.5));
        assert!(CoordinateValue::from(-90.0) < CoordinateValue::from(90.0));
        assert!(
            CoordinateValue::from("1850-01-01T01:30:00")
                < CoordinateValue::from("1855-01-01T01:30:00")
        );
        assert_eq!(
            CoordinateValue::from(1i64).partial_cmp(&CoordinateValue::from("a")),
            None
        );
        assert_eq!(
            CoordinateValue::from(f64::NAN).partial_cmp(&CoordinateValue::from(1.0)),
            None
        );
    }

    #[test]
    fn coordinate_value_serde() {
        let values: Vec<CoordinateValue> =
            serde_json::from_str(r#"[1, 2.5, "1850-01-01"]"#).unwrap();
        assert_eq!(
            values,
            vec![
                CoordinateValue::Integer(1),
                CoordinateValue::Float(2.5),
                CoordinateValue::String("1850-01-01".to_string())
            ]
        );
        assert_eq!(values[1].to_string(), "2.5");
    }

    #[test]
    fn dimension_range_concatenate() {
        let a = DimensionRange::new("1850-01-01", "1854-12-31");
        let b = DimensionRange::new("1855-01-01", "1859-12-31");
        assert_eq!(
            a.concatenate(&b),
            DimensionRange::new("1850-01-01", "1859-12-31")
        );
        assert_eq!(
            b.concatenate(&a),
            DimensionRange::new("1855-01-01", "1854-12-31")
        );
    }

    #[test]
    fn dimension_range_union() {
        let a = DimensionRange::new(-90.0, 10.0);
        let b = DimensionRange::new(-10.0, 90.0);
        assert_eq!(a.union(&b), Some(DimensionRange::new(-90.0, 90.0)));
        assert_eq!(b.union(&a), Some(DimensionRange::new(-90.0, 90.0)));
        assert_eq!(a.union(&DimensionRange::new("a", "b")), None);
        assert_eq!(DimensionRange::from((0i64, 5i64)).to_string(), "(0, 5)");
    }
}
