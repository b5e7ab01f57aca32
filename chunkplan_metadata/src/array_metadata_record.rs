use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{ArrayShape, Attributes, DataType, DimensionRange, FillValueMetadata};

/// The metadata of one variable, as reported by a metadata extractor for a single source file.
///
/// For example:
/// ```json
/// {
///     "name": "pr",
///     "shape": [14600, 192, 288],
///     "data_type": "float32",
///     "dimension_names": ["time", "lat", "lon"],
///     "dimension_ranges": {
///         "time": ["1850-01-01T01:30:00", "1854-12-31T22:30:00"],
///         "lat": [-90.0, 90.0],
///         "lon": [0.0, 358.75]
///     },
///     "fill_value": 1e20,
///     "is_data_var": true,
///     "attributes": {"standard_name": "precipitation_flux"}
/// }
/// ```
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct ArrayMetadataRecord {
    /// The variable name.
    pub name: String,
    /// The array shape.
    pub shape: ArrayShape,
    /// The element data type.
    pub data_type: DataType,
    /// The name of each axis, in axis order.
    pub dimension_names: Vec<String>,
    /// The first and last coordinate of each axis that is a coordinate variable.
    #[serde(default, with = "dimension_ranges_as_pairs")]
    pub dimension_ranges: BTreeMap<String, DimensionRange>,
    /// Chunking hints. Defaults to one chunk spanning the array.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_grid: Option<Vec<u64>>,
    /// The fill value, interpreted according to the data type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_value: Option<FillValueMetadata>,
    /// The estimated element size in bytes. Defaults to the size of the data type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_element_size: Option<f64>,
    /// Whether the variable is a data variable rather than a coordinate or auxiliary variable.
    #[serde(default)]
    pub is_data_var: bool,
    /// Free-form attributes.
    #[serde(default)]
    pub attributes: Attributes,
}

impl ArrayMetadataRecord {
    /// Create a new record for a coordinate or auxiliary variable with no ranges, hints, fill value or attributes.
    pub fn new(
        name: impl Into<String>,
        shape: ArrayShape,
        data_type: DataType,
        dimension_names: &[&str],
    ) -> Self {
        Self {
            name: name.into(),
            shape,
            data_type,
            dimension_names: dimension_names.iter().map(ToString::to_string).collect(),
            dimension_ranges: BTreeMap::new(),
            chunk_grid: None,
            fill_value: None,
            estimated_element_size: None,
            is_data_var: false,
            attributes: Attributes::new(),
        }
    }

    /// Set the range of `dimension`.
    #[must_use]
    pub fn with_dimension_range(
        mut self,
        dimension: impl Into<String>,
        range: impl Into<DimensionRange>,
    ) -> Self {
        self.dimension_ranges.insert(dimension.into(), range.into());
        self
    }

    /// Set the chunking hints.
    #[must_use]
    pub fn with_chunk_grid(mut self, chunk_grid: Vec<u64>) -> Self {
        self.chunk_grid = Some(chunk_grid);
        self
    }

    /// Set the fill value.
    #[must_use]
    pub fn with_fill_value(mut self, fill_value: impl Into<FillValueMetadata>) -> Self {
        self.fill_value = Some(fill_value.into());
        self
    }

    /// Set the estimated element size.
    #[must_use]
    pub fn with_estimated_element_size(mut self, estimated_element_size: f64) -> Self {
        self.estimated_element_size = Some(estimated_element_size);
        self
    }

    /// Mark the record as a data variable.
    #[must_use]
    pub fn with_data_var(mut self, is_data_var: bool) -> Self {
        self.is_data_var = is_data_var;
        self
    }

    /// Set an attribute.
    #[must_use]
    pub fn with_attribute(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

/// Dimension ranges are written as `[first, last]` pairs.
mod dimension_ranges_as_pairs {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::{CoordinateValue, DimensionRange};

    pub(super) fn serialize<S: Serializer>(
        ranges: &BTreeMap<String, DimensionRange>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        ranges
            .iter()
            .map(|(dimension, range)| (dimension, (&range.first, &range.last)))
            .collect::<BTreeMap<_, _>>()
            .serialize(serializer)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<String, DimensionRange>, D::Error> {
        let pairs = BTreeMap::<String, (CoordinateValue, CoordinateValue)>::deserialize(deserializer)?;
        Ok(pairs
            .into_iter()
            .map(|(dimension, pair)| (dimension, DimensionRange::from(pair)))
            .collect())
    }
}
