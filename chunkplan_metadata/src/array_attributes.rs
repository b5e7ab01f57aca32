use serde::{Deserialize, Serialize};

use crate::{Attributes, STANDARD_NAME_ATTRIBUTE};

/// The attributes of an array.
///
/// The ordered dimension names are required and typed; everything else is kept as free-form JSON.
/// When serialised, the free-form attributes are flattened alongside `dimension_names`.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug, Default)]
pub struct ArrayAttributes {
    /// The name of each axis, in axis order.
    pub dimension_names: Vec<String>,
    /// Free-form attributes.
    #[serde(flatten)]
    pub additional: Attributes,
}

impl ArrayAttributes {
    /// Create new array attributes with `dimension_names` and no free-form attributes.
    #[must_use]
    pub fn new(dimension_names: Vec<String>) -> Self {
        Self {
            dimension_names,
            additional: Attributes::default(),
        }
    }

    /// Set the free-form attributes.
    #[must_use]
    pub fn with_additional(mut self, additional: Attributes) -> Self {
        self.additional = additional;
        self
    }

    /// Return the index of `dimension` in the dimension names.
    #[must_use]
    pub fn dimension_index(&self, dimension: &str) -> Option<usize> {
        self.dimension_names.iter().position(|name| name == dimension)
    }

    /// Returns true if `dimension` is one of the dimension names.
    #[must_use]
    pub fn has_dimension(&self, dimension: &str) -> bool {
        self.dimension_index(dimension).is_some()
    }

    /// Return the `standard_name` attribute, if it is a string.
    #[must_use]
    pub fn standard_name(&self) -> Option<&str> {
        self.additional
            .get(STANDARD_NAME_ATTRIBUTE)
            .and_then(serde_json::Value::as_str)
    }

    /// Return the union of these attributes with `other`.
    ///
    /// Values in `other` take precedence where keys collide, including the dimension names.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let mut additional = self.additional.clone();
        for (key, value) in &other.additional {
            additional.insert(key.clone(), value.clone());
        }
        Self {
            dimension_names: other.dimension_names.clone(),
            additional,
        }
    }
}
