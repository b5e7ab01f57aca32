//! Array and dataset metadata types for the `chunkplan` crate.
//!
//! These types describe what a metadata extractor reports for each variable of a source file:
//! its [`DataType`], optional [`FillValueMetadata`], [`ArrayAttributes`] (including the required dimension names),
//! and the [`DimensionRange`] of each coordinate axis.
//! An [`ArrayMetadataRecord`] bundles these for one variable and is the input format of `chunkplan`.
//! Fill value metadata becomes a [`FillValue`] with [`DataType::fill_value_from_metadata`].
//!
//! All types are (de)serialisable with [`serde`].
//!
//! ## Licence
//! `chunkplan_metadata` is licensed under either of
//!  - the Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> or
//!  - the MIT license <http://opensource.org/licenses/MIT>, at your option.
//!
//! Unless you explicitly state otherwise, any contribution intentionally submitted for inclusion in the work by you, as defined in the Apache-2.0 license, shall be dual licensed as above, without any additional terms or conditions.

mod array_attributes;
mod array_metadata_record;
mod coordinate;
mod data_type;
mod fill_value;
mod fill_value_metadata;

pub use array_attributes::ArrayAttributes;
pub use array_metadata_record::ArrayMetadataRecord;
pub use coordinate::{CoordinateValue, DimensionRange};
pub use data_type::{DataType, UnsupportedDataTypeError};
pub use fill_value::FillValue;
pub use fill_value_metadata::{
    FillValueFloat, FillValueFloatStringNonFinite, FillValueMetadata,
    IncompatibleFillValueMetadataError,
};

/// Free-form attributes. A JSON object.
pub type Attributes = serde_json::Map<String, serde_json::Value>;

/// An array shape. Dimensions may be zero.
pub type ArrayShape = Vec<u64>;

/// The attribute holding the CF standard name of a variable.
pub const STANDARD_NAME_ATTRIBUTE: &str = "standard_name";
