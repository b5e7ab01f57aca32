#![allow(missing_docs)]

use std::num::NonZeroU64;

use chunkplan::metadata::{
    ArrayMetadataRecord, DataType, DimensionRange, FillValue, FillValueMetadata,
};
use chunkplan::{ChunkSizes, DatasetMeta, DatasetMetaCreateError};

const JSON_EXTRACTION: &str = r#"[
    {
        "name": "tos",
        "shape": [12, 180, 360],
        "data_type": "float32",
        "dimension_names": ["time", "lat", "lon"],
        "dimension_ranges": {
            "time": ["2000-01-16", "2000-12-16"],
            "lat": [-89.5, 89.5],
            "lon": [0.5, 359.5]
        },
        "chunk_grid": [1, 180, 360],
        "fill_value": 1e20,
        "is_data_var": true,
        "attributes": {
            "standard_name": "sea_surface_temperature",
            "units": "degC"
        }
    },
    {
        "name": "time",
        "shape": [12],
        "data_type": "datetime64",
        "dimension_names": ["time"],
        "dimension_ranges": {"time": ["2000-01-16", "2000-12-16"]}
    },
    {
        "name": "lat",
        "shape": [180],
        "data_type": "<f8",
        "dimension_names": ["lat"],
        "dimension_ranges": {"lat": [-89.5, 89.5]}
    },
    {
        "name": "lon",
        "shape": [360],
        "data_type": "float64",
        "dimension_names": ["lon"],
        "dimension_ranges": {"lon": [0.5, 359.5]}
    },
    {
        "name": "station",
        "shape": [3],
        "data_type": "object",
        "dimension_names": ["station"],
        "estimated_element_size": 49.0
    }
]"#;

fn extraction() -> Vec<ArrayMetadataRecord> {
    serde_json::from_str(JSON_EXTRACTION).unwrap()
}

#[test]
fn extraction_json() {
    let meta = DatasetMeta::from_extraction(extraction()).unwrap();
    assert_eq!(meta.arrays().len(), 5);

    let tos = meta.array_meta("tos").unwrap();
    assert_eq!(tos.data_type(), DataType::Float32);
    assert_eq!(tos.fill_value(), Some(&FillValue::from(1.0e20f32)));
    assert_eq!(tos.chunk_grid(), &[1, 180, 360]);
    assert_eq!(
        tos.dimension_ranges()["lat"],
        DimensionRange::new(-89.5, 89.5)
    );
    assert_eq!(tos.identifier(), "sea_surface_temperature");
    assert_eq!(tos.attributes().additional["units"], "degC");

    let station = meta.array_meta("station").unwrap();
    assert_eq!(station.data_type(), DataType::Object);
    assert_eq!(station.estimated_element_size(), 49.0);
    let lat = meta.array_meta("lat").unwrap();
    assert_eq!(lat.data_type(), DataType::Float64);
    assert_eq!(lat.chunk_grid(), &[180]);
}

#[test]
fn extraction_json_missing_element_size() {
    let mut records = extraction();
    records
        .iter_mut()
        .filter(|record| record.name == "station")
        .for_each(|record| record.estimated_element_size = None);
    assert!(matches!(
        DatasetMeta::from_extraction(records),
        Err(DatasetMetaCreateError::MissingElementSize(name, DataType::Object)) if name == "station"
    ));
}

#[test]
fn extraction_json_invalid_records() {
    let mut records = extraction();
    records[0].dimension_names.pop();
    let err = DatasetMeta::from_extraction(records).unwrap_err();
    assert!(matches!(&err, DatasetMetaCreateError::InvalidArrayMeta(name, _) if name == "tos"));

    let mut records = extraction();
    records[1].fill_value = Some(FillValueMetadata::from(0.5f64));
    let err = DatasetMeta::from_extraction(records).unwrap_err();
    assert_eq!(
        err.to_string(),
        "variable `time`: incompatible fill value 0.5 for data type datetime64"
    );
}

#[test]
fn extraction_json_merged_round_trip() {
    let meta = DatasetMeta::from_extraction(extraction()).unwrap();
    let merged = DatasetMeta::merge_all([&meta, &meta, &meta], "time").unwrap();
    assert_eq!(merged.array_meta("tos").unwrap().shape(), &[36, 180, 360]);
    assert_eq!(merged.array_meta("station").unwrap().shape(), &[3]);

    let json = serde_json::to_string_pretty(&merged).unwrap();
    let deserialized: DatasetMeta = serde_json::from_str(&json).unwrap();
    assert_eq!(deserialized, merged);
    assert_eq!(deserialized.concat_dim(), Some("time"));

    let chunk_sizes: ChunkSizes = serde_json::from_str(r#"{"time": 5, "lat": 90}"#).unwrap();
    assert_eq!(chunk_sizes.get("time"), NonZeroU64::new(5).as_ref());
    assert_eq!(
        merged
            .enumerate_chunks(&chunk_sizes)
            .filter(|(name, _)| *name == "tos")
            .count(),
        8 * 2
    );
}
