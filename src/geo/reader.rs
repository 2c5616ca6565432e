//! GeoJSON FeatureCollection reader.

use std::{collections::HashMap, sync::Arc};

use arrow::{
    array::{ArrayRef, BooleanArray, Float64Array, Int64Array, RecordBatch, StringArray},
    datatypes::{DataType, Field, Schema},
};
use serde::Deserialize;
use serde_json::{Map, Value};

use super::{Geometry, GEOMETRY_COLUMN, GEOMETRY_ENCODING, GEOMETRY_METADATA_KEY};
use crate::error::{Error, Result};

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    properties: Option<Map<String, Value>>,
    #[serde(default)]
    geometry: Option<Geometry>,
}

/// The Arrow type chosen for one property column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Inferred {
    Unknown,
    Boolean,
    Int64,
    Float64,
    Utf8,
}

impl Inferred {
    fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Unknown,
            Value::Bool(_) => Self::Boolean,
            Value::Number(n) if n.is_i64() => Self::Int64,
            Value::Number(_) => Self::Float64,
            _ => Self::Utf8,
        }
    }

    fn merge(self, other: Self) -> Self {
        match (self, other) {
            (Self::Unknown, t) | (t, Self::Unknown) => t,
            (a, b) if a == b => a,
            (Self::Int64, Self::Float64) | (Self::Float64, Self::Int64) => Self::Float64,
            _ => Self::Utf8,
        }
    }
}

/// Parses a GeoJSON FeatureCollection into a single record batch.
///
/// Property columns come first, in the order their keys are first seen, and
/// the geometry is appended as a WKT `geometry` column.
///
/// # Errors
///
/// Returns an error if the document is not a FeatureCollection, has no
/// features, or has a property that collides with the geometry column.
pub fn read_feature_collection(data: &[u8]) -> Result<RecordBatch> {
    let collection: FeatureCollection = serde_json::from_slice(data)?;
    if collection.kind != "FeatureCollection" {
        return Err(Error::parse(format!(
            "Expected a GeoJSON FeatureCollection, found '{}'",
            collection.kind
        )));
    }
    if collection.features.is_empty() {
        return Err(Error::EmptyDataset);
    }

    let names = property_names(&collection.features);
    if names.iter().any(|n| n == GEOMETRY_COLUMN) {
        return Err(Error::schema_mismatch(format!(
            "Property '{GEOMETRY_COLUMN}' collides with the geometry column"
        )));
    }

    let mut fields = Vec::with_capacity(names.len() + 1);
    let mut columns: Vec<ArrayRef> = Vec::with_capacity(names.len() + 1);

    for name in &names {
        let values: Vec<&Value> = collection
            .features
            .iter()
            .map(|f| {
                f.properties
                    .as_ref()
                    .and_then(|p| p.get(name))
                    .unwrap_or(&Value::Null)
            })
            .collect();
        let (field, column) = build_column(name, &values);
        fields.push(field);
        columns.push(column);
    }

    let wkt: Vec<Option<String>> = collection
        .features
        .iter()
        .map(|f| f.geometry.as_ref().map(Geometry::to_wkt))
        .collect();
    fields.push(geometry_field());
    columns.push(Arc::new(StringArray::from(wkt)));

    let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?;
    tracing::debug!(
        features = batch.num_rows(),
        columns = batch.num_columns(),
        "parsed feature collection"
    );
    Ok(batch)
}

/// The field describing the WKT geometry column.
pub fn geometry_field() -> Field {
    Field::new(GEOMETRY_COLUMN, DataType::Utf8, true).with_metadata(HashMap::from([(
        GEOMETRY_METADATA_KEY.to_string(),
        GEOMETRY_ENCODING.to_string(),
    )]))
}

fn property_names(features: &[Feature]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for properties in features.iter().filter_map(|f| f.properties.as_ref()) {
        for key in properties.keys() {
            if !names.iter().any(|n| n == key) {
                names.push(key.clone());
            }
        }
    }
    names
}

fn build_column(name: &str, values: &[&Value]) -> (Field, ArrayRef) {
    let inferred = values
        .iter()
        .fold(Inferred::Unknown, |acc, v| acc.merge(Inferred::of(v)));

    match inferred {
        Inferred::Boolean => {
            let array: BooleanArray = values.iter().map(|v| v.as_bool()).collect();
            (Field::new(name, DataType::Boolean, true), Arc::new(array))
        }
        Inferred::Int64 => {
            let array: Int64Array = values.iter().map(|v| v.as_i64()).collect();
            (Field::new(name, DataType::Int64, true), Arc::new(array))
        }
        Inferred::Float64 => {
            let array: Float64Array = values.iter().map(|v| v.as_f64()).collect();
            (Field::new(name, DataType::Float64, true), Arc::new(array))
        }
        Inferred::Unknown | Inferred::Utf8 => {
            let array: StringArray = values.iter().map(|v| stringify(v)).collect();
            (Field::new(name, DataType::Utf8, true), Arc::new(array))
        }
    }
}

fn stringify(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        nested => Some(nested.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use arrow::array::Array;

    use super::*;

    const CITIES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {"city": "Berlin", "population": 3645000, "temp_mean": 10.3, "capital": true},
                "geometry": {"type": "Point", "coordinates": [13.4, 52.52]}
            },
            {
                "type": "Feature",
                "properties": {"city": "Ghent", "population": 263000, "temp_mean": null, "capital": false, "green_pct": 21},
                "geometry": null
            }
        ]
    }"#;

    fn read(json: &str) -> RecordBatch {
        read_feature_collection(json.as_bytes())
            .ok()
            .unwrap_or_else(|| panic!("Should read feature collection"))
    }

    #[test]
    fn test_column_order_first_seen_then_geometry() {
        let batch = read(CITIES);
        let schema = batch.schema();
        let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
        assert_eq!(
            names,
            vec!["city", "population", "temp_mean", "capital", "green_pct", "geometry"]
        );
        assert_eq!(batch.num_rows(), 2);
    }

    #[test]
    fn test_type_inference() {
        let batch = read(CITIES);
        let schema = batch.schema();
        let type_of = |name: &str| {
            schema
                .field_with_name(name)
                .map(|f| f.data_type().clone())
                .ok()
        };
        assert_eq!(type_of("city"), Some(DataType::Utf8));
        assert_eq!(type_of("population"), Some(DataType::Int64));
        assert_eq!(type_of("temp_mean"), Some(DataType::Float64));
        assert_eq!(type_of("capital"), Some(DataType::Boolean));
        assert_eq!(type_of("green_pct"), Some(DataType::Int64));
    }

    #[test]
    fn test_absent_and_null_are_missing() {
        let batch = read(CITIES);
        let green = batch.column(4);
        assert!(green.is_null(0));
        assert!(!green.is_null(1));
        assert!(batch.column(2).is_null(1));
        assert!(batch.column(5).is_null(1));
    }

    #[test]
    fn test_geometry_is_wkt_and_tagged() {
        let batch = read(CITIES);
        let geometry = batch
            .column(5)
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap_or_else(|| panic!("Should be a string column"));
        assert_eq!(geometry.value(0), "POINT (13.4 52.52)");

        let schema = batch.schema();
        let field = schema.field(5);
        assert_eq!(
            field.metadata().get(GEOMETRY_METADATA_KEY).map(String::as_str),
            Some(GEOMETRY_ENCODING)
        );
    }

    #[test]
    fn test_mixed_int_and_float_widens() {
        let batch = read(
            r#"{"type":"FeatureCollection","features":[
                {"type":"Feature","properties":{"v":1},"geometry":null},
                {"type":"Feature","properties":{"v":2.5},"geometry":null}
            ]}"#,
        );
        assert_eq!(batch.schema().field(0).data_type(), &DataType::Float64);
    }

    #[test]
    fn test_mixed_types_fall_back_to_text() {
        let batch = read(
            r#"{"type":"FeatureCollection","features":[
                {"type":"Feature","properties":{"v":1,"tags":["a","b"]},"geometry":null},
                {"type":"Feature","properties":{"v":"n/a","tags":null},"geometry":null}
            ]}"#,
        );
        let v = batch
            .column(0)
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap_or_else(|| panic!("Should be a string column"));
        assert_eq!(v.value(0), "1");
        assert_eq!(v.value(1), "n/a");

        let tags = batch
            .column(1)
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap_or_else(|| panic!("Should be a string column"));
        assert_eq!(tags.value(0), r#"["a","b"]"#);
    }

    #[test]
    fn test_empty_collection() {
        let result = read_feature_collection(br#"{"type":"FeatureCollection","features":[]}"#);
        assert!(matches!(result, Err(Error::EmptyDataset)));
    }

    #[test]
    fn test_not_a_collection() {
        let result =
            read_feature_collection(br#"{"type":"Feature","properties":{},"geometry":null}"#);
        assert!(matches!(result, Err(Error::Parse { .. })));
    }

    #[test]
    fn test_malformed_json() {
        let result = read_feature_collection(b"{\"type\": ");
        assert!(matches!(result, Err(Error::Json(_))));
    }

    #[test]
    fn test_geometry_property_collision() {
        let result = read_feature_collection(
            br#"{"type":"FeatureCollection","features":[
                {"type":"Feature","properties":{"geometry":"x"},"geometry":null}
            ]}"#,
        );
        assert!(matches!(result, Err(Error::SchemaMismatch { .. })));
    }
}
