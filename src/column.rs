//! Column classification and the missing-value convention.

use std::fmt;

use arrow::{
    array::{Array, AsArray},
    datatypes::{DataType, Field, Float16Type, Float32Type, Float64Type},
};

use crate::geo::GEOMETRY_METADATA_KEY;

/// How a column is summarized and displayed.
///
/// Decided once from the column's Arrow field when the table is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    /// Integer, unsigned or floating-point values.
    Numeric,
    /// Booleans and dictionary-encoded values.
    Categorical,
    /// Feature geometry rendered as WKT.
    Geometry,
    /// Anything else, mostly strings.
    Text,
}

impl ColumnKind {
    /// Classifies an Arrow field.
    pub fn from_field(field: &Field) -> Self {
        if field.metadata().contains_key(GEOMETRY_METADATA_KEY) {
            return Self::Geometry;
        }
        match field.data_type() {
            dt if dt.is_numeric() => Self::Numeric,
            DataType::Boolean | DataType::Dictionary(_, _) => Self::Categorical,
            _ => Self::Text,
        }
    }

    /// True for [`ColumnKind::Numeric`].
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Numeric)
    }

    /// Short lowercase label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Categorical => "categorical",
            Self::Geometry => "geometry",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counts missing cells: nulls, plus NaN in floating-point columns.
pub fn missing_count(array: &dyn Array) -> usize {
    let nulls = array.null_count();
    let nans = match array.data_type() {
        DataType::Float64 => count_nan(array.as_primitive::<Float64Type>().iter(), f64::is_nan),
        DataType::Float32 => count_nan(array.as_primitive::<Float32Type>().iter(), f32::is_nan),
        DataType::Float16 => count_nan(array.as_primitive::<Float16Type>().iter(), |v| v.is_nan()),
        _ => 0,
    };
    nulls + nans
}

/// Whether the cell at `index` is missing.
pub fn is_missing(array: &dyn Array, index: usize) -> bool {
    if array.is_null(index) {
        return true;
    }
    match array.data_type() {
        DataType::Float64 => array.as_primitive::<Float64Type>().value(index).is_nan(),
        DataType::Float32 => array.as_primitive::<Float32Type>().value(index).is_nan(),
        DataType::Float16 => array.as_primitive::<Float16Type>().value(index).is_nan(),
        _ => false,
    }
}

fn count_nan<T: Copy>(
    values: impl Iterator<Item = Option<T>>,
    is_nan: impl Fn(T) -> bool,
) -> usize {
    values.flatten().filter(|v| is_nan(*v)).count()
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, sync::Arc};

    use arrow::array::{BooleanArray, DictionaryArray, Float64Array, Int64Array, StringArray};
    use arrow::datatypes::Int32Type;

    use super::*;

    #[test]
    fn test_kind_numeric() {
        for dt in [
            DataType::Int8,
            DataType::Int64,
            DataType::UInt32,
            DataType::Float32,
            DataType::Float64,
        ] {
            let field = Field::new("v", dt.clone(), true);
            assert_eq!(
                ColumnKind::from_field(&field),
                ColumnKind::Numeric,
                "FALSIFIED: {dt:?} should be numeric"
            );
        }
    }

    #[test]
    fn test_kind_categorical() {
        let field = Field::new("capital", DataType::Boolean, true);
        assert_eq!(ColumnKind::from_field(&field), ColumnKind::Categorical);

        let dict = Field::new(
            "zone",
            DataType::Dictionary(Box::new(DataType::Int32), Box::new(DataType::Utf8)),
            true,
        );
        assert_eq!(ColumnKind::from_field(&dict), ColumnKind::Categorical);
    }

    #[test]
    fn test_kind_geometry_from_metadata() {
        let plain = Field::new("geometry", DataType::Utf8, true);
        assert_eq!(ColumnKind::from_field(&plain), ColumnKind::Text);

        let tagged = plain.with_metadata(HashMap::from([(
            GEOMETRY_METADATA_KEY.to_string(),
            "WKT".to_string(),
        )]));
        assert_eq!(ColumnKind::from_field(&tagged), ColumnKind::Geometry);
    }

    #[test]
    fn test_kind_text() {
        let field = Field::new("city", DataType::Utf8, false);
        assert_eq!(ColumnKind::from_field(&field), ColumnKind::Text);
        assert_eq!(ColumnKind::Text.to_string(), "text");
        assert!(!ColumnKind::Text.is_numeric());
    }

    #[test]
    fn test_missing_counts_nulls_and_nan() {
        let array = Float64Array::from(vec![Some(1.0), None, Some(f64::NAN), Some(2.0)]);
        assert_eq!(missing_count(&array), 2);
        assert!(is_missing(&array, 1));
        assert!(is_missing(&array, 2));
        assert!(!is_missing(&array, 3));
    }

    #[test]
    fn test_missing_counts_nan_in_narrow_floats() {
        use arrow::array::Float32Array;

        let array = Float32Array::from(vec![Some(f32::NAN), Some(0.5), None, Some(f32::NAN)]);
        assert_eq!(missing_count(&array), 3);
        assert!(!is_missing(&array, 1));
    }

    #[test]
    fn test_missing_integer_and_text() {
        let ints = Int64Array::from(vec![Some(1), None, None]);
        assert_eq!(missing_count(&ints), 2);

        let text = StringArray::from(vec![Some("NaN"), None]);
        assert_eq!(missing_count(&text), 1, "FALSIFIED: the string NaN is a value");

        let flags = BooleanArray::from(vec![Some(true), None]);
        assert_eq!(missing_count(&flags), 1);
    }

    #[test]
    fn test_missing_dictionary() {
        let dict: DictionaryArray<Int32Type> = vec![Some("a"), None, Some("a")].into_iter().collect();
        let array: Arc<dyn Array> = Arc::new(dict);
        assert_eq!(missing_count(array.as_ref()), 1);
    }
}
