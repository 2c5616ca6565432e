//! Cell formatting utilities for TUI display
//!
//! Turns Arrow values into display strings and fits them into fixed-width
//! columns. Widths are measured with `unicode-width` so city names with
//! accents or CJK text line up.

use arrow::array::{Array, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type};
use arrow::util::display::array_value_to_string;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::error::{TuiError, TuiResult};
use crate::column::is_missing;

/// Rendered in place of a missing cell.
pub const MISSING_MARKER: &str = "None";

/// Format an Arrow array value at the given row index as a display string
///
/// Returns `Ok(None)` if `row` is out of bounds. Missing cells (null or NaN)
/// render as [`MISSING_MARKER`].
///
/// # Errors
///
/// Returns [`TuiError::Unformattable`] if Arrow cannot display the value.
pub fn format_array_value(array: &dyn Array, row: usize) -> TuiResult<Option<String>> {
    if row >= array.len() {
        return Ok(None);
    }

    if is_missing(array, row) {
        return Ok(Some(MISSING_MARKER.to_string()));
    }

    let formatted = match array.data_type() {
        DataType::Utf8 => array.as_string::<i32>().value(row).to_string(),
        DataType::LargeUtf8 => array.as_string::<i64>().value(row).to_string(),
        DataType::Float64 => format!("{:.4}", array.as_primitive::<Float64Type>().value(row)),
        DataType::Float32 => format!("{:.2}", array.as_primitive::<Float32Type>().value(row)),
        _ => array_value_to_string(array, row).map_err(|e| TuiError::Unformattable {
            row,
            reason: e.to_string(),
        })?,
    };

    Ok(Some(formatted))
}

/// Truncate a string to fit within a display width
///
/// Long strings end with `..`.
pub fn truncate_string(s: &str, max_width: usize) -> String {
    if display_width(s) <= max_width {
        return s.to_string();
    }
    if max_width < 3 {
        return take_width(s, max_width);
    }

    let mut result = take_width(s, max_width - 2);
    result.push_str("..");
    result
}

/// Truncate or right-pad a string to exactly `width` display columns.
pub fn fit_to_width(s: &str, width: usize) -> String {
    let mut out = truncate_string(s, width);
    let pad = width.saturating_sub(display_width(&out));
    out.extend(std::iter::repeat(' ').take(pad));
    out
}

/// Calculate the display width of a string
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Word-wrap a string into lines of at most `width` display columns
///
/// Words wider than a whole line are truncated rather than split.
pub fn wrap_text(s: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in s.split_whitespace() {
        let needed = display_width(&current) + usize::from(!current.is_empty()) + display_width(word);
        if !current.is_empty() && needed > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&truncate_string(word, width));
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

fn take_width(s: &str, max_width: usize) -> String {
    let mut width = 0;
    s.chars()
        .take_while(|c| {
            width += UnicodeWidthChar::width(*c).unwrap_or(0);
            width <= max_width
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow::array::{ArrayRef, BooleanArray, Float32Array, Float64Array, Int64Array, StringArray};

    use super::*;

    #[test]
    fn f_format_utf8_string() {
        let array: ArrayRef = Arc::new(StringArray::from(vec![Some("Ghent"), None]));
        assert_eq!(
            format_array_value(array.as_ref(), 0).unwrap(),
            Some("Ghent".to_string())
        );
        assert_eq!(
            format_array_value(array.as_ref(), 1).unwrap(),
            Some(MISSING_MARKER.to_string())
        );
    }

    #[test]
    fn f_format_float64() {
        let array: ArrayRef = Arc::new(Float64Array::from(vec![10.3, f64::NAN]));
        assert_eq!(
            format_array_value(array.as_ref(), 0).unwrap(),
            Some("10.3000".to_string())
        );
        assert_eq!(
            format_array_value(array.as_ref(), 1).unwrap(),
            Some(MISSING_MARKER.to_string()),
            "FALSIFIED: NaN should render as missing"
        );
    }

    #[test]
    fn f_format_float32() {
        let array: ArrayRef = Arc::new(Float32Array::from(vec![1.5f32]));
        assert_eq!(
            format_array_value(array.as_ref(), 0).unwrap(),
            Some("1.50".to_string())
        );
    }

    #[test]
    fn f_format_int64_and_bool() {
        let ints: ArrayRef = Arc::new(Int64Array::from(vec![3_645_000]));
        assert_eq!(
            format_array_value(ints.as_ref(), 0).unwrap(),
            Some("3645000".to_string())
        );
        let flags: ArrayRef = Arc::new(BooleanArray::from(vec![true]));
        assert_eq!(
            format_array_value(flags.as_ref(), 0).unwrap(),
            Some("true".to_string())
        );
    }

    #[test]
    fn f_format_out_of_bounds() {
        let array: ArrayRef = Arc::new(Int64Array::from(vec![1]));
        assert_eq!(format_array_value(array.as_ref(), 5).unwrap(), None);
    }

    #[test]
    fn f_truncate_string_short() {
        assert_eq!(truncate_string("Porto", 10), "Porto");
        assert_eq!(truncate_string("Porto", 5), "Porto");
    }

    #[test]
    fn f_truncate_string_long() {
        assert_eq!(truncate_string("Amsterdam", 6), "Amst..");
    }

    #[test]
    fn f_truncate_string_very_short_max() {
        assert_eq!(truncate_string("Amsterdam", 2), "Am");
    }

    #[test]
    fn f_truncate_wide_chars() {
        let s = "東京都市圏";
        assert_eq!(display_width(s), 10);
        let t = truncate_string(s, 6);
        assert!(display_width(&t) <= 6);
        assert!(t.ends_with(".."));
    }

    #[test]
    fn f_fit_to_width_pads() {
        assert_eq!(fit_to_width("Köln", 6), "Köln  ");
        assert_eq!(fit_to_width("Düsseldorf", 6), "Düss..");
        assert_eq!(display_width(&fit_to_width("", 4)), 4);
    }

    #[test]
    fn f_wrap_text() {
        assert_eq!(
            wrap_text("Mean annual air temperature at 2 m", 12),
            vec!["Mean annual", "air", "temperature", "at 2 m"]
        );
        assert_eq!(wrap_text("", 10), vec![""]);
        assert_eq!(wrap_text("https://example.org/very/long", 10), vec!["https://.."]);
    }

    #[test]
    fn f_display_width_empty() {
        assert_eq!(display_width(""), 0);
    }
}
