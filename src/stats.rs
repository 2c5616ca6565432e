//! Per-column statistics.
//!
//! Numeric columns get the usual describe set (count, mean, sample standard
//! deviation, min, quartiles, max); every other kind gets its declared type
//! with distinct and missing counts. Both branches use the same missing-value
//! predicate as [`crate::column::missing_count`].

use std::collections::HashSet;

use arrow::{
    array::{Array, ArrayRef, AsArray},
    compute::cast,
    datatypes::{DataType, Float64Type},
    util::display::array_value_to_string,
};

use crate::{
    column::{is_missing, missing_count, ColumnKind},
    error::{Error, Result},
};

/// Describe statistics over the non-missing values of a numeric column.
///
/// With no values every statistic except `count` is `None`; with a single
/// value `std` is `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericSummary {
    /// Number of non-missing values.
    pub count: usize,
    /// Arithmetic mean.
    pub mean: Option<f64>,
    /// Sample standard deviation (n - 1 denominator).
    pub std: Option<f64>,
    /// Minimum value.
    pub min: Option<f64>,
    /// 25th percentile.
    pub q1: Option<f64>,
    /// 50th percentile (median).
    pub median: Option<f64>,
    /// 75th percentile.
    pub q3: Option<f64>,
    /// Maximum value.
    pub max: Option<f64>,
}

impl NumericSummary {
    /// Computes the summary from raw values. NaN entries are skipped.
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Self {
        let mut sorted: Vec<f64> = values.into_iter().filter(|v| !v.is_nan()).collect();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let n = sorted.len();
        if n == 0 {
            return Self {
                count: 0,
                mean: None,
                std: None,
                min: None,
                q1: None,
                median: None,
                q3: None,
                max: None,
            };
        }

        let mean = sorted.iter().sum::<f64>() / n as f64;
        let std = (n > 1).then(|| {
            let variance =
                sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
            variance.sqrt()
        });

        Self {
            count: n,
            mean: Some(mean),
            std,
            min: sorted.first().copied(),
            q1: percentile(&sorted, 0.25),
            median: percentile(&sorted, 0.5),
            q3: percentile(&sorted, 0.75),
            max: sorted.last().copied(),
        }
    }

    /// Labeled rows in describe order, with `None` rendered as `NaN`.
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("count", format_float(Some(self.count as f64))),
            ("mean", format_float(self.mean)),
            ("std", format_float(self.std)),
            ("min", format_float(self.min)),
            ("25%", format_float(self.q1)),
            ("50%", format_float(self.median)),
            ("75%", format_float(self.q3)),
            ("max", format_float(self.max)),
        ]
    }
}

/// Summary of a non-numeric column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoricalSummary {
    /// The declared Arrow type.
    pub data_type: DataType,
    /// Number of distinct non-missing values.
    pub unique: usize,
    /// Number of missing values.
    pub missing: usize,
}

/// Statistics for one column, shaped by its [`ColumnKind`].
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnStatistics {
    /// Describe set for numeric columns.
    Numeric(NumericSummary),
    /// Counts for every other kind.
    Categorical(CategoricalSummary),
}

impl ColumnStatistics {
    /// Computes statistics over the chunks of one column.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric chunk cannot be cast to `Float64`.
    pub fn compute(kind: ColumnKind, data_type: &DataType, chunks: &[ArrayRef]) -> Result<Self> {
        match kind {
            ColumnKind::Numeric => {
                let mut values = Vec::new();
                for chunk in chunks {
                    let floats = cast(chunk, &DataType::Float64).map_err(Error::Arrow)?;
                    values.extend(floats.as_primitive::<Float64Type>().iter().flatten());
                }
                Ok(Self::Numeric(NumericSummary::from_values(values)))
            }
            ColumnKind::Categorical | ColumnKind::Geometry | ColumnKind::Text => {
                Ok(Self::Categorical(CategoricalSummary {
                    data_type: data_type.clone(),
                    unique: distinct_count(chunks)?,
                    missing: chunks.iter().map(|c| missing_count(c.as_ref())).sum(),
                }))
            }
        }
    }
}

/// Counts distinct non-missing values across chunks.
///
/// Values are compared by their display form.
///
/// # Errors
///
/// Returns an error if a value cannot be formatted.
pub fn distinct_count(chunks: &[ArrayRef]) -> Result<usize> {
    let mut seen = HashSet::new();
    for chunk in chunks {
        for i in 0..chunk.len() {
            if is_missing(chunk.as_ref(), i) {
                continue;
            }
            seen.insert(array_value_to_string(chunk, i).map_err(Error::Arrow)?);
        }
    }
    Ok(seen.len())
}

/// Linear-interpolation percentile over sorted values, `q` in `[0, 1]`.
fn percentile(sorted: &[f64], q: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let pos = q * last as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let lo = *sorted.get(lower)?;
    let hi = *sorted.get(upper)?;
    Some(lo + (hi - lo) * (pos - lower as f64))
}

/// Formats a statistic the way the describe table shows it.
pub fn format_float(value: Option<f64>) -> String {
    match value {
        None => "NaN".to_string(),
        Some(v) if v.fract() == 0.0 && v.abs() < 1e15 => format!("{v:.1}"),
        Some(v) => format!("{v:.6}"),
    }
}
