#![allow(clippy::unwrap_used)]
//! Property tests for the panels and page rendering.

use std::sync::Arc;

use arrow::{
    array::{Float64Array, Int64Array, RecordBatch},
    datatypes::{DataType, Field, Schema},
};
use cityatlas::{
    escape_html,
    panel::{group_thousands, select, summarize},
    ArrowDataset, Dataset,
};
use proptest::prelude::*;

const NAMES: [&str; 6] = ["city", "population", "temp_mean", "green_pct", "zone", "geometry"];

fn table(rows: usize) -> ArrowDataset {
    let mut csv = NAMES.join(",");
    csv.push('\n');
    for i in 0..rows {
        csv.push_str(&format!("C{i},{},{}.5,{},Z{},POINT ({i} 1)\n", i * 10, i % 9, i % 4, i % 3));
    }
    ArrowDataset::from_csv_str(&csv).unwrap()
}

/// Values where `None` is null and `Some(NaN)` is a NaN cell.
fn float_cells() -> impl Strategy<Value = Vec<Option<f64>>> {
    prop::collection::vec(
        prop_oneof![
            3 => any::<i32>().prop_map(|v| Some(f64::from(v))),
            1 => Just(None),
            1 => Just(Some(f64::NAN)),
        ],
        1..40,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_selection_follows_table_order(
        picks in prop::collection::vec(prop::sample::select(NAMES.to_vec()), 1..8),
        rows in 1usize..20,
    ) {
        let table = table(rows);
        let selection = select(&table, &picks).unwrap();
        let projection = selection.projection().unwrap();

        let expected: Vec<String> = NAMES
            .iter()
            .filter(|n| picks.contains(*n))
            .map(|n| (*n).to_string())
            .collect();
        prop_assert_eq!(projection.columns(), expected);
        prop_assert_eq!(projection.num_rows(), rows);
    }

    #[test]
    fn prop_summary_missing_is_sum_of_missing_cells(
        floats in float_cells(),
        null_every in 1usize..5,
    ) {
        let n = floats.len();
        let ints: Vec<Option<i64>> = (0..n)
            .map(|i| if i % null_every == 0 { None } else { Some(i as i64) })
            .collect();
        let expected = floats
            .iter()
            .filter(|v| v.map_or(true, f64::is_nan))
            .count()
            + ints.iter().filter(|v| v.is_none()).count();

        let schema = Arc::new(Schema::new(vec![
            Field::new("temp_mean", DataType::Float64, true),
            Field::new("population", DataType::Int64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(Float64Array::from(floats)),
                Arc::new(Int64Array::from(ints)),
            ],
        )
        .unwrap();
        let table = ArrowDataset::from_batch(batch).unwrap();

        let summary = summarize(&table);
        prop_assert_eq!(summary.rows, n);
        prop_assert_eq!(summary.columns, 2);
        prop_assert_eq!(summary.missing, expected);
    }

    #[test]
    fn prop_group_thousands_keeps_digits(n in any::<u32>()) {
        let n = n as usize;
        let grouped = group_thousands(n);
        prop_assert_eq!(grouped.replace(',', ""), n.to_string());
        for group in grouped.split(',').skip(1) {
            prop_assert_eq!(group.len(), 3);
        }
        let first = grouped.split(',').next().unwrap_or_default();
        prop_assert!((1..=3).contains(&first.len()));
    }

    #[test]
    fn prop_escaped_html_has_no_markup(s in ".*") {
        let escaped = escape_html(&s);
        prop_assert!(!escaped.contains(['<', '>', '"', '\'']));
    }
}

#[test]
fn test_dataset_row_count_matches_source() {
    let table = table(7);
    assert_eq!(table.len(), 7);
    assert_eq!(table.num_columns(), NAMES.len());
}
