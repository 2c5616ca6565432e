//! Non-interactive commands: columns, head, summary, inspect and page.

use std::path::Path;

use arrow::util::pretty::pretty_format_batches;

use crate::{
    config::ViewerConfig,
    dataset::Dataset,
    html::{render_error_page, render_page, PageView},
    panel::summarize,
    store::DataStore,
    tui::InspectorPane,
};

/// List the main table's columns with their kinds.
pub(crate) fn cmd_columns(store: &DataStore) -> crate::Result<()> {
    let data = store.get_or_load()?;
    let schema = data.table().schema();

    for (i, field) in schema.fields().iter().enumerate() {
        let kind = data
            .kind(field.name())
            .map_or("unknown", |k| k.as_str());
        let documented = if data.codebook().lookup(field.name()).is_some() {
            ""
        } else {
            " (no codebook entry)"
        };
        println!(
            "  {}: {} [{}, {}]{}",
            i,
            field.name(),
            kind,
            field.data_type(),
            documented
        );
    }

    println!();
    println!("Total columns: {}", schema.fields().len());

    Ok(())
}

/// Display the first N rows.
pub(crate) fn cmd_head(store: &DataStore, rows: usize) -> crate::Result<()> {
    let data = store.get_or_load()?;
    let table = data.table();

    let mut collected = Vec::new();
    let mut count = 0;
    for batch in table.iter() {
        let take = (rows - count).min(batch.num_rows());
        if take > 0 {
            collected.push(batch.slice(0, take));
            count += take;
        }
        if count >= rows {
            break;
        }
    }

    if collected.is_empty() {
        println!("No data to display");
        return Ok(());
    }

    println!("{}", pretty_format_batches(&collected)?);

    if count < table.len() {
        println!("... showing {} of {} rows", count, table.len());
    }

    Ok(())
}

/// Print row, column and missing-value totals.
pub(crate) fn cmd_summary(store: &DataStore) -> crate::Result<()> {
    let data = store.get_or_load()?;
    for line in summarize(data.table()).lines() {
        println!("{line}");
    }
    Ok(())
}

/// Describe one column.
pub(crate) fn cmd_inspect(store: &DataStore, column: &str) -> crate::Result<()> {
    let data = store.get_or_load()?;
    let details = data.inspect(column)?;
    for line in InspectorPane::new(Some(&details), None).wrapped_lines(usize::MAX) {
        println!("{line}");
    }
    Ok(())
}

/// Render the HTML page; a load failure still produces an error page.
pub(crate) fn cmd_page(
    store: &DataStore,
    config: &ViewerConfig,
    columns: Option<Vec<String>>,
    inspect: Option<String>,
    output: Option<&Path>,
) -> crate::Result<()> {
    let (html, outcome) = match store.get_or_load() {
        Ok(data) => {
            let initial = PageView::initial(&data, config);
            let view = PageView {
                columns: columns.unwrap_or(initial.columns),
                inspect: inspect.or(initial.inspect),
            };
            (render_page(&data, &view, config)?, Ok(()))
        }
        Err(e) => {
            tracing::error!(error = %e, "rendering error page");
            (render_error_page(&config.title, &e), Err(e))
        }
    };

    match output {
        Some(path) => {
            std::fs::write(path, html).map_err(|e| crate::Error::io(e, path))?;
            tracing::info!(path = %path.display(), "wrote page");
        }
        None => print!("{html}"),
    }

    outcome
}
