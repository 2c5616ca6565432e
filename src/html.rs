//! Standalone HTML page for the atlas viewer.
//!
//! The page is a single document with embedded CSS. It holds the data table
//! for the current column selection, the column information card, and the
//! dataset summary. Every string that comes from the data or the codebook is
//! escaped before it is written into the page.

use crate::{
    config::ViewerConfig,
    dataset::Dataset,
    error::{Error, Result},
    panel::{
        default_selection, select, summarize, Details, Selection,
        NO_METADATA_PLACEHOLDER,
    },
    stats::ColumnStatistics,
    store::AtlasData,
    tui::format_array_value,
};

/// What the page shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageView {
    /// Columns chosen for the data table.
    pub columns: Vec<String>,
    /// Column shown in the information card; `None` hides the card.
    pub inspect: Option<String>,
}

impl PageView {
    /// The initial view: the first `default_selection` columns in the table
    /// and the first column in the card.
    pub fn initial(data: &AtlasData, config: &ViewerConfig) -> Self {
        let columns = data.columns();
        Self {
            inspect: columns.first().cloned(),
            columns: default_selection(&columns, config.default_selection),
        }
    }
}

/// Renders the viewer page.
///
/// # Errors
///
/// Returns [`Error::ColumnNotFound`] if `view.inspect` names a column the
/// table does not have.
pub fn render_page(data: &AtlasData, view: &PageView, config: &ViewerConfig) -> Result<String> {
    let selection = select(data.table(), &view.columns)?;
    let details = view
        .inspect
        .as_deref()
        .map(|column| data.inspect(column))
        .transpose()?;

    let mut html = page_head(&config.title);
    html.push_str(&format!("<h1>{}</h1>\n", escape_html(&config.title)));
    html.push_str(INTRODUCTION);
    html.push_str("<details>\n<summary>More Information</summary>\n");
    html.push_str(MORE_INFORMATION);
    html.push_str("</details>\n");

    html.push_str("<div class=\"layout\">\n<section class=\"main\">\n<h2>Data Table</h2>\n");
    render_selection(&mut html, &selection, config.table_height);
    html.push_str("</section>\n<aside>\n<h2>Column Information</h2>\n");
    if let Some(details) = &details {
        render_details(&mut html, details);
    }

    let summary = summarize(data.table());
    html.push_str("<h3>Dataset Summary</h3>\n<ul class=\"summary\">\n");
    for line in summary.lines() {
        html.push_str(&format!("<li>{}</li>\n", escape_html(&line)));
    }
    html.push_str("</ul>\n</aside>\n</div>\n");
    html.push_str("</body>\n</html>\n");

    Ok(html)
}

/// Renders the page shown when the data cannot be loaded.
pub fn render_error_page(title: &str, error: &Error) -> String {
    let mut html = page_head(title);
    html.push_str(&format!("<h1>{}</h1>\n", escape_html(title)));
    html.push_str("<div class=\"error\">\n");
    html.push_str("<p><strong>Failed to load data. Please check your files.</strong></p>\n");
    html.push_str(&format!("<p>{}</p>\n", escape_html(&error.to_string())));
    html.push_str("</div>\n</body>\n</html>\n");
    html
}

/// Escape HTML special characters.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn page_head(title: &str) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"UTF-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    html.push_str(&format!("<title>{}</title>\n", escape_html(title)));
    html.push_str("<style>\n");
    html.push_str(CSS_STYLES);
    html.push_str("</style>\n</head>\n<body>\n");
    html
}

fn render_selection(html: &mut String, selection: &Selection, table_height: usize) {
    let projection = match selection {
        Selection::Empty { warning } => {
            html.push_str(&format!(
                "<div class=\"warning\">{}</div>\n",
                escape_html(warning)
            ));
            return;
        }
        Selection::Table(projection) => projection,
    };

    html.push_str(&format!(
        "<div class=\"table-scroll\" style=\"max-height: {:.1}em\">\n<table>\n<thead><tr>",
        table_height as f64 * ROW_HEIGHT_EM
    ));
    for column in projection.columns() {
        html.push_str(&format!("<th>{}</th>", escape_html(&column)));
    }
    html.push_str("</tr></thead>\n<tbody>\n");

    for batch in projection.dataset().iter() {
        for row in 0..batch.num_rows() {
            html.push_str("<tr>");
            for array in batch.columns() {
                let cell = format_array_value(array.as_ref(), row)
                    .ok()
                    .flatten()
                    .unwrap_or_default();
                html.push_str(&format!("<td>{}</td>", escape_html(&cell)));
            }
            html.push_str("</tr>\n");
        }
    }
    html.push_str("</tbody>\n</table>\n</div>\n");
}

fn render_details(html: &mut String, details: &Details) {
    html.push_str("<div class=\"column-info\">\n");
    html.push_str(&format!("<h4>{}</h4>\n", escape_html(&details.column)));

    match details.fields() {
        Some(fields) => {
            for (label, value) in fields {
                html.push_str(&format!(
                    "<p><strong>{label}:</strong> {}</p>\n",
                    escape_html(value)
                ));
            }
            for link in details.links() {
                html.push_str(&format!(
                    "<a href=\"{}\" target=\"_blank\" class=\"notebook-link\">{}</a>\n",
                    escape_html(&link.url),
                    escape_html(link.label)
                ));
            }
        }
        None => {
            html.push_str(&format!(
                "<p class=\"placeholder\">{NO_METADATA_PLACEHOLDER}</p>\n"
            ));
        }
    }
    html.push_str("</div>\n");

    html.push_str("<h3>Column Statistics</h3>\n");
    match &details.statistics {
        ColumnStatistics::Numeric(summary) => {
            html.push_str("<table class=\"stats\">\n<tbody>\n");
            for (label, value) in summary.rows() {
                html.push_str(&format!("<tr><th>{label}</th><td>{value}</td></tr>\n"));
            }
            html.push_str("</tbody>\n</table>\n");
        }
        ColumnStatistics::Categorical(counts) => {
            html.push_str(&format!(
                "<p>Data type: {}</p>\n<p>Unique values: {}</p>\n<p>Missing values: {}</p>\n",
                escape_html(&counts.data_type.to_string()),
                counts.unique,
                counts.missing
            ));
        }
    }
}

const ROW_HEIGHT_EM: f64 = 2.2;

const INTRODUCTION: &str = r#"<p>This app provides an interactive data table viewer for the European Cities Atlas dataset,
a comprehensive dataset providing standardized indicators for approximately 700 European cities, offering a
systematic overview of urban characteristics across Europe for the reference year 2018.
It allows users to explore city features, view column descriptions, and access processing notebooks for each feature.</p>
<p>For more information, click below or visit the
<a href="https://github.com/FAIRiCUBE/uc1-urban-climate" target="_blank">GitHub repository</a>.</p>
"#;

const MORE_INFORMATION: &str = r#"<h2>Overview</h2>
<p>The European Cities Atlas integrates multiple data sources to create a unified resource for urban research
and policy analysis. It enables comparative studies across European cities by providing consistent metrics on
physical, environmental, and socioeconomic characteristics.</p>
<h2>Indicators</h2>
<p><strong>Land Use &amp; Physical Characteristics</strong></p>
<ul>
<li>Urban fabric density and composition</li>
<li>Green and blue infrastructure coverage</li>
<li>Topographical features and elevation data</li>
<li>Sealed surface percentages and tree cover</li>
</ul>
<p><strong>Climate &amp; Environmental Conditions</strong></p>
<ul>
<li>Temperature profiles and thermal comfort indices</li>
<li>Seasonal weather patterns (summer days, tropical nights)</li>
<li>Environmental zone classifications</li>
<li>Coastal proximity indicators</li>
</ul>
<p><strong>Socioeconomic Demographics</strong></p>
<ul>
<li>Population structure and age distribution</li>
<li>Economic activity and employment statistics</li>
<li>Income levels and health indicators</li>
<li>Urban development patterns</li>
</ul>
<p>Every indicator is described in the codebook <code>cities_features_collection_codebook.csv</code>.
Categorical feature definitions are provided in the codelists <code>codelist_&lt;feature&gt;.csv</code>.</p>
<h2>Geographic Coverage</h2>
<p>City boundaries and selection criteria are based on the Eurostat Urban Atlas. The dataset covers cities
across all EU member states plus additional European countries included in the Urban Audit.</p>
<ul>
<li>EPSG:4326 (WGS84): <a href="https://gisco-services.ec.europa.eu/distribution/v2/urau/geojson/URAU_RG_01M_2018_4326_CITIES.geojson">URAU_RG_01M_2018_4326_CITIES.geojson</a></li>
<li>EPSG:3035 (European grid): <a href="https://gisco-services.ec.europa.eu/distribution/v2/urau/geojson/URAU_RG_01M_2018_3035_CITIES.geojson">URAU_RG_01M_2018_3035_CITIES.geojson</a></li>
</ul>
<p>More on the Urban Audit methodology is available from
<a href="https://ec.europa.eu/eurostat/web/gisco/geodata/reference-data/administrative-units-statistical-units/urban-audit">Eurostat GISCO</a>.</p>
<h2>Metadata</h2>
<p>STAC metadata record on the FAIRiCUBE Data Catalogue:
<a href="https://catalog.eoxhub.fairicube.eu/collections/index/items/city_features_collection">city_features_collection</a></p>
<h2>Example usage</h2>
<p>Clustering analysis of European cities: see the interactive demo notebook
<code>notebooks\demo\cities_clustering_interactive_demo.ipynb</code>.</p>
<h2>License</h2>
<p><a href="https://creativecommons.org/licenses/by/4.0/">CC BY 4.0</a></p>
"#;

const CSS_STYLES: &str = r#"
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; margin: 0 auto; padding: 20px; color: #333; }
.layout { display: flex; gap: 2rem; align-items: flex-start; }
.main { flex: 2; min-width: 0; }
aside { flex: 1; }
.table-scroll { overflow: auto; border: 1px solid #ddd; }
table { border-collapse: collapse; width: 100%; }
th, td { border: 1px solid #ddd; padding: 4px 8px; text-align: left; white-space: nowrap; }
thead th { background: #f5f5f5; position: sticky; top: 0; }
.column-info { background-color: #f0f2f6; padding: 1rem; border-radius: 0.5rem; margin: 1rem 0; }
.notebook-link { background-color: #4bbfff; color: white; padding: 0.5rem 1rem; border-radius: 0.25rem; text-decoration: none; display: inline-block; margin-top: 0.5rem; margin-right: 0.5rem; }
.notebook-link:hover { background-color: #ff6b6b; color: white; text-decoration: none; }
.warning { background: #fffbe6; border: 1px solid #f5d76e; padding: 0.75rem 1rem; border-radius: 0.25rem; }
.error { background: #fdecea; border: 1px solid #f5c2c0; padding: 0.75rem 1rem; border-radius: 0.25rem; }
.placeholder { color: #666; font-style: italic; }
"#;
