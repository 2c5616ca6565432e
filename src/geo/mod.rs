//! GeoJSON support.
//!
//! The atlas ships as a GeoJSON FeatureCollection. [`read_feature_collection`]
//! flattens it into an Arrow record batch whose last column holds each
//! feature's geometry as WKT text.

mod geometry;
mod reader;

pub use geometry::{Geometry, Position};
pub use reader::{geometry_field, read_feature_collection};

/// Name of the geometry column appended to every feature table.
pub const GEOMETRY_COLUMN: &str = "geometry";

/// Field metadata key marking a column as geometry.
pub const GEOMETRY_METADATA_KEY: &str = "cityatlas:geometry";

/// Encoding recorded under [`GEOMETRY_METADATA_KEY`].
pub const GEOMETRY_ENCODING: &str = "WKT";
