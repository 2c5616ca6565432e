//! GeoJSON geometry objects and their WKT rendering.

use std::fmt::{self, Write as _};

use serde::Deserialize;

/// A position: longitude, latitude and optional extra ordinates.
pub type Position = Vec<f64>;

/// A GeoJSON geometry object.
///
/// Only the coordinate structure is kept; `bbox` and foreign members are
/// ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    /// A single position.
    Point {
        /// The position.
        coordinates: Position,
    },
    /// A set of positions.
    MultiPoint {
        /// The positions.
        coordinates: Vec<Position>,
    },
    /// A line through two or more positions.
    LineString {
        /// The positions.
        coordinates: Vec<Position>,
    },
    /// A set of lines.
    MultiLineString {
        /// One position list per line.
        coordinates: Vec<Vec<Position>>,
    },
    /// An exterior ring followed by optional holes.
    Polygon {
        /// One position list per ring.
        coordinates: Vec<Vec<Position>>,
    },
    /// A set of polygons.
    MultiPolygon {
        /// One ring list per polygon.
        coordinates: Vec<Vec<Vec<Position>>>,
    },
    /// A heterogeneous set of geometries.
    GeometryCollection {
        /// The member geometries.
        geometries: Vec<Geometry>,
    },
}

impl Geometry {
    /// The GeoJSON type name.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Point { .. } => "Point",
            Self::MultiPoint { .. } => "MultiPoint",
            Self::LineString { .. } => "LineString",
            Self::MultiLineString { .. } => "MultiLineString",
            Self::Polygon { .. } => "Polygon",
            Self::MultiPolygon { .. } => "MultiPolygon",
            Self::GeometryCollection { .. } => "GeometryCollection",
        }
    }

    /// Renders the geometry as Well-Known Text.
    ///
    /// ```
    /// use cityatlas::geo::Geometry;
    ///
    /// let point = Geometry::Point { coordinates: vec![4.35, 50.85] };
    /// assert_eq!(point.to_wkt(), "POINT (4.35 50.85)");
    /// ```
    pub fn to_wkt(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_wkt(&mut out);
        out
    }

    fn write_wkt(&self, out: &mut String) -> fmt::Result {
        match self {
            Self::Point { coordinates } => {
                if coordinates.is_empty() {
                    return out.write_str("POINT EMPTY");
                }
                out.write_str("POINT (")?;
                write_position(out, coordinates)?;
                out.write_char(')')
            }
            Self::MultiPoint { coordinates } => {
                out.write_str("MULTIPOINT ")?;
                write_list(out, coordinates, |out, p| {
                    out.write_char('(')?;
                    write_position(out, p)?;
                    out.write_char(')')
                })
            }
            Self::LineString { coordinates } => {
                out.write_str("LINESTRING ")?;
                write_ring(out, coordinates)
            }
            Self::MultiLineString { coordinates } => {
                out.write_str("MULTILINESTRING ")?;
                write_list(out, coordinates, |out, line| write_ring(out, line))
            }
            Self::Polygon { coordinates } => {
                out.write_str("POLYGON ")?;
                write_list(out, coordinates, |out, ring| write_ring(out, ring))
            }
            Self::MultiPolygon { coordinates } => {
                out.write_str("MULTIPOLYGON ")?;
                write_list(out, coordinates, |out, polygon| {
                    write_list(out, polygon, |out, ring| write_ring(out, ring))
                })
            }
            Self::GeometryCollection { geometries } => {
                out.write_str("GEOMETRYCOLLECTION ")?;
                write_list(out, geometries, |out, g| g.write_wkt(out))
            }
        }
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wkt())
    }
}

fn write_position(out: &mut String, position: &[f64]) -> fmt::Result {
    for (i, ordinate) in position.iter().enumerate() {
        if i > 0 {
            out.write_char(' ')?;
        }
        write!(out, "{}", ordinate)?;
    }
    Ok(())
}

fn write_ring(out: &mut String, positions: &[Position]) -> fmt::Result {
    if positions.is_empty() {
        return out.write_str("EMPTY");
    }
    out.write_char('(')?;
    for (i, p) in positions.iter().enumerate() {
        if i > 0 {
            out.write_str(", ")?;
        }
        write_position(out, p)?;
    }
    out.write_char(')')
}

fn write_list<T>(
    out: &mut String,
    items: &[T],
    mut write_item: impl FnMut(&mut String, &T) -> fmt::Result,
) -> fmt::Result {
    if items.is_empty() {
        return out.write_str("EMPTY");
    }
    out.write_char('(')?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.write_str(", ")?;
        }
        write_item(out, item)?;
    }
    out.write_char(')')
}
