//! Segment and polygon intersection primitives.
//!
//! Points are [`geo::Coord`] values and segments are [`geo::Line`] values.
//! Everything in this module is pure math without state.

use geo::{Coord, Line};

/// Relative tolerance below which two segments are treated as parallel.
///
/// Compared against the sine of the angle between the segments, so the test
/// does not depend on segment lengths. Zero-length segments always fall below
/// it.
pub const PARALLEL_TOLERANCE: f64 = 1e-10;

/// A point where a ray crosses an obstacle edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Location of the hit.
    pub point: Coord<f64>,
    /// Fraction of the ray length from its start to the hit, in `[0, 1]`.
    pub offset: f64,
}

/// Linear interpolation between `a` and `b`.
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Linear interpolation between two points.
#[inline]
pub fn lerp_coord(a: Coord<f64>, b: Coord<f64>, t: f64) -> Coord<f64> {
    Coord {
        x: lerp(a.x, b.x, t),
        y: lerp(a.y, b.y, t),
    }
}

/// Intersects segment `p1p2` (the ray) with segment `p3p4` (the edge).
///
/// Returns the hit only when both segment parameters lie in `[0, 1]`. The
/// returned offset is the parameter along `p1p2`.
///
/// # Arguments
///
/// * `p1`, `p2` - Start and end of the ray
/// * `p3`, `p4` - Start and end of the obstacle edge
pub fn intersect(
    p1: Coord<f64>,
    p2: Coord<f64>,
    p3: Coord<f64>,
    p4: Coord<f64>,
) -> Option<Intersection> {
    let den = (p1.x - p2.x) * (p3.y - p4.y) - (p1.y - p2.y) * (p3.x - p4.x);

    let ray_len = (p2.x - p1.x).hypot(p2.y - p1.y);
    let edge_len = (p4.x - p3.x).hypot(p4.y - p3.y);
    if den.abs() <= PARALLEL_TOLERANCE * ray_len * edge_len {
        return None;
    }

    let t = ((p1.x - p3.x) * (p3.y - p4.y) - (p1.y - p3.y) * (p3.x - p4.x)) / den;
    let u = -((p1.x - p2.x) * (p1.y - p3.y) - (p1.y - p2.y) * (p1.x - p3.x)) / den;

    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some(Intersection {
            point: lerp_coord(p1, p2, t),
            offset: t,
        })
    } else {
        None
    }
}

/// Intersects a ray with an obstacle edge given as [`Line`] values.
#[inline]
pub fn segment_intersection(ray: &Line<f64>, edge: &Line<f64>) -> Option<Intersection> {
    intersect(ray.start, ray.end, edge.start, edge.end)
}

/// Iterates the edges of a closed polygon, wrapping from the last vertex to the first.
pub fn polygon_edges(polygon: &[Coord<f64>]) -> impl Iterator<Item = Line<f64>> + '_ {
    let n = polygon.len();
    (0..n).map(move |i| Line::new(polygon[i], polygon[(i + 1) % n]))
}

/// Returns true if any edge of `poly_a` intersects any edge of `poly_b`.
///
/// Both polygons are closed implicitly. Containment without touching edges
/// does not count.
pub fn polygons_intersect(poly_a: &[Coord<f64>], poly_b: &[Coord<f64>]) -> bool {
    polygon_edges(poly_a).any(|edge_a| {
        polygon_edges(poly_b).any(|edge_b| segment_intersection(&edge_a, &edge_b).is_some())
    })
}

/// Returns true if any edge of `polygon` intersects `segment`.
pub fn polygon_touches_segment(polygon: &[Coord<f64>], segment: &Line<f64>) -> bool {
    polygon_edges(polygon).any(|edge| segment_intersection(&edge, segment).is_some())
}
