//! Pure geometry helpers.
//!
//! Segment intersection works in projected pixel space; area works on
//! geographic coordinates. None of these functions handle degenerate
//! (collinear or overlapping) segments: such inputs report no crossing.

use crate::constants::{EARTH_RADIUS_M, MIN_GUIDE_SPACING_PX};
use crate::geo::{GeoPoint, Point2D};

/// Returns true if the points `p`, `p1`, `p2` are in counterclockwise order.
fn is_counterclockwise(p: Point2D, p1: Point2D, p2: Point2D) -> bool {
    (p2.y - p.y) * (p1.x - p.x) > (p1.y - p.y) * (p2.x - p.x)
}

/// Checks whether segment (`p`, `p1`) crosses segment (`p2`, `p3`).
///
/// Uses the orientation test. Collinear and overlapping segments are not
/// detected.
pub fn segments_intersect(p: Point2D, p1: Point2D, p2: Point2D, p3: Point2D) -> bool {
    is_counterclockwise(p, p2, p3) != is_counterclockwise(p1, p2, p3)
        && is_counterclockwise(p, p1, p2) != is_counterclockwise(p, p1, p3)
}

/// Checks segment (`p`, `p1`) against the segments of `points` ending at
/// indices `max_index` down to `min_index + 1`.
fn segment_intersects_range(
    points: &[Point2D],
    p: Point2D,
    p1: Point2D,
    max_index: usize,
    min_index: usize,
) -> bool {
    (min_index + 1..=max_index)
        .rev()
        .any(|j| segments_intersect(p, p1, points[j - 1], points[j]))
}

/// Checks whether appending `new_point` to the open path `points` would make
/// the new last segment cross an earlier one.
///
/// The immediately preceding segment is never tested since it shares an
/// endpoint. With `skip_first` the first segment is excluded too, which is
/// what closing a polygon back onto its first vertex needs.
pub fn new_point_intersects(points: &[Point2D], new_point: Point2D, skip_first: bool) -> bool {
    let len = points.len();
    // Fewer than three segments cannot cross without being collinear.
    if len + 1 <= 3 {
        return false;
    }

    let last = points[len - 1];
    let min_index = usize::from(skip_first);
    segment_intersects_range(points, last, new_point, len - 2, min_index)
}

/// Approximate area of a polygon on the sphere, in square metres.
///
/// Sums `Δlng · (2 + sin(lat1) + sin(lat2))` over the ring edges and scales
/// by R²/2. Needs at least three vertices, otherwise returns 0.
pub fn geodesic_area(vertices: &[GeoPoint]) -> f64 {
    let count = vertices.len();
    if count <= 2 {
        return 0.0;
    }

    let d2r = std::f64::consts::PI / 180.0;
    let mut area = 0.0;
    for i in 0..count {
        let p1 = vertices[i];
        let p2 = vertices[(i + 1) % count];
        area += ((p2.lng - p1.lng) * d2r) * (2.0 + (p1.lat * d2r).sin() + (p2.lat * d2r).sin());
    }
    area = area * EARTH_RADIUS_M * EARTH_RADIUS_M / 2.0;

    area.abs()
}

/// Pixel positions of guide dashes along the segment `a`→`b`, one every
/// `spacing` pixels, snapped to whole pixels. Spacing below one pixel is
/// raised to one pixel.
pub fn guide_dashes(a: Point2D, b: Point2D, spacing: f64) -> Vec<Point2D> {
    let length = a.distance_to(&b).floor();
    if spacing.is_nan() || spacing <= 0.0 || !length.is_finite() {
        return Vec::new();
    }
    let spacing = spacing.max(MIN_GUIDE_SPACING_PX);
    if length <= spacing {
        return Vec::new();
    }

    let mut dashes = Vec::new();
    let mut i = spacing;
    while i < length {
        let fraction = i / length;
        dashes.push(Point2D::new(
            (a.x * (1.0 - fraction) + fraction * b.x).floor(),
            (a.y * (1.0 - fraction) + fraction * b.y).floor(),
        ));
        i += spacing;
    }
    dashes
}
