// src/geometry.rs - Planar polygon primitives for ring reconstruction

use nalgebra::{distance, Point2};

/// Signed shoelace area of a closed polygon ring.
/// Positive or negative depending on winding; callers that need a physical
/// area should use `polygon_area`.
pub fn signed_area(points: &[Point2<f64>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }

    let n = points.len();
    let mut area = 0.0;

    for i in 0..n {
        let p = &points[i];
        let q = &points[(i + 1) % n]; // Wrap around to first point
        area += p.x * q.y - q.x * p.y;
    }

    0.5 * area
}

/// Absolute planar area enclosed by a closed polygon ring.
pub fn polygon_area(points: &[Point2<f64>]) -> f64 {
    signed_area(points).abs()
}

/// Length of a closed polygon ring, including the closing segment back to
/// the first vertex.
pub fn ring_perimeter(points: &[Point2<f64>]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }

    let n = points.len();
    let mut perimeter = 0.0;

    for i in 0..n {
        let p = &points[i];
        let q = &points[(i + 1) % n]; // Wrap around to first point
        perimeter += distance(p, q);
    }

    perimeter
}

/// Arithmetic mean of the vertices. Fallback centroid for degenerate
/// (zero-area) rings where the shoelace-weighted formula divides by zero.
fn vertex_mean(points: &[Point2<f64>]) -> Point2<f64> {
    if points.is_empty() {
        return Point2::origin();
    }

    let n = points.len() as f64;
    let sum_x: f64 = points.iter().map(|p| p.x).sum();
    let sum_y: f64 = points.iter().map(|p| p.y).sum();

    Point2::new(sum_x / n, sum_y / n)
}

/// Centroid of the solid region enclosed by a closed polygon ring.
pub fn polygon_centroid(points: &[Point2<f64>]) -> Point2<f64> {
    let area = signed_area(points);
    if area.abs() < f64::EPSILON {
        return vertex_mean(points);
    }

    let n = points.len();
    let mut cx = 0.0;
    let mut cy = 0.0;

    for i in 0..n {
        let p = &points[i];
        let q = &points[(i + 1) % n];
        let cross = p.x * q.y - q.x * p.y;
        cx += (p.x + q.x) * cross;
        cy += (p.y + q.y) * cross;
    }

    Point2::new(cx / (6.0 * area), cy / (6.0 * area))
}

/// Centroid of an annular region (exterior minus optional hole), computed
/// as the area-weighted difference of the two solid centroids.
pub fn annular_centroid(exterior: &[Point2<f64>], hole: Option<&[Point2<f64>]>) -> Point2<f64> {
    let hole = match hole {
        Some(hole) => hole,
        None => return polygon_centroid(exterior),
    };

    let exterior_area = polygon_area(exterior);
    let hole_area = polygon_area(hole);
    let net_area = exterior_area - hole_area;

    if net_area.abs() < f64::EPSILON {
        return vertex_mean(exterior);
    }

    let ce = polygon_centroid(exterior);
    let ch = polygon_centroid(hole);

    Point2::new(
        (ce.x * exterior_area - ch.x * hole_area) / net_area,
        (ce.y * exterior_area - ch.y * hole_area) / net_area,
    )
}

/// Ray-casting point-in-polygon test. Points exactly on the boundary are
/// not reliably classified; the annotation polygons this operates on are
/// assumed not to touch each other vertex-on-edge.
pub fn point_in_polygon(point: &Point2<f64>, polygon: &[Point2<f64>]) -> bool {
    if polygon.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = polygon.len() - 1;

    for i in 0..polygon.len() {
        let pi = &polygon[i];
        let pj = &polygon[j];

        // The y-guard guarantees pj.y != pi.y, so the division is safe
        let crosses = ((pi.y > point.y) != (pj.y > point.y))
            && point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x;
        if crosses {
            inside = !inside;
        }
        j = i;
    }

    inside
}

/// Orientation of the triplet (a, b, c): positive for counter-clockwise,
/// negative for clockwise, zero for collinear.
fn orientation(a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// True if `p` lies within the bounding box of the segment (a, b). Only
/// meaningful when `p` is already known to be collinear with the segment.
fn within_segment_bounds(a: &Point2<f64>, b: &Point2<f64>, p: &Point2<f64>) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

/// Segment intersection test, including collinear overlap and endpoint
/// touches.
pub fn segments_intersect(
    p1: &Point2<f64>,
    p2: &Point2<f64>,
    q1: &Point2<f64>,
    q2: &Point2<f64>,
) -> bool {
    let d1 = orientation(q1, q2, p1);
    let d2 = orientation(q1, q2, p2);
    let d3 = orientation(p1, p2, q1);
    let d4 = orientation(p1, p2, q2);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    (d1 == 0.0 && within_segment_bounds(q1, q2, p1))
        || (d2 == 0.0 && within_segment_bounds(q1, q2, p2))
        || (d3 == 0.0 && within_segment_bounds(p1, p2, q1))
        || (d4 == 0.0 && within_segment_bounds(p1, p2, q2))
}

/// True if any edge of ring `a` intersects any edge of ring `b`.
pub fn rings_cross(a: &[Point2<f64>], b: &[Point2<f64>]) -> bool {
    if a.len() < 2 || b.len() < 2 {
        return false;
    }

    let na = a.len();
    let nb = b.len();

    for i in 0..na {
        let a1 = &a[i];
        let a2 = &a[(i + 1) % na];
        for j in 0..nb {
            let b1 = &b[j];
            let b2 = &b[(j + 1) % nb];
            if segments_intersect(a1, a2, b1, b2) {
                return true;
            }
        }
    }

    false
}

/// Axis-aligned bounding box of a point sequence as (min, max) corners.
pub fn bounding_box(points: &[Point2<f64>]) -> (Point2<f64>, Point2<f64>) {
    let mut min = Point2::new(f64::INFINITY, f64::INFINITY);
    let mut max = Point2::new(f64::NEG_INFINITY, f64::NEG_INFINITY);

    for p in points {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }

    (min, max)
}

/// Strict nesting test: every vertex of `inner` lies inside `outer` and no
/// edges cross, so the two rings share no boundary points. Sufficient for
/// the simple (non-self-intersecting) polygons produced by annotation
/// tooling.
pub fn polygon_contains(outer: &[Point2<f64>], inner: &[Point2<f64>]) -> bool {
    if outer.len() < 3 || inner.is_empty() {
        return false;
    }

    // Cheap reject: the inner bounding box must sit inside the outer one
    let (outer_min, outer_max) = bounding_box(outer);
    let (inner_min, inner_max) = bounding_box(inner);
    if inner_min.x < outer_min.x
        || inner_min.y < outer_min.y
        || inner_max.x > outer_max.x
        || inner_max.y > outer_max.y
    {
        return false;
    }

    if !inner.iter().all(|p| point_in_polygon(p, outer)) {
        return false;
    }

    !rings_cross(outer, inner)
}

/// True if `candidate` touches the annulus bounded outside by `outer` with a
/// hole at `hole`. Mirrors an intersects-region query: vertex containment in
/// either direction, or any boundary crossing, counts as contact.
pub fn annulus_intersects(
    outer: &[Point2<f64>],
    hole: &[Point2<f64>],
    candidate: &[Point2<f64>],
) -> bool {
    if outer.len() < 3 || candidate.is_empty() {
        return false;
    }

    // A candidate vertex inside the exterior but not inside the hole lies
    // within the annular region itself
    if candidate
        .iter()
        .any(|p| point_in_polygon(p, outer) && !point_in_polygon(p, hole))
    {
        return true;
    }

    // The candidate may swallow the annulus whole
    if outer.iter().any(|p| point_in_polygon(p, candidate)) {
        return true;
    }

    // Otherwise contact can only happen across the region boundaries
    rings_cross(candidate, outer) || rings_cross(candidate, hole)
}
