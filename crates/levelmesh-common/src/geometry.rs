//! 2D geometric predicates
//!
//! Pure functions over point sequences. Rings are implicitly closed: the
//! last point connects back to the first. Malformed input (too few points)
//! returns the type's neutral value instead of failing; validation is the
//! caller's job.

use glam::Vec2;

use crate::math::{cross_2d, dot_2d, EPSILON};

/// Calculate the signed area of a ring using the shoelace formula.
///
/// Positive for counter-clockwise winding, negative for clockwise
/// (y-up convention). Returns 0.0 for fewer than 3 points.
pub fn signed_area(ring: &[Vec2]) -> f32 {
    if ring.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..ring.len() {
        let j = (i + 1) % ring.len();
        sum += cross_2d(ring[i], ring[j]);
    }
    sum * 0.5
}

/// Check whether a ring is wound clockwise (negative signed area).
#[inline]
pub fn is_clockwise(ring: &[Vec2]) -> bool {
    signed_area(ring) < 0.0
}

/// Absolute enclosed area of a ring.
#[inline]
pub fn area(ring: &[Vec2]) -> f32 {
    signed_area(ring).abs()
}

/// Vertex centroid of a ring. Returns the origin for an empty ring.
pub fn centroid(ring: &[Vec2]) -> Vec2 {
    if ring.is_empty() {
        return Vec2::ZERO;
    }
    let sum: Vec2 = ring.iter().copied().sum();
    sum / ring.len() as f32
}

/// Angle (radians, atan2 convention) of the longest edge of a ring.
///
/// Used for orientation labeling. Returns 0.0 for fewer than 2 points.
pub fn longest_side_angle(ring: &[Vec2]) -> f32 {
    if ring.len() < 2 {
        return 0.0;
    }
    let mut best_len = -1.0;
    let mut best_dir = Vec2::X;
    for i in 0..ring.len() {
        let j = (i + 1) % ring.len();
        let d = ring[j] - ring[i];
        let len = d.length_squared();
        if len > best_len {
            best_len = len;
            best_dir = d;
        }
    }
    best_dir.y.atan2(best_dir.x)
}

/// Check if a point is inside a simple polygon using ray casting.
///
/// Horizontal-edge ties use the half-open rule: a crossing is only
/// counted when `p1.y > p.y != p2.y > p.y`, so a ray passing exactly
/// through a vertex is counted once. Correct for convex and concave
/// simple polygons; undefined for self-intersecting input.
pub fn point_in_polygon(ring: &[Vec2], p: Vec2) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let vi = ring[i];
        let vj = ring[j];
        if ((vi.y > p.y) != (vj.y > p.y))
            && (p.x < (vj.x - vi.x) * (p.y - vi.y) / (vj.y - vi.y) + vi.x)
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Test whether segments `a-b` and `c-d` intersect properly, returning the
/// parameter `t` along `a-b` at the crossing.
///
/// Uses the parametric line-line solve. Parallel segments (zero
/// denominator) are reported as non-intersecting even when they overlap
/// along a shared line; callers that care about that case layer
/// [`collinear_segments_overlap`] on top. Endpoint touches are not
/// proper intersections.
pub fn segments_intersect(a: Vec2, b: Vec2, c: Vec2, d: Vec2) -> Option<f32> {
    let r = b - a;
    let s = d - c;
    let denom = cross_2d(r, s);
    if denom.abs() < EPSILON {
        return None;
    }
    let t = cross_2d(c - a, s) / denom;
    let u = cross_2d(c - a, r) / denom;
    if t > EPSILON && t < 1.0 - EPSILON && u > EPSILON && u < 1.0 - EPSILON {
        Some(t)
    } else {
        None
    }
}

/// Check whether two collinear segments overlap along their shared line.
///
/// This is the companion check to [`segments_intersect`], which reports
/// parallel segments as non-intersecting. Non-parallel or non-collinear
/// input returns false.
pub fn collinear_segments_overlap(a: Vec2, b: Vec2, c: Vec2, d: Vec2) -> bool {
    let r = b - a;
    let s = d - c;
    if r.length_squared() < EPSILON || s.length_squared() < EPSILON {
        return false;
    }
    let rn = r.normalize();
    let sn = s.normalize();
    if cross_2d(rn, sn).abs() > 1e-4 {
        return false;
    }
    // Perpendicular distance of c from the a-b line
    if cross_2d(rn, c - a).abs() > 1e-4 {
        return false;
    }
    // Project both segments onto the shared direction and test 1D overlap
    let len = r.length();
    let tc = dot_2d(c - a, rn);
    let td = dot_2d(d - a, rn);
    let lo = tc.min(td);
    let hi = tc.max(td);
    hi >= -EPSILON && lo <= len + EPSILON
}

/// Find the closest point on segment `a-b` to point `p`.
pub fn closest_point_on_segment(p: Vec2, a: Vec2, b: Vec2) -> Vec2 {
    let d = b - a;
    let len_sqr = d.length_squared();
    if len_sqr < EPSILON {
        return a;
    }
    let t = (dot_2d(p - a, d) / len_sqr).clamp(0.0, 1.0);
    a + d * t
}

/// Check whether the perpendicular projection of `p` onto `a-b` lands
/// within the segment and within `epsilon` distance, or `p` is within
/// `epsilon` of either endpoint.
pub fn point_on_segment(p: Vec2, a: Vec2, b: Vec2, epsilon: f32) -> bool {
    let eps_sqr = epsilon * epsilon;
    if (p - a).length_squared() <= eps_sqr || (p - b).length_squared() <= eps_sqr {
        return true;
    }
    let d = b - a;
    let len_sqr = d.length_squared();
    if len_sqr < EPSILON {
        return false;
    }
    let t = dot_2d(p - a, d) / len_sqr;
    if !(0.0..=1.0).contains(&t) {
        return false;
    }
    (p - (a + d * t)).length_squared() <= eps_sqr
}

/// Continuous collision between a moving disc and a ring's edges and
/// vertices over one time step.
///
/// The disc starts at `start` and moves by `delta`. Solves the quadratic
/// `a*t^2 + b*t + c = 0` per vertex and the linear edge-distance crossing
/// per edge, keeping the earliest contact with `t` in `[0, 1]`. Returns
/// the contact point on the ring boundary and the contact time, or `None`
/// when no contact occurs this step.
pub fn swept_circle_polygon(
    ring: &[Vec2],
    start: Vec2,
    delta: Vec2,
    radius: f32,
) -> Option<(Vec2, f32)> {
    if ring.is_empty() {
        return None;
    }

    let mut best: Option<(Vec2, f32)> = None;
    let mut consider = |contact: Vec2, t: f32| {
        if t >= 0.0 && t <= 1.0 && best.map_or(true, |(_, bt)| t < bt) {
            best = Some((contact, t));
        }
    };

    let radius_sqr = radius * radius;
    let a_coef = delta.length_squared();

    // Vertex contacts
    for &v in ring {
        let f = start - v;
        let c = f.length_squared() - radius_sqr;
        if c <= 0.0 {
            // Already touching at the start of the step
            consider(v, 0.0);
            continue;
        }
        if a_coef < EPSILON {
            continue;
        }
        let b = 2.0 * dot_2d(f, delta);
        let disc = b * b - 4.0 * a_coef * c;
        if disc < 0.0 {
            continue;
        }
        let t = (-b - disc.sqrt()) / (2.0 * a_coef);
        consider(v, t);
    }

    // Edge contacts
    let n = ring.len();
    for i in 0..n {
        let ea = ring[i];
        let eb = ring[(i + 1) % n];
        let e = eb - ea;
        let e_len_sqr = e.length_squared();
        if e_len_sqr < EPSILON {
            continue;
        }
        let normal = Vec2::new(-e.y, e.x) / e_len_sqr.sqrt();
        let c0 = dot_2d(normal, start - ea);
        let c1 = dot_2d(normal, delta);

        if c0.abs() <= radius {
            // Already within radius of the edge line; contact if the
            // projection falls inside the segment
            let u = dot_2d(start - ea, e) / e_len_sqr;
            if (0.0..=1.0).contains(&u) {
                consider(ea + e * u, 0.0);
            }
        }
        if c1.abs() < EPSILON {
            continue;
        }
        for target in [radius, -radius] {
            let t = (target - c0) / c1;
            if !(0.0..=1.0).contains(&t) {
                continue;
            }
            let center = start + delta * t;
            let u = dot_2d(center - ea, e) / e_len_sqr;
            if (0.0..=1.0).contains(&u) {
                consider(ea + e * u, t);
            }
        }
    }

    best
}
