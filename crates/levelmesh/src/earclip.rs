//! Simple-polygon triangulation by ear clipping
//!
//! Repeatedly tests each vertex triple for "is an ear" (convex corner
//! with no other ring vertex inside the candidate triangle), emits the
//! ear, removes the tip vertex, and continues until three vertices
//! remain. Winding is normalized internally, so output triangles are
//! wound counter-clockwise regardless of input winding.

use glam::Vec2;

use levelmesh_common::{cross_2d, signed_area, Error, Result, Ring, TriangleSoup, EPSILON};

/// Triangulates one simple ring into a counter-clockwise triangle soup.
///
/// Fails with [`Error::InvalidGeometry`] for fewer than 3 input points and
/// with [`Error::Triangulation`] when no ear can be found within
/// `2 * vertex_count` clipping rounds, which guards against degenerate or
/// non-simple input looping forever. Self-intersecting rings must be
/// resolved before calling this.
pub fn triangulate_simple(ring: &Ring) -> Result<TriangleSoup> {
    let points = ring.points();
    if points.len() < 3 {
        return Err(Error::InvalidGeometry(format!(
            "cannot triangulate a ring with {} points",
            points.len()
        )));
    }

    // Normalize winding: walk the ring in reverse when it is clockwise,
    // so every (u, v, w) triple below is counter-clockwise.
    let n = points.len();
    let mut indices: Vec<usize> = if signed_area(points) < 0.0 {
        (0..n).rev().collect()
    } else {
        (0..n).collect()
    };

    let mut soup = TriangleSoup::with_capacity(n - 2);
    let max_rounds = 2 * n;
    let mut rounds = 0;

    while indices.len() > 3 {
        rounds += 1;
        if rounds > max_rounds {
            return Err(Error::Triangulation(format!(
                "no ear found after {} rounds ({} vertices remain)",
                rounds,
                indices.len()
            )));
        }

        let Some(ear) = find_ear(points, &indices) else {
            return Err(Error::Triangulation(format!(
                "no ear in a {}-vertex remainder; input may be non-simple",
                indices.len()
            )));
        };

        let m = indices.len();
        let u = points[indices[(ear + m - 1) % m]];
        let v = points[indices[ear]];
        let w = points[indices[(ear + 1) % m]];
        soup.push_triangle(u, v, w);
        indices.remove(ear);
    }

    let a = points[indices[0]];
    let b = points[indices[1]];
    let c = points[indices[2]];
    if cross_2d(b - a, c - a) > EPSILON {
        soup.push_triangle(a, b, c);
    }

    if soup.is_empty() {
        return Err(Error::Triangulation(
            "ring collapsed to zero-area triangles".to_string(),
        ));
    }

    Ok(soup)
}

/// Finds the position (into `indices`) of an ear tip, if any.
fn find_ear(points: &[Vec2], indices: &[usize]) -> Option<usize> {
    let m = indices.len();
    for i in 0..m {
        let u = points[indices[(i + m - 1) % m]];
        let v = points[indices[i]];
        let w = points[indices[(i + 1) % m]];

        // The corner must be convex given counter-clockwise traversal
        if cross_2d(v - u, w - v) <= EPSILON {
            continue;
        }

        // No other remaining vertex may lie inside the candidate triangle
        let mut blocked = false;
        for &other in indices {
            let p = points[other];
            if p == u || p == v || p == w {
                continue;
            }
            if point_in_triangle(p, u, v, w) {
                blocked = true;
                break;
            }
        }
        if !blocked {
            return Some(i);
        }
    }
    None
}

/// Point-in-triangle for a counter-clockwise triangle; boundary counts as
/// inside, which only makes the ear test more conservative.
fn point_in_triangle(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> bool {
    cross_2d(b - a, p - a) >= -EPSILON
        && cross_2d(c - b, p - b) >= -EPSILON
        && cross_2d(a - c, p - c) >= -EPSILON
}
