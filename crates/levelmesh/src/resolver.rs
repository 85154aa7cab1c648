//! Self-intersection resolver
//!
//! Decomposes a polygon whose boundary crosses itself into a set of
//! simple polygons. Whenever two non-adjacent boundary edges properly
//! intersect, the ring is split in two at the intersection point and both
//! halves are re-examined. Splitting runs on an explicit work queue, so
//! adversarial input cannot grow the call stack.
//!
//! Winding of the produced rings is not normalized here.
//!
//! Known limitation: a "pinch point" (the same vertex coordinate revisited
//! by the boundary without any edge crossing) is not split; the resolver
//! can return fewer rings than theoretically correct for such input.

use glam::Vec2;

use levelmesh_common::{segments_intersect, PolygonSet, Ring};

/// Splits every ring of a polygon set into simple rings.
///
/// Already-simple rings are passed through unchanged; degenerate rings
/// (fewer than 3 points) are dropped.
pub fn split_self_intersecting(set: &PolygonSet) -> PolygonSet {
    let mut out = Vec::new();
    for ring in set {
        out.extend(split_ring(ring));
    }
    out
}

/// Splits one ring into simple rings.
pub fn split_ring(ring: &Ring) -> Vec<Ring> {
    let mut out = Vec::new();
    let mut queue: Vec<Vec<Vec2>> = vec![ring.points().to_vec()];

    // Each split consumes one crossing; a ring of n edges has fewer than
    // n^2 crossings, so this cap only fires on pathological input.
    let mut budget = ring.len() * ring.len() + 16;

    while let Some(points) = queue.pop() {
        if points.len() < 3 {
            continue;
        }

        if budget == 0 {
            log::warn!(
                "self-intersection split budget exhausted; emitting {} remaining points unsplit",
                points.len()
            );
            out.push(Ring::new(points));
            continue;
        }

        match first_crossing(&points) {
            Some((i, j, p)) => {
                budget -= 1;
                // Ring A keeps the boundary outside edges i..j, joined at
                // the crossing; ring B is the loop between them.
                let mut a: Vec<Vec2> = points[..=i].to_vec();
                a.push(p);
                a.extend_from_slice(&points[j + 1..]);

                let mut b: Vec<Vec2> = Vec::with_capacity(j - i + 1);
                b.push(p);
                b.extend_from_slice(&points[i + 1..=j]);

                queue.push(a);
                queue.push(b);
            }
            None => out.push(Ring::new(points)),
        }
    }

    out
}

/// Finds the first pair of non-adjacent edges that properly intersect.
///
/// Returns the edge start indices `(i, j)` with `j > i + 1` and the
/// intersection point.
fn first_crossing(points: &[Vec2]) -> Option<(usize, usize, Vec2)> {
    let n = points.len();
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        for j in (i + 2)..n {
            // The closing edge is adjacent to edge 0 through the wrap
            if i == 0 && j == n - 1 {
                continue;
            }
            let c = points[j];
            let d = points[(j + 1) % n];
            if let Some(t) = segments_intersect(a, b, c, d) {
                return Some((i, j, a + (b - a) * t));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(points: &[(f32, f32)]) -> Ring {
        Ring::new(points.iter().map(|&(x, y)| Vec2::new(x, y)).collect())
    }

    #[test]
    fn test_simple_ring_passes_through_unchanged() {
        let square = ring(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        let result = split_ring(&square);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0], square);
    }

    #[test]
    fn test_hourglass_splits_into_two_triangles() {
        // Figure-eight vertex order: the two slanted edges cross at (1, 1)
        let hourglass = ring(&[(0.0, 0.0), (2.0, 0.0), (0.0, 2.0), (2.0, 2.0)]);
        let mut result = split_ring(&hourglass);
        assert_eq!(result.len(), 2);

        result.sort_by(|a, b| a.centroid().y.partial_cmp(&b.centroid().y).unwrap());
        for piece in &result {
            assert_eq!(piece.len(), 3);
            assert!(piece
                .points()
                .iter()
                .any(|p| (*p - Vec2::new(1.0, 1.0)).length() < 1e-5));
        }
        // Combined area is preserved: each triangle covers 1.0
        assert!((result[0].area() - 1.0).abs() < 1e-5);
        assert!((result[1].area() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_figure_eight_chain_splits_into_five_quads() {
        // Two opposed zigzag paths between capped ends; the paths cross
        // four times along y = 2, carving out five quadrilaterals.
        let chain = ring(&[
            (0.0, 1.0),
            (1.0, 3.0),
            (2.0, 1.0),
            (3.0, 3.0),
            (4.0, 1.0),
            (5.0, 2.0),
            (4.0, 3.0),
            (3.0, 1.0),
            (2.0, 3.0),
            (1.0, 1.0),
            (0.0, 3.0),
            (-1.0, 2.0),
        ]);
        let result = split_ring(&chain);
        assert_eq!(result.len(), 5);
        for piece in &result {
            assert_eq!(piece.len(), 4, "piece {:?} is not a quadrilateral", piece);
            // Every piece must itself be simple now
            assert_eq!(split_ring(piece).len(), 1);
        }
    }

    #[test]
    fn test_degenerate_rings_dropped() {
        assert!(split_ring(&ring(&[])).is_empty());
        assert!(split_ring(&ring(&[(0.0, 0.0), (1.0, 1.0)])).is_empty());
    }

    #[test]
    fn test_polygon_set_entry_point() {
        let set = vec![
            ring(&[(0.0, 0.0), (2.0, 0.0), (0.0, 2.0), (2.0, 2.0)]),
            ring(&[(5.0, 5.0), (6.0, 5.0), (6.0, 6.0)]),
        ];
        let result = split_self_intersecting(&set);
        // Hourglass becomes two rings, the triangle passes through
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_pinch_point_is_not_split() {
        // The boundary revisits (1, 1) without any proper edge crossing.
        // The theoretically correct answer is two triangles; the resolver
        // deliberately leaves this input alone.
        let pinched = ring(&[
            (0.0, 0.0),
            (2.0, 0.0),
            (1.0, 1.0),
            (2.0, 2.0),
            (0.0, 2.0),
            (1.0, 1.0),
        ]);
        let result = split_ring(&pinched);
        assert_eq!(result.len(), 1);
    }
}
