//! Polygon boolean and offset stage
//!
//! Union-merge is delegated to `i_overlay`; coordinates are up-scaled to
//! an integer grid first and divided back down afterwards, so the clipper
//! never sees raw floating-point input and callers never see the
//! fixed-point intermediate. Offsetting displaces each vertex along a
//! miter of the adjacent edge normals, beveling sharp corners where the
//! miter would overshoot.

use glam::Vec2;
use i_overlay::core::fill_rule::FillRule;
use i_overlay::core::overlay_rule::OverlayRule;
use i_overlay::float::single::SingleFloatOverlay;

use levelmesh_common::{Error, PolygonSet, Result, Ring, EPSILON};

use crate::config::DEFAULT_CLIP_SCALE;

/// Unions a set of rings into the minimal set of rings covering the same
/// area, using the default fixed-point scale.
///
/// Overlapping, contained, and disjoint inputs are all handled uniformly.
/// Hole contours in the output carry the opposite winding of their outer
/// contour.
pub fn merge_polygons(set: &PolygonSet) -> Result<PolygonSet> {
    merge_polygons_scaled(set, DEFAULT_CLIP_SCALE)
}

/// Unions a set of rings with an explicit fixed-point up-scale factor.
pub fn merge_polygons_scaled(set: &PolygonSet, clip_scale: f32) -> Result<PolygonSet> {
    if clip_scale <= 0.0 {
        return Err(Error::Clipping(format!(
            "clip scale must be positive, got {clip_scale}"
        )));
    }

    let mut rings = set.iter().filter(|r| r.len() >= 3);
    let Some(first) = rings.next() else {
        return Ok(Vec::new());
    };

    // Pairwise fold: union each remaining ring into the accumulated shape
    let mut acc: Vec<Vec<[f64; 2]>> = vec![upscale(first, clip_scale)];
    for ring in rings {
        let clip: Vec<Vec<[f64; 2]>> = vec![upscale(ring, clip_scale)];
        let shapes = acc.overlay(&clip, OverlayRule::Union, FillRule::NonZero);
        acc = shapes.into_iter().flatten().collect();
    }

    let out: PolygonSet = acc
        .iter()
        .map(|contour| downscale(contour, clip_scale))
        .filter(|ring| ring.len() >= 3)
        .collect();

    if out.is_empty() && set.iter().any(|r| r.area() > EPSILON) {
        return Err(Error::Clipping(
            "union of non-degenerate input produced no output".to_string(),
        ));
    }

    log::debug!(
        "merged {} input rings into {} output rings",
        set.len(),
        out.len()
    );
    Ok(out)
}

/// Grows a ring outward by `distance` (inward for negative distance).
///
/// Each vertex moves along the miter of its two edge normals; corners
/// sharp enough that the miter would overshoot are beveled into two
/// vertices instead. The displaced ring is then resolved through the
/// clipper's fixed-point grid, which trims any fold-back loops an inward
/// offset can pinch off. The output is wound counter-clockwise
/// regardless of input winding. Rings with fewer than 3 points pass
/// through unchanged.
pub fn offset_polygon(ring: &Ring, distance: f32) -> Ring {
    offset_polygon_scaled(ring, distance, DEFAULT_CLIP_SCALE)
}

/// Offsets a ring with an explicit fixed-point up-scale factor for the
/// trim pass.
pub fn offset_polygon_scaled(ring: &Ring, distance: f32, clip_scale: f32) -> Ring {
    const MITER_LIMIT: f32 = 1.20;

    if ring.len() < 3 || distance == 0.0 {
        return ring.clone();
    }

    // Work on a counter-clockwise copy so the normal math below always
    // points the same way
    let mut points: Vec<Vec2> = ring.points().to_vec();
    if ring.is_clockwise() {
        points.reverse();
    }

    let n = points.len();
    let mut out: Vec<Vec2> = Vec::with_capacity(n * 2);

    for i in 0..n {
        let a = points[(i + n - 1) % n];
        let b = points[i];
        let c = points[(i + 1) % n];

        let prev_dir = safe_normalize(b - a);
        let curr_dir = safe_normalize(c - b);
        let cross = curr_dir.x * prev_dir.y - prev_dir.x * curr_dir.y;

        // Counter-clockwise perpendiculars to the two edges
        let prev_norm = Vec2::new(-prev_dir.y, prev_dir.x);
        let curr_norm = Vec2::new(-curr_dir.y, curr_dir.x);

        let mut miter = (prev_norm + curr_norm) * 0.5;
        let miter_sq_mag = miter.length_squared();
        let bevel = miter_sq_mag * MITER_LIMIT * MITER_LIMIT < 1.0;
        if miter_sq_mag > EPSILON {
            miter *= 1.0 / miter_sq_mag;
        }

        if bevel && cross < 0.0 {
            // Two bevel vertices, each pushed off its own edge and blended
            // toward the corner
            let d = (1.0 - prev_dir.dot(curr_dir)) * 0.5;
            out.push(b + (-prev_norm + prev_dir * d) * distance);
            out.push(b + (-curr_norm - curr_dir * d) * distance);
        } else {
            out.push(b - miter * distance);
        }
    }

    trim_offset_loops(Ring::new(out), clip_scale)
}

/// Resolves a displaced ring against itself on the fixed-point grid,
/// keeping the largest resulting contour.
///
/// A sharp inward offset can push edges past each other and pinch off
/// small fold-back loops; evaluating the subject alone under the nonzero
/// fill rule discards them. Falls back to the untrimmed ring if the
/// clipper returns nothing usable.
fn trim_offset_loops(ring: Ring, clip_scale: f32) -> Ring {
    let subject: Vec<Vec<[f64; 2]>> = vec![upscale(&ring, clip_scale)];
    let clip: Vec<Vec<[f64; 2]>> = Vec::new();
    let shapes = subject.overlay(&clip, OverlayRule::Subject, FillRule::NonZero);

    let mut best: Option<Ring> = None;
    for contour in shapes.into_iter().flatten() {
        let candidate = downscale(&contour, clip_scale);
        if candidate.len() < 3 {
            continue;
        }
        if best.as_ref().map_or(true, |b| candidate.area() > b.area()) {
            best = Some(candidate);
        }
    }

    let trimmed = best.unwrap_or(ring);
    if trimmed.is_clockwise() {
        let mut points = trimmed.points().to_vec();
        points.reverse();
        Ring::new(points)
    } else {
        trimmed
    }
}

fn upscale(ring: &Ring, scale: f32) -> Vec<[f64; 2]> {
    let scale = scale as f64;
    ring.points()
        .iter()
        .map(|p| [(p.x as f64 * scale).round(), (p.y as f64 * scale).round()])
        .collect()
}

fn downscale(contour: &[[f64; 2]], scale: f32) -> Ring {
    let scale = scale as f64;
    Ring::new(
        contour
            .iter()
            .map(|c| Vec2::new((c[0] / scale) as f32, (c[1] / scale) as f32))
            .collect(),
    )
}

fn safe_normalize(v: Vec2) -> Vec2 {
    let len_sq = v.length_squared();
    if len_sq > EPSILON * EPSILON {
        v / len_sq.sqrt()
    } else {
        Vec2::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(points: &[(f32, f32)]) -> Ring {
        Ring::new(points.iter().map(|&(x, y)| Vec2::new(x, y)).collect())
    }

    fn square(x: f32, y: f32, side: f32) -> Ring {
        ring(&[(x, y), (x + side, y), (x + side, y + side), (x, y + side)])
    }

    #[test]
    fn test_merge_empty_set() {
        assert!(merge_polygons(&Vec::new()).unwrap().is_empty());
    }

    #[test]
    fn test_merge_overlapping_squares() {
        let set = vec![square(0.0, 0.0, 1.0), square(0.5, 0.0, 1.0)];
        let merged = merge_polygons(&set).unwrap();
        assert_eq!(merged.len(), 1);
        assert!((merged[0].area() - 1.5).abs() < 1e-3);
    }

    #[test]
    fn test_merge_disjoint_squares() {
        let set = vec![square(0.0, 0.0, 1.0), square(5.0, 5.0, 1.0)];
        let merged = merge_polygons(&set).unwrap();
        assert_eq!(merged.len(), 2);
        let total: f32 = merged.iter().map(|r| r.area()).sum();
        assert!((total - 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_merge_contained_square() {
        let set = vec![square(0.0, 0.0, 10.0), square(2.0, 2.0, 1.0)];
        let merged = merge_polygons(&set).unwrap();
        assert_eq!(merged.len(), 1);
        assert!((merged[0].area() - 100.0).abs() < 1e-2);
    }

    #[test]
    fn test_merge_is_scale_transparent() {
        // Callers never observe the fixed-point intermediate: different
        // scales agree on the down-scaled result
        let set = vec![square(0.0, 0.0, 1.0), square(0.5, 0.0, 1.0)];
        let a = merge_polygons_scaled(&set, 1024.0).unwrap();
        let b = merge_polygons_scaled(&set, 4096.0).unwrap();
        assert_eq!(a.len(), b.len());
        assert!((a[0].area() - b[0].area()).abs() < 1e-3);
    }

    #[test]
    fn test_offset_square_bevels_corners() {
        let sq = square(0.0, 0.0, 1.0);
        let grown = offset_polygon(&sq, 0.5);
        // Every 90-degree corner bevels into two vertices
        assert_eq!(grown.len(), 8);
        assert!(!grown.is_clockwise());
        assert!((grown.area() - 3.875).abs() < 1e-3);
    }

    #[test]
    fn test_offset_negative_shrinks() {
        let sq = square(0.0, 0.0, 4.0);
        let shrunk = offset_polygon(&sq, -1.0);
        assert!(shrunk.area() < sq.area());
        // Original corners stay outside the shrunk boundary
        assert!(shrunk
            .points()
            .iter()
            .all(|p| p.x > 0.0 && p.x < 4.0 && p.y > 0.0 && p.y < 4.0));
    }

    #[test]
    fn test_offset_scaled_snaps_to_clip_grid() {
        // A coarse up-scale factor is observable in the output grid
        let grown = offset_polygon_scaled(&square(0.0, 0.0, 1.0), 0.5, 2.0);
        assert!(grown.area() > 1.0);
        for p in grown.points() {
            assert!(((p.x * 2.0).round() - p.x * 2.0).abs() < 1e-6);
            assert!(((p.y * 2.0).round() - p.y * 2.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_offset_deep_shrink_output_is_simple() {
        use levelmesh_common::segments_intersect;

        // A deep inward offset folds the displaced edges past each other;
        // the trim pass must return a simple ring
        let sq = square(0.0, 0.0, 4.0);
        let shrunk = offset_polygon(&sq, -1.9);
        assert!(shrunk.len() >= 3);
        assert!(shrunk.area() > 0.0);
        assert!(!shrunk.is_clockwise());

        let pts = shrunk.points();
        let n = pts.len();
        for i in 0..n {
            for j in (i + 2)..n {
                if i == 0 && j == n - 1 {
                    continue;
                }
                assert!(segments_intersect(
                    pts[i],
                    pts[(i + 1) % n],
                    pts[j],
                    pts[(j + 1) % n]
                )
                .is_none());
            }
        }
    }

    #[test]
    fn test_offset_winding_normalized() {
        let cw = ring(&[(0.0, 1.0), (1.0, 1.0), (1.0, 0.0), (0.0, 0.0)]);
        assert!(cw.is_clockwise());
        let grown = offset_polygon(&cw, 0.25);
        assert!(!grown.is_clockwise());
        assert!(grown.area() > 1.0);
    }

    #[test]
    fn test_offset_degenerate_passthrough() {
        let line = ring(&[(0.0, 0.0), (1.0, 0.0)]);
        assert_eq!(offset_polygon(&line, 0.5), line);
    }
}
