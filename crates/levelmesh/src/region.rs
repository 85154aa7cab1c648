//! Constrained triangulation of a bounded region
//!
//! Covers a bounding rectangle and any number of extra polygon
//! boundaries with triangles, with holes removed. Rings are classified
//! by winding: clockwise rings are outer boundaries to fill,
//! counter-clockwise rings are holes, applied to whichever boundary
//! contains at least one of their vertices. The constrained-Delaunay
//! numerics are delegated to spade; this module classifies rings, builds
//! the constraint sets, and filters interior faces.

use glam::Vec2;
use spade::{ConstrainedDelaunayTriangulation, Point2, Triangulation};

use levelmesh_common::{
    cross_2d, point_in_polygon, segments_intersect, Bounds, Error, Result, Ring, TriangleSoup,
};

type Cdt = ConstrainedDelaunayTriangulation<Point2<f64>>;

/// Triangulates the bounded region described by `bounds` and `rings`.
///
/// With no rings at all this degenerates to triangulating the bounding
/// rectangle alone. Non-simple rings are skipped with a warning; resolve
/// self-intersections first.
pub fn triangulate_region(bounds: Bounds, rings: &[Ring]) -> Result<TriangleSoup> {
    if bounds.width() <= 0.0 || bounds.height() <= 0.0 {
        return Err(Error::InvalidGeometry(
            "region bounds have no area".to_string(),
        ));
    }

    let mut boundaries: Vec<Vec<Vec2>> = vec![bounds.corners().to_vec()];
    let mut holes: Vec<&Ring> = Vec::new();

    for ring in rings {
        if ring.len() < 3 {
            log::warn!("skipping degenerate {}-point ring in region", ring.len());
            continue;
        }
        if !is_simple(ring.points()) {
            log::warn!(
                "skipping self-intersecting {}-point ring in region",
                ring.len()
            );
            continue;
        }
        if ring.is_clockwise() {
            boundaries.push(ring.points().to_vec());
        } else {
            holes.push(ring);
        }
    }

    let mut soup = TriangleSoup::new();
    for boundary in &boundaries {
        // A hole applies to this boundary when at least one of its
        // vertices lies inside the boundary polyline
        let applicable: Vec<&[Vec2]> = holes
            .iter()
            .filter(|hole| {
                hole.points()
                    .iter()
                    .any(|&p| point_in_polygon(boundary, p))
            })
            .map(|hole| hole.points())
            .collect();

        triangulate_boundary(boundary, &applicable, &mut soup)?;
    }

    log::debug!(
        "region triangulation: {} boundaries, {} holes, {} triangles",
        boundaries.len(),
        holes.len(),
        soup.triangle_count()
    );
    Ok(soup)
}

/// Triangulates one boundary minus its holes, appending to `out`.
fn triangulate_boundary(
    boundary: &[Vec2],
    holes: &[&[Vec2]],
    out: &mut TriangleSoup,
) -> Result<()> {
    let mut cdt = Cdt::new();

    insert_ring_constraints(&mut cdt, boundary)?;
    for hole in holes {
        insert_ring_constraints(&mut cdt, hole)?;
    }

    for face in cdt.inner_faces() {
        let verts = face.vertices();
        let mut p: [Vec2; 3] = [Vec2::ZERO; 3];
        for (i, v) in verts.iter().enumerate() {
            let pos = v.position();
            p[i] = Vec2::new(pos.x as f32, pos.y as f32);
        }

        // Keep faces whose centroid lies inside the boundary and outside
        // every hole
        let centroid = (p[0] + p[1] + p[2]) / 3.0;
        if !point_in_polygon(boundary, centroid) {
            continue;
        }
        if holes.iter().any(|hole| point_in_polygon(hole, centroid)) {
            continue;
        }

        if cross_2d(p[1] - p[0], p[2] - p[0]) > 0.0 {
            out.push_triangle(p[0], p[1], p[2]);
        } else {
            out.push_triangle(p[0], p[2], p[1]);
        }
    }

    Ok(())
}

/// Inserts a ring's vertices and closing edge constraints into the CDT.
fn insert_ring_constraints(cdt: &mut Cdt, ring: &[Vec2]) -> Result<()> {
    let mut handles = Vec::with_capacity(ring.len());
    for p in ring {
        let handle = cdt
            .insert(Point2::new(p.x as f64, p.y as f64))
            .map_err(|e| Error::Triangulation(format!("vertex insertion failed: {e:?}")))?;
        handles.push(handle);
    }
    for i in 0..handles.len() {
        let j = (i + 1) % handles.len();
        // Constraints crossing an already-inserted ring are skipped;
        // overlapping region input should be unioned before triangulation
        if handles[i] != handles[j] && cdt.can_add_constraint(handles[i], handles[j]) {
            cdt.add_constraint(handles[i], handles[j]);
        }
    }
    Ok(())
}

/// Checks that no two non-adjacent edges of the ring properly intersect.
fn is_simple(points: &[Vec2]) -> bool {
    let n = points.len();
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        for j in (i + 2)..n {
            if i == 0 && j == n - 1 {
                continue;
            }
            if segments_intersect(a, b, points[j], points[(j + 1) % n]).is_some() {
                return false;
            }
        }
    }
    true
}
